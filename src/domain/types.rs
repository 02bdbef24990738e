// ==========================================
// 中央仓库存分配系统 - 领域类型定义
// ==========================================
// 职责: 标识符别名、分配状态、优先级档位
// ==========================================

use serde::{Deserialize, Serialize};
use std::fmt;

/// 产品编号
pub type ProductId = i64;

/// 门店/仓库编号（中央仓也是一个 branch_id）
pub type BranchId = i64;

/// 销售渠道编号
pub type ChannelId = i64;

/// 门店级分组键 (product_id, branch_id)
pub type BranchKey = (ProductId, BranchId);

// ==========================================
// 分配状态 (Allocation Status)
// ==========================================
// 由门店净需求的符号决定: >0 需分配, ==0 无需分配, <0 超储
// 序列化格式与导出表一致（带空格的原文）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AllocationStatus {
    #[serde(rename = "Allocation Needed")]
    AllocationNeeded,
    #[serde(rename = "No Allocation Needed")]
    NoAllocationNeeded,
    #[serde(rename = "Overstock")]
    Overstock,
}

impl AllocationStatus {
    /// 按净需求符号分类
    ///
    /// 边界: net_need == 0 严格归为 NoAllocationNeeded
    pub fn from_net_need(net_need: i64) -> Self {
        match net_need {
            n if n > 0 => AllocationStatus::AllocationNeeded,
            0 => AllocationStatus::NoAllocationNeeded,
            _ => AllocationStatus::Overstock,
        }
    }

    /// 导出用的字符串
    pub fn as_str(&self) -> &'static str {
        match self {
            AllocationStatus::AllocationNeeded => "Allocation Needed",
            AllocationStatus::NoAllocationNeeded => "No Allocation Needed",
            AllocationStatus::Overstock => "Overstock",
        }
    }

    pub fn needs_allocation(&self) -> bool {
        *self == AllocationStatus::AllocationNeeded
    }
}

impl fmt::Display for AllocationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// ==========================================
// 优先级档位 (Priority Rank)
// ==========================================
// 渠道与门店各自独立取档: 1 = 优先, 2 = 默认
// 顺序: Prioritized < Default (升序排序时优先档在前)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PriorityRank {
    Prioritized, // 1
    Default,     // 2
}

impl PriorityRank {
    pub fn from_membership(is_priority: bool) -> Self {
        if is_priority {
            PriorityRank::Prioritized
        } else {
            PriorityRank::Default
        }
    }

    /// 数字档位（与导出/日志一致）
    pub fn as_number(&self) -> u8 {
        match self {
            PriorityRank::Prioritized => 1,
            PriorityRank::Default => 2,
        }
    }
}

impl fmt::Display for PriorityRank {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_number())
    }
}

// ==========================================
// 需求行未分配原因 (Skip Reason)
// ==========================================
// 可解释性: 每条未拿到库存的需求行都要给出原因
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SkipReason {
    BranchNeedSatisfied,     // 门店需求已被更高优先级渠道满足
    NoEligibleBatch,         // 无满足渠道效期要求的中央仓批次
    EligibleStockExhausted,  // 合格批次存在但已被分配完
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::BranchNeedSatisfied => write!(f, "BRANCH_NEED_SATISFIED"),
            SkipReason::NoEligibleBatch => write!(f, "NO_ELIGIBLE_BATCH"),
            SkipReason::EligibleStockExhausted => write!(f, "ELIGIBLE_STOCK_EXHAUSTED"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_boundary_zero_is_no_allocation_needed() {
        assert_eq!(
            AllocationStatus::from_net_need(0),
            AllocationStatus::NoAllocationNeeded
        );
        assert_eq!(
            AllocationStatus::from_net_need(1),
            AllocationStatus::AllocationNeeded
        );
        assert_eq!(
            AllocationStatus::from_net_need(-1),
            AllocationStatus::Overstock
        );
    }

    #[test]
    fn test_status_serializes_with_display_text() {
        let json = serde_json::to_string(&AllocationStatus::NoAllocationNeeded).unwrap();
        assert_eq!(json, "\"No Allocation Needed\"");
        assert_eq!(AllocationStatus::Overstock.to_string(), "Overstock");
    }

    #[test]
    fn test_priority_rank_ordering() {
        assert!(PriorityRank::Prioritized < PriorityRank::Default);
        assert_eq!(PriorityRank::from_membership(true).as_number(), 1);
        assert_eq!(PriorityRank::from_membership(false).as_number(), 2);
    }
}
