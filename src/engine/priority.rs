// ==========================================
// 中央仓库存分配系统 - 需求行优先级排序引擎
// ==========================================
// 职责: 筛选需分配的渠道行并按优先级排序
// 输入: 需求分析表 + 分配规则
// 输出: 排序后的需求行（按优先级从高到低）
// ==========================================

use crate::config::allocation_config::AllocationRules;
use crate::domain::analysis::ChannelDemand;
use crate::domain::types::PriorityRank;
use std::cmp::Ordering;

// ==========================================
// DemandLine - 带优先级档位的需求行
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DemandLine {
    pub demand: ChannelDemand,
    pub channel_rank: PriorityRank,
    pub branch_rank: PriorityRank,
}

// ==========================================
// DemandPrioritizer - 优先级排序引擎
// ==========================================
pub struct DemandPrioritizer {
    // 无状态引擎,不需要注入依赖
}

impl DemandPrioritizer {
    /// 构造函数
    pub fn new() -> Self {
        Self {}
    }

    // ==========================================
    // 核心方法
    // ==========================================

    /// 生成排序后的需求行
    ///
    /// 排序键:
    /// 1) channel_rank 升序（优先渠道在前,不论门店）
    /// 2) branch_rank 升序（优先门店其次）
    /// 3) forecast_quantity 降序（同档内大需求先尝试）
    ///
    /// 稳定排序: 完全相同的键保持分析表原有顺序
    ///
    /// # 参数
    /// - `analysis`: 需求分析表
    /// - `rules`: 分配规则（优先渠道/门店）
    ///
    /// # 返回
    /// 仅包含 Allocation Needed 行,按优先级从高到低
    pub fn prioritize(&self, analysis: &[ChannelDemand], rules: &AllocationRules) -> Vec<DemandLine> {
        let mut lines: Vec<DemandLine> = analysis
            .iter()
            .filter(|row| row.needs_allocation())
            .map(|row| DemandLine {
                channel_rank: PriorityRank::from_membership(
                    rules.is_priority_channel(row.channel_id),
                ),
                branch_rank: PriorityRank::from_membership(rules.is_priority_branch(row.branch_id)),
                demand: row.clone(),
            })
            .collect();

        lines.sort_by(|a, b| self.compare(a, b));
        lines
    }

    // ==========================================
    // 比较方法
    // ==========================================

    /// 比较两个需求行的优先级
    ///
    /// # 返回
    /// Ordering::Less 表示 a 优先于 b
    fn compare(&self, a: &DemandLine, b: &DemandLine) -> Ordering {
        a.channel_rank
            .cmp(&b.channel_rank)
            .then_with(|| a.branch_rank.cmp(&b.branch_rank))
            .then_with(|| b.demand.forecast_quantity.cmp(&a.demand.forecast_quantity))
    }

    /// 生成排序原因 (可解释性)
    ///
    /// # 返回
    /// JSON 格式的排序原因字符串
    pub fn generate_sort_reason(&self, line: &DemandLine) -> String {
        let primary_factor = match (line.channel_rank, line.branch_rank) {
            (PriorityRank::Prioritized, _) => "PRIORITY_CHANNEL",
            (_, PriorityRank::Prioritized) => "PRIORITY_BRANCH",
            _ => "FORECAST_QUANTITY",
        };

        serde_json::json!({
            "sort_keys": {
                "channel_rank": line.channel_rank.as_number(),
                "branch_rank": line.branch_rank.as_number(),
                "forecast_quantity": line.demand.forecast_quantity,
            },
            "primary_factor": primary_factor,
        })
        .to_string()
    }
}

// ==========================================
// Default trait 实现
// ==========================================
impl Default for DemandPrioritizer {
    fn default() -> Self {
        Self::new()
    }
}
