// ==========================================
// 中央仓库存分配系统 - 汇总指标模型
// ==========================================
// 用途: 分析/分配结果的汇总口径（供展示层直接渲染）
// ==========================================

use crate::domain::types::{AllocationStatus, ChannelId};
use serde::{Deserialize, Serialize};

/// 按状态计数（以 (product_id, branch_id) 去重）
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusCount {
    pub status: AllocationStatus,
    pub branch_count: usize,
}

/// 渠道维度数量
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChannelQuantity {
    pub channel_id: ChannelId,
    pub quantity: i64,
}

// ==========================================
// AnalysisSummary - 需求分析汇总
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisSummary {
    pub status_counts: Vec<StatusCount>,          // 门店级状态分布
    pub top_demand_channels: Vec<ChannelQuantity>, // 需分配行的渠道预测 Top-N
    pub total_net_need: i64,                      // 需分配门店的净需求合计
}

impl AnalysisSummary {
    /// 指定状态的门店数
    pub fn count_of(&self, status: AllocationStatus) -> usize {
        self.status_counts
            .iter()
            .find(|c| c.status == status)
            .map(|c| c.branch_count)
            .unwrap_or(0)
    }
}

// ==========================================
// FulfillmentSummary - 分配满足度汇总
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FulfillmentSummary {
    pub total_allocated: i64,
    pub total_unfulfilled: i64,
    pub fulfillment_ratio: f64, // allocated / (allocated + unfulfilled); 无需求时为 1.0
    pub top_allocated_channels: Vec<ChannelQuantity>,
    pub remaining_cw_stock: i64,
}
