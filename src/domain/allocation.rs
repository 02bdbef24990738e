// ==========================================
// 中央仓库存分配系统 - 分配结果领域模型
// ==========================================
// 生命周期: 每次分配运行整体生成，重跑时整体替换（不合并）
// ==========================================

use crate::domain::stock::StockBatch;
use crate::domain::types::{BranchId, ChannelId, ProductId, SkipReason};
use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

// ==========================================
// AllocationRecord - 调拨明细
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AllocationRecord {
    pub product_id: ProductId,
    pub from_branch: BranchId,   // 中央仓
    pub to_branch: BranchId,     // 目标门店
    pub channel_id: ChannelId,
    pub quantity_allocated: i64, // > 0
    pub expiry_date: NaiveDate,  // 来源批次到期日
}

// ==========================================
// UnfulfilledDemand - 未满足需求
// ==========================================
// 每个门店级需求未被满足的 (product_id, branch_id) 一行
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnfulfilledDemand {
    pub product_id: ProductId,
    pub branch_id: BranchId,
    pub needed: i64,      // 原始门店净需求
    pub fulfilled: i64,   // 已分配
    pub unfulfilled: i64, // needed - fulfilled
}

// ==========================================
// SkippedDemand - 未拿到库存的需求行（审计用）
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkippedDemand {
    pub product_id: ProductId,
    pub branch_id: BranchId,
    pub channel_id: ChannelId,
    pub reason: SkipReason,
}

// ==========================================
// AllocationOutcome - 单次分配运行的完整输出
// ==========================================
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AllocationOutcome {
    pub run_id: String,                         // 运行ID (UUID)
    pub generated_at: NaiveDateTime,            // 效期判断所用的“当前时间”
    pub allocation_plan: Vec<AllocationRecord>, // 调拨计划
    pub unfulfilled_demands: Vec<UnfulfilledDemand>,
    pub remaining_stock: Vec<StockBatch>,       // 中央仓剩余 (> 0) 批次
    #[serde(default)]
    pub skipped_demands: Vec<SkippedDemand>,    // 未拿到库存的需求行
}

impl AllocationOutcome {
    /// 调拨总量
    pub fn total_allocated(&self) -> i64 {
        self.allocation_plan
            .iter()
            .fold(0i64, |acc, r| acc.saturating_add(r.quantity_allocated))
    }

    /// 未满足总量
    pub fn total_unfulfilled(&self) -> i64 {
        self.unfulfilled_demands
            .iter()
            .fold(0i64, |acc, u| acc.saturating_add(u.unfulfilled))
    }

    /// 中央仓剩余总量
    pub fn total_remaining(&self) -> i64 {
        self.remaining_stock
            .iter()
            .fold(0i64, |acc, b| acc.saturating_add(b.stock_available))
    }
}
