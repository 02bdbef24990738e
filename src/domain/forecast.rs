// ==========================================
// 中央仓库存分配系统 - 需求预测领域模型
// ==========================================
// 用途: 门店 × 渠道的预测需求（只读输入）
// ==========================================

use crate::domain::types::{BranchId, BranchKey, ChannelId, ProductId};
use serde::{Deserialize, Serialize};

// ==========================================
// ForecastRecord - 预测记录
// ==========================================
// 同一 (product_id, branch_id, channel_id) 可出现多行，分析时求和
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ForecastRecord {
    pub product_id: ProductId,   // 产品
    pub branch_id: BranchId,     // 门店
    pub channel_id: ChannelId,   // 渠道
    pub forecast_quantity: i64,  // 预测数量 (>= 0)
}

impl ForecastRecord {
    pub fn new(
        product_id: ProductId,
        branch_id: BranchId,
        channel_id: ChannelId,
        forecast_quantity: i64,
    ) -> Self {
        Self {
            product_id,
            branch_id,
            channel_id,
            forecast_quantity,
        }
    }

    pub fn branch_key(&self) -> BranchKey {
        (self.product_id, self.branch_id)
    }

    pub fn channel_key(&self) -> (ProductId, BranchId, ChannelId) {
        (self.product_id, self.branch_id, self.channel_id)
    }
}
