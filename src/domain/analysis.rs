// ==========================================
// 中央仓库存分配系统 - 需求分析结果模型
// ==========================================
// 不变量: 同一 (product_id, branch_id) 的所有渠道行,
//         total_stock_available / total_forecast_at_branch /
//         branch_net_need / allocation_status 完全一致
// ==========================================

use crate::domain::types::{AllocationStatus, BranchId, BranchKey, ChannelId, ProductId};
use serde::{Deserialize, Serialize};

// ==========================================
// ChannelDemand - 渠道级需求分析行
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChannelDemand {
    // ===== 分组键 =====
    pub product_id: ProductId,
    pub branch_id: BranchId,
    pub channel_id: ChannelId,

    // ===== 渠道级 =====
    pub forecast_quantity: i64, // 该渠道预测合计

    // ===== 门店级（广播到每个渠道行）=====
    pub total_stock_available: i64,    // 门店现有库存（不含中央仓）
    pub total_forecast_at_branch: i64, // 门店全部渠道预测合计
    pub branch_net_need: i64,          // 净需求 = 预测合计 - 现有库存
    pub allocation_status: AllocationStatus,
}

impl ChannelDemand {
    pub fn branch_key(&self) -> BranchKey {
        (self.product_id, self.branch_id)
    }

    pub fn needs_allocation(&self) -> bool {
        self.allocation_status.needs_allocation()
    }
}
