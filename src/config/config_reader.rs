// ==========================================
// 中央仓库存分配系统 - 配置读取 Trait
// ==========================================
// 职责: 定义编排层所需的配置读取接口（不包含实现）
// 红线: 不包含配置写入、不包含业务逻辑
// ==========================================

use crate::config::allocation_config::{AllocationRules, ColumnMapping};
use crate::config::error::ConfigResult;
use crate::domain::types::BranchId;

// ==========================================
// AllocationConfigReader Trait
// ==========================================
// 实现者: ConfigManager（JSON 文件）, AllocationConfig（内存）
pub trait AllocationConfigReader: Send + Sync {
    /// 中央仓编号
    ///
    /// # 默认值
    /// - 1000
    fn get_cw_branch_id(&self) -> ConfigResult<BranchId>;

    /// 分配规则（优先渠道/门店 + 效期规则）
    fn get_allocation_rules(&self) -> ConfigResult<AllocationRules>;

    /// 预测文件列映射
    fn get_forecast_mapping(&self) -> ConfigResult<ColumnMapping>;

    /// 库存文件列映射
    fn get_stock_mapping(&self) -> ConfigResult<ColumnMapping>;
}
