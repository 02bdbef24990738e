// ==========================================
// 中央仓库存分配系统 - 配置层
// ==========================================
// 职责: 分配配置管理（中央仓、优先级、效期规则、列映射）
// 存储: JSON 配置文件
// ==========================================

pub mod allocation_config;
pub mod config_manager;
pub mod config_reader;
pub mod error;

// 重导出核心配置类型
pub use allocation_config::{
    AllocationConfig, AllocationRules, ColumnMapping, ExpiryRules, DEFAULT_CW_BRANCH_ID,
    FORECAST_COLUMNS, STOCK_COLUMNS,
};
pub use config_manager::{config_keys, ConfigManager};
pub use config_reader::AllocationConfigReader;
pub use error::{ConfigError, ConfigResult};
