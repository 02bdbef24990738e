// ==========================================
// 中央仓库存分配系统 - 核心库
// ==========================================
// 流程: 预测 + 库存 → 需求分析 → 优先级 FEFO 分配 → 调拨计划
// 系统定位: 决策支持（调拨计划由人工确认后执行）
// ==========================================

// ==========================================
// 模块声明
// ==========================================

// 领域层 - 实体与类型
pub mod domain;

// 引擎层 - 业务规则
pub mod engine;

// 导入层 - 外部数据
pub mod importer;

// 导出层 - 结果表
pub mod export;

// 配置层 - 系统配置
pub mod config;

// 日志系统
pub mod logging;

// 性能统计
pub mod perf;

// ==========================================
// 重导出核心类型
// ==========================================

// 领域类型
pub use domain::types::{AllocationStatus, BranchId, ChannelId, PriorityRank, ProductId, SkipReason};

// 领域实体
pub use domain::{
    AllocationOutcome, AllocationRecord, ChannelDemand, ForecastRecord, StockBatch,
    UnfulfilledDemand,
};

// 引擎
pub use engine::{
    AllocationOrchestrator, AllocationSession, DemandAnalyzer, DemandPrioritizer, FefoAllocator,
    SummaryEngine,
};

// 配置
pub use config::{AllocationConfig, AllocationRules, ConfigManager, ExpiryRules};

// ==========================================
// 常量定义
// ==========================================

// 系统版本
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// 系统名称
pub const APP_NAME: &str = "中央仓库存分配系统";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
    }
}
