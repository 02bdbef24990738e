// ==========================================
// 中央仓库存分配系统 - 领域模型层
// ==========================================
// 职责: 定义输入表、分析表、分配结果表的实体与类型
// 红线: 不含文件读写逻辑,不含引擎逻辑
// ==========================================

pub mod allocation;
pub mod analysis;
pub mod forecast;
pub mod import_report;
pub mod stock;
pub mod stock_pool;
pub mod summary;
pub mod types;

// 重导出核心类型
pub use allocation::{AllocationOutcome, AllocationRecord, SkippedDemand, UnfulfilledDemand};
pub use analysis::ChannelDemand;
pub use forecast::ForecastRecord;
pub use import_report::{DqLevel, DqReport, DqSummary, DqViolation};
pub use stock::StockBatch;
pub use stock_pool::{BatchDraw, CentralStockPool};
pub use summary::{AnalysisSummary, ChannelQuantity, FulfillmentSummary, StatusCount};
pub use types::{
    AllocationStatus, BranchId, BranchKey, ChannelId, PriorityRank, ProductId, SkipReason,
};
