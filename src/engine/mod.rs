// ==========================================
// 中央仓库存分配系统 - 引擎层
// ==========================================
// 职责: 需求分析、优先级排序、FEFO 分配、汇总指标
// 红线: 引擎不读写文件, 所有未分配的需求行必须输出 reason
// ==========================================

pub mod allocator;
pub mod analyzer;
pub mod orchestrator;
pub mod priority;
pub mod session;
pub mod summary;

// 重导出核心引擎
pub use allocator::FefoAllocator;
pub use analyzer::DemandAnalyzer;
pub use orchestrator::{AllocationOrchestrator, AllocationRun, LoadedInputs};
pub use priority::{DemandLine, DemandPrioritizer};
pub use session::AllocationSession;
pub use summary::{SummaryEngine, DEFAULT_TOP_N};
