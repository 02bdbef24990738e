// ==========================================
// 中央仓库存分配系统 - 导出层
// ==========================================
// 职责: 分析表与分配结果写出为 CSV / JSON
// ==========================================

pub mod csv_writer;
pub mod error;

pub use csv_writer::{
    write_analysis, write_analysis_file, write_outcome_files, write_outcome_json,
    write_outcome_json_file, write_plan, write_remaining_stock, write_unfulfilled, CsvRow,
    OutcomeFiles, ALLOCATION_PLAN_FILE, ANALYSIS_FILE, OUTCOME_JSON_FILE, REMAINING_STOCK_FILE,
    UNFULFILLED_FILE,
};
pub use error::{ExportError, ExportResult};
