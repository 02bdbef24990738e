// ==========================================
// 中央仓库存分配系统 - 导入层
// ==========================================
// 职责: 预测/库存文件导入,生成领域记录与 DQ 报告
// 支持: Excel, CSV
// ==========================================

// 模块声明
pub mod data_cleaner;
pub mod error;
pub mod field_mapper;
pub mod file_parser;
pub mod import_trait;
pub mod record_loader;

// 重导出核心类型
pub use data_cleaner::{CleanedQuantity, DataCleaner};
pub use error::{ImportError, ImportResult};
pub use field_mapper::FieldMapper;
pub use file_parser::{CsvParser, ExcelParser, UniversalFileParser};
pub use import_trait::{FileParser, RawRow, RawTable};
pub use record_loader::{LoadedRecords, RecordLoader, FORECAST_DATASET, STOCK_DATASET};
