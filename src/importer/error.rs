// ==========================================
// 中央仓库存分配系统 - 导入模块错误类型
// ==========================================
// 文件级错误: 整个文件拒绝导入
// 行级问题不在此处,记入 DqReport
// ==========================================

use crate::config::error::ConfigError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ImportError {
    // ----- 文件读取 -----
    #[error("输入文件不存在: {0}")]
    FileNotFound(String),

    #[error("不支持的输入文件类型: {0}（可用 .csv / .xlsx / .xls）")]
    UnsupportedFormat(String),

    #[error("读取输入文件出错: {0}")]
    FileReadError(String),

    #[error("Excel 文件解析出错: {0}")]
    ExcelParseError(String),

    #[error("CSV 文件解析出错: {0}")]
    CsvParseError(String),

    // ----- 表结构 -----
    #[error("Column '{column}' not found in {dataset} file.")]
    MissingColumn { dataset: String, column: String },

    #[error("列映射缺少内部列 {column} ({dataset})")]
    UnmappedColumn { dataset: String, column: String },

    // ----- 配置 -----
    #[error("配置读取失败: {0}")]
    ConfigReadError(#[from] ConfigError),
}

impl From<std::io::Error> for ImportError {
    fn from(err: std::io::Error) -> Self {
        match err.kind() {
            std::io::ErrorKind::NotFound => ImportError::FileNotFound(err.to_string()),
            _ => ImportError::FileReadError(err.to_string()),
        }
    }
}

impl From<csv::Error> for ImportError {
    fn from(err: csv::Error) -> Self {
        match err.position() {
            Some(pos) => ImportError::CsvParseError(format!("第 {} 行: {}", pos.line(), err)),
            None => ImportError::CsvParseError(err.to_string()),
        }
    }
}

impl From<calamine::Error> for ImportError {
    fn from(err: calamine::Error) -> Self {
        ImportError::ExcelParseError(err.to_string())
    }
}

pub type ImportResult<T> = Result<T, ImportError>;
