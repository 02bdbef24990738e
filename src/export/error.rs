// ==========================================
// 中央仓库存分配系统 - 导出模块错误类型
// ==========================================

use std::path::PathBuf;
use thiserror::Error;

/// 导出模块错误类型
#[derive(Error, Debug)]
pub enum ExportError {
    #[error("输出目录创建失败 ({path}): {message}")]
    CreateDir { path: PathBuf, message: String },

    #[error("文件写入失败 ({path}): {message}")]
    WriteFile { path: PathBuf, message: String },

    #[error("CSV 写入失败: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON 序列化失败: {0}")]
    Json(#[from] serde_json::Error),

    #[error("写入失败: {0}")]
    Io(#[from] std::io::Error),
}

/// Result 类型别名
pub type ExportResult<T> = Result<T, ExportError>;
