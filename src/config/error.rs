// ==========================================
// 中央仓库存分配系统 - 配置模块错误类型
// ==========================================
// 工具: thiserror 派生宏
// ==========================================

use std::path::PathBuf;
use thiserror::Error;

/// 配置模块错误类型
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("配置文件不存在: {0}")]
    FileNotFound(PathBuf),

    #[error("配置文件读写失败 ({path}): {message}")]
    Io { path: PathBuf, message: String },

    #[error("配置文件格式错误: {0}")]
    Format(#[from] serde_json::Error),

    #[error("配置值无效 (key: {key}): {message}")]
    InvalidValue { key: String, message: String },

    #[error("无法确定默认配置目录")]
    NoConfigDir,
}

/// Result 类型别名
pub type ConfigResult<T> = Result<T, ConfigError>;
