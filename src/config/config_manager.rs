// ==========================================
// 中央仓库存分配系统 - 配置管理器
// ==========================================
// 职责: 配置加载、校验、保存、快照
// 存储: JSON 配置文件
// ==========================================

use crate::config::allocation_config::{
    AllocationConfig, AllocationRules, ColumnMapping, FORECAST_COLUMNS, STOCK_COLUMNS,
};
use crate::config::config_reader::AllocationConfigReader;
use crate::config::error::{ConfigError, ConfigResult};
use crate::domain::types::BranchId;
use std::fs;
use std::path::{Path, PathBuf};

// ==========================================
// ConfigManager - 配置管理器
// ==========================================
#[derive(Debug, Clone)]
pub struct ConfigManager {
    config: AllocationConfig,
    source_path: Option<PathBuf>,
}

impl ConfigManager {
    /// 从内存配置创建（不关联文件）
    pub fn from_config(config: AllocationConfig) -> ConfigResult<Self> {
        Self::validate(&config)?;
        Ok(Self {
            config,
            source_path: None,
        })
    }

    /// 从 JSON 配置文件加载
    ///
    /// # 参数
    /// - path: 配置文件路径
    ///
    /// # 返回
    /// - Err(FileNotFound): 文件不存在
    /// - Err(Format): JSON 格式错误
    /// - Err(InvalidValue): 校验失败
    pub fn load<P: AsRef<Path>>(path: P) -> ConfigResult<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(ConfigError::FileNotFound(path.to_path_buf()));
        }

        let raw = fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        let config: AllocationConfig = serde_json::from_str(&raw)?;
        Self::validate(&config)?;

        tracing::info!(
            path = %path.display(),
            cw_branch_id = config.cw_branch_id,
            priority_channels = config.rules.priority_channels.len(),
            priority_branches = config.rules.priority_branches.len(),
            expiry_rules = config.rules.expiry_rules.len(),
            "配置加载完成"
        );

        Ok(Self {
            config,
            source_path: Some(path.to_path_buf()),
        })
    }

    /// 加载配置文件，文件不存在时使用默认配置
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> ConfigResult<Self> {
        match Self::load(path.as_ref()) {
            Ok(manager) => Ok(manager),
            Err(ConfigError::FileNotFound(p)) => {
                tracing::info!(path = %p.display(), "配置文件不存在，使用默认配置");
                Self::from_config(AllocationConfig::default())
            }
            Err(e) => Err(e),
        }
    }

    /// 保存到 JSON 文件（自动创建父目录）
    pub fn save<P: AsRef<Path>>(&self, path: P) -> ConfigResult<()> {
        let path = path.as_ref();
        let io_err = |e: std::io::Error| ConfigError::Io {
            path: path.to_path_buf(),
            message: e.to_string(),
        };

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(io_err)?;
            }
        }

        let json = serde_json::to_string_pretty(&self.config)?;
        fs::write(path, json).map_err(io_err)?;

        tracing::info!(path = %path.display(), "配置已保存");
        Ok(())
    }

    /// 默认配置文件路径
    ///
    /// 优先级:
    /// 1. 环境变量 STOCK_ALLOCATION_CONFIG
    /// 2. 用户配置目录/stock-allocation/config.json
    pub fn default_config_path() -> ConfigResult<PathBuf> {
        if let Ok(path) = std::env::var(config_keys::CONFIG_PATH_ENV) {
            let trimmed = path.trim();
            if !trimmed.is_empty() {
                return Ok(PathBuf::from(trimmed));
            }
        }

        dirs::config_dir()
            .map(|dir| dir.join(config_keys::APP_DIR).join(config_keys::CONFIG_FILE))
            .ok_or(ConfigError::NoConfigDir)
    }

    /// 配置快照（JSON）
    ///
    /// 用途: 随分配结果一起记录本次运行使用的配置
    pub fn get_config_snapshot(&self) -> ConfigResult<String> {
        Ok(serde_json::to_string(&self.config)?)
    }

    pub fn config(&self) -> &AllocationConfig {
        &self.config
    }

    pub fn source_path(&self) -> Option<&Path> {
        self.source_path.as_deref()
    }

    /// 覆写分配规则（命令行参数等更高优先级来源）
    pub fn override_rules(&mut self, rules: AllocationRules) -> ConfigResult<()> {
        let mut next = self.config.clone();
        next.rules = rules;
        Self::validate(&next)?;
        self.config = next;
        Ok(())
    }

    /// 覆写中央仓编号
    pub fn override_cw_branch_id(&mut self, cw_branch_id: BranchId) {
        self.config.cw_branch_id = cw_branch_id;
    }

    // ==========================================
    // 校验
    // ==========================================

    /// 校验配置
    ///
    /// 规则:
    /// - 效期天数不得为负
    /// - 列映射必须覆盖全部内部列，且源列名非空
    pub fn validate(config: &AllocationConfig) -> ConfigResult<()> {
        for (channel_id, days) in config.rules.expiry_rules.iter() {
            if *days < 0 {
                return Err(ConfigError::InvalidValue {
                    key: format!("{}.{}", config_keys::EXPIRY_RULES, channel_id),
                    message: format!("最短效期天数不能为负: {}", days),
                });
            }
        }

        Self::validate_mapping(
            &config.forecast_mapping,
            &FORECAST_COLUMNS,
            config_keys::FORECAST_MAPPING,
        )?;
        Self::validate_mapping(&config.stock_mapping, &STOCK_COLUMNS, config_keys::STOCK_MAPPING)?;
        Ok(())
    }

    fn validate_mapping(mapping: &ColumnMapping, required: &[&str], key: &str) -> ConfigResult<()> {
        for internal in required {
            match mapping.source_column(internal) {
                Some(source) if !source.trim().is_empty() => {}
                _ => {
                    return Err(ConfigError::InvalidValue {
                        key: format!("{}.{}", key, internal),
                        message: "缺少源列映射".to_string(),
                    })
                }
            }
        }
        Ok(())
    }
}

// ==========================================
// AllocationConfigReader Trait 实现
// ==========================================
impl AllocationConfigReader for ConfigManager {
    fn get_cw_branch_id(&self) -> ConfigResult<BranchId> {
        Ok(self.config.cw_branch_id)
    }

    fn get_allocation_rules(&self) -> ConfigResult<AllocationRules> {
        Ok(self.config.rules.clone())
    }

    fn get_forecast_mapping(&self) -> ConfigResult<ColumnMapping> {
        Ok(self.config.forecast_mapping.clone())
    }

    fn get_stock_mapping(&self) -> ConfigResult<ColumnMapping> {
        Ok(self.config.stock_mapping.clone())
    }
}

impl AllocationConfigReader for AllocationConfig {
    fn get_cw_branch_id(&self) -> ConfigResult<BranchId> {
        Ok(self.cw_branch_id)
    }

    fn get_allocation_rules(&self) -> ConfigResult<AllocationRules> {
        Ok(self.rules.clone())
    }

    fn get_forecast_mapping(&self) -> ConfigResult<ColumnMapping> {
        Ok(self.forecast_mapping.clone())
    }

    fn get_stock_mapping(&self) -> ConfigResult<ColumnMapping> {
        Ok(self.stock_mapping.clone())
    }
}

// ==========================================
// 配置键常量
// ==========================================
pub mod config_keys {
    // 环境变量
    pub const CONFIG_PATH_ENV: &str = "STOCK_ALLOCATION_CONFIG";

    // 默认路径
    pub const APP_DIR: &str = "stock-allocation";
    pub const CONFIG_FILE: &str = "config.json";

    // JSON 键
    pub const CW_BRANCH_ID: &str = "cw_branch_id";
    pub const EXPIRY_RULES: &str = "rules.expiry_rules";
    pub const FORECAST_MAPPING: &str = "forecast_mapping";
    pub const STOCK_MAPPING: &str = "stock_mapping";
}
