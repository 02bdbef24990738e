// ==========================================
// Mock 配置实现 - 用于集成测试
// ==========================================
#![allow(dead_code)]

use stock_allocation::config::{
    AllocationConfigReader, AllocationRules, ColumnMapping, ConfigError, ConfigResult,
    DEFAULT_CW_BRANCH_ID,
};
use stock_allocation::domain::BranchId;

/// Mock 配置结构
#[derive(Debug, Clone)]
pub struct MockConfig {
    pub cw_branch_id: BranchId,
    pub rules: AllocationRules,
    pub forecast_mapping: ColumnMapping,
    pub stock_mapping: ColumnMapping,
    pub fail_rules: bool, // 模拟规则读取失败
}

impl MockConfig {
    pub fn new() -> Self {
        Self {
            cw_branch_id: DEFAULT_CW_BRANCH_ID,
            rules: AllocationRules::new(),
            forecast_mapping: ColumnMapping::forecast_default(),
            stock_mapping: ColumnMapping::stock_default(),
            fail_rules: false,
        }
    }

    pub fn with_rules(mut self, rules: AllocationRules) -> Self {
        self.rules = rules;
        self
    }
}

impl AllocationConfigReader for MockConfig {
    fn get_cw_branch_id(&self) -> ConfigResult<BranchId> {
        Ok(self.cw_branch_id)
    }

    fn get_allocation_rules(&self) -> ConfigResult<AllocationRules> {
        if self.fail_rules {
            return Err(ConfigError::InvalidValue {
                key: "rules".to_string(),
                message: "mock failure".to_string(),
            });
        }
        Ok(self.rules.clone())
    }

    fn get_forecast_mapping(&self) -> ConfigResult<ColumnMapping> {
        Ok(self.forecast_mapping.clone())
    }

    fn get_stock_mapping(&self) -> ConfigResult<ColumnMapping> {
        Ok(self.stock_mapping.clone())
    }
}
