// ==========================================
// 中央仓库存分配系统 - 分配配置对象
// ==========================================
// 职责: 中央仓编号、优先渠道/门店、渠道效期规则、列映射
// 存储: JSON 配置文件（见 ConfigManager）
// ==========================================

use crate::domain::types::{BranchId, ChannelId};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// 默认中央仓编号
pub const DEFAULT_CW_BRANCH_ID: BranchId = 1000;

// ==========================================
// ExpiryRules - 渠道效期规则
// ==========================================
// channel_id → 距“当前时间”的最短剩余效期（天）
// 未配置的渠道按 0 天处理
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ExpiryRules(BTreeMap<ChannelId, i64>);

impl ExpiryRules {
    pub fn new() -> Self {
        Self(BTreeMap::new())
    }

    /// 现行的标准渠道效期表
    pub fn standard() -> Self {
        [
            (10, 180),
            (20, 135),
            (30, 90),
            (40, 150),
            (50, 180),
            (60, 180),
            (65, 90),
            (70, 45),
            (75, 90),
            (90, 90),
        ]
        .into_iter()
        .collect()
    }

    pub fn with_rule(mut self, channel_id: ChannelId, min_days: i64) -> Self {
        self.0.insert(channel_id, min_days);
        self
    }

    pub fn insert(&mut self, channel_id: ChannelId, min_days: i64) {
        self.0.insert(channel_id, min_days);
    }

    /// 渠道最短效期天数（未配置返回 0）
    pub fn min_days_for(&self, channel_id: ChannelId) -> i64 {
        self.0.get(&channel_id).copied().unwrap_or(0)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&ChannelId, &i64)> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<(ChannelId, i64)> for ExpiryRules {
    fn from_iter<T: IntoIterator<Item = (ChannelId, i64)>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}

// ==========================================
// AllocationRules - 单次分配运行的规则
// ==========================================
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AllocationRules {
    /// 优先渠道（第一优先级）
    #[serde(default)]
    pub priority_channels: BTreeSet<ChannelId>,

    /// 优先门店（第二优先级）
    #[serde(default)]
    pub priority_branches: BTreeSet<BranchId>,

    /// 渠道效期规则
    #[serde(default)]
    pub expiry_rules: ExpiryRules,
}

impl AllocationRules {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_priority_channels<I: IntoIterator<Item = ChannelId>>(mut self, channels: I) -> Self {
        self.priority_channels = channels.into_iter().collect();
        self
    }

    pub fn with_priority_branches<I: IntoIterator<Item = BranchId>>(mut self, branches: I) -> Self {
        self.priority_branches = branches.into_iter().collect();
        self
    }

    pub fn with_expiry_rules(mut self, expiry_rules: ExpiryRules) -> Self {
        self.expiry_rules = expiry_rules;
        self
    }

    pub fn is_priority_channel(&self, channel_id: ChannelId) -> bool {
        self.priority_channels.contains(&channel_id)
    }

    pub fn is_priority_branch(&self, branch_id: BranchId) -> bool {
        self.priority_branches.contains(&branch_id)
    }
}

// ==========================================
// ColumnMapping - 列映射（内部列名 → 源文件列名）
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ColumnMapping(BTreeMap<String, String>);

/// 预测表内部列
pub const FORECAST_COLUMNS: [&str; 4] = ["product_id", "branch_id", "channel_id", "forecast_quantity"];

/// 库存表内部列
pub const STOCK_COLUMNS: [&str; 4] = ["product_id", "branch_id", "stock_available", "expiry_date"];

impl ColumnMapping {
    /// 同名映射（源文件直接使用内部列名）
    pub fn identity(columns: &[&str]) -> Self {
        Self(
            columns
                .iter()
                .map(|c| (c.to_string(), c.to_string()))
                .collect(),
        )
    }

    pub fn forecast_default() -> Self {
        Self::identity(&FORECAST_COLUMNS)
    }

    pub fn stock_default() -> Self {
        Self::identity(&STOCK_COLUMNS)
    }

    pub fn with_column(mut self, internal: &str, source: &str) -> Self {
        self.0.insert(internal.to_string(), source.to_string());
        self
    }

    /// 查询内部列对应的源列名
    pub fn source_column(&self, internal: &str) -> Option<&str> {
        self.0.get(internal).map(|s| s.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &String)> {
        self.0.iter()
    }
}

// ==========================================
// AllocationConfig - 配置文件根对象
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AllocationConfig {
    /// 中央仓编号
    #[serde(default = "default_cw_branch_id")]
    pub cw_branch_id: BranchId,

    /// 分配规则
    #[serde(default)]
    pub rules: AllocationRules,

    /// 预测文件列映射
    #[serde(default = "ColumnMapping::forecast_default")]
    pub forecast_mapping: ColumnMapping,

    /// 库存文件列映射
    #[serde(default = "ColumnMapping::stock_default")]
    pub stock_mapping: ColumnMapping,
}

fn default_cw_branch_id() -> BranchId {
    DEFAULT_CW_BRANCH_ID
}

impl Default for AllocationConfig {
    fn default() -> Self {
        Self {
            cw_branch_id: DEFAULT_CW_BRANCH_ID,
            rules: AllocationRules::default(),
            forecast_mapping: ColumnMapping::forecast_default(),
            stock_mapping: ColumnMapping::stock_default(),
        }
    }
}
