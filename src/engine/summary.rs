// ==========================================
// 中央仓库存分配系统 - 汇总指标引擎
// ==========================================
// 职责: 从分析表/分配结果计算展示用汇总数据
// 红线: 只读计算,不参与分配决策
// ==========================================

use crate::domain::allocation::AllocationOutcome;
use crate::domain::analysis::ChannelDemand;
use crate::domain::summary::{AnalysisSummary, ChannelQuantity, FulfillmentSummary, StatusCount};
use crate::domain::types::{AllocationStatus, BranchId, BranchKey, ChannelId};
use std::collections::{BTreeMap, BTreeSet};

/// 默认 Top-N 渠道数
pub const DEFAULT_TOP_N: usize = 10;

// ==========================================
// SummaryEngine - 汇总指标引擎
// ==========================================
pub struct SummaryEngine {
    top_n: usize,
}

impl SummaryEngine {
    pub fn new() -> Self {
        Self {
            top_n: DEFAULT_TOP_N,
        }
    }

    pub fn with_top_n(top_n: usize) -> Self {
        Self { top_n }
    }

    // ==========================================
    // 核心方法
    // ==========================================

    /// 需求分析汇总
    ///
    /// - 状态分布按 (product, branch) 去重计数,固定输出三种状态
    /// - Top-N 渠道只统计 Allocation Needed 行
    /// - 净需求合计按门店去重（渠道行广播值只计一次）
    pub fn summarize_analysis(&self, analysis: &[ChannelDemand]) -> AnalysisSummary {
        let mut branch_status: BTreeMap<BranchKey, (AllocationStatus, i64)> = BTreeMap::new();
        let mut channel_forecast: BTreeMap<ChannelId, i64> = BTreeMap::new();

        for row in analysis {
            branch_status
                .entry(row.branch_key())
                .or_insert((row.allocation_status, row.branch_net_need));
            if row.needs_allocation() {
                let total = channel_forecast.entry(row.channel_id).or_insert(0);
                *total = total.saturating_add(row.forecast_quantity);
            }
        }

        let status_counts = [
            AllocationStatus::AllocationNeeded,
            AllocationStatus::NoAllocationNeeded,
            AllocationStatus::Overstock,
        ]
        .into_iter()
        .map(|status| StatusCount {
            status,
            branch_count: branch_status.values().filter(|(s, _)| *s == status).count(),
        })
        .collect();

        let total_net_need = branch_status
            .values()
            .filter(|(s, _)| s.needs_allocation())
            .fold(0i64, |acc, (_, need)| acc.saturating_add(*need));

        AnalysisSummary {
            status_counts,
            top_demand_channels: self.top_channels(channel_forecast),
            total_net_need,
        }
    }

    /// 分配满足度汇总
    pub fn summarize_fulfillment(&self, outcome: &AllocationOutcome) -> FulfillmentSummary {
        let total_allocated = outcome.total_allocated();
        let total_unfulfilled = outcome.total_unfulfilled();
        let demand = total_allocated.saturating_add(total_unfulfilled);
        let fulfillment_ratio = if demand > 0 {
            total_allocated as f64 / demand as f64
        } else {
            1.0
        };

        let mut channel_allocated: BTreeMap<ChannelId, i64> = BTreeMap::new();
        for record in &outcome.allocation_plan {
            let total = channel_allocated.entry(record.channel_id).or_insert(0);
            *total = total.saturating_add(record.quantity_allocated);
        }

        FulfillmentSummary {
            total_allocated,
            total_unfulfilled,
            fulfillment_ratio,
            top_allocated_channels: self.top_channels(channel_allocated),
            remaining_cw_stock: outcome.total_remaining(),
        }
    }

    /// 需分配的渠道列表（升序去重,供选择优先渠道）
    pub fn needy_channels(&self, analysis: &[ChannelDemand]) -> Vec<ChannelId> {
        analysis
            .iter()
            .filter(|r| r.needs_allocation())
            .map(|r| r.channel_id)
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    /// 需分配的门店列表（升序去重,供选择优先门店）
    pub fn needy_branches(&self, analysis: &[ChannelDemand]) -> Vec<BranchId> {
        analysis
            .iter()
            .filter(|r| r.needs_allocation())
            .map(|r| r.branch_id)
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    // ==========================================
    // 辅助方法
    // ==========================================

    /// 数量降序取前 N,同数量按渠道编号升序
    fn top_channels(&self, totals: BTreeMap<ChannelId, i64>) -> Vec<ChannelQuantity> {
        let mut channels: Vec<ChannelQuantity> = totals
            .into_iter()
            .map(|(channel_id, quantity)| ChannelQuantity {
                channel_id,
                quantity,
            })
            .collect();
        // BTreeMap 已按渠道升序,稳定排序保留该次序
        channels.sort_by(|a, b| b.quantity.cmp(&a.quantity));
        channels.truncate(self.top_n);
        channels
    }
}

impl Default for SummaryEngine {
    fn default() -> Self {
        Self::new()
    }
}
