// ==========================================
// 中央仓库存分配系统 - 分配会话
// ==========================================
// 职责: 持有一次导入的输入数据与分析结果,支持以不同规则多次分配
// 红线: 存储的库存数据只读,每次 allocate 都从原始库存开始
// ==========================================

use crate::config::allocation_config::AllocationRules;
use crate::domain::allocation::AllocationOutcome;
use crate::domain::analysis::ChannelDemand;
use crate::domain::forecast::ForecastRecord;
use crate::domain::stock::StockBatch;
use crate::domain::summary::{AnalysisSummary, FulfillmentSummary};
use crate::domain::types::{BranchId, ChannelId};
use crate::engine::allocator::FefoAllocator;
use crate::engine::analyzer::DemandAnalyzer;
use crate::engine::summary::SummaryEngine;
use crate::perf::PerfGuard;
use chrono::{Local, NaiveDateTime};

// ==========================================
// AllocationSession - 分配会话
// ==========================================
pub struct AllocationSession {
    forecasts: Vec<ForecastRecord>,
    stocks: Vec<StockBatch>,
    cw_branch_id: BranchId,
    analysis: Vec<ChannelDemand>,
    allocator: FefoAllocator,
    summary_engine: SummaryEngine,
}

impl AllocationSession {
    /// 创建会话并立即执行需求分析
    pub fn new(forecasts: Vec<ForecastRecord>, stocks: Vec<StockBatch>, cw_branch_id: BranchId) -> Self {
        let analysis = {
            let _perf = PerfGuard::new("demand_analysis");
            DemandAnalyzer::new().analyze(&forecasts, &stocks, cw_branch_id)
        };

        Self {
            forecasts,
            stocks,
            cw_branch_id,
            analysis,
            allocator: FefoAllocator::new(),
            summary_engine: SummaryEngine::new(),
        }
    }

    // ==========================================
    // 查询方法
    // ==========================================

    pub fn analysis(&self) -> &[ChannelDemand] {
        &self.analysis
    }

    pub fn forecasts(&self) -> &[ForecastRecord] {
        &self.forecasts
    }

    pub fn stocks(&self) -> &[StockBatch] {
        &self.stocks
    }

    pub fn cw_branch_id(&self) -> BranchId {
        self.cw_branch_id
    }

    pub fn analysis_summary(&self) -> AnalysisSummary {
        self.summary_engine.summarize_analysis(&self.analysis)
    }

    pub fn fulfillment_summary(&self, outcome: &AllocationOutcome) -> FulfillmentSummary {
        self.summary_engine.summarize_fulfillment(outcome)
    }

    /// 可选作优先渠道的渠道（存在需分配行）
    pub fn needy_channels(&self) -> Vec<ChannelId> {
        self.summary_engine.needy_channels(&self.analysis)
    }

    /// 可选作优先门店的门店（存在需分配行）
    pub fn needy_branches(&self) -> Vec<BranchId> {
        self.summary_engine.needy_branches(&self.analysis)
    }

    // ==========================================
    // 分配方法
    // ==========================================

    /// 以指定规则和时间执行一次分配
    pub fn allocate(&self, rules: &AllocationRules, now: NaiveDateTime) -> AllocationOutcome {
        let _perf = PerfGuard::new("fefo_allocation");
        self.allocator
            .allocate(&self.analysis, &self.stocks, self.cw_branch_id, rules, now)
    }

    /// 以本地当前时间执行一次分配
    pub fn allocate_now(&self, rules: &AllocationRules) -> AllocationOutcome {
        self.allocate(rules, Local::now().naive_local())
    }
}
