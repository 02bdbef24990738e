// ==========================================
// 中央仓库存分配系统 - FEFO 优先级分配引擎
// ==========================================
// 红线: 门店需求池按 (product, branch) 共享,不按渠道拆分
// 红线: 渠道效期不达标的库存对该渠道不可见,不做降级分配
// ==========================================
// 职责: 按优先级顺序,以先到期先出 (FEFO) 分配中央仓批次
// 输入: 需求分析表 + 库存批次 + 分配规则 + 当前时间
// 输出: 调拨计划 + 未满足需求 + 中央仓剩余库存
// ==========================================

use crate::config::allocation_config::AllocationRules;
use crate::domain::allocation::{
    AllocationOutcome, AllocationRecord, SkippedDemand, UnfulfilledDemand,
};
use crate::domain::analysis::ChannelDemand;
use crate::domain::stock::StockBatch;
use crate::domain::stock_pool::CentralStockPool;
use crate::domain::types::{BranchId, BranchKey, SkipReason};
use crate::engine::priority::{DemandLine, DemandPrioritizer};
use chrono::{Duration, NaiveDateTime};
use std::collections::BTreeMap;
use tracing::{debug, info, instrument, warn};
use uuid::Uuid;

// ==========================================
// FefoAllocator - FEFO 分配引擎
// ==========================================
pub struct FefoAllocator {
    prioritizer: DemandPrioritizer,
}

impl FefoAllocator {
    /// 构造函数
    pub fn new() -> Self {
        Self {
            prioritizer: DemandPrioritizer::new(),
        }
    }

    // ==========================================
    // 核心方法
    // ==========================================

    /// 执行一次分配
    ///
    /// 规则:
    /// 1) 只处理 Allocation Needed 行,按优先级排序（见 DemandPrioritizer）
    /// 2) 中央仓批次深拷贝为工作副本,按 (product, expiry) 升序
    /// 3) 门店剩余需求 <= 0 的行跳过
    /// 4) 本行目标 = min(渠道预测, 门店剩余需求)
    /// 5) 仅从 expiry >= now + 渠道效期天数 的批次按 FEFO 扣减
    /// 6) 无合格批次时整行跳过
    /// 7) 门店剩余需求 > 0 的记入未满足需求
    ///
    /// # 参数
    /// - `analysis`: 需求分析表（只读）
    /// - `stocks`: 库存批次（只读,可含非中央仓批次）
    /// - `cw_branch_id`: 中央仓编号
    /// - `rules`: 优先渠道/门店 + 渠道效期规则
    /// - `now`: 效期判断基准时间
    ///
    /// # 返回
    /// 本次运行的完整输出（每次调用都是全新结果）
    #[instrument(skip(self, analysis, stocks, rules), fields(
        analysis_rows = analysis.len(),
        stocks_count = stocks.len(),
        priority_channels = rules.priority_channels.len(),
        priority_branches = rules.priority_branches.len()
    ))]
    pub fn allocate(
        &self,
        analysis: &[ChannelDemand],
        stocks: &[StockBatch],
        cw_branch_id: BranchId,
        rules: &AllocationRules,
        now: NaiveDateTime,
    ) -> AllocationOutcome {
        let run_id = Uuid::new_v4().to_string();

        // 1. 需求行排序
        let lines = self.prioritizer.prioritize(analysis, rules);

        // 2. 中央仓工作副本
        let mut pool = CentralStockPool::from_stock(stocks, cw_branch_id);

        info!(
            run_id = %run_id,
            demand_lines = lines.len(),
            cw_batches = pool.batch_count(),
            cw_stock = pool.total_available(),
            "开始执行 FEFO 分配"
        );

        // 3. 门店需求跟踪（BTreeMap 保证未满足需求输出顺序稳定）
        let original_need = self.initial_branch_need(&lines);
        let mut remaining_need = original_need.clone();

        let mut allocation_plan = Vec::new();
        let mut skipped_demands = Vec::new();

        // 4. 逐行分配
        for line in &lines {
            let demand = &line.demand;
            let key = demand.branch_key();
            let branch_remaining = remaining_need.get(&key).copied().unwrap_or(0);

            if branch_remaining <= 0 {
                self.record_skip(&mut skipped_demands, line, SkipReason::BranchNeedSatisfied);
                continue;
            }

            let target = demand.forecast_quantity.min(branch_remaining);
            let min_days = rules.expiry_rules.min_days_for(demand.channel_id);
            let required_at = self.required_expiry(now, min_days);

            if !pool.has_eligible_batch(demand.product_id, required_at) {
                self.record_skip(&mut skipped_demands, line, SkipReason::NoEligibleBatch);
                continue;
            }

            let draws = pool.draw(demand.product_id, required_at, target);
            let fulfilled: i64 = draws.iter().map(|d| d.quantity).sum();

            allocation_plan.extend(draws.into_iter().map(|draw| AllocationRecord {
                product_id: demand.product_id,
                from_branch: cw_branch_id,
                to_branch: demand.branch_id,
                channel_id: demand.channel_id,
                quantity_allocated: draw.quantity,
                expiry_date: draw.expiry_date,
            }));

            if fulfilled == 0 {
                self.record_skip(&mut skipped_demands, line, SkipReason::EligibleStockExhausted);
            } else if fulfilled < target {
                warn!(
                    product_id = demand.product_id,
                    branch_id = demand.branch_id,
                    channel_id = demand.channel_id,
                    target,
                    fulfilled,
                    min_expiry_days = min_days,
                    "需求行仅部分满足"
                );
            }

            if let Some(need) = remaining_need.get_mut(&key) {
                *need -= fulfilled;
            }
        }

        // 5. 未满足需求
        let unfulfilled_demands = self.collect_unfulfilled(&original_need, &remaining_need);

        // 6. 剩余库存快照
        let remaining_stock = pool.remaining();

        let outcome = AllocationOutcome {
            run_id,
            generated_at: now,
            allocation_plan,
            unfulfilled_demands,
            remaining_stock,
            skipped_demands,
        };

        info!(
            run_id = %outcome.run_id,
            allocation_records = outcome.allocation_plan.len(),
            total_allocated = outcome.total_allocated(),
            unfulfilled_branches = outcome.unfulfilled_demands.len(),
            total_unfulfilled = outcome.total_unfulfilled(),
            remaining_cw_stock = outcome.total_remaining(),
            "FEFO 分配完成"
        );

        outcome
    }

    // ==========================================
    // 辅助方法
    // ==========================================

    /// 门店初始需求（取每个门店首行的 branch_net_need,各渠道行相同）
    fn initial_branch_need(&self, lines: &[DemandLine]) -> BTreeMap<BranchKey, i64> {
        let mut need = BTreeMap::new();
        for line in lines {
            need.entry(line.demand.branch_key())
                .or_insert(line.demand.branch_net_need);
        }
        need
    }

    /// 渠道要求的最早到期时间
    ///
    /// 溢出时返回 NaiveDateTime::MAX（即无批次合格）
    fn required_expiry(&self, now: NaiveDateTime, min_days: i64) -> NaiveDateTime {
        Duration::try_days(min_days)
            .and_then(|days| now.checked_add_signed(days))
            .unwrap_or(NaiveDateTime::MAX)
    }

    fn collect_unfulfilled(
        &self,
        original_need: &BTreeMap<BranchKey, i64>,
        remaining_need: &BTreeMap<BranchKey, i64>,
    ) -> Vec<UnfulfilledDemand> {
        remaining_need
            .iter()
            .filter(|(_, &remaining)| remaining > 0)
            .map(|(&(product_id, branch_id), &remaining)| {
                let needed = original_need
                    .get(&(product_id, branch_id))
                    .copied()
                    .unwrap_or(remaining);
                UnfulfilledDemand {
                    product_id,
                    branch_id,
                    needed,
                    fulfilled: needed - remaining,
                    unfulfilled: remaining,
                }
            })
            .collect()
    }

    fn record_skip(&self, skipped: &mut Vec<SkippedDemand>, line: &DemandLine, reason: SkipReason) {
        debug!(
            product_id = line.demand.product_id,
            branch_id = line.demand.branch_id,
            channel_id = line.demand.channel_id,
            reason = %reason,
            sort_reason = %self.prioritizer.generate_sort_reason(line),
            "需求行未分配"
        );
        skipped.push(SkippedDemand {
            product_id: line.demand.product_id,
            branch_id: line.demand.branch_id,
            channel_id: line.demand.channel_id,
            reason,
        });
    }
}

// ==========================================
// Default trait 实现
// ==========================================
impl Default for FefoAllocator {
    fn default() -> Self {
        Self::new()
    }
}
