// ==========================================
// 中央仓库存分配系统 - 需求分析引擎
// ==========================================
// 职责: 汇总预测与门店库存,计算门店净需求与渠道行状态
// 输入: 预测记录 + 库存批次 + 中央仓编号
// 输出: 渠道级需求分析表（按 product/branch/channel 升序）
// 红线: 纯函数,不修改任何输入
// ==========================================

use crate::domain::analysis::ChannelDemand;
use crate::domain::forecast::ForecastRecord;
use crate::domain::stock::StockBatch;
use crate::domain::types::{AllocationStatus, BranchId, BranchKey, ChannelId, ProductId};
use std::collections::{BTreeMap, HashMap};
use tracing::instrument;

// ==========================================
// DemandAnalyzer - 需求分析引擎
// ==========================================
pub struct DemandAnalyzer {
    // 无状态引擎,不需要注入依赖
}

impl DemandAnalyzer {
    /// 构造函数
    pub fn new() -> Self {
        Self {}
    }

    // ==========================================
    // 核心方法
    // ==========================================

    /// 执行需求分析
    ///
    /// 步骤:
    /// 1) 门店库存 = 非中央仓库存按 (product, branch) 求和
    /// 2) 渠道预测按 (product, branch, channel) 求和
    /// 3) 左连接门店库存,无库存记录按 0 计
    /// 4) 门店预测合计 = 同门店全部渠道预测之和（广播到各渠道行）
    /// 5) 净需求 = 门店预测合计 - 门店库存（广播到各渠道行）
    /// 6) 按净需求符号分类状态
    ///
    /// # 参数
    /// - `forecasts`: 预测记录
    /// - `stocks`: 全部库存批次（含中央仓）
    /// - `cw_branch_id`: 中央仓编号（其库存不计入门店现有库存）
    ///
    /// # 返回
    /// 渠道级需求分析行,每个 (product, branch, channel) 一行
    #[instrument(skip(self, forecasts, stocks), fields(
        forecasts_count = forecasts.len(),
        stocks_count = stocks.len()
    ))]
    pub fn analyze(
        &self,
        forecasts: &[ForecastRecord],
        stocks: &[StockBatch],
        cw_branch_id: BranchId,
    ) -> Vec<ChannelDemand> {
        // 1. 门店现有库存（排除中央仓）
        let branch_stock = self.aggregate_destination_stock(stocks, cw_branch_id);

        // 2. 渠道预测合计（BTreeMap 保证输出顺序稳定）
        let channel_forecast = self.aggregate_channel_forecast(forecasts);

        // 3. 门店预测合计
        let mut branch_forecast: HashMap<BranchKey, i64> = HashMap::new();
        for (&(product_id, branch_id, _), &quantity) in channel_forecast.iter() {
            let total = branch_forecast.entry((product_id, branch_id)).or_insert(0);
            *total = total.saturating_add(quantity);
        }

        // 4. 组装分析行
        let analysis: Vec<ChannelDemand> = channel_forecast
            .into_iter()
            .map(|((product_id, branch_id, channel_id), forecast_quantity)| {
                let key = (product_id, branch_id);
                let total_stock_available = branch_stock.get(&key).copied().unwrap_or(0);
                let total_forecast_at_branch = branch_forecast.get(&key).copied().unwrap_or(0);
                let branch_net_need = total_forecast_at_branch.saturating_sub(total_stock_available);

                ChannelDemand {
                    product_id,
                    branch_id,
                    channel_id,
                    forecast_quantity,
                    total_stock_available,
                    total_forecast_at_branch,
                    branch_net_need,
                    allocation_status: AllocationStatus::from_net_need(branch_net_need),
                }
            })
            .collect();

        tracing::info!(
            rows = analysis.len(),
            branches = branch_forecast.len(),
            needing_allocation = analysis.iter().filter(|r| r.needs_allocation()).count(),
            "需求分析完成"
        );

        analysis
    }

    // ==========================================
    // 辅助方法
    // ==========================================

    /// 门店现有库存汇总（不含中央仓）
    fn aggregate_destination_stock(
        &self,
        stocks: &[StockBatch],
        cw_branch_id: BranchId,
    ) -> HashMap<BranchKey, i64> {
        let mut branch_stock: HashMap<BranchKey, i64> = HashMap::new();
        for batch in stocks.iter().filter(|b| !b.is_located_at(cw_branch_id)) {
            let total = branch_stock.entry(batch.branch_key()).or_insert(0);
            *total = total.saturating_add(batch.stock_available);
        }
        branch_stock
    }

    /// 渠道预测汇总
    fn aggregate_channel_forecast(
        &self,
        forecasts: &[ForecastRecord],
    ) -> BTreeMap<(ProductId, BranchId, ChannelId), i64> {
        let mut channel_forecast: BTreeMap<(ProductId, BranchId, ChannelId), i64> = BTreeMap::new();
        for record in forecasts {
            let total = channel_forecast.entry(record.channel_key()).or_insert(0);
            *total = total.saturating_add(record.forecast_quantity);
        }
        channel_forecast
    }
}

// ==========================================
// Default trait 实现
// ==========================================
impl Default for DemandAnalyzer {
    fn default() -> Self {
        Self::new()
    }
}

// ==========================================
// 测试模块
// ==========================================
#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    const CW: BranchId = 1000;

    fn expiry() -> NaiveDate {
        NaiveDate::from_ymd_opt(2027, 1, 1).unwrap()
    }

    #[test]
    fn test_duplicate_forecast_rows_are_summed() {
        let analyzer = DemandAnalyzer::new();
        let forecasts = vec![
            ForecastRecord::new(1, 10, 100, 5),
            ForecastRecord::new(1, 10, 100, 7),
        ];

        let analysis = analyzer.analyze(&forecasts, &[], CW);

        assert_eq!(analysis.len(), 1);
        assert_eq!(analysis[0].forecast_quantity, 12);
        assert_eq!(analysis[0].total_stock_available, 0);
        assert_eq!(analysis[0].branch_net_need, 12);
    }

    #[test]
    fn test_sums_near_i64_max_saturate() {
        let analyzer = DemandAnalyzer::new();
        let forecasts = vec![
            ForecastRecord::new(1, 10, 100, i64::MAX),
            ForecastRecord::new(1, 10, 100, 5),
            ForecastRecord::new(1, 10, 200, i64::MAX),
        ];
        let stocks = vec![
            StockBatch::new(1, 10, i64::MAX, expiry()),
            StockBatch::new(1, 10, 1, expiry()),
        ];

        let analysis = analyzer.analyze(&forecasts, &stocks, CW);

        assert_eq!(analysis.len(), 2);
        assert_eq!(analysis[0].forecast_quantity, i64::MAX);
        assert_eq!(analysis[0].total_forecast_at_branch, i64::MAX);
        assert_eq!(analysis[0].total_stock_available, i64::MAX);
        assert_eq!(analysis[0].branch_net_need, 0);
        assert_eq!(analysis[0].allocation_status, AllocationStatus::NoAllocationNeeded);
    }

    #[test]
    fn test_central_warehouse_stock_is_excluded() {
        let analyzer = DemandAnalyzer::new();
        let forecasts = vec![ForecastRecord::new(1, 10, 100, 50)];
        let stocks = vec![
            StockBatch::new(1, 10, 20, expiry()),
            StockBatch::new(1, 10, 5, expiry()),
            StockBatch::new(1, CW, 999, expiry()),
        ];

        let analysis = analyzer.analyze(&forecasts, &stocks, CW);

        assert_eq!(analysis[0].total_stock_available, 25);
        assert_eq!(analysis[0].branch_net_need, 25);
    }

    #[test]
    fn test_branch_level_fields_broadcast_across_channels() {
        let analyzer = DemandAnalyzer::new();
        let forecasts = vec![
            ForecastRecord::new(1, 10, 100, 30),
            ForecastRecord::new(1, 10, 200, 10),
            ForecastRecord::new(1, 11, 100, 5),
        ];
        let stocks = vec![StockBatch::new(1, 10, 40, expiry())];

        let analysis = analyzer.analyze(&forecasts, &stocks, CW);

        assert_eq!(analysis.len(), 3);
        let branch_10: Vec<_> = analysis.iter().filter(|r| r.branch_id == 10).collect();
        for row in &branch_10 {
            assert_eq!(row.total_forecast_at_branch, 40);
            assert_eq!(row.total_stock_available, 40);
            assert_eq!(row.branch_net_need, 0);
            assert_eq!(row.allocation_status, AllocationStatus::NoAllocationNeeded);
        }

        let branch_11 = analysis.iter().find(|r| r.branch_id == 11).unwrap();
        assert_eq!(branch_11.allocation_status, AllocationStatus::AllocationNeeded);
    }

    #[test]
    fn test_overstock_and_stock_without_forecast() {
        let analyzer = DemandAnalyzer::new();
        let forecasts = vec![ForecastRecord::new(1, 10, 100, 5)];
        let stocks = vec![
            StockBatch::new(1, 10, 8, expiry()),
            // 无预测的门店库存不产生分析行
            StockBatch::new(2, 20, 8, expiry()),
        ];

        let analysis = analyzer.analyze(&forecasts, &stocks, CW);

        assert_eq!(analysis.len(), 1);
        assert_eq!(analysis[0].branch_net_need, -3);
        assert_eq!(analysis[0].allocation_status, AllocationStatus::Overstock);
    }

    #[test]
    fn test_output_sorted_by_keys() {
        let analyzer = DemandAnalyzer::new();
        let forecasts = vec![
            ForecastRecord::new(2, 1, 1, 1),
            ForecastRecord::new(1, 2, 2, 1),
            ForecastRecord::new(1, 2, 1, 1),
            ForecastRecord::new(1, 1, 9, 1),
        ];

        let keys: Vec<_> = analyzer
            .analyze(&forecasts, &[], CW)
            .iter()
            .map(|r| (r.product_id, r.branch_id, r.channel_id))
            .collect();

        assert_eq!(keys, vec![(1, 1, 9), (1, 2, 1), (1, 2, 2), (2, 1, 1)]);
    }

    #[test]
    fn test_empty_inputs_yield_empty_analysis() {
        let analyzer = DemandAnalyzer::new();
        assert!(analyzer.analyze(&[], &[], CW).is_empty());
    }
}
