// ==========================================
// 中央仓库存分配系统 - 引擎编排器
// ==========================================
// 用途: 协调 导入 → 需求分析 → FEFO 分配 → 汇总 的执行顺序
// 配置: 中央仓编号/列映射/分配规则均通过 AllocationConfigReader 读取
// ==========================================

use crate::config::allocation_config::AllocationRules;
use crate::config::AllocationConfigReader;
use crate::domain::allocation::AllocationOutcome;
use crate::domain::import_report::DqReport;
use crate::domain::summary::{AnalysisSummary, FulfillmentSummary};
use crate::engine::session::AllocationSession;
use crate::importer::error::ImportResult;
use crate::importer::record_loader::RecordLoader;
use crate::perf::PerfGuard;
use chrono::NaiveDateTime;
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, info};

// ==========================================
// LoadedInputs - 导入结果
// ==========================================
pub struct LoadedInputs {
    pub session: AllocationSession,
    pub forecast_report: DqReport,
    pub stock_report: DqReport,
}

// ==========================================
// AllocationRun - 单次分配运行结果
// ==========================================
#[derive(Debug, Clone)]
pub struct AllocationRun {
    pub rules: AllocationRules,
    pub analysis_summary: AnalysisSummary,
    pub outcome: AllocationOutcome,
    pub fulfillment: FulfillmentSummary,
}

// ==========================================
// AllocationOrchestrator - 引擎编排器
// ==========================================
pub struct AllocationOrchestrator<C>
where
    C: AllocationConfigReader,
{
    config: Arc<C>,
    loader: RecordLoader,
}

impl<C> AllocationOrchestrator<C>
where
    C: AllocationConfigReader,
{
    /// 创建新的编排器实例
    ///
    /// # 参数
    /// - config: 配置读取器
    pub fn new(config: Arc<C>) -> Self {
        Self {
            config,
            loader: RecordLoader::new(),
        }
    }

    /// 导入预测/库存文件并完成需求分析
    ///
    /// # 返回
    /// - Ok(LoadedInputs): 会话（已含分析表）+ 两份 DQ 报告
    /// - Err: 文件不可读、缺列、配置读取失败
    pub fn load_inputs<P: AsRef<Path>, Q: AsRef<Path>>(
        &self,
        forecast_path: P,
        stock_path: Q,
    ) -> ImportResult<LoadedInputs> {
        let _perf = PerfGuard::new("load_inputs");

        let cw_branch_id = self.config.get_cw_branch_id()?;
        let forecast_mapping = self.config.get_forecast_mapping()?;
        let stock_mapping = self.config.get_stock_mapping()?;

        // ==========================================
        // 步骤1: 导入预测
        // ==========================================
        debug!("步骤1: 导入预测文件");
        let forecasts = self
            .loader
            .load_forecasts(forecast_path.as_ref(), &forecast_mapping)?;

        // ==========================================
        // 步骤2: 导入库存
        // ==========================================
        debug!("步骤2: 导入库存文件");
        let stocks = self.loader.load_stock(stock_path.as_ref(), &stock_mapping)?;

        // ==========================================
        // 步骤3: 需求分析
        // ==========================================
        debug!("步骤3: 执行需求分析");
        let session = AllocationSession::new(forecasts.records, stocks.records, cw_branch_id);

        info!(
            cw_branch_id,
            forecasts = session.forecasts().len(),
            stocks = session.stocks().len(),
            analysis_rows = session.analysis().len(),
            "输入数据导入完成"
        );

        Ok(LoadedInputs {
            session,
            forecast_report: forecasts.report,
            stock_report: stocks.report,
        })
    }

    /// 以配置中的规则执行分配
    pub fn execute_allocation(
        &self,
        session: &AllocationSession,
        now: NaiveDateTime,
    ) -> ImportResult<AllocationRun> {
        let rules = self.config.get_allocation_rules()?;
        Ok(self.execute_allocation_with_rules(session, rules, now))
    }

    /// 以指定规则执行分配（不读取配置中的规则）
    pub fn execute_allocation_with_rules(
        &self,
        session: &AllocationSession,
        rules: AllocationRules,
        now: NaiveDateTime,
    ) -> AllocationRun {
        info!(
            priority_channels = ?rules.priority_channels,
            priority_branches = ?rules.priority_branches,
            expiry_rules = rules.expiry_rules.len(),
            now = %now,
            "开始执行分配流程"
        );

        let analysis_summary = session.analysis_summary();
        let outcome = session.allocate(&rules, now);
        let fulfillment = session.fulfillment_summary(&outcome);

        info!(
            run_id = %outcome.run_id,
            fulfillment_ratio = fulfillment.fulfillment_ratio,
            "分配流程完成"
        );

        AllocationRun {
            rules,
            analysis_summary,
            outcome,
            fulfillment,
        }
    }

    /// 导入 + 分配（一次完成）
    pub fn run<P: AsRef<Path>, Q: AsRef<Path>>(
        &self,
        forecast_path: P,
        stock_path: Q,
        now: NaiveDateTime,
    ) -> ImportResult<(LoadedInputs, AllocationRun)> {
        let inputs = self.load_inputs(forecast_path, stock_path)?;
        let run = self.execute_allocation(&inputs.session, now)?;
        Ok((inputs, run))
    }
}
