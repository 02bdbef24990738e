// ==========================================
// 中央仓库存分配系统 - CSV / JSON 写出
// ==========================================
// 表头与列顺序固定,日期格式 YYYY-MM-DD
// ==========================================

use crate::domain::allocation::{AllocationOutcome, AllocationRecord, UnfulfilledDemand};
use crate::domain::analysis::ChannelDemand;
use crate::domain::stock::StockBatch;
use crate::export::error::{ExportError, ExportResult};
use csv::Writer;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::info;

pub const ANALYSIS_FILE: &str = "analysis.csv";
pub const ALLOCATION_PLAN_FILE: &str = "allocation_plan.csv";
pub const UNFULFILLED_FILE: &str = "unfulfilled_demands.csv";
pub const REMAINING_STOCK_FILE: &str = "remaining_warehouse_stock.csv";
pub const OUTCOME_JSON_FILE: &str = "outcome.json";

const DATE_FORMAT: &str = "%Y-%m-%d";

// ==========================================
// CsvRow - 可写出为 CSV 行的表记录
// ==========================================
pub trait CsvRow {
    const HEADER: &'static [&'static str];

    fn to_row(&self) -> Vec<String>;
}

impl CsvRow for ChannelDemand {
    const HEADER: &'static [&'static str] = &[
        "product_id",
        "branch_id",
        "channel_id",
        "forecast_quantity",
        "total_stock_available",
        "total_forecast_at_branch",
        "branch_net_need",
        "allocation_status",
    ];

    fn to_row(&self) -> Vec<String> {
        vec![
            self.product_id.to_string(),
            self.branch_id.to_string(),
            self.channel_id.to_string(),
            self.forecast_quantity.to_string(),
            self.total_stock_available.to_string(),
            self.total_forecast_at_branch.to_string(),
            self.branch_net_need.to_string(),
            self.allocation_status.as_str().to_string(),
        ]
    }
}

impl CsvRow for AllocationRecord {
    const HEADER: &'static [&'static str] = &[
        "product_id",
        "from_branch",
        "to_branch",
        "channel_id",
        "quantity_allocated",
        "expiry_date",
    ];

    fn to_row(&self) -> Vec<String> {
        vec![
            self.product_id.to_string(),
            self.from_branch.to_string(),
            self.to_branch.to_string(),
            self.channel_id.to_string(),
            self.quantity_allocated.to_string(),
            self.expiry_date.format(DATE_FORMAT).to_string(),
        ]
    }
}

impl CsvRow for UnfulfilledDemand {
    const HEADER: &'static [&'static str] =
        &["product_id", "branch_id", "needed", "fulfilled", "unfulfilled"];

    fn to_row(&self) -> Vec<String> {
        vec![
            self.product_id.to_string(),
            self.branch_id.to_string(),
            self.needed.to_string(),
            self.fulfilled.to_string(),
            self.unfulfilled.to_string(),
        ]
    }
}

impl CsvRow for StockBatch {
    const HEADER: &'static [&'static str] =
        &["product_id", "branch_id", "stock_available", "expiry_date"];

    fn to_row(&self) -> Vec<String> {
        vec![
            self.product_id.to_string(),
            self.branch_id.to_string(),
            self.stock_available.to_string(),
            self.expiry_date.format(DATE_FORMAT).to_string(),
        ]
    }
}

// ==========================================
// 写出到任意 io::Write
// ==========================================

/// 写表头 + 全部行（空表也写表头）
fn write_rows<W: Write, R: CsvRow>(writer: W, rows: &[R]) -> ExportResult<()> {
    let mut wtr = Writer::from_writer(writer);
    wtr.write_record(R::HEADER)?;
    for row in rows {
        wtr.write_record(&row.to_row())?;
    }
    wtr.flush()?;
    Ok(())
}

pub fn write_analysis<W: Write>(writer: W, analysis: &[ChannelDemand]) -> ExportResult<()> {
    write_rows(writer, analysis)
}

pub fn write_plan<W: Write>(writer: W, plan: &[AllocationRecord]) -> ExportResult<()> {
    write_rows(writer, plan)
}

pub fn write_unfulfilled<W: Write>(writer: W, unfulfilled: &[UnfulfilledDemand]) -> ExportResult<()> {
    write_rows(writer, unfulfilled)
}

pub fn write_remaining_stock<W: Write>(writer: W, stock: &[StockBatch]) -> ExportResult<()> {
    write_rows(writer, stock)
}

pub fn write_outcome_json<W: Write>(writer: W, outcome: &AllocationOutcome) -> ExportResult<()> {
    serde_json::to_writer_pretty(writer, outcome)?;
    Ok(())
}

// ==========================================
// 写出到文件
// ==========================================

/// 分配结果写出的文件路径
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutcomeFiles {
    pub allocation_plan: PathBuf,
    pub unfulfilled_demands: PathBuf,
    pub remaining_stock: PathBuf,
}

fn ensure_dir(dir: &Path) -> ExportResult<()> {
    fs::create_dir_all(dir).map_err(|e| ExportError::CreateDir {
        path: dir.to_path_buf(),
        message: e.to_string(),
    })
}

fn create_file(path: &Path) -> ExportResult<File> {
    File::create(path).map_err(|e| ExportError::WriteFile {
        path: path.to_path_buf(),
        message: e.to_string(),
    })
}

pub fn write_analysis_file(dir: &Path, analysis: &[ChannelDemand]) -> ExportResult<PathBuf> {
    ensure_dir(dir)?;
    let path = dir.join(ANALYSIS_FILE);
    write_analysis(create_file(&path)?, analysis)?;
    info!(path = %path.display(), rows = analysis.len(), "需求分析表已写出");
    Ok(path)
}

/// 写出调拨计划 / 未满足需求 / 剩余库存三张表
pub fn write_outcome_files(dir: &Path, outcome: &AllocationOutcome) -> ExportResult<OutcomeFiles> {
    ensure_dir(dir)?;

    let files = OutcomeFiles {
        allocation_plan: dir.join(ALLOCATION_PLAN_FILE),
        unfulfilled_demands: dir.join(UNFULFILLED_FILE),
        remaining_stock: dir.join(REMAINING_STOCK_FILE),
    };

    write_plan(create_file(&files.allocation_plan)?, &outcome.allocation_plan)?;
    write_unfulfilled(
        create_file(&files.unfulfilled_demands)?,
        &outcome.unfulfilled_demands,
    )?;
    write_remaining_stock(create_file(&files.remaining_stock)?, &outcome.remaining_stock)?;

    info!(
        run_id = %outcome.run_id,
        dir = %dir.display(),
        plan_rows = outcome.allocation_plan.len(),
        unfulfilled_rows = outcome.unfulfilled_demands.len(),
        remaining_rows = outcome.remaining_stock.len(),
        "分配结果已写出"
    );

    Ok(files)
}

pub fn write_outcome_json_file(dir: &Path, outcome: &AllocationOutcome) -> ExportResult<PathBuf> {
    ensure_dir(dir)?;
    let path = dir.join(OUTCOME_JSON_FILE);
    write_outcome_json(create_file(&path)?, outcome)?;
    Ok(path)
}
