// ==========================================
// 中央仓库存分配系统 - 记录加载器
// ==========================================
// 职责: 文件 → 预测记录 / 库存批次 + 数据质量报告
// 流程:
// 1. 文件解析（CSV / Excel）
// 2. 列映射校验（缺列整体拒绝）
// 3. 逐行清洗（编号/日期失败丢弃整行,数量强制转换）
// 4. 生成 DQ 报告
// ==========================================

use crate::config::allocation_config::{ColumnMapping, FORECAST_COLUMNS, STOCK_COLUMNS};
use crate::domain::forecast::ForecastRecord;
use crate::domain::import_report::{DqLevel, DqReport, DqSummary, DqViolation};
use crate::domain::stock::StockBatch;
use crate::importer::data_cleaner::DataCleaner;
use crate::importer::error::ImportResult;
use crate::importer::field_mapper::FieldMapper;
use crate::importer::file_parser::UniversalFileParser;
use crate::importer::import_trait::{RawRow, RawTable};
use std::path::Path;
use tracing::{info, instrument, warn};
use uuid::Uuid;

pub const FORECAST_DATASET: &str = "forecast";
pub const STOCK_DATASET: &str = "stock";

// ==========================================
// LoadedRecords - 加载结果
// ==========================================
#[derive(Debug, Clone)]
pub struct LoadedRecords<T> {
    pub records: Vec<T>,
    pub report: DqReport,
}

// 单行清洗结果: 丢弃原因 或 (记录, 警告列表)
type RowOutcome<T> = Result<(T, Vec<(String, String)>), (String, String)>;

// ==========================================
// RecordLoader - 记录加载器
// ==========================================
pub struct RecordLoader {
    parser: UniversalFileParser,
    cleaner: DataCleaner,
}

impl RecordLoader {
    pub fn new() -> Self {
        Self {
            parser: UniversalFileParser,
            cleaner: DataCleaner,
        }
    }

    // ==========================================
    // 文件入口
    // ==========================================

    /// 从文件加载预测记录
    #[instrument(skip(self, file_path, mapping), fields(path = %file_path.as_ref().display()))]
    pub fn load_forecasts<P: AsRef<Path>>(
        &self,
        file_path: P,
        mapping: &ColumnMapping,
    ) -> ImportResult<LoadedRecords<ForecastRecord>> {
        let table = self.parser.parse(file_path.as_ref())?;
        self.forecasts_from_table(&table, mapping)
    }

    /// 从文件加载库存批次
    #[instrument(skip(self, file_path, mapping), fields(path = %file_path.as_ref().display()))]
    pub fn load_stock<P: AsRef<Path>>(
        &self,
        file_path: P,
        mapping: &ColumnMapping,
    ) -> ImportResult<LoadedRecords<StockBatch>> {
        let table = self.parser.parse(file_path.as_ref())?;
        self.stock_from_table(&table, mapping)
    }

    // ==========================================
    // 原始表入口
    // ==========================================

    pub fn forecasts_from_table(
        &self,
        table: &RawTable,
        mapping: &ColumnMapping,
    ) -> ImportResult<LoadedRecords<ForecastRecord>> {
        let mapper = FieldMapper::new(FORECAST_DATASET, mapping, &FORECAST_COLUMNS)?;
        mapper.check_headers(table, &FORECAST_COLUMNS)?;

        Ok(self.convert_rows(table, FORECAST_DATASET, |row| {
            let product_id = self.identifier(&mapper, row, "product_id")?;
            let branch_id = self.identifier(&mapper, row, "branch_id")?;
            let channel_id = self.identifier(&mapper, row, "channel_id")?;

            let quantity = self
                .cleaner
                .clean_quantity(mapper.value(row, "forecast_quantity"));
            let warnings = quantity
                .warning
                .map(|w| vec![("forecast_quantity".to_string(), w)])
                .unwrap_or_default();

            Ok((
                ForecastRecord::new(product_id, branch_id, channel_id, quantity.value),
                warnings,
            ))
        }))
    }

    pub fn stock_from_table(
        &self,
        table: &RawTable,
        mapping: &ColumnMapping,
    ) -> ImportResult<LoadedRecords<StockBatch>> {
        let mapper = FieldMapper::new(STOCK_DATASET, mapping, &STOCK_COLUMNS)?;
        mapper.check_headers(table, &STOCK_COLUMNS)?;

        Ok(self.convert_rows(table, STOCK_DATASET, |row| {
            let product_id = self.identifier(&mapper, row, "product_id")?;
            let branch_id = self.identifier(&mapper, row, "branch_id")?;
            let expiry_date = self
                .cleaner
                .clean_expiry_date(mapper.value(row, "expiry_date"))
                .map_err(|msg| ("expiry_date".to_string(), msg))?;

            let quantity = self
                .cleaner
                .clean_quantity(mapper.value(row, "stock_available"));
            let warnings = quantity
                .warning
                .map(|w| vec![("stock_available".to_string(), w)])
                .unwrap_or_default();

            Ok((
                StockBatch::new(product_id, branch_id, quantity.value, expiry_date),
                warnings,
            ))
        }))
    }

    // ==========================================
    // 辅助方法
    // ==========================================

    fn identifier(&self, mapper: &FieldMapper, row: &RawRow, field: &str) -> Result<i64, (String, String)> {
        self.cleaner
            .clean_identifier(mapper.value(row, field))
            .map_err(|msg| (field.to_string(), msg))
    }

    /// 逐行转换并汇总 DQ 报告
    fn convert_rows<T, F>(&self, table: &RawTable, dataset: &str, convert: F) -> LoadedRecords<T>
    where
        F: Fn(&RawRow) -> RowOutcome<T>,
    {
        let mut records = Vec::with_capacity(table.len());
        let mut violations = Vec::new();
        let mut summary = DqSummary {
            total_rows: table.len(),
            ..DqSummary::default()
        };

        for row in &table.rows {
            match convert(row) {
                Ok((record, warnings)) => {
                    if !warnings.is_empty() {
                        summary.warning += 1;
                    }
                    for (field, message) in warnings {
                        violations.push(DqViolation {
                            row_number: row.row_number,
                            level: DqLevel::Warning,
                            field,
                            message,
                        });
                    }
                    summary.success += 1;
                    records.push(record);
                }
                Err((field, message)) => {
                    warn!(
                        dataset,
                        row_number = row.row_number,
                        field = %field,
                        reason = %message,
                        "数据行被丢弃"
                    );
                    summary.dropped += 1;
                    violations.push(DqViolation {
                        row_number: row.row_number,
                        level: DqLevel::Error,
                        field,
                        message,
                    });
                }
            }
        }

        let report = DqReport {
            batch_id: Uuid::new_v4().to_string(),
            dataset: dataset.to_string(),
            summary,
            violations,
        };

        info!(
            dataset,
            batch_id = %report.batch_id,
            total_rows = report.summary.total_rows,
            success = report.summary.success,
            dropped = report.summary.dropped,
            warning = report.summary.warning,
            "数据导入完成"
        );

        LoadedRecords { records, report }
    }
}

impl Default for RecordLoader {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::analyzer::DemandAnalyzer;
    use crate::importer::error::ImportError;
    use chrono::NaiveDate;
    use std::collections::HashMap;

    fn raw_table(headers: &[&str], rows: &[&[&str]]) -> RawTable {
        let headers: Vec<String> = headers.iter().map(|h| h.to_string()).collect();
        let rows = rows
            .iter()
            .enumerate()
            .map(|(idx, cells)| RawRow {
                row_number: idx + 2,
                values: headers
                    .iter()
                    .cloned()
                    .zip(cells.iter().map(|c| c.to_string()))
                    .collect::<HashMap<_, _>>(),
            })
            .collect();
        RawTable { headers, rows }
    }

    #[test]
    fn test_forecast_rows_are_cleaned_and_reported() {
        let loader = RecordLoader::new();
        let table = raw_table(
            &["product_id", "branch_id", "channel_id", "forecast_quantity"],
            &[
                &["1", "10", "100", "5"],
                &["1", "10", "100", "abc"],
                &["x", "10", "100", "5"],
                &["2.0", "11", "100", "-4"],
            ],
        );

        let loaded = loader
            .forecasts_from_table(&table, &ColumnMapping::forecast_default())
            .unwrap();

        assert_eq!(
            loaded.records,
            vec![
                ForecastRecord::new(1, 10, 100, 5),
                ForecastRecord::new(1, 10, 100, 0),
                ForecastRecord::new(2, 11, 100, 0),
            ]
        );
        assert_eq!(loaded.report.summary.total_rows, 4);
        assert_eq!(loaded.report.summary.success, 3);
        assert_eq!(loaded.report.summary.dropped, 1);
        assert_eq!(loaded.report.summary.warning, 2);
        assert!(loaded.report.has_errors());

        let dropped = loaded
            .report
            .violations
            .iter()
            .find(|v| v.level == DqLevel::Error)
            .unwrap();
        assert_eq!(dropped.row_number, 4);
        assert_eq!(dropped.field, "product_id");
    }

    #[test]
    fn test_stock_rows_with_bad_dates_are_dropped() {
        let loader = RecordLoader::new();
        let table = raw_table(
            &["product_id", "branch_id", "stock_available", "expiry_date"],
            &[&["1", "1000", "50", "2026-05-01"], &["1", "1000", "50", "soon"]],
        );

        let loaded = loader
            .stock_from_table(&table, &ColumnMapping::stock_default())
            .unwrap();

        assert_eq!(loaded.records.len(), 1);
        assert_eq!(
            loaded.records[0].expiry_date,
            NaiveDate::from_ymd_opt(2026, 5, 1).unwrap()
        );
        assert_eq!(loaded.report.dataset, "stock");
        assert_eq!(loaded.report.violations[0].field, "expiry_date");
    }

    #[test]
    fn test_oversized_quantity_is_zeroed_and_analysis_stays_total() {
        let loader = RecordLoader::new();
        let table = raw_table(
            &["product_id", "branch_id", "channel_id", "forecast_quantity"],
            &[&["1", "10", "100", "1e19"], &["1", "10", "100", "5"]],
        );

        let loaded = loader
            .forecasts_from_table(&table, &ColumnMapping::forecast_default())
            .unwrap();

        assert_eq!(
            loaded.records,
            vec![
                ForecastRecord::new(1, 10, 100, 0),
                ForecastRecord::new(1, 10, 100, 5),
            ]
        );
        assert_eq!(loaded.report.summary.warning, 1);
        assert_eq!(loaded.report.violations[0].row_number, 2);
        assert_eq!(loaded.report.violations[0].level, DqLevel::Warning);
        assert_eq!(loaded.report.violations[0].field, "forecast_quantity");

        let analysis = DemandAnalyzer::new().analyze(&loaded.records, &[], 1000);
        assert_eq!(analysis[0].forecast_quantity, 5);
    }

    #[test]
    fn test_mapped_column_missing_from_file() {
        let loader = RecordLoader::new();
        let table = raw_table(&["product_id", "branch_id", "stock_available"], &[]);

        let err = loader
            .stock_from_table(&table, &ColumnMapping::stock_default())
            .unwrap_err();

        assert!(matches!(
            err,
            ImportError::MissingColumn { ref dataset, ref column }
                if dataset == "stock" && column == "expiry_date"
        ));
    }
}
