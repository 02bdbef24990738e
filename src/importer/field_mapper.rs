// ==========================================
// 中央仓库存分配系统 - 字段映射器实现
// ==========================================
// 职责: 内部列名 → 源文件列名的解析与校验
// 红线: 映射到的源列必须全部存在于表头,否则整个文件拒绝
// ==========================================

use crate::config::allocation_config::ColumnMapping;
use crate::importer::error::{ImportError, ImportResult};
use crate::importer::import_trait::{RawRow, RawTable};
use std::collections::HashMap;

pub struct FieldMapper {
    dataset: String,
    // 内部列名 → 源列名
    columns: HashMap<String, String>,
}

impl FieldMapper {
    /// 构造映射器并校验内部列是否齐全
    ///
    /// # 参数
    /// - `dataset`: 数据集名称（forecast / stock,用于错误信息）
    /// - `mapping`: 列映射
    /// - `required`: 必须映射的内部列
    pub fn new(dataset: &str, mapping: &ColumnMapping, required: &[&str]) -> ImportResult<Self> {
        let mut columns = HashMap::new();
        for internal in required {
            let source = mapping
                .source_column(internal)
                .filter(|s| !s.trim().is_empty())
                .ok_or_else(|| ImportError::UnmappedColumn {
                    dataset: dataset.to_string(),
                    column: internal.to_string(),
                })?;
            columns.insert(internal.to_string(), source.trim().to_string());
        }

        Ok(Self {
            dataset: dataset.to_string(),
            columns,
        })
    }

    /// 校验源列是否都在表头中（按内部列顺序报告第一个缺失列）
    pub fn check_headers(&self, table: &RawTable, required: &[&str]) -> ImportResult<()> {
        for internal in required {
            if let Some(source) = self.columns.get(*internal) {
                if !table.has_header(source) {
                    return Err(ImportError::MissingColumn {
                        dataset: self.dataset.clone(),
                        column: source.clone(),
                    });
                }
            }
        }
        Ok(())
    }

    /// 按内部列名取值
    pub fn value<'a>(&self, row: &'a RawRow, internal: &str) -> Option<&'a str> {
        self.columns
            .get(internal)
            .and_then(|source| row.get(source))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::allocation_config::FORECAST_COLUMNS;

    fn table(headers: &[&str], row: &[(&str, &str)]) -> RawTable {
        RawTable {
            headers: headers.iter().map(|h| h.to_string()).collect(),
            rows: vec![RawRow {
                row_number: 2,
                values: row
                    .iter()
                    .map(|(k, v)| (k.to_string(), v.to_string()))
                    .collect(),
            }],
        }
    }

    #[test]
    fn test_renamed_column_is_resolved() {
        let mapping = ColumnMapping::forecast_default().with_column("forecast_quantity", "qty");
        let mapper = FieldMapper::new("forecast", &mapping, &FORECAST_COLUMNS).unwrap();
        let table = table(
            &["product_id", "branch_id", "channel_id", "qty"],
            &[("qty", "12")],
        );

        mapper.check_headers(&table, &FORECAST_COLUMNS).unwrap();
        assert_eq!(mapper.value(&table.rows[0], "forecast_quantity"), Some("12"));
        assert_eq!(mapper.value(&table.rows[0], "product_id"), None);
    }

    #[test]
    fn test_missing_source_column_is_rejected() {
        let mapping = ColumnMapping::forecast_default().with_column("channel_id", "Channel");
        let mapper = FieldMapper::new("forecast", &mapping, &FORECAST_COLUMNS).unwrap();
        let table = table(&["product_id", "branch_id", "forecast_quantity"], &[]);

        let err = mapper.check_headers(&table, &FORECAST_COLUMNS).unwrap_err();

        assert_eq!(err.to_string(), "Column 'Channel' not found in forecast file.");
    }

    #[test]
    fn test_unmapped_internal_column_is_rejected() {
        let mapping = ColumnMapping::identity(&["product_id"]);
        let result = FieldMapper::new("stock", &mapping, &["product_id", "expiry_date"]);

        assert!(matches!(
            result,
            Err(ImportError::UnmappedColumn { column, .. }) if column == "expiry_date"
        ));
    }
}
