// ==========================================
// 中央仓库存分配系统 - 文件解析器实现
// ==========================================
// 支持: Excel (.xlsx/.xls) / CSV (.csv)
// 输出: 表头 + 去空白的文本单元格,完全空白行丢弃
// ==========================================

use crate::importer::error::{ImportError, ImportResult};
use crate::importer::import_trait::{FileParser, RawRow, RawTable};
use calamine::{open_workbook_auto, Reader};
use csv::ReaderBuilder;
use std::collections::HashMap;
use std::fs::File;
use std::path::Path;

// 表头占第 1 行,数据从第 2 行开始
const FIRST_DATA_ROW: usize = 2;

fn ensure_exists(path: &Path) -> ImportResult<()> {
    if !path.exists() {
        return Err(ImportError::FileNotFound(path.display().to_string()));
    }
    Ok(())
}

fn extension_of(path: &Path) -> String {
    path.extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_lowercase()
}

/// 组装一行,空白行返回 None
fn build_row<I>(headers: &[String], cells: I, row_number: usize) -> Option<RawRow>
where
    I: IntoIterator<Item = String>,
{
    let mut values = HashMap::new();
    for (col_idx, value) in cells.into_iter().enumerate() {
        if let Some(header) = headers.get(col_idx) {
            values.insert(header.clone(), value.trim().to_string());
        }
    }

    if values.values().all(|v| v.is_empty()) {
        return None;
    }

    Some(RawRow { row_number, values })
}

// ==========================================
// CSV Parser 实现
// ==========================================
pub struct CsvParser;

impl FileParser for CsvParser {
    fn parse_to_raw_table(&self, file_path: &Path) -> ImportResult<RawTable> {
        ensure_exists(file_path)?;

        let ext = extension_of(file_path);
        if ext != "csv" {
            return Err(ImportError::UnsupportedFormat(ext));
        }

        let file = File::open(file_path)?;
        let mut reader = ReaderBuilder::new()
            .has_headers(true)
            .flexible(true) // 允许行长度不一致
            .from_reader(file);

        let headers: Vec<String> = reader
            .headers()?
            .iter()
            .map(|h| h.trim().trim_start_matches('\u{feff}').to_string())
            .collect();

        let mut rows = Vec::new();
        for (row_idx, result) in reader.records().enumerate() {
            let record = result?;
            let row_number = record
                .position()
                .map(|p| p.line() as usize)
                .unwrap_or(row_idx + FIRST_DATA_ROW);
            let cells = record.iter().map(|v| v.to_string());
            if let Some(row) = build_row(&headers, cells, row_number) {
                rows.push(row);
            }
        }

        Ok(RawTable { headers, rows })
    }
}

// ==========================================
// Excel Parser 实现
// ==========================================
// 只读取第一个工作表
pub struct ExcelParser;

impl FileParser for ExcelParser {
    fn parse_to_raw_table(&self, file_path: &Path) -> ImportResult<RawTable> {
        ensure_exists(file_path)?;

        let ext = extension_of(file_path);
        if ext != "xlsx" && ext != "xls" {
            return Err(ImportError::UnsupportedFormat(ext));
        }

        let mut workbook = open_workbook_auto(file_path)?;

        let sheet_name = workbook
            .sheet_names()
            .first()
            .cloned()
            .ok_or_else(|| ImportError::ExcelParseError("Excel 文件无工作表".to_string()))?;

        let range = workbook.worksheet_range(&sheet_name)?;

        let mut sheet_rows = range.rows();
        let header_row = sheet_rows
            .next()
            .ok_or_else(|| ImportError::ExcelParseError("Excel 文件无表头行".to_string()))?;

        let headers: Vec<String> = header_row
            .iter()
            .map(|cell| cell.to_string().trim().to_string())
            .collect();

        let mut rows = Vec::new();
        for (row_idx, data_row) in sheet_rows.enumerate() {
            let cells = data_row.iter().map(|cell| cell.to_string());
            if let Some(row) = build_row(&headers, cells, row_idx + FIRST_DATA_ROW) {
                rows.push(row);
            }
        }

        Ok(RawTable { headers, rows })
    }
}

// ==========================================
// 通用文件解析器（根据扩展名自动选择）
// ==========================================
pub struct UniversalFileParser;

impl UniversalFileParser {
    pub fn parse<P: AsRef<Path>>(&self, file_path: P) -> ImportResult<RawTable> {
        let path = file_path.as_ref();
        match extension_of(path).as_str() {
            "csv" => CsvParser.parse_to_raw_table(path),
            "xlsx" | "xls" => ExcelParser.parse_to_raw_table(path),
            other => {
                ensure_exists(path)?;
                Err(ImportError::UnsupportedFormat(other.to_string()))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::Builder;

    fn csv_file(lines: &[&str]) -> tempfile::NamedTempFile {
        let mut temp_file = Builder::new().suffix(".csv").tempfile().unwrap();
        for line in lines {
            writeln!(temp_file, "{}", line).unwrap();
        }
        temp_file
    }

    #[test]
    fn test_csv_parser_valid_file() {
        let temp_file = csv_file(&[
            "product_id, branch_id ,channel_id,forecast_quantity",
            "1,10,100, 5 ",
            "1,11,100,7",
        ]);

        let table = CsvParser.parse_to_raw_table(temp_file.path()).unwrap();

        assert_eq!(table.headers[1], "branch_id");
        assert_eq!(table.len(), 2);
        assert_eq!(table.rows[0].get("forecast_quantity"), Some("5"));
        assert_eq!(table.rows[0].row_number, 2);
    }

    #[test]
    fn test_csv_parser_file_not_found() {
        let result = CsvParser.parse_to_raw_table(Path::new("non_existent.csv"));
        assert!(matches!(result, Err(ImportError::FileNotFound(_))));
    }

    #[test]
    fn test_csv_parser_skip_empty_rows_keeps_row_numbers() {
        let temp_file = csv_file(&["product_id,branch_id", "1,10", ",", "2,20"]);

        let table = CsvParser.parse_to_raw_table(temp_file.path()).unwrap();

        assert_eq!(table.len(), 2);
        assert_eq!(table.rows[1].row_number, 4);
    }

    #[test]
    fn test_excel_parser_reads_first_sheet() {
        let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/stock_sample.xlsx");

        let table = ExcelParser.parse_to_raw_table(&path).unwrap();

        assert_eq!(
            table.headers,
            vec!["product_id", "branch_id", "stock_available", "expiry_date"]
        );
        let row_numbers: Vec<_> = table.rows.iter().map(|r| r.row_number).collect();
        assert_eq!(row_numbers, vec![2, 3, 5]);
        assert_eq!(table.rows[0].get("expiry_date"), Some("2026-09-30"));
        assert_eq!(table.rows[1].get("expiry_date"), Some("46096"));
        assert_eq!(table.rows[2].get("stock_available"), Some("7.5"));
    }

    #[test]
    fn test_excel_parser_rejects_csv_extension() {
        let temp_file = csv_file(&["a,b"]);
        let result = ExcelParser.parse_to_raw_table(temp_file.path());
        assert!(matches!(result, Err(ImportError::UnsupportedFormat(_))));
    }

    #[test]
    fn test_universal_parser_rejects_unknown_extension() {
        let temp_file = Builder::new().suffix(".txt").tempfile().unwrap();

        let result = UniversalFileParser.parse(temp_file.path());

        assert!(matches!(result, Err(ImportError::UnsupportedFormat(ext)) if ext == "txt"));
    }

    #[test]
    fn test_blank_cell_is_missing() {
        let temp_file = csv_file(&["product_id,branch_id", "1,"]);

        let table = UniversalFileParser.parse(temp_file.path()).unwrap();

        assert_eq!(table.rows[0].get("product_id"), Some("1"));
        assert_eq!(table.rows[0].get("branch_id"), None);
        assert!(table.has_header("branch_id"));
    }
}
