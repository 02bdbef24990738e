// ==========================================
// 中央仓库存分配系统 - 导入层 Trait 与原始表结构
// ==========================================
// 职责: 定义文件解析接口与解析产物（不包含实现）
// ==========================================

use crate::importer::error::ImportResult;
use std::collections::HashMap;
use std::path::Path;

// ==========================================
// RawRow - 原始数据行
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawRow {
    pub row_number: usize,              // 原始文件行号（表头为第 1 行）
    pub values: HashMap<String, String>, // 表头 → 去空白后的单元格文本
}

impl RawRow {
    /// 取单元格文本（空字符串视为缺失）
    pub fn get(&self, header: &str) -> Option<&str> {
        self.values
            .get(header)
            .map(|v| v.as_str())
            .filter(|v| !v.is_empty())
    }
}

// ==========================================
// RawTable - 解析后的原始表
// ==========================================
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawTable {
    pub headers: Vec<String>,
    pub rows: Vec<RawRow>,
}

impl RawTable {
    pub fn has_header(&self, header: &str) -> bool {
        self.headers.iter().any(|h| h == header)
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

// ==========================================
// FileParser Trait
// ==========================================
// 实现者: CsvParser, ExcelParser
pub trait FileParser {
    /// 解析文件为原始表
    ///
    /// # 返回
    /// - Ok(RawTable): 表头 + 非空数据行
    /// - Err: 文件不存在、格式不支持、解析失败
    fn parse_to_raw_table(&self, file_path: &Path) -> ImportResult<RawTable>;
}
