// ==========================================
// 测试数据构建器 - 用于集成测试
// ==========================================
#![allow(dead_code)]

use chrono::{Duration, NaiveDate, NaiveDateTime};
use std::io::Write;
use std::path::PathBuf;
use stock_allocation::domain::{BranchId, ChannelId, ForecastRecord, ProductId, StockBatch};
use tempfile::TempDir;

pub const CW: BranchId = 1000;

// ==========================================
// 时间基准
// ==========================================

/// 固定的“当前时间”（09:00,非零点）
pub fn test_now() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2026, 3, 1)
        .unwrap()
        .and_hms_opt(9, 0, 0)
        .unwrap()
}

/// 相对 test_now 的日期
pub fn days_from_now(days: i64) -> NaiveDate {
    test_now().date() + Duration::days(days)
}

// ==========================================
// 记录构建
// ==========================================

pub fn forecast(
    product_id: ProductId,
    branch_id: BranchId,
    channel_id: ChannelId,
    quantity: i64,
) -> ForecastRecord {
    ForecastRecord::new(product_id, branch_id, channel_id, quantity)
}

/// 中央仓批次
pub fn cw_batch(product_id: ProductId, quantity: i64, expires_in_days: i64) -> StockBatch {
    StockBatch::new(product_id, CW, quantity, days_from_now(expires_in_days))
}

/// 门店现有库存
pub fn branch_stock(product_id: ProductId, branch_id: BranchId, quantity: i64) -> StockBatch {
    StockBatch::new(product_id, branch_id, quantity, days_from_now(365))
}

// ==========================================
// 文件构建
// ==========================================

pub struct CsvFixture {
    pub dir: TempDir,
}

impl CsvFixture {
    pub fn new() -> Self {
        Self {
            dir: TempDir::new().unwrap(),
        }
    }

    /// 写入一个 CSV 文件（每个元素一行）
    pub fn write(&self, name: &str, lines: &[&str]) -> PathBuf {
        let path = self.dir.path().join(name);
        let mut file = std::fs::File::create(&path).unwrap();
        for line in lines {
            writeln!(file, "{}", line).unwrap();
        }
        path
    }

    pub fn path(&self, name: &str) -> PathBuf {
        self.dir.path().join(name)
    }
}

/// 读取 CSV 文件为行列表（不含表头）
pub fn read_csv_rows(path: &std::path::Path) -> Vec<Vec<String>> {
    let mut reader = csv::Reader::from_path(path).unwrap();
    reader
        .records()
        .map(|r| r.unwrap().iter().map(|v| v.to_string()).collect())
        .collect()
}
