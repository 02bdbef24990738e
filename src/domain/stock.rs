// ==========================================
// 中央仓库存分配系统 - 库存批次领域模型
// ==========================================
// 红线: stock_available 只允许在分配引擎的私有工作副本中扣减
// ==========================================

use crate::domain::types::{BranchId, BranchKey, ProductId};
use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

// ==========================================
// StockBatch - 库存批次
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StockBatch {
    pub product_id: ProductId,  // 产品
    pub branch_id: BranchId,    // 所在门店/仓库
    pub stock_available: i64,   // 可用数量 (>= 0)
    pub expiry_date: NaiveDate, // 到期日
}

impl StockBatch {
    pub fn new(
        product_id: ProductId,
        branch_id: BranchId,
        stock_available: i64,
        expiry_date: NaiveDate,
    ) -> Self {
        Self {
            product_id,
            branch_id,
            stock_available,
            expiry_date,
        }
    }

    pub fn branch_key(&self) -> BranchKey {
        (self.product_id, self.branch_id)
    }

    /// 是否位于指定仓库（通常用于判断中央仓）
    pub fn is_located_at(&self, branch_id: BranchId) -> bool {
        self.branch_id == branch_id
    }

    /// 是否满足渠道的最短效期要求
    ///
    /// 到期日按当天 00:00 参与比较: expiry_date 00:00 >= required_at
    pub fn meets_expiry(&self, required_at: NaiveDateTime) -> bool {
        self.expiry_date.and_time(chrono::NaiveTime::MIN) >= required_at
    }

    pub fn has_stock(&self) -> bool {
        self.stock_available > 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveTime;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_meets_expiry_compares_at_midnight() {
        let batch = StockBatch::new(1, 1000, 10, date(2026, 3, 10));

        let midnight = date(2026, 3, 10).and_time(NaiveTime::MIN);
        assert!(batch.meets_expiry(midnight));

        // 同一天的任意非零时刻已晚于到期日 00:00
        let noon = date(2026, 3, 10).and_hms_opt(12, 0, 0).unwrap();
        assert!(!batch.meets_expiry(noon));

        let day_before = date(2026, 3, 9).and_hms_opt(23, 59, 59).unwrap();
        assert!(batch.meets_expiry(day_before));
    }
}
