// ==========================================
// 中央仓库存分配系统 - 中央仓库存池
// ==========================================
// 用途: 分配引擎的私有工作副本（按产品分组,组内按到期日升序）
// 红线: 只从输入深拷贝构建,扣减不回写调用方的库存数据
// ==========================================

use crate::domain::stock::StockBatch;
use crate::domain::types::{BranchId, ProductId};
use chrono::{NaiveDate, NaiveDateTime};
use std::collections::BTreeMap;

// ==========================================
// BatchDraw - 单次从批次扣减的记录
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BatchDraw {
    pub expiry_date: NaiveDate,
    pub quantity: i64,
}

// ==========================================
// CentralStockPool - 中央仓库存池
// ==========================================
#[derive(Debug, Clone)]
pub struct CentralStockPool {
    batches: BTreeMap<ProductId, Vec<StockBatch>>,
}

impl CentralStockPool {
    /// 从库存批次构建工作副本
    ///
    /// 仅保留 branch_id == cw_branch_id 的批次;
    /// 组内按 expiry_date 稳定排序（同到期日保持输入顺序）
    pub fn from_stock(stocks: &[StockBatch], cw_branch_id: BranchId) -> Self {
        let mut batches: BTreeMap<ProductId, Vec<StockBatch>> = BTreeMap::new();
        for batch in stocks.iter().filter(|b| b.is_located_at(cw_branch_id)) {
            batches
                .entry(batch.product_id)
                .or_default()
                .push(batch.clone());
        }

        for product_batches in batches.values_mut() {
            product_batches.sort_by_key(|b| b.expiry_date);
        }

        Self { batches }
    }

    /// 是否存在满足效期要求的批次（不论剩余数量）
    pub fn has_eligible_batch(&self, product_id: ProductId, required_at: NaiveDateTime) -> bool {
        self.batches
            .get(&product_id)
            .map(|list| list.iter().any(|b| b.meets_expiry(required_at)))
            .unwrap_or(false)
    }

    /// 按 FEFO 顺序从合格批次扣减
    ///
    /// 规则:
    /// 1) 只遍历 expiry_date 满足 required_at 的批次（到期日升序）
    /// 2) 跳过已无库存的批次
    /// 3) 每批扣减 min(剩余目标, 批次可用量),目标满足即停止
    ///
    /// # 返回
    /// 扣减记录（按扣减顺序）,总量 <= target
    pub fn draw(
        &mut self,
        product_id: ProductId,
        required_at: NaiveDateTime,
        target: i64,
    ) -> Vec<BatchDraw> {
        let mut draws = Vec::new();
        if target <= 0 {
            return draws;
        }

        let Some(list) = self.batches.get_mut(&product_id) else {
            return draws;
        };

        let mut fulfilled = 0;
        for batch in list.iter_mut().filter(|b| b.meets_expiry(required_at)) {
            if !batch.has_stock() {
                continue;
            }

            let take = (target - fulfilled).min(batch.stock_available);
            batch.stock_available -= take;
            fulfilled += take;
            draws.push(BatchDraw {
                expiry_date: batch.expiry_date,
                quantity: take,
            });

            if fulfilled == target {
                break;
            }
        }

        draws
    }

    /// 剩余库存快照（仅 stock_available > 0,按 product/expiry 升序）
    pub fn remaining(&self) -> Vec<StockBatch> {
        self.batches
            .values()
            .flatten()
            .filter(|b| b.has_stock())
            .cloned()
            .collect()
    }

    /// 池内总可用量
    pub fn total_available(&self) -> i64 {
        self.batches
            .values()
            .flatten()
            .fold(0i64, |acc, b| acc.saturating_add(b.stock_available))
    }

    pub fn batch_count(&self) -> usize {
        self.batches.values().map(|list| list.len()).sum()
    }
}
