// ==========================================
// 中央仓库存分配系统 - 数据清洗器实现
// ==========================================
// 职责: 单元格文本 → 数量 / 编号 / 到期日 的强制转换
// 规则:
// - 数量: 数值解析（小数向零截断）,非数值/缺失/负数/超出上限 → 0（均记警告）
// - 编号: 整数解析（接受 "12" 与 "12.0"）,失败 → 整行丢弃
// - 到期日: 多种日期格式或 Excel 序列日,失败 → 整行丢弃
// ==========================================

use chrono::{Duration, NaiveDate, NaiveDateTime};

const DATE_FORMATS: [&str; 3] = ["%Y-%m-%d", "%Y%m%d", "%Y/%m/%d"];
const DATETIME_FORMATS: [&str; 4] = [
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
    "%Y/%m/%d %H:%M:%S",
    "%Y-%m-%d %H:%M:%S%.f",
];

// Excel 序列日: 1 = 1900-01-01（按 1899-12-30 起算以兼容 1900 闰年缺陷）
const EXCEL_SERIAL_MAX: f64 = 2_958_465.0; // 9999-12-31

/// 单行数量上限（超出按 0 处理）
pub const MAX_QUANTITY: i64 = 1_000_000_000_000;

/// 数量清洗结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CleanedQuantity {
    pub value: i64,
    pub warning: Option<String>,
}

pub struct DataCleaner;

impl DataCleaner {
    /// 数量清洗（永不失败）
    pub fn clean_quantity(&self, value: Option<&str>) -> CleanedQuantity {
        let Some(raw) = value.map(str::trim).filter(|v| !v.is_empty()) else {
            return CleanedQuantity {
                value: 0,
                warning: Some("数量缺失,按 0 处理".to_string()),
            };
        };

        let parsed = raw.parse::<i64>().ok().map(|q| q as f64).or_else(|| {
            self.parse_finite_f64(raw).map(f64::trunc)
        });

        match parsed {
            None => CleanedQuantity {
                value: 0,
                warning: Some(format!("无法解析为数值: {},按 0 处理", raw)),
            },
            Some(q) if q < 0.0 => CleanedQuantity {
                value: 0,
                warning: Some(format!("数量为负: {},按 0 处理", raw)),
            },
            Some(q) if q > MAX_QUANTITY as f64 => CleanedQuantity {
                value: 0,
                warning: Some(format!("数量超出上限 {}: {},按 0 处理", MAX_QUANTITY, raw)),
            },
            Some(q) => CleanedQuantity {
                value: q as i64,
                warning: None,
            },
        }
    }

    /// 编号清洗（产品/门店/渠道）
    pub fn clean_identifier(&self, value: Option<&str>) -> Result<i64, String> {
        let raw = value
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .ok_or_else(|| "编号缺失".to_string())?;

        if let Ok(id) = raw.parse::<i64>() {
            return Ok(id);
        }

        match self.parse_finite_f64(raw) {
            Some(f) if f.fract() == 0.0 && f.abs() < i64::MAX as f64 => Ok(f as i64),
            _ => Err(format!("无法解析为整数编号: {}", raw)),
        }
    }

    /// 到期日清洗
    pub fn clean_expiry_date(&self, value: Option<&str>) -> Result<NaiveDate, String> {
        let raw = value
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .ok_or_else(|| "到期日缺失".to_string())?;

        DATE_FORMATS
            .iter()
            .find_map(|fmt| NaiveDate::parse_from_str(raw, fmt).ok())
            .or_else(|| {
                DATETIME_FORMATS
                    .iter()
                    .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
                    .map(|dt| dt.date())
            })
            .or_else(|| self.parse_excel_serial(raw))
            .ok_or_else(|| format!("无法解析到期日: {}", raw))
    }

    // ==========================================
    // 辅助方法
    // ==========================================

    fn parse_finite_f64(&self, raw: &str) -> Option<f64> {
        raw.parse::<f64>().ok().filter(|f| f.is_finite())
    }

    fn parse_excel_serial(&self, raw: &str) -> Option<NaiveDate> {
        let serial = self.parse_finite_f64(raw)?;
        if !(1.0..=EXCEL_SERIAL_MAX).contains(&serial) {
            return None;
        }
        let base = NaiveDate::from_ymd_opt(1899, 12, 30)?;
        base.checked_add_signed(Duration::days(serial.trunc() as i64))
    }
}
