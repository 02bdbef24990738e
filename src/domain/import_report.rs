// ==========================================
// 中央仓库存分配系统 - 数据质量报告模型
// ==========================================
// 用途: 导入阶段的强制转换/丢弃记录（可解释性）
// ==========================================

use serde::{Deserialize, Serialize};

// ==========================================
// DqLevel - 数据质量级别
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DqLevel {
    Error,   // 错误（该行被丢弃）
    Warning, // 警告（值被强制转换后保留）
}

// ==========================================
// DqViolation - 数据质量违规明细
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DqViolation {
    pub row_number: usize, // 原始文件行号（表头为第 1 行）
    pub level: DqLevel,
    pub field: String,     // 内部列名
    pub message: String,
}

// ==========================================
// DqSummary - 数据质量汇总
// ==========================================
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DqSummary {
    pub total_rows: usize, // 总行数
    pub success: usize,    // 成功导入
    pub dropped: usize,    // 丢弃（ERROR）
    pub warning: usize,    // 含警告的行
}

// ==========================================
// DqReport - 数据质量报告
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DqReport {
    pub batch_id: String, // 导入批次 ID (UUID)
    pub dataset: String,  // forecast / stock
    pub summary: DqSummary,
    pub violations: Vec<DqViolation>,
}

impl DqReport {
    pub fn has_errors(&self) -> bool {
        self.violations.iter().any(|v| v.level == DqLevel::Error)
    }
}
