//! Monthly Report Snapshot Model (月报快照)
//!
//! 一条记录对应一个 (kind, month, year)，重算即覆盖 —
//! 快照是缓存与审计痕迹，台账与名册才是事实来源。

use super::serde_helpers;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use surrealdb::RecordId;

/// Monthly report ID type
pub type MonthlyReportId = RecordId;

/// 报表类别
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReportKind {
    Client,
    Employee,
    Finance,
}

impl ReportKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Client => "client",
            Self::Employee => "employee",
            Self::Finance => "finance",
        }
    }
}

impl FromStr for ReportKind {
    type Err = shared::AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "client" => Ok(Self::Client),
            "employee" => Ok(Self::Employee),
            "finance" => Ok(Self::Finance),
            other => Err(shared::AppError::with_message(
                shared::ErrorCode::UnknownReportKind,
                format!("Unknown report kind: {}", other),
            )),
        }
    }
}

/// Monthly report snapshot
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonthlyReport {
    #[serde(default, with = "serde_helpers::option_record_id")]
    pub id: Option<MonthlyReportId>,

    pub kind: ReportKind,
    pub month: u32,
    pub year: i32,

    // === 账期汇总 (client / employee) ===
    /// 名册全量应收/应付 (不论是否结算)
    #[serde(default)]
    pub total_expected: f64,
    /// 已结算净额合计
    #[serde(default)]
    pub total_collected: f64,
    #[serde(default)]
    pub total_tax: f64,
    #[serde(default)]
    pub total_discount: f64,
    #[serde(default)]
    pub entity_count: i32,
    #[serde(default)]
    pub settled_count: i32,
    #[serde(default)]
    pub unsettled_count: i32,
    /// 批准休假天数合计 (employee 报表)
    #[serde(default)]
    pub leave_days: i64,

    // === 收支汇总 (finance) ===
    #[serde(default)]
    pub total_income: f64,
    #[serde(default)]
    pub total_expense: f64,
    #[serde(default)]
    pub net: f64,

    pub generated_by: Option<String>,
    /// 生成时间 (Unix millis)
    #[serde(default)]
    pub generated_at: i64,
}
