//! Finance Record Model (通用收支)

use super::serde_helpers;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use surrealdb::RecordId;

/// Finance record ID type
pub type FinanceRecordId = RecordId;

/// 收支方向
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FinanceKind {
    Income,
    Expense,
}

impl FinanceKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Income => "income",
            Self::Expense => "expense",
        }
    }
}

/// General income/expense record, outside the recurring ledgers
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FinanceRecord {
    #[serde(default, with = "serde_helpers::option_record_id")]
    pub id: Option<FinanceRecordId>,
    pub kind: FinanceKind,
    pub category: String,
    pub amount: f64,
    pub date: NaiveDate,
    pub note: Option<String>,
    #[serde(default)]
    pub created_at: i64,
}

/// Create finance record payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FinanceRecordCreate {
    pub kind: FinanceKind,
    pub category: String,
    pub amount: f64,
    /// 缺省为今天
    pub date: Option<NaiveDate>,
    pub note: Option<String>,
}
