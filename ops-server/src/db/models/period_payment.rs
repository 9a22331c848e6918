//! Period Payment Model (期账台账)
//!
//! 一条记录对应一个 (entity, month, year) 账期，唯一索引约束三元组。
//! 记录只追加/覆盖，从不物理删除。

use super::serde_helpers;
use crate::billing::PeriodStatus;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use surrealdb::RecordId;

/// Period payment ID type
pub type PeriodPaymentId = RecordId;

/// 台账归属的实体类别
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    Client,
    Employee,
}

impl EntityKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Client => "client",
            Self::Employee => "employee",
        }
    }
}

/// Period payment record
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PeriodPayment {
    #[serde(default, with = "serde_helpers::option_record_id")]
    pub id: Option<PeriodPaymentId>,

    /// 归属实体 (client:xxx / employee:xxx)
    #[serde(with = "serde_helpers::record_id")]
    pub entity: RecordId,
    pub entity_kind: EntityKind,

    // === 账期键 ===
    pub month: u32,
    pub year: i32,

    // === 金额 ===
    pub gross_amount: f64,
    pub tax_amount: f64,
    pub discount_amount: f64,
    /// gross + tax - discount，写入时计算；显式覆盖后不再重算
    pub net_amount: f64,
    #[serde(default, deserialize_with = "serde_helpers::bool_false")]
    pub net_overridden: bool,

    /// 账期末日 (计划结算日)
    pub scheduled_date: NaiveDate,
    /// 实际结算时间戳 (Unix millis)
    pub paid_at: Option<i64>,
    pub status: PeriodStatus,

    pub method: Option<String>,
    pub processed_by: Option<String>,
    pub remarks: Option<String>,

    #[serde(default)]
    pub created_at: i64,
    #[serde(default)]
    pub updated_at: i64,
}

/// Upsert 入参 — None 字段保留既有值
#[derive(Debug, Clone, Default)]
pub struct PeriodPaymentUpsert {
    pub gross_amount: Option<f64>,
    pub tax_amount: Option<f64>,
    pub discount_amount: Option<f64>,
    /// 显式净额覆盖，跳过 gross+tax-discount 重算并持久保留
    pub net_override: Option<f64>,
    pub paid_at: Option<i64>,
    pub status: Option<PeriodStatus>,
    pub method: Option<String>,
    pub processed_by: Option<String>,
    pub remarks: Option<String>,
}
