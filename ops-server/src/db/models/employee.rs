//! Employee Model (员工)

use super::serde_helpers;
use crate::billing::{PaymentCycle, PaymentSchedule, PaymentTiming, PeriodStatus};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use surrealdb::RecordId;

/// Employee ID type
pub type EmployeeId = RecordId;

/// Employee entity with salary schedule
///
/// 工资侧与客户月费共用同一套账期状态机，字段一一对应。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Employee {
    #[serde(default, with = "serde_helpers::option_record_id")]
    pub id: Option<EmployeeId>,
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub designation: Option<String>,

    /// 入职日期
    pub joined_date: NaiveDate,
    /// 离职日期，非空即退出月报名册
    pub terminated_date: Option<NaiveDate>,

    // === 循环账期 (工资) ===
    pub recurring_amount: f64,
    pub payment_cycle: PaymentCycle,
    pub payment_day: u32,
    pub next_payment_date: NaiveDate,
    pub current_period_status: PeriodStatus,
    pub last_payment_date: Option<NaiveDate>,
    pub payment_timing: Option<PaymentTiming>,

    #[serde(default = "default_true", deserialize_with = "serde_helpers::bool_true")]
    pub is_active: bool,

    #[serde(default)]
    pub created_at: i64,
    #[serde(default)]
    pub updated_at: i64,
}

fn default_true() -> bool {
    true
}

impl Employee {
    pub fn schedule(&self) -> PaymentSchedule {
        PaymentSchedule {
            cycle: self.payment_cycle,
            payment_day: self.payment_day,
            next_payment_date: self.next_payment_date,
            status: self.current_period_status,
            last_payment_date: self.last_payment_date,
            timing: self.payment_timing,
        }
    }

    /// 当期有效状态 (只读刷新，不落库)
    pub fn effective_status(&self, today: NaiveDate) -> PeriodStatus {
        self.schedule().refreshed(today)
    }
}

/// Create employee payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmployeeCreate {
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub designation: Option<String>,
    pub joined_date: Option<NaiveDate>,
    pub recurring_amount: f64,
    pub payment_cycle: PaymentCycle,
    pub payment_day: u32,
}

/// Update employee payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmployeeUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub designation: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub terminated_date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub recurring_amount: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payment_cycle: Option<PaymentCycle>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payment_day: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_payment_date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
}
