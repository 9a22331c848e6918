//! Client Model (客户)

use super::serde_helpers;
use crate::billing::{PaymentCycle, PaymentSchedule, PaymentTiming, PeriodStatus};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use surrealdb::RecordId;

/// Client ID type
pub type ClientId = RecordId;

/// Client entity with retainer billing schedule
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Client {
    #[serde(default, with = "serde_helpers::option_record_id")]
    pub id: Option<ClientId>,
    pub name: String,
    pub company: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,

    /// 签约日期，早于该月的账期拒绝收款
    pub joined_date: NaiveDate,

    // === 循环账期 ===
    /// 周期应收金额
    pub recurring_amount: f64,
    pub payment_cycle: PaymentCycle,
    /// 名义付款日 (1-31，短月收敛)
    pub payment_day: u32,
    pub next_payment_date: NaiveDate,
    pub current_period_status: PeriodStatus,
    pub last_payment_date: Option<NaiveDate>,
    pub payment_timing: Option<PaymentTiming>,

    /// 软删除标记
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

impl Client {
    /// 账期字段收拢成引擎状态值
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

/// Create client payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientCreate {
    pub name: String,
    pub company: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    /// 缺省为今天
    pub joined_date: Option<NaiveDate>,
    pub recurring_amount: f64,
    pub payment_cycle: PaymentCycle,
    pub payment_day: u32,
}

/// Update client payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub company: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub recurring_amount: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payment_cycle: Option<PaymentCycle>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payment_day: Option<u32>,
    /// 手工调整到期日，只允许向前
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_payment_date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
}
