//! Report row and response types

use crate::billing::{PaymentCycle, PeriodStatus};
use crate::db::models::MonthlyReport;
use chrono::NaiveDate;
use serde::Serialize;

/// 报表响应：明细行 + 与快照一致的汇总
#[derive(Debug, Clone, Serialize)]
pub struct PeriodReport<R> {
    pub month: u32,
    pub year: i32,
    pub details: Vec<R>,
    pub summary: MonthlyReport,
}

/// Client monthly report row
///
/// 没有台账行的客户同样出一行 (status = pending) —
/// 报表的意义正在于暴露缺失的收款。
#[derive(Debug, Clone, Serialize)]
pub struct ClientReportRow {
    pub client_id: String,
    pub name: String,
    pub company: Option<String>,
    pub payment_cycle: PaymentCycle,
    pub recurring_amount: f64,
    pub status: PeriodStatus,
    pub gross_amount: f64,
    pub tax_amount: f64,
    pub discount_amount: f64,
    pub net_amount: f64,
    pub paid_at: Option<i64>,
    pub method: Option<String>,
    /// 当期交付条目数
    pub delivered_count: i32,
    pub content_verified: bool,
}

/// Employee monthly report row
#[derive(Debug, Clone, Serialize)]
pub struct EmployeeReportRow {
    pub employee_id: String,
    pub name: String,
    pub designation: Option<String>,
    pub payment_cycle: PaymentCycle,
    pub recurring_amount: f64,
    pub status: PeriodStatus,
    pub net_amount: f64,
    pub paid_at: Option<i64>,
    pub method: Option<String>,
    /// 当期批准休假天数
    pub leave_days: i64,
}

/// 收支报表条目 — 带显式 source 判别的和类型
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "source", rename_all = "snake_case")]
pub enum FinanceEntry {
    /// 期账台账中的已结算收付
    Ledger {
        entity_id: String,
        amount: f64,
        paid_at: Option<i64>,
        method: Option<String>,
    },
    /// 通用收支记录
    External {
        id: String,
        category: String,
        amount: f64,
        date: NaiveDate,
        note: Option<String>,
    },
}

/// Finance report: income vs expense for one period
#[derive(Debug, Clone, Serialize)]
pub struct FinanceReport {
    pub month: u32,
    pub year: i32,
    pub income: Vec<FinanceEntry>,
    pub expense: Vec<FinanceEntry>,
    pub summary: MonthlyReport,
}
