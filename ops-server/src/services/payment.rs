//! Process-payment action (收款 / 发薪)
//!
//! 动作顺序固定：
//! 1. 解析账期 (缺省当期)，未来账期直接拒绝
//! 2. 早于实体入驻月的账期拒绝
//! 3. 已结算账期拒绝 (幂等护栏)
//! 4. 台账 upsert + 引擎推进实体账期并落库
//!
//! 时点分类基于推进前的到期日，引擎内部保证先分类后滚动。

use chrono::{Datelike, NaiveDate};

use crate::billing::PaymentSchedule;
use crate::db::models::{EntityKind, PeriodPayment, PeriodPaymentUpsert};
use crate::db::repository::{ClientRepository, EmployeeRepository, PeriodPaymentRepository};
use crate::utils::validation::{
    MAX_NOTE_LEN, MAX_SHORT_TEXT_LEN, validate_optional_amount, validate_optional_text,
    validate_required_text,
};
use crate::utils::{AppError, AppResult, calendar};
use surrealdb::Surreal;
use surrealdb::engine::local::Db;

/// Process-payment input
///
/// month/year 缺省为业务时区的当期。
#[derive(Debug, Clone, serde::Deserialize)]
pub struct ProcessPayment {
    pub month: Option<u32>,
    pub year: Option<i32>,
    /// 毛额，缺省为实体的周期应收/应付
    pub amount: Option<f64>,
    pub tax: Option<f64>,
    pub discount: Option<f64>,
    /// 显式净额覆盖 (跳过 gross+tax-discount)
    #[serde(rename = "net_amount")]
    pub net_override: Option<f64>,
    pub method: String,
    pub remarks: Option<String>,
    pub processed_by: Option<String>,
}

#[derive(Clone)]
pub struct PaymentService {
    db: Surreal<Db>,
}

impl PaymentService {
    pub fn new(db: Surreal<Db>) -> Self {
        Self { db }
    }

    /// Settle a client retainer period
    pub async fn process_client_payment(
        &self,
        id: &str,
        input: ProcessPayment,
        today: NaiveDate,
    ) -> AppResult<PeriodPayment> {
        let repo = ClientRepository::new(self.db.clone());
        let client = repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Client {}", id)))?;
        if !client.is_active {
            return Err(AppError::validation(format!(
                "Client '{}' is deactivated",
                client.name
            )));
        }
        let entity = client
            .id
            .clone()
            .ok_or_else(|| AppError::internal("Client row missing id"))?;

        let (record, advanced) = self
            .settle(
                entity,
                EntityKind::Client,
                client.joined_date,
                client.recurring_amount,
                client.schedule(),
                input,
                today,
            )
            .await?;

        repo.update_schedule(id, &advanced).await?;
        Ok(record)
    }

    /// Settle an employee salary period
    pub async fn process_employee_payment(
        &self,
        id: &str,
        input: ProcessPayment,
        today: NaiveDate,
    ) -> AppResult<PeriodPayment> {
        let repo = EmployeeRepository::new(self.db.clone());
        let employee = repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Employee {}", id)))?;
        if !employee.is_active || employee.terminated_date.is_some() {
            return Err(AppError::validation(format!(
                "Employee '{}' is no longer on the payroll",
                employee.name
            )));
        }
        let entity = employee
            .id
            .clone()
            .ok_or_else(|| AppError::internal("Employee row missing id"))?;

        let (record, advanced) = self
            .settle(
                entity,
                EntityKind::Employee,
                employee.joined_date,
                employee.recurring_amount,
                employee.schedule(),
                input,
                today,
            )
            .await?;

        repo.update_schedule(id, &advanced).await?;
        Ok(record)
    }

    /// Shared settlement flow: guards, ledger upsert, schedule advance
    #[allow(clippy::too_many_arguments)]
    async fn settle(
        &self,
        entity: surrealdb::RecordId,
        entity_kind: EntityKind,
        joined_date: NaiveDate,
        default_amount: f64,
        schedule: PaymentSchedule,
        input: ProcessPayment,
        today: NaiveDate,
    ) -> AppResult<(PeriodPayment, PaymentSchedule)> {
        validate_required_text(&input.method, "method", MAX_SHORT_TEXT_LEN)?;
        validate_optional_text(&input.remarks, "remarks", MAX_NOTE_LEN)?;
        validate_optional_amount(input.amount, "amount")?;
        validate_optional_amount(input.tax, "tax")?;
        validate_optional_amount(input.discount, "discount")?;
        validate_optional_amount(input.net_override, "net_amount")?;

        let (month, year) = calendar::resolve_period(input.month, input.year, today)?;
        if (year, month) > (today.year(), today.month()) {
            return Err(AppError::future_period(format!(
                "Cannot process a payment for {}/{}: period is in the future",
                month, year
            )));
        }
        if (year, month) < (joined_date.year(), joined_date.month()) {
            return Err(AppError::before_onboarding(format!(
                "Cannot process a payment for {}/{}: period precedes the onboarding date {}",
                month, year, joined_date
            )));
        }

        let ledger = PeriodPaymentRepository::new(self.db.clone());
        if ledger.has_settled_period(&entity, month, year).await? {
            return Err(AppError::already_settled(format!(
                "Period {}/{} is already settled",
                month, year
            )));
        }

        // 先分类后滚动：with_payment 基于推进前的到期日分类时点
        let advanced = schedule
            .with_payment(today)
            .map_err(|e| AppError::unsupported_cycle(e.to_string()))?;

        let scheduled_date = calendar::period_end(year, month)?;
        let record = ledger
            .upsert(
                entity,
                entity_kind,
                month,
                year,
                scheduled_date,
                PeriodPaymentUpsert {
                    gross_amount: Some(input.amount.unwrap_or(default_amount)),
                    tax_amount: Some(input.tax.unwrap_or(0.0)),
                    discount_amount: Some(input.discount.unwrap_or(0.0)),
                    net_override: input.net_override,
                    paid_at: Some(shared::util::now_millis()),
                    status: Some(advanced.status),
                    method: Some(input.method),
                    processed_by: input.processed_by,
                    remarks: input.remarks,
                },
            )
            .await?;

        Ok((record, advanced))
    }
}
