//! Employee Repository

use super::{BaseRepository, RepoError, RepoResult};
use crate::billing::{PaymentSchedule, PeriodStatus};
use crate::db::models::{Employee, EmployeeCreate, EmployeeUpdate};
use chrono::NaiveDate;
use surrealdb::engine::local::Db;
use surrealdb::{RecordId, Surreal};

#[derive(Clone)]
pub struct EmployeeRepository {
    base: BaseRepository,
}

impl EmployeeRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// Find all current employees (active, not terminated)
    pub async fn find_current(&self) -> RepoResult<Vec<Employee>> {
        let employees: Vec<Employee> = self
            .base
            .db()
            .query(
                "SELECT * FROM employee WHERE is_active = true AND terminated_date = NONE ORDER BY name",
            )
            .await?
            .take(0)?;
        Ok(employees)
    }

    /// Find all employees including terminated/deactivated
    pub async fn find_all(&self) -> RepoResult<Vec<Employee>> {
        let employees: Vec<Employee> = self
            .base
            .db()
            .query("SELECT * FROM employee ORDER BY name")
            .await?
            .take(0)?;
        Ok(employees)
    }

    /// Find employee by id
    pub async fn find_by_id(&self, id: &str) -> RepoResult<Option<Employee>> {
        let thing: RecordId = id
            .parse()
            .map_err(|_| RepoError::Validation(format!("Invalid ID: {}", id)))?;
        let emp: Option<Employee> = self.base.db().select(thing).await?;
        Ok(emp)
    }

    /// Create a new employee with its initial salary schedule
    pub async fn create(
        &self,
        data: EmployeeCreate,
        joined_date: NaiveDate,
        schedule: PaymentSchedule,
    ) -> RepoResult<Employee> {
        let now = shared::util::now_millis();
        let mut result = self
            .base
            .db()
            .query(
                r#"CREATE employee SET
                    name = $name,
                    email = $email,
                    phone = $phone,
                    designation = $designation,
                    joined_date = $joined_date,
                    terminated_date = NONE,
                    recurring_amount = $recurring_amount,
                    payment_cycle = $payment_cycle,
                    payment_day = $payment_day,
                    next_payment_date = $next_payment_date,
                    current_period_status = $status,
                    last_payment_date = NONE,
                    payment_timing = NONE,
                    is_active = true,
                    created_at = $now,
                    updated_at = $now
                RETURN AFTER"#,
            )
            .bind(("name", data.name))
            .bind(("email", data.email))
            .bind(("phone", data.phone))
            .bind(("designation", data.designation))
            .bind(("joined_date", joined_date))
            .bind(("recurring_amount", data.recurring_amount))
            .bind(("payment_cycle", schedule.cycle))
            .bind(("payment_day", schedule.payment_day))
            .bind(("next_payment_date", schedule.next_payment_date))
            .bind(("status", schedule.status))
            .bind(("now", now))
            .await?;

        let created: Option<Employee> = result.take(0)?;
        created.ok_or_else(|| RepoError::Database("Failed to create employee".to_string()))
    }

    /// Update an employee
    pub async fn update(
        &self,
        id: &str,
        data: EmployeeUpdate,
        status: Option<PeriodStatus>,
    ) -> RepoResult<Employee> {
        let thing: RecordId = id
            .parse()
            .map_err(|_| RepoError::Validation(format!("Invalid ID: {}", id)))?;
        self.find_by_id(id)
            .await?
            .ok_or_else(|| RepoError::NotFound(format!("Employee {} not found", id)))?;

        let mut result = self
            .base
            .db()
            .query(
                r#"UPDATE $thing SET
                    name = $name OR name,
                    email = $email OR email,
                    phone = $phone OR phone,
                    designation = $designation OR designation,
                    terminated_date = IF $has_terminated THEN $terminated ELSE terminated_date END,
                    recurring_amount = IF $has_amount THEN $amount ELSE recurring_amount END,
                    payment_cycle = IF $has_cycle THEN $cycle ELSE payment_cycle END,
                    payment_day = IF $has_day THEN $day ELSE payment_day END,
                    next_payment_date = IF $has_next THEN $next ELSE next_payment_date END,
                    current_period_status = IF $has_status THEN $status ELSE current_period_status END,
                    is_active = IF $has_is_active THEN $is_active ELSE is_active END,
                    updated_at = $now
                RETURN AFTER"#,
            )
            .bind(("thing", thing))
            .bind(("name", data.name))
            .bind(("email", data.email))
            .bind(("phone", data.phone))
            .bind(("designation", data.designation))
            .bind(("has_terminated", data.terminated_date.is_some()))
            .bind(("terminated", data.terminated_date))
            .bind(("has_amount", data.recurring_amount.is_some()))
            .bind(("amount", data.recurring_amount))
            .bind(("has_cycle", data.payment_cycle.is_some()))
            .bind(("cycle", data.payment_cycle))
            .bind(("has_day", data.payment_day.is_some()))
            .bind(("day", data.payment_day))
            .bind(("has_next", data.next_payment_date.is_some()))
            .bind(("next", data.next_payment_date))
            .bind(("has_status", status.is_some()))
            .bind(("status", status))
            .bind(("has_is_active", data.is_active.is_some()))
            .bind(("is_active", data.is_active))
            .bind(("now", shared::util::now_millis()))
            .await?;

        result
            .take::<Option<Employee>>(0)?
            .ok_or_else(|| RepoError::NotFound(format!("Employee {} not found", id)))
    }

    /// Persist the schedule advanced by a settlement
    pub async fn update_schedule(
        &self,
        id: &str,
        schedule: &PaymentSchedule,
    ) -> RepoResult<Employee> {
        let thing: RecordId = id
            .parse()
            .map_err(|_| RepoError::Validation(format!("Invalid ID: {}", id)))?;

        let mut result = self
            .base
            .db()
            .query(
                r#"UPDATE $thing SET
                    next_payment_date = $next_payment_date,
                    current_period_status = $status,
                    last_payment_date = $last_payment_date,
                    payment_timing = $timing,
                    updated_at = $now
                RETURN AFTER"#,
            )
            .bind(("thing", thing))
            .bind(("next_payment_date", schedule.next_payment_date))
            .bind(("status", schedule.status))
            .bind(("last_payment_date", schedule.last_payment_date))
            .bind(("timing", schedule.timing))
            .bind(("now", shared::util::now_millis()))
            .await?;

        result
            .take::<Option<Employee>>(0)?
            .ok_or_else(|| RepoError::NotFound(format!("Employee {} not found", id)))
    }

    /// Soft delete (deactivate); payment history is kept intact
    pub async fn deactivate(&self, id: &str) -> RepoResult<bool> {
        let thing: RecordId = id
            .parse()
            .map_err(|_| RepoError::Validation(format!("Invalid ID: {}", id)))?;
        self.find_by_id(id)
            .await?
            .ok_or_else(|| RepoError::NotFound(format!("Employee {} not found", id)))?;

        self.base
            .db()
            .query("UPDATE $thing SET is_active = false, updated_at = $now")
            .bind(("thing", thing))
            .bind(("now", shared::util::now_millis()))
            .await?
            .check()?;
        Ok(true)
    }
}
