//! Client Repository

use super::{BaseRepository, RepoError, RepoResult};
use crate::billing::{PaymentSchedule, PeriodStatus};
use crate::db::models::{Client, ClientCreate, ClientUpdate};
use chrono::NaiveDate;
use surrealdb::engine::local::Db;
use surrealdb::{RecordId, Surreal};

#[derive(Clone)]
pub struct ClientRepository {
    base: BaseRepository,
}

impl ClientRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// Find all active clients
    pub async fn find_active(&self) -> RepoResult<Vec<Client>> {
        let clients: Vec<Client> = self
            .base
            .db()
            .query("SELECT * FROM client WHERE is_active = true ORDER BY name")
            .await?
            .take(0)?;
        Ok(clients)
    }

    /// Find all clients including deactivated ones
    pub async fn find_all(&self) -> RepoResult<Vec<Client>> {
        let clients: Vec<Client> = self
            .base
            .db()
            .query("SELECT * FROM client ORDER BY name")
            .await?
            .take(0)?;
        Ok(clients)
    }

    /// Find client by id
    pub async fn find_by_id(&self, id: &str) -> RepoResult<Option<Client>> {
        let thing: RecordId = id
            .parse()
            .map_err(|_| RepoError::Validation(format!("Invalid ID: {}", id)))?;
        let client: Option<Client> = self.base.db().select(thing).await?;
        Ok(client)
    }

    /// Create a new client with its initial payment schedule
    pub async fn create(
        &self,
        data: ClientCreate,
        joined_date: NaiveDate,
        schedule: PaymentSchedule,
    ) -> RepoResult<Client> {
        let now = shared::util::now_millis();
        let mut result = self
            .base
            .db()
            .query(
                r#"CREATE client SET
                    name = $name,
                    company = $company,
                    email = $email,
                    phone = $phone,
                    joined_date = $joined_date,
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
            .bind(("company", data.company))
            .bind(("email", data.email))
            .bind(("phone", data.phone))
            .bind(("joined_date", joined_date))
            .bind(("recurring_amount", data.recurring_amount))
            .bind(("payment_cycle", schedule.cycle))
            .bind(("payment_day", schedule.payment_day))
            .bind(("next_payment_date", schedule.next_payment_date))
            .bind(("status", schedule.status))
            .bind(("now", now))
            .await?;

        let created: Option<Client> = result.take(0)?;
        created.ok_or_else(|| RepoError::Database("Failed to create client".to_string()))
    }

    /// Update a client
    ///
    /// `status` carries the refreshed period status when the caller
    /// recomputed the schedule (payment_day/cycle/date edits).
    pub async fn update(
        &self,
        id: &str,
        data: ClientUpdate,
        status: Option<PeriodStatus>,
    ) -> RepoResult<Client> {
        let thing: RecordId = id
            .parse()
            .map_err(|_| RepoError::Validation(format!("Invalid ID: {}", id)))?;
        self.find_by_id(id)
            .await?
            .ok_or_else(|| RepoError::NotFound(format!("Client {} not found", id)))?;

        let mut result = self
            .base
            .db()
            .query(
                r#"UPDATE $thing SET
                    name = $name OR name,
                    company = $company OR company,
                    email = $email OR email,
                    phone = $phone OR phone,
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
            .bind(("company", data.company))
            .bind(("email", data.email))
            .bind(("phone", data.phone))
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
            .take::<Option<Client>>(0)?
            .ok_or_else(|| RepoError::NotFound(format!("Client {} not found", id)))
    }

    /// Persist the schedule advanced by a settlement
    pub async fn update_schedule(&self, id: &str, schedule: &PaymentSchedule) -> RepoResult<Client> {
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
            .take::<Option<Client>>(0)?
            .ok_or_else(|| RepoError::NotFound(format!("Client {} not found", id)))
    }

    /// Soft delete (deactivate); payment history is kept intact
    pub async fn deactivate(&self, id: &str) -> RepoResult<bool> {
        let thing: RecordId = id
            .parse()
            .map_err(|_| RepoError::Validation(format!("Invalid ID: {}", id)))?;
        self.find_by_id(id)
            .await?
            .ok_or_else(|| RepoError::NotFound(format!("Client {} not found", id)))?;

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
