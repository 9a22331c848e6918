//! Finance Record Repository (通用收支)

use super::{BaseRepository, RepoError, RepoResult};
use crate::db::models::{FinanceRecord, FinanceRecordCreate};
use chrono::NaiveDate;
use surrealdb::Surreal;
use surrealdb::engine::local::Db;

#[derive(Clone)]
pub struct FinanceRepository {
    base: BaseRepository,
}

impl FinanceRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// Create a general income/expense record
    pub async fn create(&self, data: FinanceRecordCreate, date: NaiveDate) -> RepoResult<FinanceRecord> {
        let mut result = self
            .base
            .db()
            .query(
                r#"CREATE finance_record SET
                    kind = $kind,
                    category = $category,
                    amount = $amount,
                    date = $date,
                    note = $note,
                    created_at = $now
                RETURN AFTER"#,
            )
            .bind(("kind", data.kind))
            .bind(("category", data.category))
            .bind(("amount", data.amount))
            .bind(("date", date))
            .bind(("note", data.note))
            .bind(("now", shared::util::now_millis()))
            .await?;

        let created: Option<FinanceRecord> = result.take(0)?;
        created.ok_or_else(|| RepoError::Database("Failed to create finance record".to_string()))
    }

    /// Records within one date window (dates are ISO strings, so the
    /// range comparison is chronological)
    pub async fn find_by_date_range(
        &self,
        start: NaiveDate,
        end: NaiveDate,
    ) -> RepoResult<Vec<FinanceRecord>> {
        let mut result = self
            .base
            .db()
            .query(
                "SELECT * FROM finance_record WHERE date >= $start AND date <= $end ORDER BY date",
            )
            .bind(("start", start))
            .bind(("end", end))
            .await?;

        let rows: Vec<FinanceRecord> = result.take(0)?;
        Ok(rows)
    }

    /// List records, newest first
    pub async fn find_all(&self, limit: i32, offset: i32) -> RepoResult<Vec<FinanceRecord>> {
        let mut result = self
            .base
            .db()
            .query("SELECT * FROM finance_record ORDER BY date DESC LIMIT $limit START $offset")
            .bind(("limit", limit))
            .bind(("offset", offset))
            .await?;

        let rows: Vec<FinanceRecord> = result.take(0)?;
        Ok(rows)
    }
}
