//! Leave Record Repository (休假记录，只读)

use super::{BaseRepository, RepoResult};
use crate::db::models::LeaveRecord;
use chrono::NaiveDate;
use surrealdb::engine::local::Db;
use surrealdb::{RecordId, Surreal};

#[derive(Clone)]
pub struct LeaveRepository {
    base: BaseRepository,
}

impl LeaveRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// Approved leave records for one employee overlapping a date window
    pub async fn find_approved_overlapping(
        &self,
        employee: &RecordId,
        start: NaiveDate,
        end: NaiveDate,
    ) -> RepoResult<Vec<LeaveRecord>> {
        let mut result = self
            .base
            .db()
            .query(
                r#"SELECT * FROM leave_record
                    WHERE employee = $employee
                    AND status = 'approved'
                    AND start_date <= $end
                    AND end_date >= $start"#,
            )
            .bind(("employee", employee.clone()))
            .bind(("start", start))
            .bind(("end", end))
            .await?;

        let rows: Vec<LeaveRecord> = result.take(0)?;
        Ok(rows)
    }
}
