//! Content Verification Repository (交付核验，只读)

use super::{BaseRepository, RepoResult};
use crate::db::models::ContentVerification;
use surrealdb::engine::local::Db;
use surrealdb::{RecordId, Surreal};

#[derive(Clone)]
pub struct ContentVerificationRepository {
    base: BaseRepository,
}

impl ContentVerificationRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// Verification records for one (client, month, year)
    pub async fn find_for_period(
        &self,
        client: &RecordId,
        month: u32,
        year: i32,
    ) -> RepoResult<Vec<ContentVerification>> {
        let mut result = self
            .base
            .db()
            .query(
                "SELECT * FROM content_verification WHERE client = $client AND month = $month AND year = $year",
            )
            .bind(("client", client.clone()))
            .bind(("month", month))
            .bind(("year", year))
            .await?;

        let rows: Vec<ContentVerification> = result.take(0)?;
        Ok(rows)
    }
}
