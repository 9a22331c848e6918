//! Monthly Report Repository (月报快照)

use super::{BaseRepository, RepoError, RepoResult};
use crate::db::models::{MonthlyReport, ReportKind};
use surrealdb::Surreal;
use surrealdb::engine::local::Db;

#[derive(Clone)]
pub struct MonthlyReportRepository {
    base: BaseRepository,
}

impl MonthlyReportRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// Upsert the snapshot keyed on (kind, month, year)
    ///
    /// 重算即整行覆盖；唯一索引保证同期只有一行。
    pub async fn upsert(&self, report: MonthlyReport) -> RepoResult<MonthlyReport> {
        let mut result = self
            .base
            .db()
            .query(
                r#"UPSERT monthly_report SET
                    kind = $kind,
                    month = $month,
                    year = $year,
                    total_expected = $total_expected,
                    total_collected = $total_collected,
                    total_tax = $total_tax,
                    total_discount = $total_discount,
                    entity_count = $entity_count,
                    settled_count = $settled_count,
                    unsettled_count = $unsettled_count,
                    leave_days = $leave_days,
                    total_income = $total_income,
                    total_expense = $total_expense,
                    net = $net,
                    generated_by = $generated_by,
                    generated_at = $generated_at
                WHERE kind = $kind AND month = $month AND year = $year
                RETURN AFTER"#,
            )
            .bind(("kind", report.kind))
            .bind(("month", report.month))
            .bind(("year", report.year))
            .bind(("total_expected", report.total_expected))
            .bind(("total_collected", report.total_collected))
            .bind(("total_tax", report.total_tax))
            .bind(("total_discount", report.total_discount))
            .bind(("entity_count", report.entity_count))
            .bind(("settled_count", report.settled_count))
            .bind(("unsettled_count", report.unsettled_count))
            .bind(("leave_days", report.leave_days))
            .bind(("total_income", report.total_income))
            .bind(("total_expense", report.total_expense))
            .bind(("net", report.net))
            .bind(("generated_by", report.generated_by))
            .bind(("generated_at", report.generated_at))
            .await?;

        let rows: Vec<MonthlyReport> = result.take(0)?;
        rows.into_iter()
            .next()
            .ok_or_else(|| RepoError::Database("Failed to upsert monthly report".to_string()))
    }

    /// Find the snapshot for one (kind, month, year)
    pub async fn find_by_key(
        &self,
        kind: ReportKind,
        month: u32,
        year: i32,
    ) -> RepoResult<Option<MonthlyReport>> {
        let mut result = self
            .base
            .db()
            .query(
                "SELECT * FROM monthly_report WHERE kind = $kind AND month = $month AND year = $year LIMIT 1",
            )
            .bind(("kind", kind))
            .bind(("month", month))
            .bind(("year", year))
            .await?;

        let rows: Vec<MonthlyReport> = result.take(0)?;
        Ok(rows.into_iter().next())
    }

    /// List snapshots, newest period first, optionally filtered by kind
    pub async fn find_all(
        &self,
        kind: Option<ReportKind>,
        limit: i32,
        offset: i32,
    ) -> RepoResult<Vec<MonthlyReport>> {
        let mut result = match kind {
            Some(kind) => {
                self.base
                    .db()
                    .query(
                        "SELECT * FROM monthly_report WHERE kind = $kind ORDER BY year DESC, month DESC LIMIT $limit START $offset",
                    )
                    .bind(("kind", kind))
                    .bind(("limit", limit))
                    .bind(("offset", offset))
                    .await?
            }
            None => {
                self.base
                    .db()
                    .query(
                        "SELECT * FROM monthly_report ORDER BY year DESC, month DESC LIMIT $limit START $offset",
                    )
                    .bind(("limit", limit))
                    .bind(("offset", offset))
                    .await?
            }
        };

        let rows: Vec<MonthlyReport> = result.take(0)?;
        Ok(rows)
    }
}
