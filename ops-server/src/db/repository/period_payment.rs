//! Period Payment Repository (期账台账)
//!
//! 一个 (entity, month, year) 只存在一行，由启动时定义的唯一索引
//! 兜底并发竞争；写入走 upsert，后写者胜。

use super::{BaseRepository, RepoError, RepoResult};
use crate::billing::{PeriodStatus, money};
use crate::db::models::{EntityKind, PeriodPayment, PeriodPaymentUpsert};
use chrono::NaiveDate;
use surrealdb::engine::local::Db;
use surrealdb::{RecordId, Surreal};

#[derive(Clone)]
pub struct PeriodPaymentRepository {
    base: BaseRepository,
}

impl PeriodPaymentRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// Find the ledger row for one (entity, month, year)
    pub async fn find_period(
        &self,
        entity: &RecordId,
        month: u32,
        year: i32,
    ) -> RepoResult<Option<PeriodPayment>> {
        let mut result = self
            .base
            .db()
            .query(
                "SELECT * FROM period_payment WHERE entity = $entity AND month = $month AND year = $year LIMIT 1",
            )
            .bind(("entity", entity.clone()))
            .bind(("month", month))
            .bind(("year", year))
            .await?;

        let rows: Vec<PeriodPayment> = result.take(0)?;
        Ok(rows.into_iter().next())
    }

    /// Whether the period is settled (paid / early_paid)
    ///
    /// 重复收款的幂等护栏：process payment 先问这里。
    pub async fn has_settled_period(
        &self,
        entity: &RecordId,
        month: u32,
        year: i32,
    ) -> RepoResult<bool> {
        Ok(self
            .find_period(entity, month, year)
            .await?
            .map(|row| row.status.is_settled())
            .unwrap_or(false))
    }

    /// Upsert the ledger row keyed on (entity, month, year)
    ///
    /// 已有行按字段合并覆盖 (支持更正流程)，不产生第二行。
    /// 净额规则：显式覆盖优先且持久；否则金额字段有变化时重算
    /// gross + tax - discount；否则保留既有净额。
    pub async fn upsert(
        &self,
        entity: RecordId,
        entity_kind: EntityKind,
        month: u32,
        year: i32,
        scheduled_date: NaiveDate,
        fields: PeriodPaymentUpsert,
    ) -> RepoResult<PeriodPayment> {
        let now = shared::util::now_millis();

        match self.find_period(&entity, month, year).await? {
            Some(existing) => {
                let gross = fields.gross_amount.unwrap_or(existing.gross_amount);
                let tax = fields.tax_amount.unwrap_or(existing.tax_amount);
                let discount = fields.discount_amount.unwrap_or(existing.discount_amount);
                let amounts_touched = fields.gross_amount.is_some()
                    || fields.tax_amount.is_some()
                    || fields.discount_amount.is_some();

                let (net, net_overridden) = if let Some(net) = fields.net_override {
                    (net, true)
                } else if existing.net_overridden {
                    // 覆盖值跨无关字段保存仍然保留
                    (existing.net_amount, true)
                } else if amounts_touched {
                    (money::net_amount(gross, tax, discount), false)
                } else {
                    (existing.net_amount, false)
                };

                let id = existing.id.clone().ok_or_else(|| {
                    RepoError::Database("Period payment row missing id".to_string())
                })?;

                let mut result = self
                    .base
                    .db()
                    .query(
                        r#"UPDATE $thing SET
                            gross_amount = $gross,
                            tax_amount = $tax,
                            discount_amount = $discount,
                            net_amount = $net,
                            net_overridden = $net_overridden,
                            paid_at = IF $has_paid_at THEN $paid_at ELSE paid_at END,
                            status = IF $has_status THEN $status ELSE status END,
                            method = $method OR method,
                            processed_by = $processed_by OR processed_by,
                            remarks = $remarks OR remarks,
                            updated_at = $now
                        RETURN AFTER"#,
                    )
                    .bind(("thing", id))
                    .bind(("gross", gross))
                    .bind(("tax", tax))
                    .bind(("discount", discount))
                    .bind(("net", net))
                    .bind(("net_overridden", net_overridden))
                    .bind(("has_paid_at", fields.paid_at.is_some()))
                    .bind(("paid_at", fields.paid_at))
                    .bind(("has_status", fields.status.is_some()))
                    .bind(("status", fields.status))
                    .bind(("method", fields.method))
                    .bind(("processed_by", fields.processed_by))
                    .bind(("remarks", fields.remarks))
                    .bind(("now", now))
                    .await?;

                result.take::<Option<PeriodPayment>>(0)?.ok_or_else(|| {
                    RepoError::Database("Failed to update period payment".to_string())
                })
            }
            None => {
                let gross = fields.gross_amount.unwrap_or(0.0);
                let tax = fields.tax_amount.unwrap_or(0.0);
                let discount = fields.discount_amount.unwrap_or(0.0);
                let (net, net_overridden) = match fields.net_override {
                    Some(net) => (net, true),
                    None => (money::net_amount(gross, tax, discount), false),
                };
                let status = fields.status.unwrap_or(PeriodStatus::Pending);

                let mut result = self
                    .base
                    .db()
                    .query(
                        r#"CREATE period_payment SET
                            entity = $entity,
                            entity_kind = $entity_kind,
                            month = $month,
                            year = $year,
                            gross_amount = $gross,
                            tax_amount = $tax,
                            discount_amount = $discount,
                            net_amount = $net,
                            net_overridden = $net_overridden,
                            scheduled_date = $scheduled_date,
                            paid_at = $paid_at,
                            status = $status,
                            method = $method,
                            processed_by = $processed_by,
                            remarks = $remarks,
                            created_at = $now,
                            updated_at = $now
                        RETURN AFTER"#,
                    )
                    .bind(("entity", entity))
                    .bind(("entity_kind", entity_kind))
                    .bind(("month", month))
                    .bind(("year", year))
                    .bind(("gross", gross))
                    .bind(("tax", tax))
                    .bind(("discount", discount))
                    .bind(("net", net))
                    .bind(("net_overridden", net_overridden))
                    .bind(("scheduled_date", scheduled_date))
                    .bind(("paid_at", fields.paid_at))
                    .bind(("status", status))
                    .bind(("method", fields.method))
                    .bind(("processed_by", fields.processed_by))
                    .bind(("remarks", fields.remarks))
                    .bind(("now", now))
                    .await?;

                result.take::<Option<PeriodPayment>>(0)?.ok_or_else(|| {
                    RepoError::Database("Failed to create period payment".to_string())
                })
            }
        }
    }

    /// Payment history for one entity, newest period first
    pub async fn find_by_entity(&self, entity: &RecordId) -> RepoResult<Vec<PeriodPayment>> {
        let mut result = self
            .base
            .db()
            .query(
                "SELECT * FROM period_payment WHERE entity = $entity ORDER BY year DESC, month DESC",
            )
            .bind(("entity", entity.clone()))
            .await?;

        let rows: Vec<PeriodPayment> = result.take(0)?;
        Ok(rows)
    }

    /// All ledger rows of one kind for a period (aggregator input)
    pub async fn find_by_period(
        &self,
        month: u32,
        year: i32,
        entity_kind: EntityKind,
    ) -> RepoResult<Vec<PeriodPayment>> {
        let mut result = self
            .base
            .db()
            .query(
                "SELECT * FROM period_payment WHERE month = $month AND year = $year AND entity_kind = $kind",
            )
            .bind(("month", month))
            .bind(("year", year))
            .bind(("kind", entity_kind))
            .await?;

        let rows: Vec<PeriodPayment> = result.take(0)?;
        Ok(rows)
    }
}
