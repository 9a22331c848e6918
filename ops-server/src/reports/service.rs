//! Report aggregation service
//!
//! 每次构建都是对活数据的顺序只读查询，唯一的写入是快照 upsert
//! (幂等，同期覆盖)。单个实体的行装配失败只记 warn 并跳过，
//! 绝不放弃整份报表 — 历史数据校验松散，这是刻意的容错。

use rust_decimal::Decimal;

use crate::billing::PeriodStatus;
use crate::billing::money::{to_decimal, to_f64};
use crate::db::models::{
    Client, Employee, EntityKind, MonthlyReport, ReportKind,
};
use crate::db::repository::{
    ClientRepository, ContentVerificationRepository, EmployeeRepository, FinanceRepository,
    LeaveRepository, MonthlyReportRepository, PeriodPaymentRepository,
};
use crate::utils::{AppError, AppResult, calendar};
use surrealdb::Surreal;
use surrealdb::engine::local::Db;

use super::types::{
    ClientReportRow, EmployeeReportRow, FinanceEntry, FinanceReport, PeriodReport,
};

#[derive(Clone)]
pub struct ReportService {
    db: Surreal<Db>,
}

/// 账期汇总累加器
#[derive(Default)]
struct Totals {
    expected: Decimal,
    collected: Decimal,
    tax: Decimal,
    discount: Decimal,
    settled: i32,
    unsettled: i32,
}

impl Totals {
    /// 预期总额计全量在册实体；已结算行才计入实收
    fn add_row(&mut self, recurring_amount: f64, status: PeriodStatus, net: f64, tax: f64, discount: f64) {
        self.expected += to_decimal(recurring_amount);
        if status.is_settled() {
            self.settled += 1;
            self.collected += to_decimal(net);
            self.tax += to_decimal(tax);
            self.discount += to_decimal(discount);
        } else {
            self.unsettled += 1;
        }
    }
}

impl ReportService {
    pub fn new(db: Surreal<Db>) -> Self {
        Self { db }
    }

    /// Build the client monthly report and persist its snapshot
    pub async fn build_client_report(
        &self,
        month: u32,
        year: i32,
        generated_by: Option<String>,
    ) -> AppResult<PeriodReport<ClientReportRow>> {
        calendar::period_start(year, month)?;

        let clients = ClientRepository::new(self.db.clone()).find_active().await?;
        let ledger = PeriodPaymentRepository::new(self.db.clone());
        let verification = ContentVerificationRepository::new(self.db.clone());

        let mut details = Vec::with_capacity(clients.len());
        let mut totals = Totals::default();

        for client in &clients {
            match self.client_row(&ledger, &verification, client, month, year).await {
                Ok(row) => {
                    totals.add_row(
                        client.recurring_amount,
                        row.status,
                        row.net_amount,
                        row.tax_amount,
                        row.discount_amount,
                    );
                    details.push(row);
                }
                Err(e) => {
                    tracing::warn!(
                        client = %client.name,
                        error = %e,
                        "Skipping client row in monthly report"
                    );
                }
            }
        }

        let summary = self
            .upsert_snapshot(ReportKind::Client, month, year, &totals, 0, generated_by)
            .await?;

        Ok(PeriodReport {
            month,
            year,
            details,
            summary,
        })
    }

    /// Build the employee monthly report and persist its snapshot
    pub async fn build_employee_report(
        &self,
        month: u32,
        year: i32,
        generated_by: Option<String>,
    ) -> AppResult<PeriodReport<EmployeeReportRow>> {
        calendar::period_start(year, month)?;

        let employees = EmployeeRepository::new(self.db.clone()).find_current().await?;
        let ledger = PeriodPaymentRepository::new(self.db.clone());
        let leave = LeaveRepository::new(self.db.clone());

        let mut details = Vec::with_capacity(employees.len());
        let mut totals = Totals::default();
        let mut leave_days: i64 = 0;

        for employee in &employees {
            match self.employee_row(&ledger, &leave, employee, month, year).await {
                Ok(row) => {
                    totals.add_row(
                        employee.recurring_amount,
                        row.status,
                        row.net_amount,
                        0.0,
                        0.0,
                    );
                    leave_days += row.leave_days;
                    details.push(row);
                }
                Err(e) => {
                    tracing::warn!(
                        employee = %employee.name,
                        error = %e,
                        "Skipping employee row in monthly report"
                    );
                }
            }
        }

        let summary = self
            .upsert_snapshot(ReportKind::Employee, month, year, &totals, leave_days, generated_by)
            .await?;

        Ok(PeriodReport {
            month,
            year,
            details,
            summary,
        })
    }

    /// Build the finance report (income vs expense) and persist its snapshot
    ///
    /// 收入 = 通用收入记录 + 当期已结算客户收款 (台账)；
    /// 支出 = 通用支出记录 + 当期已结算工资 (台账)。
    pub async fn build_finance_report(
        &self,
        month: u32,
        year: i32,
        generated_by: Option<String>,
    ) -> AppResult<FinanceReport> {
        let start = calendar::period_start(year, month)?;
        let end = calendar::period_end(year, month)?;

        let records = FinanceRepository::new(self.db.clone())
            .find_by_date_range(start, end)
            .await?;
        let ledger = PeriodPaymentRepository::new(self.db.clone());

        let mut income = Vec::new();
        let mut expense = Vec::new();
        let mut total_income = Decimal::ZERO;
        let mut total_expense = Decimal::ZERO;

        for record in records {
            let entry = FinanceEntry::External {
                id: record.id.as_ref().map(|id| id.to_string()).unwrap_or_default(),
                category: record.category,
                amount: record.amount,
                date: record.date,
                note: record.note,
            };
            match record.kind {
                crate::db::models::FinanceKind::Income => {
                    total_income += to_decimal(record.amount);
                    income.push(entry);
                }
                crate::db::models::FinanceKind::Expense => {
                    total_expense += to_decimal(record.amount);
                    expense.push(entry);
                }
            }
        }

        for row in ledger.find_by_period(month, year, EntityKind::Client).await? {
            if row.status.is_settled() {
                total_income += to_decimal(row.net_amount);
                income.push(FinanceEntry::Ledger {
                    entity_id: row.entity.to_string(),
                    amount: row.net_amount,
                    paid_at: row.paid_at,
                    method: row.method,
                });
            }
        }
        for row in ledger.find_by_period(month, year, EntityKind::Employee).await? {
            if row.status.is_settled() {
                total_expense += to_decimal(row.net_amount);
                expense.push(FinanceEntry::Ledger {
                    entity_id: row.entity.to_string(),
                    amount: row.net_amount,
                    paid_at: row.paid_at,
                    method: row.method,
                });
            }
        }

        let summary = MonthlyReportRepository::new(self.db.clone())
            .upsert(MonthlyReport {
                id: None,
                kind: ReportKind::Finance,
                month,
                year,
                total_expected: 0.0,
                total_collected: 0.0,
                total_tax: 0.0,
                total_discount: 0.0,
                entity_count: (income.len() + expense.len()) as i32,
                settled_count: 0,
                unsettled_count: 0,
                leave_days: 0,
                total_income: to_f64(total_income),
                total_expense: to_f64(total_expense),
                net: to_f64(total_income - total_expense),
                generated_by,
                generated_at: shared::util::now_millis(),
            })
            .await?;

        Ok(FinanceReport {
            month,
            year,
            income,
            expense,
            summary,
        })
    }

    // ── Row assembly ────────────────────────────────────────────────

    async fn client_row(
        &self,
        ledger: &PeriodPaymentRepository,
        verification: &ContentVerificationRepository,
        client: &Client,
        month: u32,
        year: i32,
    ) -> AppResult<ClientReportRow> {
        let entity = client
            .id
            .clone()
            .ok_or_else(|| AppError::internal("Client row missing id"))?;

        let payment = ledger.find_period(&entity, month, year).await?;
        let checks = verification.find_for_period(&entity, month, year).await?;
        let delivered_count: i32 = checks.iter().map(|c| c.delivered_count).sum();
        let content_verified = !checks.is_empty() && checks.iter().all(|c| c.verified);

        let row = match payment {
            Some(p) => ClientReportRow {
                client_id: entity.to_string(),
                name: client.name.clone(),
                company: client.company.clone(),
                payment_cycle: client.payment_cycle,
                recurring_amount: client.recurring_amount,
                status: p.status,
                gross_amount: p.gross_amount,
                tax_amount: p.tax_amount,
                discount_amount: p.discount_amount,
                net_amount: p.net_amount,
                paid_at: p.paid_at,
                method: p.method,
                delivered_count,
                content_verified,
            },
            None => ClientReportRow {
                client_id: entity.to_string(),
                name: client.name.clone(),
                company: client.company.clone(),
                payment_cycle: client.payment_cycle,
                recurring_amount: client.recurring_amount,
                status: PeriodStatus::Pending,
                gross_amount: 0.0,
                tax_amount: 0.0,
                discount_amount: 0.0,
                net_amount: 0.0,
                paid_at: None,
                method: None,
                delivered_count,
                content_verified,
            },
        };
        Ok(row)
    }

    async fn employee_row(
        &self,
        ledger: &PeriodPaymentRepository,
        leave: &LeaveRepository,
        employee: &Employee,
        month: u32,
        year: i32,
    ) -> AppResult<EmployeeReportRow> {
        let entity = employee
            .id
            .clone()
            .ok_or_else(|| AppError::internal("Employee row missing id"))?;

        let payment = ledger.find_period(&entity, month, year).await?;

        let start = calendar::period_start(year, month)?;
        let end = calendar::period_end(year, month)?;
        let leave_days: i64 = leave
            .find_approved_overlapping(&entity, start, end)
            .await?
            .iter()
            .map(|l| l.days_within(start, end))
            .sum();

        let row = match payment {
            Some(p) => EmployeeReportRow {
                employee_id: entity.to_string(),
                name: employee.name.clone(),
                designation: employee.designation.clone(),
                payment_cycle: employee.payment_cycle,
                recurring_amount: employee.recurring_amount,
                status: p.status,
                net_amount: p.net_amount,
                paid_at: p.paid_at,
                method: p.method,
                leave_days,
            },
            None => EmployeeReportRow {
                employee_id: entity.to_string(),
                name: employee.name.clone(),
                designation: employee.designation.clone(),
                payment_cycle: employee.payment_cycle,
                recurring_amount: employee.recurring_amount,
                status: PeriodStatus::Pending,
                net_amount: 0.0,
                paid_at: None,
                method: None,
                leave_days,
            },
        };
        Ok(row)
    }

    async fn upsert_snapshot(
        &self,
        kind: ReportKind,
        month: u32,
        year: i32,
        totals: &Totals,
        leave_days: i64,
        generated_by: Option<String>,
    ) -> AppResult<MonthlyReport> {
        let summary = MonthlyReportRepository::new(self.db.clone())
            .upsert(MonthlyReport {
                id: None,
                kind,
                month,
                year,
                total_expected: to_f64(totals.expected),
                total_collected: to_f64(totals.collected),
                total_tax: to_f64(totals.tax),
                total_discount: to_f64(totals.discount),
                entity_count: totals.settled + totals.unsettled,
                settled_count: totals.settled,
                unsettled_count: totals.unsettled,
                leave_days,
                total_income: 0.0,
                total_expense: 0.0,
                net: 0.0,
                generated_by,
                generated_at: shared::util::now_millis(),
            })
            .await?;
        Ok(summary)
    }
}
