//! Monthly report aggregation: roster joins, totals, snapshot idempotence
//! Run: cargo test -p ops-server --test report_aggregation

use chrono::NaiveDate;
use surrealdb::Surreal;
use surrealdb::engine::local::Db;

use ops_server::billing::{PaymentCycle, PaymentSchedule, PeriodStatus};
use ops_server::db::DbService;
use ops_server::db::models::{
    Client, ClientCreate, Employee, EmployeeCreate, FinanceKind, FinanceRecordCreate, ReportKind,
};
use ops_server::db::repository::{
    ClientRepository, EmployeeRepository, FinanceRepository, MonthlyReportRepository,
};
use ops_server::reports::{FinanceEntry, ReportService};
use ops_server::services::{PaymentService, ProcessPayment};

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

async fn test_db() -> (tempfile::TempDir, Surreal<Db>) {
    let tmp = tempfile::tempdir().unwrap();
    let service = DbService::new(tmp.path().to_str().unwrap()).await.unwrap();
    (tmp, service.db)
}

async fn seed_client(db: &Surreal<Db>, name: &str, amount: f64, today: NaiveDate) -> Client {
    ClientRepository::new(db.clone())
        .create(
            ClientCreate {
                name: name.to_string(),
                company: None,
                email: None,
                phone: None,
                joined_date: Some(date(2026, 1, 1)),
                recurring_amount: amount,
                payment_cycle: PaymentCycle::Monthly,
                payment_day: 15,
            },
            date(2026, 1, 1),
            PaymentSchedule::init(PaymentCycle::Monthly, 15, today),
        )
        .await
        .unwrap()
}

async fn seed_employee(db: &Surreal<Db>, name: &str, salary: f64, today: NaiveDate) -> Employee {
    EmployeeRepository::new(db.clone())
        .create(
            EmployeeCreate {
                name: name.to_string(),
                email: None,
                phone: None,
                designation: Some("Designer".to_string()),
                joined_date: Some(date(2026, 1, 1)),
                recurring_amount: salary,
                payment_cycle: PaymentCycle::Monthly,
                payment_day: 28,
            },
            date(2026, 1, 1),
            PaymentSchedule::init(PaymentCycle::Monthly, 28, today),
        )
        .await
        .unwrap()
}

fn payment(method: &str) -> ProcessPayment {
    ProcessPayment {
        month: None,
        year: None,
        amount: None,
        tax: None,
        discount: None,
        net_override: None,
        method: method.to_string(),
        remarks: None,
        processed_by: None,
    }
}

#[tokio::test]
async fn client_report_lists_every_active_client_and_totals_settled_only() {
    let (_tmp, db) = test_db().await;
    let today = date(2026, 3, 10);

    let paid = seed_client(&db, "Acme Studio", 1000.0, today).await;
    let _unpaid = seed_client(&db, "Borealis Ltd", 2000.0, today).await;

    PaymentService::new(db.clone())
        .process_client_payment(&paid.id.unwrap().to_string(), payment("bank_transfer"), today)
        .await
        .unwrap();

    let report = ReportService::new(db.clone())
        .build_client_report(3, 2026, None)
        .await
        .unwrap();

    // both clients appear, including the one without a ledger row
    assert_eq!(report.details.len(), 2);
    let unpaid_row = report
        .details
        .iter()
        .find(|r| r.name == "Borealis Ltd")
        .unwrap();
    assert_eq!(unpaid_row.status, PeriodStatus::Pending);
    assert_eq!(unpaid_row.net_amount, 0.0);

    // collected counts settled rows only; expected counts the full roster
    assert_eq!(report.summary.total_collected, 1000.0);
    assert_eq!(report.summary.total_expected, 3000.0);
    assert_eq!(report.summary.settled_count, 1);
    assert_eq!(report.summary.unsettled_count, 1);
    assert_eq!(report.summary.entity_count, 2);
}

#[tokio::test]
async fn deactivated_clients_drop_out_of_the_report() {
    let (_tmp, db) = test_db().await;
    let today = date(2026, 3, 10);

    let _kept = seed_client(&db, "Acme Studio", 1000.0, today).await;
    let dropped = seed_client(&db, "Borealis Ltd", 2000.0, today).await;
    let repo = ClientRepository::new(db.clone());
    repo.deactivate(&dropped.id.unwrap().to_string())
        .await
        .unwrap();

    let report = ReportService::new(db.clone())
        .build_client_report(3, 2026, None)
        .await
        .unwrap();
    assert_eq!(report.details.len(), 1);
    assert_eq!(report.summary.total_expected, 1000.0);
}

#[tokio::test]
async fn client_report_includes_content_verification_counts() {
    let (_tmp, db) = test_db().await;
    let today = date(2026, 3, 10);
    let client = seed_client(&db, "Acme Studio", 1000.0, today).await;
    let entity = client.id.unwrap();

    db.query(
        "CREATE content_verification SET client = $client, month = 3, year = 2026, delivered_count = 4, verified = true",
    )
    .bind(("client", entity.clone()))
    .await
    .unwrap()
    .check()
    .unwrap();

    let report = ReportService::new(db.clone())
        .build_client_report(3, 2026, None)
        .await
        .unwrap();
    let row = &report.details[0];
    assert_eq!(row.delivered_count, 4);
    assert!(row.content_verified);
}

#[tokio::test]
async fn snapshot_upsert_is_idempotent_per_period() {
    let (_tmp, db) = test_db().await;
    let today = date(2026, 3, 10);
    let client = seed_client(&db, "Acme Studio", 1000.0, today).await;

    PaymentService::new(db.clone())
        .process_client_payment(&client.id.unwrap().to_string(), payment("cash"), today)
        .await
        .unwrap();

    let service = ReportService::new(db.clone());
    let first = service.build_client_report(3, 2026, None).await.unwrap();
    let second = service.build_client_report(3, 2026, None).await.unwrap();

    // same totals, and still a single snapshot row for the period
    assert_eq!(
        first.summary.total_collected,
        second.summary.total_collected
    );
    assert_eq!(first.summary.total_expected, second.summary.total_expected);

    let snapshots = MonthlyReportRepository::new(db.clone())
        .find_all(Some(ReportKind::Client), 10, 0)
        .await
        .unwrap();
    assert_eq!(snapshots.len(), 1);
    assert_eq!(snapshots[0].id, second.summary.id);
}

#[tokio::test]
async fn employee_report_counts_approved_leave_days_in_period() {
    let (_tmp, db) = test_db().await;
    let today = date(2026, 3, 10);
    let employee = seed_employee(&db, "Dana", 2500.0, today).await;
    let entity = employee.id.clone().unwrap();

    PaymentService::new(db.clone())
        .process_employee_payment(&entity.to_string(), payment("bank_transfer"), today)
        .await
        .unwrap();

    // 3 days inside March + 2 days of a leave spanning the month boundary
    db.query("CREATE leave_record SET employee = $e, start_date = $s, end_date = $end, status = 'approved'")
        .bind(("e", entity.clone()))
        .bind(("s", date(2026, 3, 10)))
        .bind(("end", date(2026, 3, 12)))
        .await
        .unwrap()
        .check()
        .unwrap();
    db.query("CREATE leave_record SET employee = $e, start_date = $s, end_date = $end, status = 'approved'")
        .bind(("e", entity.clone()))
        .bind(("s", date(2026, 2, 27)))
        .bind(("end", date(2026, 3, 2)))
        .await
        .unwrap()
        .check()
        .unwrap();
    // rejected leave is ignored
    db.query("CREATE leave_record SET employee = $e, start_date = $s, end_date = $end, status = 'rejected'")
        .bind(("e", entity.clone()))
        .bind(("s", date(2026, 3, 20)))
        .bind(("end", date(2026, 3, 22)))
        .await
        .unwrap()
        .check()
        .unwrap();

    let report = ReportService::new(db.clone())
        .build_employee_report(3, 2026, None)
        .await
        .unwrap();

    assert_eq!(report.details.len(), 1);
    assert_eq!(report.details[0].leave_days, 5);
    assert_eq!(report.summary.leave_days, 5);
    assert_eq!(report.summary.total_collected, 2500.0);
    assert_eq!(report.summary.total_expected, 2500.0);
}

#[tokio::test]
async fn terminated_employees_drop_out_of_the_roster() {
    let (_tmp, db) = test_db().await;
    let today = date(2026, 3, 10);
    let _kept = seed_employee(&db, "Dana", 2500.0, today).await;
    let leaving = seed_employee(&db, "Eli", 1800.0, today).await;

    let repo = EmployeeRepository::new(db.clone());
    let update = ops_server::db::models::EmployeeUpdate {
        name: None,
        email: None,
        phone: None,
        designation: None,
        terminated_date: Some(date(2026, 2, 28)),
        recurring_amount: None,
        payment_cycle: None,
        payment_day: None,
        next_payment_date: None,
        is_active: None,
    };
    repo.update(&leaving.id.unwrap().to_string(), update, None)
        .await
        .unwrap();

    let report = ReportService::new(db.clone())
        .build_employee_report(3, 2026, None)
        .await
        .unwrap();
    assert_eq!(report.details.len(), 1);
    assert_eq!(report.details[0].name, "Dana");
}

#[tokio::test]
async fn finance_report_merges_ledger_and_external_entries() {
    let (_tmp, db) = test_db().await;
    let today = date(2026, 3, 10);

    // settled retainer (income) and salary (expense) via the ledger
    let client = seed_client(&db, "Acme Studio", 1000.0, today).await;
    PaymentService::new(db.clone())
        .process_client_payment(&client.id.unwrap().to_string(), payment("bank_transfer"), today)
        .await
        .unwrap();
    let employee = seed_employee(&db, "Dana", 800.0, today).await;
    PaymentService::new(db.clone())
        .process_employee_payment(&employee.id.unwrap().to_string(), payment("bank_transfer"), today)
        .await
        .unwrap();

    // general records
    let finance = FinanceRepository::new(db.clone());
    finance
        .create(
            FinanceRecordCreate {
                kind: FinanceKind::Income,
                category: "consulting".to_string(),
                amount: 500.0,
                date: None,
                note: None,
            },
            date(2026, 3, 8),
        )
        .await
        .unwrap();
    finance
        .create(
            FinanceRecordCreate {
                kind: FinanceKind::Expense,
                category: "tools".to_string(),
                amount: 200.0,
                date: None,
                note: None,
            },
            date(2026, 3, 9),
        )
        .await
        .unwrap();

    let report = ReportService::new(db.clone())
        .build_finance_report(3, 2026, None)
        .await
        .unwrap();

    assert_eq!(report.summary.total_income, 1500.0);
    assert_eq!(report.summary.total_expense, 1000.0);
    assert_eq!(report.summary.net, 500.0);

    assert_eq!(report.income.len(), 2);
    assert!(report
        .income
        .iter()
        .any(|e| matches!(e, FinanceEntry::Ledger { amount, .. } if *amount == 1000.0)));
    assert!(report
        .income
        .iter()
        .any(|e| matches!(e, FinanceEntry::External { category, .. } if category == "consulting")));
    assert_eq!(report.expense.len(), 2);

    // 快照与响应汇总一致
    let snapshot = MonthlyReportRepository::new(db.clone())
        .find_by_key(ReportKind::Finance, 3, 2026)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(snapshot.net, 500.0);
}
