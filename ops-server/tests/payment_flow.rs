//! Payment processing end-to-end: guards, ledger upsert, schedule rollover
//! Run: cargo test -p ops-server --test payment_flow

use chrono::NaiveDate;
use surrealdb::Surreal;
use surrealdb::engine::local::Db;

use ops_server::billing::{PaymentCycle, PaymentSchedule, PaymentTiming, PeriodStatus};
use ops_server::db::DbService;
use ops_server::db::models::{Client, ClientCreate, EntityKind, PeriodPaymentUpsert};
use ops_server::db::repository::{ClientRepository, PeriodPaymentRepository};
use ops_server::services::{PaymentService, ProcessPayment};
use shared::ErrorCode;

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

async fn test_db() -> (tempfile::TempDir, Surreal<Db>) {
    let tmp = tempfile::tempdir().unwrap();
    let service = DbService::new(tmp.path().to_str().unwrap()).await.unwrap();
    (tmp, service.db)
}

async fn seed_client(
    db: &Surreal<Db>,
    name: &str,
    amount: f64,
    payment_day: u32,
    cycle: PaymentCycle,
    joined: NaiveDate,
    today: NaiveDate,
) -> Client {
    let repo = ClientRepository::new(db.clone());
    repo.create(
        ClientCreate {
            name: name.to_string(),
            company: None,
            email: None,
            phone: None,
            joined_date: Some(joined),
            recurring_amount: amount,
            payment_cycle: cycle,
            payment_day,
        },
        joined,
        PaymentSchedule::init(cycle, payment_day, today),
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
async fn process_payment_settles_period_and_advances_schedule() {
    let (_tmp, db) = test_db().await;
    let today = date(2026, 3, 5);
    let client = seed_client(
        &db,
        "Acme Studio",
        1500.0,
        31,
        PaymentCycle::Monthly,
        date(2026, 1, 10),
        today,
    )
    .await;
    let id = client.id.clone().unwrap().to_string();
    assert_eq!(client.next_payment_date, date(2026, 3, 31));

    let service = PaymentService::new(db.clone());
    let record = service
        .process_client_payment(&id, payment("bank_transfer"), today)
        .await
        .unwrap();

    // ledger row for the current period, early settlement
    assert_eq!(record.month, 3);
    assert_eq!(record.year, 2026);
    assert_eq!(record.entity_kind, EntityKind::Client);
    assert_eq!(record.status, PeriodStatus::EarlyPaid);
    assert_eq!(record.gross_amount, 1500.0);
    assert_eq!(record.net_amount, 1500.0);
    assert_eq!(record.scheduled_date, date(2026, 3, 31));
    assert!(record.paid_at.is_some());
    assert_eq!(record.method.as_deref(), Some("bank_transfer"));

    // entity schedule advanced: Mar 5 + 1 month, nominal day 31 clamped to Apr 30
    let repo = ClientRepository::new(db.clone());
    let reloaded = repo.find_by_id(&id).await.unwrap().unwrap();
    assert_eq!(reloaded.next_payment_date, date(2026, 4, 30));
    assert_eq!(reloaded.current_period_status, PeriodStatus::EarlyPaid);
    assert_eq!(reloaded.last_payment_date, Some(today));
    assert_eq!(reloaded.payment_timing, Some(PaymentTiming::Early));
}

#[tokio::test]
async fn double_payment_for_same_period_is_rejected() {
    let (_tmp, db) = test_db().await;
    let today = date(2026, 3, 5);
    let client = seed_client(
        &db,
        "Acme Studio",
        1500.0,
        15,
        PaymentCycle::Monthly,
        date(2026, 1, 10),
        today,
    )
    .await;
    let id = client.id.unwrap().to_string();

    let service = PaymentService::new(db.clone());
    service
        .process_client_payment(&id, payment("cash"), today)
        .await
        .unwrap();

    let err = service
        .process_client_payment(&id, payment("cash"), today)
        .await
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::PeriodAlreadySettled);
}

#[tokio::test]
async fn future_period_is_rejected() {
    let (_tmp, db) = test_db().await;
    let today = date(2026, 3, 5);
    let client = seed_client(
        &db,
        "Acme Studio",
        1500.0,
        15,
        PaymentCycle::Monthly,
        date(2026, 1, 10),
        today,
    )
    .await;
    let id = client.id.unwrap().to_string();

    let mut input = payment("cash");
    input.month = Some(4);
    input.year = Some(2026);

    let err = PaymentService::new(db.clone())
        .process_client_payment(&id, input, today)
        .await
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::FuturePeriod);
}

#[tokio::test]
async fn period_before_onboarding_is_rejected() {
    let (_tmp, db) = test_db().await;
    let today = date(2026, 3, 5);
    let client = seed_client(
        &db,
        "Acme Studio",
        1500.0,
        15,
        PaymentCycle::Monthly,
        date(2026, 1, 10),
        today,
    )
    .await;
    let id = client.id.unwrap().to_string();

    let mut input = payment("cash");
    input.month = Some(12);
    input.year = Some(2025);

    let err = PaymentService::new(db.clone())
        .process_client_payment(&id, input, today)
        .await
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::PeriodBeforeOnboarding);
    assert!(err.message.contains("onboarding"));
}

#[tokio::test]
async fn custom_cycle_rollover_is_rejected_not_defaulted() {
    let (_tmp, db) = test_db().await;
    let today = date(2026, 3, 5);
    // legacy data path: a custom-cycle entity already in the roster
    let client = seed_client(
        &db,
        "Legacy Co",
        900.0,
        15,
        PaymentCycle::Custom,
        date(2026, 1, 10),
        today,
    )
    .await;
    let id = client.id.unwrap().to_string();

    let err = PaymentService::new(db.clone())
        .process_client_payment(&id, payment("cash"), today)
        .await
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::UnsupportedCycle);
}

#[tokio::test]
async fn explicit_amounts_compute_net_on_the_ledger_row() {
    let (_tmp, db) = test_db().await;
    let today = date(2026, 3, 5);
    let client = seed_client(
        &db,
        "Acme Studio",
        1500.0,
        15,
        PaymentCycle::Monthly,
        date(2026, 1, 10),
        today,
    )
    .await;
    let id = client.id.unwrap().to_string();

    let mut input = payment("bank_transfer");
    input.amount = Some(1000.0);
    input.tax = Some(210.0);
    input.discount = Some(10.0);

    let record = PaymentService::new(db.clone())
        .process_client_payment(&id, input, today)
        .await
        .unwrap();
    assert_eq!(record.gross_amount, 1000.0);
    assert_eq!(record.tax_amount, 210.0);
    assert_eq!(record.discount_amount, 10.0);
    assert_eq!(record.net_amount, 1200.0);
    assert!(!record.net_overridden);
}

#[tokio::test]
async fn ledger_upsert_keeps_one_row_and_preserves_net_override() {
    let (_tmp, db) = test_db().await;
    let today = date(2026, 3, 5);
    let client = seed_client(
        &db,
        "Acme Studio",
        1500.0,
        15,
        PaymentCycle::Monthly,
        date(2026, 1, 10),
        today,
    )
    .await;
    let entity = client.id.unwrap();
    let ledger = PeriodPaymentRepository::new(db.clone());
    let scheduled = date(2026, 3, 31);

    // first write computes net from amounts
    let first = ledger
        .upsert(
            entity.clone(),
            EntityKind::Client,
            3,
            2026,
            scheduled,
            PeriodPaymentUpsert {
                gross_amount: Some(1000.0),
                tax_amount: Some(210.0),
                discount_amount: Some(10.0),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(first.net_amount, 1200.0);

    // correction run with an explicit override
    let second = ledger
        .upsert(
            entity.clone(),
            EntityKind::Client,
            3,
            2026,
            scheduled,
            PeriodPaymentUpsert {
                net_override: Some(999.0),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(second.net_amount, 999.0);
    assert!(second.net_overridden);
    assert_eq!(second.id, first.id);

    // unrelated save keeps the override
    let third = ledger
        .upsert(
            entity.clone(),
            EntityKind::Client,
            3,
            2026,
            scheduled,
            PeriodPaymentUpsert {
                remarks: Some("corrected by finance".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(third.net_amount, 999.0);
    assert!(third.net_overridden);
    assert_eq!(third.remarks.as_deref(), Some("corrected by finance"));

    // still exactly one row for the (entity, month, year) triple
    let history = ledger.find_by_entity(&entity).await.unwrap();
    assert_eq!(history.len(), 1);
}

#[tokio::test]
async fn past_open_period_can_be_cleared() {
    let (_tmp, db) = test_db().await;
    let today = date(2026, 3, 5);
    let client = seed_client(
        &db,
        "Acme Studio",
        1500.0,
        15,
        PaymentCycle::Monthly,
        date(2025, 11, 1),
        today,
    )
    .await;
    let id = client.id.unwrap().to_string();

    // February was never settled; clearing it now is allowed
    let mut input = payment("cash");
    input.month = Some(2);
    input.year = Some(2026);

    let record = PaymentService::new(db.clone())
        .process_client_payment(&id, input, today)
        .await
        .unwrap();
    assert_eq!(record.month, 2);
    assert_eq!(record.scheduled_date, date(2026, 2, 28));
}
