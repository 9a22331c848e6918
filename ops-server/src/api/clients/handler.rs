//! Client API Handlers

use axum::{
    Json,
    extract::{Path, Query, State},
};
use chrono::NaiveDate;
use serde::Deserialize;

use crate::billing::{PaymentCycle, PaymentSchedule, PeriodStatus, next_due_date};
use crate::core::ServerState;
use crate::db::models::{Client, ClientCreate, ClientUpdate, PeriodPayment};
use crate::db::repository::{ClientRepository, PeriodPaymentRepository};
use crate::services::ProcessPayment;
use crate::utils::validation::{
    MAX_EMAIL_LEN, MAX_NAME_LEN, MAX_SHORT_TEXT_LEN, validate_amount, validate_optional_text,
    validate_payment_day, validate_required_text,
};
use crate::utils::{AppError, AppResult, calendar};

/// Query params for listing clients
#[derive(Debug, Deserialize)]
pub struct ListQuery {
    #[serde(default)]
    pub include_inactive: bool,
}

/// 列表/详情返回惰性刷新后的当期状态，不落库
fn refreshed_view(mut client: Client, today: NaiveDate) -> Client {
    client.current_period_status = client.effective_status(today);
    client
}

/// GET /api/clients - 客户列表
pub async fn list(
    State(state): State<ServerState>,
    Query(query): Query<ListQuery>,
) -> AppResult<Json<Vec<Client>>> {
    let repo = ClientRepository::new(state.db.clone());
    let clients = if query.include_inactive {
        repo.find_all().await?
    } else {
        repo.find_active().await?
    };

    let today = calendar::today_in(state.config.timezone);
    Ok(Json(
        clients
            .into_iter()
            .map(|c| refreshed_view(c, today))
            .collect(),
    ))
}

/// GET /api/clients/{id} - 客户详情
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<Client>> {
    let repo = ClientRepository::new(state.db.clone());
    let client = repo
        .find_by_id(&id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Client {}", id)))?;
    let today = calendar::today_in(state.config.timezone);
    Ok(Json(refreshed_view(client, today)))
}

/// POST /api/clients - 建档 (初始账期 pending)
pub async fn create(
    State(state): State<ServerState>,
    Json(payload): Json<ClientCreate>,
) -> AppResult<Json<Client>> {
    validate_required_text(&payload.name, "name", MAX_NAME_LEN)?;
    validate_optional_text(&payload.company, "company", MAX_NAME_LEN)?;
    validate_optional_text(&payload.email, "email", MAX_EMAIL_LEN)?;
    validate_optional_text(&payload.phone, "phone", MAX_SHORT_TEXT_LEN)?;
    validate_payment_day(payload.payment_day)?;
    validate_amount(payload.recurring_amount, "recurring_amount")?;
    if payload.payment_cycle == PaymentCycle::Custom {
        return Err(AppError::unsupported_cycle(
            "Custom cycle has no rollover rule; use monthly, quarterly or yearly",
        ));
    }

    let today = calendar::today_in(state.config.timezone);
    let joined_date = payload.joined_date.unwrap_or(today);
    let schedule = PaymentSchedule::init(payload.payment_cycle, payload.payment_day, today);

    let repo = ClientRepository::new(state.db.clone());
    let client = repo.create(payload, joined_date, schedule).await?;
    Ok(Json(client))
}

/// PUT /api/clients/{id} - 更新
///
/// payment_day / payment_cycle 变更时从今天重推到期日；
/// 手工指定的到期日只允许向前。
pub async fn update(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    Json(payload): Json<ClientUpdate>,
) -> AppResult<Json<Client>> {
    if let Some(ref name) = payload.name {
        validate_required_text(name, "name", MAX_NAME_LEN)?;
    }
    validate_optional_text(&payload.company, "company", MAX_NAME_LEN)?;
    validate_optional_text(&payload.email, "email", MAX_EMAIL_LEN)?;
    validate_optional_text(&payload.phone, "phone", MAX_SHORT_TEXT_LEN)?;
    if let Some(day) = payload.payment_day {
        validate_payment_day(day)?;
    }
    if let Some(amount) = payload.recurring_amount {
        validate_amount(amount, "recurring_amount")?;
    }
    if payload.payment_cycle == Some(PaymentCycle::Custom) {
        return Err(AppError::unsupported_cycle(
            "Custom cycle has no rollover rule; use monthly, quarterly or yearly",
        ));
    }

    let repo = ClientRepository::new(state.db.clone());
    let existing = repo
        .find_by_id(&id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Client {}", id)))?;

    let today = calendar::today_in(state.config.timezone);
    let mut data = payload;

    // 周期字段变更 → 到期日从今天重推 (只向前)，并重开当期状态
    if (data.payment_day.is_some() || data.payment_cycle.is_some())
        && data.next_payment_date.is_none()
    {
        let day = data.payment_day.unwrap_or(existing.payment_day);
        data.next_payment_date = Some(next_due_date(day, today));
    }

    let status = match data.next_payment_date {
        Some(next) if next < today => {
            return Err(AppError::validation(format!(
                "next_payment_date {} cannot move backwards (today is {})",
                next, today
            )));
        }
        Some(next) => Some(if today >= next {
            PeriodStatus::Overdue
        } else {
            PeriodStatus::Pending
        }),
        None => None,
    };

    let client = repo.update(&id, data, status).await?;
    Ok(Json(refreshed_view(client, today)))
}

/// DELETE /api/clients/{id} - 软删除 (停用)，台账保留
pub async fn deactivate(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<bool>> {
    let repo = ClientRepository::new(state.db.clone());
    let result = repo.deactivate(&id).await?;
    Ok(Json(result))
}

/// GET /api/clients/{id}/payments - 收款历史 (新账期在前)
pub async fn list_payments(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<Vec<PeriodPayment>>> {
    let repo = ClientRepository::new(state.db.clone());
    let client = repo
        .find_by_id(&id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Client {}", id)))?;
    let entity = client
        .id
        .ok_or_else(|| AppError::internal("Client row missing id"))?;

    let ledger = PeriodPaymentRepository::new(state.db.clone());
    Ok(Json(ledger.find_by_entity(&entity).await?))
}

/// POST /api/clients/{id}/payments - 收款
pub async fn process_payment(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    Json(payload): Json<ProcessPayment>,
) -> AppResult<Json<PeriodPayment>> {
    let today = calendar::today_in(state.config.timezone);
    let record = state
        .payment_service()
        .process_client_payment(&id, payload, today)
        .await?;
    Ok(Json(record))
}
