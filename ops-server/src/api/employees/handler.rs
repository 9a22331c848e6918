//! Employee API Handlers

use axum::{
    Json,
    extract::{Path, Query, State},
};
use chrono::NaiveDate;
use serde::Deserialize;

use crate::billing::{PaymentCycle, PaymentSchedule, PeriodStatus, next_due_date};
use crate::core::ServerState;
use crate::db::models::{Employee, EmployeeCreate, EmployeeUpdate, PeriodPayment};
use crate::db::repository::{EmployeeRepository, PeriodPaymentRepository};
use crate::services::ProcessPayment;
use crate::utils::validation::{
    MAX_EMAIL_LEN, MAX_NAME_LEN, MAX_SHORT_TEXT_LEN, validate_amount, validate_optional_text,
    validate_payment_day, validate_required_text,
};
use crate::utils::{AppError, AppResult, calendar};

/// Query params for listing employees
#[derive(Debug, Deserialize)]
pub struct ListQuery {
    /// 含离职/停用
    #[serde(default)]
    pub include_inactive: bool,
}

fn refreshed_view(mut employee: Employee, today: NaiveDate) -> Employee {
    employee.current_period_status = employee.effective_status(today);
    employee
}

/// GET /api/employees - 员工列表
pub async fn list(
    State(state): State<ServerState>,
    Query(query): Query<ListQuery>,
) -> AppResult<Json<Vec<Employee>>> {
    let repo = EmployeeRepository::new(state.db.clone());
    let employees = if query.include_inactive {
        repo.find_all().await?
    } else {
        repo.find_current().await?
    };

    let today = calendar::today_in(state.config.timezone);
    Ok(Json(
        employees
            .into_iter()
            .map(|e| refreshed_view(e, today))
            .collect(),
    ))
}

/// GET /api/employees/{id} - 员工详情
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<Employee>> {
    let repo = EmployeeRepository::new(state.db.clone());
    let employee = repo
        .find_by_id(&id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Employee {}", id)))?;
    let today = calendar::today_in(state.config.timezone);
    Ok(Json(refreshed_view(employee, today)))
}

/// POST /api/employees - 入职建档 (初始账期 pending)
pub async fn create(
    State(state): State<ServerState>,
    Json(payload): Json<EmployeeCreate>,
) -> AppResult<Json<Employee>> {
    validate_required_text(&payload.name, "name", MAX_NAME_LEN)?;
    validate_optional_text(&payload.email, "email", MAX_EMAIL_LEN)?;
    validate_optional_text(&payload.phone, "phone", MAX_SHORT_TEXT_LEN)?;
    validate_optional_text(&payload.designation, "designation", MAX_SHORT_TEXT_LEN)?;
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

    let repo = EmployeeRepository::new(state.db.clone());
    let employee = repo.create(payload, joined_date, schedule).await?;
    Ok(Json(employee))
}

/// PUT /api/employees/{id} - 更新 (含离职登记 terminated_date)
pub async fn update(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    Json(payload): Json<EmployeeUpdate>,
) -> AppResult<Json<Employee>> {
    if let Some(ref name) = payload.name {
        validate_required_text(name, "name", MAX_NAME_LEN)?;
    }
    validate_optional_text(&payload.email, "email", MAX_EMAIL_LEN)?;
    validate_optional_text(&payload.phone, "phone", MAX_SHORT_TEXT_LEN)?;
    validate_optional_text(&payload.designation, "designation", MAX_SHORT_TEXT_LEN)?;
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

    let repo = EmployeeRepository::new(state.db.clone());
    let existing = repo
        .find_by_id(&id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Employee {}", id)))?;

    let today = calendar::today_in(state.config.timezone);
    let mut data = payload;

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

    let employee = repo.update(&id, data, status).await?;
    Ok(Json(refreshed_view(employee, today)))
}

/// DELETE /api/employees/{id} - 软删除 (停用)，台账保留
pub async fn deactivate(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<bool>> {
    let repo = EmployeeRepository::new(state.db.clone());
    let result = repo.deactivate(&id).await?;
    Ok(Json(result))
}

/// GET /api/employees/{id}/payments - 发薪历史 (新账期在前)
pub async fn list_payments(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<Vec<PeriodPayment>>> {
    let repo = EmployeeRepository::new(state.db.clone());
    let employee = repo
        .find_by_id(&id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Employee {}", id)))?;
    let entity = employee
        .id
        .ok_or_else(|| AppError::internal("Employee row missing id"))?;

    let ledger = PeriodPaymentRepository::new(state.db.clone());
    Ok(Json(ledger.find_by_entity(&entity).await?))
}

/// POST /api/employees/{id}/payments - 发薪
pub async fn process_payment(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    Json(payload): Json<ProcessPayment>,
) -> AppResult<Json<PeriodPayment>> {
    let today = calendar::today_in(state.config.timezone);
    let record = state
        .payment_service()
        .process_employee_payment(&id, payload, today)
        .await?;
    Ok(Json(record))
}
