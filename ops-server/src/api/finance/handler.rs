//! Finance API Handlers

use axum::{
    Json,
    extract::{Query, State},
};
use serde::Deserialize;

use crate::core::ServerState;
use crate::db::models::{FinanceRecord, FinanceRecordCreate};
use crate::db::repository::FinanceRepository;
use crate::utils::validation::{
    MAX_NAME_LEN, MAX_NOTE_LEN, validate_amount, validate_optional_text, validate_required_text,
};
use crate::utils::{AppResult, calendar};

/// Query params for listing finance records
#[derive(Debug, Deserialize)]
pub struct ListQuery {
    /// 给定账期时按月过滤，否则分页列出全部
    pub month: Option<u32>,
    pub year: Option<i32>,
    #[serde(default = "default_limit")]
    pub limit: i32,
    #[serde(default)]
    pub offset: i32,
}

fn default_limit() -> i32 {
    50
}

/// GET /api/finance - 收支记录列表
pub async fn list(
    State(state): State<ServerState>,
    Query(query): Query<ListQuery>,
) -> AppResult<Json<Vec<FinanceRecord>>> {
    let repo = FinanceRepository::new(state.db.clone());

    let records = if query.month.is_some() || query.year.is_some() {
        let today = calendar::today_in(state.config.timezone);
        let (month, year) = calendar::resolve_period(query.month, query.year, today)?;
        repo.find_by_date_range(
            calendar::period_start(year, month)?,
            calendar::period_end(year, month)?,
        )
        .await?
    } else {
        repo.find_all(query.limit, query.offset).await?
    };

    Ok(Json(records))
}

/// POST /api/finance - 记一笔收支
pub async fn create(
    State(state): State<ServerState>,
    Json(payload): Json<FinanceRecordCreate>,
) -> AppResult<Json<FinanceRecord>> {
    validate_required_text(&payload.category, "category", MAX_NAME_LEN)?;
    validate_optional_text(&payload.note, "note", MAX_NOTE_LEN)?;
    validate_amount(payload.amount, "amount")?;

    let date = payload
        .date
        .unwrap_or_else(|| calendar::today_in(state.config.timezone));

    let repo = FinanceRepository::new(state.db.clone());
    let record = repo.create(payload, date).await?;
    Ok(Json(record))
}
