//! Report API Handlers
//!
//! 报表构建对同一账期可重复调用：每次从活数据重算，
//! 快照同期覆盖 (缓存语义)。

use std::str::FromStr;

use axum::{
    Json,
    extract::{Query, State},
};
use serde::Deserialize;

use crate::core::ServerState;
use crate::db::models::{MonthlyReport, ReportKind};
use crate::db::repository::MonthlyReportRepository;
use crate::reports::{ClientReportRow, EmployeeReportRow, FinanceReport, PeriodReport};
use crate::utils::{AppResult, calendar};

/// Query params for building a report (缺省当期)
#[derive(Debug, Deserialize)]
pub struct ReportQuery {
    pub month: Option<u32>,
    pub year: Option<i32>,
}

/// Query params for listing snapshots
#[derive(Debug, Deserialize)]
pub struct SnapshotQuery {
    pub kind: Option<String>,
    #[serde(default = "default_limit")]
    pub limit: i32,
    #[serde(default)]
    pub offset: i32,
}

fn default_limit() -> i32 {
    24
}

/// GET /api/reports/clients - 客户月报
pub async fn client_report(
    State(state): State<ServerState>,
    Query(query): Query<ReportQuery>,
) -> AppResult<Json<PeriodReport<ClientReportRow>>> {
    let today = calendar::today_in(state.config.timezone);
    let (month, year) = calendar::resolve_period(query.month, query.year, today)?;

    // TODO: take generated_by from the auth context once the identity service lands
    let report = state
        .report_service()
        .build_client_report(month, year, None)
        .await?;
    Ok(Json(report))
}

/// GET /api/reports/employees - 员工月报
pub async fn employee_report(
    State(state): State<ServerState>,
    Query(query): Query<ReportQuery>,
) -> AppResult<Json<PeriodReport<EmployeeReportRow>>> {
    let today = calendar::today_in(state.config.timezone);
    let (month, year) = calendar::resolve_period(query.month, query.year, today)?;

    let report = state
        .report_service()
        .build_employee_report(month, year, None)
        .await?;
    Ok(Json(report))
}

/// GET /api/reports/finance - 收支月报
pub async fn finance_report(
    State(state): State<ServerState>,
    Query(query): Query<ReportQuery>,
) -> AppResult<Json<FinanceReport>> {
    let today = calendar::today_in(state.config.timezone);
    let (month, year) = calendar::resolve_period(query.month, query.year, today)?;

    let report = state
        .report_service()
        .build_finance_report(month, year, None)
        .await?;
    Ok(Json(report))
}

/// GET /api/reports/snapshots - 历史快照列表
pub async fn list_snapshots(
    State(state): State<ServerState>,
    Query(query): Query<SnapshotQuery>,
) -> AppResult<Json<Vec<MonthlyReport>>> {
    let kind = query
        .kind
        .as_deref()
        .map(ReportKind::from_str)
        .transpose()?;

    let repo = MonthlyReportRepository::new(state.db.clone());
    Ok(Json(repo.find_all(kind, query.limit, query.offset).await?))
}
