//! Report API 模块 (月报)

mod handler;

use axum::{Router, routing::get};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/reports", routes())
}

fn routes() -> Router<ServerState> {
    Router::new()
        .route("/clients", get(handler::client_report))
        .route("/employees", get(handler::employee_report))
        .route("/finance", get(handler::finance_report))
        .route("/snapshots", get(handler::list_snapshots))
}
