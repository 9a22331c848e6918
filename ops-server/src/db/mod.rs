//! Database Module
//!
//! 嵌入式 SurrealDB (RocksDB 引擎) 初始化与 schema 定义。

pub mod models;
pub mod repository;

use crate::utils::AppError;
use surrealdb::Surreal;
use surrealdb::engine::local::{Db, RocksDb};

/// Database service — owns the embedded SurrealDB handle
#[derive(Clone)]
pub struct DbService {
    pub db: Surreal<Db>,
}

impl DbService {
    /// Open (or create) the database at `db_path` and apply schema
    pub async fn new(db_path: &str) -> Result<Self, AppError> {
        let db: Surreal<Db> = Surreal::new::<RocksDb>(db_path)
            .await
            .map_err(|e| AppError::database(format!("Failed to open database: {e}")))?;

        db.use_ns("ops")
            .use_db("ops")
            .await
            .map_err(|e| AppError::database(format!("Failed to select namespace: {e}")))?;

        define_schema(&db).await?;

        tracing::info!("Database ready (SurrealDB embedded, RocksDB engine)");
        Ok(Self { db })
    }
}

/// Idempotent schema definition, run at every startup
///
/// 台账和快照的唯一索引是并发写入的唯一护栏 —
/// 同一账期的竞争写入依赖索引而不是乐观锁。
async fn define_schema(db: &Surreal<Db>) -> Result<(), AppError> {
    db.query(
        r#"
        DEFINE TABLE IF NOT EXISTS client SCHEMALESS;
        DEFINE TABLE IF NOT EXISTS employee SCHEMALESS;

        DEFINE TABLE IF NOT EXISTS period_payment SCHEMALESS;
        DEFINE INDEX IF NOT EXISTS period_payment_period
            ON period_payment FIELDS entity, month, year UNIQUE;

        DEFINE TABLE IF NOT EXISTS monthly_report SCHEMALESS;
        DEFINE INDEX IF NOT EXISTS monthly_report_period
            ON monthly_report FIELDS kind, month, year UNIQUE;

        DEFINE TABLE IF NOT EXISTS finance_record SCHEMALESS;
        DEFINE TABLE IF NOT EXISTS leave_record SCHEMALESS;
        DEFINE TABLE IF NOT EXISTS content_verification SCHEMALESS;
        "#,
    )
    .await
    .map_err(|e| AppError::database(format!("Failed to define schema: {e}")))?
    .check()
    .map_err(|e| AppError::database(format!("Schema definition rejected: {e}")))?;
    Ok(())
}
