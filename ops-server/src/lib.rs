//! Ops Server - 服务代理内部运营后台
//!
//! # 架构概述
//!
//! 本模块是运营后台的主入口，提供以下核心功能：
//!
//! - **付款周期引擎** (`billing`): 客户月费/员工工资的账期状态机
//! - **期账台账** (`db/repository/period_payment`): 每实体每账期一行的收付记录
//! - **月报聚合** (`reports`): 名册 × 台账 × 交付核验 × 休假 × 收支的当期快照
//! - **数据库** (`db`): 嵌入式 SurrealDB 存储
//! - **HTTP API** (`api`): RESTful API 接口
//!
//! # 模块结构
//!
//! ```text
//! ops-server/src/
//! ├── core/          # 配置、状态、服务器
//! ├── api/           # HTTP 路由和处理器
//! ├── billing/       # 付款周期引擎
//! ├── services/      # 收款/发薪动作
//! ├── reports/       # 月报聚合
//! ├── utils/         # 日历、日志、校验
//! └── db/            # 数据库层 (models + repository)
//! ```

pub mod api;
pub mod billing;
pub mod core;
pub mod db;
pub mod reports;
pub mod services;
pub mod utils;

// Re-export 公共类型
pub use crate::core::{Config, Server, ServerState};
pub use utils::{ApiResponse, AppError, AppResult};

// Re-export logger functions
pub use utils::logger::{init_logger, init_logger_with_file};

pub fn print_banner() {
    println!(
        r#"
   ____
  / __ \____  _____
 / / / / __ \/ ___/
/ /_/ / /_/ (__  )
\____/ .___/____/
    /_/  agency operations backend
"#
    );
}

/// 设置运行环境 (dotenv + 日志)
///
/// 必须在读取 [`Config`] 之前调用，否则 .env 不生效。
pub fn setup_environment() -> anyhow::Result<()> {
    dotenv::dotenv().ok();

    let log_level = std::env::var("LOG_LEVEL").ok();
    let log_dir = std::env::var("LOG_DIR").ok();
    init_logger_with_file(log_level.as_deref(), log_dir.as_deref());

    Ok(())
}
