//! API 路由模块
//!
//! # 结构
//!
//! - [`health`] - 健康检查
//! - [`clients`] - 客户管理与收款接口
//! - [`employees`] - 员工管理与发薪接口
//! - [`finance`] - 通用收支接口
//! - [`reports`] - 月报与快照接口

pub mod clients;
pub mod employees;
pub mod finance;
pub mod health;
pub mod reports;

// Re-export common types for handlers
pub use crate::utils::{AppError, AppResult};
