//! Database Models
//!
//! SurrealDB 表结构对应的 serde 模型与 create/update DTO。

pub mod serde_helpers;

pub mod client;
pub mod content_verification;
pub mod employee;
pub mod finance;
pub mod leave;
pub mod monthly_report;
pub mod period_payment;

pub use client::{Client, ClientCreate, ClientId, ClientUpdate};
pub use content_verification::{ContentVerification, ContentVerificationId};
pub use employee::{Employee, EmployeeCreate, EmployeeId, EmployeeUpdate};
pub use finance::{FinanceKind, FinanceRecord, FinanceRecordCreate, FinanceRecordId};
pub use leave::{LeaveRecord, LeaveRecordId, LeaveStatus};
pub use monthly_report::{MonthlyReport, MonthlyReportId, ReportKind};
pub use period_payment::{EntityKind, PeriodPayment, PeriodPaymentId, PeriodPaymentUpsert};
