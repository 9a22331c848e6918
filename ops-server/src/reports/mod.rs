//! 月报聚合 (Monthly Report Aggregator)
//!
//! 对给定 (month, year) 把名册、期账台账、交付核验、休假与通用收支
//! 汇成一份当期快照：
//! - [`types`] - 明细行与响应结构
//! - [`service`] - 聚合流程与快照 upsert
//!
//! 快照只是缓存：每次调用都从活数据重算并覆盖同期快照行。

pub mod service;
pub mod types;

pub use service::ReportService;
pub use types::{ClientReportRow, EmployeeReportRow, FinanceEntry, FinanceReport, PeriodReport};
