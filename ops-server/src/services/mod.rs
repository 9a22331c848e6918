//! 业务服务层
//!
//! - [`payment`] - 收款/发薪动作：账期护栏 + 台账 upsert + 账期推进

pub mod payment;

pub use payment::{PaymentService, ProcessPayment};
