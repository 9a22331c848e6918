//! 付款周期引擎 (Payment Cycle Engine)
//!
//! 客户月费与员工工资共用同一套循环账期状态机：
//! - [`cycle`] - 周期/状态/时点枚举与纯函数状态机
//! - [`money`] - rust_decimal 金额运算
//!
//! 所有状态流转都是 `(schedule, today) -> new state` 的纯函数，
//! 不读取墙钟，便于确定性测试。

pub mod cycle;
pub mod money;

pub use cycle::{
    BillingError, PaymentCycle, PaymentSchedule, PaymentTiming, PeriodStatus, next_due_date,
};
