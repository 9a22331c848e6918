//! 循环账期状态机
//!
//! 名义付款日 (1-31) 每月收敛到实际月长；到期日只会向前滚动，
//! 永不回算。已结算状态 (paid / early_paid) 粘滞，仅显式的
//! 下期滚动可以重开。
//!
//! 边界约定：`today >= next_payment_date` 即为逾期 —
//! 到期当天未结算按逾期处理，整个代码库只有这一处判定。

use std::cmp::Ordering;

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::utils::calendar;

/// 付款周期
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentCycle {
    Monthly,
    Quarterly,
    Yearly,
    /// 历史遗留值：无滚动规则，处处显式拒绝
    Custom,
}

impl PaymentCycle {
    /// 周期长度（月），custom 无定义
    pub fn months(&self) -> Option<i32> {
        match self {
            Self::Monthly => Some(1),
            Self::Quarterly => Some(3),
            Self::Yearly => Some(12),
            Self::Custom => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Monthly => "monthly",
            Self::Quarterly => "quarterly",
            Self::Yearly => "yearly",
            Self::Custom => "custom",
        }
    }
}

/// 当期结算状态
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PeriodStatus {
    Pending,
    Overdue,
    Paid,
    EarlyPaid,
    Partial,
}

impl PeriodStatus {
    /// paid / early_paid 视为已结算（粘滞）
    pub fn is_settled(&self) -> bool {
        matches!(self, Self::Paid | Self::EarlyPaid)
    }
}

/// 结算时点分类
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentTiming {
    Early,
    OnTime,
    Late,
}

/// 周期引擎错误
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BillingError {
    #[error("payment cycle '{}' has no rollover rule", .0.as_str())]
    UnsupportedCycle(PaymentCycle),
}

/// 计算下一个到期日
///
/// 名义日收敛到当月长度；若已过当月名义日则滚动到下月再收敛。
/// 对同一 `today` 重复调用结果不变（幂等）。
pub fn next_due_date(payment_day: u32, today: NaiveDate) -> NaiveDate {
    let day = payment_day.min(calendar::days_in_month(today.year(), today.month()));
    let candidate = NaiveDate::from_ymd_opt(today.year(), today.month(), day).unwrap();
    if today <= candidate {
        candidate
    } else {
        let next = calendar::add_months(candidate, 1);
        let day = payment_day.min(calendar::days_in_month(next.year(), next.month()));
        NaiveDate::from_ymd_opt(next.year(), next.month(), day).unwrap()
    }
}

/// 从结算日按周期滚动出下期到期日
///
/// 目标月取名义付款日并收敛；custom 周期显式拒绝。
pub fn advance_by_cycle(
    cycle: PaymentCycle,
    payment_day: u32,
    paid_on: NaiveDate,
) -> Result<NaiveDate, BillingError> {
    let months = cycle.months().ok_or(BillingError::UnsupportedCycle(cycle))?;
    let shifted = calendar::add_months(paid_on, months);
    let day = payment_day.min(calendar::days_in_month(shifted.year(), shifted.month()));
    Ok(NaiveDate::from_ymd_opt(shifted.year(), shifted.month(), day).unwrap())
}

/// 循环账期的完整状态
///
/// Client / Employee 上的账期字段收拢成一个值类型，
/// 引擎返回新值而非原地修改。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PaymentSchedule {
    pub cycle: PaymentCycle,
    pub payment_day: u32,
    pub next_payment_date: NaiveDate,
    pub status: PeriodStatus,
    pub last_payment_date: Option<NaiveDate>,
    pub timing: Option<PaymentTiming>,
}

impl PaymentSchedule {
    /// 建档时的初始状态：pending，首个到期日从 today 推出
    pub fn init(cycle: PaymentCycle, payment_day: u32, today: NaiveDate) -> Self {
        Self {
            cycle,
            payment_day,
            next_payment_date: next_due_date(payment_day, today),
            status: PeriodStatus::Pending,
            last_payment_date: None,
            timing: None,
        }
    }

    /// 当期有效状态
    ///
    /// 已结算状态不变；未结算按到期日与 today 判定 pending/overdue。
    pub fn refreshed(&self, today: NaiveDate) -> PeriodStatus {
        if self.status.is_settled() {
            return self.status;
        }
        if today >= self.next_payment_date {
            PeriodStatus::Overdue
        } else {
            PeriodStatus::Pending
        }
    }

    /// 记账：先按滚动前的到期日分类时点，再推进到期日
    ///
    /// 顺序不可颠倒 — 到期日一旦推进，时点比较基准就错了。
    pub fn with_payment(&self, paid_on: NaiveDate) -> Result<Self, BillingError> {
        let timing = match paid_on.cmp(&self.next_payment_date) {
            Ordering::Less => PaymentTiming::Early,
            Ordering::Equal => PaymentTiming::OnTime,
            Ordering::Greater => PaymentTiming::Late,
        };
        let status = if timing == PaymentTiming::Early {
            PeriodStatus::EarlyPaid
        } else {
            PeriodStatus::Paid
        };
        let next = advance_by_cycle(self.cycle, self.payment_day, paid_on)?;

        Ok(Self {
            cycle: self.cycle,
            payment_day: self.payment_day,
            next_payment_date: next,
            status,
            last_payment_date: Some(paid_on),
            timing: Some(timing),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn monthly_schedule(payment_day: u32, today: NaiveDate) -> PaymentSchedule {
        PaymentSchedule::init(PaymentCycle::Monthly, payment_day, today)
    }

    #[test]
    fn test_next_due_date_clamps_to_short_month() {
        // payment_day=31, mid-February → clamped to Feb 28
        assert_eq!(next_due_date(31, date(2026, 2, 15)), date(2026, 2, 28));
        // leap year clamps to Feb 29
        assert_eq!(next_due_date(31, date(2028, 2, 15)), date(2028, 2, 29));
    }

    #[test]
    fn test_next_due_date_rolls_past_day_to_next_month() {
        // nominal day already passed this month
        assert_eq!(next_due_date(10, date(2026, 3, 15)), date(2026, 4, 10));
        // due today stays today
        assert_eq!(next_due_date(15, date(2026, 3, 15)), date(2026, 3, 15));
        // December rolls into January
        assert_eq!(next_due_date(5, date(2026, 12, 20)), date(2027, 1, 5));
    }

    #[test]
    fn test_next_due_date_is_idempotent() {
        let today = date(2026, 2, 15);
        let first = next_due_date(31, today);
        let second = next_due_date(31, today);
        assert_eq!(first, second);
    }

    #[test]
    fn test_advance_by_cycle() {
        assert_eq!(
            advance_by_cycle(PaymentCycle::Monthly, 31, date(2026, 1, 20)).unwrap(),
            date(2026, 2, 28)
        );
        assert_eq!(
            advance_by_cycle(PaymentCycle::Quarterly, 31, date(2026, 1, 31)).unwrap(),
            date(2026, 4, 30)
        );
        assert_eq!(
            advance_by_cycle(PaymentCycle::Yearly, 29, date(2028, 2, 29)).unwrap(),
            date(2029, 2, 28)
        );
    }

    #[test]
    fn test_advance_custom_cycle_rejected() {
        let err = advance_by_cycle(PaymentCycle::Custom, 15, date(2026, 1, 15)).unwrap_err();
        assert_eq!(err, BillingError::UnsupportedCycle(PaymentCycle::Custom));
    }

    #[test]
    fn test_init_is_pending_with_forward_due_date() {
        let s = monthly_schedule(31, date(2026, 2, 15));
        assert_eq!(s.status, PeriodStatus::Pending);
        assert_eq!(s.next_payment_date, date(2026, 2, 28));
        assert!(s.last_payment_date.is_none());
        assert!(s.timing.is_none());
    }

    #[test]
    fn test_refreshed_due_today_is_overdue() {
        let s = monthly_schedule(15, date(2026, 3, 1));
        assert_eq!(s.refreshed(date(2026, 3, 14)), PeriodStatus::Pending);
        // boundary: due today counts as overdue
        assert_eq!(s.refreshed(date(2026, 3, 15)), PeriodStatus::Overdue);
        assert_eq!(s.refreshed(date(2026, 3, 20)), PeriodStatus::Overdue);
    }

    #[test]
    fn test_early_payment_classifies_then_advances() {
        // payment on Jan 20 against Jan 31 due date
        let s = monthly_schedule(31, date(2026, 1, 5));
        assert_eq!(s.next_payment_date, date(2026, 1, 31));

        let paid = s.with_payment(date(2026, 1, 20)).unwrap();
        assert_eq!(paid.timing, Some(PaymentTiming::Early));
        assert_eq!(paid.status, PeriodStatus::EarlyPaid);
        assert_eq!(paid.last_payment_date, Some(date(2026, 1, 20)));
        // next due rolls to the clamped nominal day of February
        assert_eq!(paid.next_payment_date, date(2026, 2, 28));
    }

    #[test]
    fn test_on_time_and_late_payment() {
        let s = monthly_schedule(15, date(2026, 3, 1));

        let on_time = s.with_payment(date(2026, 3, 15)).unwrap();
        assert_eq!(on_time.timing, Some(PaymentTiming::OnTime));
        assert_eq!(on_time.status, PeriodStatus::Paid);

        let late = s.with_payment(date(2026, 3, 20)).unwrap();
        assert_eq!(late.timing, Some(PaymentTiming::Late));
        assert_eq!(late.status, PeriodStatus::Paid);
        assert_eq!(late.next_payment_date, date(2026, 4, 15));
    }

    #[test]
    fn test_settlement_is_sticky() {
        let s = monthly_schedule(15, date(2026, 3, 1));
        let paid = s.with_payment(date(2026, 3, 10)).unwrap();
        assert_eq!(paid.status, PeriodStatus::EarlyPaid);

        // refreshed never moves a settled schedule back to pending/overdue
        for day in [10, 15, 16, 28] {
            assert_eq!(paid.refreshed(date(2026, 3, day)), PeriodStatus::EarlyPaid);
        }
    }

    #[test]
    fn test_quarterly_rollover_from_payment_date() {
        let s = PaymentSchedule::init(PaymentCycle::Quarterly, 31, date(2026, 1, 5));
        let paid = s.with_payment(date(2026, 1, 31)).unwrap();
        assert_eq!(paid.timing, Some(PaymentTiming::OnTime));
        assert_eq!(paid.next_payment_date, date(2026, 4, 30));
    }

    #[test]
    fn test_custom_cycle_payment_rejected() {
        let s = PaymentSchedule::init(PaymentCycle::Custom, 15, date(2026, 1, 5));
        assert!(s.with_payment(date(2026, 1, 15)).is_err());
    }

    #[test]
    fn test_enum_wire_format_is_snake_case() {
        assert_eq!(
            serde_json::to_string(&PeriodStatus::EarlyPaid).unwrap(),
            "\"early_paid\""
        );
        assert_eq!(
            serde_json::to_string(&PaymentTiming::OnTime).unwrap(),
            "\"on_time\""
        );
        assert_eq!(
            serde_json::to_string(&PaymentCycle::Quarterly).unwrap(),
            "\"quarterly\""
        );
        let status: PeriodStatus = serde_json::from_str("\"overdue\"").unwrap();
        assert_eq!(status, PeriodStatus::Overdue);
    }
}
