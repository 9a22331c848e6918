//! 日历工具函数 — 账期日期运算
//!
//! 到期日与账期计算统一由这里的原语组合而成，
//! `month ∈ [1,12]` 是唯一的可失败输入。

use chrono::{Datelike, NaiveDate};
use chrono_tz::Tz;

use super::{AppError, AppResult};

/// 某月天数 (28-31)
///
/// 调用方保证 month 已校验；引擎内部的收敛计算走这里，永不失败。
pub fn days_in_month(year: i32, month: u32) -> u32 {
    debug_assert!((1..=12).contains(&month));
    let (ny, nm) = if month == 12 {
        (year + 1, 1)
    } else {
        (year, month + 1)
    };
    // 下月 1 日的前一天即本月最后一天
    NaiveDate::from_ymd_opt(ny, nm, 1)
        .and_then(|d| d.pred_opt())
        .map(|d| d.day())
        .unwrap_or(28)
}

/// 某月最后一天 (1-31)，month 越界返回校验错误
pub fn last_day_of_month(year: i32, month: u32) -> AppResult<u32> {
    if !(1..=12).contains(&month) {
        return Err(AppError::validation(format!("Invalid month: {}", month)));
    }
    Ok(days_in_month(year, month))
}

/// 名义日收敛到该月实际长度
pub fn clamp_day(day: u32, year: i32, month: u32) -> AppResult<u32> {
    Ok(day.min(last_day_of_month(year, month)?))
}

/// 日期 + n 个月，日按目标月长度收敛
pub fn add_months(date: NaiveDate, n: i32) -> NaiveDate {
    let total = date.year() * 12 + date.month0() as i32 + n;
    let year = total.div_euclid(12);
    let month = total.rem_euclid(12) as u32 + 1;
    let day = date.day().min(days_in_month(year, month));
    NaiveDate::from_ymd_opt(year, month, day).unwrap()
}

/// 日期 + n 年 (2月29日收敛到28日)
pub fn add_years(date: NaiveDate, n: i32) -> NaiveDate {
    add_months(date, n * 12)
}

/// 账期末日 (该月最后一天)
pub fn period_end(year: i32, month: u32) -> AppResult<NaiveDate> {
    let day = last_day_of_month(year, month)?;
    NaiveDate::from_ymd_opt(year, month, day)
        .ok_or_else(|| AppError::validation(format!("Invalid period: {}/{}", month, year)))
}

/// 账期首日
pub fn period_start(year: i32, month: u32) -> AppResult<NaiveDate> {
    if !(1..=12).contains(&month) {
        return Err(AppError::validation(format!("Invalid month: {}", month)));
    }
    NaiveDate::from_ymd_opt(year, month, 1)
        .ok_or_else(|| AppError::validation(format!("Invalid period: {}/{}", month, year)))
}

/// 业务时区的今天
pub fn today_in(tz: Tz) -> NaiveDate {
    chrono::Utc::now().with_timezone(&tz).date_naive()
}

/// 解析报表/付款入参账期，缺省为 today 所在月
pub fn resolve_period(
    month: Option<u32>,
    year: Option<i32>,
    today: NaiveDate,
) -> AppResult<(u32, i32)> {
    let month = month.unwrap_or_else(|| today.month());
    let year = year.unwrap_or_else(|| today.year());
    if !(1..=12).contains(&month) {
        return Err(AppError::invalid_period(format!("Invalid month: {}", month)));
    }
    Ok((month, year))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_last_day_of_month() {
        assert_eq!(last_day_of_month(2026, 1).unwrap(), 31);
        assert_eq!(last_day_of_month(2026, 2).unwrap(), 28);
        assert_eq!(last_day_of_month(2028, 2).unwrap(), 29); // leap year
        assert_eq!(last_day_of_month(2026, 4).unwrap(), 30);
        assert_eq!(last_day_of_month(2026, 12).unwrap(), 31);
    }

    #[test]
    fn test_last_day_of_month_rejects_bad_month() {
        assert!(last_day_of_month(2026, 0).is_err());
        assert!(last_day_of_month(2026, 13).is_err());
    }

    #[test]
    fn test_clamp_day_never_exceeds_month_length() {
        for month in 1..=12u32 {
            for day in 1..=31u32 {
                let clamped = clamp_day(day, 2026, month).unwrap();
                assert!(clamped <= last_day_of_month(2026, month).unwrap());
                if day <= last_day_of_month(2026, month).unwrap() {
                    assert_eq!(clamped, day);
                }
            }
        }
    }

    #[test]
    fn test_add_months_clamps_day() {
        assert_eq!(add_months(date(2026, 1, 31), 1), date(2026, 2, 28));
        assert_eq!(add_months(date(2028, 1, 31), 1), date(2028, 2, 29));
        assert_eq!(add_months(date(2026, 1, 31), 3), date(2026, 4, 30));
        assert_eq!(add_months(date(2026, 11, 15), 2), date(2027, 1, 15));
        assert_eq!(add_months(date(2026, 3, 31), -1), date(2026, 2, 28));
    }

    #[test]
    fn test_add_years_clamps_leap_day() {
        assert_eq!(add_years(date(2028, 2, 29), 1), date(2029, 2, 28));
        assert_eq!(add_years(date(2026, 6, 15), 1), date(2027, 6, 15));
    }

    #[test]
    fn test_period_bounds() {
        assert_eq!(period_start(2026, 2).unwrap(), date(2026, 2, 1));
        assert_eq!(period_end(2026, 2).unwrap(), date(2026, 2, 28));
        assert!(period_end(2026, 13).is_err());
    }

    #[test]
    fn test_resolve_period_defaults_to_today() {
        let today = date(2026, 3, 15);
        assert_eq!(resolve_period(None, None, today).unwrap(), (3, 2026));
        assert_eq!(resolve_period(Some(1), None, today).unwrap(), (1, 2026));
        assert_eq!(
            resolve_period(Some(12), Some(2025), today).unwrap(),
            (12, 2025)
        );
        assert!(resolve_period(Some(13), None, today).is_err());
    }
}
