//! Leave Record Model (休假记录)
//!
//! 休假审批流由外部协作方维护，这里只作为月报的只读输入。

use super::serde_helpers;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use surrealdb::RecordId;

/// Leave record ID type
pub type LeaveRecordId = RecordId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LeaveStatus {
    Pending,
    Approved,
    Rejected,
}

/// Employee leave record
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LeaveRecord {
    #[serde(default, with = "serde_helpers::option_record_id")]
    pub id: Option<LeaveRecordId>,
    #[serde(with = "serde_helpers::record_id")]
    pub employee: RecordId,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    /// 仅 approved 记录计入月报
    pub status: LeaveStatus,
    pub reason: Option<String>,
}

impl LeaveRecord {
    /// 与给定账期窗口重叠的休假天数
    pub fn days_within(&self, period_start: NaiveDate, period_end: NaiveDate) -> i64 {
        let start = self.start_date.max(period_start);
        let end = self.end_date.min(period_end);
        if start > end {
            0
        } else {
            (end - start).num_days() + 1
        }
    }
}
