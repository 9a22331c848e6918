//! Content Verification Model (交付核验)
//!
//! 内容交付核验由外部协作方写入，这里只作为客户月报的只读输入。

use super::serde_helpers;
use serde::{Deserialize, Serialize};
use surrealdb::RecordId;

/// Content verification ID type
pub type ContentVerificationId = RecordId;

/// Per-client, per-period delivery verification record
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContentVerification {
    #[serde(default, with = "serde_helpers::option_record_id")]
    pub id: Option<ContentVerificationId>,
    #[serde(with = "serde_helpers::record_id")]
    pub client: RecordId,
    pub month: u32,
    pub year: i32,
    /// 当期交付条目数
    #[serde(default)]
    pub delivered_count: i32,
    #[serde(default, deserialize_with = "serde_helpers::bool_false")]
    pub verified: bool,
    pub note: Option<String>,
}
