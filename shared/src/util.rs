//! Small cross-crate utilities

/// Current wall-clock time as Unix millis
pub fn now_millis() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_now_millis_is_recent() {
        // 2020-01-01 in millis; anything earlier means a broken clock source
        assert!(now_millis() > 1_577_836_800_000);
    }
}
