/// Current UTC timestamp in milliseconds
pub fn now_millis() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

/// Generate a Snowflake-style i64 for use as resource ID.
///
/// Layout (53 bits, fits in JavaScript's Number.MAX_SAFE_INTEGER):
///   - 41 bits: milliseconds since 2024-01-01 UTC (~69 years)
///   - 12 bits: random (4096 values per ms, collision-free at club scale)
pub fn snowflake_id() -> i64 {
    use rand::Rng;
    // Custom epoch: 2024-01-01 00:00:00 UTC
    const EPOCH_MS: i64 = 1_704_067_200_000;
    let now = now_millis();
    let ts = (now - EPOCH_MS) & 0x1FF_FFFF_FFFF; // 41 bits
    let rand_bits: i64 = rand::thread_rng().gen_range(0..0x1000); // 12 bits
    (ts << 12) | rand_bits
}

/// Current quota period token, UTC calendar year-month (`"YYYY-MM"`).
///
/// The monthly credit ledger resets whenever the stored token differs
/// from this one.
pub fn current_period() -> String {
    chrono::Utc::now().format("%Y-%m").to_string()
}

/// Period token for an arbitrary millisecond timestamp (test seam).
pub fn period_for_millis(millis: i64) -> String {
    chrono::DateTime::from_timestamp_millis(millis)
        .unwrap_or_default()
        .format("%Y-%m")
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_snowflake_ids_are_positive_and_distinct() {
        let a = snowflake_id();
        let b = snowflake_id();
        assert!(a > 0);
        assert!(b > 0);
        // Same millisecond is possible; random bits make collision unlikely
        assert_ne!(a, b);
    }

    #[test]
    fn test_period_token_format() {
        let period = current_period();
        assert_eq!(period.len(), 7);
        assert_eq!(&period[4..5], "-");
    }

    #[test]
    fn test_period_for_known_timestamp() {
        // 2024-06-15 12:00:00 UTC
        assert_eq!(period_for_millis(1_718_452_800_000), "2024-06");
    }
}
