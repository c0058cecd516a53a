use sqlx::types::time;

/// Current UTC time as Unix milliseconds, the resolution stored in `updated_at`.
pub fn now_millis() -> i64 {
    to_millis(time::OffsetDateTime::now_utc())
}

pub fn to_millis(x: time::OffsetDateTime) -> i64 {
    (x.unix_timestamp_nanos() / 1_000_000) as i64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_to_millis() {
        let t = time::OffsetDateTime::from_unix_timestamp(1_700_000_000).unwrap();
        assert_eq!(to_millis(t), 1_700_000_000_000);
        assert!(now_millis() > 1_700_000_000_000);
    }
}
