use chrono::{DateTime, FixedOffset, Utc};

/// India Standard Time, the fixed offset login timestamps are recorded in.
const IST_OFFSET_SECONDS: i32 = 5 * 3600 + 30 * 60;

pub fn now() -> DateTime<Utc> {
    Utc::now()
}

pub fn ist_offset() -> FixedOffset {
    FixedOffset::east_opt(IST_OFFSET_SECONDS).expect("IST offset is within range")
}

pub fn ist_now() -> DateTime<FixedOffset> {
    now().with_timezone(&ist_offset())
}

pub fn from_rfc3339(s: &str) -> anyhow::Result<DateTime<FixedOffset>> {
    Ok(DateTime::parse_from_rfc3339(s)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ist_is_five_thirty_ahead() {
        let ts = ist_now();
        assert_eq!(ts.offset().local_minus_utc(), 19_800);
        assert!((ts.with_timezone(&Utc) - Utc::now()).num_seconds().abs() < 5);
    }

    #[test]
    fn parses_legacy_timestamps() {
        let parsed = from_rfc3339("2025-03-01T10:15:00.000Z").unwrap();
        assert_eq!(parsed.offset().local_minus_utc(), 0);
    }
}
