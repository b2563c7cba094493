use time::{OffsetDateTime, UtcOffset};

pub trait Timezone {
    fn to_localtime(&self) -> OffsetDateTime;
    fn to_formatted_string(&self) -> String;
}

impl Timezone for OffsetDateTime {
    fn to_localtime(&self) -> OffsetDateTime {
        let tz_offset_sec = chrono::Local::now().offset().local_minus_utc();
        match UtcOffset::from_whole_seconds(tz_offset_sec) {
            Ok(offset) => self.to_offset(offset),
            Err(_) => *self,
        }
    }

    /// Debug format truncated to millisecond precision
    fn to_formatted_string(&self) -> String {
        let str = format!("{:?}", self);
        match str.split_once('.') {
            Some((secs, fractional)) => format!("{}.{:.3}", secs, fractional),
            None => str,
        }
    }
}

/// Unix timestamp used to tag files written in the same run
pub fn unix_timestamp() -> u64 {
    OffsetDateTime::now_utc().unix_timestamp().max(0) as u64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formatted_string_truncates_fraction() {
        let dt = OffsetDateTime::from_unix_timestamp_nanos(1_700_000_000_123_456_789).unwrap();
        let formatted = dt.to_formatted_string();
        assert!(formatted.starts_with("2023-11-14 22:13:20.123"), "{}", formatted);
        assert!(!formatted.contains("123456"));
    }

    #[test]
    fn timestamp_is_recent() {
        assert!(unix_timestamp() > 1_700_000_000);
    }
}
