//! Time and money helpers shared by the client and the terminal front end

use chrono::{DateTime, NaiveDateTime, Utc};
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;

/// 获取当前 UTC 时间戳（毫秒）
pub fn now_millis() -> i64 {
    Utc::now().timestamp_millis()
}

/// Parse a backend timestamp.
///
/// The backend emits both RFC 3339 strings and naive ISO strings without an
/// offset; naive values are read as UTC.
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
        .or_else(|_| NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S%.f"))
        .ok()
        .map(|naive| naive.and_utc())
}

/// Serde adapter for required backend timestamps
pub mod timestamp {
    use chrono::{DateTime, Utc};
    use serde::{Deserialize, Deserializer, Serializer, de::Error};

    pub fn serialize<S: Serializer>(value: &DateTime<Utc>, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(&value.to_rfc3339())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<DateTime<Utc>, D::Error> {
        let raw = String::deserialize(d)?;
        super::parse_timestamp(&raw)
            .ok_or_else(|| D::Error::custom(format!("invalid timestamp: {}", raw)))
    }
}

/// Serde adapter for optional backend timestamps (missing or null is `None`)
pub mod timestamp_opt {
    use chrono::{DateTime, Utc};
    use serde::{Deserialize, Deserializer, Serializer, de::Error};

    pub fn serialize<S: Serializer>(value: &Option<DateTime<Utc>>, s: S) -> Result<S::Ok, S::Error> {
        match value {
            Some(dt) => s.serialize_some(&dt.to_rfc3339()),
            None => s.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        d: D,
    ) -> Result<Option<DateTime<Utc>>, D::Error> {
        match Option::<String>::deserialize(d)? {
            None => Ok(None),
            Some(raw) => super::parse_timestamp(&raw)
                .map(Some)
                .ok_or_else(|| D::Error::custom(format!("invalid timestamp: {}", raw))),
        }
    }
}

/// Format a VND amount the way receipts show it: `130.000 đ`
pub fn format_vnd(amount: Decimal) -> String {
    let rounded = amount.round().to_i64().unwrap_or_default();
    let digits = rounded.unsigned_abs().to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(ch);
    }
    if rounded < 0 {
        format!("-{} đ", grouped)
    } else {
        format!("{} đ", grouped)
    }
}

/// Whole minutes elapsed between `since` and `now`, never negative
pub fn minutes_between(since: DateTime<Utc>, now: DateTime<Utc>) -> i64 {
    (now - since).num_minutes().max(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use rust_decimal::Decimal;

    #[test]
    fn test_parse_naive_timestamp() {
        let dt = parse_timestamp("2025-03-01T12:30:00.123456").unwrap();
        assert_eq!(
            dt.timestamp(),
            Utc.with_ymd_and_hms(2025, 3, 1, 12, 30, 0).unwrap().timestamp()
        );
        assert!(parse_timestamp("2025-03-01 12:30:00").is_some());
    }

    #[test]
    fn test_parse_rfc3339_timestamp() {
        let dt = parse_timestamp("2025-03-01T19:30:00+07:00").unwrap();
        assert_eq!(dt, Utc.with_ymd_and_hms(2025, 3, 1, 12, 30, 0).unwrap());
        assert!(parse_timestamp("yesterday").is_none());
    }

    #[test]
    fn test_format_vnd() {
        assert_eq!(format_vnd(Decimal::from(130_000)), "130.000 đ");
        assert_eq!(format_vnd(Decimal::from(1_250_500)), "1.250.500 đ");
        assert_eq!(format_vnd(Decimal::from(500)), "500 đ");
        assert_eq!(format_vnd(Decimal::ZERO), "0 đ");
        assert_eq!(format_vnd(Decimal::new(-450_006, 1)), "-45.001 đ");
    }

    #[test]
    fn test_minutes_between() {
        let start = Utc.with_ymd_and_hms(2025, 3, 1, 12, 0, 0).unwrap();
        let now = Utc.with_ymd_and_hms(2025, 3, 1, 12, 17, 59).unwrap();
        assert_eq!(minutes_between(start, now), 17);
        assert_eq!(minutes_between(now, start), 0);
    }
}
