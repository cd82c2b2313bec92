//! Lenient deserializers for the message payload.
//!
//! The backend is loosely typed: ids may arrive as numbers or numeric
//! strings, timestamps as RFC 3339, SQL-style datetimes or epoch numbers.

use chrono::{DateTime, NaiveDateTime, TimeZone, Utc};
use serde::{Deserialize, Deserializer};
use serde_json::Value;

#[derive(Deserialize)]
#[serde(untagged)]
enum RawId {
    Num(u64),
    Str(String),
}

pub fn id<'de, D>(deserializer: D) -> Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    match RawId::deserialize(deserializer)? {
        RawId::Num(n) => Ok(n),
        RawId::Str(s) => s
            .trim()
            .parse::<u64>()
            .map_err(|_| serde::de::Error::custom(format!("invalid user id: {:?}", s))),
    }
}

pub fn opt_id<'de, D>(deserializer: D) -> Result<Option<u64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::Number(n)) => n.as_u64(),
        Some(Value::String(s)) => s.trim().parse::<u64>().ok(),
        _ => None,
    })
}

/// Unparsable timestamps read as absent rather than failing the whole payload.
pub fn opt_timestamp<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::String(s)) => parse_timestamp(&s),
        Some(Value::Number(n)) => n.as_i64().and_then(from_epoch),
        _ => None,
    })
}

/// Any non-null value marks the message as read; the value itself is kept verbatim.
pub fn read_marker<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        None | Some(Value::Null) => None,
        Some(Value::String(s)) => Some(s),
        Some(other) => Some(other.to_string()),
    })
}

/// Empty strings count as missing for the optional text fields.
pub fn opt_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::String(s)) if !s.trim().is_empty() => Some(s),
        Some(Value::Number(n)) => Some(n.to_string()),
        _ => None,
    })
}

pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    for fmt in ["%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S%.f"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, fmt) {
            return Some(Utc.from_utc_datetime(&naive));
        }
    }
    raw.parse::<i64>().ok().and_then(from_epoch)
}

fn from_epoch(n: i64) -> Option<DateTime<Utc>> {
    // Values this large are milliseconds.
    if n.unsigned_abs() >= 100_000_000_000 {
        DateTime::from_timestamp_millis(n)
    } else {
        DateTime::from_timestamp(n, 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_timestamp_formats() {
        let expected = Utc.with_ymd_and_hms(2024, 5, 1, 10, 5, 0).unwrap();
        assert_eq!(parse_timestamp("2024-05-01T10:05:00Z"), Some(expected));
        assert_eq!(parse_timestamp("2024-05-01T12:05:00+02:00"), Some(expected));
        assert_eq!(parse_timestamp("2024-05-01 10:05:00"), Some(expected));
        assert_eq!(parse_timestamp("2024-05-01T10:05:00.000"), Some(expected));
        assert_eq!(parse_timestamp("1714557900"), Some(expected));
        assert_eq!(parse_timestamp("1714557900000"), Some(expected));
        assert_eq!(parse_timestamp("yesterday"), None);
        assert_eq!(parse_timestamp(""), None);
        assert_eq!(parse_timestamp("-9223372036854775808"), None);
    }

    #[test]
    fn test_out_of_range_epoch_reads_as_absent() {
        #[derive(Deserialize)]
        struct Stamp {
            #[serde(default, deserialize_with = "opt_timestamp")]
            at: Option<DateTime<Utc>>,
        }

        let stamp: Stamp = serde_json::from_str(r#"{"at": -9223372036854775808}"#).unwrap();
        assert_eq!(stamp.at, None);
        let stamp: Stamp = serde_json::from_str(r#"{"at": "-9223372036854775808"}"#).unwrap();
        assert_eq!(stamp.at, None);
    }
}
