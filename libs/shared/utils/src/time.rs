use chrono::NaiveTime;

use shared_models::PortalError;

/// Parse a time-of-day as the backend sends it. Both `HH:MM` and `HH:MM:SS`
/// appear in payloads; anything else is rejected here, at the boundary, so
/// downstream code only ever sees well-formed times.
pub fn parse_time_of_day(raw: &str) -> Result<NaiveTime, PortalError> {
    NaiveTime::parse_from_str(raw, "%H:%M:%S")
        .or_else(|_| NaiveTime::parse_from_str(raw, "%H:%M"))
        .map_err(|_| PortalError::Decode(format!("invalid time of day: {raw:?}")))
}

pub fn format_time_of_day(time: NaiveTime) -> String {
    time.format("%H:%M").to_string()
}

/// Serde adapter for `HH:MM` times-of-day on the wire.
pub mod serde_hhmm {
    use chrono::NaiveTime;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(time: &NaiveTime, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&super::format_time_of_day(*time))
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<NaiveTime, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        super::parse_time_of_day(&raw).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveTime;

    #[test]
    fn accepts_both_wire_formats() {
        let expected = NaiveTime::from_hms_opt(9, 30, 0).unwrap();
        assert_eq!(parse_time_of_day("09:30").unwrap(), expected);
        assert_eq!(parse_time_of_day("09:30:00").unwrap(), expected);
    }

    #[test]
    fn rejects_malformed_input() {
        assert!(parse_time_of_day("9 30").is_err());
        assert!(parse_time_of_day("25:00").is_err());
        assert!(parse_time_of_day("").is_err());
    }

    #[test]
    fn formats_back_to_hhmm() {
        let time = NaiveTime::from_hms_opt(14, 0, 0).unwrap();
        assert_eq!(format_time_of_day(time), "14:00");
    }
}
