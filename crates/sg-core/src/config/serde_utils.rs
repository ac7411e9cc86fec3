//! Serde adapters for configuration fields

/// `Duration` fields written as whole seconds.
///
/// Sub-second precision is dropped on write; config files only ever
/// carry integral timeouts.
pub mod duration_secs {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S: Serializer>(value: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u64(value.as_secs())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        u64::deserialize(deserializer).map(Duration::from_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::{Deserialize, Serialize};
    use std::time::Duration;

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct Timeouts {
        #[serde(with = "duration_secs")]
        connect_timeout: Duration,
    }

    #[test]
    fn test_reads_seconds_from_toml() {
        let parsed: Timeouts = toml::from_str("connect_timeout = 7").unwrap();
        assert_eq!(parsed.connect_timeout, Duration::from_secs(7));
    }

    #[test]
    fn test_writes_whole_seconds() {
        let value = Timeouts {
            connect_timeout: Duration::from_millis(2_750),
        };
        assert_eq!(
            serde_json::to_string(&value).unwrap(),
            r#"{"connect_timeout":2}"#
        );
    }

    #[test]
    fn test_rejects_negative_values() {
        assert!(toml::from_str::<Timeouts>("connect_timeout = -1").is_err());
    }
}
