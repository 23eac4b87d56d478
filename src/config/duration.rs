use std::time::Duration;

use serde::{Deserialize, Deserializer, Serializer, de::Error};

#[derive(Deserialize)]
#[serde(untagged)]
enum RawDuration {
    Millis(u64),
    Text(String),
}

pub fn serialize<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.serialize_str(&format!("{}ms", duration.as_millis()))
}

pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
where
    D: Deserializer<'de>,
{
    match RawDuration::deserialize(deserializer)? {
        RawDuration::Millis(millis) => Ok(Duration::from_millis(millis)),
        RawDuration::Text(text) => parse(&text).map_err(D::Error::custom),
    }
}

/// Parses `"250ms"`, `"10s"`, `"2m"` or `"1h"`. A bare number is milliseconds.
pub(crate) fn parse(text: &str) -> Result<Duration, String> {
    let text = text.trim();
    let split = text
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(text.len());
    let (value, unit) = text.split_at(split);

    let value: u64 = value
        .parse()
        .map_err(|_| format!("invalid duration {text:?}"))?;

    match unit.trim() {
        "" | "ms" => Ok(Duration::from_millis(value)),
        "s" => Ok(Duration::from_secs(value)),
        "m" => Ok(Duration::from_secs(value * 60)),
        "h" => Ok(Duration::from_secs(value * 60 * 60)),
        other => Err(format!("unknown unit {other:?} in duration {text:?}")),
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn units() {
        assert_eq!(parse("250ms"), Ok(Duration::from_millis(250)));
        assert_eq!(parse("10s"), Ok(Duration::from_secs(10)));
        assert_eq!(parse("2m"), Ok(Duration::from_secs(120)));
        assert_eq!(parse("1h"), Ok(Duration::from_secs(3600)));
        assert_eq!(parse(" 1500 "), Ok(Duration::from_millis(1500)));
    }

    #[test]
    fn rejects_garbage() {
        assert!(parse("").is_err());
        assert!(parse("s").is_err());
        assert!(parse("10 fortnights").is_err());
    }

    #[test]
    fn integers_are_millis() {
        #[derive(Deserialize)]
        struct Holder {
            #[serde(with = "crate::config::duration")]
            timeout: Duration,
        }

        let holder: Holder = serde_json::from_str(r#"{"timeout": 750}"#).unwrap();
        assert_eq!(holder.timeout, Duration::from_millis(750));

        let holder: Holder = serde_json::from_str(r#"{"timeout": "3s"}"#).unwrap();
        assert_eq!(holder.timeout, Duration::from_secs(3));
    }
}
