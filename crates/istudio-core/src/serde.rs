//! Custom serde helpers for query-string deserialization.
//!
//! Browsers send empty query parameters as empty strings; these helpers
//! treat an empty string as absent instead of a parse error.

use serde::{Deserialize, Deserializer};
use uuid::Uuid;

pub fn deserialize_optional_i64<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    let s: Option<String> = Option::deserialize(deserializer)?;
    match s {
        Some(s) if s.is_empty() => Ok(None),
        Some(s) => s.parse::<i64>().map(Some).map_err(serde::de::Error::custom),
        None => Ok(None),
    }
}

pub fn deserialize_optional_bool<'de, D>(deserializer: D) -> Result<Option<bool>, D::Error>
where
    D: Deserializer<'de>,
{
    let s: Option<String> = Option::deserialize(deserializer)?;
    match s.as_deref() {
        None | Some("") => Ok(None),
        Some("true") | Some("1") => Ok(Some(true)),
        Some("false") | Some("0") => Ok(Some(false)),
        Some(other) => Err(serde::de::Error::custom(format!(
            "invalid boolean: {other:?}"
        ))),
    }
}

pub fn deserialize_optional_uuid<'de, D>(deserializer: D) -> Result<Option<Uuid>, D::Error>
where
    D: Deserializer<'de>,
{
    let opt: Option<String> = Option::deserialize(deserializer)?;
    match opt {
        Some(s) if s.is_empty() => Ok(None),
        Some(s) => Uuid::parse_str(&s)
            .map(Some)
            .map_err(serde::de::Error::custom),
        None => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Deserialize)]
    struct Params {
        #[serde(default, deserialize_with = "deserialize_optional_i64")]
        limit: Option<i64>,
        #[serde(default, deserialize_with = "deserialize_optional_bool")]
        pinned: Option<bool>,
        #[serde(default, deserialize_with = "deserialize_optional_uuid")]
        user_id: Option<Uuid>,
    }

    #[test]
    fn test_empty_strings_become_none() {
        let params: Params =
            serde_json::from_str(r#"{"limit":"","pinned":"","user_id":""}"#).unwrap();
        assert_eq!(params.limit, None);
        assert_eq!(params.pinned, None);
        assert_eq!(params.user_id, None);
    }

    #[test]
    fn test_bool_accepts_true_false_and_digits() {
        let params: Params = serde_json::from_str(r#"{"pinned":"true"}"#).unwrap();
        assert_eq!(params.pinned, Some(true));
        let params: Params = serde_json::from_str(r#"{"pinned":"0"}"#).unwrap();
        assert_eq!(params.pinned, Some(false));
        assert!(serde_json::from_str::<Params>(r#"{"pinned":"maybe"}"#).is_err());
    }

    #[test]
    fn test_values_parse() {
        let id = Uuid::new_v4();
        let json = format!(r#"{{"limit":"25","user_id":"{id}"}}"#);
        let params: Params = serde_json::from_str(&json).unwrap();
        assert_eq!(params.limit, Some(25));
        assert_eq!(params.user_id, Some(id));
    }

    #[test]
    fn test_invalid_number_is_an_error() {
        assert!(serde_json::from_str::<Params>(r#"{"limit":"ten"}"#).is_err());
    }
}
