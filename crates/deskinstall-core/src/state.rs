use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Record of the last successful installation.
///
/// Reading is lenient per field: a `path` or `version` that is not a string
/// reads as empty, and an unparseable `modified` reads as `None`. Only a
/// document that is not a JSON object is rejected.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct InstallerState {
    #[serde(default, deserialize_with = "lenient::string")]
    pub path: String,
    #[serde(default, deserialize_with = "lenient::string")]
    pub version: String,
    #[serde(
        default,
        serialize_with = "lenient::serialize_timestamp",
        deserialize_with = "lenient::timestamp"
    )]
    pub modified: Option<DateTime<Utc>>,
}

impl InstallerState {
    pub fn new(
        path: impl Into<String>,
        version: impl Into<String>,
        modified: DateTime<Utc>,
    ) -> Self {
        Self {
            path: path.into(),
            version: version.into(),
            modified: Some(modified),
        }
    }

    pub fn from_json_str(input: &str) -> Result<Self> {
        serde_json::from_str(input).context("failed to parse installer state")
    }

    pub fn to_json_pretty(&self) -> Result<String> {
        serde_json::to_string_pretty(self).context("failed to serialize installer state")
    }
}

mod lenient {
    use chrono::{DateTime, SecondsFormat, Utc};
    use serde::{Deserialize, Deserializer, Serializer};
    use serde_json::Value;

    pub fn string<'de, D>(deserializer: D) -> Result<String, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Value::deserialize(deserializer)?;
        Ok(match value {
            Value::String(value) => value,
            _ => String::new(),
        })
    }

    pub fn timestamp<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Value::deserialize(deserializer)?;
        Ok(value
            .as_str()
            .and_then(|raw| DateTime::parse_from_rfc3339(raw).ok())
            .map(|parsed| parsed.with_timezone(&Utc)))
    }

    pub fn serialize_timestamp<S>(
        value: &Option<DateTime<Utc>>,
        serializer: S,
    ) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match value {
            Some(value) => {
                serializer.serialize_str(&value.to_rfc3339_opts(SecondsFormat::Secs, true))
            }
            None => serializer.serialize_none(),
        }
    }
}
