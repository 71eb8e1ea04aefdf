use chrono::{DateTime, SecondsFormat, Utc};
use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value};

/// Company size buckets offered by the demo request form.
pub const COMPANY_SIZES: [&str; 5] = ["1-10", "11-50", "51-200", "201-500", "501+"];

/// A form entry that passed validation but has not been persisted yet.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ValidatedSubmission {
    pub full_name: String,
    pub email: String,
    pub company_name: String,
    pub phone_number: String,
    pub job_title: String,
    pub company_size: String,
    pub message: String,
}

/// One persisted form entry.
///
/// Fields other than `timestamp` fall back to an empty string when missing
/// or `null` in the backing file, and numbers or booleans read as their
/// text. Keys this version does not know about are kept in `extra` and
/// written back untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Submission {
    #[serde(default, deserialize_with = "nullable_string")]
    pub full_name: String,
    #[serde(default, deserialize_with = "nullable_string")]
    pub email: String,
    #[serde(default, deserialize_with = "nullable_string")]
    pub company_name: String,
    #[serde(default, deserialize_with = "nullable_string")]
    pub phone_number: String,
    #[serde(default, deserialize_with = "nullable_string")]
    pub job_title: String,
    #[serde(default, deserialize_with = "nullable_string")]
    pub company_size: String,
    #[serde(default, deserialize_with = "nullable_string")]
    pub message: String,
    pub timestamp: Timestamp,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Submission {
    pub fn stamped(validated: ValidatedSubmission, timestamp: DateTime<Utc>) -> Self {
        Self {
            full_name: validated.full_name,
            email: validated.email,
            company_name: validated.company_name,
            phone_number: validated.phone_number,
            job_title: validated.job_title,
            company_size: validated.company_size,
            message: validated.message,
            timestamp: Timestamp::from(timestamp),
            extra: Map::new(),
        }
    }

    /// True when this entry carries exactly the fields of `validated`.
    pub fn matches(&self, validated: &ValidatedSubmission) -> bool {
        self.full_name == validated.full_name
            && self.email == validated.email
            && self.company_name == validated.company_name
            && self.phone_number == validated.phone_number
            && self.job_title == validated.job_title
            && self.company_size == validated.company_size
            && self.message == validated.message
    }
}

/// Text form of a scalar form value. `null`, arrays and objects have none.
pub fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    }
}

fn nullable_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<Value>::deserialize(deserializer)? {
        None | Some(Value::Null) => Ok(String::new()),
        Some(value) => scalar_text(&value)
            .ok_or_else(|| de::Error::custom(format!("expected text, found {value}"))),
    }
}

/// When an entry was stored.
///
/// New stamps are written as ISO-8601 with millisecond precision and a `Z`
/// suffix, e.g. `2024-05-01T12:30:00.123Z`. A timestamp read from the file
/// keeps its original spelling so rewrites leave older entries byte-for-byte
/// as they were. Ordering and equality look only at the instant.
#[derive(Debug, Clone)]
pub struct Timestamp {
    instant: DateTime<Utc>,
    text: String,
}

impl Timestamp {
    pub fn instant(&self) -> DateTime<Utc> {
        self.instant
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }
}

impl From<DateTime<Utc>> for Timestamp {
    fn from(instant: DateTime<Utc>) -> Self {
        Self {
            instant,
            text: instant.to_rfc3339_opts(SecondsFormat::Millis, true),
        }
    }
}

impl PartialEq for Timestamp {
    fn eq(&self, other: &Self) -> bool {
        self.instant == other.instant
    }
}

impl Eq for Timestamp {}

impl PartialOrd for Timestamp {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Timestamp {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.instant.cmp(&other.instant)
    }
}

impl std::fmt::Display for Timestamp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.text)
    }
}

impl Serialize for Timestamp {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.text)
    }
}

impl<'de> Deserialize<'de> for Timestamp {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let text = String::deserialize(deserializer)?;
        let instant = DateTime::parse_from_rfc3339(&text)
            .map_err(|e| de::Error::custom(format!("invalid timestamp '{text}': {e}")))?
            .with_timezone(&Utc);
        Ok(Self { instant, text })
    }
}
