use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A single to-do item
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    /// Unique token assigned at creation, never changed afterwards
    pub id: String,
    /// Task text
    pub text: String,
    /// Completion flag (toggles independently of the due date)
    #[serde(default)]
    pub completed: bool,
    /// Calendar due date. The group (today/tomorrow/upcoming) is derived from it.
    #[serde(with = "due_date_format")]
    pub due_date: NaiveDate,
}

impl Task {
    /// Create a new, not completed task
    pub fn new(id: String, text: String, due_date: NaiveDate) -> Self {
        Task {
            id,
            text,
            completed: false,
            due_date,
        }
    }
}

/// `due_date` is written as `YYYY-MM-DD`. On read, a full timestamp such as
/// `2026-10-19T00:00:00.000Z` is also accepted and truncated to its date.
pub(crate) mod due_date_format {
    use chrono::{DateTime, NaiveDate, NaiveDateTime};
    use serde::{Deserialize, Deserializer, Serializer, de};

    const FORMAT: &str = "%Y-%m-%d";

    pub fn serialize<S>(date: &NaiveDate, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&date.format(FORMAT).to_string())
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<NaiveDate, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        parse(&s).ok_or_else(|| de::Error::custom(format!("invalid due date: {}", s)))
    }

    pub fn parse(s: &str) -> Option<NaiveDate> {
        let s = s.trim();
        if let Ok(d) = NaiveDate::parse_from_str(s, FORMAT) {
            return Some(d);
        }
        if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
            return Some(dt.date_naive());
        }
        // Timestamps without an offset, e.g. "2026-10-19T08:30:00"
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f") {
            return Some(dt.date());
        }
        None
    }
}
