use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::time::parse_date;

/// One journal record as supplied by the entry store.
///
/// Deserialization is lenient: missing or mistyped fields become empty
/// values and an unrecognised `type` becomes [`EntryBody::Unknown`], so a
/// single malformed record never rejects a whole collection.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(from = "RawEntry")]
pub struct Entry {
    pub id: String,
    /// ISO-8601 timestamp, kept verbatim. See [`Entry::parsed_date`].
    pub date: String,
    #[serde(flatten)]
    pub body: EntryBody,
}

/// Variant-specific payload.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum EntryBody {
    /// Structured reflection: stage name → answer. Only string answers carry text.
    Reflection { answers: Map<String, Value> },
    /// Free-form incident note.
    Incident { notes: String },
    /// Any other record shape. Contributes no text.
    Unknown,
}

impl Entry {
    pub fn reflection<K, V>(id: &str, date: &str, answers: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        let answers = answers
            .into_iter()
            .map(|(k, v)| (k.into(), Value::String(v.into())))
            .collect();
        Self {
            id: id.to_string(),
            date: date.to_string(),
            body: EntryBody::Reflection { answers },
        }
    }

    pub fn incident(id: &str, date: &str, notes: &str) -> Self {
        Self {
            id: id.to_string(),
            date: date.to_string(),
            body: EntryBody::Incident {
                notes: notes.to_string(),
            },
        }
    }

    /// The entry's analysable text.
    ///
    /// Reflections join their string answers with a space in stage order;
    /// incidents yield their notes; unknown shapes yield nothing.
    pub fn text(&self) -> String {
        match &self.body {
            EntryBody::Reflection { answers } => answers
                .values()
                .filter_map(Value::as_str)
                .collect::<Vec<_>>()
                .join(" "),
            EntryBody::Incident { notes } => notes.clone(),
            EntryBody::Unknown => String::new(),
        }
    }

    /// `date` as UTC, or `None` if it cannot be parsed.
    pub fn parsed_date(&self) -> Option<DateTime<Utc>> {
        parse_date(&self.date)
    }

    pub fn kind(&self) -> &'static str {
        match self.body {
            EntryBody::Reflection { .. } => "reflection",
            EntryBody::Incident { .. } => "incident",
            EntryBody::Unknown => "unknown",
        }
    }
}

/// Untyped wire shape. Every field is optional and any JSON type is accepted.
#[derive(Deserialize)]
struct RawEntry {
    #[serde(default)]
    id: Value,
    #[serde(default)]
    date: Value,
    #[serde(rename = "type", default)]
    kind: Value,
    #[serde(default)]
    answers: Value,
    #[serde(default)]
    notes: Value,
}

fn scalar_string(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        _ => String::new(),
    }
}

impl From<RawEntry> for Entry {
    fn from(raw: RawEntry) -> Self {
        let body = match raw.kind.as_str() {
            Some("reflection") => EntryBody::Reflection {
                answers: match raw.answers {
                    Value::Object(map) => map,
                    _ => Map::new(),
                },
            },
            Some("incident") => EntryBody::Incident {
                notes: raw.notes.as_str().unwrap_or_default().to_string(),
            },
            _ => EntryBody::Unknown,
        };
        Self {
            id: scalar_string(&raw.id),
            date: scalar_string(&raw.date),
            body,
        }
    }
}
