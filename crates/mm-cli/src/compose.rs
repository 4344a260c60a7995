use anyhow::{Result, bail};
use clap::ValueEnum;
use mm_core::{Entry, now_iso8601, parse_date};
use schemars::JsonSchema;
use serde::Deserialize;
use uuid::Uuid;

/// Stage name used when a reflection is added without one.
pub const DEFAULT_STAGE: &str = "situation";

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum EntryKind {
    Reflection,
    Incident,
}

/// Build a new entry with a fresh UUID. `date` defaults to now and must
/// parse if given.
pub fn compose_entry(
    kind: EntryKind,
    text: &str,
    stage: Option<&str>,
    date: Option<&str>,
) -> Result<Entry> {
    if text.trim().is_empty() {
        bail!("entry text must not be empty");
    }
    let date = match date {
        Some(d) if parse_date(d).is_none() => bail!("unrecognised date: {d}"),
        Some(d) => d.to_string(),
        None => now_iso8601(),
    };

    let id = Uuid::new_v4().to_string();
    Ok(match kind {
        EntryKind::Reflection => {
            Entry::reflection(&id, &date, [(stage.unwrap_or(DEFAULT_STAGE), text)])
        }
        EntryKind::Incident => Entry::incident(&id, &date, text),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use mm_core::EntryBody;

    #[test]
    fn test_reflection_default_stage() {
        let entry = compose_entry(EntryKind::Reflection, "long shift", None, Some("2026-03-01")).unwrap();
        let EntryBody::Reflection { answers } = &entry.body else {
            panic!("expected reflection");
        };
        assert_eq!(answers["situation"], "long shift");
        assert_eq!(entry.date, "2026-03-01");
        assert!(Uuid::parse_str(&entry.id).is_ok());
    }

    #[test]
    fn test_incident_defaults_to_now() {
        let entry = compose_entry(EntryKind::Incident, "fall on ward", None, None).unwrap();
        assert_eq!(entry.kind(), "incident");
        assert!(entry.parsed_date().is_some());
    }

    #[test]
    fn test_rejects_bad_input() {
        assert!(compose_entry(EntryKind::Incident, "  ", None, None).is_err());
        assert!(compose_entry(EntryKind::Incident, "ok", None, Some("yesterday")).is_err());
    }
}
