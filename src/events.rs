use std::fmt;

use serde::{Deserialize, Serialize};

/// One marathon edition the tracker knows about.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Event {
    pub id: u32,
    pub short: String,
    pub name: String,
    pub year: u16,
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.name, self.year)
    }
}

/// Known events, loaded from a data file at startup and injected into
/// whoever needs a lookup. The tracker itself only speaks numeric ids;
/// everything here exists so people can type "agdq2021" instead.
#[derive(Debug, Default)]
pub struct EventRegistry {
    events: Vec<Event>,
}

impl EventRegistry {
    /// The registry bundled with the binary.
    pub fn builtin() -> Self {
        Self::from_json(include_str!("../data/events.json"))
            .expect("bundled events.json must be valid")
    }

    pub fn from_json(data: &str) -> Result<Self, serde_json::Error> {
        let events: Vec<Event> = serde_json::from_str(data)?;
        Ok(EventRegistry { events })
    }

    /// Case-insensitive short-code lookup.
    pub fn by_short(&self, short: &str) -> Option<&Event> {
        self.events.iter().find(|e| e.short.eq_ignore_ascii_case(short))
    }

    pub fn by_id(&self, id: u32) -> Option<&Event> {
        self.events.iter().find(|e| e.id == id)
    }

    /// Highest-id event; the CLI's default when no event is named.
    pub fn latest(&self) -> Option<&Event> {
        self.events.iter().max_by_key(|e| e.id)
    }

    /// Resolve a CLI event argument: a known short code, a known id,
    /// or a bare numeric id the registry has not caught up with yet.
    pub fn resolve(&self, arg: &str) -> Option<Event> {
        if let Some(ev) = self.by_short(arg) {
            return Some(ev.clone());
        }
        let id: u32 = arg.parse().ok()?;
        Some(self.by_id(id).cloned().unwrap_or(Event {
            id,
            short: "unknown".into(),
            name: "unknown".into(),
            year: 0,
        }))
    }

    pub fn iter(&self) -> impl Iterator<Item = &Event> {
        self.events.iter()
    }
}

// ── Tests ──

#[cfg(test)]
mod tests {
    use super::*;

    fn synthetic() -> EventRegistry {
        EventRegistry::from_json(
            r#"[
                {"id": 33, "short": "fleetfatales2020", "name": "Fleet Fatales", "year": 2020},
                {"id": 34, "short": "agdq2021", "name": "Awesome Games Done Quick", "year": 2021}
            ]"#,
        )
        .unwrap()
    }

    #[test]
    fn builtin_loads() {
        let reg = EventRegistry::builtin();
        assert!(reg.latest().is_some());
        assert_eq!(reg.by_id(34).unwrap().short, "agdq2021");
    }

    #[test]
    fn short_lookup_ignores_case() {
        let reg = synthetic();
        assert_eq!(reg.by_short("AGDQ2021").unwrap().id, 34);
        assert!(reg.by_short("sgdq1999").is_none());
    }

    #[test]
    fn latest_is_highest_id() {
        let reg = synthetic();
        assert_eq!(reg.latest().unwrap().id, 34);
    }

    #[test]
    fn resolve_prefers_short_code() {
        let reg = synthetic();
        assert_eq!(reg.resolve("fleetfatales2020").unwrap().id, 33);
        assert_eq!(reg.resolve("34").unwrap().short, "agdq2021");
    }

    #[test]
    fn resolve_accepts_unlisted_ids() {
        let reg = synthetic();
        let ev = reg.resolve("99").unwrap();
        assert_eq!(ev.id, 99);
        assert_eq!(ev.short, "unknown");
    }

    #[test]
    fn resolve_rejects_gibberish() {
        let reg = synthetic();
        assert!(reg.resolve("not-an-event").is_none());
    }

    #[test]
    fn display_includes_year() {
        let reg = synthetic();
        assert_eq!(reg.by_id(33).unwrap().to_string(), "Fleet Fatales 2020");
    }
}
