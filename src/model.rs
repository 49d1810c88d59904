use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::duration::Duration;

/// Value used when a cosmetic field cannot be recovered from the
/// source. Tests assert on this; keep it out of inline literals.
pub const UNKNOWN: &str = "unknown";

/// A named participant: runner, host or commentator.
///
/// Identity for indexing purposes is the normalized name only; social
/// links are carried along for rendering and never compared.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Talent {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stream: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub twitter: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub youtube: Option<String>,
}

impl Talent {
    /// A talent known only by name, as the legacy schedule page and
    /// commentator cells give us.
    pub fn named(name: impl Into<String>) -> Self {
        Talent {
            name: name.into(),
            ..Default::default()
        }
    }
}

/// One scheduled session at an event.
///
/// `start` is UTC-normalized at ingestion. `estimate` already includes
/// setup time on top of the run time; the raw setup length is kept in
/// `setup`. Runner/host order is the source's display order.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Run {
    pub start: DateTime<Utc>,
    pub setup: Duration,
    pub estimate: Duration,
    pub runners: Vec<Talent>,
    pub hosts: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub commentators: Vec<Talent>,
    pub title: String,
    pub category: String,
    pub platform: String,
}

impl Run {
    /// Comma-joined runner names for table rendering.
    pub fn runner_names(&self) -> String {
        self.runners
            .iter()
            .map(|t| t.name.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

// ── Tests ──
