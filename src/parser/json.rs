//! Tracker search-API decoding.
//!
//! Every search endpoint answers with a list of `{model, pk, fields}`
//! records. Runs reference runners by pk, and host slots cover
//! inclusive run-pk ranges, so a schedule needs three responses joined
//! together before it holds displayable runs.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::Deserialize;

use crate::duration::Duration;
use crate::model::{Run, Talent, UNKNOWN};
use crate::parser::split_names;

/// One record from a tracker search response. Fields we never read are
/// left to serde to ignore.
#[derive(Debug, Deserialize)]
pub struct Record<T> {
    pub pk: u32,
    pub fields: T,
}

#[derive(Debug, Default, Deserialize)]
pub struct RunFields {
    #[serde(default)]
    pub display_name: String,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub console: Option<String>,
    #[serde(default)]
    pub commentators: String,
    #[serde(default)]
    pub starttime: Option<DateTime<Utc>>,
    #[serde(default)]
    pub endtime: Option<DateTime<Utc>>,
    #[serde(default)]
    pub run_time: Duration,
    #[serde(default)]
    pub setup_time: Duration,
    #[serde(default)]
    pub runners: Vec<u32>,
}

#[derive(Debug, Default, Deserialize)]
pub struct RunnerFields {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub stream: String,
    #[serde(default)]
    pub twitter: String,
    #[serde(default)]
    pub youtube: String,
}

impl RunnerFields {
    fn into_talent(self) -> Talent {
        Talent {
            name: self.name,
            stream: none_if_empty(self.stream),
            twitter: none_if_empty(self.twitter),
            youtube: none_if_empty(self.youtube),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct HostFields {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub start_run: u32,
    #[serde(default)]
    pub end_run: u32,
}

/// Join the three search responses into finished runs, in run-response
/// order (the tracker returns runs chronologically).
///
/// Runner pks resolve through the roster; unknown pks are skipped with
/// order preserved. An empty run response yields an empty list.
pub fn assemble(
    runs: Vec<Record<RunFields>>,
    runners: Vec<Record<RunnerFields>>,
    hosts: Vec<Record<HostFields>>,
) -> Vec<Run> {
    let roster: HashMap<u32, Talent> = runners
        .into_iter()
        .map(|r| (r.pk, r.fields.into_talent()))
        .collect();

    let mut hosts_by_run: HashMap<u32, Vec<String>> = HashMap::new();
    for slot in hosts {
        let (lo, hi) = ordered(slot.fields.start_run, slot.fields.end_run);
        for pk in lo..=hi {
            hosts_by_run
                .entry(pk)
                .or_default()
                .push(slot.fields.name.clone());
        }
    }

    runs.into_iter()
        .map(|record| {
            let f = record.fields;
            let start = f.starttime.unwrap_or_default();
            let end = f.endtime.unwrap_or_default();

            // Many historical records leave run_time unset; recover the
            // length from the start/end pair before adding setup on top.
            let mut estimate = f.run_time;
            if estimate.is_zero() {
                estimate = (end - start).to_std().map(Duration::from).unwrap_or_default();
            }
            let estimate = estimate.saturating_add(f.setup_time);

            Run {
                start,
                setup: f.setup_time,
                estimate,
                runners: f
                    .runners
                    .iter()
                    .filter_map(|pk| roster.get(pk).cloned())
                    .collect(),
                hosts: hosts_by_run.remove(&record.pk).unwrap_or_default(),
                commentators: split_names(&f.commentators)
                    .into_iter()
                    .map(Talent::named)
                    .collect(),
                title: f.display_name,
                category: or_unknown(f.category),
                platform: or_unknown(f.console),
            }
        })
        .collect()
}

/// Host slots occasionally arrive with the range ends swapped.
fn ordered(a: u32, b: u32) -> (u32, u32) {
    if a <= b {
        (a, b)
    } else {
        (b, a)
    }
}

fn or_unknown(value: Option<String>) -> String {
    match value {
        Some(v) if !v.is_empty() => v,
        _ => UNKNOWN.to_string(),
    }
}

fn none_if_empty(value: String) -> Option<String> {
    if value.is_empty() {
        None
    } else {
        Some(value)
    }
}

// ── Tests ──
