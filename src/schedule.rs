use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use chrono::{DateTime, Utc};

use crate::model::Run;
use crate::text::normalize;

/// Which run attribute a query matches against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityKind {
    Runner,
    Host,
    Title,
}

/// An event's runs plus substring-lookup indexes by runner and host.
///
/// Built in one pass from a finished run list and handed off frozen;
/// nothing mutates a published schedule, so lookups need no locking.
/// Filters return new `Schedule`s that share the underlying `Run`
/// values with their parent.
#[derive(Debug, Default)]
pub struct Schedule {
    pub runs: Vec<Arc<Run>>,
    by_runner: HashMap<String, Vec<Arc<Run>>>,
    by_host: HashMap<String, Vec<Arc<Run>>>,
}

impl Schedule {
    /// Index a finished run list. Bucket keys are normalized names; a
    /// run appears once per distinct runner and host it lists, and a
    /// run without runners or hosts only shows up in the flat list.
    pub fn from_runs(runs: Vec<Run>) -> Self {
        Self::from_shared(runs.into_iter().map(Arc::new).collect())
    }

    fn from_shared(runs: Vec<Arc<Run>>) -> Self {
        let mut by_runner: HashMap<String, Vec<Arc<Run>>> = HashMap::new();
        let mut by_host: HashMap<String, Vec<Arc<Run>>> = HashMap::new();
        for run in &runs {
            for talent in &run.runners {
                by_runner
                    .entry(normalize(&talent.name))
                    .or_default()
                    .push(Arc::clone(run));
            }
            for host in &run.hosts {
                by_host
                    .entry(normalize(host))
                    .or_default()
                    .push(Arc::clone(run));
            }
        }
        Schedule {
            runs,
            by_runner,
            by_host,
        }
    }

    /// Runs whose runner, host or title contains `query`.
    ///
    /// Matching is substring over normalized text, so a one-letter
    /// query casts a wide net; callers wanting an exact hit pass the
    /// full name. A blank query matches nothing. `None` means nothing
    /// matched; a `Some` schedule always holds at least one run.
    pub fn for_entity(&self, kind: EntityKind, query: &str) -> Option<Schedule> {
        if query.trim().is_empty() {
            return None;
        }
        let needle = normalize(query);

        let matched: Vec<Arc<Run>> = match kind {
            EntityKind::Title => self
                .runs
                .iter()
                .filter(|r| normalize(&r.title).contains(&needle))
                .cloned()
                .collect(),
            EntityKind::Runner => collect_buckets(&self.runs, &self.by_runner, &needle),
            EntityKind::Host => collect_buckets(&self.runs, &self.by_host, &needle),
        };

        if matched.is_empty() {
            None
        } else {
            Some(Schedule::from_shared(matched))
        }
    }

    pub fn for_runner(&self, name: &str) -> Option<Schedule> {
        self.for_entity(EntityKind::Runner, name)
    }

    pub fn for_host(&self, name: &str) -> Option<Schedule> {
        self.for_entity(EntityKind::Host, name)
    }

    pub fn for_title(&self, title: &str) -> Option<Schedule> {
        self.for_entity(EntityKind::Title, title)
    }

    /// First run starting strictly after `after`. Runs are stored in
    /// source order, which both pipelines deliver chronologically; no
    /// sorting happens here.
    pub fn next_run(&self, after: DateTime<Utc>) -> Option<&Arc<Run>> {
        self.runs.iter().find(|r| r.start > after)
    }
}

/// Union the buckets whose key contains `needle`, in flat-list order.
/// A run reached through two matching keys comes back once.
fn collect_buckets(
    runs: &[Arc<Run>],
    index: &HashMap<String, Vec<Arc<Run>>>,
    needle: &str,
) -> Vec<Arc<Run>> {
    let mut keep: HashSet<usize> = HashSet::new();
    for (key, bucket) in index {
        if key.contains(needle) {
            keep.extend(bucket.iter().map(|r| Arc::as_ptr(r) as usize));
        }
    }
    runs.iter()
        .filter(|r| keep.contains(&(Arc::as_ptr(r) as usize)))
        .cloned()
        .collect()
}

// ── Tests ──

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Talent;
    use chrono::TimeDelta;

    fn run(title: &str, runners: &[&str], hosts: &[&str]) -> Run {
        Run {
            title: title.to_string(),
            runners: runners.iter().map(|r| Talent::named(*r)).collect(),
            hosts: hosts.iter().map(|h| h.to_string()).collect(),
            ..Default::default()
        }
    }

    /// Five games across two runners and two hosts, with starts around
    /// now for the next-run cases.
    fn test_runs() -> Vec<Run> {
        let now = Utc::now();
        let mut game1 = run("Game 1", &["Amázing"], &["wonderful"]);
        game1.start = now - TimeDelta::minutes(10);
        let game2 = run("Game 2", &["Amázing"], &[]);
        let game3 = run("Game 3", &[], &["wonderful"]);
        let mut game4 = run("Game 4", &["Amázing"], &["awesome"]);
        game4.start = now + TimeDelta::minutes(10);
        let mut game5 = run("Game 5", &["fantastic"], &["wonderful"]);
        game5.start = now + TimeDelta::minutes(30);
        vec![game1, game2, game3, game4, game5]
    }

    #[test]
    fn build_empty() {
        let s = Schedule::from_runs(vec![]);
        assert!(s.runs.is_empty());
        assert!(s.by_runner.is_empty());
        assert!(s.by_host.is_empty());
    }

    #[test]
    fn build_single_empty_run() {
        let s = Schedule::from_runs(vec![Run::default()]);
        assert_eq!(s.runs.len(), 1);
        assert!(s.by_runner.is_empty());
        assert!(s.by_host.is_empty());
    }

    #[test]
    fn build_single_run() {
        let s = Schedule::from_runs(vec![run("Game", &["Amázing"], &["wonderful"])]);
        assert_eq!(s.runs.len(), 1);
        assert_eq!(s.by_runner.len(), 1);
        assert_eq!(s.by_host.len(), 1);
        // bucket keys are normalized
        assert_eq!(s.by_runner["amazing"].len(), 1);
        assert_eq!(s.by_host["wonderful"].len(), 1);
    }

    #[test]
    fn build_multiple_runs() {
        let s = Schedule::from_runs(test_runs());
        assert_eq!(s.runs.len(), 5);
        assert_eq!(s.by_runner.len(), 2);
        assert_eq!(s.by_host.len(), 2);
        assert_eq!(s.by_runner["amazing"].len(), 3);
        assert_eq!(s.by_host["wonderful"].len(), 3);
        assert_eq!(s.by_runner["fantastic"].len(), 1);
        assert_eq!(s.by_host["awesome"].len(), 1);
    }

    #[test]
    fn blank_queries_match_nothing() {
        let s = Schedule::from_runs(test_runs());
        assert!(s.for_entity(EntityKind::Runner, " ").is_none());
        assert!(s.for_entity(EntityKind::Host, "  ").is_none());
        assert!(s.for_entity(EntityKind::Title, "").is_none());
    }

    #[test]
    fn unknown_query_is_none() {
        let s = Schedule::from_runs(test_runs());
        assert!(s.for_entity(EntityKind::Runner, "zz").is_none());
    }

    #[test]
    fn exact_match() {
        let s = Schedule::from_runs(test_runs());
        assert_eq!(s.for_entity(EntityKind::Runner, "amazing").unwrap().runs.len(), 3);
    }

    #[test]
    fn match_ignores_surrounding_spacing() {
        let s = Schedule::from_runs(test_runs());
        assert_eq!(
            s.for_entity(EntityKind::Runner, " amazing  ").unwrap().runs.len(),
            3
        );
    }

    #[test]
    fn match_ignores_case_and_diacritics() {
        let s = Schedule::from_runs(test_runs());
        // stored as "Amázing", found by its plain spelling
        assert_eq!(s.for_runner("AMAZING").unwrap().runs.len(), 3);
        assert_eq!(s.for_runner("amázing").unwrap().runs.len(), 3);
    }

    #[test]
    fn partial_match_single_runner() {
        let s = Schedule::from_runs(test_runs());
        assert_eq!(s.for_entity(EntityKind::Runner, "maz").unwrap().runs.len(), 3);
    }

    #[test]
    fn partial_match_multiple_runners() {
        let s = Schedule::from_runs(test_runs());
        // "a" hits both amazing and fantastic
        assert_eq!(s.for_entity(EntityKind::Runner, "a").unwrap().runs.len(), 4);
    }

    #[test]
    fn multiple_matching_hosts_yield_run_once() {
        let s = Schedule::from_runs(vec![run("Game", &[], &["host one", "host two"])]);
        let filtered = s.for_host("host").unwrap();
        assert_eq!(filtered.runs.len(), 1);
    }

    #[test]
    fn filter_preserves_chronological_order() {
        let s = Schedule::from_runs(test_runs());
        let filtered = s.for_host("o").unwrap(); // wonderful + awesome
        let titles: Vec<&str> = filtered.runs.iter().map(|r| r.title.as_str()).collect();
        assert_eq!(titles, ["Game 1", "Game 3", "Game 4", "Game 5"]);
    }

    #[test]
    fn filtering_is_idempotent() {
        let s = Schedule::from_runs(test_runs());
        let once = s.for_runner("amazing").unwrap();
        let twice = once.for_runner("amazing").unwrap();
        assert_eq!(once.runs.len(), twice.runs.len());
        for (a, b) in once.runs.iter().zip(twice.runs.iter()) {
            assert!(Arc::ptr_eq(a, b));
        }
    }

    #[test]
    fn filtered_schedule_shares_runs() {
        let s = Schedule::from_runs(test_runs());
        let filtered = s.for_runner("fantastic").unwrap();
        assert!(Arc::ptr_eq(&filtered.runs[0], &s.runs[4]));
    }

    #[test]
    fn title_queries() {
        let s = Schedule::from_runs(test_runs());
        assert!(s.for_title("x").is_none());
        assert_eq!(s.for_title("4 ").unwrap().runs.len(), 1);
        assert_eq!(s.for_title(" ga ").unwrap().runs.len(), 5);
    }

    #[test]
    fn next_run_with_upcoming() {
        let s = Schedule::from_runs(test_runs());
        let next = s.next_run(Utc::now()).unwrap();
        assert_eq!(next.title, "Game 4");
    }

    #[test]
    fn next_run_with_only_past() {
        let mut past = run("Game 1", &["amazing"], &["wonderful"]);
        past.start = Utc::now() - TimeDelta::minutes(10);
        let s = Schedule::from_runs(vec![past]);
        assert!(s.next_run(Utc::now()).is_none());
    }
}
