use std::fmt;
use std::time::Duration as StdDuration;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Length of a run or its setup block.
///
/// Wraps [`std::time::Duration`] with the tracker's wire formats: the
/// API writes durations as `H:MM:SS` strings, older records as bare
/// second counts. Malformed cells decode to zero rather than failing
/// the parse; schedule data is full of them.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord)]
pub struct Duration(StdDuration);

impl Duration {
    pub const ZERO: Duration = Duration(StdDuration::ZERO);

    pub fn from_secs(secs: u64) -> Self {
        Duration(StdDuration::from_secs(secs))
    }

    pub fn as_secs(&self) -> u64 {
        self.0.as_secs()
    }

    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    /// Parse a `H:MM:SS` cell. Anything that is not exactly three
    /// colon-separated numbers becomes zero.
    pub fn from_hms(input: &str) -> Self {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return Duration::ZERO;
        }
        let parts: Vec<&str> = trimmed.split(':').collect();
        if parts.len() != 3 {
            return Duration::ZERO;
        }
        let nums: Option<Vec<u64>> = parts
            .iter()
            .map(|p| p.trim().parse::<u64>().ok())
            .collect();
        match nums {
            Some(n) => Duration::from_secs(n[0] * 3600 + n[1] * 60 + n[2]),
            None => Duration::ZERO,
        }
    }

    pub fn saturating_add(self, other: Duration) -> Duration {
        Duration(self.0.saturating_add(other.0))
    }
}

impl From<StdDuration> for Duration {
    fn from(d: StdDuration) -> Self {
        Duration(d)
    }
}

impl fmt::Display for Duration {
    /// Human wording rounded to the minute: "2 minutes", "1 hour",
    /// "1 hour and 5 minutes".
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let minutes = (self.0.as_secs() + 30) / 60;
        let h = minutes / 60;
        let m = minutes % 60;
        if h == 0 {
            return match m {
                1 => write!(f, "1 minute"),
                _ => write!(f, "{m} minutes"),
            };
        }
        if h == 1 {
            write!(f, "1 hour")?;
        } else {
            write!(f, "{h} hours")?;
        }
        match m {
            0 => Ok(()),
            1 => write!(f, " and 1 minute"),
            _ => write!(f, " and {m} minutes"),
        }
    }
}

impl Serialize for Duration {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u64(self.0.as_secs())
    }
}

impl<'de> Deserialize<'de> for Duration {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Secs(u64),
            Text(String),
        }
        Ok(match Raw::deserialize(deserializer)? {
            Raw::Secs(s) => Duration::from_secs(s),
            Raw::Text(t) => Duration::from_hms(&t),
        })
    }
}

// ── Tests ──
