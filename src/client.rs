use serde::de::DeserializeOwned;
use tracing::info;

use crate::error::Error;
use crate::parser::{html, json};
use crate::schedule::Schedule;

const TRACKER_BASE: &str = "https://gamesdonequick.com/tracker/api/v1";
const SCHEDULE_BASE: &str = "https://gamesdonequick.com/schedule";

/// Tracker API client.
///
/// Owns no transport policy beyond what the supplied `reqwest::Client`
/// carries (timeout, user agent, pooling); it maps responses to typed
/// errors and hands decoded data to the parsers. It never retries.
pub struct Client {
    http: reqwest::Client,
    base: String,
    schedule_base: String,
}

impl Client {
    pub fn new(http: reqwest::Client) -> Self {
        Client {
            http,
            base: TRACKER_BASE.to_string(),
            schedule_base: SCHEDULE_BASE.to_string(),
        }
    }

    /// Point both the API and the legacy schedule pages at a different
    /// server. Lookup paths are appended to `base` as-is.
    pub fn with_base(mut self, base: impl Into<String>) -> Self {
        let base = base.into();
        self.schedule_base = format!("{base}/schedule");
        self.base = base;
        self
    }

    /// Fetch, join and index the schedule for an event.
    ///
    /// The run list, runner roster and host slots are independent
    /// lookups and are issued concurrently; the first failure aborts
    /// the assembly and no partial schedule is built.
    pub async fn schedule(&self, event: u32) -> Result<Schedule, Error> {
        let runs_url = format!("{}/search?type=run&event={event}", self.base);
        let runners_url = format!("{}/search?type=runner&event={event}", self.base);
        let hosts_url = format!("{}/hosts/{event}", self.base);
        let (runs, runners, hosts) = tokio::try_join!(
            self.get_json::<Vec<json::Record<json::RunFields>>>(&runs_url),
            self.get_json::<Vec<json::Record<json::RunnerFields>>>(&runners_url),
            self.get_json::<Vec<json::Record<json::HostFields>>>(&hosts_url),
        )?;

        info!(
            runs = runs.len(),
            runners = runners.len(),
            hosts = hosts.len(),
            "assembling schedule"
        );
        Ok(Schedule::from_runs(json::assemble(runs, runners, hosts)))
    }

    /// Fetch and parse the legacy HTML schedule page for an event.
    pub async fn legacy_schedule(&self, event: u32) -> Result<Schedule, Error> {
        let url = format!("{}/{event}", self.schedule_base);
        info!(%url, "fetching legacy schedule");

        let resp = self.http.get(&url).send().await?;
        let status = resp.status();
        if !status.is_success() {
            return Err(Error::UnexpectedStatus(status));
        }
        let page = resp.text().await?;
        Ok(Schedule::from_runs(html::parse_schedule(&page)?))
    }

    async fn get_json<T: DeserializeOwned>(&self, url: &str) -> Result<T, Error> {
        let resp = self
            .http
            .get(url)
            .header("Accept", "application/json")
            .send()
            .await?;
        let status = resp.status();

        match status {
            reqwest::StatusCode::OK => {
                let body = resp.bytes().await?;
                Ok(serde_json::from_slice(&body)?)
            }
            reqwest::StatusCode::BAD_REQUEST | reqwest::StatusCode::NOT_FOUND => {
                let body = resp.text().await?;
                let detail = client_detail(&body).unwrap_or(body);
                if status == reqwest::StatusCode::NOT_FOUND {
                    Err(Error::NotFound(detail))
                } else {
                    Err(Error::BadRequest(detail))
                }
            }
            other => Err(Error::UnexpectedStatus(other)),
        }
    }
}

/// Pull the human-readable message out of a tracker error body, which
/// uses either `detail` or `error` depending on the endpoint.
fn client_detail(body: &str) -> Option<String> {
    #[derive(serde::Deserialize)]
    struct Detail {
        detail: Option<String>,
        error: Option<String>,
    }
    let d: Detail = serde_json::from_str(body).ok()?;
    d.detail.or(d.error).filter(|s| !s.is_empty())
}

// ── Tests ──
