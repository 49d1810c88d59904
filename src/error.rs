use thiserror::Error;

/// Errors produced while fetching or assembling a schedule.
///
/// Structural problems abort the whole fetch; a partial schedule is
/// never returned. Cosmetic degradations (bad timestamps, malformed
/// durations, unsplittable category cells) are not errors and fall
/// back to zero values or the "unknown" sentinel instead.
#[derive(Debug, Error)]
pub enum Error {
    /// No schedule table or body, or fewer than two rows.
    #[error("missing schedule")]
    MissingSchedule,
    /// Schedule rows do not come in pairs.
    #[error("invalid schedule")]
    InvalidSchedule,
    /// A row pair is short on cells.
    #[error("row did not contain the data we expected")]
    UnexpectedData,
    /// The tracker rejected the request parameters.
    #[error("bad request: {0}")]
    BadRequest(String),
    /// The tracker has no such resource.
    #[error("not found: {0}")]
    NotFound(String),
    #[error("unexpected status code: {0}")]
    UnexpectedStatus(reqwest::StatusCode),
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("failed to decode response: {0}")]
    Decode(#[from] serde_json::Error),
}
