use thiserror::Error;

use crate::model::WeatherRecord;

/// Terminal result of one submitted request: a parsed record, or the reason
/// there is none. Every execution path produces exactly one of these.
pub type Outcome = Result<WeatherRecord, FetchError>;

/// Ways a request can fail.
///
/// The display text doubles as the user-visible notice, so messages are
/// written for the screen, not only for logs.
#[derive(Debug, Error)]
pub enum FetchError {
    /// The HTTP round-trip failed before a usable response arrived
    /// (DNS, connect, timeout, client build).
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// The server answered with a non-success status.
    #[error("weather API returned HTTP {status}: {body}")]
    Status { status: u16, body: String },

    /// A success status carrying nothing to parse.
    #[error("weather API returned an empty response body")]
    EmptyBody,

    /// The body arrived but could not be decoded into a record.
    #[error("could not decode weather response: {0}")]
    Malformed(#[from] serde_json::Error),

    /// The runtime dropped the request before it produced an outcome.
    #[error("request was aborted before completing")]
    Aborted,
}
