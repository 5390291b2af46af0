use std::time::Duration;

use reqwest::StatusCode;
use tokio::sync::oneshot;
use tracing::{debug, warn};

use crate::endpoint::WeatherCall;
use crate::model::WeatherRecord;
use crate::outcome::{FetchError, Outcome};

/// Request timeout for both clients; the transport's own default waits
/// indefinitely.
const TIMEOUT: Duration = Duration::from_secs(30);

const USER_AGENT: &str = concat!("skyfetch/", env!("CARGO_PKG_VERSION"));

/// Run a call to completion on the current thread.
///
/// Blocks until the server answers or the transport gives up. One attempt,
/// no retries. Never invoke this on the thread that renders the screen, and
/// never from inside an async runtime: dispatch it onto a worker thread and
/// channel the outcome back, as `skyfetch-cli` does for its sync mode.
pub fn execute_blocking(call: &WeatherCall) -> Outcome {
    debug!(url = call.url(), "executing current-weather request (blocking)");

    let outcome = blocking_round_trip(call);
    if let Err(err) = &outcome {
        warn!(error = %err, "current-weather request failed");
    }
    outcome
}

fn blocking_round_trip(call: &WeatherCall) -> Outcome {
    let http = reqwest::blocking::Client::builder()
        .timeout(TIMEOUT)
        .user_agent(USER_AGENT)
        .build()?;

    let resp = http.get(call.url()).query(call.params()).send()?;
    let status = resp.status();
    let body = resp.text()?;

    decode_response(status, &body)
}

/// Executes calls without blocking the caller.
///
/// Holds one shared async client; cloning is cheap and clones share the
/// connection pool.
#[derive(Debug, Clone)]
pub struct RequestExecutor {
    http: reqwest::Client,
}

impl RequestExecutor {
    pub fn new() -> Result<Self, FetchError> {
        let http = reqwest::Client::builder()
            .timeout(TIMEOUT)
            .user_agent(USER_AGENT)
            .build()?;

        Ok(Self { http })
    }

    /// Run a call and await its outcome.
    pub async fn execute(&self, call: &WeatherCall) -> Outcome {
        debug!(url = call.url(), "executing current-weather request");

        let outcome = self.round_trip(call).await;
        if let Err(err) = &outcome {
            warn!(error = %err, "current-weather request failed");
        }
        outcome
    }

    async fn round_trip(&self, call: &WeatherCall) -> Outcome {
        let resp = self.http.get(call.url()).query(call.params()).send().await?;
        let status = resp.status();
        let body = resp.text().await?;

        decode_response(status, &body)
    }

    /// Submit a call to the runtime and return immediately.
    ///
    /// The request completes on whichever runtime thread picks it up; the
    /// returned handle resolves exactly once with the outcome. There is no
    /// cancellation: the request runs to success or failure. Must be
    /// called from within a tokio runtime.
    pub fn execute_async(&self, call: WeatherCall) -> PendingOutcome {
        let (tx, rx) = oneshot::channel();
        let executor = self.clone();

        tokio::spawn(async move {
            let outcome = executor.execute(&call).await;
            // Nowhere to deliver if the receiver was dropped.
            let _ = tx.send(outcome);
        });

        PendingOutcome { rx }
    }
}

/// A submitted request whose outcome has not arrived yet.
///
/// Taking delivery consumes the handle, so at most one outcome can ever be
/// observed per submission.
#[derive(Debug)]
pub struct PendingOutcome {
    rx: oneshot::Receiver<Outcome>,
}

impl PendingOutcome {
    /// Wait for the outcome.
    ///
    /// Resolves to `FetchError::Aborted` if the runtime dropped the request
    /// task before it could report back (e.g. at shutdown).
    pub async fn outcome(self) -> Outcome {
        match self.rx.await {
            Ok(outcome) => outcome,
            Err(_) => Err(FetchError::Aborted),
        }
    }
}

/// Map a raw status/body pair onto the outcome contract. Shared by both
/// execution modes; pure, so it carries no logging of its own.
fn decode_response(status: StatusCode, body: &str) -> Outcome {
    if !status.is_success() {
        return Err(FetchError::Status {
            status: status.as_u16(),
            body: truncate_body(body),
        });
    }

    if body.trim().is_empty() {
        return Err(FetchError::EmptyBody);
    }

    let record: WeatherRecord = serde_json::from_str(body)?;
    Ok(record)
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    if body.chars().count() > MAX {
        let head: String = body.chars().take(MAX).collect();
        format!("{head}...")
    } else {
        body.to_string()
    }
}
