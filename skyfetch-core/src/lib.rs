//! Core library for the `skyfetch` CLI.
//!
//! This crate defines:
//! - The current-weather endpoint descriptor (composes calls, runs nothing)
//! - A request executor with a blocking and an asynchronous mode
//! - The outcome contract every execution path resolves to
//! - The screen-state controller that turns outcomes into display state
//! - Configuration & credentials handling
//!
//! It is used by `skyfetch-cli`, but can also be reused by other binaries or services.

pub mod config;
pub mod endpoint;
pub mod executor;
pub mod model;
pub mod outcome;
pub mod screen;

pub use config::Config;
pub use endpoint::{DEFAULT_BASE_URL, WeatherCall, WeatherEndpoint};
pub use executor::{PendingOutcome, RequestExecutor, execute_blocking};
pub use model::{MainReadings, Units, WeatherQuery, WeatherRecord};
pub use outcome::{FetchError, Outcome};
pub use screen::{Panel, WeatherScreen};
