use std::fmt;

use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use inquire::{Password, PasswordDisplayMode, Select, Text};
use tokio::sync::oneshot;

use skyfetch_core::{
    Config, FetchError, RequestExecutor, Units, WeatherEndpoint, WeatherQuery, WeatherScreen,
    execute_blocking,
};

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "skyfetch", version, about = "Current weather from OpenWeatherMap")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Store the API key and default lookup settings.
    Configure,

    /// Show the current weather for a city.
    Show {
        /// City name; falls back to the configured default.
        city: Option<String>,

        /// Unit system: "metric", "imperial" or "standard".
        #[arg(long)]
        units: Option<String>,

        /// How to run the request.
        #[arg(long, value_enum, default_value_t = FetchMode::Async)]
        mode: FetchMode,
    },
}

/// Which execution path carries the request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum FetchMode {
    /// Blocking call on a dedicated worker thread.
    Sync,
    /// Non-blocking call on the async runtime.
    Async,
}

impl FetchMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            FetchMode::Sync => "sync",
            FetchMode::Async => "async",
        }
    }
}

impl fmt::Display for FetchMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl Cli {
    pub async fn run(self) -> Result<()> {
        match self.command {
            Command::Configure => configure(),
            Command::Show { city, units, mode } => show(city, units, mode).await,
        }
    }
}

/// Interactive configuration: prompts for the API key and the lookup
/// defaults, then persists everything to the config file.
fn configure() -> Result<()> {
    let mut config = Config::load()?;

    let api_key = Password::new("OpenWeatherMap API key:")
        .with_display_mode(PasswordDisplayMode::Masked)
        .without_confirmation()
        .prompt()?;
    config.set_api_key(api_key);

    let current_city = config.city_or_default(None);
    let city = Text::new("Default city:")
        .with_default(&current_city)
        .prompt()?;
    config.city = Some(city);

    let units = Select::new("Default units:", Units::all().to_vec()).prompt()?;
    config.units = Some(units.to_string());

    config.save()?;
    println!("Saved configuration to {}", Config::config_file_path()?.display());

    Ok(())
}

/// Fetch the current weather through the chosen execution path and paint
/// the resulting screen state onto the terminal.
async fn show(city: Option<String>, units: Option<String>, mode: FetchMode) -> Result<()> {
    let config = Config::load()?;

    let city = config.city_or_default(city);
    let units = units.as_deref().map(Units::try_from).transpose()?;
    let units = config.units_or_default(units)?;
    let api_key = config.api_key()?;

    tracing::debug!(%city, %units, %mode, "resolved lookup settings");

    let query = WeatherQuery::new(city.clone(), units, api_key);
    let call = WeatherEndpoint::new(config.base_url_or_default()).current_weather(&query);

    let mut screen = WeatherScreen::new(units);
    screen.begin_fetch();
    if screen.is_loading() {
        println!("Fetching weather for {city} ({mode})...");
    }

    let outcome = match mode {
        FetchMode::Sync => {
            // The blocking client must stay off the runtime threads, so the
            // call runs on its own worker and reports back over a channel.
            let (tx, rx) = oneshot::channel();
            std::thread::spawn(move || {
                let _ = tx.send(execute_blocking(&call));
            });
            rx.await.unwrap_or(Err(FetchError::Aborted))
        }
        FetchMode::Async => {
            let executor = RequestExecutor::new()?;
            executor.execute_async(call).outcome().await
        }
    };

    screen.finish(outcome);
    paint(&screen)
}

/// Print whatever the screen currently shows. A notice means the request
/// failed and the run should exit non-zero.
fn paint(screen: &WeatherScreen) -> Result<()> {
    if screen.panel_visible() {
        let panel = screen.panel();
        println!("{}", panel.temperature);
        println!("{}", panel.pressure);
        println!("{}", panel.humidity);
    }

    if let Some(notice) = screen.notice() {
        anyhow::bail!("{notice}");
    }

    Ok(())
}
