use crate::model::{Units, WeatherRecord};
use crate::outcome::Outcome;

/// The three result labels, as display-ready strings.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Panel {
    pub temperature: String,
    pub pressure: String,
    pub humidity: String,
}

/// Owned screen state for the weather sample: a loading indicator, a result
/// panel of three labels, and a transient notice slot for failures.
///
/// Both trigger paths (sync and async) drive the same two transitions, so
/// the screen neither knows nor cares which execution mode produced an
/// outcome.
#[derive(Debug)]
pub struct WeatherScreen {
    units: Units,
    loading: bool,
    panel_visible: bool,
    panel: Panel,
    notice: Option<String>,
}

impl WeatherScreen {
    /// A fresh screen: nothing loading, panel hidden, labels empty.
    pub fn new(units: Units) -> Self {
        Self {
            units,
            loading: false,
            panel_visible: false,
            panel: Panel::default(),
            notice: None,
        }
    }

    /// A fetch was triggered: hide the result panel, clear any stale
    /// notice, show the loading indicator.
    pub fn begin_fetch(&mut self) {
        self.panel_visible = false;
        self.notice = None;
        self.loading = true;
    }

    /// An outcome arrived: hide the loading indicator, then either render
    /// the record into the panel or surface the failure as a notice.
    ///
    /// Call this exactly once per outcome. Overlapping requests are not
    /// tracked; whichever outcome lands last determines what stays on
    /// screen.
    pub fn finish(&mut self, outcome: Outcome) {
        self.loading = false;

        match outcome {
            Ok(record) => {
                self.panel = render_panel(&record, self.units);
                self.panel_visible = true;
                self.notice = None;
            }
            Err(err) => {
                // The panel stays hidden with its previous text; the notice
                // is the user-visible trace of the failure.
                self.notice = Some(err.to_string());
            }
        }
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn panel_visible(&self) -> bool {
        self.panel_visible
    }

    /// The three display labels, whether or not the panel is visible.
    pub fn panel(&self) -> &Panel {
        &self.panel
    }

    /// Failure message from the most recent outcome, until the next trigger
    /// clears it.
    pub fn notice(&self) -> Option<&str> {
        self.notice.as_deref()
    }
}

fn render_panel(record: &WeatherRecord, units: Units) -> Panel {
    Panel {
        temperature: format!(
            "Temperature : {:.1} {}",
            record.main.temp,
            units.temperature_suffix()
        ),
        pressure: format!("Pressure : {}", record.main.pressure),
        humidity: format!("Humidity : {}", record.main.humidity),
    }
}
