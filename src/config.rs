//! Command-line configuration

use std::path::PathBuf;

use clap::Parser;
use tui_dispatch_debug::DebugCliArgs;

use crate::api::{DEFAULT_API_BASE, WeatherClient};
use crate::state::{AppState, LocationRegistry, StaleResponsePolicy};

const LOG_FILE_NAME: &str = "weather-panel.log";

/// Weather panel - current conditions for a few predefined cities
#[derive(Parser, Debug)]
#[command(name = "weather-panel")]
#[command(about = "Current weather for a handful of predefined cities (Open-Meteo)")]
pub struct Args {
    /// Location selected at start-up; unknown names fall back to the first one
    #[arg(long, default_value = "Madrid, Spain")]
    pub location: String,

    /// Forecast API base URL
    #[arg(long, default_value = DEFAULT_API_BASE)]
    pub api_base: String,

    /// What to do with a response that arrives after the selection changed
    #[arg(long, value_enum, default_value_t = StaleResponsePolicy::LastResponseWins)]
    pub stale_responses: StaleResponsePolicy,

    /// Diagnostic log file [default: $TMPDIR/weather-panel.log]
    #[arg(long)]
    pub log_file: Option<PathBuf>,

    #[command(flatten)]
    pub debug: DebugCliArgs,
}

/// Runtime settings, split off from the debug-session flags
#[derive(Clone, Debug, PartialEq)]
pub struct PanelConfig {
    pub location: String,
    pub api_base: String,
    pub stale_responses: StaleResponsePolicy,
    pub log_file: PathBuf,
}

impl Args {
    pub fn into_parts(self) -> (PanelConfig, DebugCliArgs) {
        let config = PanelConfig {
            location: self.location,
            api_base: self.api_base,
            stale_responses: self.stale_responses,
            log_file: self
                .log_file
                .unwrap_or_else(|| std::env::temp_dir().join(LOG_FILE_NAME)),
        };
        (config, self.debug)
    }
}

impl PanelConfig {
    pub fn initial_state(&self) -> AppState {
        AppState::new(LocationRegistry::builtin())
            .with_location(&self.location)
            .with_stale_policy(self.stale_responses)
    }

    pub fn client(&self) -> WeatherClient {
        WeatherClient::new(self.api_base.as_str())
    }
}
