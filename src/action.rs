//! Actions: user intents and async results

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::error::FetchError;
use crate::state::WeatherReading;

/// Application actions with automatic category inference
#[derive(tui_dispatch::Action, Clone, Debug, PartialEq, Serialize, Deserialize, JsonSchema)]
#[action(infer_categories)]
pub enum Action {
    // ===== Weather category =====
    /// Intent: fetch weather for the current selection (initial load, refresh)
    WeatherFetch,

    /// Result: request `request`, issued for `location`, decoded successfully
    WeatherDidLoad {
        request: u64,
        location: String,
        reading: WeatherReading,
    },

    /// Result: request `request`, issued for `location`, failed
    WeatherDidError {
        request: u64,
        location: String,
        error: FetchError,
    },

    // ===== Location category =====
    /// Select a location by name; unknown names select the fallback location
    LocationSelect(String),

    // ===== Display category =====
    /// Set the visibility of one metric, by metric identifier
    DisplayToggle { metric: String, visible: bool },

    // ===== Uncategorized (global) =====
    /// Exit the application
    Quit,
}
