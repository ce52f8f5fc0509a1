//! Application state - single source of truth

use schemars::JsonSchema;
use serde::{Deserialize, Deserializer, Serialize};

use crate::error::RegistryError;

/// Current conditions decoded from the Open-Meteo `current` block
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct WeatherReading {
    /// Air temperature at 2 m, °C
    pub temperature: f64,
    /// Total precipitation, mm
    pub precipitation: f64,
    /// Rain only, mm
    pub rain: f64,
    pub weather_code: u8, // WMO weather code
    /// Cloud cover, percent
    pub cloud_cover: f64,
}

/// A named geographic location
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Location {
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
}

impl Location {
    pub fn new(name: impl Into<String>, latitude: f64, longitude: f64) -> Self {
        Self {
            name: name.into(),
            latitude,
            longitude,
        }
    }
}

// ============================================================================
// Location registry
// ============================================================================

/// Ordered, immutable set of selectable locations.
///
/// The first entry doubles as the fallback for names that are not registered.
#[derive(Clone, Debug, PartialEq, Serialize, JsonSchema)]
#[serde(transparent)]
pub struct LocationRegistry {
    locations: Vec<Location>,
}

impl LocationRegistry {
    pub fn new(locations: Vec<Location>) -> Result<Self, RegistryError> {
        if locations.is_empty() {
            return Err(RegistryError::Empty);
        }
        for (i, loc) in locations.iter().enumerate() {
            if locations[..i].iter().any(|other| other.name == loc.name) {
                return Err(RegistryError::DuplicateName(loc.name.clone()));
            }
        }
        Ok(Self { locations })
    }

    /// The predefined locations shipped with the panel
    pub fn builtin() -> Self {
        Self {
            locations: vec![
                Location::new("Madrid, Spain", 40.4165, -3.7026),
                Location::new("Lisbon, Portugal", 38.7167, -9.1333),
                Location::new("Paris, France", 48.8534, 2.3488),
                Location::new("Amsterdam, North Holand", 52.374, 4.8897),
            ],
        }
    }

    /// Exact-name lookup; unknown names resolve to the fallback location.
    pub fn lookup(&self, name: &str) -> &Location {
        self.get(name).unwrap_or_else(|| self.fallback())
    }

    pub fn get(&self, name: &str) -> Option<&Location> {
        self.locations.iter().find(|loc| loc.name == name)
    }

    pub fn fallback(&self) -> &Location {
        &self.locations[0]
    }

    pub fn position(&self, name: &str) -> Option<usize> {
        self.locations.iter().position(|loc| loc.name == name)
    }

    /// Entry `offset` steps away from `name`, wrapping around both ends.
    pub fn neighbour(&self, name: &str, offset: isize) -> &Location {
        let len = self.locations.len() as isize;
        let index = self.position(name).unwrap_or(0) as isize;
        let next = (index + offset).rem_euclid(len);
        &self.locations[next as usize]
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.locations.iter().map(|loc| loc.name.as_str())
    }

    pub fn locations(&self) -> &[Location] {
        &self.locations
    }

    pub fn len(&self) -> usize {
        self.locations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.locations.is_empty()
    }
}

impl Default for LocationRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}

impl<'de> Deserialize<'de> for LocationRegistry {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let locations = Vec::<Location>::deserialize(deserializer)?;
        Self::new(locations).map_err(serde::de::Error::custom)
    }
}

// ============================================================================
// Metrics and display preferences
// ============================================================================

/// The five metrics the panel can show
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub enum Metric {
    Temperature,
    Precipitation,
    Rain,
    WeatherCode,
    CloudCover,
}

impl Metric {
    pub const ALL: [Metric; 5] = [
        Metric::Temperature,
        Metric::Precipitation,
        Metric::Rain,
        Metric::WeatherCode,
        Metric::CloudCover,
    ];

    /// Identifier used by toggle actions
    pub fn id(self) -> &'static str {
        match self {
            Metric::Temperature => "temperature",
            Metric::Precipitation => "precipitation",
            Metric::Rain => "rain",
            Metric::WeatherCode => "weatherCode",
            Metric::CloudCover => "cloudCover",
        }
    }

    pub fn from_id(id: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|metric| metric.id() == id)
    }

    pub fn label(self) -> &'static str {
        match self {
            Metric::Temperature => "Temperatura",
            Metric::Precipitation => "Precipitacion",
            Metric::Rain => "Lluvia",
            Metric::WeatherCode => "Weather Code",
            Metric::CloudCover => "Nuves",
        }
    }

    pub fn unit(self) -> &'static str {
        match self {
            Metric::Temperature => "°C",
            Metric::Precipitation | Metric::Rain => "mm",
            Metric::WeatherCode => "",
            Metric::CloudCover => "%",
        }
    }

    /// Key that toggles this metric (`1`..`5`)
    pub fn hotkey(self) -> char {
        match self {
            Metric::Temperature => '1',
            Metric::Precipitation => '2',
            Metric::Rain => '3',
            Metric::WeatherCode => '4',
            Metric::CloudCover => '5',
        }
    }

    pub fn from_hotkey(key: char) -> Option<Self> {
        Self::ALL.into_iter().find(|metric| metric.hotkey() == key)
    }

    /// Value with its unit suffix, e.g. `15°C` or `90%`
    pub fn format_value(self, reading: &WeatherReading) -> String {
        let value = match self {
            Metric::Temperature => format_number(reading.temperature),
            Metric::Precipitation => format_number(reading.precipitation),
            Metric::Rain => format_number(reading.rain),
            Metric::WeatherCode => reading.weather_code.to_string(),
            Metric::CloudCover => format_number(reading.cloud_cover),
        };
        format!("{}{}", value, self.unit())
    }
}

/// Shortest form, with `-0` shown as `0`
fn format_number(value: f64) -> String {
    let value = if value == 0.0 { 0.0 } else { value };
    value.to_string()
}

/// Per-metric visibility flags
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct DisplayPreferences {
    pub temperature: bool,
    pub precipitation: bool,
    pub rain: bool,
    pub weather_code: bool,
    pub cloud_cover: bool,
}

impl DisplayPreferences {
    pub fn is_visible(&self, metric: Metric) -> bool {
        match metric {
            Metric::Temperature => self.temperature,
            Metric::Precipitation => self.precipitation,
            Metric::Rain => self.rain,
            Metric::WeatherCode => self.weather_code,
            Metric::CloudCover => self.cloud_cover,
        }
    }

    pub fn set(&mut self, metric: Metric, visible: bool) {
        let flag = match metric {
            Metric::Temperature => &mut self.temperature,
            Metric::Precipitation => &mut self.precipitation,
            Metric::Rain => &mut self.rain,
            Metric::WeatherCode => &mut self.weather_code,
            Metric::CloudCover => &mut self.cloud_cover,
        };
        *flag = visible;
    }

    pub fn visible(&self) -> impl Iterator<Item = Metric> + '_ {
        Metric::ALL
            .into_iter()
            .filter(move |metric| self.is_visible(*metric))
    }
}

impl Default for DisplayPreferences {
    fn default() -> Self {
        Self {
            temperature: true,
            precipitation: true,
            rain: false,
            weather_code: false,
            cloud_cover: false,
        }
    }
}

// ============================================================================
// Fetch bookkeeping
// ============================================================================

/// What to do with a response that arrives after the selection moved on
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema, clap::ValueEnum,
)]
#[serde(rename_all = "snake_case")]
pub enum StaleResponsePolicy {
    /// Whichever response arrives last replaces the reading
    #[default]
    #[value(name = "last-wins")]
    LastResponseWins,
    /// Drop responses issued for a location that is no longer selected
    #[value(name = "latest-selection")]
    LatestSelectionOnly,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub enum FetchPhase {
    #[default]
    Idle,
    /// Waiting on the latest request issued for the current selection
    InFlight { request: u64 },
}

impl FetchPhase {
    pub fn is_in_flight(&self) -> bool {
        matches!(self, FetchPhase::InFlight { .. })
    }
}

/// Application state - everything the UI needs to render
#[derive(Clone, Debug, tui_dispatch::DebugState, Serialize, JsonSchema)]
#[serde(default)]
pub struct AppState {
    #[debug(section = "Location", label = "Selected", debug_fmt)]
    pub selection: Location,

    /// Last accepted reading, zeroed until the first response
    #[debug(section = "Weather", label = "Reading", debug_fmt)]
    pub reading: WeatherReading,

    #[debug(section = "Weather", label = "Phase", debug_fmt)]
    pub phase: FetchPhase,

    #[debug(section = "Weather", label = "Stale responses", debug_fmt)]
    pub stale_policy: StaleResponsePolicy,

    #[debug(section = "Display", label = "Visible", debug_fmt)]
    pub preferences: DisplayPreferences,

    #[debug(skip)]
    pub registry: LocationRegistry,

    /// Sequence number handed to the next fetch
    #[debug(skip)]
    pub next_request: u64,
}

impl AppState {
    /// Create state selecting the registry's fallback location
    pub fn new(registry: LocationRegistry) -> Self {
        let selection = registry.fallback().clone();
        Self {
            selection,
            reading: WeatherReading::default(),
            phase: FetchPhase::Idle,
            stale_policy: StaleResponsePolicy::default(),
            preferences: DisplayPreferences::default(),
            registry,
            next_request: 0,
        }
    }

    /// Start on `name` instead (registry fallback applies)
    pub fn with_location(mut self, name: &str) -> Self {
        self.selection = self.registry.lookup(name).clone();
        self
    }

    pub fn with_stale_policy(mut self, policy: StaleResponsePolicy) -> Self {
        self.stale_policy = policy;
        self
    }

    pub fn current_location(&self) -> &Location {
        &self.selection
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new(LocationRegistry::builtin())
    }
}

/// Restored snapshot fields, before the selection is checked against the registry
#[derive(Deserialize)]
#[serde(default)]
struct AppStateSnapshot {
    selection: Option<Location>,
    reading: WeatherReading,
    phase: FetchPhase,
    stale_policy: StaleResponsePolicy,
    preferences: DisplayPreferences,
    registry: LocationRegistry,
    next_request: u64,
}

impl Default for AppStateSnapshot {
    fn default() -> Self {
        let state = AppState::default();
        Self {
            selection: None,
            reading: state.reading,
            phase: state.phase,
            stale_policy: state.stale_policy,
            preferences: state.preferences,
            registry: state.registry,
            next_request: state.next_request,
        }
    }
}

impl<'de> Deserialize<'de> for AppState {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let snapshot = AppStateSnapshot::deserialize(deserializer)?;
        let mut state = AppState::new(snapshot.registry);
        // The registry's copy (or the fallback) wins over the stored selection
        if let Some(selection) = snapshot.selection {
            state = state.with_location(&selection.name);
        }
        state.reading = snapshot.reading;
        state.phase = snapshot.phase;
        state.stale_policy = snapshot.stale_policy;
        state.preferences = snapshot.preferences;
        state.next_request = snapshot.next_request;
        Ok(state)
    }
}
