//! Reducer - pure function: (state, action) -> DispatchResult

use tui_dispatch::DispatchResult;

use crate::action::Action;
use crate::effect::Effect;
use crate::state::{AppState, FetchPhase, Metric, StaleResponsePolicy};

/// The reducer handles all state transitions
pub fn reducer(state: &mut AppState, action: Action) -> DispatchResult<Effect> {
    match action {
        // ===== Weather actions =====
        Action::WeatherFetch => DispatchResult::changed_with(begin_fetch(state)),

        Action::WeatherDidLoad {
            request,
            location,
            reading,
        } => {
            let settled = settle(state, request);
            if is_stale(state, &location) {
                return if settled {
                    DispatchResult::changed()
                } else {
                    DispatchResult::unchanged()
                };
            }
            // Whole-slice replacement, even when the response is for an older selection
            state.reading = reading;
            DispatchResult::changed()
        }

        Action::WeatherDidError {
            request,
            location,
            error,
        } => {
            settle(state, request);
            DispatchResult::changed_with(Effect::ReportFetchError { location, error })
        }

        // ===== Location actions =====
        Action::LocationSelect(name) => {
            let location = state.registry.lookup(&name);
            if location.name == state.selection.name {
                return DispatchResult::unchanged();
            }
            state.selection = location.clone();
            DispatchResult::changed_with(begin_fetch(state))
        }

        // ===== Display actions =====
        Action::DisplayToggle { metric, visible } => {
            let Some(metric) = Metric::from_id(&metric) else {
                return DispatchResult::unchanged();
            };
            if state.preferences.is_visible(metric) == visible {
                return DispatchResult::unchanged();
            }
            state.preferences.set(metric, visible);
            DispatchResult::changed()
        }

        // ===== Global actions =====
        Action::Quit => DispatchResult::unchanged(),
    }
}

/// Issue a new request for the current selection and wait on it
fn begin_fetch(state: &mut AppState) -> Effect {
    let request = state.next_request;
    state.next_request = state.next_request.wrapping_add(1);
    state.phase = FetchPhase::InFlight { request };
    let loc = state.current_location();
    Effect::FetchWeather {
        request,
        location: loc.name.clone(),
        lat: loc.latitude,
        lon: loc.longitude,
    }
}

/// Back to idle if `request` is the one being waited on. Returns whether it was.
fn settle(state: &mut AppState, request: u64) -> bool {
    if state.phase == (FetchPhase::InFlight { request }) {
        state.phase = FetchPhase::Idle;
        true
    } else {
        false
    }
}

fn is_stale(state: &AppState, location: &str) -> bool {
    match state.stale_policy {
        StaleResponsePolicy::LastResponseWins => false,
        StaleResponsePolicy::LatestSelectionOnly => location != state.selection.name,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::FetchError;
    use crate::state::WeatherReading;

    fn reading(temperature: f64) -> WeatherReading {
        WeatherReading {
            temperature,
            ..Default::default()
        }
    }

    #[test]
    fn test_weather_fetch_targets_current_selection() {
        let mut state = AppState::default();
        assert_eq!(state.phase, FetchPhase::Idle);

        let result = reducer(&mut state, Action::WeatherFetch);

        assert!(result.changed);
        assert_eq!(state.phase, FetchPhase::InFlight { request: 0 });
        assert_eq!(state.next_request, 1);
        assert_eq!(
            result.effects,
            vec![Effect::FetchWeather {
                request: 0,
                location: "Madrid, Spain".into(),
                lat: 40.4165,
                lon: -3.7026,
            }]
        );
    }

    #[test]
    fn test_select_new_location_fetches_once() {
        let mut state = AppState::default();

        let result = reducer(&mut state, Action::LocationSelect("Paris, France".into()));

        assert!(result.changed);
        assert_eq!(state.selection.name, "Paris, France");
        assert_eq!(result.effects.len(), 1);
        assert!(matches!(
            &result.effects[0],
            Effect::FetchWeather { location, .. } if location == "Paris, France"
        ));
    }

    #[test]
    fn test_reselect_is_noop() {
        let mut state = AppState::default();

        let result = reducer(&mut state, Action::LocationSelect("Madrid, Spain".into()));

        assert!(!result.changed);
        assert!(result.effects.is_empty());
        assert_eq!(state.phase, FetchPhase::Idle);
        assert_eq!(state.next_request, 0);
    }

    #[test]
    fn test_unknown_location_falls_back() {
        let mut state = AppState::default().with_location("Paris, France");

        let result = reducer(&mut state, Action::LocationSelect("Gotham".into()));

        assert!(result.changed);
        assert_eq!(state.selection.name, "Madrid, Spain");
        assert_eq!(result.effects.len(), 1);
    }

    #[test]
    fn test_load_settles_matching_request() {
        let mut state = AppState::default();
        reducer(&mut state, Action::WeatherFetch);

        let result = reducer(
            &mut state,
            Action::WeatherDidLoad {
                request: 0,
                location: "Madrid, Spain".into(),
                reading: reading(30.0),
            },
        );

        assert!(result.changed);
        assert!(result.effects.is_empty());
        assert_eq!(state.phase, FetchPhase::Idle);
        assert_eq!(state.reading.temperature, 30.0);
    }

    #[test]
    fn test_error_keeps_reading_and_reports_once() {
        let mut state = AppState {
            reading: reading(12.0),
            ..Default::default()
        };
        reducer(&mut state, Action::WeatherFetch);
        let before = state.reading.clone();

        let error = FetchError::Request("connection refused".into());
        let result = reducer(
            &mut state,
            Action::WeatherDidError {
                request: 0,
                location: "Madrid, Spain".into(),
                error: error.clone(),
            },
        );

        assert_eq!(state.reading, before);
        assert_eq!(state.phase, FetchPhase::Idle);
        assert_eq!(
            result.effects,
            vec![Effect::ReportFetchError {
                location: "Madrid, Spain".into(),
                error,
            }]
        );
    }

    #[test]
    fn test_stale_response_wins_by_default() {
        let mut state = AppState::default();
        reducer(&mut state, Action::LocationSelect("Lisbon, Portugal".into()));
        reducer(&mut state, Action::LocationSelect("Paris, France".into()));
        assert_eq!(state.phase, FetchPhase::InFlight { request: 1 });

        reducer(
            &mut state,
            Action::WeatherDidLoad {
                request: 1,
                location: "Paris, France".into(),
                reading: reading(18.0),
            },
        );
        assert_eq!(state.phase, FetchPhase::Idle);

        let result = reducer(
            &mut state,
            Action::WeatherDidLoad {
                request: 0,
                location: "Lisbon, Portugal".into(),
                reading: reading(25.0),
            },
        );

        assert!(result.changed);
        assert_eq!(state.selection.name, "Paris, France");
        assert_eq!(state.reading.temperature, 25.0);
        assert_eq!(state.phase, FetchPhase::Idle);
    }

    #[test]
    fn test_stale_response_dropped_with_latest_selection_policy() {
        let mut state =
            AppState::default().with_stale_policy(StaleResponsePolicy::LatestSelectionOnly);
        reducer(&mut state, Action::LocationSelect("Lisbon, Portugal".into()));
        reducer(&mut state, Action::LocationSelect("Paris, France".into()));

        reducer(
            &mut state,
            Action::WeatherDidLoad {
                request: 1,
                location: "Paris, France".into(),
                reading: reading(18.0),
            },
        );
        let result = reducer(
            &mut state,
            Action::WeatherDidLoad {
                request: 0,
                location: "Lisbon, Portugal".into(),
                reading: reading(25.0),
            },
        );

        assert!(!result.changed);
        assert_eq!(state.reading.temperature, 18.0);
    }

    #[test]
    fn test_toggle_changes_only_one_flag() {
        let mut state = AppState::default();
        let before = state.preferences;

        let result = reducer(
            &mut state,
            Action::DisplayToggle {
                metric: "cloudCover".into(),
                visible: true,
            },
        );

        assert!(result.changed);
        for metric in Metric::ALL {
            if metric == Metric::CloudCover {
                assert!(state.preferences.is_visible(metric));
            } else {
                assert_eq!(
                    state.preferences.is_visible(metric),
                    before.is_visible(metric)
                );
            }
        }
    }

    #[test]
    fn test_toggle_unknown_metric_ignored() {
        let mut state = AppState::default();
        let before = state.preferences;

        let result = reducer(
            &mut state,
            Action::DisplayToggle {
                metric: "humidity".into(),
                visible: true,
            },
        );

        assert!(!result.changed);
        assert_eq!(state.preferences, before);
    }

    #[test]
    fn test_toggle_to_same_value_unchanged() {
        let mut state = AppState::default();
        let result = reducer(
            &mut state,
            Action::DisplayToggle {
                metric: "temperature".into(),
                visible: true,
            },
        );
        assert!(!result.changed);
    }
}
