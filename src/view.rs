//! Derived view: what the panel shows for a given state.
//!
//! Pure and cheap, so components re-derive it on every render.

use crate::state::{AppState, Metric};

pub const TITLE: &str = "Tiempo";
pub const SELECTOR_PROMPT: &str = "Que ciudad quieres ver?:";
pub const TOGGLES_PROMPT: &str = "Que quieres ver?:";
pub const READOUT_HEADING: &str = "Tiempo actual:";

#[derive(Clone, Debug, PartialEq)]
pub struct SelectorOption {
    pub name: String,
    pub selected: bool,
}

#[derive(Clone, Debug, PartialEq)]
pub struct ToggleControl {
    pub metric: Metric,
    pub label: &'static str,
    pub checked: bool,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Readout {
    pub metric: Metric,
    pub label: &'static str,
    pub value: String,
}

impl Readout {
    /// `Temperatura: 15°C`
    pub fn text(&self) -> String {
        format!("{}: {}", self.label, self.value)
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct PanelView {
    pub selector: Vec<SelectorOption>,
    pub toggles: Vec<ToggleControl>,
    /// One entry per visible metric, in metric order
    pub readouts: Vec<Readout>,
}

impl PanelView {
    pub fn derive(state: &AppState) -> Self {
        let selector = state
            .registry
            .names()
            .map(|name| SelectorOption {
                name: name.to_string(),
                selected: name == state.selection.name,
            })
            .collect();

        let toggles = Metric::ALL
            .into_iter()
            .map(|metric| ToggleControl {
                metric,
                label: metric.label(),
                checked: state.preferences.is_visible(metric),
            })
            .collect();

        let readouts = state
            .preferences
            .visible()
            .map(|metric| Readout {
                metric,
                label: metric.label(),
                value: metric.format_value(&state.reading),
            })
            .collect();

        Self {
            selector,
            toggles,
            readouts,
        }
    }

    pub fn selected_index(&self) -> Option<usize> {
        self.selector.iter().position(|option| option.selected)
    }
}
