//! Effects - side effects declared by the reducer

use crate::error::FetchError;

/// Side effects that can be triggered by actions
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    /// Fetch current weather for a coordinate, tagged with the selection it serves
    FetchWeather {
        request: u64,
        location: String,
        lat: f64,
        lon: f64,
    },
    /// Hand a failed fetch to the diagnostic log
    ReportFetchError { location: String, error: FetchError },
}
