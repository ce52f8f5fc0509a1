//! Weather panel - pick a predefined city, see its current weather.
//!
//! The library exposes the panel's modules for the binary and for testing.

pub mod action;
pub mod api;
pub mod components;
pub mod config;
pub mod effect;
pub mod error;
pub mod logging;
pub mod reducer;
pub mod state;
pub mod view;
