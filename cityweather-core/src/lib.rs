//! Core library for the `cityweather` CLI.
//!
//! This crate defines:
//! - The builtin city catalog and autocomplete matching
//! - WMO weather code classification (descriptions, icons, themes)
//! - The Open-Meteo lookup behind the `WeatherProvider` trait
//! - A controller that owns the lookup state shown to the user
//!
//! It is used by `cityweather-cli`, but can also be driven by other front ends.

pub mod catalog;
pub mod classify;
pub mod config;
pub mod controller;
pub mod error;
pub mod matcher;
pub mod model;
pub mod provider;

pub use catalog::{CatalogError, CityDirectory, Location};
pub use classify::{Icon, Theme, WeatherBucket, background_for, describe, describe_in, icon_for};
pub use config::Config;
pub use controller::{ViewState, WeatherController};
pub use error::LookupError;
pub use matcher::{DEFAULT_SUGGESTION_LIMIT, suggest};
pub use model::{Language, WeatherRecord};
pub use provider::{WeatherProvider, openmeteo::OpenMeteoProvider};
