//! Core library for the `cityweather` client.
//!
//! This crate defines:
//! - Configuration & credentials handling
//! - The weather provider abstraction and the OpenWeather implementation
//! - The query controller and its state machine
//! - Icon selection and the text card shown for a result
//!
//! It is used by `cityweather-cli`, but any presentation layer can drive the
//! controller through [`WeatherQueryController::view`].

pub mod card;
pub mod config;
pub mod controller;
pub mod error;
pub mod icon;
pub mod model;
pub mod provider;
pub mod state;

pub use card::WeatherCard;
pub use config::{Config, ProviderConfig, ProviderSettings};
pub use controller::WeatherQueryController;
pub use error::QueryError;
pub use icon::{ConditionCategory, WeatherIcon, icon_for};
pub use model::WeatherSnapshot;
pub use provider::{WeatherProvider, provider_from_config, provider_from_config_with};
pub use state::{QueryState, QueryStatus, QueryView};
