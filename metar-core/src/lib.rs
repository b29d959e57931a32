//! Core library for the `metar` CLI.
//!
//! This crate defines:
//! - Request construction for the CheckWX decoded-METAR endpoint
//! - Strict decoding of the JSON response into station records
//! - Report formatting
//! - [`WeatherService`], which ties the above together and caches the last result
//!
//! It is used by `metar-cli`, but any front end can drive [`WeatherService`] directly.

pub mod config;
pub mod decode;
pub mod error;
pub mod model;
pub mod report;
pub mod request;
pub mod service;

pub use config::{Config, ServiceConfig};
pub use error::{ErrorKind, MetarError};
pub use model::{CloudLayer, QueryResult, StationRecord};
pub use report::Delimiter;
pub use service::{RequestHandle, WeatherService};
