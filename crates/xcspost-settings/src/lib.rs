//! xcspost Settings Crate
//!
//! Loads, validates and saves the post processor configuration.

pub mod config;
pub mod error;

pub use config::{Config, OutputSettings, PostConfig, MAX_PRECISION};
pub use error::{SettingsError, SettingsResult};
