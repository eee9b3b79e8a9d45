//! Configuration management for the Trakt client
//!
//! This module handles loading and validating credentials, endpoints and
//! logging settings from files and the environment.

pub mod loader;
pub mod settings;

pub use loader::{ConfigLoader, default_config_path};
pub use settings::{LoggingSettings, NetworkSettings, Settings, TraktSettings};
