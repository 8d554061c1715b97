// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! # lifnet Configuration System
//!
//! Type-safe configuration for lifnet simulations:
//! - TOML file parsing (`lifnet_configuration.toml`)
//! - Environment variable overrides (`LIFNET_*`)
//! - CLI overrides (`section.key=value`)
//!
//! ## Usage
//!
//! ```rust,no_run
//! use lifnet_config::{load_config, validate_config};
//!
//! let config = load_config(None, None).expect("Failed to load config");
//! validate_config(&config).expect("Invalid config");
//! let params = config.lif_parameters().expect("Invalid neuron");
//! println!("I_e = {} nA", params.i_e);
//! ```
//!
//! Precedence, lowest to highest: built-in defaults, file, environment, CLI.

/// Crate version from Cargo.toml
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub mod loader;
pub mod types;
pub mod validation;

pub use loader::{apply_cli_overrides, apply_environment_overrides, find_config_file, load_config};
pub use types::*;
pub use validation::{validate_config, ConfigValidationError};

/// Configuration error types
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Config file not found. Searched: {0}")]
    FileNotFound(String),

    #[error("Failed to read config file: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Invalid TOML syntax: {0}")]
    ParseError(String),

    #[error("Validation failed: {0}")]
    ValidationError(String),

    #[error("Invalid configuration value: {0}")]
    InvalidValue(String),

    #[error(transparent)]
    Model(#[from] lifnet_neural::LifError),
}

impl From<toml::de::Error> for ConfigError {
    fn from(err: toml::de::Error) -> Self {
        ConfigError::ParseError(err.to_string())
    }
}

/// Result type for configuration operations
pub type ConfigResult<T> = Result<T, ConfigError>;
