// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Configuration file loading with override support
//!
//! 3-tier loading:
//! 1. TOML file (base values)
//! 2. Environment variables (runtime overrides)
//! 3. CLI arguments (explicit user overrides)

use std::collections::HashMap;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use crate::{ConfigError, ConfigResult, LifnetConfig, SearchStrategy};

pub const CONFIG_FILE_NAME: &str = "lifnet_configuration.toml";

/// Find the lifnet configuration file
///
/// Search order:
/// 1. `LIFNET_CONFIG_PATH` environment variable
/// 2. Current working directory
/// 3. Up to 5 parent directories
///
/// # Errors
///
/// Returns `ConfigError::FileNotFound` if no config file is found in any location
pub fn find_config_file() -> ConfigResult<PathBuf> {
    if let Ok(env_path) = env::var("LIFNET_CONFIG_PATH") {
        let path = PathBuf::from(env_path);
        if path.exists() {
            return Ok(path);
        }
        return Err(ConfigError::FileNotFound(format!(
            "Config file specified by LIFNET_CONFIG_PATH not found: {}",
            path.display()
        )));
    }

    let mut search_paths = Vec::new();
    if let Ok(cwd) = env::current_dir() {
        search_paths.push(cwd.join(CONFIG_FILE_NAME));
        for ancestor in cwd.ancestors().skip(1).take(5) {
            search_paths.push(ancestor.join(CONFIG_FILE_NAME));
        }
    }

    if let Some(found) = search_paths.iter().find(|p| p.exists()) {
        return Ok(found.clone());
    }

    let search_list = search_paths
        .iter()
        .map(|p| format!("  - {}", p.display()))
        .collect::<Vec<_>>()
        .join("\n");

    Err(ConfigError::FileNotFound(format!(
        "'{}' not found in any of these locations:\n{}\n\nSet LIFNET_CONFIG_PATH to specify a custom location.",
        CONFIG_FILE_NAME, search_list
    )))
}

/// Load configuration from TOML file
///
/// # Arguments
///
/// * `config_path` - Optional path to config file. If `None`, will search for config file.
/// * `cli_args` - Optional CLI overrides keyed by `section.key`
///
/// # Errors
///
/// Returns error if the file is missing or unreadable, contains invalid TOML,
/// or a CLI override names an unknown key or carries an unparsable value
pub fn load_config(
    config_path: Option<&Path>,
    cli_args: Option<&HashMap<String, String>>,
) -> ConfigResult<LifnetConfig> {
    let config_file = match config_path {
        Some(path) => path.to_path_buf(),
        None => find_config_file()?,
    };

    let content = fs::read_to_string(&config_file)?;
    let mut config: LifnetConfig = toml::from_str(&content)?;

    apply_environment_overrides(&mut config);
    if let Some(cli) = cli_args {
        apply_cli_overrides(&mut config, cli)?;
    }

    Ok(config)
}

/// Apply environment variable overrides to configuration
///
/// Supported environment variables:
/// - `LIFNET_DT` -> `simulation.dt`
/// - `LIFNET_DURATION` -> `simulation.duration`
/// - `LIFNET_I_E` -> `neuron.i_e`
/// - `LIFNET_SEED` -> `pair.seed`
/// - `LIFNET_LOG_LEVEL` -> `logging.level`
///
/// Unparsable values are ignored.
pub fn apply_environment_overrides(config: &mut LifnetConfig) {
    if let Some(dt) = env_parse("LIFNET_DT") {
        config.simulation.dt = dt;
    }
    if let Some(duration) = env_parse("LIFNET_DURATION") {
        config.simulation.duration = duration;
    }
    if let Some(i_e) = env_parse("LIFNET_I_E") {
        config.neuron.i_e = i_e;
    }
    if let Some(seed) = env_parse("LIFNET_SEED") {
        config.pair.seed = seed;
    }
    if let Ok(level) = env::var("LIFNET_LOG_LEVEL") {
        config.logging.level = level;
    }
}

fn env_parse<T: FromStr>(name: &str) -> Option<T> {
    env::var(name).ok().and_then(|v| v.trim().parse().ok())
}

/// Apply CLI overrides to configuration
///
/// Keys use the TOML layout, e.g. `{"neuron.i_e": "2.9", "simulation.dt": "0.1"}`.
pub fn apply_cli_overrides(
    config: &mut LifnetConfig,
    cli_args: &HashMap<String, String>,
) -> ConfigResult<()> {
    for (key, value) in cli_args {
        apply_override(config, key, value)?;
    }
    Ok(())
}

fn apply_override(config: &mut LifnetConfig, key: &str, value: &str) -> ConfigResult<()> {
    match key {
        "neuron.t_m" => config.neuron.t_m = parse(key, value)?,
        "neuron.e_l" => config.neuron.e_l = parse(key, value)?,
        "neuron.v_reset" => config.neuron.v_reset = parse(key, value)?,
        "neuron.v_th" => config.neuron.v_th = parse(key, value)?,
        "neuron.r_m" => config.neuron.r_m = parse(key, value)?,
        "neuron.i_e" => config.neuron.i_e = parse(key, value)?,

        "synapse.g_s" => config.synapse.g_s = parse(key, value)?,
        "synapse.p_max" => config.synapse.p_max = parse(key, value)?,
        "synapse.t_s" => config.synapse.t_s = parse(key, value)?,
        "synapse.e_s" => config.synapse.e_s = parse(key, value)?,

        "simulation.dt" => config.simulation.dt = parse(key, value)?,
        "simulation.duration" => config.simulation.duration = parse(key, value)?,

        "threshold_search.strategy" => {
            config.threshold_search.strategy = match value.to_lowercase().as_str() {
                "linear" => SearchStrategy::Linear,
                "bisection" => SearchStrategy::Bisection,
                other => {
                    return Err(ConfigError::InvalidValue(format!(
                        "{key}: unknown strategy '{other}' (expected linear or bisection)"
                    )))
                }
            }
        }
        "threshold_search.start" => config.threshold_search.start = parse(key, value)?,
        "threshold_search.step" => config.threshold_search.step = parse(key, value)?,
        "threshold_search.low" => config.threshold_search.low = parse(key, value)?,
        "threshold_search.high" => config.threshold_search.high = parse(key, value)?,
        "threshold_search.tolerance" => config.threshold_search.tolerance = parse(key, value)?,

        "firing_rate.i_start" => config.firing_rate.i_start = parse(key, value)?,
        "firing_rate.i_stop" => config.firing_rate.i_stop = parse(key, value)?,
        "firing_rate.i_step" => config.firing_rate.i_step = parse(key, value)?,

        "pair.seed" => config.pair.seed = parse(key, value)?,

        "logging.level" => config.logging.level = value.to_string(),
        "logging.file_logging" => {
            config.logging.file_logging =
                value.eq_ignore_ascii_case("true") || value == "1" || value.eq_ignore_ascii_case("yes")
        }
        "logging.log_dir" => config.logging.log_dir = PathBuf::from(value),

        _ => {
            return Err(ConfigError::InvalidValue(format!(
                "unknown configuration key '{key}'"
            )))
        }
    }
    Ok(())
}

fn parse<T: FromStr>(key: &str, value: &str) -> ConfigResult<T> {
    value
        .trim()
        .parse()
        .map_err(|_| ConfigError::InvalidValue(format!("{key}: cannot parse '{value}'")))
}
