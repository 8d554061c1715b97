// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! CLI argument parsing for per-crate debug flags
//!
//! Supports flags like `--debug-lifnet-engine` to raise one crate to `debug`.

use std::collections::BTreeSet;
use std::env;

use crate::KNOWN_CRATES;

/// Crates whose logging is raised to `debug`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CrateDebugFlags {
    pub enabled_crates: BTreeSet<String>,
}

impl CrateDebugFlags {
    /// Parse debug flags from command-line arguments
    ///
    /// Looks for arguments matching `--debug-{crate-name}`; `--debug-all`
    /// enables every known crate.
    pub fn from_args<I>(args: I) -> Self
    where
        I: IntoIterator<Item = String>,
    {
        let mut flags = CrateDebugFlags::default();
        for arg in args {
            if arg == "--debug-all" {
                flags.enable_all();
            } else if let Some(crate_name) = arg.strip_prefix("--debug-") {
                flags.enabled_crates.insert(crate_name.to_string());
            }
        }
        flags
    }

    pub fn enable_all(&mut self) {
        self.enabled_crates
            .extend(KNOWN_CRATES.iter().map(|c| c.to_string()));
    }

    pub fn is_enabled(&self, crate_name: &str) -> bool {
        self.enabled_crates.contains(crate_name)
    }

    pub fn any_enabled(&self) -> bool {
        !self.enabled_crates.is_empty()
    }

    /// Returns `tracing::Level::DEBUG` if enabled, `tracing::Level::INFO` otherwise.
    pub fn log_level(&self, crate_name: &str) -> tracing::Level {
        if self.is_enabled(crate_name) {
            tracing::Level::DEBUG
        } else {
            tracing::Level::INFO
        }
    }

    /// `EnvFilter` directive string, e.g. `"lifnet_engine=debug,warn"`.
    ///
    /// Crate names are turned into module targets (`-` becomes `_`).
    pub fn to_filter_string(&self, default_level: &str) -> String {
        let mut filters: Vec<String> = self
            .enabled_crates
            .iter()
            .map(|name| format!("{}=debug", name.replace('-', "_")))
            .collect();
        filters.push(default_level.to_string());
        filters.join(",")
    }
}

/// Debug flags from the process arguments plus the `LIFNET_DEBUG` environment variable
///
/// `LIFNET_DEBUG` is a comma-separated crate list, or `all`.
pub fn parse_debug_flags() -> CrateDebugFlags {
    let mut flags = CrateDebugFlags::from_args(env::args());
    if let Ok(env_var) = env::var("LIFNET_DEBUG") {
        merge_env_flags(&mut flags, &env_var);
    }
    flags
}

fn merge_env_flags(flags: &mut CrateDebugFlags, env_var: &str) {
    if env_var.trim() == "all" {
        flags.enable_all();
        return;
    }
    for crate_name in env_var.split(',').map(str::trim).filter(|c| !c.is_empty()) {
        flags.enabled_crates.insert(crate_name.to_string());
    }
}

/// Generate help text for debug flags
pub fn debug_flags_help() -> String {
    format!(
        r#"Debug Flags:
  --debug-all                    Enable debug logging for all crates
  --debug-{{crate-name}}          Enable debug logging for specific crate

Available crates:
  {}

Environment Variable:
  LIFNET_DEBUG={{crate-name}}[,{{crate-name}}]  Enable debug for crates (comma-separated)
  LIFNET_DEBUG=all                               Enable debug for all crates
"#,
        KNOWN_CRATES.join(", ")
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_crate_flag() {
        let flags = CrateDebugFlags::from_args(vec!["--debug-lifnet-engine".to_string()]);
        assert!(flags.is_enabled("lifnet-engine"));
        assert!(!flags.is_enabled("lifnet-neural"));
    }

    #[test]
    fn test_debug_all() {
        let flags = CrateDebugFlags::from_args(vec!["--debug-all".to_string()]);
        for crate_name in KNOWN_CRATES {
            assert!(flags.is_enabled(crate_name), "{} should be enabled", crate_name);
        }
    }

    #[test]
    fn test_filter_string_uses_module_targets() {
        let flags = CrateDebugFlags::from_args(vec!["--debug-lifnet-engine".to_string()]);
        assert_eq!(flags.to_filter_string("warn"), "lifnet_engine=debug,warn");
        assert_eq!(CrateDebugFlags::default().to_filter_string("info"), "info");
    }

    #[test]
    fn test_log_level() {
        let flags = CrateDebugFlags::from_args(vec!["--debug-lifnet-neural".to_string()]);
        assert_eq!(flags.log_level("lifnet-neural"), tracing::Level::DEBUG);
        assert_eq!(flags.log_level("lifnet-engine"), tracing::Level::INFO);
    }

    #[test]
    fn test_env_flags() {
        let mut flags = CrateDebugFlags::default();
        merge_env_flags(&mut flags, " lifnet-config , ,lifnet");
        assert!(flags.is_enabled("lifnet-config"));
        assert!(flags.is_enabled("lifnet"));
        assert_eq!(flags.enabled_crates.len(), 2);

        let mut all = CrateDebugFlags::default();
        merge_env_flags(&mut all, "all");
        assert_eq!(all.enabled_crates.len(), KNOWN_CRATES.len());
    }
}
