// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! # lifnet-observability
//!
//! Logging setup shared by lifnet binaries, with per-crate debug flags.
//!
//! ## Features
//! - `file-logging`: JSON log file per run, next to the console output

/// Crate version from Cargo.toml
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub mod cli;
pub mod init;

pub use cli::*;
pub use init::*;

/// Known lifnet crate names for debug flags
pub const KNOWN_CRATES: &[&str] = &[
    "lifnet",
    "lifnet-neural",
    "lifnet-engine",
    "lifnet-config",
];
