// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! End-to-end runs driven by `lifnet_configuration.toml` files

use std::collections::HashMap;
use std::fs;

use lifnet::config::{load_config, validate_config, LifnetConfig, SearchStrategy};
use lifnet::engine::count_spikes;
use lifnet::prelude::*;
use rand::rngs::StdRng;
use rand::SeedableRng;
use tempfile::TempDir;

fn write_config(contents: &str) -> (TempDir, std::path::PathBuf) {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("lifnet_configuration.toml");
    fs::write(&path, contents).unwrap();
    (dir, path)
}

fn toml_from_repo() -> LifnetConfig {
    let path = std::path::Path::new(env!("CARGO_MANIFEST_DIR")).join("lifnet_configuration.toml");
    load_config(Some(&path), None).unwrap()
}

#[test]
fn test_shipped_configuration_is_valid() {
    let config = toml_from_repo();
    validate_config(&config).unwrap();
    assert_eq!(config, LifnetConfig::default());
}

#[test]
fn test_subthreshold_current_from_file_stays_silent() {
    let (_dir, path) = write_config(
        r#"
        [neuron]
        i_e = 2.9
        "#,
    );
    let config = load_config(Some(&path), None).unwrap();
    validate_config(&config).unwrap();

    let spikes = count_spikes(&config.lif_parameters().unwrap(), &config.run_window().unwrap()).unwrap();
    assert_eq!(spikes, 0);
}

#[test]
fn test_cli_override_beats_file() {
    let (_dir, path) = write_config(
        r#"
        [neuron]
        i_e = 2.9
        "#,
    );
    let mut cli = HashMap::new();
    cli.insert("neuron.i_e".to_string(), "3.1".to_string());
    let config = load_config(Some(&path), Some(&cli)).unwrap();

    let spikes = count_spikes(&config.lif_parameters().unwrap(), &config.run_window().unwrap()).unwrap();
    assert_eq!(spikes, 30);
}

#[test]
fn test_bisection_threshold_from_config() {
    let (_dir, path) = write_config(
        r#"
        [threshold_search]
        strategy = "bisection"
        low = 0.0
        high = 5.0
        tolerance = 0.0001
        "#,
    );
    let config = load_config(Some(&path), None).unwrap();
    assert_eq!(config.threshold_search.strategy, SearchStrategy::Bisection);

    let estimate = find_threshold_current(
        &config.lif_parameters().unwrap(),
        &config.run_window().unwrap(),
        config.threshold_search(),
    )
    .unwrap();
    assert!((estimate.analytic - 3.0).abs() < 1e-12);
    assert!(estimate.error().abs() <= 2e-4, "error {}", estimate.error());
    assert!(estimate.numeric - estimate.silent <= 1e-4);
}

#[test]
fn test_linear_threshold_from_defaults() {
    let config = LifnetConfig::default();
    let estimate = find_threshold_current(
        &config.lif_parameters().unwrap(),
        &config.run_window().unwrap(),
        config.threshold_search(),
    )
    .unwrap();
    // one step of 0.01 nA above the analytic value
    assert!(estimate.error() > 0.0);
    assert!(estimate.error() < 0.011);
}

#[test]
fn test_firing_rate_curve_from_config() {
    let config = LifnetConfig::default();
    let currents = config.firing_rate_currents().unwrap();
    assert_eq!(currents.len(), 31);

    let curve = firing_rate_curve(
        &config.lif_parameters().unwrap(),
        &currents,
        &config.run_window().unwrap(),
    )
    .unwrap();

    for point in curve.iter().filter(|p| p.i_e < 2.95) {
        assert_eq!(point.spike_count, 0, "{} nA should be silent", point.i_e);
    }
    for pair in curve.windows(2) {
        assert!(pair[1].spike_count >= pair[0].spike_count);
    }
    let last = curve.last().unwrap();
    assert!(last.spike_count > 100);
    assert!((last.rate_hz - last.spike_count as f64).abs() < 1e-9);
}

#[test]
fn test_pair_with_fixed_potentials_and_no_coupling() {
    let (_dir, path) = write_config(
        r#"
        [synapse]
        g_s = 0.0

        [pair]
        initial_potentials = [-70.0, -70.0]
        "#,
    );
    let config = load_config(Some(&path), None).unwrap();
    let [v_a, v_b] = config.pair.initial_potentials.unwrap();
    let outcome = config.paired_experiment().unwrap().run(v_a, v_b).unwrap();
    assert_eq!(outcome.spike_counts, [30, 30]);
}

#[test]
fn test_seeded_pair_is_reproducible() {
    let config = LifnetConfig::default();
    let experiment = config.paired_experiment().unwrap();

    let first = experiment
        .run_random(&mut StdRng::seed_from_u64(config.pair.seed))
        .unwrap();
    let second = experiment
        .run_random(&mut StdRng::seed_from_u64(config.pair.seed))
        .unwrap();
    assert_eq!(first, second);

    let params = config.lif_parameters().unwrap();
    for v in first.initial {
        assert!(v >= params.v_reset && v < params.v_th);
    }
}

#[test]
fn test_invalid_file_is_reported_by_validation() {
    let (_dir, path) = write_config(
        r#"
        [neuron]
        v_th = -80.0

        [simulation]
        dt = 0.0
        "#,
    );
    let config = load_config(Some(&path), None).unwrap();
    let err = validate_config(&config).unwrap_err().to_string();
    assert!(err.contains("neuron"), "{err}");
    assert!(err.contains("dt"), "{err}");
}
