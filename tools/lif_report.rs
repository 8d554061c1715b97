// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Run one lifnet experiment from configuration and print the results.
//!
//! Modes:
//! - `trace`: membrane potential of a lone current-driven neuron, one line per step
//! - `threshold`: numeric vs analytic threshold current
//! - `rates`: spike count and firing rate over the configured current range
//! - `pair`: two reciprocally connected neurons, seeded or fixed initial potentials

use std::collections::HashMap;
use std::env;
use std::path::PathBuf;
use std::process;

use anyhow::{bail, Context, Result};
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde_json::json;
use tracing::info;

use lifnet::config::{load_config, validate_config, LifnetConfig};
use lifnet::engine::{
    find_threshold_current, firing_rate_curve, ExcitationMode, Network, Simulation,
};
use lifnet::neural::Neuron;
use lifnet::observability::{debug_flags_help, init_logging, parse_debug_flags, LoggingOptions};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    Trace,
    Threshold,
    Rates,
    Pair,
}

struct Args {
    mode: Mode,
    config_path: Option<PathBuf>,
    overrides: HashMap<String, String>,
    json: bool,
}

fn usage_and_exit() -> ! {
    eprintln!(
        "Usage: lif_report <trace|threshold|rates|pair> [--config <path>] [--set <section.key>=<value>]... [--json]\n\n\
         Without --config, lifnet_configuration.toml is searched for (see LIFNET_CONFIG_PATH);\n\
         built-in defaults are used when none is found.\n\n{}",
        debug_flags_help()
    );
    process::exit(2);
}

fn parse_args() -> Args {
    let mut mode = None;
    let mut config_path = None;
    let mut overrides = HashMap::new();
    let mut json = false;

    let mut args = env::args().skip(1);
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "trace" => mode = Some(Mode::Trace),
            "threshold" => mode = Some(Mode::Threshold),
            "rates" => mode = Some(Mode::Rates),
            "pair" => mode = Some(Mode::Pair),
            "--config" => {
                let v = args.next().unwrap_or_else(|| usage_and_exit());
                config_path = Some(PathBuf::from(v));
            }
            "--set" => {
                let v = args.next().unwrap_or_else(|| usage_and_exit());
                let Some((key, value)) = v.split_once('=') else {
                    eprintln!("Expected <section.key>=<value>, got: {v}");
                    usage_and_exit();
                };
                overrides.insert(key.trim().to_string(), value.trim().to_string());
            }
            "--json" => json = true,
            "-h" | "--help" => usage_and_exit(),
            // consumed by parse_debug_flags
            other if other.starts_with("--debug-") => {}
            other => {
                eprintln!("Unknown argument: {other}");
                usage_and_exit();
            }
        }
    }

    let Some(mode) = mode else {
        eprintln!("Missing mode");
        usage_and_exit();
    };
    Args {
        mode,
        config_path,
        overrides,
        json,
    }
}

fn load(args: &Args) -> Result<LifnetConfig> {
    let explicit = args.config_path.is_some() || env::var_os("LIFNET_CONFIG_PATH").is_some();
    let config = match load_config(args.config_path.as_deref(), Some(&args.overrides)) {
        Ok(config) => config,
        Err(lifnet::config::ConfigError::FileNotFound(_)) if !explicit => {
            let mut config = LifnetConfig::default();
            lifnet::config::apply_environment_overrides(&mut config);
            lifnet::config::apply_cli_overrides(&mut config, &args.overrides)?;
            config
        }
        Err(e) => return Err(e).context("Failed to load configuration"),
    };
    validate_config(&config).context("Invalid configuration")?;
    Ok(config)
}

fn report_trace(config: &LifnetConfig, as_json: bool) -> Result<()> {
    let window = config.run_window()?;
    let mut network = Network::new();
    let id = network.add_neuron(Neuron::at_reset(config.lif_parameters()?)?);
    let mut sim = Simulation::new(network, window.dt, ExcitationMode::Standalone)?;
    let (summary, trace) = sim.run_traced(window.duration)?;

    if as_json {
        let out = json!({
            "spike_count": summary.spikes(id),
            "rate_hz": summary.firing_rate_hz(id),
            "trace": trace,
        });
        println!("{}", serde_json::to_string_pretty(&out)?);
        return Ok(());
    }

    println!("t_ms\tv_mv");
    let voltages = trace.voltages(id).unwrap_or_default();
    for (t, v) in trace.times.iter().zip(voltages) {
        println!("{t:.3}\t{v:.4}");
    }
    println!(
        "# {} spikes in {} ms ({:.1} Hz)",
        summary.spikes(id),
        window.duration,
        summary.firing_rate_hz(id)
    );
    Ok(())
}

fn report_threshold(config: &LifnetConfig, as_json: bool) -> Result<()> {
    let estimate = find_threshold_current(
        &config.lif_parameters()?,
        &config.run_window()?,
        config.threshold_search(),
    )?;

    if as_json {
        println!("{}", serde_json::to_string_pretty(&estimate)?);
    } else {
        println!("numeric threshold:  {:.6} nA", estimate.numeric);
        println!("largest silent:     {:.6} nA", estimate.silent);
        println!("analytic threshold: {:.6} nA", estimate.analytic);
        println!("error:              {:.6} nA", estimate.error());
        println!("runs:               {}", estimate.runs);
    }
    Ok(())
}

fn report_rates(config: &LifnetConfig, as_json: bool) -> Result<()> {
    let currents = config.firing_rate_currents()?;
    let curve = firing_rate_curve(&config.lif_parameters()?, &currents, &config.run_window()?)?;

    if as_json {
        println!("{}", serde_json::to_string_pretty(&curve)?);
    } else {
        println!("i_e_na\tspikes\trate_hz");
        for point in &curve {
            println!("{:.4}\t{}\t{:.2}", point.i_e, point.spike_count, point.rate_hz);
        }
    }
    Ok(())
}

fn report_pair(config: &LifnetConfig, as_json: bool) -> Result<()> {
    let experiment = config.paired_experiment()?;
    let outcome = match config.pair.initial_potentials {
        Some([v_a, v_b]) => experiment.run(v_a, v_b)?,
        None => experiment.run_random(&mut StdRng::seed_from_u64(config.pair.seed))?,
    };

    if as_json {
        println!("{}", serde_json::to_string_pretty(&outcome)?);
    } else {
        println!(
            "initial potentials: A={:.4} mV, B={:.4} mV",
            outcome.initial[0], outcome.initial[1]
        );
        println!(
            "spikes: A={}, B={}, total={}",
            outcome.spike_counts[0],
            outcome.spike_counts[1],
            outcome.total_spikes()
        );
    }
    Ok(())
}

fn main() -> Result<()> {
    let args = parse_args();
    let config = load(&args)?;

    let options = LoggingOptions {
        level: config.logging.level.clone(),
        log_dir: config
            .logging
            .file_logging
            .then(|| config.logging.log_dir.clone()),
    };
    let _guard = init_logging(&parse_debug_flags(), &options)?;
    info!(mode = ?args.mode, "lif_report starting");

    match args.mode {
        Mode::Trace => report_trace(&config, args.json),
        Mode::Threshold => report_threshold(&config, args.json),
        Mode::Rates => report_rates(&config, args.json),
        Mode::Pair => report_pair(&config, args.json),
    }
    .with_context(|| format!("{:?} report failed", args.mode))?;

    Ok(())
}
