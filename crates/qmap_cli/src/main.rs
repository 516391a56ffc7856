//! qmap CLI - circuit-to-graph mapping and Clifford synthesis from the
//! command line.
//!
//! Provides two subcommands:
//! - `map`: route a circuit onto a device's coupling graph (Core A)
//! - `synthesize`: realize a target stabilizer tableau as a Clifford
//!   circuit (Core B)

use std::path::PathBuf;
use std::time::Instant;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::{info, info_span, warn, Level};
use tracing_subscriber::FmtSubscriber;

use qmap_clifford::gate_set::ENCODER_GENERATORS;
use qmap_route::map_circuit;

/// qmap - circuit-to-graph mapping and Clifford synthesis toolkit.
#[derive(Parser)]
#[command(name = "qmap")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Output format (text, json)
    #[arg(short, long, global = true, default_value = "text")]
    format: OutputFormat,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

#[derive(Subcommand)]
enum Commands {
    /// Map a circuit onto a device's coupling graph (Core A)
    Map {
        /// Path to a circuit JSON file
        #[arg(long, value_name = "FILE")]
        circuit: PathBuf,

        /// Path to a device (hardware profile) JSON file
        #[arg(long, value_name = "FILE")]
        device: PathBuf,

        /// Optional mapper config override JSON file
        #[arg(long, value_name = "FILE")]
        config: Option<PathBuf>,

        /// Where to write the mapped-circuit result JSON
        #[arg(long, value_name = "FILE")]
        out: Option<PathBuf>,
    },

    /// Synthesize a Clifford circuit realizing a target tableau (Core B)
    Synthesize {
        /// Path to a target tableau JSON file
        #[arg(long, value_name = "FILE")]
        tableau: PathBuf,

        /// Optional Clifford config override JSON file
        #[arg(long, value_name = "FILE")]
        config: Option<PathBuf>,

        /// Where to write the synthesized-circuit result JSON
        #[arg(long, value_name = "FILE")]
        out: Option<PathBuf>,
    },

    /// Show toolkit information
    Info,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = if cli.verbose { Level::DEBUG } else { Level::INFO };
    let _ = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .without_time()
        .try_init();

    match cli.command {
        Commands::Map {
            circuit,
            device,
            config,
            out,
        } => cmd_map(&circuit, &device, config.as_deref(), out.as_deref(), cli.format),
        Commands::Synthesize {
            tableau,
            config,
            out,
        } => cmd_synthesize(&tableau, config.as_deref(), out.as_deref(), cli.format),
        Commands::Info => cmd_info(cli.format),
    }
}

fn cmd_map(
    circuit_path: &std::path::Path,
    device_path: &std::path::Path,
    config_path: Option<&std::path::Path>,
    out_path: Option<&std::path::Path>,
    format: OutputFormat,
) -> Result<()> {
    let start = Instant::now();
    let span = info_span!("map", circuit = %circuit_path.display());
    let _enter = span.enter();

    let circuit = qmap_cli::load_circuit(circuit_path)?;
    let device = qmap_cli::load_device(device_path)?;
    let config = qmap_cli::load_mapper_config(config_path)?;

    info!(
        "mapping {} gates over {} qubits onto a {}-qubit device",
        circuit.gate_count(),
        circuit.num_qubits,
        device.num_qubits
    );

    let result = map_circuit(&circuit, &device, &config).map_err(|err| {
        warn!("mapping failed: {err}");
        err
    })?;

    if let Some(out_path) = out_path {
        qmap_cli::write_mapping_result(out_path, &result)?;
    }

    let elapsed_ms = start.elapsed().as_secs_f64() * 1000.0;
    match format {
        OutputFormat::Text => {
            println!("\n=== Mapping Result ===");
            println!("Timed out:  {}", result.timed_out);
            println!("SWAPs:      {}", result.swap_count);
            println!("Gates:      {}", result.circuit.gate_count());
            println!("Depth:      {}", result.circuit.depth());
            println!("Time:       {elapsed_ms:.2} ms");
        }
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&result)?);
        }
    }

    Ok(())
}

fn cmd_synthesize(
    tableau_path: &std::path::Path,
    config_path: Option<&std::path::Path>,
    out_path: Option<&std::path::Path>,
    format: OutputFormat,
) -> Result<()> {
    let start = Instant::now();
    let span = info_span!("synthesize", tableau = %tableau_path.display());
    let _enter = span.enter();

    let tableau = qmap_cli::load_tableau(tableau_path)?;
    let config = qmap_cli::load_clifford_config(config_path)?;

    info!("synthesizing a {}-qubit Clifford target", tableau.num_qubits);

    let result = if config.n_threads_heuristic > 1 {
        qmap_clifford::synthesize_parallel(&tableau, &ENCODER_GENERATORS, &config)
    } else {
        qmap_clifford::synthesize(&tableau, &ENCODER_GENERATORS, &config)
    }
    .with_context(|| "Clifford synthesis failed")?;

    if let Some(out_path) = out_path {
        let json = serde_json::to_string_pretty(&result)?;
        std::fs::write(out_path, json)
            .with_context(|| format!("failed to write result file: {}", out_path.display()))?;
    }

    let elapsed_ms = start.elapsed().as_secs_f64() * 1000.0;
    match format {
        OutputFormat::Text => {
            println!("\n=== Synthesis Result ===");
            println!("Gates:          {}", result.gates);
            println!("Two-qubit:      {}", result.two_qubit_gates);
            println!("Depth:          {}", result.depth);
            println!("Timesteps used: {}", result.t_count);
            println!("Time:           {elapsed_ms:.2} ms");
        }
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&result)?);
        }
    }

    Ok(())
}

fn cmd_info(format: OutputFormat) -> Result<()> {
    let info = SystemInfo {
        name: "qmap".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        cores: vec![
            "Core A: heuristic (A*) and exact (Boolean-constraint) circuit mapping".to_string(),
            "Core B: Boolean-constraint Clifford synthesis".to_string(),
        ],
        supported_gates: vec![
            "I", "X", "Y", "Z", "H", "S", "Sdg", "SX", "SXdg", "CX", "CZ", "SWAP", "Rx", "Ry",
            "Rz", "Measure", "Barrier",
        ]
        .iter()
        .map(|s| s.to_string())
        .collect(),
    };

    match format {
        OutputFormat::Text => {
            println!("\n=== {} ===", info.name);
            println!("Version: {}", info.version);
            println!();
            println!("Cores:");
            for core in &info.cores {
                println!("  - {core}");
            }
            println!();
            println!("Supported gates:");
            println!("  {}", info.supported_gates.join(", "));
        }
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&info)?);
        }
    }

    Ok(())
}

#[derive(serde::Serialize)]
struct SystemInfo {
    name: String,
    version: String,
    cores: Vec<String>,
    supported_gates: Vec<String>,
}
