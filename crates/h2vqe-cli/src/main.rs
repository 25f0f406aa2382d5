//! H2 VQE Command-Line Interface
//!
//! Estimate the H2 ground-state energy with a variational loop, scan the
//! bond length, and inspect the Hamiltonian and ansatz.
//!
//! ```text
//!   H ─── H        h2vqe run --bond-length 0.735
//!     0.735 Å      h2vqe scan --points 15
//! ```

#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use console::style;
use tracing_subscriber::EnvFilter;

use h2vqe_core::OptimizerKind;

mod commands;

use commands::{circuit, hamiltonian, run, scan, version};

/// h2vqe - variational ground-state energy estimation for H2
#[derive(Parser)]
#[command(name = "h2vqe")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Configuration file (YAML or JSON)
    #[arg(short, long, global = true, env = "H2VQE_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Optimize the ansatz at one bond length
    Run {
        /// Bond length in Ångström
        #[arg(short, long, allow_negative_numbers = true)]
        bond_length: Option<f64>,

        /// Maximum optimizer iterations
        #[arg(short, long)]
        iterations: Option<usize>,

        /// Seed for the random initial parameters
        #[arg(short, long)]
        seed: Option<u64>,

        /// Initial parameters, comma separated (radians)
        #[arg(long, value_delimiter = ',', allow_negative_numbers = true)]
        initial: Option<Vec<f64>>,

        /// Minimizer (cobyla, spsa)
        #[arg(long)]
        optimizer: Option<OptimizerKind>,

        /// Write the result and trace as JSON
        #[arg(short, long)]
        export: Option<PathBuf>,
    },

    /// Evaluate the energy along a bond-length grid
    Scan {
        /// First bond length in Ångström
        #[arg(long, allow_negative_numbers = true)]
        start: Option<f64>,

        /// Last bond length in Ångström
        #[arg(long, allow_negative_numbers = true)]
        stop: Option<f64>,

        /// Number of grid points
        #[arg(short, long)]
        points: Option<usize>,

        /// Optimize the ansatz at every point instead of using fixed parameters
        #[arg(long)]
        relaxed: bool,

        /// Maximum optimizer iterations per point (with --relaxed)
        #[arg(short, long)]
        iterations: Option<usize>,

        /// Seed for the random initial parameters (with --relaxed)
        #[arg(short, long)]
        seed: Option<u64>,

        /// Write the curve as JSON
        #[arg(short, long)]
        export: Option<PathBuf>,
    },

    /// Show the ansatz circuit structure
    Circuit,

    /// Show the Hamiltonian at a bond length
    Hamiltonian {
        /// Bond length in Ångström
        #[arg(short, long, allow_negative_numbers = true)]
        bond_length: Option<f64>,
    },

    /// Show version information
    Version,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Setup logging
    let filter = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .with_target(false)
        .init();

    let config_path = cli.config.as_deref();

    // Execute command
    let result = match cli.command {
        Commands::Run {
            bond_length,
            iterations,
            seed,
            initial,
            optimizer,
            export,
        } => run::execute(
            config_path,
            &run::RunArgs {
                bond_length,
                iterations,
                seed,
                initial,
                optimizer,
                export,
            },
        ),

        Commands::Scan {
            start,
            stop,
            points,
            relaxed,
            iterations,
            seed,
            export,
        } => scan::execute(
            config_path,
            &scan::ScanArgs {
                start,
                stop,
                points,
                relaxed,
                iterations,
                seed,
                export,
            },
        ),

        Commands::Circuit => {
            circuit::execute();
            Ok(())
        }

        Commands::Hamiltonian { bond_length } => hamiltonian::execute(config_path, bond_length),

        Commands::Version => {
            version::execute();
            Ok(())
        }
    };

    // Handle errors
    if let Err(e) = result {
        eprintln!("{} {:#}", style("Error:").red().bold(), e);
        std::process::exit(1);
    }

    Ok(())
}
