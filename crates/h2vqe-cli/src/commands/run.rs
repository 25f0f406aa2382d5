//! Run command implementation.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use console::style;
use rand::SeedableRng;
use rand::rngs::StdRng;
use serde::Serialize;

use h2vqe_core::optimizers::OptimizerKind;
use h2vqe_core::problems::EXPERIMENTAL_GROUND_STATE;
use h2vqe_core::runners::{
    ConvergenceStats, IterationRecord, OptimizationResult, OptimizationTrace, VqeRunner,
};
use h2vqe_core::{AnsatzDescriptor, VqeConfig};

use super::common::{
    check_bond_length, create_progress_bar, load_config, print_header, print_info, print_result,
    print_section, print_success, sample_indices, write_json,
};

/// Rows shown in the convergence table.
const CONVERGENCE_ROWS: usize = 12;

/// Command-line overrides for a run.
#[derive(Debug, Default)]
pub struct RunArgs {
    pub bond_length: Option<f64>,
    pub iterations: Option<usize>,
    pub seed: Option<u64>,
    pub initial: Option<Vec<f64>>,
    pub optimizer: Option<OptimizerKind>,
    pub export: Option<PathBuf>,
}

impl RunArgs {
    /// Apply the overrides on top of a loaded configuration.
    pub fn apply(&self, config: &mut VqeConfig) {
        if let Some(bond_length) = self.bond_length {
            config.bond_length = bond_length;
        }
        if let Some(iterations) = self.iterations {
            config.max_iterations = iterations;
        }
        if let Some(seed) = self.seed {
            config.seed = Some(seed);
        }
        if let Some(optimizer) = self.optimizer {
            config.optimizer = optimizer;
        }
    }
}

/// JSON export of a run.
#[derive(Serialize)]
struct RunExport<'a> {
    generated_at: DateTime<Utc>,
    version: &'static str,
    config: &'a VqeConfig,
    reference_ground_state: f64,
    absolute_error: f64,
    result: &'a OptimizationResult,
    convergence: Option<ConvergenceStats>,
    trace: &'a OptimizationTrace,
}

/// Execute the run command.
pub fn execute(config_path: Option<&Path>, args: &RunArgs) -> Result<()> {
    let mut config = load_config(config_path)?;
    args.apply(&mut config);
    config.validate().context("Invalid run settings")?;

    print_header("H2 Ground State Energy (VQE)");
    check_bond_length(config.bond_length);

    let ansatz = AnsatzDescriptor::h2();
    print_section("Problem Setup");
    print_result("Bond length", format!("{:.3} Å", config.bond_length));
    print_result(
        "Ansatz",
        format!(
            "{} qubits, {} parameters, depth {}",
            ansatz.num_qubits,
            ansatz.num_parameters,
            ansatz.depth()
        ),
    );
    print_result("Optimizer", style(config.optimizer).yellow());
    print_result("Max iterations", config.max_iterations);
    match (&args.initial, config.seed) {
        (Some(initial), _) => print_result("Initial parameters", format_params(initial)),
        (None, Some(seed)) => print_result("Initial parameters", format!("random (seed {seed})")),
        (None, None) => print_result("Initial parameters", "random"),
    }

    let mut runner = VqeRunner::from_config(&config)?;
    let coeffs = runner.coefficients();
    let reference = coeffs.ground_state_energy();

    print_section("Hamiltonian");
    for (label, coeff) in coeffs.iter() {
        println!("  {:>+.8} {}", coeff, style(label).cyan());
    }

    print_section("Optimization");
    let max = config.max_iterations as u64;
    let pb = create_progress_bar(max, "starting")?;
    let observer = |record: &IterationRecord| {
        pb.set_position((record.iteration as u64).min(max));
        pb.set_message(format!("E = {:.6} Ha", record.energy));
    };

    let rng = match config.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    let result = runner.run_observed(args.initial.clone(), config.max_iterations, rng, observer);
    pb.finish_and_clear();
    let result = result.context("VQE optimization failed")?;

    print_success(&format!(
        "Optimization {} after {} iterations",
        result.status, result.iterations
    ));

    let error = (result.best_energy - reference).abs();
    print_section("Results");
    print_result(
        "Best energy",
        style(format!("{:.8} Ha", result.best_energy)).green().bold(),
    );
    print_result("Initial energy", format!("{:.8} Ha", result.initial_energy));
    print_result("Iterations", result.iterations);
    print_result("Evaluations", result.evaluations);
    print_result("Status", result.status);
    print_result("Model ground state", format!("{reference:.8} Ha"));
    print_result(
        "Absolute error",
        format!("{:.8} Ha ({:.3} mHa)", error, error * 1000.0),
    );
    print_result(
        "Experimental",
        format!(
            "{:.2} Ha (difference {:.6} Ha)",
            EXPERIMENTAL_GROUND_STATE,
            (result.best_energy - EXPERIMENTAL_GROUND_STATE).abs()
        ),
    );
    print_result("Best parameters", format_params(&result.best_parameters));

    print_convergence(runner.trace());

    if let Some(path) = &args.export {
        let export = RunExport {
            generated_at: Utc::now(),
            version: env!("CARGO_PKG_VERSION"),
            config: &config,
            reference_ground_state: reference,
            absolute_error: error,
            result: &result,
            convergence: runner.trace().convergence_stats(),
            trace: runner.trace(),
        };
        write_json(path, &export)?;
    }

    Ok(())
}

/// Print a sampled table of the trace.
fn print_convergence(trace: &OptimizationTrace) {
    print_section("Convergence");
    if trace.is_empty() {
        print_info("No iterations recorded");
        return;
    }

    println!("  {:>9}  {:>14}", style("Iteration").bold(), style("Energy (Ha)").bold());
    let records = trace.records();
    for idx in sample_indices(records.len(), CONVERGENCE_ROWS) {
        let record = &records[idx];
        println!("  {:>9}  {:>14.8}", record.iteration, record.energy);
    }

    if let Some(stats) = trace.convergence_stats() {
        println!();
        print_result("Initial energy", format!("{:.8} Ha", stats.initial_energy));
        print_result("Final energy", format!("{:.8} Ha", stats.final_energy));
        print_result("Energy change", format!("{:.8} Ha", stats.energy_change));
        print_result("Total iterations", stats.total_iterations);
        print_result("Early rate", format!("{:.6} Ha/iter", stats.early_rate));
        print_result("Late rate", format!("{:.6} Ha/iter", stats.late_rate));
    }
}

fn format_params(params: &[f64]) -> String {
    let items: Vec<String> = params.iter().map(|p| format!("{p:.4}")).collect();
    format!("[{}]", items.join(", "))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_apply_overrides() {
        let mut config = VqeConfig::default();
        let args = RunArgs {
            bond_length: Some(1.1),
            iterations: Some(30),
            seed: Some(5),
            optimizer: Some(OptimizerKind::Spsa),
            ..RunArgs::default()
        };
        args.apply(&mut config);

        assert_eq!(config.bond_length, 1.1);
        assert_eq!(config.max_iterations, 30);
        assert_eq!(config.seed, Some(5));
        assert_eq!(config.optimizer, OptimizerKind::Spsa);
    }

    #[test]
    fn test_no_overrides_keep_config() {
        let mut config = VqeConfig {
            max_iterations: 7,
            ..VqeConfig::default()
        };
        RunArgs::default().apply(&mut config);
        assert_eq!(config.max_iterations, 7);
    }

    #[test]
    fn test_format_params() {
        assert_eq!(format_params(&[0.5, -1.25]), "[0.5000, -1.2500]");
    }

    #[test]
    fn test_execute_with_export() {
        let dir = tempfile::tempdir().unwrap();
        let config_path = dir.path().join("vqe.yaml");
        std::fs::write(&config_path, "max_iterations: 5\n").unwrap();
        let out = dir.path().join("run.json");

        let args = RunArgs {
            seed: Some(1),
            export: Some(out.clone()),
            ..RunArgs::default()
        };
        execute(Some(config_path.as_path()), &args).unwrap();

        let json: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(out).unwrap()).unwrap();
        assert_eq!(json["config"]["max_iterations"], 5);
        assert!(json["result"]["best_energy"].is_f64());
        assert!(json["trace"].is_array());

        let trace = json["trace"].as_array().unwrap();
        let convergence = &json["convergence"];
        assert_eq!(
            convergence["total_iterations"].as_u64().unwrap() as usize,
            trace.len()
        );
        let first = trace[0]["energy"].as_f64().unwrap();
        let last = trace[trace.len() - 1]["energy"].as_f64().unwrap();
        assert_eq!(convergence["initial_energy"].as_f64().unwrap(), first);
        assert_eq!(convergence["energy_change"].as_f64().unwrap(), last - first);
        // Five records are too few for an early rate
        assert_eq!(convergence["early_rate"].as_f64().unwrap(), 0.0);
    }

    #[test]
    fn test_execute_rejects_zero_iterations() {
        let dir = tempfile::tempdir().unwrap();
        let config_path = dir.path().join("vqe.yaml");
        std::fs::write(&config_path, "").unwrap();
        let args = RunArgs {
            iterations: Some(0),
            ..RunArgs::default()
        };
        assert!(execute(Some(config_path.as_path()), &args).is_err());
    }
}
