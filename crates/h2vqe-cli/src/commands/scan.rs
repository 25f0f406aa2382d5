//! Scan command implementation.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use console::style;
use rand::SeedableRng;
use rand::rngs::StdRng;
use serde::Serialize;

use h2vqe_core::VqeConfig;
use h2vqe_core::runners::{EnergyCurve, EnergySurfaceScanner, VqeRunner, linspace};

use super::common::{
    check_bond_length, create_spinner, load_config, print_header, print_result, print_section,
    write_json,
};

/// Command-line overrides for a scan.
#[derive(Debug, Default)]
pub struct ScanArgs {
    pub start: Option<f64>,
    pub stop: Option<f64>,
    pub points: Option<usize>,
    pub relaxed: bool,
    pub iterations: Option<usize>,
    pub seed: Option<u64>,
    pub export: Option<PathBuf>,
}

impl ScanArgs {
    /// Apply the overrides on top of a loaded configuration.
    pub fn apply(&self, config: &mut VqeConfig) {
        if let Some(start) = self.start {
            config.scan.start = start;
        }
        if let Some(stop) = self.stop {
            config.scan.stop = stop;
        }
        if let Some(points) = self.points {
            config.scan.points = points;
        }
        if let Some(iterations) = self.iterations {
            config.max_iterations = iterations;
        }
        if let Some(seed) = self.seed {
            config.seed = Some(seed);
        }
    }
}

/// JSON export of a scan.
#[derive(Serialize)]
struct ScanExport<'a> {
    generated_at: DateTime<Utc>,
    version: &'static str,
    relaxed: bool,
    parameters: Option<&'a [f64]>,
    curve: &'a EnergyCurve,
    minimum: Option<(f64, f64)>,
}

/// Execute the scan command.
pub fn execute(config_path: Option<&Path>, args: &ScanArgs) -> Result<()> {
    let mut config = load_config(config_path)?;
    args.apply(&mut config);
    config.validate().context("Invalid scan settings")?;

    let grid = linspace(config.scan.start, config.scan.stop, config.scan.points)?;
    check_bond_length(config.scan.start.min(config.scan.stop));

    print_header("H2 Potential Energy Surface");
    print_section("Scan Setup");
    print_result(
        "Range",
        format!(
            "{:.3} to {:.3} Å ({} points)",
            config.scan.start, config.scan.stop, config.scan.points
        ),
    );

    let scanner = EnergySurfaceScanner::new();
    let curve = if args.relaxed {
        print_result("Mode", "relaxed (VQE at every point)");
        print_result("Optimizer", style(config.optimizer).yellow());
        print_result("Max iterations", config.max_iterations);

        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let template = VqeRunner::from_config(&config).context("Invalid run settings")?;
        let spinner = create_spinner("Optimizing...")?;
        let curve = scanner.relaxed_scan(&grid, &template, config.max_iterations, rng);
        spinner.finish_and_clear();
        curve.context("Relaxed scan failed")?
    } else {
        print_result("Mode", "fixed parameters");
        print_result("Parameters", format!("{:?}", scanner.parameters()));
        scanner.scan(&grid)
    };

    let minimum = curve.minimum();
    print_table(&curve, minimum);

    if let Some((r, e)) = minimum {
        print_section("Minimum");
        print_result("Bond length", style(format!("{r:.3} Å")).green().bold());
        print_result("Energy", style(format!("{e:.8} Ha")).green().bold());
    }

    if let Some(path) = &args.export {
        let export = ScanExport {
            generated_at: Utc::now(),
            version: env!("CARGO_PKG_VERSION"),
            relaxed: args.relaxed,
            parameters: (!args.relaxed).then(|| scanner.parameters()),
            curve: &curve,
            minimum,
        };
        write_json(path, &export)?;
    }

    Ok(())
}

fn print_table(curve: &EnergyCurve, minimum: Option<(f64, f64)>) {
    print_section("Energies");
    println!("  {:>10}  {:>14}", style("R (Å)").bold(), style("E (Ha)").bold());
    for (r, e) in curve.points() {
        let marker = if minimum == Some((r, e)) {
            style("◀ min").green().to_string()
        } else {
            String::new()
        };
        println!("  {r:>10.3}  {e:>14.8}  {marker}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_apply_overrides() {
        let mut config = VqeConfig::default();
        let args = ScanArgs {
            start: Some(0.5),
            points: Some(4),
            seed: Some(2),
            ..ScanArgs::default()
        };
        args.apply(&mut config);

        assert_eq!(config.scan.start, 0.5);
        assert_eq!(config.scan.stop, 2.0);
        assert_eq!(config.scan.points, 4);
        assert_eq!(config.seed, Some(2));
    }

    #[test]
    fn test_execute_fixed_scan_export() {
        let dir = tempfile::tempdir().unwrap();
        let config_path = dir.path().join("vqe.yaml");
        std::fs::write(&config_path, "scan:\n  points: 5\n").unwrap();
        let out = dir.path().join("scan.json");

        let args = ScanArgs {
            export: Some(out.clone()),
            ..ScanArgs::default()
        };
        execute(Some(config_path.as_path()), &args).unwrap();

        let json: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(out).unwrap()).unwrap();
        assert_eq!(json["curve"]["energies"].as_array().map(Vec::len), Some(5));
        assert_eq!(json["relaxed"], false);
    }

    #[test]
    fn test_execute_relaxed_scan_uses_config_steps() {
        let dir = tempfile::tempdir().unwrap();
        let config_path = dir.path().join("vqe.yaml");
        let yaml = "initial_step: 0.01\nfinal_step: 0.001\nprogress_interval: 2\n\
                    scan:\n  start: 0.6\n  stop: 1.0\n  points: 3\n";
        std::fs::write(&config_path, yaml).unwrap();
        let out = dir.path().join("relaxed.json");

        let args = ScanArgs {
            relaxed: true,
            iterations: Some(4),
            seed: Some(9),
            export: Some(out.clone()),
            ..ScanArgs::default()
        };
        execute(Some(config_path.as_path()), &args).unwrap();

        let mut config = VqeConfig::from_yaml_str(yaml).unwrap();
        args.apply(&mut config);
        let expected = EnergySurfaceScanner::new()
            .relaxed_scan(
                &linspace(0.6, 1.0, 3).unwrap(),
                &VqeRunner::from_config(&config).unwrap(),
                4,
                StdRng::seed_from_u64(9),
            )
            .unwrap();

        let json: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(out).unwrap()).unwrap();
        assert_eq!(json["relaxed"], true);
        let energies: Vec<f64> = json["curve"]["energies"]
            .as_array()
            .unwrap()
            .iter()
            .map(|e| e.as_f64().unwrap())
            .collect();
        assert_eq!(energies, expected.energies);
    }

    #[test]
    fn test_execute_rejects_single_point() {
        let dir = tempfile::tempdir().unwrap();
        let config_path = dir.path().join("vqe.yaml");
        std::fs::write(&config_path, "").unwrap();
        let args = ScanArgs {
            points: Some(1),
            ..ScanArgs::default()
        };
        assert!(execute(Some(config_path.as_path()), &args).is_err());
    }
}
