//! Run configuration.
//!
//! A [`VqeConfig`] can be read from YAML or JSON. Missing fields take their
//! defaults, so an empty file is a valid configuration.
//!
//! ```yaml
//! bond_length: 0.9
//! max_iterations: 200
//! optimizer: spsa
//! seed: 7
//! scan:
//!   start: 0.5
//!   stop: 1.5
//!   points: 11
//! ```

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{VqeError, VqeResult};
use crate::optimizers::{AnyOptimizer, Cobyla, OptimizerKind, Spsa};
use crate::problems::EQUILIBRIUM_BOND_LENGTH;

/// Bond-length grid for energy scans.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScanConfig {
    /// First bond length (Ångström).
    pub start: f64,
    /// Last bond length (Ångström), inclusive.
    pub stop: f64,
    /// Number of grid points.
    pub points: usize,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            start: 0.3,
            stop: 2.0,
            points: 15,
        }
    }
}

/// Settings for a VQE run and scan.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VqeConfig {
    /// Bond length (Ångström).
    pub bond_length: f64,
    /// Iteration budget per optimization.
    pub max_iterations: usize,
    /// Initial step scale handed to the minimizer.
    pub initial_step: f64,
    /// Convergence tolerance on the objective spread (COBYLA).
    pub tolerance: f64,
    /// Per-coordinate update size treated as a stall (SPSA).
    pub step_tolerance: f64,
    /// Final trust region radius (COBYLA).
    pub final_step: f64,
    /// Seed for initial parameters and stochastic minimizers.
    pub seed: Option<u64>,
    /// Iterations between progress reports.
    pub progress_interval: usize,
    /// Minimizer to use.
    pub optimizer: OptimizerKind,
    /// Scan grid.
    pub scan: ScanConfig,
}

impl Default for VqeConfig {
    fn default() -> Self {
        Self {
            bond_length: EQUILIBRIUM_BOND_LENGTH,
            max_iterations: 100,
            initial_step: 1.0,
            tolerance: 1e-6,
            step_tolerance: 1e-8,
            final_step: 1e-4,
            seed: None,
            progress_interval: 5,
            optimizer: OptimizerKind::Cobyla,
            scan: ScanConfig::default(),
        }
    }
}

impl VqeConfig {
    /// Load a configuration file, choosing the format by extension.
    ///
    /// `.json` files are parsed as JSON, everything else as YAML.
    pub fn from_file(path: impl AsRef<Path>) -> VqeResult<Self> {
        let path = path.as_ref();
        let source = fs::read_to_string(path).map_err(|e| {
            VqeError::Config(format!("failed to read {}: {e}", path.display()))
        })?;

        let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("");
        let config = match ext.to_lowercase().as_str() {
            "json" => Self::from_json_str(&source)?,
            _ => Self::from_yaml_str(&source)?,
        };
        Ok(config)
    }

    /// Parse YAML and validate.
    pub fn from_yaml_str(source: &str) -> VqeResult<Self> {
        // An empty document deserializes to unit, not to a map
        if source.trim().is_empty() {
            return Ok(Self::default());
        }
        let config: Self = serde_yaml_ng::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    /// Parse JSON and validate.
    pub fn from_json_str(source: &str) -> VqeResult<Self> {
        let config: Self = serde_json::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    /// Serialize as YAML.
    pub fn to_yaml(&self) -> VqeResult<String> {
        Ok(serde_yaml_ng::to_string(self)?)
    }

    /// Check that the settings can drive a run.
    pub fn validate(&self) -> VqeResult<()> {
        if self.max_iterations == 0 {
            return Err(VqeError::Config(
                "max_iterations must be at least 1".into(),
            ));
        }
        if self.progress_interval == 0 {
            return Err(VqeError::Config(
                "progress_interval must be at least 1".into(),
            ));
        }
        for (name, value) in [
            ("initial_step", self.initial_step),
            ("final_step", self.final_step),
        ] {
            if !(value.is_finite() && value > 0.0) {
                return Err(VqeError::Config(format!(
                    "{name} must be positive, got {value}"
                )));
            }
        }
        if self.final_step > self.initial_step {
            return Err(VqeError::Config(format!(
                "final_step ({}) exceeds initial_step ({})",
                self.final_step, self.initial_step
            )));
        }
        if !(self.tolerance.is_finite() && self.tolerance >= 0.0) {
            return Err(VqeError::Config(format!(
                "tolerance must be non-negative, got {}",
                self.tolerance
            )));
        }
        if !(self.step_tolerance.is_finite() && self.step_tolerance >= 0.0) {
            return Err(VqeError::Config(format!(
                "step_tolerance must be non-negative, got {}",
                self.step_tolerance
            )));
        }
        if self.scan.points < 2 {
            return Err(VqeError::Config(format!(
                "scan needs at least 2 points, got {}",
                self.scan.points
            )));
        }
        Ok(())
    }

    /// Minimizer described by this configuration.
    pub fn build_optimizer(&self) -> AnyOptimizer {
        match self.optimizer {
            OptimizerKind::Cobyla => AnyOptimizer::Cobyla(
                Cobyla::new()
                    .with_maxiter(self.max_iterations)
                    .with_tol(self.tolerance)
                    .with_trust_region(self.initial_step, self.final_step),
            ),
            OptimizerKind::Spsa => {
                let mut spsa = Spsa::new().with_maxiter(self.max_iterations);
                spsa.tol = self.step_tolerance;
                if let Some(seed) = self.seed {
                    spsa = spsa.with_seed(seed);
                }
                AnyOptimizer::Spsa(spsa)
            }
        }
    }
}
