//! Potential energy surface scans over the H2 bond length.

use rand::Rng;
use serde::Serialize;
use tracing::{debug, info};

use super::vqe::VqeRunner;
use crate::circuits::NUM_PARAMETERS;
use crate::energy::EnergyEvaluator;
use crate::error::{VqeError, VqeResult};
use crate::optimizers::Optimizer;

/// Parameter value used for every entry of the fixed scan vector.
pub const DEFAULT_SCAN_PARAMETER: f64 = 0.5;

/// Energies sampled along a bond-length grid.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct EnergyCurve {
    /// Bond lengths (Ångström).
    pub bond_lengths: Vec<f64>,
    /// Energy at each bond length (Hartree).
    pub energies: Vec<f64>,
}

impl EnergyCurve {
    /// Number of sampled points.
    pub fn len(&self) -> usize {
        self.bond_lengths.len()
    }

    /// Whether the curve has no points.
    pub fn is_empty(&self) -> bool {
        self.bond_lengths.is_empty()
    }

    /// `(bond_length, energy)` pairs.
    pub fn points(&self) -> impl Iterator<Item = (f64, f64)> + '_ {
        self.bond_lengths
            .iter()
            .copied()
            .zip(self.energies.iter().copied())
    }

    /// Point with the lowest energy.
    pub fn minimum(&self) -> Option<(f64, f64)> {
        self.points().min_by(|a, b| a.1.total_cmp(&b.1))
    }
}

/// `points` evenly spaced values from `start` to `stop`, both inclusive.
pub fn linspace(start: f64, stop: f64, points: usize) -> VqeResult<Vec<f64>> {
    if points < 2 {
        return Err(VqeError::InvalidScan(format!(
            "at least 2 points are required, got {points}"
        )));
    }
    if !(start.is_finite() && stop.is_finite()) {
        return Err(VqeError::InvalidScan(format!(
            "bounds must be finite, got {start}..{stop}"
        )));
    }
    let step = (stop - start) / (points - 1) as f64;
    Ok((0..points)
        .map(|i| {
            if i == points - 1 {
                stop
            } else {
                start + step * i as f64
            }
        })
        .collect())
}

/// Evaluates the energy model along a bond-length grid.
///
/// A plain scan uses one fixed parameter vector for every geometry and
/// performs no optimization.
#[derive(Debug, Clone, PartialEq)]
pub struct EnergySurfaceScanner {
    parameters: Vec<f64>,
}

impl Default for EnergySurfaceScanner {
    fn default() -> Self {
        Self {
            parameters: vec![DEFAULT_SCAN_PARAMETER; NUM_PARAMETERS],
        }
    }
}

impl EnergySurfaceScanner {
    /// Scanner using `[0.5; 8]`.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the fixed parameter vector.
    pub fn with_parameters(mut self, parameters: Vec<f64>) -> VqeResult<Self> {
        if parameters.is_empty() {
            return Err(VqeError::EmptyParameters);
        }
        self.parameters = parameters;
        Ok(self)
    }

    /// The fixed parameter vector.
    pub fn parameters(&self) -> &[f64] {
        &self.parameters
    }

    /// Energy at each bond length with the fixed parameters.
    pub fn scan(&self, bond_lengths: &[f64]) -> EnergyCurve {
        let energies = bond_lengths
            .iter()
            .map(|&r| EnergyEvaluator::new(r).energy(&self.parameters))
            .collect();
        debug!(points = bond_lengths.len(), "energy scan finished");

        EnergyCurve {
            bond_lengths: bond_lengths.to_vec(),
            energies,
        }
    }

    /// Optimized energy at each bond length.
    ///
    /// Runs a fresh VQE optimization per geometry, configured like `template`
    /// (optimizer, initial step, progress interval). The template's own bond
    /// length and trace are not used. Starting points are drawn from `rng`,
    /// so a seeded RNG gives a reproducible curve.
    pub fn relaxed_scan<O, R>(
        &self,
        bond_lengths: &[f64],
        template: &VqeRunner<O>,
        max_iterations: usize,
        mut rng: R,
    ) -> VqeResult<EnergyCurve>
    where
        O: Optimizer + Clone,
        R: Rng,
    {
        let mut energies = Vec::with_capacity(bond_lengths.len());
        for (idx, &r) in bond_lengths.iter().enumerate() {
            let mut runner = template.at_bond_length(r);
            let result = runner.run_with_rng(None, max_iterations, &mut rng)?;
            info!(
                "[{}/{}] R = {:.3} Å: E = {:.6} Ha",
                idx + 1,
                bond_lengths.len(),
                r,
                result.best_energy
            );
            energies.push(result.best_energy);
        }

        Ok(EnergyCurve {
            bond_lengths: bond_lengths.to_vec(),
            energies,
        })
    }
}
