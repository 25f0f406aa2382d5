//! VQE (Variational Quantum Eigensolver) runner.
//!
//! Drives a classical minimizer over the analytical energy model and records
//! one [`IterationRecord`] per minimizer iteration. A runner keeps its
//! iteration counter and trace across runs; call [`VqeRunner::reset`] to
//! start over.

use std::f64::consts::TAU;

use rand::Rng;
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::circuits::NUM_PARAMETERS;
use crate::config::VqeConfig;
use crate::energy::EnergyEvaluator;
use crate::error::{VqeError, VqeResult};
use crate::optimizers::{AnyOptimizer, Cobyla, Optimizer};
use crate::problems::{EQUILIBRIUM_BOND_LENGTH, HamiltonianCoefficients};

/// Default number of iterations between progress reports.
pub const DEFAULT_PROGRESS_INTERVAL: usize = 5;

/// Lifecycle of a runner.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub enum RunStatus {
    /// No run has completed yet.
    #[default]
    Idle,
    /// A run is in progress.
    Running,
    /// The minimizer met its convergence criterion.
    Converged,
    /// The iteration budget was exhausted.
    IterationLimitReached,
}

impl std::fmt::Display for RunStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            RunStatus::Idle => "idle",
            RunStatus::Running => "running",
            RunStatus::Converged => "converged",
            RunStatus::IterationLimitReached => "iteration limit reached",
        };
        f.write_str(s)
    }
}

/// Energy and parameters at one minimizer iteration.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IterationRecord {
    /// 1-based iteration number, counted across runs on the same runner.
    pub iteration: usize,
    /// Parameters reported by the minimizer.
    pub parameters: Vec<f64>,
    /// Energy at `parameters`.
    pub energy: f64,
}

/// Records spanned by the early convergence rate.
const EARLY_WINDOW: usize = 10;

/// Energy movement over a recorded trace.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ConvergenceStats {
    /// First recorded energy (Hartree).
    pub initial_energy: f64,
    /// Last recorded energy (Hartree).
    pub final_energy: f64,
    /// `final_energy - initial_energy`.
    pub energy_change: f64,
    /// Iteration number of the last record.
    pub total_iterations: usize,
    /// Mean change per record over the first ten records, zero for short traces.
    pub early_rate: f64,
    /// Mean change per record over the second half of the trace.
    pub late_rate: f64,
}

/// Append-only record of a runner's iterations.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct OptimizationTrace {
    records: Vec<IterationRecord>,
}

impl OptimizationTrace {
    /// Number of recorded iterations.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether nothing has been recorded.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// All records in order.
    pub fn records(&self) -> &[IterationRecord] {
        &self.records
    }

    /// Most recent record.
    pub fn last(&self) -> Option<&IterationRecord> {
        self.records.last()
    }

    /// Iterate over the records.
    pub fn iter(&self) -> std::slice::Iter<'_, IterationRecord> {
        self.records.iter()
    }

    /// Iteration numbers.
    pub fn iterations(&self) -> Vec<usize> {
        self.records.iter().map(|r| r.iteration).collect()
    }

    /// Energies, parallel to [`Self::iterations`].
    pub fn energies(&self) -> Vec<f64> {
        self.records.iter().map(|r| r.energy).collect()
    }

    /// Parameter vectors, parallel to [`Self::iterations`].
    pub fn parameters(&self) -> Vec<Vec<f64>> {
        self.records.iter().map(|r| r.parameters.clone()).collect()
    }

    /// Summary of how the energy moved over the trace, `None` when empty.
    pub fn convergence_stats(&self) -> Option<ConvergenceStats> {
        let first = self.records.first()?;
        let last = self.records.last()?;
        let energies = self.energies();
        let len = energies.len();

        let early_rate = if len > EARLY_WINDOW {
            (energies[EARLY_WINDOW] - energies[0]) / EARLY_WINDOW as f64
        } else {
            0.0
        };
        let mid = len / 2;
        let late_rate = (energies[len - 1] - energies[mid]) / (len - mid) as f64;

        Some(ConvergenceStats {
            initial_energy: first.energy,
            final_energy: last.energy,
            energy_change: last.energy - first.energy,
            total_iterations: last.iteration,
            early_rate,
            late_rate,
        })
    }

    fn push(&mut self, record: IterationRecord) {
        self.records.push(record);
    }

    fn clear(&mut self) {
        self.records.clear();
    }
}

impl<'a> IntoIterator for &'a OptimizationTrace {
    type Item = &'a IterationRecord;
    type IntoIter = std::slice::Iter<'a, IterationRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Result of a completed VQE run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OptimizationResult {
    /// Lowest energy reported by the minimizer.
    pub best_energy: f64,
    /// Parameters at `best_energy`.
    pub best_parameters: Vec<f64>,
    /// Bond length the run used (Ångström).
    pub bond_length: f64,
    /// Energy at the starting parameters.
    pub initial_energy: f64,
    /// Minimizer iterations in this run.
    pub iterations: usize,
    /// Objective evaluations in this run.
    pub evaluations: usize,
    /// Terminal status.
    pub status: RunStatus,
}

/// Receives periodic progress reports from a running [`VqeRunner`].
///
/// Closures taking `&IterationRecord` implement this trait, and `()` is a
/// no-op observer.
pub trait ProgressObserver {
    /// Called every `progress_interval` iterations.
    fn on_progress(&mut self, record: &IterationRecord);
}

impl<F> ProgressObserver for F
where
    F: FnMut(&IterationRecord),
{
    fn on_progress(&mut self, record: &IterationRecord) {
        self(record);
    }
}

impl ProgressObserver for () {
    fn on_progress(&mut self, _record: &IterationRecord) {}
}

/// Draw `n` parameters uniformly from `[0, 2π)`.
pub fn random_parameters<R: Rng>(mut rng: R, n: usize) -> Vec<f64> {
    (0..n).map(|_| rng.gen_range(0.0..TAU)).collect()
}

/// VQE runner for the H2 molecule.
#[derive(Debug, Clone)]
pub struct VqeRunner<O = Cobyla> {
    bond_length: f64,
    optimizer: O,
    initial_step: Option<f64>,
    progress_interval: usize,
    iteration_count: usize,
    trace: OptimizationTrace,
    status: RunStatus,
    best: Option<OptimizationResult>,
}

impl VqeRunner<Cobyla> {
    /// Create a runner at `bond_length` (Ångström) using COBYLA.
    pub fn new(bond_length: f64) -> Self {
        Self::with_optimizer(bond_length, Cobyla::default())
    }
}

impl Default for VqeRunner<Cobyla> {
    fn default() -> Self {
        Self::new(EQUILIBRIUM_BOND_LENGTH)
    }
}

impl VqeRunner<AnyOptimizer> {
    /// Create a runner from a validated configuration.
    pub fn from_config(config: &VqeConfig) -> VqeResult<Self> {
        config.validate()?;
        Ok(
            Self::with_optimizer(config.bond_length, config.build_optimizer())
                .with_initial_step(config.initial_step)
                .with_progress_interval(config.progress_interval),
        )
    }
}

impl<O: Optimizer + Clone> VqeRunner<O> {
    /// Create a runner at `bond_length` driven by `optimizer`.
    pub fn with_optimizer(bond_length: f64, optimizer: O) -> Self {
        Self {
            bond_length,
            optimizer,
            initial_step: None,
            progress_interval: DEFAULT_PROGRESS_INTERVAL,
            iteration_count: 0,
            trace: OptimizationTrace::default(),
            status: RunStatus::Idle,
            best: None,
        }
    }

    /// Override the minimizer's initial step scale.
    ///
    /// Without an override the optimizer keeps its own configured step.
    pub fn with_initial_step(mut self, step: f64) -> Self {
        self.initial_step = Some(step);
        self
    }

    /// Set the number of iterations between progress reports (minimum 1).
    pub fn with_progress_interval(mut self, interval: usize) -> Self {
        self.progress_interval = interval.max(1);
        self
    }

    /// Idle runner at `bond_length` sharing this runner's optimizer settings.
    ///
    /// The trace, counter and stored result start empty.
    pub fn at_bond_length(&self, bond_length: f64) -> Self {
        Self {
            bond_length,
            optimizer: self.optimizer.clone(),
            initial_step: self.initial_step,
            progress_interval: self.progress_interval,
            iteration_count: 0,
            trace: OptimizationTrace::default(),
            status: RunStatus::Idle,
            best: None,
        }
    }

    /// Bond length in Ångström.
    pub fn bond_length(&self) -> f64 {
        self.bond_length
    }

    /// Hamiltonian coefficients at this runner's bond length.
    pub fn coefficients(&self) -> HamiltonianCoefficients {
        HamiltonianCoefficients::for_bond_length(self.bond_length)
    }

    /// The configured minimizer.
    pub fn optimizer(&self) -> &O {
        &self.optimizer
    }

    /// Iterations recorded since construction or the last reset.
    pub fn iteration_count(&self) -> usize {
        self.iteration_count
    }

    /// Recorded iterations.
    pub fn trace(&self) -> &OptimizationTrace {
        &self.trace
    }

    /// Current lifecycle status.
    pub fn status(&self) -> RunStatus {
        self.status
    }

    /// Result of the most recent completed run.
    pub fn best(&self) -> Option<&OptimizationResult> {
        self.best.as_ref()
    }

    /// Clear the trace, counter, status and stored result.
    pub fn reset(&mut self) {
        self.iteration_count = 0;
        self.trace.clear();
        self.status = RunStatus::Idle;
        self.best = None;
    }

    /// Energy at `parameters` for this runner's bond length.
    pub fn energy(&self, parameters: &[f64]) -> VqeResult<f64> {
        EnergyEvaluator::new(self.bond_length).evaluate(parameters)
    }

    /// Run VQE, drawing missing initial parameters from the thread RNG.
    pub fn run(
        &mut self,
        initial: Option<Vec<f64>>,
        max_iterations: usize,
    ) -> VqeResult<OptimizationResult> {
        self.run_with_rng(initial, max_iterations, rand::thread_rng())
    }

    /// Run VQE, drawing missing initial parameters from `rng`.
    ///
    /// Seeding `rng` makes the run reproducible:
    /// ```rust,ignore
    /// use rand::SeedableRng;
    /// let rng = rand::rngs::StdRng::seed_from_u64(42);
    /// let result = runner.run_with_rng(None, 100, rng)?;
    /// ```
    pub fn run_with_rng<R: Rng>(
        &mut self,
        initial: Option<Vec<f64>>,
        max_iterations: usize,
        rng: R,
    ) -> VqeResult<OptimizationResult> {
        self.run_observed(initial, max_iterations, rng, ())
    }

    /// Run VQE and report progress to `observer`.
    pub fn run_observed<R, P>(
        &mut self,
        initial: Option<Vec<f64>>,
        max_iterations: usize,
        rng: R,
        mut observer: P,
    ) -> VqeResult<OptimizationResult>
    where
        R: Rng,
        P: ProgressObserver,
    {
        if max_iterations == 0 {
            return Err(VqeError::InvalidIterationBudget(max_iterations));
        }
        let initial = match initial {
            Some(params) if params.is_empty() => return Err(VqeError::EmptyParameters),
            Some(params) => params,
            None => random_parameters(rng, NUM_PARAMETERS),
        };

        let evaluator = EnergyEvaluator::new(self.bond_length);
        let initial_energy = evaluator.evaluate(&initial)?;
        info!(
            bond_length = self.bond_length,
            optimizer = self.optimizer.name(),
            max_iterations,
            "Initial guess energy: {initial_energy:.6} Ha"
        );

        let mut optimizer = self.optimizer.clone();
        optimizer.set_max_iterations(max_iterations);
        if let Some(step) = self.initial_step {
            optimizer.set_initial_step(step);
        }

        self.status = RunStatus::Running;
        let interval = self.progress_interval;
        let counter = &mut self.iteration_count;
        let trace = &mut self.trace;

        let outcome = optimizer.minimize(
            |params| evaluator.energy(params),
            initial,
            |params| {
                *counter += 1;
                let record = IterationRecord {
                    iteration: *counter,
                    parameters: params.to_vec(),
                    energy: evaluator.energy(params),
                };
                if record.iteration % interval == 0 {
                    info!("Iteration {:3}: Energy = {:.6} Ha", record.iteration, record.energy);
                    observer.on_progress(&record);
                }
                trace.push(record);
            },
        );

        let outcome = match outcome {
            Ok(outcome) => outcome,
            Err(e) => {
                warn!(error = %e, recorded = self.trace.len(), "optimization aborted");
                self.status = RunStatus::Idle;
                return Err(e.into());
            }
        };
        debug!(
            evaluations = outcome.evaluations,
            improvements = outcome.history.len(),
            "minimizer finished"
        );

        self.status = if outcome.converged {
            RunStatus::Converged
        } else {
            RunStatus::IterationLimitReached
        };

        let result = OptimizationResult {
            best_energy: outcome.best_value,
            best_parameters: outcome.best_point,
            bond_length: self.bond_length,
            initial_energy,
            iterations: outcome.iterations,
            evaluations: outcome.evaluations,
            status: self.status,
        };

        info!(
            "Optimization {} after {} iterations: E = {:.6} Ha ({} evaluations)",
            result.status, result.iterations, result.best_energy, result.evaluations
        );

        self.best = Some(result.clone());
        Ok(result)
    }
}
