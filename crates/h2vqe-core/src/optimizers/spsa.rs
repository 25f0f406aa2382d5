//! SPSA (Simultaneous Perturbation Stochastic Approximation) optimizer.
//!
//! This is a gradient-free stochastic optimization algorithm that
//! estimates gradients using random perturbations. Two objective
//! evaluations per iteration are enough regardless of dimension.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::{CountedObjective, Optimizer, OptimizerError, OptimizerOutcome, check_common};

/// Consecutive negligible updates required before declaring convergence.
const STALL_WINDOW: usize = 20;

/// SPSA optimizer configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct Spsa {
    /// Maximum number of iterations.
    pub maxiter: usize,
    /// Initial learning-rate gain.
    pub a: f64,
    /// Perturbation size.
    pub c: f64,
    /// Learning rate decay parameter.
    pub alpha: f64,
    /// Perturbation decay parameter.
    pub gamma: f64,
    /// Updates moving every coordinate by less than this count as stalled.
    pub tol: f64,
    /// Seed for the perturbation directions.
    pub seed: u64,
}

impl Default for Spsa {
    fn default() -> Self {
        Self {
            maxiter: 100,
            a: 0.1,
            c: 0.1,
            alpha: 0.602,
            gamma: 0.101,
            tol: 1e-8,
            seed: 42,
        }
    }
}

impl Spsa {
    /// Create a new SPSA optimizer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set maximum iterations.
    pub fn with_maxiter(mut self, maxiter: usize) -> Self {
        self.maxiter = maxiter;
        self
    }

    /// Set the gain sequence parameters.
    pub fn with_gains(mut self, a: f64, c: f64) -> Self {
        self.a = a;
        self.c = c;
        self
    }

    /// Set the perturbation seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    fn validate(&self, initial: &[f64]) -> Result<(), OptimizerError> {
        check_common(initial, self.maxiter, self.a)?;
        if !(self.c.is_finite() && self.c > 0.0) {
            return Err(OptimizerError::InvalidOptions(format!(
                "perturbation size must be positive, got {}",
                self.c
            )));
        }
        Ok(())
    }
}

impl Optimizer for Spsa {
    fn minimize<F, P>(
        &self,
        objective: F,
        initial_params: Vec<f64>,
        mut on_progress: P,
    ) -> Result<OptimizerOutcome, OptimizerError>
    where
        F: FnMut(&[f64]) -> f64,
        P: FnMut(&[f64]),
    {
        self.validate(&initial_params)?;

        let mut objective = CountedObjective::new(objective);
        let mut rng = StdRng::seed_from_u64(self.seed);

        let mut x = initial_params;
        let f_x = objective.call(&x)?;
        let mut best_value = f_x;
        let mut best_point = x.clone();
        let mut history = vec![f_x];
        let mut converged = false;
        let mut iterations = 0;
        let mut stalled = 0;

        for k in 0..self.maxiter {
            let a_k = self.a / ((k + 1) as f64).powf(self.alpha);
            let c_k = self.c / ((k + 1) as f64).powf(self.gamma);

            // Rademacher perturbation direction
            let delta: Vec<f64> = (0..x.len())
                .map(|_| if rng.gen_bool(0.5) { 1.0 } else { -1.0 })
                .collect();

            let x_plus: Vec<f64> = x.iter().zip(&delta).map(|(xi, di)| xi + c_k * di).collect();
            let x_minus: Vec<f64> = x.iter().zip(&delta).map(|(xi, di)| xi - c_k * di).collect();

            let f_plus = objective.call(&x_plus)?;
            let f_minus = objective.call(&x_minus)?;

            let mut largest_move: f64 = 0.0;
            for (xi, di) in x.iter_mut().zip(&delta) {
                let grad = (f_plus - f_minus) / (2.0 * c_k * di);
                let update = a_k * grad;
                *xi -= update;
                largest_move = largest_move.max(update.abs());
            }

            let f_new = objective.call(&x)?;
            if f_new < best_value {
                best_value = f_new;
                best_point.clone_from(&x);
                history.push(best_value);
            }

            iterations += 1;
            on_progress(&x);

            // A single orthogonal perturbation can yield a zero step
            if largest_move < self.tol {
                stalled += 1;
            } else {
                stalled = 0;
            }
            if stalled >= STALL_WINDOW {
                converged = true;
                break;
            }
        }

        Ok(OptimizerOutcome {
            best_value,
            best_point,
            iterations,
            evaluations: objective.evaluations(),
            converged,
            history,
        })
    }

    fn set_max_iterations(&mut self, max_iterations: usize) {
        self.maxiter = max_iterations;
    }

    fn set_initial_step(&mut self, step: f64) {
        self.a = step;
    }

    fn name(&self) -> &'static str {
        "spsa"
    }
}
