//! Classical minimizers for the variational loop.
//!
//! Any type implementing [`Optimizer`] can drive a [`crate::runners::VqeRunner`].
//! The trait methods are generic, so runtime selection goes through
//! [`AnyOptimizer`].

pub mod cobyla;
pub mod spsa;

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use cobyla::Cobyla;
pub use spsa::Spsa;

/// Errors reported by a minimizer.
#[derive(Debug, Error, Clone, PartialEq)]
#[non_exhaustive]
pub enum OptimizerError {
    /// The objective returned NaN or an infinity.
    #[error("Objective returned a non-finite value at evaluation {evaluation}")]
    NonFiniteObjective {
        /// 1-based index of the offending evaluation.
        evaluation: usize,
    },

    /// The optimizer settings are unusable.
    #[error("Invalid optimizer options: {0}")]
    InvalidOptions(String),

    /// The starting point has no coordinates.
    #[error("Starting point is empty")]
    EmptyStartingPoint,
}

/// Outcome of a minimization.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OptimizerOutcome {
    /// Lowest objective value seen.
    pub best_value: f64,
    /// Point at which `best_value` was observed.
    pub best_point: Vec<f64>,
    /// Number of completed iterations (equals the number of progress callbacks).
    pub iterations: usize,
    /// Number of objective evaluations.
    pub evaluations: usize,
    /// Whether the convergence criterion was met before the iteration limit.
    pub converged: bool,
    /// Best objective value after each improvement, starting with the initial value.
    pub history: Vec<f64>,
}

/// A derivative-free minimizer.
pub trait Optimizer {
    /// Minimize `objective` starting from `initial`.
    ///
    /// `on_progress` is invoked once per completed iteration with the
    /// minimizer's current point. Objective evaluations outnumber callbacks.
    fn minimize<F, P>(
        &self,
        objective: F,
        initial: Vec<f64>,
        on_progress: P,
    ) -> Result<OptimizerOutcome, OptimizerError>
    where
        F: FnMut(&[f64]) -> f64,
        P: FnMut(&[f64]);

    /// Set the iteration limit.
    fn set_max_iterations(&mut self, max_iterations: usize);

    /// Set the initial step scale (trust region radius, learning-rate gain).
    fn set_initial_step(&mut self, step: f64);

    /// Short name for logs and reports.
    fn name(&self) -> &'static str;
}

/// Minimizer selection, as written in configuration files and on the command line.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OptimizerKind {
    /// [`Cobyla`]
    #[default]
    Cobyla,
    /// [`Spsa`]
    Spsa,
}

impl std::fmt::Display for OptimizerKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OptimizerKind::Cobyla => write!(f, "cobyla"),
            OptimizerKind::Spsa => write!(f, "spsa"),
        }
    }
}

impl std::str::FromStr for OptimizerKind {
    type Err = OptimizerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "cobyla" => Ok(OptimizerKind::Cobyla),
            "spsa" => Ok(OptimizerKind::Spsa),
            other => Err(OptimizerError::InvalidOptions(format!(
                "unknown optimizer '{other}' (expected cobyla or spsa)"
            ))),
        }
    }
}

/// Runtime-selected minimizer.
#[derive(Debug, Clone)]
pub enum AnyOptimizer {
    /// Simplex trust-region method.
    Cobyla(Cobyla),
    /// Simultaneous perturbation method.
    Spsa(Spsa),
}

impl AnyOptimizer {
    /// Default-configured minimizer of the given kind.
    pub fn from_kind(kind: OptimizerKind) -> Self {
        match kind {
            OptimizerKind::Cobyla => AnyOptimizer::Cobyla(Cobyla::default()),
            OptimizerKind::Spsa => AnyOptimizer::Spsa(Spsa::default()),
        }
    }

    /// Kind of the wrapped minimizer.
    pub fn kind(&self) -> OptimizerKind {
        match self {
            AnyOptimizer::Cobyla(_) => OptimizerKind::Cobyla,
            AnyOptimizer::Spsa(_) => OptimizerKind::Spsa,
        }
    }
}

impl Default for AnyOptimizer {
    fn default() -> Self {
        AnyOptimizer::Cobyla(Cobyla::default())
    }
}

impl Optimizer for AnyOptimizer {
    fn minimize<F, P>(
        &self,
        objective: F,
        initial: Vec<f64>,
        on_progress: P,
    ) -> Result<OptimizerOutcome, OptimizerError>
    where
        F: FnMut(&[f64]) -> f64,
        P: FnMut(&[f64]),
    {
        match self {
            AnyOptimizer::Cobyla(opt) => opt.minimize(objective, initial, on_progress),
            AnyOptimizer::Spsa(opt) => opt.minimize(objective, initial, on_progress),
        }
    }

    fn set_max_iterations(&mut self, max_iterations: usize) {
        match self {
            AnyOptimizer::Cobyla(opt) => opt.set_max_iterations(max_iterations),
            AnyOptimizer::Spsa(opt) => opt.set_max_iterations(max_iterations),
        }
    }

    fn set_initial_step(&mut self, step: f64) {
        match self {
            AnyOptimizer::Cobyla(opt) => opt.set_initial_step(step),
            AnyOptimizer::Spsa(opt) => opt.set_initial_step(step),
        }
    }

    fn name(&self) -> &'static str {
        match self {
            AnyOptimizer::Cobyla(opt) => opt.name(),
            AnyOptimizer::Spsa(opt) => opt.name(),
        }
    }
}

/// Objective wrapper that counts evaluations and rejects non-finite values.
pub(crate) struct CountedObjective<F> {
    objective: F,
    evaluations: usize,
}

impl<F> CountedObjective<F>
where
    F: FnMut(&[f64]) -> f64,
{
    pub(crate) fn new(objective: F) -> Self {
        Self {
            objective,
            evaluations: 0,
        }
    }

    pub(crate) fn call(&mut self, point: &[f64]) -> Result<f64, OptimizerError> {
        self.evaluations += 1;
        let value = (self.objective)(point);
        if value.is_finite() {
            Ok(value)
        } else {
            Err(OptimizerError::NonFiniteObjective {
                evaluation: self.evaluations,
            })
        }
    }

    pub(crate) fn evaluations(&self) -> usize {
        self.evaluations
    }
}

/// Reject settings shared by every minimizer.
pub(crate) fn check_common(
    initial: &[f64],
    maxiter: usize,
    step: f64,
) -> Result<(), OptimizerError> {
    if initial.is_empty() {
        return Err(OptimizerError::EmptyStartingPoint);
    }
    if maxiter == 0 {
        return Err(OptimizerError::InvalidOptions(
            "maxiter must be at least 1".into(),
        ));
    }
    if !(step.is_finite() && step > 0.0) {
        return Err(OptimizerError::InvalidOptions(format!(
            "initial step must be positive and finite, got {step}"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sphere(p: &[f64]) -> f64 {
        p.iter().map(|x| x * x).sum()
    }

    #[test]
    fn test_kind_parse() {
        assert_eq!("cobyla".parse::<OptimizerKind>().unwrap(), OptimizerKind::Cobyla);
        assert_eq!("SPSA".parse::<OptimizerKind>().unwrap(), OptimizerKind::Spsa);
        assert!("bfgs".parse::<OptimizerKind>().is_err());
        assert_eq!(OptimizerKind::Spsa.to_string(), "spsa");
    }

    #[test]
    fn test_any_optimizer_dispatch() {
        for kind in [OptimizerKind::Cobyla, OptimizerKind::Spsa] {
            let mut opt = AnyOptimizer::from_kind(kind);
            opt.set_max_iterations(50);
            opt.set_initial_step(0.5);
            assert_eq!(opt.kind(), kind);
            assert_eq!(opt.name(), kind.to_string());

            let mut callbacks = 0;
            let outcome = opt
                .minimize(sphere, vec![1.0, -1.0], |_| callbacks += 1)
                .unwrap();
            assert_eq!(outcome.iterations, callbacks);
            assert!(outcome.best_value < 2.0);
        }
    }

    #[test]
    fn test_counted_objective_rejects_nan() {
        let mut calls = 0;
        let mut counted = CountedObjective::new(|_: &[f64]| {
            calls += 1;
            if calls == 3 { f64::NAN } else { 1.0 }
        });
        assert!(counted.call(&[0.0]).is_ok());
        assert!(counted.call(&[0.0]).is_ok());
        assert_eq!(
            counted.call(&[0.0]),
            Err(OptimizerError::NonFiniteObjective { evaluation: 3 })
        );
        assert_eq!(counted.evaluations(), 3);
    }

    #[test]
    fn test_check_common() {
        assert_eq!(
            check_common(&[], 10, 1.0),
            Err(OptimizerError::EmptyStartingPoint)
        );
        assert!(check_common(&[0.0], 0, 1.0).is_err());
        assert!(check_common(&[0.0], 10, 0.0).is_err());
        assert!(check_common(&[0.0], 10, f64::NAN).is_err());
        assert!(check_common(&[0.0], 10, 0.5).is_ok());
    }
}
