//! COBYLA (Constrained Optimization BY Linear Approximation) optimizer.
//!
//! This is a derivative-free optimization algorithm suitable for
//! variational quantum algorithms where gradients are expensive.
//!
//! The implementation is a simplex method with a bounded step (the trust
//! region radius `rho`). When the simplex collapses, the radius is halved
//! and the simplex is rebuilt around the best vertex, until `rhoend` is
//! reached.

use tracing::trace;

use super::{CountedObjective, Optimizer, OptimizerError, OptimizerOutcome, check_common};

/// COBYLA optimizer configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct Cobyla {
    /// Maximum number of iterations.
    pub maxiter: usize,
    /// Convergence tolerance on the simplex spread.
    pub tol: f64,
    /// Initial trust region radius.
    pub rhobeg: f64,
    /// Final trust region radius.
    pub rhoend: f64,
}

impl Default for Cobyla {
    fn default() -> Self {
        Self {
            maxiter: 100,
            tol: 1e-6,
            rhobeg: 1.0,
            rhoend: 1e-4,
        }
    }
}

impl Cobyla {
    /// Create a new COBYLA optimizer with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set maximum iterations.
    pub fn with_maxiter(mut self, maxiter: usize) -> Self {
        self.maxiter = maxiter;
        self
    }

    /// Set convergence tolerance.
    pub fn with_tol(mut self, tol: f64) -> Self {
        self.tol = tol;
        self
    }

    /// Set trust region parameters.
    pub fn with_trust_region(mut self, rhobeg: f64, rhoend: f64) -> Self {
        self.rhobeg = rhobeg;
        self.rhoend = rhoend;
        self
    }

    fn validate(&self, initial: &[f64]) -> Result<(), OptimizerError> {
        check_common(initial, self.maxiter, self.rhobeg)?;
        if !(self.rhoend.is_finite() && self.rhoend > 0.0) {
            return Err(OptimizerError::InvalidOptions(format!(
                "rhoend must be positive and finite, got {}",
                self.rhoend
            )));
        }
        if self.rhoend > self.rhobeg {
            return Err(OptimizerError::InvalidOptions(format!(
                "rhoend ({}) exceeds rhobeg ({})",
                self.rhoend, self.rhobeg
            )));
        }
        if !(self.tol.is_finite() && self.tol >= 0.0) {
            return Err(OptimizerError::InvalidOptions(format!(
                "tol must be non-negative, got {}",
                self.tol
            )));
        }
        Ok(())
    }
}

/// Index of the lowest value.
fn argmin(values: &[f64]) -> usize {
    values
        .iter()
        .enumerate()
        .min_by(|(_, a), (_, b)| a.total_cmp(b))
        .map_or(0, |(i, _)| i)
}

/// Simplex with one vertex at `center` and one step of `rho` along each axis.
fn build_simplex<F>(
    center: &[f64],
    f_center: f64,
    rho: f64,
    objective: &mut CountedObjective<F>,
) -> Result<(Vec<Vec<f64>>, Vec<f64>), OptimizerError>
where
    F: FnMut(&[f64]) -> f64,
{
    let n = center.len();
    let mut simplex = Vec::with_capacity(n + 1);
    let mut f_simplex = Vec::with_capacity(n + 1);
    simplex.push(center.to_vec());
    f_simplex.push(f_center);

    for i in 0..n {
        let mut point = center.to_vec();
        point[i] += rho;
        f_simplex.push(objective.call(&point)?);
        simplex.push(point);
    }
    Ok((simplex, f_simplex))
}

impl Optimizer for Cobyla {
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
        let n = initial_params.len();
        let mut f_x = objective.call(&initial_params)?;
        let mut history = vec![f_x];

        let (mut simplex, mut f_simplex) =
            build_simplex(&initial_params, f_x, self.rhobeg, &mut objective)?;

        let mut rho = self.rhobeg;
        let mut converged = false;
        let mut iterations = 0;

        while iterations < self.maxiter {
            // Sort simplex by function value
            let mut indices: Vec<usize> = (0..=n).collect();
            indices.sort_by(|&a, &b| f_simplex[a].total_cmp(&f_simplex[b]));

            let best_idx = indices[0];
            let worst_idx = indices[n];

            let spread = f_simplex[worst_idx] - f_simplex[best_idx];
            if spread < self.tol && rho <= self.rhoend {
                converged = true;
                break;
            }

            if spread < self.tol {
                // Contract trust region and rebuild around the best vertex
                rho = (rho * 0.5).max(self.rhoend);
                let best = simplex[best_idx].clone();
                let f_best = f_simplex[best_idx];
                (simplex, f_simplex) = build_simplex(&best, f_best, rho, &mut objective)?;
                trace!(rho, "trust region contracted");
            } else {
                self.step(
                    &mut simplex,
                    &mut f_simplex,
                    &indices,
                    rho,
                    &mut objective,
                )?;
            }

            let min_idx = argmin(&f_simplex);
            if f_simplex[min_idx] < f_x {
                f_x = f_simplex[min_idx];
                history.push(f_x);
            }

            iterations += 1;
            on_progress(&simplex[min_idx]);
        }

        let min_idx = argmin(&f_simplex);
        if f_simplex[min_idx] < f_x {
            history.push(f_simplex[min_idx]);
        }

        Ok(OptimizerOutcome {
            best_value: f_simplex[min_idx],
            best_point: simplex[min_idx].clone(),
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
        self.rhobeg = step;
    }

    fn name(&self) -> &'static str {
        "cobyla"
    }
}

impl Cobyla {
    /// One reflect / expand / contract / shrink step on the worst vertex.
    fn step<F>(
        &self,
        simplex: &mut [Vec<f64>],
        f_simplex: &mut [f64],
        indices: &[usize],
        rho: f64,
        objective: &mut CountedObjective<F>,
    ) -> Result<(), OptimizerError>
    where
        F: FnMut(&[f64]) -> f64,
    {
        let n = indices.len() - 1;
        let best_idx = indices[0];
        let second_worst_idx = indices[n - 1];
        let worst_idx = indices[n];

        // Centroid of all points except the worst
        let mut centroid = vec![0.0; n];
        for &idx in &indices[..n] {
            for (c, v) in centroid.iter_mut().zip(&simplex[idx]) {
                *c += v;
            }
        }
        for c in &mut centroid {
            *c /= n as f64;
        }

        // Reflection, bounded by the trust region
        let reflected: Vec<f64> = centroid
            .iter()
            .zip(&simplex[worst_idx])
            .map(|(c, w)| {
                let diff = c - w;
                if diff.abs() > rho {
                    c + rho * diff.signum()
                } else {
                    c + diff
                }
            })
            .collect();
        let f_reflected = objective.call(&reflected)?;

        if f_reflected < f_simplex[best_idx] {
            // Expansion
            let expanded: Vec<f64> = centroid
                .iter()
                .zip(&reflected)
                .map(|(c, r)| c + 2.0 * (r - c))
                .collect();
            let f_expanded = objective.call(&expanded)?;

            if f_expanded < f_reflected {
                simplex[worst_idx] = expanded;
                f_simplex[worst_idx] = f_expanded;
            } else {
                simplex[worst_idx] = reflected;
                f_simplex[worst_idx] = f_reflected;
            }
        } else if f_reflected < f_simplex[second_worst_idx] {
            simplex[worst_idx] = reflected;
            f_simplex[worst_idx] = f_reflected;
        } else {
            // Contraction
            let contracted: Vec<f64> = centroid
                .iter()
                .zip(&simplex[worst_idx])
                .map(|(c, w)| 0.5 * (c + w))
                .collect();
            let f_contracted = objective.call(&contracted)?;

            if f_contracted < f_simplex[worst_idx] {
                simplex[worst_idx] = contracted;
                f_simplex[worst_idx] = f_contracted;
            } else {
                // Shrink towards the best vertex
                let best = simplex[best_idx].clone();
                for i in 0..=n {
                    if i == best_idx {
                        continue;
                    }
                    for (v, b) in simplex[i].iter_mut().zip(&best) {
                        *v = 0.5 * (b + *v);
                    }
                    f_simplex[i] = objective.call(&simplex[i])?;
                }
            }
        }
        Ok(())
    }
}
