//! H2 Variational Quantum Eigensolver
//!
//! This crate estimates the ground-state energy of the hydrogen molecule with
//! a variational loop over a reduced two-qubit Hamiltonian:
//!
//! - **Hamiltonian model**: bond-length dependent coefficients of
//!   `II`, `ZZ`, `ZI` and `IZ` ([`problems`])
//! - **Ansatz**: a 2-qubit, 8-parameter hardware-efficient circuit
//!   descriptor ([`circuits`])
//! - **Energy model**: a closed-form stand-in for circuit execution
//!   ([`energy`])
//! - **Minimizers**: COBYLA and SPSA behind one trait ([`optimizers`])
//! - **Runners**: the optimization loop and bond-length scans ([`runners`])
//!
//! # Example
//!
//! ```ignore
//! use h2vqe_core::runners::VqeRunner;
//! use rand::SeedableRng;
//!
//! let mut runner = VqeRunner::new(0.735);
//! let rng = rand::rngs::StdRng::seed_from_u64(7);
//! let result = runner.run_with_rng(None, 100, rng)?;
//! println!("E = {:.6} Ha", result.best_energy);
//! ```

pub mod circuits;
pub mod config;
pub mod energy;
pub mod error;
pub mod optimizers;
pub mod problems;
pub mod runners;

pub use circuits::AnsatzDescriptor;
pub use config::{ScanConfig, VqeConfig};
pub use energy::{EnergyEvaluator, evaluate};
pub use error::{VqeError, VqeResult};
pub use optimizers::{AnyOptimizer, Cobyla, Optimizer, OptimizerError, OptimizerKind, Spsa};
pub use problems::{HamiltonianCoefficients, PauliLabel, coefficients};
pub use runners::{
    ConvergenceStats, EnergyCurve, EnergySurfaceScanner, IterationRecord, OptimizationResult, OptimizationTrace,
    ProgressObserver, RunStatus, VqeRunner,
};
