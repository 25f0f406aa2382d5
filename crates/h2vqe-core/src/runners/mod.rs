//! Workflow runners: the VQE loop and bond-length scans.

pub mod scan;
pub mod vqe;

pub use scan::{EnergyCurve, EnergySurfaceScanner, linspace};
pub use vqe::{
    ConvergenceStats, IterationRecord, OptimizationResult, OptimizationTrace, ProgressObserver, RunStatus,
    VqeRunner, random_parameters,
};
