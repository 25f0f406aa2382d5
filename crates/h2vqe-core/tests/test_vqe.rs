//! End-to-end tests for the H2 VQE workflow.

use approx::assert_relative_eq;
use rand::SeedableRng;
use rand::rngs::StdRng;

use h2vqe_core::circuits::AnsatzDescriptor;
use h2vqe_core::optimizers::{AnyOptimizer, OptimizerError, OptimizerKind, Spsa};
use h2vqe_core::problems::{EQUILIBRIUM_BOND_LENGTH, coefficients};
use h2vqe_core::runners::{EnergySurfaceScanner, RunStatus, VqeRunner, linspace};
use h2vqe_core::{VqeConfig, VqeError, evaluate};

// ---------------------------------------------------------------------------
// Hamiltonian and energy model
// ---------------------------------------------------------------------------

#[test]
fn equilibrium_coefficients() {
    let h = coefficients(EQUILIBRIUM_BOND_LENGTH);
    assert_eq!(h.ii, -1.0523732);
    assert_relative_eq!(h.zz, 0.39793742);
    assert_relative_eq!(h.zi, -0.19896871);
    assert_relative_eq!(h.iz, -0.19896871);
}

#[test]
fn zero_parameter_energy_at_equilibrium() {
    let energy = evaluate(&[0.0; 8], &coefficients(0.735)).unwrap();
    assert_relative_eq!(energy, -1.0523732 + (-0.19896871 * 0.2), epsilon = 1e-12);
}

#[test]
fn single_parameter_energy() {
    let h = coefficients(1.0);
    let x: f64 = 0.4;
    let expected = h.ii
        + h.zz * (0.3 * 0.1f64.cos() * x.sin())
        + h.zi * (0.2 * x.cos())
        + h.iz * 0.1
        + 0.001 * x.sin();
    assert_relative_eq!(evaluate(&[x], &h).unwrap(), expected, epsilon = 1e-14);
}

#[test]
fn empty_parameters_are_rejected() {
    assert!(matches!(
        evaluate(&[], &coefficients(0.735)),
        Err(VqeError::EmptyParameters)
    ));
}

#[test]
fn spectrum_reference() {
    let h = coefficients(EQUILIBRIUM_BOND_LENGTH);
    let min = h.spectrum().into_iter().fold(f64::INFINITY, f64::min);
    assert_eq!(min, h.ground_state_energy());
    // |01⟩ and |10⟩ are degenerate since ZI == IZ
    assert_relative_eq!(min, h.ii - h.zz, epsilon = 1e-12);
    assert_relative_eq!(h.spectrum()[1], h.spectrum()[2], epsilon = 1e-12);
}

#[test]
fn ansatz_shape() {
    let ansatz = AnsatzDescriptor::h2();
    assert_eq!(ansatz.num_qubits, 2);
    assert_eq!(ansatz.num_parameters, 8);
    assert_eq!(ansatz.num_gates(), 11);
    assert_eq!(ansatz.depth(), 6);
}

// ---------------------------------------------------------------------------
// Optimization loop
// ---------------------------------------------------------------------------

#[test]
fn minimal_budget_run() {
    let mut runner = VqeRunner::new(EQUILIBRIUM_BOND_LENGTH);
    let result = runner.run(Some(vec![0.0; 8]), 1).unwrap();

    assert!(!runner.trace().is_empty());
    assert!(runner.trace().len() <= result.evaluations);
    assert_eq!(runner.trace().len(), runner.iteration_count());
}

#[test]
fn optimization_lowers_energy() {
    let mut runner = VqeRunner::new(EQUILIBRIUM_BOND_LENGTH);
    let result = runner
        .run_with_rng(None, 100, StdRng::seed_from_u64(2024))
        .unwrap();

    assert!(result.best_energy < result.initial_energy);
    assert!(matches!(
        result.status,
        RunStatus::Converged | RunStatus::IterationLimitReached
    ));
    assert_eq!(runner.best(), Some(&result));
}

#[test]
fn invalid_budget_fails_fast() {
    let mut runner = VqeRunner::new(EQUILIBRIUM_BOND_LENGTH);
    assert!(matches!(
        runner.run(None, 0),
        Err(VqeError::InvalidIterationBudget(0))
    ));
    assert!(runner.trace().is_empty());
}

#[test]
fn optimizer_failure_propagates() {
    let spsa = Spsa::new().with_gains(0.1, -1.0);
    let mut runner = VqeRunner::with_optimizer(EQUILIBRIUM_BOND_LENGTH, spsa);
    let err = runner.run(Some(vec![0.1; 8]), 5).unwrap_err();
    assert!(matches!(
        err,
        VqeError::Optimizer(OptimizerError::InvalidOptions(_))
    ));
    assert_eq!(runner.status(), RunStatus::Idle);
}

#[test]
fn optimizers_are_interchangeable() {
    for kind in [OptimizerKind::Cobyla, OptimizerKind::Spsa] {
        let mut runner =
            VqeRunner::with_optimizer(EQUILIBRIUM_BOND_LENGTH, AnyOptimizer::from_kind(kind))
                .with_initial_step(0.5);
        let result = runner
            .run_with_rng(None, 20, StdRng::seed_from_u64(9))
            .unwrap();
        assert_eq!(result.iterations, runner.trace().len());
        assert!(result.best_energy.is_finite());
    }
}

#[test]
fn config_driven_run() {
    let config = VqeConfig::from_yaml_str("bond_length: 1.0\nmax_iterations: 15\n").unwrap();
    let mut runner = VqeRunner::from_config(&config).unwrap();
    let result = runner
        .run_with_rng(None, config.max_iterations, StdRng::seed_from_u64(1))
        .unwrap();
    assert_eq!(result.bond_length, 1.0);
    assert!(result.iterations <= 15);
}

// ---------------------------------------------------------------------------
// Scans
// ---------------------------------------------------------------------------

#[test]
fn scan_shape_and_values() {
    let grid = linspace(0.3, 2.0, 15).unwrap();
    let curve = EnergySurfaceScanner::new().scan(&grid);

    assert_eq!(curve.bond_lengths.len(), 15);
    assert_eq!(curve.energies.len(), 15);
    assert_eq!(curve.bond_lengths, grid);
    for (r, e) in curve.points() {
        assert_eq!(e, evaluate(&[0.5; 8], &coefficients(r)).unwrap());
    }
}

#[test]
fn scan_is_repeatable_and_keeps_parameters() {
    let scanner = EnergySurfaceScanner::new();
    let grid = [0.5, 1.0, 1.5];

    let first = scanner.scan(&grid);
    assert_eq!(scanner.parameters(), &[0.5; 8]);
    assert_eq!(scanner.scan(&grid), first);
    assert_eq!(scanner, EnergySurfaceScanner::new());
}

#[test]
fn relaxed_scan_leaves_template_idle() {
    let template = VqeRunner::new(1.25).with_initial_step(0.5);
    let grid = [0.6, 0.9];
    let scanner = EnergySurfaceScanner::new();

    let first = scanner
        .relaxed_scan(&grid, &template, 5, StdRng::seed_from_u64(21))
        .unwrap();
    let second = scanner
        .relaxed_scan(&grid, &template, 5, StdRng::seed_from_u64(21))
        .unwrap();

    assert_eq!(first, second);
    assert_eq!(template.bond_length(), 1.25);
    assert_eq!(template.status(), RunStatus::Idle);
    assert!(template.trace().is_empty());
    assert!(template.best().is_none());
}

#[test]
fn result_serializes() {
    let mut runner = VqeRunner::new(EQUILIBRIUM_BOND_LENGTH);
    let result = runner.run(Some(vec![0.3; 8]), 3).unwrap();

    let json = serde_json::to_value(&result).unwrap();
    assert_eq!(json["bond_length"], 0.735);
    assert_eq!(json["status"], "IterationLimitReached");

    let trace = serde_json::to_value(runner.trace()).unwrap();
    assert_eq!(trace.as_array().map(Vec::len), Some(runner.trace().len()));
}
