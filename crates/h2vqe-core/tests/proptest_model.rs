//! Property-based tests for the Hamiltonian and energy model.

use h2vqe_core::evaluate;
use h2vqe_core::problems::coefficients;
use h2vqe_core::runners::{EnergySurfaceScanner, linspace};
use proptest::prelude::*;

fn arb_parameters() -> impl Strategy<Value = Vec<f64>> {
    prop::collection::vec(-10.0_f64..10.0, 1..=12)
}

proptest! {
    #[test]
    fn single_z_terms_are_equal(r in -5.0_f64..10.0) {
        let h = coefficients(r);
        prop_assert_eq!(h.zi, h.iz);
    }

    #[test]
    fn identity_term_is_constant(r in -5.0_f64..10.0) {
        prop_assert_eq!(coefficients(r).ii, -1.0523732);
    }

    #[test]
    fn coefficients_peak_at_equilibrium(r in -5.0_f64..10.0) {
        let h = coefficients(r);
        let eq = coefficients(0.735);
        prop_assert!(h.zz <= eq.zz);
        prop_assert!(h.zi >= eq.zi);
    }

    #[test]
    fn evaluate_is_deterministic(params in arb_parameters(), r in 0.1_f64..3.0) {
        let h = coefficients(r);
        let a = evaluate(&params, &h).unwrap();
        let b = evaluate(&params, &h).unwrap();
        prop_assert_eq!(a.to_bits(), b.to_bits());
    }

    #[test]
    fn energy_is_bounded(params in arb_parameters(), r in 0.1_f64..3.0) {
        let h = coefficients(r);
        let e = evaluate(&params, &h).unwrap();
        // |⟨P⟩| ≤ 0.3 for every modelled term, plus the ripple
        let bound = 0.3 * (h.zz.abs() + h.zi.abs() + h.iz.abs()) + 0.001;
        prop_assert!((e - h.ii).abs() <= bound + 1e-12);
    }

    #[test]
    fn ground_state_is_spectrum_minimum(r in -5.0_f64..10.0) {
        let h = coefficients(r);
        let spectrum = h.spectrum();
        prop_assert!(spectrum.iter().all(|&e| e >= h.ground_state_energy()));
        prop_assert!(spectrum.contains(&h.ground_state_energy()));
    }

    #[test]
    fn scan_matches_direct_evaluation(start in 0.1_f64..1.0, stop in 1.0_f64..3.0, points in 2_usize..30) {
        let grid = linspace(start, stop, points).unwrap();
        let curve = EnergySurfaceScanner::new().scan(&grid);
        prop_assert_eq!(curve.len(), points);
        for (r, e) in curve.points() {
            prop_assert_eq!(e, evaluate(&[0.5; 8], &coefficients(r)).unwrap());
        }
    }
}
