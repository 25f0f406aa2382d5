//! Analytical energy model for the H2 ansatz.
//!
//! Stands in for circuit simulation: the expectation values of the three
//! non-identity Pauli strings are modelled as trigonometric functions of the
//! ansatz parameters, plus a small deterministic ripple term.

use crate::error::{VqeError, VqeResult};
use crate::problems::HamiltonianCoefficients;

/// Amplitude of the modelled ⟨ZZ⟩.
const ZZ_AMPLITUDE: f64 = 0.3;
/// Amplitude of the modelled ⟨ZI⟩ and ⟨IZ⟩.
const SINGLE_Z_AMPLITUDE: f64 = 0.2;
/// Fallback used when too few parameters are supplied.
const FALLBACK_EXPECTATION: f64 = 0.1;
/// Amplitude of the ripple term.
const RIPPLE_AMPLITUDE: f64 = 0.001;
/// Number of leading parameters entering the ⟨ZZ⟩ product.
const PRODUCT_WINDOW: usize = 4;

/// Modelled expectation values of the non-identity Pauli strings.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Expectations {
    /// ⟨Z⊗Z⟩
    pub zz: f64,
    /// ⟨Z⊗I⟩
    pub zi: f64,
    /// ⟨I⊗Z⟩
    pub iz: f64,
}

impl Expectations {
    /// Model the expectation values for a parameter vector.
    pub fn model(parameters: &[f64]) -> Self {
        let param_sum: f64 = parameters.iter().sum();
        let param_prod = if parameters.len() >= PRODUCT_WINDOW {
            parameters[..PRODUCT_WINDOW].iter().product()
        } else {
            FALLBACK_EXPECTATION
        };

        let zi = parameters
            .first()
            .map_or(FALLBACK_EXPECTATION, |p| SINGLE_Z_AMPLITUDE * p.cos());
        let iz = parameters
            .get(1)
            .map_or(FALLBACK_EXPECTATION, |p| SINGLE_Z_AMPLITUDE * p.sin());

        Self {
            zz: ZZ_AMPLITUDE * param_prod.cos() * param_sum.sin(),
            zi,
            iz,
        }
    }
}

/// Energy of the ansatz state for the given parameters.
///
/// Returns [`VqeError::EmptyParameters`] when `parameters` is empty.
pub fn evaluate(parameters: &[f64], coeffs: &HamiltonianCoefficients) -> VqeResult<f64> {
    if parameters.is_empty() {
        return Err(VqeError::EmptyParameters);
    }
    Ok(energy_unchecked(parameters, coeffs))
}

/// Energy without the emptiness check, for use inside objective closures
/// where the starting point has already been validated.
pub(crate) fn energy_unchecked(parameters: &[f64], coeffs: &HamiltonianCoefficients) -> f64 {
    let exp = Expectations::model(parameters);
    let ripple: f64 = parameters
        .iter()
        .enumerate()
        .map(|(i, p)| p * (i + 1) as f64)
        .sum();

    coeffs.ii
        + coeffs.zz * exp.zz
        + coeffs.zi * exp.zi
        + coeffs.iz * exp.iz
        + RIPPLE_AMPLITUDE * ripple.sin()
}

/// Evaluator bound to one set of Hamiltonian coefficients.
#[derive(Debug, Clone, Copy)]
pub struct EnergyEvaluator {
    coeffs: HamiltonianCoefficients,
    bond_length: f64,
}

impl EnergyEvaluator {
    /// Evaluator for the H2 Hamiltonian at `bond_length` (Ångström).
    pub fn new(bond_length: f64) -> Self {
        Self {
            coeffs: HamiltonianCoefficients::for_bond_length(bond_length),
            bond_length,
        }
    }

    /// Bond length the coefficients were computed for.
    pub fn bond_length(&self) -> f64 {
        self.bond_length
    }

    /// Hamiltonian coefficients in use.
    pub fn coefficients(&self) -> &HamiltonianCoefficients {
        &self.coeffs
    }

    /// Energy for `parameters`.
    pub fn evaluate(&self, parameters: &[f64]) -> VqeResult<f64> {
        evaluate(parameters, &self.coeffs)
    }

    pub(crate) fn energy(&self, parameters: &[f64]) -> f64 {
        energy_unchecked(parameters, &self.coeffs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::problems::{EQUILIBRIUM_BOND_LENGTH, coefficients};
    use approx::assert_relative_eq;

    #[test]
    fn test_zero_parameters_at_equilibrium() {
        let coeffs = coefficients(EQUILIBRIUM_BOND_LENGTH);
        let energy = evaluate(&[0.0; 8], &coeffs).unwrap();

        // Only ⟨ZI⟩ = 0.2 survives
        assert_relative_eq!(energy, -1.0523732 + coeffs.zi * 0.2, epsilon = 1e-12);
        assert_relative_eq!(energy, -1.092166942, epsilon = 1e-9);
    }

    #[test]
    fn test_single_parameter_fallbacks() {
        let exp = Expectations::model(&[0.7]);
        assert_relative_eq!(exp.zi, 0.2 * 0.7f64.cos());
        assert_relative_eq!(exp.iz, 0.1);
        assert_relative_eq!(exp.zz, 0.3 * 0.1f64.cos() * 0.7f64.sin());
    }

    #[test]
    fn test_three_parameters_use_fallback_product() {
        let params = [0.1, 0.2, 0.3];
        let exp = Expectations::model(&params);
        assert_relative_eq!(exp.zz, 0.3 * 0.1f64.cos() * 0.6f64.sin(), epsilon = 1e-12);
        assert_relative_eq!(exp.iz, 0.2 * 0.2f64.sin());
    }

    #[test]
    fn test_product_uses_first_four() {
        let params = [0.5, 0.5, 2.0, 2.0, 9.0];
        let exp = Expectations::model(&params);
        let sum: f64 = params.iter().sum();
        assert_relative_eq!(exp.zz, 0.3 * 1.0f64.cos() * sum.sin(), epsilon = 1e-12);
    }

    #[test]
    fn test_ripple_term() {
        let coeffs = coefficients(1.0);
        let params = [0.3, -0.4];
        let exp = Expectations::model(&params);
        let expected = coeffs.ii
            + coeffs.zz * exp.zz
            + coeffs.zi * exp.zi
            + coeffs.iz * exp.iz
            + 0.001 * (0.3 * 1.0 - 0.4 * 2.0f64).sin();
        assert_relative_eq!(evaluate(&params, &coeffs).unwrap(), expected, epsilon = 1e-14);
    }

    #[test]
    fn test_empty_parameters_rejected() {
        let coeffs = coefficients(EQUILIBRIUM_BOND_LENGTH);
        assert!(matches!(
            evaluate(&[], &coeffs),
            Err(VqeError::EmptyParameters)
        ));
    }

    #[test]
    fn test_deterministic() {
        let evaluator = EnergyEvaluator::new(0.9);
        let params = [0.5, 1.5, -2.0, 0.25, 3.0, 0.0, 1.0, 2.0];
        let a = evaluator.evaluate(&params).unwrap();
        let b = evaluator.evaluate(&params).unwrap();
        assert_eq!(a.to_bits(), b.to_bits());
        assert_eq!(a.to_bits(), evaluator.energy(&params).to_bits());
    }

    #[test]
    fn test_evaluator_tracks_bond_length() {
        let evaluator = EnergyEvaluator::new(1.4);
        assert_eq!(evaluator.bond_length(), 1.4);
        assert_eq!(*evaluator.coefficients(), coefficients(1.4));
    }
}
