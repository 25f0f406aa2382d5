//! H2 model Hamiltonian as a function of bond length.
//!
//! The coefficients are an empirical, non-physical fit: a constant identity
//! term plus Gaussian-damped Z couplings centred on the equilibrium geometry.

use super::hamiltonian::HamiltonianCoefficients;

/// Equilibrium H2 bond length in Ångströms.
pub const EQUILIBRIUM_BOND_LENGTH: f64 = 0.735;

/// Identity coefficient, independent of geometry (Hartree).
pub const IDENTITY_COEFFICIENT: f64 = -1.0523732;

/// Peak Z coupling strength at equilibrium (Hartree).
pub const Z_COUPLING: f64 = 0.39793742;

/// Gaussian damping rate of the ZZ term.
const ZZ_DAMPING: f64 = 0.1;

/// Gaussian damping rate of the single-qubit Z terms.
const Z_DAMPING: f64 = 0.05;

/// Approximate experimental H2 ground state energy (Hartree).
pub const EXPERIMENTAL_GROUND_STATE: f64 = -1.17;

/// H2 model Hamiltonian coefficients at the given bond length.
///
/// ```text
/// II = -1.0523732
/// ZZ =  0.39793742 * exp(-0.1  * (r - 0.735)^2)
/// ZI = -0.39793742 * 0.5 * exp(-0.05 * (r - 0.735)^2)
/// IZ =  ZI
/// ```
///
/// No validation is performed; zero or negative bond lengths produce finite
/// coefficients like any other input.
pub fn h2_coefficients(bond_length: f64) -> HamiltonianCoefficients {
    let displacement = bond_length - EQUILIBRIUM_BOND_LENGTH;
    let d2 = displacement.powi(2);

    let zz = Z_COUPLING * (-ZZ_DAMPING * d2).exp();
    let zi = -Z_COUPLING * 0.5 * (-Z_DAMPING * d2).exp();

    HamiltonianCoefficients {
        ii: IDENTITY_COEFFICIENT,
        zz,
        zi,
        iz: zi,
    }
}
