//! Problem definitions: the reduced H2 Hamiltonian.

pub mod hamiltonian;
pub mod molecules;

pub use hamiltonian::{HamiltonianCoefficients, PauliLabel};
pub use molecules::{
    EQUILIBRIUM_BOND_LENGTH, EXPERIMENTAL_GROUND_STATE, IDENTITY_COEFFICIENT, Z_COUPLING,
    h2_coefficients,
};

/// Hamiltonian coefficients for the given bond length.
///
/// Shorthand for [`HamiltonianCoefficients::for_bond_length`].
pub fn coefficients(bond_length: f64) -> HamiltonianCoefficients {
    HamiltonianCoefficients::for_bond_length(bond_length)
}
