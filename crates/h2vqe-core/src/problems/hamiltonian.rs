//! Reduced two-qubit Hamiltonian representation.
//!
//! The effective H2 Hamiltonian is a weighted sum of four commuting Pauli
//! strings:
//! H = c_II I⊗I + c_ZZ Z⊗Z + c_ZI Z⊗I + c_IZ I⊗Z
//!
//! Every term is diagonal in the computational basis, so the spectrum can be
//! read off directly without diagonalisation.

use serde::{Deserialize, Serialize};

use super::molecules::h2_coefficients;

/// Label of one of the four Pauli strings in the reduced Hamiltonian.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PauliLabel {
    /// Identity on both qubits.
    II,
    /// Z on both qubits.
    ZZ,
    /// Z on qubit 0, identity on qubit 1.
    ZI,
    /// Identity on qubit 0, Z on qubit 1.
    IZ,
}

impl PauliLabel {
    /// All labels in canonical order.
    pub const ALL: [PauliLabel; 4] = [
        PauliLabel::II,
        PauliLabel::ZZ,
        PauliLabel::ZI,
        PauliLabel::IZ,
    ];

    /// Get the name of this Pauli string.
    pub fn name(&self) -> &'static str {
        match self {
            PauliLabel::II => "II",
            PauliLabel::ZZ => "ZZ",
            PauliLabel::ZI => "ZI",
            PauliLabel::IZ => "IZ",
        }
    }

    /// Eigenvalue of this string on the basis state `|q0 q1⟩`.
    ///
    /// `q0` and `q1` are the bit values (false = |0⟩, true = |1⟩).
    pub fn eigenvalue(&self, q0: bool, q1: bool) -> f64 {
        let z = |bit: bool| if bit { -1.0 } else { 1.0 };
        match self {
            PauliLabel::II => 1.0,
            PauliLabel::ZZ => z(q0) * z(q1),
            PauliLabel::ZI => z(q0),
            PauliLabel::IZ => z(q1),
        }
    }
}

impl std::fmt::Display for PauliLabel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Coefficients of the reduced H2 Hamiltonian at one geometry.
///
/// Values are fully determined by the bond length they were computed for and
/// are never cached; ask [`HamiltonianCoefficients::for_bond_length`] again
/// for a different geometry.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HamiltonianCoefficients {
    /// Identity coefficient (Hartree).
    pub ii: f64,
    /// Z⊗Z coefficient (Hartree).
    pub zz: f64,
    /// Z⊗I coefficient (Hartree).
    pub zi: f64,
    /// I⊗Z coefficient (Hartree).
    pub iz: f64,
}

impl HamiltonianCoefficients {
    /// Compute the coefficients for the given bond length in Ångströms.
    ///
    /// Any real input is accepted, including non-physical values.
    pub fn for_bond_length(bond_length: f64) -> Self {
        h2_coefficients(bond_length)
    }

    /// Get the coefficient for a label.
    pub fn get(&self, label: PauliLabel) -> f64 {
        match label {
            PauliLabel::II => self.ii,
            PauliLabel::ZZ => self.zz,
            PauliLabel::ZI => self.zi,
            PauliLabel::IZ => self.iz,
        }
    }

    /// Iterate over `(label, coefficient)` pairs in canonical order.
    pub fn iter(&self) -> impl Iterator<Item = (PauliLabel, f64)> + '_ {
        PauliLabel::ALL.iter().map(move |&label| (label, self.get(label)))
    }

    /// Diagonal entries of the Hamiltonian in basis order |00⟩, |01⟩, |10⟩, |11⟩.
    ///
    /// Basis index `i` encodes `q0` as the high bit, matching the label order
    /// of `ZI` (qubit 0) and `IZ` (qubit 1).
    pub fn spectrum(&self) -> [f64; 4] {
        let mut energies = [0.0; 4];
        for (index, energy) in energies.iter_mut().enumerate() {
            let q0 = index & 0b10 != 0;
            let q1 = index & 0b01 != 0;
            *energy = self
                .iter()
                .map(|(label, coeff)| coeff * label.eigenvalue(q0, q1))
                .sum();
        }
        energies
    }

    /// Exact ground state energy of the reduced model.
    pub fn ground_state_energy(&self) -> f64 {
        self.spectrum().into_iter().fold(f64::INFINITY, f64::min)
    }
}

impl std::fmt::Display for HamiltonianCoefficients {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Hamiltonian (4 terms, 2 qubits):")?;
        for (label, coeff) in self.iter() {
            if coeff >= 0.0 {
                writeln!(f, "  +{coeff:.8} {label}")?;
            } else {
                writeln!(f, "  {coeff:.8} {label}")?;
            }
        }
        Ok(())
    }
}
