//! Hamiltonian command implementation.

use std::path::Path;

use anyhow::Result;
use console::style;

use h2vqe_core::problems::{EXPERIMENTAL_GROUND_STATE, HamiltonianCoefficients};

use super::common::{check_bond_length, load_config, print_header, print_result, print_section};

/// Basis state labels in spectrum order.
const BASIS: [&str; 4] = ["|00⟩", "|01⟩", "|10⟩", "|11⟩"];

/// Execute the hamiltonian command.
pub fn execute(config_path: Option<&Path>, bond_length: Option<f64>) -> Result<()> {
    let config = load_config(config_path)?;
    let bond_length = bond_length.unwrap_or(config.bond_length);
    check_bond_length(bond_length);

    let coeffs = HamiltonianCoefficients::for_bond_length(bond_length);

    print_header(&format!("H2 Hamiltonian at R = {bond_length:.3} Å"));

    print_section("Pauli Terms");
    print!("{coeffs}");

    print_section("Spectrum");
    let ground = coeffs.ground_state_energy();
    for (state, energy) in BASIS.iter().zip(coeffs.spectrum()) {
        if energy == ground {
            println!("  {state}  {energy:>+.8} Ha  {}", style("ground").green());
        } else {
            println!("  {state}  {energy:>+.8} Ha");
        }
    }

    print_section("Reference");
    print_result("Model ground state", format!("{ground:.8} Ha"));
    print_result(
        "Experimental",
        format!("{EXPERIMENTAL_GROUND_STATE:.2} Ha"),
    );

    Ok(())
}
