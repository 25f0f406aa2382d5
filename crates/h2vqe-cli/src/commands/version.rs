//! Version command implementation.

use console::style;

/// Execute the version command.
pub fn execute() {
    let version = env!("CARGO_PKG_VERSION");

    println!(
        "{} {} - variational ground-state energy estimation for H2",
        style("h2vqe").cyan().bold(),
        style(format!("v{version}")).yellow()
    );
    println!();
    println!("Components:");
    println!("  h2vqe-core  Hamiltonian model, energy objective, minimizers, runners");
    println!("  h2vqe-cli   Command-line interface");
    println!();
    println!("License:    {}", style("Apache-2.0").dim());
}
