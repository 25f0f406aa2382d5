//! Circuit command implementation.

use console::style;

use h2vqe_core::circuits::{AnsatzDescriptor, Gate};

use super::common::{print_header, print_result, print_section};

/// Execute the circuit command.
pub fn execute() {
    let ansatz = AnsatzDescriptor::h2();

    print_header("H2 Ansatz Circuit");

    print_section("Structure");
    print_result("Type", &ansatz.name);
    print_result("Qubits", ansatz.num_qubits);
    print_result("Variational layers", ansatz.num_layers);
    print_result("Parameters", ansatz.num_parameters);
    print_result("Gates", ansatz.num_gates());
    print_result("Entangling gates", ansatz.num_entangling_gates());
    print_result("Depth", ansatz.depth());

    print_section("Layers");
    println!("  1. Hadamard on every qubit (superposition)");
    println!("  2. Rz(θ) then Rx(θ) on every qubit");
    println!("  3. CX chain (entanglement)");
    println!("  4. Rz(θ) then Rx(θ) on every qubit");

    print_section("Gate Sequence");
    for (idx, gate) in ansatz.gates.iter().enumerate() {
        let label = match gate {
            Gate::Cx { .. } => style(gate.to_string()).magenta(),
            Gate::H { .. } => style(gate.to_string()).cyan(),
            Gate::Rz { .. } | Gate::Rx { .. } => style(gate.to_string()).yellow(),
        };
        println!("  {:>2}. {}", idx + 1, label);
    }

    print_section("Diagram");
    println!("  q0 ─[H]─[Rz(θ0)]─[Rx(θ1)]─●─[Rz(θ4)]─[Rx(θ5)]─");
    println!("                            │");
    println!("  q1 ─[H]─[Rz(θ2)]─[Rx(θ3)]─X─[Rz(θ6)]─[Rx(θ7)]─");
}
