//! Hardware-efficient ansatz descriptor.
//!
//! The ansatz is only described, never simulated: the energy objective in
//! [`crate::energy`] is an analytical stand-in. The descriptor reports the
//! circuit structure and binds parameter values to gates for display.
//!
//! ```text
//! q0 ─[H]─[Rz(θ₀)]─[Rx(θ₁)]─●─[Rz(θ₄)]─[Rx(θ₅)]─
//!                           │
//! q1 ─[H]─[Rz(θ₂)]─[Rx(θ₃)]─X─[Rz(θ₆)]─[Rx(θ₇)]─
//! ```

use serde::Serialize;

use crate::error::{VqeError, VqeResult};

/// Number of qubits in the H2 ansatz.
pub const NUM_QUBITS: usize = 2;

/// Number of variational parameters in the H2 ansatz.
pub const NUM_PARAMETERS: usize = 8;

/// Parameters consumed per qubit in each variational layer (Rz then Rx).
const PARAMS_PER_QUBIT_LAYER: usize = 2;

/// Number of variational layers.
const VARIATIONAL_LAYERS: usize = 2;

/// A gate in the ansatz template.
///
/// Rotation gates carry the index of the parameter they bind, not a value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Gate {
    /// Hadamard.
    H { qubit: usize },
    /// Z rotation bound to parameter `param`.
    Rz { qubit: usize, param: usize },
    /// X rotation bound to parameter `param`.
    Rx { qubit: usize, param: usize },
    /// Controlled-X.
    Cx { control: usize, target: usize },
}

impl Gate {
    /// Lowercase gate mnemonic.
    pub fn name(&self) -> &'static str {
        match self {
            Gate::H { .. } => "h",
            Gate::Rz { .. } => "rz",
            Gate::Rx { .. } => "rx",
            Gate::Cx { .. } => "cx",
        }
    }

    /// Qubits this gate acts on.
    pub fn qubits(&self) -> Vec<usize> {
        match *self {
            Gate::H { qubit } | Gate::Rz { qubit, .. } | Gate::Rx { qubit, .. } => vec![qubit],
            Gate::Cx { control, target } => vec![control, target],
        }
    }

    /// Index of the bound parameter, if this is a rotation.
    pub fn parameter(&self) -> Option<usize> {
        match *self {
            Gate::Rz { param, .. } | Gate::Rx { param, .. } => Some(param),
            Gate::H { .. } | Gate::Cx { .. } => None,
        }
    }
}

impl std::fmt::Display for Gate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match *self {
            Gate::H { qubit } => write!(f, "h q{qubit}"),
            Gate::Rz { qubit, param } => write!(f, "rz(θ{param}) q{qubit}"),
            Gate::Rx { qubit, param } => write!(f, "rx(θ{param}) q{qubit}"),
            Gate::Cx { control, target } => write!(f, "cx q{control} -> q{target}"),
        }
    }
}

/// A gate paired with its bound angle.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BoundGate {
    /// Template gate.
    pub gate: Gate,
    /// Angle in radians for rotations, `None` otherwise.
    pub angle: Option<f64>,
}

/// Structural description of a parameterized circuit.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnsatzDescriptor {
    /// Ansatz family name.
    pub name: String,
    /// Number of qubits.
    pub num_qubits: usize,
    /// Number of variational (rotation) layers.
    pub num_layers: usize,
    /// Number of parameters bound by the gates.
    pub num_parameters: usize,
    /// Gate sequence in application order.
    pub gates: Vec<Gate>,
}

impl AnsatzDescriptor {
    /// The 2-qubit, 8-parameter ansatz used for H2.
    pub fn h2() -> Self {
        Self::build(NUM_QUBITS, NUM_PARAMETERS)
    }

    /// Build a hardware-efficient ansatz.
    ///
    /// Layout: a Hadamard on every qubit, a variational layer of Rz/Rx pairs,
    /// a linear CX chain, and a second Rz/Rx layer. Parameters are consumed in
    /// order; when fewer parameters are requested than the template can hold,
    /// the trailing rotations are left out.
    ///
    /// # Parameters needed
    /// At most 4 * n_qubits
    pub fn hardware_efficient(num_qubits: usize, num_parameters: usize) -> VqeResult<Self> {
        if num_qubits == 0 {
            return Err(VqeError::InvalidAnsatz(
                "at least one qubit is required".into(),
            ));
        }
        let capacity = Self::capacity(num_qubits);
        if num_parameters > capacity {
            return Err(VqeError::ParameterCount {
                expected: capacity,
                got: num_parameters,
            });
        }
        Ok(Self::build(num_qubits, num_parameters))
    }

    /// Maximum number of parameters a hardware-efficient ansatz can bind.
    pub fn capacity(num_qubits: usize) -> usize {
        VARIATIONAL_LAYERS * PARAMS_PER_QUBIT_LAYER * num_qubits
    }

    fn build(num_qubits: usize, num_parameters: usize) -> Self {
        let mut gates = Vec::new();
        let mut param_idx = 0;

        // Initial superposition
        for qubit in 0..num_qubits {
            gates.push(Gate::H { qubit });
        }

        let rotation_layer = |gates: &mut Vec<Gate>, param_idx: &mut usize| {
            for qubit in 0..num_qubits {
                if *param_idx < num_parameters {
                    gates.push(Gate::Rz {
                        qubit,
                        param: *param_idx,
                    });
                    *param_idx += 1;
                }
                if *param_idx < num_parameters {
                    gates.push(Gate::Rx {
                        qubit,
                        param: *param_idx,
                    });
                    *param_idx += 1;
                }
            }
        };

        rotation_layer(&mut gates, &mut param_idx);

        // Entangling layer (linear connectivity)
        for qubit in 0..num_qubits.saturating_sub(1) {
            gates.push(Gate::Cx {
                control: qubit,
                target: qubit + 1,
            });
        }

        rotation_layer(&mut gates, &mut param_idx);

        Self {
            name: "hardware_efficient".to_string(),
            num_qubits,
            num_layers: VARIATIONAL_LAYERS,
            num_parameters,
            gates,
        }
    }

    /// Total number of gates.
    pub fn num_gates(&self) -> usize {
        self.gates.len()
    }

    /// Number of two-qubit gates.
    pub fn num_entangling_gates(&self) -> usize {
        self.gates
            .iter()
            .filter(|g| matches!(g, Gate::Cx { .. }))
            .count()
    }

    /// Circuit depth (longest chain of gates on any qubit).
    pub fn depth(&self) -> usize {
        let mut qubit_depth = vec![0usize; self.num_qubits];
        for gate in &self.gates {
            let qubits = gate.qubits();
            let layer = qubits.iter().map(|&q| qubit_depth[q]).max().unwrap_or(0) + 1;
            for q in qubits {
                qubit_depth[q] = layer;
            }
        }
        qubit_depth.into_iter().max().unwrap_or(0)
    }

    /// Bind parameter values to the rotation gates.
    pub fn bind(&self, params: &[f64]) -> VqeResult<Vec<BoundGate>> {
        if params.len() != self.num_parameters {
            return Err(VqeError::ParameterCount {
                expected: self.num_parameters,
                got: params.len(),
            });
        }

        Ok(self
            .gates
            .iter()
            .map(|&gate| BoundGate {
                gate,
                angle: gate.parameter().map(|idx| params[idx]),
            })
            .collect())
    }
}

impl Default for AnsatzDescriptor {
    fn default() -> Self {
        Self::h2()
    }
}

impl std::fmt::Display for AnsatzDescriptor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(
            f,
            "Ansatz '{}' ({} qubits, {} layers, {} parameters, depth {}):",
            self.name,
            self.num_qubits,
            self.num_layers,
            self.num_parameters,
            self.depth()
        )?;
        for gate in &self.gates {
            writeln!(f, "  {gate}")?;
        }
        Ok(())
    }
}
