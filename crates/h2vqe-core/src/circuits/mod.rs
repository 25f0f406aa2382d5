//! Circuit descriptors.

pub mod ansatz;

pub use ansatz::{AnsatzDescriptor, BoundGate, Gate, NUM_PARAMETERS, NUM_QUBITS};
