//! CLI command implementations.

pub mod circuit;
pub mod common;
pub mod hamiltonian;
pub mod run;
pub mod scan;
pub mod version;
