//! # Core Module
//!
//! Fundamental building blocks shared by the rest of the library.
//!
//! - **Molecular Representation** ([`models`]) - atoms, residues, systems and loaded structures
//! - **File I/O** ([`io`]) - GOLD configuration files, solution files and Tripos mol2
//! - **Utilities** ([`utils`]) - path normalisation and common-prefix resolution

pub mod io;
pub mod models;
pub mod utils;
