//! Provides input/output functionality for the files produced by a GOLD run.
//!
//! - [`conf`] reads the experiment configuration (`gold.conf`).
//! - [`solution`] extracts the score row and comment block from a solution file.
//! - [`mol2`] reads and writes Tripos mol2 structures for the receptor and solutions.
//! - [`pdb`] reads and writes fixed-column PDB receptors.
//! - [`loader`] picks the reader from the file extension.
//! - [`traits`] defines the file-format and structure-loader interfaces.

pub mod conf;
pub mod loader;
pub mod mol2;
pub mod pdb;
pub mod solution;
pub mod traits;
