//! # Core Models Module
//!
//! Data structures used to represent the molecules handled by GoldView: the shared
//! receptor and every docked solution loaded for display.
//!
//! ## Key Components
//!
//! - [`atom`] - Individual atom with serial number, coordinates and display state
//! - [`residue`] - Residue (mol2 substructure) grouping atoms
//! - [`system`] - One molecule's atoms and residues with serial-number lookup
//! - [`structure`] - A loaded file: ordered molecules plus their raw text payload
//! - [`ids`] - Stable slotmap keys for atoms and residues
//!
//! ## Usage
//!
//! ```ignore
//! use goldview::core::models::{atom::Atom, system::MolecularSystem};
//!
//! let mut system = MolecularSystem::new();
//! let residue_id = system.add_residue(1, "ALA");
//! let atom = Atom::new(1, "CA", residue_id, Point3::new(0.0, 0.0, 0.0));
//! system.add_atom_to_residue(residue_id, atom);
//! ```

pub mod atom;
pub mod ids;
pub mod residue;
pub mod structure;
pub mod system;
