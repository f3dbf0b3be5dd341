//! # GoldView Core Library
//!
//! Aggregates the results of a GOLD docking experiment into a single sortable score
//! table and transfers the rotamer annotations stored in solution files back onto
//! the shared receptor structure.
//!
//! ## Architectural Philosophy
//!
//! The library follows a three-layer layout:
//!
//! - **[`core`]: The Foundation.** Stateless data models (`MolecularSystem`, `Structure`),
//!   parsers for the GOLD configuration and solution files, mol2 and PDB I/O and path
//!   utilities.
//!
//! - **[`engine`]: The Logic Core.** The stateful layer: solution discovery and
//!   indexing, the score table, the result model owning the receptor, rotamer transfer
//!   and the display cache.
//!
//! - **[`workflows`]: The Public API.** Ties `core` and `engine` together; opening an
//!   experiment from its configuration file is a single call.

pub mod core;
pub mod engine;
pub mod workflows;
