//! # Engine Module
//!
//! This module turns a parsed GOLD configuration into a browsable result set and drives
//! the viewer-facing operations on it.
//!
//! ## Overview
//!
//! Discovery resolves the configuration's solution patterns to files, parses each
//! file's score row and comment block, and assembles them into a [`table::ScoreTable`].
//! The [`model::ResultModel`] owns that table together with the metadata comments and
//! the optional shared receptor. The [`display::DisplayCoordinator`] loads solution
//! structures on demand and transfers their rotamer annotations onto the receptor.
//!
//! ## Architecture
//!
//! - **Configuration** ([`config`]) - Discovery settings such as the schema policy
//! - **Discovery** ([`indexer`]) - Pattern resolution, deduplication and parsing
//! - **Score Table** ([`table`]) - Typed rows, explicit schema, sorting and CSV export
//! - **Result Model** ([`model`]) - Ownership of table, metadata and receptor
//! - **Rotamers** ([`rotamers`]) - Coordinate transfer from solution annotations
//! - **Display** ([`display`]) - Structure cache and displayed set
//! - **Progress Monitoring** ([`progress`]) - Callbacks towards the user interface
//! - **Error Handling** ([`error`]) - Engine-specific error types

pub mod config;
pub mod display;
pub mod error;
#[cfg(test)]
pub(crate) mod fixtures;
pub mod indexer;
pub mod model;
pub mod progress;
pub mod rotamers;
pub mod table;
