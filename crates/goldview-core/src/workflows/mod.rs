//! # Workflows Module
//!
//! High-level entry points that run a complete GoldView task in one call.
//!
//! ## Overview
//!
//! Workflows own the sequencing: reading the experiment configuration, discovering and
//! parsing its solutions, and loading the shared receptor. They report each phase
//! through a [`ProgressReporter`](crate::engine::progress::ProgressReporter) so that a
//! front end can display progress without knowing the steps involved.
//!
//! - **Open Workflow** ([`open`]) - Builds a [`ResultModel`](crate::engine::model::ResultModel)
//!   from a `gold.conf` path.

pub mod open;
