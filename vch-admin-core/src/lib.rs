//! Wizard state and validation core for VCH administration.
//!
//! This crate is the state-aggregation heart of the compute-capacity step of
//! the VCH configuration wizard: it loads compute-resource inventory through
//! the [`abstractions::ResourceDirectory`] contract, validates capacity
//! fields against dynamic allocation bounds, and commits a single
//! [`types::ComputeCapacityModel`] for the parent wizard to hand to the
//! provisioning pipeline. Routing, rendering and the HTTP clients live in
//! the surrounding application.

pub mod abstractions;
pub mod commit;
pub mod compute_step;
pub mod compute_tree;
pub mod config;
pub mod error;
pub mod moref;
pub mod types;
pub mod validation;

// Test helpers are exposed for integration tests
#[cfg(any(test, feature = "test-helpers"))]
pub mod test_helpers;
