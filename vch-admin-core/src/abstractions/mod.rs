//! Trait abstractions for the wizard's external collaborators
//!
//! The step depends on these interfaces rather than concrete service
//! implementations, so the surrounding UI layer can inject real clients and
//! tests can inject stubs.

pub mod resource_directory;
pub mod session;
pub mod wizard_step;

pub use resource_directory::*;
pub use session::*;
pub use wizard_step::*;
