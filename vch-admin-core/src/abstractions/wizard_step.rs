use async_trait::async_trait;

use crate::commit::CommitOutcome;
use crate::error::VchResult;

/// Lifecycle hooks shared by every configuration wizard step.
///
/// Concrete steps implement this by composition; the parent wizard drives the
/// hooks and aggregates the committed sub-models into the creation payload.
#[async_trait]
pub trait WizardStep: Send {
    /// Called when the step's page becomes active. Fetches whatever the step
    /// needs to render; failures leave the step in its prior state and the
    /// hook may be re-invoked to retry.
    async fn on_page_load(&mut self) -> VchResult<()>;

    /// Validate and commit the step. Never fails with an error: an invalid
    /// form yields [`CommitOutcome::Invalid`] and the wizard stays put.
    async fn on_commit(&mut self) -> CommitOutcome;

    /// Discard transient state and return the step to its defaults.
    fn on_reset(&mut self);
}
