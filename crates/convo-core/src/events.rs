//! Named outcome events emitted by the session controller.

use crate::dialogue::{DialogueStep, OngoingDialogue};
use crate::error::ClientError;
use crate::server_info::ServerInfo;
use crate::user::User;
use crate::variable::Variable;

/// Callbacks for an external UI controller to bind to.
///
/// One named method per outcome; every method has a no-op default so
/// implementers bind only what they render. The session controller holds a
/// reference to an implementer rather than being subclassed by it, and makes
/// no assumption about how or whether outcomes are displayed.
///
/// Callbacks are invoked synchronously from session controller methods, on
/// the caller's task; implementations must not block.
#[allow(unused_variables)]
pub trait SessionEventHandler: Send + Sync {
    // ----- authentication -----

    fn on_login_success(&self, user: &User) {}
    fn on_login_error(&self, error: &ClientError) {}
    /// A restored token was confirmed valid.
    fn on_auth_validated(&self, user: &User) {}
    /// A restored token was rejected; the caller should purge any persisted
    /// credentials it manages itself.
    fn on_auth_invalidated(&self) {}
    /// An authenticated call came back 401. The session has already dropped
    /// its user; a UI typically returns to its login prompt.
    fn on_unauthorized(&self) {}

    // ----- service information -----

    fn on_server_info(&self, info: &ServerInfo) {}
    fn on_server_info_error(&self, error: &ClientError) {}

    // ----- dialogue lifecycle -----

    fn on_dialogue_list(&self, dialogue_names: &[String]) {}
    fn on_dialogue_list_error(&self, error: &ClientError) {}

    fn on_dialogue_started(&self, step: &DialogueStep) {}
    fn on_dialogue_start_error(&self, error: &ClientError) {}

    /// `continues` is false when the server signalled completion with a null
    /// step. A non-null step with zero replies also completes the dialogue;
    /// the step is passed through so a UI can render the two cases
    /// differently.
    fn on_dialogue_progressed(&self, continues: bool, step: Option<&DialogueStep>) {}
    fn on_dialogue_progress_error(&self, error: &ClientError) {}

    /// `None` means there was nothing to resume.
    fn on_dialogue_continued(&self, step: Option<&DialogueStep>) {}
    fn on_dialogue_continue_error(&self, error: &ClientError) {}

    fn on_dialogue_back(&self, step: &DialogueStep) {}
    fn on_dialogue_back_error(&self, error: &ClientError) {}

    fn on_ongoing_dialogue(&self, ongoing: Option<&OngoingDialogue>) {}
    fn on_ongoing_dialogue_error(&self, error: &ClientError) {}

    fn on_dialogue_cancelled(&self) {}
    fn on_dialogue_cancel_error(&self, error: &ClientError) {}

    // ----- variables -----

    fn on_variables(&self, variables: &[Variable]) {}
    fn on_variables_error(&self, error: &ClientError) {}

    fn on_variable_set(&self, name: &str) {}
    fn on_variable_set_error(&self, error: &ClientError) {}
}

/// Handler that ignores every event. Useful for headless callers that only
/// consume the returned values.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopEventHandler;

impl SessionEventHandler for NoopEventHandler {}
