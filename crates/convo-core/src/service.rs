//! The remote dialogue service seam.
//!
//! The session controller drives the service exclusively through this trait,
//! which keeps it testable against a stub and keeps the HTTP transport free
//! of session state. The single production implementation lives in
//! `convo-client`.

use std::collections::HashMap;

use async_trait::async_trait;

use crate::dialogue::{DialogueStep, OngoingDialogue};
use crate::error::Result;
use crate::server_info::ServerInfo;
use crate::user::User;
use crate::variable::Variable;

/// One asynchronous method per logical operation against the remote service.
///
/// Authenticated operations take the bearer token explicitly; the
/// implementation attaches it as the `X-Auth-Token` header and mutates no
/// shared state. Every method performs exactly one request, with no retry.
#[async_trait]
pub trait DialogueService: Send + Sync {
    /// POST /auth/login. Returns the authenticated user on success; invalid
    /// credentials surface as a `Validation` or `Unauthorized` error.
    async fn login(
        &self,
        username: &str,
        password: &str,
        token_expiration_minutes: u32,
    ) -> Result<User>;

    /// POST /auth/validate. Checks whether a previously issued token is
    /// still accepted by the service.
    async fn validate_token(&self, token: &str) -> Result<bool>;

    /// GET /info/all. Returns service metadata.
    async fn server_info(&self) -> Result<ServerInfo>;

    /// GET /admin/list-dialogues. Requires an admin token. A null or
    /// malformed-but-2xx payload maps to an empty list.
    async fn list_dialogues(&self, token: &str) -> Result<Vec<String>>;

    /// POST /dialogue/start. Starts a fresh dialogue and returns its first
    /// step.
    async fn start_dialogue(
        &self,
        token: &str,
        dialogue_name: &str,
        language: &str,
    ) -> Result<DialogueStep>;

    /// POST /dialogue/progress. Echoes the continuation tokens of the most
    /// recent step plus the chosen `reply_id`. `None` means the server
    /// considers the dialogue finished.
    async fn progress_dialogue(
        &self,
        token: &str,
        logged_dialogue_id: &str,
        logged_interaction_index: i64,
        reply_id: i64,
    ) -> Result<Option<DialogueStep>>;

    /// POST /dialogue/continue. Resumes the named dialogue where it was left
    /// off. `None` means there is nothing to resume, which callers treat the
    /// same as "dialogue already finished".
    async fn continue_dialogue(
        &self,
        token: &str,
        dialogue_name: &str,
    ) -> Result<Option<DialogueStep>>;

    /// POST /dialogue/back. Steps the dialogue back to the given interaction
    /// and returns the step at that position.
    async fn back_dialogue(
        &self,
        token: &str,
        logged_dialogue_id: &str,
        logged_interaction_index: i64,
    ) -> Result<DialogueStep>;

    /// GET /dialogue/get-ongoing. Returns a summary of the latest unfinished
    /// dialogue, if any.
    async fn get_ongoing_dialogue(&self, token: &str) -> Result<Option<OngoingDialogue>>;

    /// POST /dialogue/cancel. Cancels the identified dialogue server-side;
    /// an empty 2xx body is the only success signal.
    async fn cancel_dialogue(&self, token: &str, logged_dialogue_id: &str) -> Result<()>;

    /// GET /variables/get. Returns a full snapshot of the user's variables;
    /// an absent or empty payload maps to an empty list.
    async fn get_variables(&self, token: &str) -> Result<Vec<Variable>>;

    /// POST /variables/set-single. Sets one variable, or clears it when
    /// `value` is `None`.
    async fn set_variable(&self, token: &str, name: &str, value: Option<&str>) -> Result<()>;

    /// POST /variables/set. Sets many variables in one call from a JSON
    /// name-to-value mapping.
    async fn set_variables(&self, token: &str, variables: &HashMap<String, String>)
        -> Result<()>;
}
