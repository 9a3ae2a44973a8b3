//! Session controller.
//!
//! Sequences the remote operations into user-facing state transitions, owns
//! the authenticated-user context and exposes named outcome events for an
//! external UI to bind to. No operation is retried automatically; every
//! failure is surfaced as an event with enough structured detail for the
//! caller to decide on retry. The only state the controller clears on its
//! own is the current user, and only upon a confirmed-unauthorized outcome.

use std::collections::HashMap;
use std::sync::Arc;

use convo_core::credentials::{self, CredentialStore};
use convo_core::dialogue::{DialogueStep, OngoingDialogue};
use convo_core::error::{ClientError, Result};
use convo_core::events::SessionEventHandler;
use convo_core::server_info::ServerInfo;
use convo_core::service::DialogueService;
use convo_core::user::User;
use convo_core::variable::Variable;

/// The session lifecycle states.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// No user held (initial state)
    Anonymous,
    /// A restored user's token is being checked
    PendingTokenValidation,
    /// A user is held; its token is assumed valid until told otherwise
    Authenticated,
    /// Authenticated, with a current step that still offers replies
    DialogueActive,
    /// Authenticated; the last known step was null or had zero replies
    DialogueComplete,
}

/// Drives one dialogue session at a time against a [`DialogueService`].
///
/// The controller is the sole writer of the user/token field; the service
/// reads the token on every authenticated call. One outstanding request per
/// logical operation: callers that want response ordering must serialize
/// their own calls.
pub struct SessionController {
    service: Arc<dyn DialogueService>,
    events: Arc<dyn SessionEventHandler>,
    store: Option<Arc<dyn CredentialStore>>,
    state: SessionState,
    user: Option<User>,
    server_info: Option<ServerInfo>,
}

impl SessionController {
    /// Creates a controller in the `Anonymous` state.
    pub fn new(service: Arc<dyn DialogueService>, events: Arc<dyn SessionEventHandler>) -> Self {
        Self {
            service,
            events,
            store: None,
            state: SessionState::Anonymous,
            user: None,
            server_info: None,
        }
    }

    /// Attaches a credential store. Successful logins are persisted to it,
    /// and it is wiped on logout or invalidation.
    pub fn with_credential_store(mut self, store: Arc<dyn CredentialStore>) -> Self {
        self.store = Some(store);
        self
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn user(&self) -> Option<&User> {
        self.user.as_ref()
    }

    pub fn server_info(&self) -> Option<&ServerInfo> {
        self.server_info.as_ref()
    }

    pub fn is_authenticated(&self) -> bool {
        self.user.is_some()
    }

    // ----- authentication -----

    /// Logs in against `/auth/login`. On success the controller holds the
    /// returned user, persists it, and becomes `Authenticated`. Invalid
    /// credentials (a 400/401 outcome) leave the session anonymous and emit
    /// a login error carrying the envelope detail.
    pub async fn login(
        &mut self,
        username: &str,
        password: &str,
        token_expiration_minutes: u32,
    ) -> Result<User> {
        match self
            .service
            .login(username, password, token_expiration_minutes)
            .await
        {
            Ok(user) => {
                tracing::info!("[Session] Logged in as '{}'", user.name);
                if let Some(store) = &self.store {
                    credentials::persist_user(store.as_ref(), &user);
                }
                self.user = Some(user.clone());
                self.state = SessionState::Authenticated;
                self.events.on_login_success(&user);
                Ok(user)
            }
            Err(err) => {
                // Login is unauthenticated: a 401 here means bad credentials,
                // not an invalidated session, so the guard does not apply.
                tracing::warn!("[Session] Login failed: {}", err);
                self.events.on_login_error(&err);
                Err(err)
            }
        }
    }

    /// Restores a user persisted in the credential store and validates its
    /// token. Returns `Ok(false)` when no store is attached or nothing is
    /// persisted. A rejected token (or any failure during validation) wipes
    /// the persisted credentials and emits the invalidated event.
    pub async fn restore_session(&mut self) -> Result<bool> {
        let Some(store) = self.store.clone() else {
            return Ok(false);
        };
        let Some(user) = credentials::load_user(store.as_ref()) else {
            return Ok(false);
        };
        self.restore_user(user).await
    }

    /// Validates an externally restored user. `Ok(true)` means the session
    /// is now authenticated with that user.
    pub async fn restore_user(&mut self, user: User) -> Result<bool> {
        self.state = SessionState::PendingTokenValidation;
        match self.service.validate_token(&user.auth_token).await {
            Ok(true) => {
                tracing::info!("[Session] Restored session for '{}'", user.name);
                self.user = Some(user.clone());
                self.state = SessionState::Authenticated;
                self.events.on_auth_validated(&user);
                Ok(true)
            }
            Ok(false) => {
                tracing::info!("[Session] Persisted token for '{}' is no longer valid", user.name);
                self.invalidate_restored();
                Ok(false)
            }
            Err(err) => {
                tracing::warn!("[Session] Token validation failed: {}", err);
                self.invalidate_restored();
                Ok(false)
            }
        }
    }

    /// Drops the current user and wipes persisted credentials.
    pub fn logout(&mut self) {
        self.drop_user();
    }

    // ----- service information -----

    /// Fetches `/info/all` and caches the result for the session's lifetime.
    pub async fn refresh_server_info(&mut self) -> Result<ServerInfo> {
        match self.service.server_info().await {
            Ok(info) => {
                self.server_info = Some(info.clone());
                self.events.on_server_info(&info);
                Ok(info)
            }
            Err(err) => {
                self.events.on_server_info_error(&err);
                Err(err)
            }
        }
    }

    // ----- dialogue lifecycle -----

    /// Lists the dialogue scripts available on the service (admin only).
    pub async fn list_dialogues(&mut self) -> Result<Vec<String>> {
        let token = self.token()?;
        match self.service.list_dialogues(&token).await {
            Ok(names) => {
                self.events.on_dialogue_list(&names);
                Ok(names)
            }
            Err(err) => Err(self.fail(err, |events, err| events.on_dialogue_list_error(err))),
        }
    }

    /// Starts a dialogue and makes its first step current.
    pub async fn start_dialogue(
        &mut self,
        dialogue_name: &str,
        language: &str,
    ) -> Result<DialogueStep> {
        let token = self.token()?;
        match self
            .service
            .start_dialogue(&token, dialogue_name, language)
            .await
        {
            Ok(step) => {
                self.enter_step_state(&step);
                self.events.on_dialogue_started(&step);
                Ok(step)
            }
            Err(err) => Err(self.fail(err, |events, err| events.on_dialogue_start_error(err))),
        }
    }

    /// Progresses the dialogue by choosing a reply. The continuation tokens
    /// must be echoed verbatim from the most recent step. A null server
    /// value completes the dialogue; a malformed payload is reported but
    /// leaves the session state untouched so the caller can recover.
    pub async fn progress_dialogue(
        &mut self,
        logged_dialogue_id: &str,
        logged_interaction_index: i64,
        reply_id: i64,
    ) -> Result<Option<DialogueStep>> {
        let token = self.token()?;
        match self
            .service
            .progress_dialogue(&token, logged_dialogue_id, logged_interaction_index, reply_id)
            .await
        {
            Ok(None) => {
                self.state = SessionState::DialogueComplete;
                self.events.on_dialogue_progressed(false, None);
                Ok(None)
            }
            Ok(Some(step)) => {
                self.enter_step_state(&step);
                self.events
                    .on_dialogue_progressed(step.has_replies(), Some(&step));
                Ok(Some(step))
            }
            Err(err) => Err(self.fail(err, |events, err| events.on_dialogue_progress_error(err))),
        }
    }

    /// Resumes a dialogue where it was left off. `Ok(None)` means there is
    /// nothing to resume, which is equivalent to the dialogue having
    /// finished.
    pub async fn continue_dialogue(&mut self, dialogue_name: &str) -> Result<Option<DialogueStep>> {
        let token = self.token()?;
        match self.service.continue_dialogue(&token, dialogue_name).await {
            Ok(None) => {
                self.state = SessionState::DialogueComplete;
                self.events.on_dialogue_continued(None);
                Ok(None)
            }
            Ok(Some(step)) => {
                self.enter_step_state(&step);
                self.events.on_dialogue_continued(Some(&step));
                Ok(Some(step))
            }
            Err(err) => Err(self.fail(err, |events, err| events.on_dialogue_continue_error(err))),
        }
    }

    /// Steps the dialogue back to an earlier interaction.
    pub async fn back_dialogue(
        &mut self,
        logged_dialogue_id: &str,
        logged_interaction_index: i64,
    ) -> Result<DialogueStep> {
        let token = self.token()?;
        match self
            .service
            .back_dialogue(&token, logged_dialogue_id, logged_interaction_index)
            .await
        {
            Ok(step) => {
                self.enter_step_state(&step);
                self.events.on_dialogue_back(&step);
                Ok(step)
            }
            Err(err) => Err(self.fail(err, |events, err| events.on_dialogue_back_error(err))),
        }
    }

    /// Fetches a summary of the latest unfinished dialogue, if any.
    pub async fn get_ongoing_dialogue(&mut self) -> Result<Option<OngoingDialogue>> {
        let token = self.token()?;
        match self.service.get_ongoing_dialogue(&token).await {
            Ok(ongoing) => {
                self.events.on_ongoing_dialogue(ongoing.as_ref());
                Ok(ongoing)
            }
            Err(err) => Err(self.fail(err, |events, err| events.on_ongoing_dialogue_error(err))),
        }
    }

    /// Cancels the identified dialogue server-side. On failure the session
    /// is considered still active; retrying is up to the caller.
    pub async fn cancel_dialogue(&mut self, logged_dialogue_id: &str) -> Result<()> {
        let token = self.token()?;
        match self.service.cancel_dialogue(&token, logged_dialogue_id).await {
            Ok(()) => {
                self.state = SessionState::DialogueComplete;
                self.events.on_dialogue_cancelled();
                Ok(())
            }
            Err(err) => Err(self.fail(err, |events, err| events.on_dialogue_cancel_error(err))),
        }
    }

    // ----- variables -----

    /// Fetches a full snapshot of the user's dialogue variables.
    pub async fn get_variables(&mut self) -> Result<Vec<Variable>> {
        let token = self.token()?;
        match self.service.get_variables(&token).await {
            Ok(variables) => {
                self.events.on_variables(&variables);
                Ok(variables)
            }
            Err(err) => Err(self.fail(err, |events, err| events.on_variables_error(err))),
        }
    }

    /// Sets a single variable, or clears it when `value` is `None`. Callers
    /// refetch the snapshot afterwards; there is no incremental patching.
    pub async fn set_variable(&mut self, name: &str, value: Option<&str>) -> Result<()> {
        let token = self.token()?;
        match self.service.set_variable(&token, name, value).await {
            Ok(()) => {
                self.events.on_variable_set(name);
                Ok(())
            }
            Err(err) => Err(self.fail(err, |events, err| events.on_variable_set_error(err))),
        }
    }

    /// Sets many variables in one call.
    pub async fn set_variables(&mut self, variables: &HashMap<String, String>) -> Result<()> {
        let token = self.token()?;
        match self.service.set_variables(&token, variables).await {
            Ok(()) => Ok(()),
            Err(err) => Err(self.fail(err, |events, err| events.on_variable_set_error(err))),
        }
    }

    // ----- internals -----

    fn token(&self) -> Result<String> {
        self.user
            .as_ref()
            .map(|u| u.auth_token.clone())
            .ok_or(ClientError::Unauthorized)
    }

    /// A step with replies keeps the dialogue active; a step without any
    /// completes it. The distinction between a null step and a zero-reply
    /// step is preserved in the emitted events.
    fn enter_step_state(&mut self, step: &DialogueStep) {
        self.state = if step.has_replies() {
            SessionState::DialogueActive
        } else {
            SessionState::DialogueComplete
        };
    }

    /// The cross-cutting unauthorized guard. A confirmed 401 on any
    /// authenticated call drops the cached user, wipes persisted
    /// credentials, and emits the unauthorized event; every other failure is
    /// forwarded unchanged through the operation's own error event.
    fn fail<F>(&mut self, err: ClientError, emit: F) -> ClientError
    where
        F: FnOnce(&dyn SessionEventHandler, &ClientError),
    {
        if err.is_unauthorized() && self.user.is_some() {
            tracing::warn!("[Session] Unauthorized response, dropping cached credentials");
            self.drop_user();
            self.events.on_unauthorized();
        } else {
            emit(self.events.as_ref(), &err);
        }
        err
    }

    fn invalidate_restored(&mut self) {
        self.state = SessionState::Anonymous;
        self.user = None;
        if let Some(store) = &self.store {
            credentials::clear_user(store.as_ref());
        }
        self.events.on_auth_invalidated();
    }

    fn drop_user(&mut self) {
        self.user = None;
        self.state = SessionState::Anonymous;
        if let Some(store) = &self.store {
            credentials::clear_user(store.as_ref());
        }
    }
}
