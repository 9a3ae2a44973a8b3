//! HTTP transport against the remote dialogue service.
//!
//! One request per logical operation, authentication via the `X-Auth-Token`
//! header, outcomes normalized into the shared error taxonomy. The transport
//! holds no session state; authenticated operations receive the bearer token
//! explicitly from the session controller.

use std::collections::HashMap;

use async_trait::async_trait;
use convo_core::dialogue::{DialogueStep, OngoingDialogue};
use convo_core::error::{ClientError, Result};
use convo_core::server_info::ServerInfo;
use convo_core::service::DialogueService;
use convo_core::user::User;
use convo_core::variable::Variable;
use reqwest::header::CONTENT_TYPE;
use reqwest::{Client, RequestBuilder, StatusCode};
use serde::Serialize;

use crate::config::ClientConfig;
use crate::wire;

const AUTH_TOKEN_HEADER: &str = "X-Auth-Token";

/// The body of a classified 2xx response.
///
/// When the content type is not JSON the raw text is returned instead of
/// attempting to parse it; empty and plain-text 2xx responses (cancel,
/// set-variable) come through as `Text`.
#[derive(Debug)]
pub(crate) enum ResponseBody {
    Json(serde_json::Value),
    Text(String),
}

impl ResponseBody {
    fn into_json(self) -> Result<serde_json::Value> {
        match self {
            Self::Json(value) => Ok(value),
            Self::Text(text) => Err(ClientError::malformed(format!(
                "expected a JSON body, got: {}",
                if text.is_empty() {
                    "<empty>"
                } else {
                    text.as_str()
                }
            ))),
        }
    }
}

/// Classifies a non-2xx outcome. 401 is the distinguished unauthorized
/// outcome; a 400 whose body parses as the `{code, message, fieldErrors}`
/// envelope is a validation failure; everything else is a generic transport
/// failure carrying the raw status and body.
pub(crate) fn classify_failure(status: u16, body: &str) -> ClientError {
    if status == StatusCode::UNAUTHORIZED.as_u16() {
        return ClientError::Unauthorized;
    }
    if status == StatusCode::BAD_REQUEST.as_u16() {
        if let Ok(envelope) = serde_json::from_str::<wire::ErrorEnvelope>(body) {
            return envelope.into_error(status);
        }
    }
    ClientError::transport_status(status, body.to_string())
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct LoginRequest<'a> {
    user: &'a str,
    password: &'a str,
    token_expiration: u32,
}

/// Production [`DialogueService`] implementation backed by `reqwest`.
#[derive(Clone)]
pub struct HttpDialogueService {
    client: Client,
    base_url: String,
    time_zone: String,
}

impl HttpDialogueService {
    /// Creates a service client for the given configuration.
    pub fn new(config: &ClientConfig) -> Self {
        let client = Client::builder()
            .timeout(config.request_timeout)
            .build()
            .unwrap_or_else(|_| Client::new());
        Self {
            client,
            base_url: config.base_url.clone(),
            time_zone: config.time_zone.clone(),
        }
    }

    /// The base URL this client is directed at.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// The IANA time zone attached to dialogue-lifecycle calls.
    pub fn time_zone(&self) -> &str {
        &self.time_zone
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn authenticated(&self, request: RequestBuilder, token: &str) -> RequestBuilder {
        request.header(AUTH_TOKEN_HEADER, token)
    }

    /// Sends the request and classifies the outcome, returning the response
    /// status alongside the body.
    async fn dispatch(&self, request: RequestBuilder) -> Result<(u16, ResponseBody)> {
        let response = request
            .send()
            .await
            .map_err(|e| ClientError::transport(format!("request failed: {e}")))?;

        let status = response.status();
        let is_json = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(|v| v.contains("application/json"))
            .unwrap_or(false);
        let body = response
            .text()
            .await
            .map_err(|e| ClientError::transport(format!("failed to read response body: {e}")))?;

        if !status.is_success() {
            let err = classify_failure(status.as_u16(), &body);
            tracing::warn!("[Transport] Request failed: {}", err);
            return Err(err);
        }

        if is_json && !body.is_empty() {
            let value = serde_json::from_str(&body)
                .map_err(|e| ClientError::malformed(format!("invalid JSON body: {e}")))?;
            Ok((status.as_u16(), ResponseBody::Json(value)))
        } else {
            Ok((status.as_u16(), ResponseBody::Text(body)))
        }
    }

    /// Dispatches a request whose 2xx body must be JSON.
    async fn dispatch_json(&self, request: RequestBuilder) -> Result<serde_json::Value> {
        let (_, body) = self.dispatch(request).await?;
        body.into_json()
    }

    /// Dispatches and unwraps the nullable `{value: ...}` wrapper used by
    /// the progress/continue/get-ongoing endpoints.
    async fn dispatch_nullable(&self, request: RequestBuilder) -> Result<Option<serde_json::Value>> {
        let body = self.dispatch_json(request).await?;
        match body.get("value") {
            None | Some(serde_json::Value::Null) => Ok(None),
            Some(value) => Ok(Some(value.clone())),
        }
    }
}

#[async_trait]
impl DialogueService for HttpDialogueService {
    async fn login(
        &self,
        username: &str,
        password: &str,
        token_expiration_minutes: u32,
    ) -> Result<User> {
        let url = self.url("/auth/login");
        tracing::debug!("[Transport] POST {}", url);
        let body = LoginRequest {
            user: username,
            password,
            token_expiration: token_expiration_minutes,
        };
        let (status, response) = self.dispatch(self.client.post(&url).json(&body)).await?;
        wire::map_login(response.into_json()?, status)
    }

    async fn validate_token(&self, token: &str) -> Result<bool> {
        let url = self.url("/auth/validate");
        tracing::debug!("[Transport] POST {}", url);
        let request = self.authenticated(self.client.post(&url), token);
        let body = self.dispatch_json(request).await?;
        match body {
            serde_json::Value::Bool(valid) => Ok(valid),
            other => Err(ClientError::malformed(format!(
                "expected a boolean validation result, got: {other}"
            ))),
        }
    }

    async fn server_info(&self) -> Result<ServerInfo> {
        let url = self.url("/info/all");
        tracing::debug!("[Transport] GET {}", url);
        let body = self.dispatch_json(self.client.get(&url)).await?;
        serde_json::from_value(body)
            .map_err(|e| ClientError::malformed(format!("invalid server info payload: {e}")))
    }

    async fn list_dialogues(&self, token: &str) -> Result<Vec<String>> {
        let url = self.url("/admin/list-dialogues");
        tracing::debug!("[Transport] GET {}", url);
        let request = self.authenticated(self.client.get(&url), token);
        let body = self.dispatch_json(request).await?;
        wire::map_dialogue_list(body)
    }

    async fn start_dialogue(
        &self,
        token: &str,
        dialogue_name: &str,
        language: &str,
    ) -> Result<DialogueStep> {
        let url = self.url("/dialogue/start");
        tracing::debug!("[Transport] POST {} dialogueName={}", url, dialogue_name);
        let request = self.authenticated(
            self.client.post(&url).query(&[
                ("dialogueName", dialogue_name),
                ("language", language),
                ("timeZone", self.time_zone.as_str()),
            ]),
            token,
        );
        let body = self.dispatch_json(request).await?;
        wire::map_step_value(body)
    }

    async fn progress_dialogue(
        &self,
        token: &str,
        logged_dialogue_id: &str,
        logged_interaction_index: i64,
        reply_id: i64,
    ) -> Result<Option<DialogueStep>> {
        let url = self.url("/dialogue/progress");
        tracing::debug!(
            "[Transport] POST {} loggedDialogueId={} loggedInteractionIndex={} replyId={}",
            url,
            logged_dialogue_id,
            logged_interaction_index,
            reply_id
        );
        let interaction_index = logged_interaction_index.to_string();
        let reply = reply_id.to_string();
        let request = self.authenticated(
            self.client.post(&url).query(&[
                ("loggedDialogueId", logged_dialogue_id),
                ("loggedInteractionIndex", interaction_index.as_str()),
                ("replyId", reply.as_str()),
            ]),
            token,
        );
        match self.dispatch_nullable(request).await? {
            // A null value is the server-side "dialogue complete" signal.
            None => Ok(None),
            Some(value) => Ok(Some(wire::map_step_value(value)?)),
        }
    }

    async fn continue_dialogue(
        &self,
        token: &str,
        dialogue_name: &str,
    ) -> Result<Option<DialogueStep>> {
        let url = self.url("/dialogue/continue");
        tracing::debug!("[Transport] POST {} dialogueName={}", url, dialogue_name);
        let request = self.authenticated(
            self.client.post(&url).query(&[
                ("dialogueName", dialogue_name),
                ("timeZone", self.time_zone.as_str()),
            ]),
            token,
        );
        match self.dispatch_nullable(request).await? {
            None => Ok(None),
            // Unlike progress, a value without a dialogue key means there is
            // nothing to resume, which is not an error.
            Some(value) if value.get("dialogue").is_none() => Ok(None),
            Some(value) => Ok(Some(wire::map_step_value(value)?)),
        }
    }

    async fn back_dialogue(
        &self,
        token: &str,
        logged_dialogue_id: &str,
        logged_interaction_index: i64,
    ) -> Result<DialogueStep> {
        let url = self.url("/dialogue/back");
        tracing::debug!(
            "[Transport] POST {} loggedDialogueId={} loggedInteractionIndex={}",
            url,
            logged_dialogue_id,
            logged_interaction_index
        );
        let interaction_index = logged_interaction_index.to_string();
        let request = self.authenticated(
            self.client.post(&url).query(&[
                ("loggedDialogueId", logged_dialogue_id),
                ("loggedInteractionIndex", interaction_index.as_str()),
            ]),
            token,
        );
        let body = self.dispatch_json(request).await?;
        wire::map_step_value(body)
    }

    async fn get_ongoing_dialogue(&self, token: &str) -> Result<Option<OngoingDialogue>> {
        let url = self.url("/dialogue/get-ongoing");
        tracing::debug!("[Transport] GET {}", url);
        let request = self.authenticated(self.client.get(&url), token);
        match self.dispatch_nullable(request).await? {
            None => Ok(None),
            Some(value) => serde_json::from_value(value)
                .map(Some)
                .map_err(|e| ClientError::malformed(format!("invalid ongoing payload: {e}"))),
        }
    }

    async fn cancel_dialogue(&self, token: &str, logged_dialogue_id: &str) -> Result<()> {
        let url = self.url("/dialogue/cancel");
        tracing::debug!(
            "[Transport] POST {} loggedDialogueId={}",
            url,
            logged_dialogue_id
        );
        let request = self.authenticated(
            self.client
                .post(&url)
                .query(&[("loggedDialogueId", logged_dialogue_id)]),
            token,
        );
        // Only the 2xx status matters; the body is empty.
        self.dispatch(request).await.map(|_| ())
    }

    async fn get_variables(&self, token: &str) -> Result<Vec<Variable>> {
        let url = self.url("/variables/get");
        tracing::debug!("[Transport] GET {}", url);
        let request = self.authenticated(
            self.client
                .get(&url)
                .query(&[("timeZone", self.time_zone.as_str())]),
            token,
        );
        match self.dispatch(request).await?.1 {
            ResponseBody::Json(body) => {
                let payload: Option<Vec<wire::VariablePayload>> = serde_json::from_value(body)
                    .map_err(|e| {
                        ClientError::malformed(format!("invalid variables payload: {e}"))
                    })?;
                Ok(wire::map_variables(payload))
            }
            // An empty 2xx body means no variables are stored.
            ResponseBody::Text(_) => Ok(Vec::new()),
        }
    }

    async fn set_variable(&self, token: &str, name: &str, value: Option<&str>) -> Result<()> {
        let url = self.url("/variables/set-single");
        tracing::debug!("[Transport] POST {} name={}", url, name);
        let mut params = vec![("name", name)];
        if let Some(value) = value {
            params.push(("value", value));
        }
        params.push(("timeZone", self.time_zone.as_str()));
        let request = self.authenticated(self.client.post(&url).query(&params), token);
        self.dispatch(request).await.map(|_| ())
    }

    async fn set_variables(
        &self,
        token: &str,
        variables: &HashMap<String, String>,
    ) -> Result<()> {
        let url = self.url("/variables/set");
        tracing::debug!("[Transport] POST {} ({} variables)", url, variables.len());
        let request = self.authenticated(
            self.client
                .post(&url)
                .query(&[("timeZone", self.time_zone.as_str())])
                .json(variables),
            token,
        );
        self.dispatch(request).await.map(|_| ())
    }
}
