//! Wire payloads and their mapping into the typed model.
//!
//! Everything here is a pure, side-effect-free conversion from the JSON
//! shapes the service returns into `convo-core` types. The transport layer
//! deserializes into the payload structs and hands them to the `map_*`
//! functions; nothing in this module performs I/O.

use convo_core::dialogue::{DialogueStep, Reply, Segment, SegmentType, Statement};
use convo_core::error::{ClientError, FieldError, Result};
use convo_core::user::{User, UserRole};
use convo_core::variable::Variable;
use serde::Deserialize;

/// The `{code, message, fieldErrors}` envelope the service returns with
/// HTTP 400.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorEnvelope {
    pub code: String,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub field_errors: Vec<FieldErrorPayload>,
}

#[derive(Debug, Deserialize)]
pub struct FieldErrorPayload {
    pub field: String,
    #[serde(default)]
    pub message: String,
}

impl ErrorEnvelope {
    /// Converts the envelope into the validation-failure variant of the
    /// error taxonomy.
    pub fn into_error(self, status: u16) -> ClientError {
        ClientError::Validation {
            status,
            code: self.code,
            message: self.message,
            field_errors: self
                .field_errors
                .into_iter()
                .map(|f| FieldError {
                    field: f.field,
                    message: f.message,
                })
                .collect(),
        }
    }
}

/// Successful `/auth/login` body.
#[derive(Debug, Deserialize)]
pub struct LoginPayload {
    pub user: String,
    #[serde(default)]
    pub role: String,
    pub token: String,
}

/// `/admin/list-dialogues` body.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DialogueListPayload {
    #[serde(default)]
    pub dialogue_names: Vec<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SegmentPayload {
    pub segment_type: String,
    #[serde(default)]
    pub text: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct StatementPayload {
    #[serde(default)]
    pub segments: Vec<SegmentPayload>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReplyPayload {
    pub reply_id: i64,
    #[serde(default)]
    pub ends_dialogue: bool,
    /// Null or absent marks an auto-forward reply
    #[serde(default)]
    pub statement: Option<StatementPayload>,
    #[serde(default)]
    pub actions: Vec<serde_json::Value>,
}

/// A dialogue step as returned by start/progress/continue/back.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StepPayload {
    pub dialogue: String,
    #[serde(default)]
    pub node: String,
    #[serde(default)]
    pub speaker: String,
    #[serde(default)]
    pub statement: StatementPayload,
    #[serde(default)]
    pub replies: Vec<ReplyPayload>,
    pub logged_dialogue_id: String,
    #[serde(default)]
    pub logged_interaction_index: i64,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VariablePayload {
    pub name: String,
    #[serde(default)]
    pub value: Option<serde_json::Value>,
    #[serde(default)]
    pub updated_time: i64,
    #[serde(default)]
    pub updated_time_zone: String,
}

/// Maps a 2xx `/auth/login` body. Some deployments deliver the rejection
/// envelope with a success status; that surfaces as the validation failure
/// it is, carrying the actual response status.
pub fn map_login(value: serde_json::Value, status: u16) -> Result<User> {
    match serde_json::from_value::<LoginPayload>(value.clone()) {
        Ok(payload) => Ok(User::new(
            payload.user,
            UserRole::from_wire(&payload.role),
            payload.token,
        )),
        Err(e) => match serde_json::from_value::<ErrorEnvelope>(value) {
            Ok(envelope) => Err(envelope.into_error(status)),
            Err(_) => Err(ClientError::malformed(format!(
                "invalid login payload: {e}"
            ))),
        },
    }
}

/// Maps a `/admin/list-dialogues` body. An absent `dialogueNames` key is an
/// empty list; a body of any other shape is malformed.
pub fn map_dialogue_list(value: serde_json::Value) -> Result<Vec<String>> {
    let payload: DialogueListPayload = serde_json::from_value(value)
        .map_err(|e| ClientError::malformed(format!("invalid dialogue list payload: {e}")))?;
    Ok(payload.dialogue_names)
}

/// Maps a statement payload, preserving segment order.
pub fn map_statement(payload: StatementPayload) -> Statement {
    let mut statement = Statement::new();
    for segment in payload.segments {
        statement.add_segment(Segment::new(
            SegmentType::from_wire(&segment.segment_type),
            segment.text,
        ));
    }
    statement
}

/// Maps a reply payload. A null `statement` yields an auto-forward reply;
/// anything else a basic reply carrying the mapped statement.
pub fn map_reply(payload: ReplyPayload) -> Reply {
    match payload.statement {
        None => Reply::AutoForward {
            reply_id: payload.reply_id,
            ends_dialogue: payload.ends_dialogue,
            actions: payload.actions,
        },
        Some(statement) => Reply::Basic {
            reply_id: payload.reply_id,
            ends_dialogue: payload.ends_dialogue,
            actions: payload.actions,
            statement: map_statement(statement),
        },
    }
}

/// Maps a step payload into a [`DialogueStep`], replies in wire order.
pub fn map_step(payload: StepPayload) -> DialogueStep {
    let mut step = DialogueStep {
        dialogue_name: payload.dialogue,
        node: payload.node,
        speaker: payload.speaker,
        statement: map_statement(payload.statement),
        replies: Vec::new(),
        logged_dialogue_id: payload.logged_dialogue_id,
        logged_interaction_index: payload.logged_interaction_index,
    };
    for reply in payload.replies {
        step.add_reply(map_reply(reply));
    }
    step
}

/// Maps a raw step JSON value, used where the step arrives wrapped in a
/// nullable `value` key. A value without a `dialogue` key is malformed.
pub fn map_step_value(value: serde_json::Value) -> Result<DialogueStep> {
    if value.get("dialogue").is_none() {
        return Err(ClientError::malformed(
            "dialogue step payload is missing the 'dialogue' key",
        ));
    }
    let payload: StepPayload = serde_json::from_value(value)
        .map_err(|e| ClientError::malformed(format!("invalid dialogue step payload: {e}")))?;
    Ok(map_step(payload))
}

/// Maps a variable snapshot. An absent payload maps to an empty list so
/// callers never null-check.
pub fn map_variables(payload: Option<Vec<VariablePayload>>) -> Vec<Variable> {
    payload
        .unwrap_or_default()
        .into_iter()
        .map(|v| Variable {
            name: v.name,
            value: v.value.and_then(flatten_value),
            updated_time: v.updated_time,
            updated_time_zone: v.updated_time_zone,
        })
        .collect()
}

// The service stores loosely typed values; render non-strings through their
// JSON representation rather than failing the whole snapshot.
fn flatten_value(value: serde_json::Value) -> Option<String> {
    match value {
        serde_json::Value::Null => None,
        serde_json::Value::String(s) => Some(s),
        other => Some(other.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn step_json() -> serde_json::Value {
        serde_json::json!({
            "dialogue": "greeting",
            "node": "start",
            "speaker": "Bot",
            "statement": {
                "segments": [
                    {"segmentType": "TEXT", "text": "Hi"}
                ]
            },
            "replies": [
                {"replyId": 1, "endsDialogue": false, "statement": null, "actions": []},
                {"replyId": 2, "endsDialogue": true, "statement": {
                    "segments": [
                        {"segmentType": "TEXT", "text": "Bye"},
                        {"segmentType": "ACTION", "text": "wave"},
                        {"segmentType": "TEXT", "text": "!"}
                    ]
                }, "actions": [{"type": "generic"}]}
            ],
            "loggedDialogueId": "D1",
            "loggedInteractionIndex": 0
        })
    }

    #[test]
    fn maps_step_scalars_and_statement() {
        let payload: StepPayload = serde_json::from_value(step_json()).unwrap();
        let step = map_step(payload);
        assert_eq!(step.dialogue_name, "greeting");
        assert_eq!(step.node, "start");
        assert_eq!(step.speaker, "Bot");
        assert_eq!(step.logged_dialogue_id, "D1");
        assert_eq!(step.logged_interaction_index, 0);
        assert_eq!(step.statement.full_text(), "Hi");
    }

    #[test]
    fn reply_discrimination_is_total_and_exclusive() {
        let payload: StepPayload = serde_json::from_value(step_json()).unwrap();
        let step = map_step(payload);
        assert_eq!(step.replies.len(), 2);
        assert!(step.replies[0].is_auto_forward());
        assert!(step.replies[0].statement().is_none());
        assert!(!step.replies[1].is_auto_forward());
        // Non-TEXT segments are excluded from the rendered utterance.
        assert_eq!(step.replies[1].statement().unwrap().full_text(), "Bye!");
        assert_eq!(step.replies[1].actions().len(), 1);
    }

    #[test]
    fn mapping_is_idempotent() {
        let first = map_step(serde_json::from_value(step_json()).unwrap());
        let second = map_step(serde_json::from_value(step_json()).unwrap());
        assert_eq!(first, second);
    }

    #[test]
    fn step_value_without_dialogue_key_is_malformed() {
        let err = map_step_value(serde_json::json!({"node": "start"})).unwrap_err();
        assert!(err.is_malformed());
    }

    #[test]
    fn variables_normalize_to_empty_list() {
        assert!(map_variables(None).is_empty());
        assert!(map_variables(Some(vec![])).is_empty());
    }

    #[test]
    fn variable_values_flatten_to_strings() {
        let payload: Vec<VariablePayload> = serde_json::from_value(serde_json::json!([
            {"name": "mood", "value": "happy", "updatedTime": 1700000000000i64,
             "updatedTimeZone": "Europe/Lisbon"},
            {"name": "count", "value": 3, "updatedTime": 0, "updatedTimeZone": "UTC"},
            {"name": "cleared", "value": null, "updatedTime": 0, "updatedTimeZone": "UTC"}
        ]))
        .unwrap();
        let variables = map_variables(Some(payload));
        assert_eq!(variables[0].value.as_deref(), Some("happy"));
        assert_eq!(variables[1].value.as_deref(), Some("3"));
        assert_eq!(variables[2].value, None);
    }

    #[test]
    fn login_body_maps_user_and_token() {
        let user = map_login(
            serde_json::json!({"user": "alice", "role": "admin", "token": "T1"}),
            200,
        )
        .unwrap();
        assert_eq!(user.name, "alice");
        assert_eq!(user.role, UserRole::Admin);
        assert_eq!(user.auth_token, "T1");
    }

    #[test]
    fn login_envelope_with_success_status_keeps_that_status() {
        let err = map_login(
            serde_json::json!({
                "code": "INVALID_CREDENTIALS",
                "message": "Invalid credentials",
                "fieldErrors": []
            }),
            201,
        )
        .unwrap_err();
        match err {
            ClientError::Validation { status, code, .. } => {
                assert_eq!(status, 201);
                assert_eq!(code, "INVALID_CREDENTIALS");
            }
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[test]
    fn login_body_of_neither_shape_is_malformed() {
        let err = map_login(serde_json::json!("welcome"), 200).unwrap_err();
        assert!(err.is_malformed());
    }

    #[test]
    fn dialogue_list_without_names_key_is_empty() {
        assert!(map_dialogue_list(serde_json::json!({})).unwrap().is_empty());
        let names =
            map_dialogue_list(serde_json::json!({"dialogueNames": ["greeting"]})).unwrap();
        assert_eq!(names, vec!["greeting".to_string()]);
    }

    #[test]
    fn dialogue_list_of_the_wrong_shape_is_malformed() {
        let err = map_dialogue_list(serde_json::json!(["greeting"])).unwrap_err();
        assert!(err.is_malformed());
        let err = map_dialogue_list(serde_json::Value::Null).unwrap_err();
        assert!(err.is_malformed());
    }

    #[test]
    fn error_envelope_maps_field_errors() {
        let envelope: ErrorEnvelope = serde_json::from_value(serde_json::json!({
            "code": "INVALID_INPUT",
            "message": "Validation failed",
            "fieldErrors": [{"field": "user", "message": "may not be empty"}]
        }))
        .unwrap();
        let err = envelope.into_error(400);
        match err {
            ClientError::Validation {
                status,
                code,
                field_errors,
                ..
            } => {
                assert_eq!(status, 400);
                assert_eq!(code, "INVALID_INPUT");
                assert_eq!(field_errors[0].field, "user");
            }
            other => panic!("expected validation error, got {other:?}"),
        }
    }
}
