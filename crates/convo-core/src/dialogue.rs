//! Dialogue step model.
//!
//! A dialogue session is a server-tracked conversation identified by
//! `logged_dialogue_id`, progressing through `logged_interaction_index`
//! numbered steps. Each step is one turn of agent speech plus the set of
//! reply options available to the user. Steps are created fresh from every
//! start/continue/progress response; the previous step is discarded.

use serde::{Deserialize, Serialize};

/// The kind of a statement segment.
///
/// Only `Text` segments contribute to the rendered utterance; the wire
/// format defines further segment kinds which are carried through verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum SegmentType {
    Text,
    Other(String),
}

impl SegmentType {
    /// Parses the wire representation of a segment type.
    pub fn from_wire(value: &str) -> Self {
        if value == "TEXT" {
            Self::Text
        } else {
            Self::Other(value.to_string())
        }
    }
}

/// An atomic, immutable piece of a statement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Segment {
    pub segment_type: SegmentType,
    pub text: String,
}

impl Segment {
    pub fn new(segment_type: SegmentType, text: impl Into<String>) -> Self {
        Self {
            segment_type,
            text: text.into(),
        }
    }
}

/// An ordered sequence of segments forming one utterance.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Statement {
    pub segments: Vec<Segment>,
}

impl Statement {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a segment. Only called while mapping wire data; statements
    /// are never mutated afterwards.
    pub fn add_segment(&mut self, segment: Segment) {
        self.segments.push(segment);
    }

    /// The rendered utterance: the concatenation of all `Text` segments,
    /// in order. Non-text segments are excluded.
    pub fn full_text(&self) -> String {
        self.segments
            .iter()
            .filter(|s| s.segment_type == SegmentType::Text)
            .map(|s| s.text.as_str())
            .collect()
    }
}

/// A reply option attached to a dialogue step.
///
/// Discriminated once during mapping: a wire reply whose `statement` is null
/// becomes `AutoForward`, anything else becomes `Basic` carrying the mapped
/// statement. Downstream code matches on the variant instead of type-testing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Reply {
    /// A reply option with no user-visible utterance. Whether a client
    /// auto-advances or shows an explicit "continue" control is up to the
    /// UI collaborator.
    AutoForward {
        reply_id: i64,
        ends_dialogue: bool,
        /// Opaque action records, not interpreted by the client
        actions: Vec<serde_json::Value>,
    },
    /// A reply option carrying the literal statement the user is deemed to
    /// "say" by selecting it.
    Basic {
        reply_id: i64,
        ends_dialogue: bool,
        actions: Vec<serde_json::Value>,
        statement: Statement,
    },
}

impl Reply {
    /// The identifier echoed back to the service when this reply is chosen.
    pub fn reply_id(&self) -> i64 {
        match self {
            Self::AutoForward { reply_id, .. } | Self::Basic { reply_id, .. } => *reply_id,
        }
    }

    /// Whether choosing this reply ends the dialogue.
    pub fn ends_dialogue(&self) -> bool {
        match self {
            Self::AutoForward { ends_dialogue, .. } | Self::Basic { ends_dialogue, .. } => {
                *ends_dialogue
            }
        }
    }

    /// The opaque action records carried by this reply.
    pub fn actions(&self) -> &[serde_json::Value] {
        match self {
            Self::AutoForward { actions, .. } | Self::Basic { actions, .. } => actions,
        }
    }

    /// The user-facing utterance, present only on basic replies.
    pub fn statement(&self) -> Option<&Statement> {
        match self {
            Self::AutoForward { .. } => None,
            Self::Basic { statement, .. } => Some(statement),
        }
    }

    pub fn is_auto_forward(&self) -> bool {
        matches!(self, Self::AutoForward { .. })
    }
}

/// One turn of agent speech plus the reply options available to the user.
///
/// `logged_dialogue_id` and `logged_interaction_index` are session
/// continuation tokens: the values from the most recent step must be echoed
/// back verbatim when progressing the dialogue. The client never interprets
/// them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DialogueStep {
    pub dialogue_name: String,
    pub node: String,
    pub speaker: String,
    pub statement: Statement,
    /// Reply options in wire order. Caller-facing reply numbering is
    /// 1-based and positional; the wire progress call uses `reply_id`.
    pub replies: Vec<Reply>,
    pub logged_dialogue_id: String,
    pub logged_interaction_index: i64,
}

impl DialogueStep {
    /// Appends a reply, preserving wire order.
    pub fn add_reply(&mut self, reply: Reply) {
        self.replies.push(reply);
    }

    /// Whether this step still offers the user a way to respond. A step
    /// without replies means the dialogue has run to completion.
    pub fn has_replies(&self) -> bool {
        !self.replies.is_empty()
    }
}

/// Summary of the latest unfinished dialogue for the authenticated user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OngoingDialogue {
    pub dialogue_name: String,
    /// Seconds since the user last engaged with this dialogue
    pub seconds_since_last_engagement: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn full_text_skips_non_text_segments() {
        let mut statement = Statement::new();
        statement.add_segment(Segment::new(SegmentType::Text, "A"));
        statement.add_segment(Segment::new(SegmentType::Other("ACTION".to_string()), "x"));
        statement.add_segment(Segment::new(SegmentType::Text, "B"));
        assert_eq!(statement.full_text(), "AB");
    }

    #[test]
    fn full_text_of_empty_statement_is_empty() {
        assert_eq!(Statement::new().full_text(), "");
    }

    #[test]
    fn reply_accessors_cover_both_variants() {
        let auto = Reply::AutoForward {
            reply_id: 7,
            ends_dialogue: true,
            actions: vec![],
        };
        assert_eq!(auto.reply_id(), 7);
        assert!(auto.ends_dialogue());
        assert!(auto.is_auto_forward());
        assert!(auto.statement().is_none());

        let mut statement = Statement::new();
        statement.add_segment(Segment::new(SegmentType::Text, "Yes"));
        let basic = Reply::Basic {
            reply_id: 2,
            ends_dialogue: false,
            actions: vec![],
            statement,
        };
        assert_eq!(basic.reply_id(), 2);
        assert!(!basic.is_auto_forward());
        assert_eq!(basic.statement().unwrap().full_text(), "Yes");
    }

    #[test]
    fn segment_type_from_wire() {
        assert_eq!(SegmentType::from_wire("TEXT"), SegmentType::Text);
        assert_eq!(
            SegmentType::from_wire("ACTION"),
            SegmentType::Other("ACTION".to_string())
        );
    }
}
