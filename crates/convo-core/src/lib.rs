//! Domain models and collaborator seams for the convo dialogue client.
//!
//! This crate holds the typed object graph mirroring the remote service's
//! wire shapes (users, dialogue steps, replies, variables), the shared error
//! taxonomy, and the traits the session controller talks through: the remote
//! service itself, the UI event handler, and the credential store. It has no
//! knowledge of HTTP or of any rendering layer.

pub mod credentials;
pub mod dialogue;
pub mod error;
pub mod events;
pub mod server_info;
pub mod service;
pub mod user;
pub mod variable;

// Re-export common error type
pub use error::{ClientError, FieldError, Result};

pub use credentials::CredentialStore;
pub use dialogue::{DialogueStep, OngoingDialogue, Reply, Segment, SegmentType, Statement};
pub use events::{NoopEventHandler, SessionEventHandler};
pub use server_info::ServerInfo;
pub use service::DialogueService;
pub use user::{User, UserRole};
pub use variable::Variable;
