//! HTTP client and session controller for a remote dialogue-orchestration
//! web service.
//!
//! The crate splits into three layers with a strict downward dependency:
//!
//! - [`transport`]: one `reqwest` call per logical operation, auth token
//!   attached via the `X-Auth-Token` header, outcomes classified into the
//!   shared error taxonomy.
//! - [`wire`]: pure mapping from the service's JSON payloads into the typed
//!   model of `convo-core`.
//! - [`session`]: the state machine sequencing login, token validation and
//!   the dialogue lifecycle, emitting named outcome events to a UI
//!   collaborator.
//!
//! ```no_run
//! use std::sync::Arc;
//! use convo_client::{ClientConfig, HttpDialogueService, SessionController};
//! use convo_core::NoopEventHandler;
//!
//! # async fn run() -> convo_core::Result<()> {
//! let config = ClientConfig::new("https://example.com/dialogue-service/v1")
//!     .with_time_zone("Europe/Lisbon");
//! let service = Arc::new(HttpDialogueService::new(&config));
//! let mut session = SessionController::new(service, Arc::new(NoopEventHandler));
//!
//! session.login("alice", "secret", 0).await?;
//! let step = session.start_dialogue("greeting", "en").await?;
//! println!("{}: {}", step.speaker, step.statement.full_text());
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod session;
pub mod transport;
pub mod wire;

pub use config::ClientConfig;
pub use session::{SessionController, SessionState};
pub use transport::HttpDialogueService;
