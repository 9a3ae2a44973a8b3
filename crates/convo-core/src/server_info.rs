//! Metadata reported by the remote web service.

use serde::{Deserialize, Serialize};

/// Information about the running web service, replaced wholesale on each
/// `/info/all` call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServerInfo {
    /// Software version number of the web service
    pub service_version: String,
    /// Latest protocol version supported (e.g. "1")
    pub protocol_version: String,
    /// Specific build-info string
    pub build: String,
    /// How long the web service has been running
    pub up_time: String,
}
