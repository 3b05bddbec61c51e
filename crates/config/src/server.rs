//! Protocol negotiation and HTTP/2 connection configuration types
//!
//! [`NegotiationConfig`] controls what is advertised over ALPN;
//! [`Http2Config`] seeds the initial SETTINGS of each HTTP/2 connection and
//! the optional inbound frame logging.

use serde::{Deserialize, Serialize};
use validator::Validate;

use iny_common::types::ApplicationProtocol;

// ============================================================================
// Negotiation Configuration
// ============================================================================

/// ALPN negotiation configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
#[validate(schema(function = "crate::validation::validate_protocol_list"))]
pub struct NegotiationConfig {
    /// Protocols advertised during the TLS handshake, most preferred first
    #[validate(length(min = 1, message = "At least one protocol must be advertised"))]
    #[serde(default = "default_protocols")]
    pub protocols: Vec<ApplicationProtocol>,
}

impl Default for NegotiationConfig {
    fn default() -> Self {
        Self {
            protocols: default_protocols(),
        }
    }
}

// ============================================================================
// HTTP/2 Configuration
// ============================================================================

/// HTTP/2 connection configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct Http2Config {
    /// SETTINGS_HEADER_TABLE_SIZE (unset = protocol default)
    #[serde(default)]
    pub header_table_size: Option<u32>,

    /// SETTINGS_ENABLE_PUSH (unset = protocol default)
    #[serde(default)]
    pub enable_push: Option<bool>,

    /// SETTINGS_MAX_CONCURRENT_STREAMS
    #[serde(default = "default_max_concurrent_streams")]
    pub max_concurrent_streams: u32,

    /// SETTINGS_INITIAL_WINDOW_SIZE
    #[validate(range(max = 2147483647, message = "Window size must not exceed 2^31-1"))]
    #[serde(default = "default_initial_window_size")]
    pub initial_window_size: u32,

    /// SETTINGS_MAX_FRAME_SIZE
    #[validate(range(
        min = 16384,
        max = 16777215,
        message = "Frame size must be between 16384 and 16777215"
    ))]
    #[serde(default = "default_max_frame_size")]
    pub max_frame_size: u32,

    /// SETTINGS_MAX_HEADER_LIST_SIZE (unset = unlimited)
    #[serde(default)]
    pub max_header_list_size: Option<u32>,

    /// Log every inbound frame before it reaches the handler
    #[serde(default)]
    pub frame_logging: bool,

    /// Level used for frame logging (trace, debug, info, warn, error)
    #[validate(custom(function = "crate::validation::validate_log_level"))]
    #[serde(default = "default_frame_log_level")]
    pub frame_log_level: String,
}

impl Default for Http2Config {
    fn default() -> Self {
        Self {
            header_table_size: None,
            enable_push: None,
            max_concurrent_streams: default_max_concurrent_streams(),
            initial_window_size: default_initial_window_size(),
            max_frame_size: default_max_frame_size(),
            max_header_list_size: None,
            frame_logging: false,
            frame_log_level: default_frame_log_level(),
        }
    }
}

// ============================================================================
// Default Value Functions
// ============================================================================

pub(crate) fn default_protocols() -> Vec<ApplicationProtocol> {
    ApplicationProtocol::SUPPORTED.to_vec()
}

pub(crate) fn default_max_concurrent_streams() -> u32 {
    100
}

pub(crate) fn default_initial_window_size() -> u32 {
    65_535
}

pub(crate) fn default_max_frame_size() -> u32 {
    16_384
}

pub(crate) fn default_frame_log_level() -> String {
    "info".to_string()
}
