//! Configuration validation functions
//!
//! Field and schema validators referenced from the `validator` derives in
//! [`crate::server`].

use std::borrow::Cow;
use std::collections::HashSet;

use iny_common::types::ApplicationProtocol;
use validator::ValidationError;

use crate::server::NegotiationConfig;

// ============================================================================
// Field Validators
// ============================================================================

/// Validate that a string names a tracing level
pub fn validate_log_level(level: &str) -> Result<(), ValidationError> {
    level.parse::<tracing::Level>().map(|_| ()).map_err(|_| {
        let mut err = ValidationError::new("invalid_log_level");
        err.message = Some(Cow::Owned(format!(
            "Invalid log level '{}'. Expected one of: trace, debug, info, warn, error",
            level
        )));
        err
    })
}

// ============================================================================
// Schema Validators
// ============================================================================

/// Validate the advertised ALPN list.
///
/// Duplicates are rejected, and the fallback protocol must be advertised so a
/// peer that does negotiate can still land on it.
pub fn validate_protocol_list(config: &NegotiationConfig) -> Result<(), ValidationError> {
    let mut seen = HashSet::new();
    for protocol in &config.protocols {
        if !seen.insert(protocol) {
            let mut err = ValidationError::new("duplicate_protocol");
            err.message = Some(Cow::Owned(format!(
                "Protocol '{}' is advertised more than once",
                protocol
            )));
            return Err(err);
        }
    }

    if !config.protocols.is_empty() && !seen.contains(&ApplicationProtocol::FALLBACK) {
        let mut err = ValidationError::new("missing_fallback_protocol");
        err.message = Some(Cow::Owned(format!(
            "Fallback protocol '{}' must be advertised",
            ApplicationProtocol::FALLBACK
        )));
        return Err(err);
    }

    Ok(())
}
