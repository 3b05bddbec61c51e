//! Error types for Iny
//!
//! This module defines the error type shared by protocol negotiation and
//! handler construction, with a focus on separating configuration mistakes
//! in the embedding application from conditions a peer can trigger.

use thiserror::Error;

/// Main error type for Iny operations
#[derive(Error, Debug)]
pub enum InyError {
    /// The negotiated name is not one of the supported application protocols
    #[error("Unsupported application protocol: '{name}'")]
    UnsupportedProtocol { name: String },

    /// A handler factory produced a handler that cannot receive frames
    #[error("Handler '{handler}' does not implement the frame listener capability")]
    InvalidHandlerCapability { handler: String },

    /// A single-use component was driven outside its lifecycle
    #[error("Usage violation in {component}: {message}")]
    UsageViolation {
        component: &'static str,
        message: String,
    },

    /// Configuration errors
    #[error("Configuration error: {message}")]
    Config {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// TLS errors
    #[error("TLS error: {message}")]
    Tls {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Errors raised by the connection framework during construction
    #[error("Connection framework error: {message}")]
    Framework {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },
}

/// Result type alias for Iny operations
pub type InyResult<T> = Result<T, InyError>;

impl InyError {
    /// Fatal errors are programming or configuration mistakes in the
    /// embedding application. Nothing about them changes on retry.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            Self::InvalidHandlerCapability { .. } | Self::UsageViolation { .. } | Self::Config { .. }
        )
    }

    /// Create an unsupported protocol error
    pub fn unsupported_protocol(name: impl Into<String>) -> Self {
        Self::UnsupportedProtocol { name: name.into() }
    }

    /// Create a usage violation error
    pub fn usage(component: &'static str, message: impl Into<String>) -> Self {
        Self::UsageViolation {
            component,
            message: message.into(),
        }
    }

    /// Create a configuration error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
            source: None,
        }
    }

    /// Create a framework error
    pub fn framework(message: impl Into<String>) -> Self {
        Self::Framework {
            message: message.into(),
            source: None,
        }
    }

    /// Create a TLS error wrapping its cause
    pub fn tls(
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::Tls {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }
}
