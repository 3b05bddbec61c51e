//! Common utilities and shared components for Iny
//!
//! This crate provides the pieces shared by the configuration and HTTP crates:
//! error types, application protocol identifiers, and tracing setup.
//!
//! # Module Organization
//!
//! - [`errors`]: Error types and result aliases
//! - [`types`]: Application protocol identifiers negotiated over ALPN
//! - [`observability`]: Tracing subscriber initialisation

pub mod errors;
pub mod observability;
pub mod types;

// Re-export error types
pub use errors::{InyError, InyResult};

// Re-export common types
pub use types::ApplicationProtocol;

pub use observability::init_tracing;
