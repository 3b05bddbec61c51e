//! Configuration module for Iny
//!
//! This module provides configuration parsing and validation for ALPN
//! negotiation and HTTP/2 connection setup.
//!
//! # Module Organization
//!
//! - [`server`]: Negotiation and HTTP/2 configuration types
//! - [`validation`]: Configuration validation functions
//! - [`kdl_parser`]: KDL format parsing

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::debug;
use validator::Validate;

// ============================================================================
// Module Declarations
// ============================================================================

pub mod kdl_parser;
pub mod server;
pub mod validation;

// ============================================================================
// Re-exports
// ============================================================================

pub use server::{Http2Config, NegotiationConfig};

// Re-export ApplicationProtocol from common for convenience
pub use iny_common::ApplicationProtocol;

// ============================================================================
// Main Configuration Structure
// ============================================================================

/// Main configuration structure for Iny
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct Config {
    /// ALPN negotiation settings
    #[validate(nested)]
    #[serde(default)]
    pub negotiation: NegotiationConfig,

    /// HTTP/2 connection settings
    #[validate(nested)]
    #[serde(default)]
    pub http2: Http2Config,
}

// ============================================================================
// Config Implementation
// ============================================================================

impl Config {
    /// Load configuration from a file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {:?}", path))?;

        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .unwrap_or("kdl");

        let config = match extension {
            "kdl" => Self::from_kdl(&content),
            "json" => Self::from_json(&content),
            _ => Err(anyhow::anyhow!("Unsupported config format: {}", extension)),
        }
        .with_context(|| format!("Invalid config file: {:?}", path))?;

        debug!(path = %path.display(), "Loaded configuration");
        Ok(config)
    }

    /// Parse and validate configuration from KDL format
    pub fn from_kdl(content: &str) -> Result<Self> {
        let doc: ::kdl::KdlDocument = content.parse().map_err(|e: ::kdl::KdlError| {
            use miette::Diagnostic;

            let mut error_msg = String::from("KDL configuration parse error:\n");
            let mut found_details = false;
            if let Some(related) = e.related() {
                for diagnostic in related {
                    error_msg.push_str(&format!("  {}\n", diagnostic));
                    found_details = true;
                    for label in diagnostic.labels().into_iter().flatten() {
                        let (line, col) = offset_to_line_col(content, label.offset());
                        error_msg.push_str(&format!("  --> at line {}, column {}\n", line, col));
                    }
                }
            }
            if !found_details {
                error_msg.push_str(&format!("  {}\n", e));
            }

            anyhow::anyhow!("{}", error_msg)
        })?;

        let config = kdl_parser::parse_kdl_document(doc)?;
        config.validate_all()?;
        Ok(config)
    }

    /// Parse and validate configuration from JSON format
    pub fn from_json(content: &str) -> Result<Self> {
        let config: Self =
            serde_json::from_str(content).context("Failed to parse JSON configuration")?;
        config.validate_all()?;
        Ok(config)
    }

    /// Run field and schema validation
    pub fn validate_all(&self) -> Result<()> {
        self.validate()
            .map_err(|e| anyhow::anyhow!("Configuration validation failed: {}", e))
    }
}

/// Convert a byte offset to line and column numbers (1-indexed)
fn offset_to_line_col(content: &str, offset: usize) -> (usize, usize) {
    let mut line = 1;
    let mut col = 1;
    for (i, ch) in content.char_indices() {
        if i >= offset {
            break;
        }
        if ch == '\n' {
            line += 1;
            col = 1;
        } else {
            col += 1;
        }
    }
    (line, col)
}
