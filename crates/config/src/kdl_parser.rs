//! KDL configuration parsing
//!
//! This module contains the functions that turn a KDL document into
//! [`Config`]. Unknown top-level nodes are ignored with a warning.
//!
//! ```kdl
//! negotiation {
//!     protocols "h2" "http/1.1"
//! }
//! http2 {
//!     max-concurrent-streams 250
//!     initial-window-size 1048576
//!     frame-logging #true
//!     frame-log-level "debug"
//! }
//! ```

use anyhow::{anyhow, Context, Result};
use tracing::warn;

use iny_common::types::ApplicationProtocol;

use crate::server::*;
use crate::Config;

// ============================================================================
// KDL Parsing Helpers
// ============================================================================

/// Helper to get an integer entry from a KDL node
pub fn get_int_entry(node: &kdl::KdlNode, name: &str) -> Option<i128> {
    node.children()
        .and_then(|children| children.get(name))
        .and_then(|n| n.entries().first())
        .and_then(|e| e.value().as_integer())
}

/// Helper to get a boolean entry from a KDL node
pub fn get_bool_entry(node: &kdl::KdlNode, name: &str) -> Option<bool> {
    node.children()
        .and_then(|children| children.get(name))
        .and_then(|n| n.entries().first())
        .and_then(|e| e.value().as_bool())
}

/// Helper to get a string entry from a KDL node
pub fn get_string_entry(node: &kdl::KdlNode, name: &str) -> Option<String> {
    node.children()
        .and_then(|children| children.get(name))
        .and_then(|n| n.entries().first())
        .and_then(|e| e.value().as_string())
        .map(|s| s.to_string())
}

/// Helper to get a u32 entry, rejecting values out of range
fn get_u32_entry(node: &kdl::KdlNode, name: &str) -> Result<Option<u32>> {
    get_int_entry(node, name)
        .map(|v| u32::try_from(v).with_context(|| format!("'{}' out of range: {}", name, v)))
        .transpose()
}

// ============================================================================
// Top-Level Document Parser
// ============================================================================

/// Convert a parsed KDL document to Config
pub fn parse_kdl_document(doc: kdl::KdlDocument) -> Result<Config> {
    let mut negotiation = None;
    let mut http2 = None;

    for node in doc.nodes() {
        match node.name().value() {
            "negotiation" => {
                negotiation = Some(parse_negotiation_config(node)?);
            }
            "http2" => {
                http2 = Some(parse_http2_config(node)?);
            }
            other => {
                warn!(node = %other, "Ignoring unknown configuration node");
            }
        }
    }

    Ok(Config {
        negotiation: negotiation.unwrap_or_default(),
        http2: http2.unwrap_or_default(),
    })
}

// ============================================================================
// Negotiation Parsing
// ============================================================================

/// Parse the negotiation block
pub fn parse_negotiation_config(node: &kdl::KdlNode) -> Result<NegotiationConfig> {
    let Some(protocols_node) = node.children().and_then(|c| c.get("protocols")) else {
        return Ok(NegotiationConfig::default());
    };

    let protocols = protocols_node
        .entries()
        .iter()
        .map(|entry| {
            let name = entry
                .value()
                .as_string()
                .ok_or_else(|| anyhow!("protocol names must be strings"))?;
            name.parse::<ApplicationProtocol>()
                .context("invalid entry in 'protocols'")
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(NegotiationConfig { protocols })
}

// ============================================================================
// HTTP/2 Parsing
// ============================================================================

/// Parse the http2 block
pub fn parse_http2_config(node: &kdl::KdlNode) -> Result<Http2Config> {
    Ok(Http2Config {
        header_table_size: get_u32_entry(node, "header-table-size")?,
        enable_push: get_bool_entry(node, "enable-push"),
        max_concurrent_streams: get_u32_entry(node, "max-concurrent-streams")?
            .unwrap_or_else(default_max_concurrent_streams),
        initial_window_size: get_u32_entry(node, "initial-window-size")?
            .unwrap_or_else(default_initial_window_size),
        max_frame_size: get_u32_entry(node, "max-frame-size")?
            .unwrap_or_else(default_max_frame_size),
        max_header_list_size: get_u32_entry(node, "max-header-list-size")?,
        frame_logging: get_bool_entry(node, "frame-logging").unwrap_or(false),
        frame_log_level: get_string_entry(node, "frame-log-level")
            .unwrap_or_else(default_frame_log_level),
    })
}
