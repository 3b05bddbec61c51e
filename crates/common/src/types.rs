//! Common type definitions for Iny.
//!
//! Application protocol identifiers as they appear on the wire during ALPN
//! (RFC 7301) negotiation.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::errors::InyError;

/// Application protocol selected for a connection.
///
/// Names compare by exact, case-sensitive equality: `HTTP/1.1` is not
/// `http/1.1`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ApplicationProtocol {
    #[serde(rename = "http/1.1")]
    Http11,
    #[serde(rename = "h2")]
    Http2,
}

impl ApplicationProtocol {
    /// Protocol advertised when the peer does not take part in ALPN.
    pub const FALLBACK: Self = Self::Http11;

    /// Every protocol this stack can serve, most preferred first.
    pub const SUPPORTED: [Self; 2] = [Self::Http2, Self::Http11];

    /// Protocol name as registered with IANA
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Http11 => "http/1.1",
            Self::Http2 => "h2",
        }
    }

    /// Protocol name as ALPN wire bytes
    pub fn alpn_id(&self) -> &'static [u8] {
        self.as_str().as_bytes()
    }

    /// Look up a protocol from raw ALPN bytes
    pub fn from_alpn(id: &[u8]) -> Option<Self> {
        Self::SUPPORTED.into_iter().find(|p| p.alpn_id() == id)
    }
}

impl FromStr for ApplicationProtocol {
    type Err = InyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "http/1.1" => Ok(Self::Http11),
            "h2" => Ok(Self::Http2),
            other => Err(InyError::unsupported_protocol(other)),
        }
    }
}

impl fmt::Display for ApplicationProtocol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
