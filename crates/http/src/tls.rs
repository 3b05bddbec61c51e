//! TLS ALPN wiring
//!
//! Connects rustls to protocol negotiation: the configured protocol list is
//! advertised through [`apply_alpn`], and [`negotiate`] feeds the protocol the
//! handshake agreed on into a [`ProtocolNegotiator`].

use rustls::{ServerConfig, ServerConnection};
use tracing::debug;

use iny_common::{ApplicationProtocol, InyResult};
use iny_config::NegotiationConfig;

use crate::negotiator::{NegotiationOutcome, PipelineContext, ProtocolNegotiator};

/// ALPN wire identifiers for `protocols`, in order
pub fn alpn_protocols(protocols: &[ApplicationProtocol]) -> Vec<Vec<u8>> {
    protocols.iter().map(|p| p.alpn_id().to_vec()).collect()
}

/// Advertise the configured protocols on a rustls server configuration
pub fn apply_alpn(config: &mut ServerConfig, negotiation: &NegotiationConfig) {
    config.alpn_protocols = alpn_protocols(&negotiation.protocols);

    debug!(
        protocols = ?negotiation.protocols.iter().map(|p| p.as_str()).collect::<Vec<_>>(),
        "Configured ALPN protocols"
    );
}

/// Run protocol negotiation for a connection whose handshake has completed
pub fn negotiate<C>(
    negotiator: &mut ProtocolNegotiator,
    ctx: &mut C,
    connection: &ServerConnection,
) -> InyResult<NegotiationOutcome>
where
    C: PipelineContext + ?Sized,
{
    negotiator.on_handshake_complete(ctx, connection.alpn_protocol())
}
