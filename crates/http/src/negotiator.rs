//! ALPN protocol negotiation
//!
//! [`ProtocolNegotiator`] turns the protocol name chosen during the TLS
//! handshake into a single user event for the rest of the pipeline. Supported
//! names become [`NegotiationOutcome::Negotiated`]; anything else becomes
//! [`NegotiationOutcome::Failed`], whose event value is the boolean `false`.
//! Deciding what to do with a failure (close, or fall back) is up to the stage
//! consuming the event.

use std::fmt;

use serde::{Serialize, Serializer};
use tracing::{debug, warn};

use iny_common::{ApplicationProtocol, InyError, InyResult};

/// Result of ALPN negotiation for one connection
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NegotiationOutcome {
    Negotiated(ApplicationProtocol),
    Failed,
}

impl NegotiationOutcome {
    pub fn protocol(&self) -> Option<ApplicationProtocol> {
        match self {
            Self::Negotiated(protocol) => Some(*protocol),
            Self::Failed => None,
        }
    }

    pub fn is_negotiated(&self) -> bool {
        matches!(self, Self::Negotiated(_))
    }
}

/// The event value: the protocol name on success, `false` on failure.
impl Serialize for NegotiationOutcome {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Negotiated(protocol) => serializer.serialize_str(protocol.as_str()),
            Self::Failed => serializer.serialize_bool(false),
        }
    }
}

impl fmt::Display for NegotiationOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Negotiated(protocol) => write!(f, "{}", protocol),
            Self::Failed => f.write_str("false"),
        }
    }
}

/// The downstream side of the connection pipeline.
pub trait PipelineContext {
    /// Pass a user event to the next stage. Fire-and-forget.
    fn fire_user_event(&mut self, event: NegotiationOutcome);

    /// Close the connection.
    fn close(&mut self);
}

/// Converts an ALPN result into a pipeline event, once per connection.
#[derive(Debug)]
pub struct ProtocolNegotiator {
    fallback: ApplicationProtocol,
    fired: bool,
}

impl Default for ProtocolNegotiator {
    fn default() -> Self {
        Self::new()
    }
}

impl ProtocolNegotiator {
    pub fn new() -> Self {
        Self {
            fallback: ApplicationProtocol::FALLBACK,
            fired: false,
        }
    }

    /// Protocol assumed when the peer does not negotiate
    pub fn fallback_protocol(&self) -> ApplicationProtocol {
        self.fallback
    }

    pub fn has_fired(&self) -> bool {
        self.fired
    }

    /// Handle the protocol name selected by the ALPN extension.
    ///
    /// Fires exactly one event on `ctx` and returns it. A second call on the
    /// same negotiator fires nothing and fails with
    /// [`InyError::UsageViolation`].
    pub fn on_protocol_selected<C>(
        &mut self,
        ctx: &mut C,
        name: &str,
    ) -> InyResult<NegotiationOutcome>
    where
        C: PipelineContext + ?Sized,
    {
        self.mark_fired()?;

        let outcome = match name.parse::<ApplicationProtocol>() {
            Ok(protocol) => {
                debug!(protocol = %protocol, "Application protocol negotiated");
                NegotiationOutcome::Negotiated(protocol)
            }
            Err(e) => {
                warn!(protocol = %name, error = %e, "Application protocol negotiation failed");
                NegotiationOutcome::Failed
            }
        };

        ctx.fire_user_event(outcome);
        Ok(outcome)
    }

    /// Handle a completed TLS handshake.
    ///
    /// `alpn` is the raw protocol id agreed in the handshake; `None` means the
    /// peer did not negotiate and the fallback protocol applies.
    pub fn on_handshake_complete<C>(
        &mut self,
        ctx: &mut C,
        alpn: Option<&[u8]>,
    ) -> InyResult<NegotiationOutcome>
    where
        C: PipelineContext + ?Sized,
    {
        match alpn {
            None => {
                debug!(fallback = %self.fallback, "Peer sent no ALPN extension, using fallback");
                let fallback = self.fallback.as_str();
                self.on_protocol_selected(ctx, fallback)
            }
            Some(id) => match ApplicationProtocol::from_alpn(id) {
                Some(protocol) => self.on_protocol_selected(ctx, protocol.as_str()),
                None => self.on_protocol_selected(ctx, &String::from_utf8_lossy(id)),
            },
        }
    }

    /// Handle a failed TLS handshake: no protocol event is fired and the
    /// connection is closed.
    ///
    /// Returns the cause as [`InyError::Tls`] for the caller to propagate.
    pub fn on_handshake_failed<C, E>(&mut self, ctx: &mut C, error: E) -> InyResult<()>
    where
        C: PipelineContext + ?Sized,
        E: std::error::Error + Send + Sync + 'static,
    {
        self.mark_fired()?;
        warn!(error = %error, "TLS handshake failed, closing connection");
        ctx.close();
        Err(InyError::tls("handshake failed", error))
    }

    fn mark_fired(&mut self) -> InyResult<()> {
        if self.fired {
            return Err(InyError::usage(
                "protocol negotiator",
                "negotiation already completed for this connection",
            ));
        }
        self.fired = true;
        Ok(())
    }
}
