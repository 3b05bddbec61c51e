//! Iny HTTP Library
//!
//! Extension points for host-defined logic at two places in an HTTP
//! connection's setup:
//!
//! - **Protocol negotiation**: [`ProtocolNegotiator`] turns the ALPN result of
//!   the TLS handshake into a pipeline event (`h2`, `http/1.1`, or `false`).
//! - **Handler construction**: [`HandlerBuilder`] runs an injected
//!   [`HandlerFactory`] inside the connection framework's construction
//!   sequence and registers the resulting handler as the frame listener.
//!
//! Framing, flow control and the TLS handshake itself belong to the
//! connection framework described in [`framework`].
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use iny_http::{HandlerBuilder, Http2Settings};
//!
//! let mut builder = HandlerBuilder::listening(|decoder, encoder, settings: Http2Settings| {
//!     Arc::new(MyHandler::new(decoder, encoder, settings))
//! });
//! let handler = builder.build(&mut connection)?;
//! ```

pub mod builder;
pub mod framework;
pub mod negotiator;
pub mod settings;
pub mod tls;

pub use builder::{BuilderState, HandlerBuilder, HandlerFactory};
pub use framework::{
    construct, ConnectionFramework, ConnectionHandler, ConnectionPrimitives, ConstructionHook,
    FrameListener,
};
pub use negotiator::{NegotiationOutcome, PipelineContext, ProtocolNegotiator};
pub use settings::Http2Settings;
