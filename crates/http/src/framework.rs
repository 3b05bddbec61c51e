//! Connection framework seam
//!
//! The HTTP/2 connection framework (framing, flow control, stream lifecycle)
//! lives outside this crate. This module describes the part of it that
//! handler construction touches:
//!
//! - [`ConnectionFramework`]: what the framework exposes during construction
//! - [`ConstructionHook`]: the overridable three-argument construction step
//! - [`construct`]: the framework's own construction sequence
//! - [`ConnectionHandler`] / [`FrameListener`]: what a constructed handler is
//!
//! ```text
//! construct(framework, hook)
//!   ├─ framework.connection_primitives()      -> (decoder, encoder, settings)
//!   ├─ hook.build_from(framework, decoder, encoder, settings)
//!   │     ├─ framework.set_frame_logger(..)   (optional)
//!   │     └─ framework.set_frame_listener(..)
//!   ├─ require framework.frame_listener()
//!   └─ framework.handler_built(&handler)      -> settings ack, flow control, ...
//!         └─ on error: framework.clear_frame_listener()
//! ```

use std::sync::Arc;

use bytes::Bytes;
use http::HeaderMap;
use tracing::{warn, Level};

use iny_common::{InyError, InyResult};

use crate::settings::Http2Settings;

/// Receiver of parsed HTTP/2 frames.
///
/// All callbacks default to no-ops. `on_data_read` returns the number of
/// bytes processed and handed back to flow control; the default consumes
/// everything.
pub trait FrameListener: Send + Sync {
    fn on_data_read(
        &self,
        _stream_id: u32,
        data: &Bytes,
        padding: usize,
        _end_of_stream: bool,
    ) -> usize {
        data.len() + padding
    }

    fn on_headers_read(&self, _stream_id: u32, _headers: &HeaderMap, _end_of_stream: bool) {}

    fn on_settings_read(&self, _settings: &Http2Settings) {}

    fn on_settings_ack_read(&self) {}

    fn on_ping_read(&self, _data: u64) {}

    fn on_ping_ack_read(&self, _data: u64) {}

    fn on_rst_stream_read(&self, _stream_id: u32, _error_code: u32) {}

    fn on_go_away_read(&self, _last_stream_id: u32, _error_code: u32, _debug_data: &Bytes) {}

    fn on_window_update_read(&self, _stream_id: u32, _increment: u32) {}
}

/// A connection handler produced by a handler factory.
pub trait ConnectionHandler: Send + Sync {
    /// Name used in logs and errors
    fn handler_name(&self) -> &str {
        std::any::type_name::<Self>()
    }

    /// Expose this handler as a frame listener.
    ///
    /// Handlers that receive their own frames return `Some(self)`. The
    /// default reports the capability as missing.
    fn into_frame_listener(self: Arc<Self>) -> Option<Arc<dyn FrameListener>> {
        None
    }
}

/// The raw materials the framework derives for one connection.
#[derive(Debug)]
pub struct ConnectionPrimitives<D, E> {
    pub decoder: D,
    pub encoder: E,
    pub initial_settings: Http2Settings,
}

/// The connection framework as seen from handler construction.
pub trait ConnectionFramework {
    type Decoder;
    type Encoder;

    /// Derive the decoder, encoder and initial settings for this connection.
    /// Called once per construction.
    fn connection_primitives(
        &mut self,
    ) -> InyResult<ConnectionPrimitives<Self::Decoder, Self::Encoder>>;

    /// The listener that will receive parsed frames, if one is registered.
    fn frame_listener(&self) -> Option<&Arc<dyn FrameListener>>;

    fn set_frame_listener(&mut self, listener: Arc<dyn FrameListener>);

    /// Drop the registered listener. Called when construction fails after
    /// registration.
    fn clear_frame_listener(&mut self);

    /// Log inbound and outbound frames at `level`. Frame logging belongs to
    /// the framework's reader and writer; the default ignores the request.
    fn set_frame_logger(&mut self, _level: Level) {}

    /// Remaining wiring once the handler exists.
    fn handler_built(&mut self, _handler: &Arc<dyn ConnectionHandler>) -> InyResult<()> {
        Ok(())
    }
}

/// The overridable construction step invoked by [`construct`].
pub trait ConstructionHook<F: ConnectionFramework + ?Sized> {
    fn build_from(
        &mut self,
        framework: &mut F,
        decoder: F::Decoder,
        encoder: F::Encoder,
        initial_settings: Http2Settings,
    ) -> InyResult<Arc<dyn ConnectionHandler>>;
}

/// Run the framework's construction sequence with `hook` as the
/// three-argument step.
pub fn construct<F, H>(framework: &mut F, hook: &mut H) -> InyResult<Arc<dyn ConnectionHandler>>
where
    F: ConnectionFramework + ?Sized,
    H: ConstructionHook<F> + ?Sized,
{
    let ConnectionPrimitives {
        decoder,
        encoder,
        initial_settings,
    } = framework.connection_primitives()?;

    let handler = hook.build_from(framework, decoder, encoder, initial_settings)?;

    if framework.frame_listener().is_none() {
        return Err(InyError::framework(format!(
            "no frame listener registered for handler '{}'",
            handler.handler_name()
        )));
    }

    if let Err(e) = framework.handler_built(&handler) {
        warn!(
            handler = %handler.handler_name(),
            error = %e,
            "Connection wiring failed, unregistering frame listener"
        );
        framework.clear_frame_listener();
        return Err(e);
    }
    Ok(handler)
}
