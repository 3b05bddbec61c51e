//! Shared test utilities for integration tests
//!
//! Mock connection framework, pipeline context and handlers used by the
//! negotiation and handler builder tests.

#![allow(dead_code)]

use std::sync::Arc;

use bytes::Bytes;
use parking_lot::Mutex;
use tracing::Level;

use iny_common::{InyError, InyResult};
use iny_config::Http2Config;
use iny_http::{
    ConnectionFramework, ConnectionHandler, ConnectionPrimitives, FrameListener, Http2Settings,
    NegotiationOutcome, PipelineContext,
};

// ============================================================================
// Pipeline
// ============================================================================

/// Pipeline context that records fired events
#[derive(Debug, Default)]
pub struct RecordingContext {
    pub events: Vec<NegotiationOutcome>,
    pub closed: bool,
}

impl PipelineContext for RecordingContext {
    fn fire_user_event(&mut self, event: NegotiationOutcome) {
        self.events.push(event);
    }

    fn close(&mut self) {
        self.closed = true;
    }
}

// ============================================================================
// Connection Framework
// ============================================================================

/// Opaque decoder stand-in, identified by id
#[derive(Debug, PartialEq, Eq)]
pub struct MockDecoder {
    pub id: u32,
}

/// Opaque encoder stand-in, identified by id
#[derive(Debug, PartialEq, Eq)]
pub struct MockEncoder {
    pub id: u32,
}

/// Framework that hands out one set of primitives and records the wiring
pub struct MockFramework {
    primitives: Option<ConnectionPrimitives<MockDecoder, MockEncoder>>,
    pub listener: Option<Arc<dyn FrameListener>>,
    pub frame_log_level: Option<Level>,
    pub finished: Vec<String>,
    pub fail_primitives: bool,
    pub fail_wiring: bool,
}

impl MockFramework {
    pub fn new(decoder_id: u32, encoder_id: u32, settings: Http2Settings) -> Self {
        Self {
            primitives: Some(ConnectionPrimitives {
                decoder: MockDecoder { id: decoder_id },
                encoder: MockEncoder { id: encoder_id },
                initial_settings: settings,
            }),
            listener: None,
            frame_log_level: None,
            finished: Vec::new(),
            fail_primitives: false,
            fail_wiring: false,
        }
    }

    /// Framework seeded from the default HTTP/2 configuration
    pub fn with_defaults() -> Self {
        Self::new(1, 2, Http2Settings::from_config(&Http2Config::default()))
    }

    /// Deliver a DATA frame to the registered listener
    pub fn deliver_data(&self, stream_id: u32, data: &'static [u8]) -> usize {
        self.listener
            .as_ref()
            .expect("no frame listener registered")
            .on_data_read(stream_id, &Bytes::from_static(data), 0, false)
    }
}

impl ConnectionFramework for MockFramework {
    type Decoder = MockDecoder;
    type Encoder = MockEncoder;

    fn connection_primitives(&mut self) -> InyResult<ConnectionPrimitives<MockDecoder, MockEncoder>> {
        if self.fail_primitives {
            return Err(InyError::framework("codec unavailable"));
        }
        self.primitives
            .take()
            .ok_or_else(|| InyError::framework("primitives already taken"))
    }

    fn frame_listener(&self) -> Option<&Arc<dyn FrameListener>> {
        self.listener.as_ref()
    }

    fn set_frame_listener(&mut self, listener: Arc<dyn FrameListener>) {
        self.listener = Some(listener);
    }

    fn clear_frame_listener(&mut self) {
        self.listener = None;
    }

    fn set_frame_logger(&mut self, level: Level) {
        self.frame_log_level = Some(level);
    }

    fn handler_built(&mut self, handler: &Arc<dyn ConnectionHandler>) -> InyResult<()> {
        if self.fail_wiring {
            return Err(InyError::framework("initial SETTINGS could not be written"));
        }
        self.finished.push(handler.handler_name().to_string());
        Ok(())
    }
}

// ============================================================================
// Handlers
// ============================================================================

/// Handler that is also a frame listener and records what it was built from
#[derive(Debug)]
pub struct RecordingHandler {
    pub decoder: MockDecoder,
    pub encoder: MockEncoder,
    pub settings: Http2Settings,
    pub data_frames: Mutex<Vec<(u32, Bytes)>>,
}

impl RecordingHandler {
    pub fn new(decoder: MockDecoder, encoder: MockEncoder, settings: Http2Settings) -> Self {
        Self {
            decoder,
            encoder,
            settings,
            data_frames: Mutex::new(Vec::new()),
        }
    }
}

impl ConnectionHandler for RecordingHandler {
    fn handler_name(&self) -> &str {
        "recording"
    }

    fn into_frame_listener(self: Arc<Self>) -> Option<Arc<dyn FrameListener>> {
        Some(self)
    }
}

impl FrameListener for RecordingHandler {
    fn on_data_read(&self, stream_id: u32, data: &Bytes, padding: usize, _end: bool) -> usize {
        self.data_frames.lock().push((stream_id, data.clone()));
        data.len() + padding
    }
}

/// Handler without the frame listener capability
#[derive(Debug)]
pub struct DeafHandler;

impl ConnectionHandler for DeafHandler {
    fn handler_name(&self) -> &str {
        "deaf"
    }
}

/// Address of the object behind an `Arc`, ignoring vtables
pub fn addr<T: ?Sized>(arc: &Arc<T>) -> *const () {
    Arc::as_ptr(arc) as *const ()
}
