//! Handler builder tests
//!
//! Runs HandlerBuilder against a mock connection framework and checks the
//! factory call, the capability check, listener registration and the
//! single-use lifecycle.

mod common;

use std::sync::Arc;

use bytes::Bytes;
use parking_lot::Mutex;
use tracing::Level;

use common::{addr, DeafHandler, MockDecoder, MockEncoder, MockFramework, RecordingHandler};
use iny_common::InyError;
use iny_config::Http2Config;
use iny_http::{
    BuilderState, ConnectionHandler, ConstructionHook, HandlerBuilder, HandlerFactory,
    Http2Settings,
};

type Calls = Arc<Mutex<Vec<(u32, u32, Http2Settings)>>>;

/// Dynamic factory that records its arguments and keeps the handler it made
fn recording_factory(
    calls: Calls,
    made: Arc<Mutex<Option<Arc<RecordingHandler>>>>,
) -> HandlerFactory<MockDecoder, MockEncoder> {
    Arc::new(move |decoder: MockDecoder, encoder: MockEncoder, settings: Http2Settings| {
        calls.lock().push((decoder.id, encoder.id, settings.clone()));
        let handler = Arc::new(RecordingHandler::new(decoder, encoder, settings));
        *made.lock() = Some(handler.clone());
        handler as Arc<dyn ConnectionHandler>
    })
}

#[test]
fn test_build_returns_factory_handler_and_registers_it() {
    let calls = Calls::default();
    let made = Arc::new(Mutex::new(None));
    let mut framework = MockFramework::with_defaults();
    let mut builder = HandlerBuilder::new(recording_factory(calls.clone(), made.clone()));

    let handler = builder.build(&mut framework).unwrap();

    let made = made.lock().clone().expect("factory was not called");
    assert_eq!(addr(&handler), addr(&made));
    let listener = framework.listener.as_ref().expect("listener registered");
    assert_eq!(addr(listener), addr(&made));
    assert_eq!(framework.finished, vec!["recording".to_string()]);
    assert_eq!(builder.state(), BuilderState::Built);

    // Frames delivered by the framework reach the handler
    assert_eq!(framework.deliver_data(3, b"hello"), 5);
    assert_eq!(
        made.data_frames.lock().as_slice(),
        &[(3, Bytes::from_static(b"hello"))]
    );
}

#[test]
fn test_factory_receives_framework_primitives_once_in_order() {
    let settings = Http2Settings::new()
        .with(Http2Settings::MAX_CONCURRENT_STREAMS, 7)
        .with(0x99, 12);
    let calls = Calls::default();
    let made = Arc::new(Mutex::new(None));
    let mut framework = MockFramework::new(11, 22, settings.clone());
    let mut builder = HandlerBuilder::new(recording_factory(calls.clone(), made.clone()));

    builder.build(&mut framework).unwrap();

    assert_eq!(calls.lock().as_slice(), &[(11, 22, settings.clone())]);
    let made = made.lock().clone().unwrap();
    assert_eq!(made.decoder, MockDecoder { id: 11 });
    assert_eq!(made.encoder, MockEncoder { id: 22 });
    assert_eq!(made.settings, settings);
}

#[test]
fn test_handler_without_listener_capability_fails() {
    let mut framework = MockFramework::with_defaults();
    let mut builder = HandlerBuilder::from_fn(|_: MockDecoder, _: MockEncoder, _| {
        Arc::new(DeafHandler) as Arc<dyn ConnectionHandler>
    });

    let err = builder.build(&mut framework).err().expect("build should fail");

    assert!(matches!(
        err,
        InyError::InvalidHandlerCapability { ref handler } if handler == "deaf"
    ));
    assert!(err.is_fatal());
    assert!(framework.listener.is_none());
    assert!(framework.finished.is_empty());
    assert_eq!(builder.state(), BuilderState::Failed);
}

#[test]
fn test_listening_factory_is_checked_statically() {
    let mut framework = MockFramework::with_defaults();
    let mut builder = HandlerBuilder::listening(|decoder, encoder, settings| {
        Arc::new(RecordingHandler::new(decoder, encoder, settings))
    });

    let handler = builder.build(&mut framework).unwrap();

    let listener = framework.listener.as_ref().unwrap();
    assert_eq!(addr(&handler), addr(listener));
    assert_eq!(handler.handler_name(), "recording");
}

#[test]
fn test_second_build_is_rejected() {
    let calls = Calls::default();
    let made = Arc::new(Mutex::new(None));
    let mut builder = HandlerBuilder::new(recording_factory(calls.clone(), made));

    builder.build(&mut MockFramework::with_defaults()).unwrap();
    let err = builder
        .build(&mut MockFramework::with_defaults())
        .err()
        .expect("second build should fail");

    assert!(matches!(err, InyError::UsageViolation { .. }));
    assert_eq!(calls.lock().len(), 1);
    assert_eq!(builder.state(), BuilderState::Built);
}

#[test]
fn test_failed_builder_cannot_be_retried() {
    let mut builder = HandlerBuilder::from_fn(|_: MockDecoder, _: MockEncoder, _| {
        Arc::new(DeafHandler) as Arc<dyn ConnectionHandler>
    });
    assert!(builder.build(&mut MockFramework::with_defaults()).is_err());

    let err = builder
        .build(&mut MockFramework::with_defaults())
        .err()
        .unwrap();
    assert!(matches!(err, InyError::UsageViolation { .. }));
}

#[test]
fn test_build_from_outside_build_is_rejected() {
    let calls = Calls::default();
    let made = Arc::new(Mutex::new(None));
    let mut framework = MockFramework::with_defaults();
    let mut builder = HandlerBuilder::new(recording_factory(calls.clone(), made));

    let err = builder
        .build_from(
            &mut framework,
            MockDecoder { id: 1 },
            MockEncoder { id: 2 },
            Http2Settings::new(),
        )
        .err()
        .unwrap();

    assert!(matches!(err, InyError::UsageViolation { .. }));
    assert!(calls.lock().is_empty());
    assert!(framework.listener.is_none());
    assert_eq!(builder.state(), BuilderState::Unbuilt);
}

#[test]
fn test_framework_errors_propagate() {
    let calls = Calls::default();
    let made = Arc::new(Mutex::new(None));
    let mut framework = MockFramework::with_defaults();
    framework.fail_primitives = true;
    let mut builder = HandlerBuilder::new(recording_factory(calls.clone(), made));

    let err = builder.build(&mut framework).err().unwrap();

    assert!(matches!(err, InyError::Framework { .. }));
    assert!(calls.lock().is_empty());
    assert_eq!(builder.state(), BuilderState::Failed);
}

#[test]
fn test_frame_logging_keeps_handler_as_listener() {
    let config = Http2Config {
        frame_logging: true,
        frame_log_level: "debug".to_string(),
        ..Http2Config::default()
    };
    let mut framework = MockFramework::with_defaults();
    let mut builder = HandlerBuilder::listening(|decoder, encoder, settings| {
        Arc::new(RecordingHandler::new(decoder, encoder, settings))
    })
    .configure(&config)
    .unwrap();

    let handler = builder.build(&mut framework).unwrap();

    let listener = framework.listener.as_ref().unwrap();
    assert_eq!(addr(listener), addr(&handler));
    assert_eq!(framework.frame_log_level, Some(Level::DEBUG));
}

#[test]
fn test_frame_logging_is_off_by_default() {
    let mut framework = MockFramework::with_defaults();
    let mut builder = HandlerBuilder::new(recording_factory(
        Calls::default(),
        Arc::new(Mutex::new(None)),
    ))
    .configure(&Http2Config::default())
    .unwrap();

    builder.build(&mut framework).unwrap();

    assert_eq!(framework.frame_log_level, None);
}

#[test]
fn test_wiring_failure_unregisters_listener() {
    let calls = Calls::default();
    let mut framework = MockFramework::with_defaults();
    framework.fail_wiring = true;
    let mut builder = HandlerBuilder::new(recording_factory(
        calls.clone(),
        Arc::new(Mutex::new(None)),
    ));

    let err = builder.build(&mut framework).err().expect("wiring should fail");

    assert!(matches!(err, InyError::Framework { .. }));
    assert_eq!(calls.lock().len(), 1);
    assert!(framework.listener.is_none());
    assert!(framework.finished.is_empty());
    assert_eq!(builder.state(), BuilderState::Failed);
}
