//! HTTP/2 connection handler builder
//!
//! [`HandlerBuilder`] plugs an injected handler factory into the framework's
//! construction sequence. The framework derives the decoder, encoder and
//! initial settings; the builder hands them to the factory, makes sure the
//! result can receive frames, and registers it as the connection's frame
//! listener.
//!
//! A builder serves exactly one connection:
//!
//! ```text
//! Unbuilt --build()--> Constructing --build_from() ok--> Built
//!                                   \--error----------> Failed
//! ```

use std::fmt;
use std::sync::Arc;

use tracing::{debug, error, info, Level};

use iny_common::{InyError, InyResult};
use iny_config::Http2Config;

use crate::framework::{
    construct, ConnectionFramework, ConnectionHandler, ConstructionHook, FrameListener,
};
use crate::settings::Http2Settings;

/// Injected construction step: `(decoder, encoder, initial settings) -> handler`.
///
/// Shared with the caller; the builder only keeps a reference.
pub type HandlerFactory<D, E> =
    Arc<dyn Fn(D, E, Http2Settings) -> Arc<dyn ConnectionHandler> + Send + Sync>;

type ListeningFactory<D, E> = Arc<
    dyn Fn(D, E, Http2Settings) -> (Arc<dyn ConnectionHandler>, Arc<dyn FrameListener>)
        + Send
        + Sync,
>;

enum Factory<D, E> {
    /// Capability checked at runtime
    Checked(HandlerFactory<D, E>),
    /// Capability guaranteed by the factory's return type
    Listening(ListeningFactory<D, E>),
}

/// Lifecycle of a [`HandlerBuilder`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuilderState {
    Unbuilt,
    Constructing,
    Built,
    Failed,
}

impl fmt::Display for BuilderState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unbuilt => write!(f, "unbuilt"),
            Self::Constructing => write!(f, "constructing"),
            Self::Built => write!(f, "built"),
            Self::Failed => write!(f, "failed"),
        }
    }
}

const COMPONENT: &str = "handler builder";

/// Single-use builder bridging the framework's construction sequence to an
/// injected [`HandlerFactory`].
pub struct HandlerBuilder<D, E> {
    factory: Factory<D, E>,
    state: BuilderState,
    frame_log_level: Option<Level>,
}

impl<D, E> HandlerBuilder<D, E> {
    /// Create a builder around a shared factory.
    ///
    /// The factory's handler is checked for the frame listener capability
    /// after construction.
    pub fn new(factory: HandlerFactory<D, E>) -> Self {
        Self::with_factory(Factory::Checked(factory))
    }

    /// Create a builder from a closure returning a type-erased handler.
    pub fn from_fn<F>(factory: F) -> Self
    where
        F: Fn(D, E, Http2Settings) -> Arc<dyn ConnectionHandler> + Send + Sync + 'static,
    {
        Self::new(Arc::new(factory))
    }

    /// Create a builder whose factory returns a concrete handler type that
    /// is statically known to be a frame listener. Construction cannot fail
    /// the capability check.
    pub fn listening<H, F>(factory: F) -> Self
    where
        D: 'static,
        E: 'static,
        H: ConnectionHandler + FrameListener + 'static,
        F: Fn(D, E, Http2Settings) -> Arc<H> + Send + Sync + 'static,
    {
        let factory: ListeningFactory<D, E> = Arc::new(move |decoder, encoder, settings| {
            let handler = factory(decoder, encoder, settings);
            let listener: Arc<dyn FrameListener> = handler.clone();
            (handler as Arc<dyn ConnectionHandler>, listener)
        });
        Self::with_factory(Factory::Listening(factory))
    }

    fn with_factory(factory: Factory<D, E>) -> Self {
        Self {
            factory,
            state: BuilderState::Unbuilt,
            frame_log_level: None,
        }
    }

    /// Ask the framework to log frames at `level`. The handler stays the
    /// registered frame listener.
    pub fn with_frame_logger(mut self, level: Level) -> Self {
        self.frame_log_level = Some(level);
        self
    }

    /// Apply the frame logging settings from configuration.
    pub fn configure(self, config: &Http2Config) -> InyResult<Self> {
        if !config.frame_logging {
            return Ok(self);
        }
        let level = config.frame_log_level.parse::<Level>().map_err(|_| {
            InyError::config(format!("invalid frame log level '{}'", config.frame_log_level))
        })?;
        Ok(self.with_frame_logger(level))
    }

    pub fn state(&self) -> BuilderState {
        self.state
    }

    /// Build the connection handler.
    ///
    /// Runs the framework's construction sequence, which calls back into
    /// [`ConstructionHook::build_from`] exactly once. Calling `build` again
    /// fails with [`InyError::UsageViolation`].
    pub fn build<F>(&mut self, framework: &mut F) -> InyResult<Arc<dyn ConnectionHandler>>
    where
        F: ConnectionFramework<Decoder = D, Encoder = E> + ?Sized,
    {
        if self.state != BuilderState::Unbuilt {
            return Err(InyError::usage(
                COMPONENT,
                format!("build() called on a {} builder", self.state),
            ));
        }
        self.state = BuilderState::Constructing;

        match construct(framework, self) {
            Ok(handler) => {
                self.state = BuilderState::Built;
                info!(handler = %handler.handler_name(), "HTTP/2 connection handler built");
                Ok(handler)
            }
            Err(e) => {
                self.state = BuilderState::Failed;
                error!(error = %e, "HTTP/2 connection handler construction failed");
                Err(e)
            }
        }
    }

    fn produce(
        &self,
        decoder: D,
        encoder: E,
        initial_settings: Http2Settings,
    ) -> InyResult<(Arc<dyn ConnectionHandler>, Arc<dyn FrameListener>)> {
        match &self.factory {
            Factory::Listening(factory) => Ok(factory(decoder, encoder, initial_settings)),
            Factory::Checked(factory) => {
                let handler = factory(decoder, encoder, initial_settings);
                match Arc::clone(&handler).into_frame_listener() {
                    Some(listener) => Ok((handler, listener)),
                    None => Err(InyError::InvalidHandlerCapability {
                        handler: handler.handler_name().to_string(),
                    }),
                }
            }
        }
    }
}

impl<D, E, F> ConstructionHook<F> for HandlerBuilder<D, E>
where
    F: ConnectionFramework<Decoder = D, Encoder = E> + ?Sized,
{
    /// Invoke the factory, check the listener capability and register the
    /// handler as the frame listener. Only valid while [`HandlerBuilder::build`]
    /// is running.
    fn build_from(
        &mut self,
        framework: &mut F,
        decoder: F::Decoder,
        encoder: F::Encoder,
        initial_settings: Http2Settings,
    ) -> InyResult<Arc<dyn ConnectionHandler>> {
        if self.state != BuilderState::Constructing {
            return Err(InyError::usage(
                COMPONENT,
                format!("build_from() invoked on a {} builder outside build()", self.state),
            ));
        }

        debug!(settings = %initial_settings, "Constructing HTTP/2 connection handler");
        let (handler, listener) = self.produce(decoder, encoder, initial_settings)?;

        if let Some(level) = self.frame_log_level {
            framework.set_frame_logger(level);
        }
        framework.set_frame_listener(listener);

        Ok(handler)
    }
}

impl<D, E> fmt::Debug for HandlerBuilder<D, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let factory = match self.factory {
            Factory::Checked(_) => "checked",
            Factory::Listening(_) => "listening",
        };
        f.debug_struct("HandlerBuilder")
            .field("factory", &factory)
            .field("state", &self.state)
            .field("frame_log_level", &self.frame_log_level)
            .finish()
    }
}
