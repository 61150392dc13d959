#![forbid(unsafe_code)]

use std::fmt;
use std::sync::{Arc, Mutex, PoisonError};

/// Side-channel sink for operational diagnostics. Errors are always carried
/// by the returned `Result`; the sink is best-effort and non-authoritative.
pub trait Diagnostics: Send + Sync {
    fn warn(&self, message: &str);
    fn error(&self, message: &str);
}

/// Cheap cloneable handle around an injected sink. The default discards
/// everything.
#[derive(Clone)]
pub struct DiagHandle(Arc<dyn Diagnostics>);

impl DiagHandle {
    #[must_use]
    pub fn new(sink: Arc<dyn Diagnostics>) -> Self {
        Self(sink)
    }

    /// A handle that discards everything.
    #[must_use]
    pub fn none() -> Self {
        Self(Arc::new(NopDiagnostics))
    }

    /// A handle that forwards to the `log` facade.
    #[must_use]
    pub fn log() -> Self {
        Self(Arc::new(LogDiagnostics))
    }

    pub fn warn(&self, message: &str) {
        self.0.warn(message);
    }

    pub fn error(&self, message: &str) {
        self.0.error(message);
    }
}

impl Default for DiagHandle {
    fn default() -> Self {
        Self::none()
    }
}

impl fmt::Debug for DiagHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("DiagHandle")
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct NopDiagnostics;

impl Diagnostics for NopDiagnostics {
    fn warn(&self, _message: &str) {}
    fn error(&self, _message: &str) {}
}

/// Forwards to `log::warn!` / `log::error!`; binaries pair this with
/// `env_logger::init()`.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogDiagnostics;

impl Diagnostics for LogDiagnostics {
    fn warn(&self, message: &str) {
        log::warn!("{message}");
    }

    fn error(&self, message: &str) {
        log::error!("{message}");
    }
}

/// Buffers every message for later inspection. Intended for tests that
/// want to observe the side channel without a real logger.
#[derive(Debug, Default)]
pub struct CollectingDiagnostics {
    warnings: Mutex<Vec<String>>,
    errors: Mutex<Vec<String>>,
}

impl CollectingDiagnostics {
    #[must_use]
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    #[must_use]
    pub fn warnings(&self) -> Vec<String> {
        self.warnings
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    #[must_use]
    pub fn errors(&self) -> Vec<String> {
        self.errors
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl Diagnostics for CollectingDiagnostics {
    fn warn(&self, message: &str) {
        self.warnings
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(message.to_owned());
    }

    fn error(&self, message: &str) {
        self.errors
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(message.to_owned());
    }
}
