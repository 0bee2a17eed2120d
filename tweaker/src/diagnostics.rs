//! Diagnostics sink
//!
//! Rules report recoverable failures (an event they had to drop) through a
//! [`Diagnostics`] handle passed in at construction rather than a global
//! logger. The default sink forwards to `tracing`; [`MemoryDiagnostics`]
//! keeps warnings so callers can inspect them.

use parking_lot::Mutex;

/// Receiver for warning-level diagnostics
pub trait Diagnostics: Send + Sync {
    /// Report a warning raised by the named rule
    fn warn(&self, rule: &str, message: &str);
}

/// Sink that emits warnings as `tracing` events
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingDiagnostics;

impl Diagnostics for TracingDiagnostics {
    fn warn(&self, rule: &str, message: &str) {
        tracing::warn!(rule = %rule, message = %message, "event dropped");
    }
}

/// A recorded warning
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Warning {
    pub rule: String,
    pub message: String,
}

/// Append-only in-memory sink
///
/// Thread-safe using parking_lot mutex.
#[derive(Debug, Default)]
pub struct MemoryDiagnostics {
    warnings: Mutex<Vec<Warning>>,
}

impl MemoryDiagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of the warnings recorded so far, oldest first
    pub fn warnings(&self) -> Vec<Warning> {
        self.warnings.lock().clone()
    }

    pub fn len(&self) -> usize {
        self.warnings.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.warnings.lock().is_empty()
    }
}

impl Diagnostics for MemoryDiagnostics {
    fn warn(&self, rule: &str, message: &str) {
        self.warnings.lock().push(Warning {
            rule: rule.to_string(),
            message: message.to_string(),
        });
    }
}
