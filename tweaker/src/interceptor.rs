//! Host-facing interceptor contract
//!
//! A host pipeline drives an interceptor through a small lifecycle:
//!
//! ```text
//! initialize() ──► intercept() / intercept_batch() ... ──► close()
//! ```
//!
//! Hosts call `intercept` and `intercept_batch` from any number of worker
//! threads, never concurrently for the same event.

use crate::event::Event;

/// Per-event transform invoked by a host pipeline
///
/// # Return Value
///
/// - `Some(event)` - Forward the event (possibly modified)
/// - `None` - Drop the event
pub trait Interceptor: Send + Sync {
    /// Called once before the first event
    fn initialize(&mut self) {}

    /// Process one event
    fn intercept(&self, event: Event) -> Option<Event>;

    /// Process a batch, leaving out dropped events
    ///
    /// Retained events keep their relative order.
    fn intercept_batch(&self, events: Vec<Event>) -> Vec<Event> {
        events
            .into_iter()
            .filter_map(|event| self.intercept(event))
            .collect()
    }

    /// Called once after the last event
    fn close(&mut self) {}
}
