//! Rule system for the event tweaker
//!
//! A rule inspects one event and either passes it on (possibly rewritten) or
//! drops it. Rules run in a fixed order; each sees the mutations of the rules
//! before it.
//!
//! # Event Flow
//!
//! ```text
//! Event ──► Rule 1 ──► Rule 2 ──► ... ──► Rule N ──► Event
//!             │          │                  │
//!             └──────────┴──── None ────────┴──► Dropped (later rules skipped)
//! ```
//!
//! # Example
//!
//! ```
//! use event_tweaker::event::Event;
//! use event_tweaker::rule::Rule;
//!
//! struct Stamp;
//!
//! impl Rule for Stamp {
//!     fn name(&self) -> &'static str { "stamp" }
//!
//!     fn apply(&self, event: Event) -> Option<Event> {
//!         Some(event.with_header("stamped", "true"))
//!     }
//! }
//!
//! let event = Stamp.apply(Event::default()).expect("kept");
//! assert_eq!(event.headers.get("stamped"), Some(&"true".to_string()));
//! ```

mod body;
mod header;

pub use body::BodyRewrite;
pub use header::HeaderRewrite;

use crate::event::Event;

/// Rule trait for event rewriting
///
/// Rules must be total: a condition that does not match is a no-op, never
/// an error. Rules hold no state that changes between calls.
///
/// # Return Value
///
/// - `Some(event)` - Pass the event on (possibly modified)
/// - `None` - Drop the event
pub trait Rule: Send + Sync {
    /// Rule name for identification and logging
    fn name(&self) -> &'static str;

    /// Apply the rule to an event
    fn apply(&self, event: Event) -> Option<Event>;
}

/// Runs events through a list of rules in order
#[derive(Default)]
pub struct RuleChain {
    rules: Vec<Box<dyn Rule>>,
}

impl RuleChain {
    /// Create an empty rule chain
    pub fn new() -> Self {
        Self { rules: Vec::new() }
    }

    /// Append a rule to the chain
    pub fn add<R: Rule + 'static>(&mut self, rule: R) {
        self.rules.push(Box::new(rule));
    }

    /// Append a rule, builder style
    pub fn with<R: Rule + 'static>(mut self, rule: R) -> Self {
        self.add(rule);
        self
    }

    /// Apply every rule in order
    ///
    /// Returns `None` as soon as a rule drops the event; the remaining rules
    /// are not run.
    pub fn apply(&self, mut event: Event) -> Option<Event> {
        for rule in &self.rules {
            match rule.apply(event) {
                Some(next) => event = next,
                None => {
                    tracing::debug!(rule = rule.name(), "rule dropped event");
                    return None;
                }
            }
        }
        Some(event)
    }

    /// Names of the rules in application order
    pub fn names(&self) -> Vec<&'static str> {
        self.rules.iter().map(|rule| rule.name()).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }
}

/// Keeps events that satisfy a predicate and drops the rest
///
/// Placed after a rewrite rule, the predicate sees the rewritten event.
///
/// # Example
///
/// ```
/// use event_tweaker::event::Event;
/// use event_tweaker::rule::{Filter, HeaderRewrite, RuleChain};
///
/// // Only forward events that carried a `lice` header.
/// let chain = RuleChain::new()
///     .with(HeaderRewrite::new("lice", "shampoo", "antilice"))
///     .with(Filter::new(|event: &Event| event.headers.contains_key("shampoo")));
///
/// assert!(chain.apply(Event::default().with_header("lice", "yes")).is_some());
/// assert!(chain.apply(Event::new("all clear")).is_none());
/// ```
pub struct Filter<F>
where
    F: Fn(&Event) -> bool + Send + Sync,
{
    keep: F,
}

impl<F> Filter<F>
where
    F: Fn(&Event) -> bool + Send + Sync,
{
    /// `keep` returns `true` for events to forward
    pub fn new(keep: F) -> Self {
        Self { keep }
    }
}

impl<F> Rule for Filter<F>
where
    F: Fn(&Event) -> bool + Send + Sync,
{
    fn name(&self) -> &'static str {
        "filter"
    }

    fn apply(&self, event: Event) -> Option<Event> {
        (self.keep)(&event).then_some(event)
    }
}

/// Rewrites every event with a closure and never drops
///
/// # Example
///
/// ```
/// use bytes::Bytes;
/// use event_tweaker::event::Event;
/// use event_tweaker::rule::{Rule, Transform};
///
/// // Record the original body size before a body rewrite replaces it.
/// let size = Transform::new(|event: Event| {
///     let len = event.body_len().to_string();
///     event.with_header("body.len", len)
/// });
///
/// let event = size.apply(Event::new(Bytes::from("injuries"))).unwrap();
/// assert_eq!(event.headers.get("body.len"), Some(&"8".to_string()));
/// ```
pub struct Transform<F>
where
    F: Fn(Event) -> Event + Send + Sync,
{
    rewrite: F,
}

impl<F> Transform<F>
where
    F: Fn(Event) -> Event + Send + Sync,
{
    pub fn new(rewrite: F) -> Self {
        Self { rewrite }
    }
}

impl<F> Rule for Transform<F>
where
    F: Fn(Event) -> Event + Send + Sync,
{
    fn name(&self) -> &'static str {
        "transform"
    }

    fn apply(&self, event: Event) -> Option<Event> {
        Some((self.rewrite)(event))
    }
}
