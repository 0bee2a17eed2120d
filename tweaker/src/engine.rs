//! Event tweak engine
//!
//! Applies an ordered [`RuleChain`] to single events and to batches. The
//! engine is immutable after construction and can be shared across threads.

use crate::config::TweakerConfig;
use crate::diagnostics::{Diagnostics, TracingDiagnostics};
use crate::error::Result;
use crate::event::Event;
use crate::interceptor::Interceptor;
use crate::rule::{BodyRewrite, HeaderRewrite, RuleChain};
use std::sync::Arc;

/// Applies configured rules to events
///
/// # Example
///
/// ```
/// use std::collections::HashMap;
/// use event_tweaker::{Event, EventTweaker, TweakerConfig};
///
/// let props = HashMap::from([
///     ("match.header".to_string(), "lice".to_string()),
///     ("set.header".to_string(), "shampoo".to_string()),
///     ("set.value".to_string(), "antilice".to_string()),
/// ]);
/// let tweaker = EventTweaker::build(&TweakerConfig::from_properties(&props).unwrap()).unwrap();
///
/// let event = tweaker.tweak(Event::default().with_header("lice", "yes")).unwrap();
/// assert_eq!(event.headers.get("shampoo"), Some(&"antilice".to_string()));
/// ```
pub struct EventTweaker {
    chain: RuleChain,
}

impl EventTweaker {
    /// Build a tweaker from configuration, warning through `tracing`
    pub fn build(config: &TweakerConfig) -> Result<Self> {
        Self::build_with_diagnostics(config, Arc::new(TracingDiagnostics))
    }

    /// Build a tweaker from configuration with an explicit diagnostics sink
    ///
    /// The header rule runs before the body rule.
    pub fn build_with_diagnostics(
        config: &TweakerConfig,
        diagnostics: Arc<dyn Diagnostics>,
    ) -> Result<Self> {
        config.validate()?;

        let mut chain = RuleChain::new();
        if let Some((match_header, set_header, set_value)) = config.header_rule() {
            chain.add(HeaderRewrite::new(match_header, set_header, set_value));
        }
        if let Some((contains, replacement)) = config.body_rule() {
            chain.add(
                BodyRewrite::new(contains, replacement)
                    .charset(config.body_charset.as_str())
                    .diagnostics(diagnostics),
            );
        }

        tracing::debug!(rules = ?chain.names(), "built event tweaker");
        Ok(Self::from_chain(chain))
    }

    /// Wrap a hand-assembled rule chain
    pub fn from_chain(chain: RuleChain) -> Self {
        Self { chain }
    }

    /// Apply every rule to one event
    ///
    /// Returns `None` if a rule dropped the event.
    pub fn tweak(&self, event: Event) -> Option<Event> {
        self.chain.apply(event)
    }

    /// Apply every rule to each event of a batch
    ///
    /// Dropped events are left out; the rest keep their relative order.
    pub fn tweak_batch(&self, events: Vec<Event>) -> Vec<Event> {
        let total = events.len();
        let kept: Vec<Event> = events
            .into_iter()
            .filter_map(|event| self.tweak(event))
            .collect();

        if kept.len() < total {
            tracing::debug!(total, dropped = total - kept.len(), "dropped events from batch");
        }
        kept
    }

    /// Names of the configured rules in application order
    pub fn rule_names(&self) -> Vec<&'static str> {
        self.chain.names()
    }

    pub fn len(&self) -> usize {
        self.chain.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chain.is_empty()
    }
}

impl Interceptor for EventTweaker {
    fn intercept(&self, event: Event) -> Option<Event> {
        self.tweak(event)
    }

    fn intercept_batch(&self, events: Vec<Event>) -> Vec<Event> {
        self.tweak_batch(events)
    }
}
