//! Header rewrite rule
//!
//! Replaces one header with another: when the matched key is present, the
//! target key is set to a fixed value and the matched key is removed.

use crate::event::Event;
use crate::rule::Rule;

/// Swaps a matched header for a fixed one
///
/// # Example
///
/// ```
/// use event_tweaker::event::Event;
/// use event_tweaker::rule::{HeaderRewrite, Rule};
///
/// let rule = HeaderRewrite::new("lice", "shampoo", "antilice");
/// let event = rule.apply(Event::default().with_header("lice", "yes")).unwrap();
///
/// assert_eq!(event.headers.get("shampoo"), Some(&"antilice".to_string()));
/// assert!(!event.headers.contains_key("lice"));
/// ```
#[derive(Debug, Clone)]
pub struct HeaderRewrite {
    match_header: String,
    set_header: String,
    set_value: String,
}

impl HeaderRewrite {
    pub fn new(
        match_header: impl Into<String>,
        set_header: impl Into<String>,
        set_value: impl Into<String>,
    ) -> Self {
        Self {
            match_header: match_header.into(),
            set_header: set_header.into(),
            set_value: set_value.into(),
        }
    }
}

impl Rule for HeaderRewrite {
    fn name(&self) -> &'static str {
        "header_rewrite"
    }

    fn apply(&self, mut event: Event) -> Option<Event> {
        if event.headers.contains_key(&self.match_header) {
            // Set before remove: a rule whose keys coincide just removes the header.
            event
                .headers
                .insert(self.set_header.clone(), self.set_value.clone());
            event.headers.remove(&self.match_header);
        }
        Some(event)
    }
}
