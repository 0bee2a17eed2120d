//! Body rewrite rule
//!
//! Replaces the whole body with fixed text when the decoded body contains a
//! needle. The replacement is encoded in the configured charset; when that
//! charset is unsupported, or cannot represent the replacement, the event is
//! dropped and a warning goes to the diagnostics sink.

use crate::charset::Charset;
use crate::diagnostics::{Diagnostics, TracingDiagnostics};
use crate::error::CharsetError;
use crate::event::Event;
use crate::rule::Rule;
use bytes::Bytes;
use std::sync::Arc;

/// Replaces bodies that contain a needle
pub struct BodyRewrite {
    contains: String,
    replacement: String,
    charset: Result<Charset, CharsetError>,
    diagnostics: Arc<dyn Diagnostics>,
}

impl BodyRewrite {
    /// Create a rule that matches and encodes as UTF-8
    pub fn new(contains: impl Into<String>, replacement: impl Into<String>) -> Self {
        Self {
            contains: contains.into(),
            replacement: replacement.into(),
            charset: Ok(Charset::Utf8),
            diagnostics: Arc::new(TracingDiagnostics),
        }
    }

    /// Set the charset label used to decode bodies and encode the replacement
    ///
    /// The label is resolved once here. An unknown label only affects
    /// events that would be rewritten: those are dropped with a warning.
    pub fn charset(mut self, label: &str) -> Self {
        self.charset = Charset::for_label(label);
        self
    }

    /// Set the sink that receives warnings for dropped events
    pub fn diagnostics(mut self, diagnostics: Arc<dyn Diagnostics>) -> Self {
        self.diagnostics = diagnostics;
        self
    }

    fn replacement_bytes(&self) -> Result<Bytes, CharsetError> {
        match &self.charset {
            Ok(charset) => charset.encode(&self.replacement),
            Err(e) => Err(e.clone()),
        }
    }
}

impl Rule for BodyRewrite {
    fn name(&self) -> &'static str {
        "body_rewrite"
    }

    fn apply(&self, mut event: Event) -> Option<Event> {
        let text = self
            .charset
            .as_ref()
            .copied()
            .unwrap_or_default()
            .decode(&event.body);
        if !text.contains(&self.contains) {
            return Some(event);
        }

        match self.replacement_bytes() {
            Ok(body) => {
                event.body = body;
                Some(event)
            }
            Err(e) => {
                self.diagnostics.warn(self.name(), &e.to_string());
                None
            }
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::diagnostics::MemoryDiagnostics;

    fn rule() -> BodyRewrite {
        BodyRewrite::new("injuries", "cyborg")
    }

    #[test]
    fn test_matching_body_is_replaced() {
        let event = rule()
            .apply(Event::new("he suffered injuries").with_header("k", "v"))
            .unwrap();

        assert_eq!(event.body, Bytes::from("cyborg"));
        assert_eq!(event.headers.get("k"), Some(&"v".to_string()));
    }

    #[test]
    fn test_unmatched_body_untouched() {
        let input = Event::new("all clear");
        let event = rule().apply(input.clone()).unwrap();

        assert_eq!(event, input);
    }

    #[test]
    fn test_empty_body_untouched() {
        let event = rule().apply(Event::default()).unwrap();
        assert!(event.body.is_empty());
    }

    #[test]
    fn test_invalid_utf8_still_matches() {
        let mut body = vec![0xFF, 0xFE];
        body.extend_from_slice(b" injuries");

        let event = rule().apply(Event::new(body)).unwrap();
        assert_eq!(event.body, Bytes::from("cyborg"));
    }

    #[test]
    fn test_unsupported_charset_drops_and_warns() {
        let sink = Arc::new(MemoryDiagnostics::new());
        let rule = rule().charset("EBCDIC").diagnostics(sink.clone());

        assert!(rule.apply(Event::new("injuries")).is_none());

        let warnings = sink.warnings();
        assert_eq!(warnings.len(), 1);
        assert_eq!(warnings[0].rule, "body_rewrite");
        assert_eq!(warnings[0].message, "unsupported charset: EBCDIC");
    }

    #[test]
    fn test_unsupported_charset_without_match_is_noop() {
        let sink = Arc::new(MemoryDiagnostics::new());
        let rule = rule().charset("EBCDIC").diagnostics(sink.clone());

        let input = Event::new("all clear");
        assert_eq!(rule.apply(input.clone()), Some(input));
        assert!(sink.is_empty());
    }

    #[test]
    fn test_charset_resolved_at_construction() {
        let latin1 = rule().charset(" Latin1 ");
        assert_eq!(latin1.charset, Ok(Charset::Iso8859_1));

        let unknown = rule().charset("EBCDIC");
        assert_eq!(
            unknown.charset,
            Err(CharsetError::Unsupported("EBCDIC".to_string()))
        );
    }

    #[test]
    fn test_unsupported_charset_warns_once_per_dropped_event() {
        let sink = Arc::new(MemoryDiagnostics::new());
        let rule = rule().charset("EBCDIC").diagnostics(sink.clone());

        for _ in 0..3 {
            assert!(rule.apply(Event::new("injuries")).is_none());
        }
        assert!(rule.apply(Event::new("fine")).is_some());
        assert_eq!(sink.len(), 3);
    }

    #[test]
    fn test_unmappable_replacement_drops_and_warns() {
        let sink = Arc::new(MemoryDiagnostics::new());
        let rule = BodyRewrite::new("injuries", "café")
            .charset("US-ASCII")
            .diagnostics(sink.clone());

        assert!(rule.apply(Event::new("injuries")).is_none());
        assert_eq!(sink.len(), 1);
    }

    #[test]
    fn test_latin1_body_rewritten_in_latin1() {
        let rule = BodyRewrite::new("blessé", "réparé").charset("ISO-8859-1");

        let event = rule.apply(Event::new(&b"il est bless\xE9"[..])).unwrap();
        assert_eq!(&event.body[..], b"r\xE9par\xE9");
    }
}
