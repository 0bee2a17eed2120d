//! Event type for the tweaker
//!
//! An Event is the unit of work a host hands to the engine: a header map and
//! an opaque body. The body is `Bytes`, so cloning an event or replacing its
//! body never copies payload data.
//!
//! # Zero-Copy Design
//!
//! ```text
//! Host receives 10KB body as Bytes
//!                     │
//!                     ▼
//! Event created with body.clone()  ← Just increments refcount
//!                     │
//!                     ▼
//! Rules read headers/body, swap the body wholesale on rewrite
//! ```

use crate::charset::Charset;
use crate::error::CharsetError;
use bytes::Bytes;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// An in-flight event: headers plus an opaque body
///
/// Events carry no id or timestamp. Two events with equal headers and body
/// are indistinguishable to every rule.
///
/// # Example
///
/// ```
/// use bytes::Bytes;
/// use event_tweaker::event::Event;
///
/// let event = Event::new(Bytes::from("he suffered injuries")).with_header("lice", "yes");
/// assert_eq!(event.headers.get("lice"), Some(&"yes".to_string()));
/// assert_eq!(event.body_str(), Some("he suffered injuries"));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Event {
    /// Header map, mutated in place by rules
    pub headers: HashMap<String, String>,

    /// Opaque body, replaced wholesale by rules
    pub body: Bytes,
}

impl Event {
    /// Create an event with the given body and no headers
    pub fn new(body: impl Into<Bytes>) -> Self {
        Self {
            headers: HashMap::new(),
            body: body.into(),
        }
    }

    /// Create an event from existing headers and body
    pub fn with_parts(headers: HashMap<String, String>, body: impl Into<Bytes>) -> Self {
        Self {
            headers,
            body: body.into(),
        }
    }

    /// Add a header to the event
    ///
    /// # Example
    /// ```
    /// use event_tweaker::event::Event;
    ///
    /// let event = Event::default()
    ///     .with_header("host", "web-1")
    ///     .with_header("tenant", "acme");
    /// assert_eq!(event.headers.len(), 2);
    /// ```
    pub fn with_header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(key.into(), value.into());
        self
    }

    /// Get body as a string slice (if valid UTF-8)
    pub fn body_str(&self) -> Option<&str> {
        std::str::from_utf8(&self.body).ok()
    }

    /// Get body length in bytes
    pub fn body_len(&self) -> usize {
        self.body.len()
    }
}

/// JSON form of an [`Event`], one per line on the command-line host
///
/// The body travels as text in the body charset: [`EventRecord::into_event`]
/// encodes it and [`EventRecord::from_event`] decodes it. The `From`
/// conversions use UTF-8.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventRecord {
    #[serde(default)]
    pub headers: HashMap<String, String>,

    #[serde(default)]
    pub body: String,
}

impl EventRecord {
    /// Convert to an event, encoding the body text with `charset`
    ///
    /// Fails if the text holds a character the charset cannot represent.
    pub fn into_event(self, charset: Charset) -> Result<Event, CharsetError> {
        Ok(Event {
            body: charset.encode(&self.body)?,
            headers: self.headers,
        })
    }

    /// Convert from an event, decoding the body with `charset`
    ///
    /// Bytes the charset cannot decode become U+FFFD.
    pub fn from_event(event: Event, charset: Charset) -> Self {
        Self {
            body: charset.decode(&event.body),
            headers: event.headers,
        }
    }
}

impl From<EventRecord> for Event {
    fn from(record: EventRecord) -> Self {
        Self {
            headers: record.headers,
            body: Bytes::from(record.body),
        }
    }
}

impl From<Event> for EventRecord {
    fn from(event: Event) -> Self {
        Self::from_event(event, Charset::Utf8)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn test_event_creation() {
        let body = Bytes::from(r#"{"user_id": 123}"#);
        let event = Event::new(body.clone());

        assert!(event.headers.is_empty());
        assert_eq!(event.body, body);
        assert_eq!(event.body_len(), 16);
    }

    #[test]
    fn test_event_with_headers() {
        let event = Event::default()
            .with_header("trace_id", "abc-123")
            .with_header("tenant", "acme");

        assert_eq!(event.headers.get("trace_id"), Some(&"abc-123".to_string()));
        assert_eq!(event.headers.get("tenant"), Some(&"acme".to_string()));
        assert!(event.body.is_empty());
    }

    #[test]
    fn test_zero_copy_clone() {
        let original = Bytes::from(vec![0u8; 10000]);
        let event = Event::new(original.clone());

        let cloned = event.clone();

        assert_eq!(event.body.as_ptr(), cloned.body.as_ptr());
        assert_eq!(event.body.len(), cloned.body.len());
    }

    #[test]
    fn test_body_str() {
        let text = Event::new("all clear");
        assert_eq!(text.body_str(), Some("all clear"));

        let binary = Event::new(vec![0xFF, 0xFE]);
        assert!(binary.body_str().is_none());
    }

    #[test]
    fn test_record_from_json_defaults() {
        let record: EventRecord = serde_json::from_str(r#"{"body": "ok"}"#).unwrap();
        let event: Event = record.into();

        assert!(event.headers.is_empty());
        assert_eq!(event.body_str(), Some("ok"));

        let record: EventRecord = serde_json::from_str(r#"{"headers": {"lice": "y"}}"#).unwrap();
        let event: Event = record.into();
        assert_eq!(event.headers.get("lice"), Some(&"y".to_string()));
        assert!(event.body.is_empty());
    }

    #[test]
    fn test_record_lossy_body() {
        let event = Event::new(vec![b'o', b'k', 0xFF]).with_header("k", "v");
        let record: EventRecord = event.into();

        assert_eq!(record.body, "ok\u{FFFD}");
        assert_eq!(record.headers.get("k"), Some(&"v".to_string()));
    }

    #[test]
    fn test_record_latin1_body() {
        let record = EventRecord {
            body: "blessé".to_string(),
            ..EventRecord::default()
        };

        let event = record.into_event(Charset::Iso8859_1).unwrap();
        assert_eq!(&event.body[..], b"bless\xE9");

        let back = EventRecord::from_event(event, Charset::Iso8859_1);
        assert_eq!(back.body, "blessé");
    }

    #[test]
    fn test_record_unmappable_body() {
        let record = EventRecord {
            body: "5 €".to_string(),
            ..EventRecord::default()
        };

        assert!(matches!(
            record.into_event(Charset::Iso8859_1),
            Err(CharsetError::Unmappable { ch: '€', .. })
        ));
    }
}
