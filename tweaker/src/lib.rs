//! event-tweaker - ordered rewrite rules for in-flight events
//!
//! An embeddable interceptor that rewrites the headers and body of events
//! handed to it by a host pipeline, or drops them.
//!
//! # Architecture
//!
//! ```text
//! Host ──► Interceptor (EventTweaker) ──► RuleChain ──► Host
//!                                           │
//!                                           ├─► HeaderRewrite
//!                                           └─► BodyRewrite ──► Diagnostics (on drop)
//! ```
//!
//! Rules are pluggable via the [`Rule`] trait; hosts talk to the
//! [`Interceptor`] trait.

#![deny(unsafe_code)]
#![warn(clippy::unwrap_used)]
#![warn(clippy::expect_used)]
#![warn(clippy::panic)]

pub mod charset;
pub mod config;
pub mod diagnostics;
pub mod engine;
pub mod error;
pub mod event;
pub mod interceptor;
pub mod pipe;
pub mod rule;

pub use charset::Charset;
pub use config::{HostConfig, LogFormat, TweakerConfig};
pub use diagnostics::{Diagnostics, MemoryDiagnostics, TracingDiagnostics, Warning};
pub use engine::EventTweaker;
pub use error::{CharsetError, Result, TweakerError};
pub use event::{Event, EventRecord};
pub use interceptor::Interceptor;
pub use rule::{BodyRewrite, Filter, HeaderRewrite, Rule, RuleChain, Transform};
