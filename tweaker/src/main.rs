//! event-tweaker - JSON Lines filter
//!
//! Reads events from stdin, one JSON object per line, applies the configured
//! rules and writes the retained events to stdout. Logs go to stderr.
//!
//! ## Usage
//!
//! ```bash
//! TWEAKER_MATCH_HEADER=lice TWEAKER_SET_HEADER=shampoo TWEAKER_SET_VALUE=antilice \
//!     event-tweaker < events.jsonl > tweaked.jsonl
//! ```
//!
//! ## Environment Variables
//!
//! - `TWEAKER_MATCH_HEADER`, `TWEAKER_SET_HEADER`, `TWEAKER_SET_VALUE`: header rule
//! - `TWEAKER_MATCH_BODY_CONTAINS`, `TWEAKER_REPLACE_BODY_WITH`: body rule
//! - `TWEAKER_BODY_CHARSET`: body charset (default: "UTF-8")
//! - `TWEAKER_BATCH_SIZE`: events per batch (default: 1000)
//! - `TWEAKER_LOG_LEVEL`: log level (default: "info")
//! - `TWEAKER_LOG_FORMAT`: "pretty" or "json" (default: "pretty")

use event_tweaker::charset::Charset;
use event_tweaker::config::{HostConfig, LogFormat};
use event_tweaker::engine::EventTweaker;
use event_tweaker::interceptor::Interceptor;
use event_tweaker::pipe;
use std::io;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

fn main() -> anyhow::Result<()> {
    let config = HostConfig::from_env()?;

    // Initialize tracing
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.log_level.as_str()));
    let registry = tracing_subscriber::registry().with(filter);
    match config.log_format {
        LogFormat::Json => registry
            .with(tracing_subscriber::fmt::layer().json().with_writer(io::stderr))
            .init(),
        LogFormat::Pretty => registry
            .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
            .init(),
    }

    let mut tweaker = EventTweaker::build(&config.tweaker)?;
    info!(
        rules = ?tweaker.rule_names(),
        batch_size = config.batch_size,
        "Starting event tweaker"
    );

    // Body text on stdin/stdout is the charset's view of the body bytes.
    let charset = match Charset::for_label(&config.tweaker.body_charset) {
        Ok(charset) => charset,
        Err(e) => {
            warn!(error = %e, "reading and writing bodies as UTF-8");
            Charset::Utf8
        }
    };

    tweaker.initialize();
    let stats = pipe::run(
        io::stdin().lock(),
        io::stdout().lock(),
        &tweaker,
        config.batch_size,
        charset,
    );
    tweaker.close();

    stats?;
    Ok(())
}
