//! JSON Lines pipe
//!
//! Drives an [`Interceptor`] over a stream of JSON events, one per line,
//! and writes the retained events as JSON lines. Body text on both sides is
//! the body charset's view of the event bytes.
//!
//! # Flow
//!
//! ```text
//! reader ──► parse line ──► batch (batch_size) ──► intercept_batch ──► writer
//!               │
//!               └─► invalid JSON, invalid UTF-8 or unencodable body: warn + skip
//! ```

use crate::charset::Charset;
use crate::error::Result;
use crate::event::{Event, EventRecord};
use crate::interceptor::Interceptor;
use std::io::{BufRead, Write};
use tracing::{debug, info, warn};

/// Counters for one run of the pipe
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PipeStats {
    /// Events parsed from the input
    pub read: u64,
    /// Events written to the output
    pub written: u64,
    /// Events dropped by the interceptor
    pub dropped: u64,
    /// Lines skipped because they were not valid events
    pub invalid: u64,
}

/// Run every event from `reader` through `interceptor` into `writer`
///
/// Only I/O errors on the reader or writer abort the run. On a reader
/// error the events parsed so far are still flushed before the error is
/// returned.
pub fn run<R, W>(
    reader: R,
    mut writer: W,
    interceptor: &dyn Interceptor,
    batch_size: usize,
    charset: Charset,
) -> Result<PipeStats>
where
    R: BufRead,
    W: Write,
{
    let batch_size = batch_size.max(1);
    let mut stats = PipeStats::default();
    let mut batch: Vec<Event> = Vec::with_capacity(batch_size);

    for (index, line) in reader.split(b'\n').enumerate() {
        let line = match line {
            Ok(line) => line,
            Err(e) => {
                flush(&mut batch, &mut writer, interceptor, charset, &mut stats)?;
                writer.flush()?;
                return Err(e.into());
            }
        };
        if line.iter().all(u8::is_ascii_whitespace) {
            continue;
        }

        match parse_line(&line, charset) {
            Ok(event) => {
                stats.read += 1;
                batch.push(event);
            }
            Err(reason) => {
                stats.invalid += 1;
                warn!(line = index + 1, error = %reason, "skipping invalid event");
                continue;
            }
        }

        if batch.len() >= batch_size {
            flush(&mut batch, &mut writer, interceptor, charset, &mut stats)?;
        }
    }

    flush(&mut batch, &mut writer, interceptor, charset, &mut stats)?;
    writer.flush()?;

    info!(
        read = stats.read,
        written = stats.written,
        dropped = stats.dropped,
        invalid = stats.invalid,
        "pipe finished"
    );
    Ok(stats)
}

fn parse_line(line: &[u8], charset: Charset) -> std::result::Result<Event, String> {
    let record: EventRecord = serde_json::from_slice(line).map_err(|e| e.to_string())?;
    record.into_event(charset).map_err(|e| e.to_string())
}

fn flush<W: Write>(
    batch: &mut Vec<Event>,
    writer: &mut W,
    interceptor: &dyn Interceptor,
    charset: Charset,
    stats: &mut PipeStats,
) -> Result<()> {
    if batch.is_empty() {
        return Ok(());
    }

    let size = batch.len();
    let kept = interceptor.intercept_batch(std::mem::take(batch));
    let kept_count = kept.len();

    for event in kept {
        // Serialize first so write failures surface as IO errors.
        let mut line = serde_json::to_vec(&EventRecord::from_event(event, charset))?;
        line.push(b'\n');
        writer.write_all(&line)?;
    }

    stats.written += kept_count as u64;
    stats.dropped += (size - kept_count) as u64;
    debug!(size, kept = kept_count, "flushed batch");
    Ok(())
}
