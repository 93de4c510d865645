//! Tick feed thread — reads NDJSON ticks and hands them to the pipeline.
//!
//! Communication with the pipeline thread is via a single bounded `mpsc`
//! channel, so ticks reach the pipeline one at a time in the order they were
//! read, and the reader blocks once the pipeline falls behind.
//! The channel closes when the input hits EOF.

use std::io::BufRead;
use std::sync::mpsc::SyncSender;
use std::thread::{self, JoinHandle};

use optionbot_core::domain::RawTick;
use tracing::{debug, warn};

/// Counts reported by the feed thread when it finishes.
#[derive(Debug, Clone, Copy, Default)]
pub struct FeedReport {
    pub lines: u64,
    pub unparsable: u64,
}

/// Spawn the reader thread over any line source.
pub fn spawn_feed<R>(reader: R, tx: SyncSender<RawTick>) -> std::io::Result<JoinHandle<FeedReport>>
where
    R: BufRead + Send + 'static,
{
    thread::Builder::new()
        .name("optionbot-feed".into())
        .spawn(move || feed_loop(reader, tx))
}

fn feed_loop<R: BufRead>(reader: R, tx: SyncSender<RawTick>) -> FeedReport {
    let mut report = FeedReport::default();
    for (index, line) in reader.lines().enumerate() {
        let line = match line {
            Ok(line) => line,
            Err(err) => {
                warn!(error = %err, "tick input read failed, stopping feed");
                break;
            }
        };
        if line.trim().is_empty() {
            continue;
        }
        report.lines += 1;
        match serde_json::from_str::<RawTick>(&line) {
            Ok(raw) => {
                if tx.send(raw).is_err() {
                    debug!("pipeline hung up, stopping feed");
                    break;
                }
            }
            Err(err) => {
                report.unparsable += 1;
                warn!(line = index + 1, error = %err, "skipping unparsable tick line");
            }
        }
    }
    report
}
