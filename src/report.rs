//! Progress reporting towards whatever front end drives the session

use crate::item::{ItemRecord, ItemStatus};
use crate::run::RunSummary;

/// Receives the live status line, per-item status changes and run summaries
pub trait StatusSink {
    /// Current phase ("Scrolling...", "Processing 3/10: ...", ...)
    fn status(&self, line: &str);

    /// An item moved to a new status
    fn item(&self, _record: &ItemRecord, _status: ItemStatus) {}

    /// A run finished or was stopped
    fn summary(&self, _summary: &RunSummary) {}
}

/// Sink forwarding everything to the `log` facade
#[derive(Debug, Default, Clone, Copy)]
pub struct LogSink;

impl StatusSink for LogSink {
    fn status(&self, line: &str) {
        log::info!("{}", line);
    }

    fn item(&self, record: &ItemRecord, status: ItemStatus) {
        log::debug!("[{}] #{} {}", status, record.original_position(), record.title());
    }

    fn summary(&self, summary: &RunSummary) {
        log::info!("{}", summary.message());
    }
}
