//! Collection scanner
//!
//! Grows the host page's lazily rendered list by scrolling until the document
//! stops changing, then reads one [`ItemRecord`] per rendered entry.

pub mod extract;

use crate::dom::selectors as sel;
use crate::dom::HostPage;
use crate::error::Result;
use crate::item::ItemRecord;
use crate::pacing::wait_with_jitter;
use crate::report::StatusSink;
use crate::run::state::RunState;
use serde::{Deserialize, Serialize};

/// Tuning of the scroll-and-measure loop
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScanOptions {
    /// Wait between scrolling and measuring, in milliseconds
    pub check_interval_ms: u64,
    pub jitter_percent: f64,
    /// Unchanged rounds needed to call the list fully loaded
    pub stable_rounds: u32,
    /// Hard cap on rounds; reaching it degrades the scan
    pub max_rounds: u32,
    /// Still read the loaded items when stopped while scrolling
    pub extract_on_stop: bool,
}

impl Default for ScanOptions {
    fn default() -> Self {
        Self {
            check_interval_ms: 2000,
            jitter_percent: 15.0,
            stable_rounds: 3,
            max_rounds: 150,
            extract_on_stop: true,
        }
    }
}

/// Result of one scan
#[derive(Debug, Clone, Default, Serialize)]
pub struct ScanReport {
    pub items: Vec<ItemRecord>,
    /// Rendered list entries seen at extraction time
    pub candidates: usize,
    pub rounds: u32,
    /// The round cap was hit before the list stabilized
    pub degraded: bool,
    /// Scrolling ended on a stop request
    pub stopped: bool,
}

impl ScanReport {
    /// Entries that could not be turned into a record
    pub fn excluded(&self) -> usize {
        self.candidates - self.items.len()
    }
}

#[derive(Debug, Default)]
struct LoadProgress {
    rounds: u32,
    degraded: bool,
    stopped: bool,
}

/// Runs the scroll loop and the extraction over one page
pub struct Scanner<'a> {
    page: &'a dyn HostPage,
    state: &'a RunState,
    sink: &'a dyn StatusSink,
    options: &'a ScanOptions,
}

impl<'a> Scanner<'a> {
    pub fn new(
        page: &'a dyn HostPage,
        state: &'a RunState,
        sink: &'a dyn StatusSink,
        options: &'a ScanOptions,
    ) -> Self {
        Self { page, state, sink, options }
    }

    /// Load everything, then extract records in document order
    pub async fn scan(&self) -> Result<ScanReport> {
        let progress = self.load_all().await?;

        if progress.stopped && !self.options.extract_on_stop {
            log::info!("Scan stopped after {} rounds, discarding loaded items", progress.rounds);
            return Ok(ScanReport { rounds: progress.rounds, stopped: true, ..ScanReport::default() });
        }

        let (items, candidates) = self.extract()?;
        log::info!(
            "Scan found {} items ({} candidates) in {} rounds",
            items.len(),
            candidates,
            progress.rounds
        );
        Ok(ScanReport {
            items,
            candidates,
            rounds: progress.rounds,
            degraded: progress.degraded,
            stopped: progress.stopped,
        })
    }

    async fn load_all(&self) -> Result<LoadProgress> {
        let mut progress = LoadProgress::default();
        let mut last_height = 0u64;
        let mut last_count = 0usize;
        let mut stable = 0u32;

        loop {
            if self.state.stop_requested() {
                log::info!("Stop requested while scrolling");
                progress.stopped = true;
                return Ok(progress);
            }
            if progress.rounds >= self.options.max_rounds {
                log::warn!(
                    "List still changing after {} rounds, continuing with what is loaded",
                    progress.rounds
                );
                self.sink.status("Max scrolls reached. Extracting loaded items...");
                progress.degraded = true;
                return Ok(progress);
            }

            self.page.scroll_to_bottom()?;
            wait_with_jitter(self.options.check_interval_ms as f64, self.options.jitter_percent).await;
            progress.rounds += 1;

            let height = self.page.document_height()?;
            let count = self.page.query_all(sel::ITEM_RENDERER)?.len();
            self.sink.status(&format!("Scrolling... (Height: {}, Items: {})", height, count));

            if self.spinner_visible()? {
                self.sink.status("Waiting for spinner...");
                stable = 0;
            } else if height == last_height && count == last_count {
                stable += 1;
                self.sink.status(&format!("Scroll stable ({}/{})...", stable, self.options.stable_rounds));
            } else {
                stable = 0;
            }
            last_height = height;
            last_count = count;

            if stable >= self.options.stable_rounds {
                log::debug!("List stable after {} rounds", progress.rounds);
                return Ok(progress);
            }
        }
    }

    fn spinner_visible(&self) -> Result<bool> {
        for spinner in self.page.query_all(sel::CONTINUATION_SPINNER)? {
            if self.page.inspect(&spinner).map(|info| info.is_displayed()).unwrap_or(false) {
                return Ok(true);
            }
        }
        Ok(false)
    }

    /// Read one record per rendered entry.
    ///
    /// Returns the records and the number of entries looked at. Entries
    /// without a menu button, or that vanish while being read, are skipped.
    pub fn extract(&self) -> Result<(Vec<ItemRecord>, usize)> {
        let candidates = self.page.query_all(sel::ITEM_RENDERER)?;
        let mut items = Vec::with_capacity(candidates.len());

        for (position, node) in candidates.iter().enumerate() {
            match extract::extract_item(self.page, node, position) {
                Ok(Some(record)) => items.push(record),
                Ok(None) => log::warn!("Item {} has no menu button, skipping", position + 1),
                Err(e) => log::warn!("Could not read item {}: {}", position + 1, e),
            }
        }
        Ok((items, candidates.len()))
    }
}
