//! The session entry point
//!
//! A [`BulkSession`] owns one page for its lifetime: it scans the list once on
//! start, exposes the resulting board for selection, and runs procedures over
//! the selection until it is dismissed.

use crate::dom::HostPage;
use crate::error::{BulkError, Result};
use crate::locator::ContainerSet;
use crate::report::StatusSink;
use crate::run::{ItemBoard, Orchestrator, RunConfiguration, RunState, RunSummary};
use crate::scan::{ScanOptions, ScanReport, Scanner};
use std::sync::Arc;

/// One bulk-action session over one host page
pub struct BulkSession<P: HostPage> {
    page: P,
    state: Arc<RunState>,
    sink: Box<dyn StatusSink>,
    containers: ContainerSet,
    board: ItemBoard,
    scan: ScanReport,
    dismissed: bool,
}

impl<P: HostPage> BulkSession<P> {
    /// Start a session with the default open-container recognizers.
    ///
    /// Fails with [`BulkError::AlreadyActive`], touching nothing, when another
    /// session already holds `state`.
    pub async fn start(
        page: P,
        state: Arc<RunState>,
        sink: Box<dyn StatusSink>,
        options: &ScanOptions,
    ) -> Result<Self> {
        Self::start_with(page, state, sink, options, ContainerSet::default()).await
    }

    /// Start a session with a custom set of open-container recognizers
    pub async fn start_with(
        page: P,
        state: Arc<RunState>,
        sink: Box<dyn StatusSink>,
        options: &ScanOptions,
        containers: ContainerSet,
    ) -> Result<Self> {
        if !state.try_activate() {
            log::warn!("A session is already active on this page");
            return Err(BulkError::AlreadyActive);
        }

        sink.status("Scrolling & gathering items...");
        let scan = match Scanner::new(&page, &state, sink.as_ref(), options).scan().await {
            Ok(scan) => scan,
            Err(e) => {
                log::error!("Scan failed: {}", e);
                state.reset();
                return Err(e);
            }
        };

        if scan.stopped {
            sink.status(&format!("Scan stopped. Found {} items.", scan.items.len()));
        } else {
            sink.status(&format!("Found {} items. Select and run.", scan.items.len()));
        }
        // A stop during scanning only ends the scan
        state.clear_stop();

        Ok(Self {
            board: ItemBoard::new(scan.items.iter().cloned()),
            page,
            state,
            sink,
            containers,
            scan,
            dismissed: false,
        })
    }

    pub fn board(&self) -> &ItemBoard {
        &self.board
    }

    pub fn board_mut(&mut self) -> &mut ItemBoard {
        &mut self.board
    }

    /// How the initial scan went
    pub fn scan_report(&self) -> &ScanReport {
        &self.scan
    }

    pub fn page(&self) -> &P {
        &self.page
    }

    /// The shared lifecycle flags, e.g. to request a stop from elsewhere
    pub fn state(&self) -> &Arc<RunState> {
        &self.state
    }

    /// Apply the configured procedure to the board's current selection
    pub async fn run(&mut self, config: &RunConfiguration) -> Result<RunSummary> {
        if self.dismissed {
            return Err(BulkError::Configuration("Session was dismissed".to_string()));
        }
        let orchestrator = Orchestrator::new(&self.page, &self.state, &self.containers, self.sink.as_ref());
        orchestrator.execute(&mut self.board, config).await
    }

    /// Ask the current run to stop at its next wait
    pub fn request_stop(&self) -> bool {
        self.state.request_stop()
    }

    /// Close the session: stop whatever is running and release the page.
    /// Calling it again has no effect.
    pub fn dismiss(&mut self) {
        if self.dismissed {
            return;
        }
        self.dismissed = true;
        self.state.request_stop();
        self.state.reset();
        log::debug!("Session dismissed");
    }
}

impl<P: HostPage> Drop for BulkSession<P> {
    fn drop(&mut self) {
        self.dismiss();
    }
}
