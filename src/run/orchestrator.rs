use super::board::ItemBoard;
use super::config::{DelayKind, RunConfiguration};
use super::state::RunState;
use super::summary::RunSummary;
use crate::actions::{Outcome, StepRunner};
use crate::dom::HostPage;
use crate::error::{BulkError, Result};
use crate::item::{ItemRecord, ItemStatus};
use crate::locator::ContainerSet;
use crate::pacing::wait_with_jitter;
use crate::report::StatusSink;

/// Applies one procedure to every selectable item of a board, in order
pub struct Orchestrator<'a> {
    page: &'a dyn HostPage,
    state: &'a RunState,
    containers: &'a ContainerSet,
    sink: &'a dyn StatusSink,
}

impl<'a> Orchestrator<'a> {
    pub fn new(
        page: &'a dyn HostPage,
        state: &'a RunState,
        containers: &'a ContainerSet,
        sink: &'a dyn StatusSink,
    ) -> Self {
        Self { page, state, containers, sink }
    }

    /// Execute a run over the board's current selection.
    ///
    /// The configuration is normalized and validated before anything else;
    /// a rejected run leaves the board and the page untouched. Item failures
    /// never abort the run.
    pub async fn execute(&self, board: &mut ItemBoard, config: &RunConfiguration) -> Result<RunSummary> {
        let config = config.clone().sanitized();
        let procedure = config.procedure()?;

        if self.state.is_executing() {
            return Err(BulkError::AlreadyActive);
        }
        if board.is_empty() {
            return Err(BulkError::Configuration("No items found".to_string()));
        }

        let mut queue: Vec<ItemRecord> = board.selectable().into_iter().cloned().collect();
        if queue.is_empty() {
            return Err(BulkError::Configuration("No items selected".to_string()));
        }
        config.sort_order.apply(&mut queue);

        if !self.state.begin_execution() {
            return Err(BulkError::AlreadyActive);
        }
        let mut execution = Execution { state: self.state, sink: self.sink, board };
        self.state.clear_stop();
        log::info!(
            "Starting {} on {} items ({:?}, jitter {}%)",
            procedure.name(),
            queue.len(),
            config.sort_order,
            config.jitter_percent
        );

        let runner = StepRunner::new(self.page, self.containers, &config, self.state);
        let total = queue.len();
        let mut summary = RunSummary::default();

        for (index, record) in queue.iter().enumerate() {
            if self.state.stop_requested() {
                break;
            }

            self.sink.status(&format!("Processing {}/{}: {}", index + 1, total, record.title()));
            execution.set_status(record, ItemStatus::Processing);
            summary.attempted += 1;

            let status = match runner.run(&procedure, record.trigger()).await {
                Outcome::Completed => {
                    summary.succeeded += 1;
                    ItemStatus::Done
                }
                Outcome::Failed { step, error } => {
                    if error.is_item_scoped() {
                        log::warn!("\"{}\" failed at {}: {}", record.title(), step, error);
                    } else {
                        log::error!("\"{}\" failed at {}: {}", record.title(), step, error);
                    }
                    summary.failed += 1;
                    ItemStatus::Failed
                }
                Outcome::Stopped { after } => {
                    log::info!("\"{}\" interrupted after {}", record.title(), after.unwrap_or("start"));
                    summary.interrupted += 1;
                    ItemStatus::Interrupted
                }
            };
            execution.set_status(record, status);

            if index + 1 < total && !self.state.stop_requested() {
                wait_with_jitter(config.delay_ms(DelayKind::BetweenItems), config.jitter()).await;
            }
        }

        summary.not_started = total - summary.attempted;
        summary.stopped_early = self.state.stop_requested() || summary.not_started > 0;
        drop(execution);

        self.sink.status(&summary.message());
        self.sink.summary(&summary);
        Ok(summary)
    }
}

/// An executing run. Dropping it, even mid-item when the run future is
/// cancelled, releases the executing flag and marks the in-flight row
/// interrupted.
struct Execution<'g> {
    state: &'g RunState,
    sink: &'g dyn StatusSink,
    board: &'g mut ItemBoard,
}

impl Execution<'_> {
    fn set_status(&mut self, record: &ItemRecord, status: ItemStatus) {
        self.board.set_status(record.original_position(), status);
        self.sink.item(record, status);
    }
}

impl Drop for Execution<'_> {
    fn drop(&mut self) {
        for position in self.board.interrupt_in_flight() {
            log::info!("Item {} interrupted, run was cancelled", position + 1);
            if let Some(row) = self.board.get(position) {
                self.sink.item(&row.record, ItemStatus::Interrupted);
            }
        }
        self.state.end_execution();
        self.state.clear_stop();
    }
}
