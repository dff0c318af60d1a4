//! Run orchestration
//!
//! - [`config`]: run settings and their normalization
//! - [`state`]: the shared lifecycle and stop flags
//! - [`board`]: scanned items with selection, filter and status
//! - [`orchestrator`]: sequential execution of one procedure over a selection
//! - [`summary`]: aggregate outcome of a run

pub mod board;
pub mod config;
pub mod orchestrator;
pub mod state;
pub mod summary;

pub use board::{BoardRow, ItemBoard, StatusCounts};
pub use config::{ActionKind, Delays, RunConfiguration, SortOrder, Visibility};
pub use orchestrator::Orchestrator;
pub use state::RunState;
pub use summary::RunSummary;
