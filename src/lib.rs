//! # yt-bulk-actions
//!
//! Bulk-apply "Add to queue" or "Save to a new playlist" to the videos of a
//! YouTube playlist page by driving the page's own menus and dialogs over the
//! Chrome DevTools Protocol (CDP).
//!
//! There is no API client: every operation is a synthetic click or input
//! event dispatched into the live page, paced with randomized waits.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use yt_bulk_actions::{BrowserSession, BulkSession, LaunchOptions, LogSink, RunConfiguration, RunState, ScanOptions};
//!
//! # async fn demo() -> yt_bulk_actions::Result<()> {
//! let browser = BrowserSession::launch(LaunchOptions::new().headless(false).user_data_dir("./profile"))?;
//! let page = browser.open("https://www.youtube.com/playlist?list=WL")?;
//!
//! let state = Arc::new(RunState::new());
//! let mut session = BulkSession::start(page, state, Box::new(LogSink), &ScanOptions::default()).await?;
//!
//! session.board_mut().filter("live");
//! let summary = session.run(&RunConfiguration::enqueue()).await?;
//! println!("{}", summary.message());
//! # Ok(())
//! # }
//! ```
//!
//! ## Module Overview
//!
//! - [`browser`]: Launching or attaching to Chrome and opening the page
//! - [`dom`]: The [`HostPage`] capability and its Chrome implementation
//! - [`locator`]: Visibility-aware lookups of menu entries and dialog controls
//! - [`actions`]: The per-item procedures and the step runner
//! - [`scan`]: Scroll-until-stable loading and item extraction
//! - [`run`]: Configuration, selection board, orchestration and summaries
//! - [`pacing`]: Jittered waits
//! - [`error`]: Error types and result aliases

pub mod actions;
pub mod browser;
pub mod bulk;
pub mod dom;
pub mod error;
pub mod item;
pub mod locator;
pub mod pacing;
pub mod report;
pub mod run;
pub mod scan;

pub use actions::{Outcome, Procedure};
pub use browser::{BrowserSession, ConnectionOptions, LaunchOptions};
pub use bulk::BulkSession;
pub use dom::{ChromePage, HostPage, NodeHandle};
pub use error::{BulkError, Result};
pub use item::{ItemRecord, ItemStatus};
pub use locator::{ContainerRecognizer, ContainerSet, Locator, SelectorContainer};
pub use report::{LogSink, StatusSink};
pub use run::{ActionKind, Delays, ItemBoard, RunConfiguration, RunState, RunSummary, SortOrder, Visibility};
pub use scan::{ScanOptions, ScanReport};
