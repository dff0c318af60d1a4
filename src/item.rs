use crate::dom::NodeHandle;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Sentinel duration when the badge could not be read
pub const UNKNOWN_DURATION: &str = "?:??";

/// Sentinel upload date when no metadata looked like a date
pub const UNKNOWN_DATE: &str = "?";

/// One entry of the scanned list.
///
/// Records are immutable once created. The trigger handle is a non-owning
/// reference into the host document and may stop resolving at any time.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ItemRecord {
    title: String,
    duration: String,
    upload_date: String,
    #[serde(skip)]
    trigger: NodeHandle,
    original_position: usize,
    identity: String,
}

impl ItemRecord {
    pub fn new(
        title: impl Into<String>,
        duration: impl Into<String>,
        upload_date: impl Into<String>,
        trigger: NodeHandle,
        original_position: usize,
    ) -> Self {
        let title = title.into();
        let duration = duration.into();
        let upload_date = upload_date.into();
        let identity = format!("{}{}{}{}", title, duration, upload_date, original_position);
        Self { title, duration, upload_date, trigger, original_position, identity }
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn duration(&self) -> &str {
        &self.duration
    }

    pub fn upload_date(&self) -> &str {
        &self.upload_date
    }

    /// The control that opens this item's context menu
    pub fn trigger(&self) -> &NodeHandle {
        &self.trigger
    }

    /// Index in document order at scan time
    pub fn original_position(&self) -> usize {
        self.original_position
    }

    /// Derived, non-cryptographic identity; not guaranteed collision free
    pub fn identity(&self) -> &str {
        &self.identity
    }
}

/// Per-item progress through a run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ItemStatus {
    #[default]
    Pending,
    Processing,
    Done,
    Failed,
    /// The run was stopped while this item's procedure was in flight
    Interrupted,
}

impl ItemStatus {
    /// Done items are never selected again in the same session
    pub fn is_selectable(&self) -> bool {
        !matches!(self, ItemStatus::Done | ItemStatus::Processing)
    }
}

impl fmt::Display for ItemStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            ItemStatus::Pending => "pending",
            ItemStatus::Processing => "processing",
            ItemStatus::Done => "done",
            ItemStatus::Failed => "failed",
            ItemStatus::Interrupted => "interrupted",
        };
        f.write_str(label)
    }
}
