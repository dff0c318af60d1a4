use crate::actions::Procedure;
use crate::error::{BulkError, Result};
use crate::item::ItemRecord;
use serde::{Deserialize, Serialize};

/// Jitter used when the configured value is out of range
pub const DEFAULT_JITTER_PERCENT: i64 = 30;

/// Which procedure a run applies to every selected item
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ActionKind {
    /// Add to queue
    #[default]
    Enqueue,
    /// Create a new playlist and add the item to it
    CreatePlaylist,
}

/// Visibility of a newly created playlist
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Visibility {
    Public,
    Unlisted,
    /// The create dialog's implicit default
    #[default]
    Private,
}

impl Visibility {
    /// Leading text of the dropdown option
    pub fn label(&self) -> &'static str {
        match self {
            Visibility::Public => "Public",
            Visibility::Unlisted => "Unlisted",
            Visibility::Private => "Private",
        }
    }
}

/// Execution order of the selected items
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum SortOrder {
    /// Ascending original position
    #[default]
    OldestFirst,
    /// Descending original position
    NewestFirst,
}

impl SortOrder {
    /// Sort records in place by original position
    pub fn apply(&self, records: &mut [ItemRecord]) {
        match self {
            SortOrder::OldestFirst => records.sort_by_key(|r| r.original_position()),
            SortOrder::NewestFirst => records.sort_by_key(|r| std::cmp::Reverse(r.original_position())),
        }
    }
}

/// Named delays of a run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DelayKind {
    AfterMenuOpen,
    AfterActionClick,
    BetweenItems,
    BetweenDialogSteps,
}

/// Base delays in milliseconds.
///
/// Signed so that raw user input can be carried and normalized by
/// [`RunConfiguration::sanitized`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Delays {
    pub after_menu_open: i64,
    pub after_action_click: i64,
    pub between_items: i64,
    pub between_dialog_steps: i64,
}

impl Default for Delays {
    fn default() -> Self {
        Self {
            after_menu_open: 600,
            after_action_click: 1000,
            between_items: 1500,
            between_dialog_steps: 800,
        }
    }
}

impl Delays {
    pub fn get(&self, kind: DelayKind) -> i64 {
        match kind {
            DelayKind::AfterMenuOpen => self.after_menu_open,
            DelayKind::AfterActionClick => self.after_action_click,
            DelayKind::BetweenItems => self.between_items,
            DelayKind::BetweenDialogSteps => self.between_dialog_steps,
        }
    }

    /// Builder method: same delay everywhere
    pub fn uniform(ms: i64) -> Self {
        Self { after_menu_open: ms, after_action_click: ms, between_items: ms, between_dialog_steps: ms }
    }
}

/// Settings read once at the start of a run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RunConfiguration {
    pub action: ActionKind,
    pub delays: Delays,
    /// Share of each base delay added as uniform random extra wait, 0..=100
    pub jitter_percent: i64,
    /// Required iff `action` is [`ActionKind::CreatePlaylist`]
    pub playlist_name: String,
    pub playlist_visibility: Visibility,
    pub sort_order: SortOrder,
}

impl Default for RunConfiguration {
    fn default() -> Self {
        Self {
            action: ActionKind::default(),
            delays: Delays::default(),
            jitter_percent: DEFAULT_JITTER_PERCENT,
            playlist_name: String::new(),
            playlist_visibility: Visibility::default(),
            sort_order: SortOrder::default(),
        }
    }
}

impl RunConfiguration {
    /// Create a configuration for the add-to-queue procedure
    pub fn enqueue() -> Self {
        Self::default()
    }

    /// Create a configuration for the create-playlist procedure
    pub fn create_playlist(name: impl Into<String>, visibility: Visibility) -> Self {
        Self {
            action: ActionKind::CreatePlaylist,
            playlist_name: name.into(),
            playlist_visibility: visibility,
            ..Self::default()
        }
    }

    /// Builder method: set delays
    pub fn with_delays(mut self, delays: Delays) -> Self {
        self.delays = delays;
        self
    }

    /// Builder method: set jitter
    pub fn with_jitter(mut self, jitter_percent: i64) -> Self {
        self.jitter_percent = jitter_percent;
        self
    }

    /// Builder method: set sort order
    pub fn with_sort_order(mut self, sort_order: SortOrder) -> Self {
        self.sort_order = sort_order;
        self
    }

    /// Replace out-of-range input with defaults.
    ///
    /// A negative delay falls back to its default, a jitter outside 0..=100
    /// falls back to [`DEFAULT_JITTER_PERCENT`].
    pub fn sanitized(mut self) -> Self {
        let defaults = Delays::default();
        let fix = |value: i64, default: i64| if value < 0 { default } else { value };
        self.delays = Delays {
            after_menu_open: fix(self.delays.after_menu_open, defaults.after_menu_open),
            after_action_click: fix(self.delays.after_action_click, defaults.after_action_click),
            between_items: fix(self.delays.between_items, defaults.between_items),
            between_dialog_steps: fix(self.delays.between_dialog_steps, defaults.between_dialog_steps),
        };
        if !(0..=100).contains(&self.jitter_percent) {
            self.jitter_percent = DEFAULT_JITTER_PERCENT;
        }
        self
    }

    /// Validate and build the procedure this run applies.
    ///
    /// Fails with a configuration error when a playlist name is required but
    /// empty after trimming.
    pub fn procedure(&self) -> Result<Procedure> {
        match self.action {
            ActionKind::Enqueue => Ok(Procedure::Enqueue),
            ActionKind::CreatePlaylist => {
                let name = self.playlist_name.trim();
                if name.is_empty() {
                    return Err(BulkError::Configuration("Please enter a playlist name".to_string()));
                }
                Ok(Procedure::CreatePlaylist { name: name.to_string(), visibility: self.playlist_visibility })
            }
        }
    }

    /// Base delay in milliseconds
    pub fn delay_ms(&self, kind: DelayKind) -> f64 {
        self.delays.get(kind) as f64
    }

    /// Jitter as used by the pacing primitive
    pub fn jitter(&self) -> f64 {
        self.jitter_percent as f64
    }
}
