//! Per-item procedures as data
//!
//! A [`Procedure`] expands into a flat list of [`Step`]s and one
//! [`StepRunner`] executes any such list. Adding a procedure means adding a
//! step list, not another control-flow routine.

mod runner;

pub use runner::{Outcome, StepRunner};

use crate::dom::selectors::{self as sel, DialogTarget};
use crate::run::config::{DelayKind, Visibility};

/// The fixed interaction sequence applied to one item
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Procedure {
    /// Open the item menu and pick "Add to queue"
    Enqueue,
    /// Save the item to a playlist created on the fly
    CreatePlaylist { name: String, visibility: Visibility },
}

impl Procedure {
    pub fn name(&self) -> &'static str {
        match self {
            Procedure::Enqueue => "enqueue",
            Procedure::CreatePlaylist { .. } => "create-playlist",
        }
    }

    /// Expand into the ordered steps to run for one item
    pub fn steps(&self) -> Vec<Step> {
        match self {
            Procedure::Enqueue => vec![
                Step::new("open menu", Interaction::OpenMenu, Pause::full(DelayKind::AfterMenuOpen)),
                Step::new(
                    "add to queue",
                    Interaction::MenuEntry(sel::ADD_TO_QUEUE_LABEL),
                    Pause::full(DelayKind::AfterActionClick),
                ),
            ],
            Procedure::CreatePlaylist { name, visibility } => {
                let mut steps = vec![
                    Step::new("open menu", Interaction::OpenMenu, Pause::full(DelayKind::AfterMenuOpen)),
                    Step::new(
                        "save to playlist",
                        Interaction::MenuEntry(sel::SAVE_TO_PLAYLIST_LABEL),
                        Pause::full(DelayKind::BetweenDialogSteps),
                    ),
                    Step::new(
                        "new playlist",
                        Interaction::DialogControl { target: sel::NEW_PLAYLIST_BUTTON, retry_once: true },
                        Pause::full(DelayKind::BetweenDialogSteps),
                    ),
                    Step::new(
                        "playlist name",
                        Interaction::FillField { target: sel::PLAYLIST_NAME_INPUT, value: name.clone() },
                        Pause::half(DelayKind::BetweenDialogSteps),
                    ),
                ];

                // Private is the dialog's default, so the dropdown is left alone
                if *visibility != Visibility::Private {
                    steps.push(
                        Step::new(
                            "visibility dropdown",
                            Interaction::DialogControl { target: sel::VISIBILITY_TRIGGER, retry_once: false },
                            Pause::full(DelayKind::BetweenDialogSteps),
                        )
                        .dismiss_on_failure(),
                    );
                    steps.push(
                        Step::new(
                            "visibility option",
                            Interaction::DropdownOption(visibility.label()),
                            Pause::half(DelayKind::BetweenDialogSteps),
                        )
                        .dismiss_on_failure(),
                    );
                }

                steps.push(
                    Step::new(
                        "create",
                        Interaction::Submit(sel::CREATE_PLAYLIST_SUBMIT),
                        Pause::full(DelayKind::AfterActionClick),
                    )
                    .dismiss_on_failure(),
                );
                steps
            }
        }
    }
}

/// One locate-and-act unit followed by a paced wait
#[derive(Debug, Clone, PartialEq)]
pub struct Step {
    pub name: &'static str,
    pub interaction: Interaction,
    pub pause: Pause,
    pub recovery: Recovery,
}

impl Step {
    pub fn new(name: &'static str, interaction: Interaction, pause: Pause) -> Self {
        Self { name, interaction, pause, recovery: Recovery::None }
    }

    /// Builder method: close open popups when this step fails
    pub fn dismiss_on_failure(mut self) -> Self {
        self.recovery = Recovery::DismissOverlay;
        self
    }
}

/// What a step does on the page
#[derive(Debug, Clone, PartialEq)]
pub enum Interaction {
    /// Click the item's own menu trigger
    OpenMenu,
    /// Click the visible context-menu entry with this exact label
    MenuEntry(&'static str),
    /// Click a control inside an open dialog, optionally waiting once more
    /// for it to render
    DialogControl { target: DialogTarget, retry_once: bool },
    /// Type a value into a field of an open dialog
    FillField { target: DialogTarget, value: String },
    /// Pick the option of the open dropdown starting with this label
    DropdownOption(&'static str),
    /// Click a submit button, failing if it is disabled
    Submit(DialogTarget),
}

/// Wait after a successful step: a configured delay scaled by `factor`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Pause {
    pub delay: DelayKind,
    pub factor: f64,
}

impl Pause {
    pub fn full(delay: DelayKind) -> Self {
        Self { delay, factor: 1.0 }
    }

    pub fn half(delay: DelayKind) -> Self {
        Self { delay, factor: 0.5 }
    }
}

/// Cleanup performed when a step fails
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Recovery {
    None,
    /// Click the document body to close whatever popup is left open
    DismissOverlay,
}
