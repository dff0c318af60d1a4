use super::{Interaction, Pause, Procedure, Recovery, Step};
use crate::dom::selectors::DialogTarget;
use crate::dom::{HostPage, NodeHandle};
use crate::error::{BulkError, Result};
use crate::locator::{ContainerSet, Locator};
use crate::pacing::wait_with_jitter;
use crate::run::config::{DelayKind, RunConfiguration};
use crate::run::state::RunState;

/// Fixed settle time after dismissing an overlay
const DISMISS_SETTLE_MS: f64 = 200.0;

/// How one procedure ended for one item
#[derive(Debug)]
pub enum Outcome {
    Completed,
    /// A step failed; the item is done for this run
    Failed { step: &'static str, error: BulkError },
    /// The stop flag was seen at a checkpoint
    Stopped { after: Option<&'static str> },
}

impl Outcome {
    pub fn is_completed(&self) -> bool {
        matches!(self, Outcome::Completed)
    }
}

enum Interrupt {
    Failed(BulkError),
    Stopped,
}

impl From<BulkError> for Interrupt {
    fn from(error: BulkError) -> Self {
        Interrupt::Failed(error)
    }
}

/// Executes [`Step`] lists against one page
pub struct StepRunner<'a> {
    page: &'a dyn HostPage,
    locator: Locator<'a>,
    config: &'a RunConfiguration,
    state: &'a RunState,
}

impl<'a> StepRunner<'a> {
    pub fn new(
        page: &'a dyn HostPage,
        containers: &'a ContainerSet,
        config: &'a RunConfiguration,
        state: &'a RunState,
    ) -> Self {
        Self { page, locator: Locator::new(page, containers), config, state }
    }

    /// Run every step of `procedure` for the item behind `trigger`.
    ///
    /// The stop flag is checked before the first step and after every wait.
    /// Failures never propagate: they end this item's procedure only.
    pub async fn run(&self, procedure: &Procedure, trigger: &NodeHandle) -> Outcome {
        if self.state.stop_requested() {
            return Outcome::Stopped { after: None };
        }

        for step in procedure.steps() {
            match self.perform(&step, trigger).await {
                Ok(()) => {}
                Err(Interrupt::Stopped) => return Outcome::Stopped { after: Some(step.name) },
                Err(Interrupt::Failed(error)) => {
                    log::warn!("Step \"{}\" of {} failed: {}", step.name, procedure.name(), error);
                    self.recover(step.recovery).await;
                    return Outcome::Failed { step: step.name, error };
                }
            }

            self.pause(step.pause).await;
            if self.state.stop_requested() {
                return Outcome::Stopped { after: Some(step.name) };
            }
        }

        Outcome::Completed
    }

    async fn perform(&self, step: &Step, trigger: &NodeHandle) -> std::result::Result<(), Interrupt> {
        log::debug!("Step: {}", step.name);
        match &step.interaction {
            Interaction::OpenMenu => {
                if !self.page.is_attached(trigger) {
                    return Err(BulkError::DetachedHandle("Item menu button".to_string()).into());
                }
                self.page.click(trigger)?;
            }
            Interaction::MenuEntry(label) => {
                let entry = self
                    .locator
                    .find_menu_entry_by_label(label)
                    .ok_or_else(|| BulkError::LocatorMiss(format!("\"{}\" menu entry", label)))?;
                self.page.click(&entry)?;
            }
            Interaction::DialogControl { target, retry_once } => {
                let control = match self.locator.find_element_in_active_dialog(target) {
                    Some(control) => control,
                    None if *retry_once => {
                        log::info!("{} not there yet, waiting once more", target.name);
                        self.pause(Pause::full(DelayKind::BetweenDialogSteps)).await;
                        if self.state.stop_requested() {
                            return Err(Interrupt::Stopped);
                        }
                        self.locate(target)?
                    }
                    None => return Err(miss(target).into()),
                };
                self.page.click(&control)?;
            }
            Interaction::FillField { target, value } => {
                let field = self.locate(target)?;
                self.page.set_value(&field, value)?;
            }
            Interaction::DropdownOption(label) => {
                let option = self
                    .locator
                    .find_visibility_option(label)
                    .ok_or_else(|| BulkError::LocatorMiss(format!("\"{}\" visibility option", label)))?;
                self.page.click(&option)?;
            }
            Interaction::Submit(target) => {
                let button = self.locate(target)?;
                if self.page.inspect(&button)?.is_disabled() {
                    return Err(BulkError::DisabledTarget(capitalize(target.name)).into());
                }
                self.page.click(&button)?;
            }
        }
        Ok(())
    }

    fn locate(&self, target: &DialogTarget) -> Result<NodeHandle> {
        self.locator.find_element_in_active_dialog(target).ok_or_else(|| miss(target))
    }

    async fn pause(&self, pause: Pause) {
        let base = self.config.delay_ms(pause.delay) * pause.factor;
        wait_with_jitter(base, self.config.jitter()).await;
    }

    async fn recover(&self, recovery: Recovery) {
        if recovery == Recovery::DismissOverlay {
            if let Err(e) = self.page.click_body() {
                log::debug!("Could not dismiss overlay: {}", e);
            }
            wait_with_jitter(DISMISS_SETTLE_MS, 0.0).await;
        }
    }
}

fn miss(target: &DialogTarget) -> BulkError {
    BulkError::LocatorMiss(capitalize(target.name))
}

fn capitalize(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
