//! Locating transient menu entries, dialog controls and dropdown options
//!
//! The host page keeps many closed menus and dialog templates in the document
//! at the same time, so a plain "first match" lookup returns the wrong
//! instance. Every lookup here filters candidates by rendered visibility and,
//! for dialogs, by structural containment in a container that is currently
//! open.
//!
//! Lookups never fail: a miss returns `None` and logs a warning. Errors from
//! the page while checking one candidate only disqualify that candidate.

use crate::dom::selectors::{self as sel, DialogTarget};
use crate::dom::{HostPage, NodeHandle};

/// Recognizes one shape of "currently open dialog or popup" container
pub trait ContainerRecognizer {
    /// Name used in logs
    fn name(&self) -> &str;

    /// Whether `node` sits inside an open container of this shape
    fn contains(&self, page: &dyn HostPage, node: &NodeHandle) -> bool;
}

/// Recognizer matching the nearest ancestor against a CSS selector
#[derive(Debug, Clone)]
pub struct SelectorContainer {
    name: String,
    selector: String,
}

impl SelectorContainer {
    pub fn new(name: impl Into<String>, selector: impl Into<String>) -> Self {
        Self { name: name.into(), selector: selector.into() }
    }
}

impl ContainerRecognizer for SelectorContainer {
    fn name(&self) -> &str {
        &self.name
    }

    fn contains(&self, page: &dyn HostPage, node: &NodeHandle) -> bool {
        matches!(page.closest(node, &self.selector), Ok(Some(_)))
    }
}

/// The set of container shapes that count as "open"
pub struct ContainerSet {
    recognizers: Vec<Box<dyn ContainerRecognizer>>,
}

impl ContainerSet {
    /// An empty set; nothing is considered inside an open dialog
    pub fn empty() -> Self {
        Self { recognizers: Vec::new() }
    }

    /// Add a recognizer
    pub fn with(mut self, recognizer: impl ContainerRecognizer + 'static) -> Self {
        self.recognizers.push(Box::new(recognizer));
        self
    }

    pub fn len(&self) -> usize {
        self.recognizers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.recognizers.is_empty()
    }

    /// Name of the first recognizer that claims `node`
    pub fn recognize(&self, page: &dyn HostPage, node: &NodeHandle) -> Option<&str> {
        self.recognizers.iter().find(|r| r.contains(page, node)).map(|r| r.name())
    }
}

impl Default for ContainerSet {
    fn default() -> Self {
        Self::empty()
            .with(SelectorContainer::new("save dialog", sel::OPEN_SAVE_DIALOG))
            .with(SelectorContainer::new("create dialog", sel::OPEN_CREATE_DIALOG))
            .with(SelectorContainer::new("menu popup", sel::OPEN_MENU_POPUP))
            .with(SelectorContainer::new("paper dialog", sel::OPEN_PAPER_DIALOG))
            .with(SelectorContainer::new("popup dropdown", sel::OPEN_POPUP_DROPDOWN))
    }
}

/// Visibility-aware element lookups over a [`HostPage`]
pub struct Locator<'a> {
    page: &'a dyn HostPage,
    containers: &'a ContainerSet,
}

impl<'a> Locator<'a> {
    pub fn new(page: &'a dyn HostPage, containers: &'a ContainerSet) -> Self {
        Self { page, containers }
    }

    /// Find a rendered context-menu entry whose text is exactly `label`.
    ///
    /// Returns the nested clickable item when there is one, else the entry.
    pub fn find_menu_entry_by_label(&self, label: &str) -> Option<NodeHandle> {
        let candidates = match self.page.query_all(sel::MENU_ENTRY) {
            Ok(candidates) => candidates,
            Err(e) => {
                log::warn!("Menu entry lookup failed: {}", e);
                return None;
            }
        };

        let entry = candidates.into_iter().find(|candidate| {
            let rendered = self.page.inspect(candidate).map(|info| info.is_rendered()).unwrap_or(false);
            rendered
                && self
                    .page
                    .text_within(candidate, sel::MENU_ENTRY_TEXT)
                    .ok()
                    .flatten()
                    .is_some_and(|text| text == label)
        });

        match entry {
            Some(entry) => {
                log::debug!("Found menu entry \"{}\"", label);
                Some(self.clickable_part(entry))
            }
            None => {
                log::warn!("Could not find visible menu entry \"{}\"", label);
                None
            }
        }
    }

    fn clickable_part(&self, entry: NodeHandle) -> NodeHandle {
        if self.page.matches(&entry, sel::MENU_ENTRY_CLICKABLE).unwrap_or(false) {
            return entry;
        }
        self.page
            .first_within(&entry, sel::MENU_ENTRY_CLICKABLE)
            .ok()
            .flatten()
            .unwrap_or(entry)
    }

    /// Find a displayed element matching `target` that sits inside an open
    /// dialog or popup.
    pub fn find_element_in_active_dialog(&self, target: &DialogTarget) -> Option<NodeHandle> {
        let candidates = match self.page.query_all(target.selector) {
            Ok(candidates) => candidates,
            Err(e) => {
                log::warn!("Lookup of {} failed: {}", target.name, e);
                return None;
            }
        };

        for candidate in candidates {
            let displayed = self.page.inspect(&candidate).map(|info| info.is_displayed()).unwrap_or(false);
            if !displayed {
                continue;
            }
            if let Some(container) = self.containers.recognize(self.page, &candidate) {
                log::debug!("Found visible {} in {}", target.name, container);
                return Some(candidate);
            }
        }

        log::warn!("Could not find visible {} in an open dialog", target.name);
        None
    }

    /// Find the option of an open dropdown whose text starts with `label`
    pub fn find_visibility_option(&self, label: &str) -> Option<NodeHandle> {
        let dropdown = self.page.query_all(sel::VISIBILITY_DROPDOWN).ok().and_then(|dropdowns| {
            dropdowns
                .into_iter()
                .find(|d| self.page.inspect(d).map(|info| info.has_offset_parent).unwrap_or(false))
        });

        let Some(dropdown) = dropdown else {
            log::warn!("No open dropdown while looking for option \"{}\"", label);
            return None;
        };

        let option = self.page.query_within(&dropdown, sel::VISIBILITY_OPTION).ok().and_then(|options| {
            options.into_iter().find(|option| {
                self.page
                    .text_within(option, sel::VISIBILITY_OPTION_TEXT)
                    .ok()
                    .flatten()
                    .is_some_and(|text| text.starts_with(label))
            })
        });

        if option.is_none() {
            log::warn!("Could not find visible option starting with \"{}\"", label);
        }
        option
    }
}
