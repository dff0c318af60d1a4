//! Host page markup contract
//!
//! Every CSS selector and menu label the engine relies on. The host page
//! changes its markup without notice; this is the file to update when it does.

/// A control looked up inside an open dialog, with a name for logs and errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DialogTarget {
    pub selector: &'static str,
    pub name: &'static str,
}

// Items of the scrollable list
pub const ITEM_RENDERER: &str =
    "ytd-playlist-video-renderer, ytd-video-renderer, ytd-rich-item-renderer, ytd-grid-video-renderer";
pub const CONTINUATION_SPINNER: &str = "ytd-continuation-item-renderer tp-yt-paper-spinner[active]";

// Inside one item
pub const ITEM_TITLE: &str = "#video-title, #title-wrapper .title-and-badge a #video-title";
pub const ITEM_DURATION: &str = "#thumbnail-overlay-time-status-renderer span#text, ytd-thumbnail-overlay-time-status-renderer div.badge-shape-wiz__text";
pub const ITEM_METADATA_SPAN: &str = "#metadata-line > span.inline-metadata-item, #metadata-line > span.ytd-video-meta-block";
pub const ITEM_VIDEO_INFO_SPAN: &str = "yt-formatted-string#video-info span.style-scope.yt-formatted-string";
pub const ITEM_MENU_BUTTON: &str = "#menu button#button, #menu yt-icon-button";

// Context menu
pub const MENU_ENTRY: &str = "ytd-menu-service-item-renderer, tp-yt-paper-item";
pub const MENU_ENTRY_TEXT: &str = "yt-formatted-string, .item-text";
pub const MENU_ENTRY_CLICKABLE: &str = "tp-yt-paper-item";
pub const ADD_TO_QUEUE_LABEL: &str = "Add to queue";
pub const SAVE_TO_PLAYLIST_LABEL: &str = "Save to playlist";

// Containers that count as "currently open"
pub const OPEN_SAVE_DIALOG: &str = "ytd-add-to-playlist-renderer:not([hidden])";
pub const OPEN_CREATE_DIALOG: &str = "yt-create-playlist-dialog-view-model:not([hidden]), ytd-playlist-dialog-renderer:not([hidden])";
pub const OPEN_MENU_POPUP: &str = "ytd-menu-popup-renderer:not([hidden])";
pub const OPEN_PAPER_DIALOG: &str = "ytd-popup-container tp-yt-paper-dialog:not([aria-hidden=\"true\"])";
pub const OPEN_POPUP_DROPDOWN: &str = "ytd-popup-container tp-yt-iron-dropdown:not([aria-hidden=\"true\"])";

// Save / create playlist dialogs
pub const NEW_PLAYLIST_BUTTON: DialogTarget = DialogTarget {
    selector: "ytd-add-to-playlist-renderer button[aria-label=\"New playlist\"], ytd-add-to-playlist-renderer button[aria-label=\"Create new playlist\"], ytd-add-to-playlist-renderer #create-playlist-button",
    name: "\"New playlist\" button",
};

pub const PLAYLIST_NAME_INPUT: DialogTarget = DialogTarget {
    selector: "tp-yt-paper-dialog textarea.ytStandardsTextareaShapeTextarea, yt-dialog-view-model textarea.ytStandardsTextareaShapeTextarea",
    name: "playlist name input",
};

pub const VISIBILITY_TRIGGER: DialogTarget = DialogTarget {
    selector: "yt-create-playlist-dialog-form-view-model div.ytDropdownViewModelDropdownContainer[role=\"combobox\"], ytd-add-to-playlist-renderer div.ytDropdownViewModelDropdownContainer[role=\"combobox\"], tp-yt-paper-dialog div.ytDropdownViewModelDropdownContainer[role=\"combobox\"]",
    name: "visibility dropdown trigger",
};

pub const CREATE_PLAYLIST_SUBMIT: DialogTarget = DialogTarget {
    selector: "yt-form-footer-view-model button.yt-spec-button-shape-next--filled[aria-label=\"Create\"], yt-create-playlist-dialog-form-view-model button[aria-label=\"Create\"], tp-yt-paper-dialog button.yt-spec-button-shape-next--filled[aria-label=\"Create\"]",
    name: "\"Create\" button",
};

// Visibility dropdown
pub const VISIBILITY_DROPDOWN: &str = "tp-yt-iron-dropdown:not([aria-hidden=\"true\"])";
pub const VISIBILITY_OPTION: &str = "tp-yt-paper-item, yt-list-item-view-model";
pub const VISIBILITY_OPTION_TEXT: &str = ".yt-list-item-view-model-wiz__title, .item-text, yt-formatted-string";
