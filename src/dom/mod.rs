//! Access to the host page's live DOM
//!
//! The engine never talks to the browser directly. It goes through
//! [`HostPage`], a small synchronous capability over the live document:
//! - [`ChromePage`]: implementation over a `headless_chrome` tab
//! - [`ElementInfo`]: snapshot of one element's text, attributes and visibility
//! - [`selectors`]: the markup contract of the host page

pub mod chrome;
pub mod element;
pub mod selectors;

#[cfg(test)]
pub(crate) mod fake;

pub use chrome::ChromePage;
pub use element::{BoundingBox, ComputedStyle, ElementInfo};

use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Non-owning reference to a node of the host document.
///
/// The host page may remove or re-render the node at any time. A handle is
/// therefore only a capability: every use re-resolves it and a node that is
/// gone surfaces as [`BulkError::DetachedHandle`](crate::BulkError::DetachedHandle).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeHandle(u64);

impl NodeHandle {
    pub fn new(id: u64) -> Self {
        Self(id)
    }

    pub fn id(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for NodeHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "node#{}", self.0)
    }
}

/// Synchronous view of the host page's document.
///
/// All calls are atomic from the scheduler's point of view; the only
/// suspension points of the engine are the pacing waits.
pub trait HostPage {
    /// All elements matching `selector`, in document order
    fn query_all(&self, selector: &str) -> Result<Vec<NodeHandle>>;

    /// Descendants of `scope` matching `selector`, in document order
    fn query_within(&self, scope: &NodeHandle, selector: &str) -> Result<Vec<NodeHandle>>;

    /// The node itself or its nearest ancestor matching `selector`
    fn closest(&self, node: &NodeHandle, selector: &str) -> Result<Option<NodeHandle>>;

    /// Whether the node matches `selector`
    fn matches(&self, node: &NodeHandle, selector: &str) -> Result<bool>;

    /// Read text, attributes, geometry and computed style of a node
    fn inspect(&self, node: &NodeHandle) -> Result<ElementInfo>;

    /// Whether the handle still points at a node attached to the document
    fn is_attached(&self, node: &NodeHandle) -> bool;

    /// Dispatch a click on the node
    fn click(&self, node: &NodeHandle) -> Result<()>;

    /// Assign a form control's value and fire a bubbling `input` event
    fn set_value(&self, node: &NodeHandle, value: &str) -> Result<()>;

    /// Click the document body, which closes most open popups
    fn click_body(&self) -> Result<()>;

    /// Scroll the window to the current bottom of the document
    fn scroll_to_bottom(&self) -> Result<()>;

    /// Current scroll height of the document
    fn document_height(&self) -> Result<u64>;

    /// First match of `selector` under `scope`, if any
    fn first_within(&self, scope: &NodeHandle, selector: &str) -> Result<Option<NodeHandle>> {
        Ok(self.query_within(scope, selector)?.into_iter().next())
    }

    /// Text of the first match of `selector` under `scope`
    fn text_within(&self, scope: &NodeHandle, selector: &str) -> Result<Option<String>> {
        match self.first_within(scope, selector)? {
            Some(node) => Ok(self.inspect(&node)?.trimmed_text().map(str::to_string)),
            None => Ok(None),
        }
    }
}

impl<P: HostPage + ?Sized> HostPage for &P {
    fn query_all(&self, selector: &str) -> Result<Vec<NodeHandle>> {
        (**self).query_all(selector)
    }

    fn query_within(&self, scope: &NodeHandle, selector: &str) -> Result<Vec<NodeHandle>> {
        (**self).query_within(scope, selector)
    }

    fn closest(&self, node: &NodeHandle, selector: &str) -> Result<Option<NodeHandle>> {
        (**self).closest(node, selector)
    }

    fn matches(&self, node: &NodeHandle, selector: &str) -> Result<bool> {
        (**self).matches(node, selector)
    }

    fn inspect(&self, node: &NodeHandle) -> Result<ElementInfo> {
        (**self).inspect(node)
    }

    fn is_attached(&self, node: &NodeHandle) -> bool {
        (**self).is_attached(node)
    }

    fn click(&self, node: &NodeHandle) -> Result<()> {
        (**self).click(node)
    }

    fn set_value(&self, node: &NodeHandle, value: &str) -> Result<()> {
        (**self).set_value(node, value)
    }

    fn click_body(&self) -> Result<()> {
        (**self).click_body()
    }

    fn scroll_to_bottom(&self) -> Result<()> {
        (**self).scroll_to_bottom()
    }

    fn document_height(&self) -> Result<u64> {
        (**self).document_height()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_node_handle_display() {
        let handle = NodeHandle::new(42);
        assert_eq!(handle.id(), 42);
        assert_eq!(handle.to_string(), "node#42");
    }

    #[test]
    fn test_node_handle_serializes_as_number() {
        let handle: NodeHandle = serde_json::from_str("7").unwrap();
        assert_eq!(handle, NodeHandle::new(7));
        assert_eq!(serde_json::to_string(&handle).unwrap(), "7");
    }
}
