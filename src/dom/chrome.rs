use crate::dom::{ElementInfo, HostPage, NodeHandle};
use crate::error::{BulkError, Result};
use headless_chrome::Tab;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use std::sync::Arc;

/// [`HostPage`] over a live Chrome tab.
///
/// Every call evaluates one small script in the tab. The helpers in
/// `page_helpers.js` tag returned elements with a `data-ytb-handle` attribute
/// and resolve handles through it, so a node the page has re-rendered reads
/// as detached instead of pointing at its replacement.
#[derive(Clone)]
pub struct ChromePage {
    tab: Arc<Tab>,
}

/// Envelope returned by every helper
#[derive(Debug, Deserialize)]
struct Reply<T> {
    #[serde(default)]
    detached: bool,
    value: Option<T>,
}

impl ChromePage {
    /// Wrap a tab that already shows the host page
    pub fn new(tab: Arc<Tab>) -> Self {
        Self { tab }
    }

    /// The underlying tab
    pub fn tab(&self) -> &Arc<Tab> {
        &self.tab
    }

    /// Evaluate `call` (an expression over the helpers) and decode its reply
    fn call<T: DeserializeOwned>(&self, call: &str) -> Result<Reply<T>> {
        let script = format!(
            "(function() {{\n{}\nreturn JSON.stringify({});\n}})()",
            include_str!("page_helpers.js"),
            call
        );

        let result = self
            .tab
            .evaluate(&script, false)
            .map_err(|e| BulkError::EvaluationFailed(e.to_string()))?;

        let value = result
            .value
            .ok_or_else(|| BulkError::DomParseFailed(format!("No value returned from `{}`", call)))?;

        // The helpers return a JSON string, so we need to parse it as a string first
        let json_str: String = serde_json::from_value(value)
            .map_err(|e| BulkError::DomParseFailed(format!("Failed to get JSON string: {}", e)))?;

        serde_json::from_str(&json_str)
            .map_err(|e| BulkError::DomParseFailed(format!("Failed to parse reply of `{}`: {}", call, e)))
    }

    /// Call a helper that needs a live node
    fn call_on<T: DeserializeOwned>(&self, node: &NodeHandle, call: &str) -> Result<Option<T>> {
        let reply = self.call::<T>(call)?;
        if reply.detached {
            return Err(BulkError::DetachedHandle(node.to_string()));
        }
        Ok(reply.value)
    }

    fn required<T>(value: Option<T>, call: &str) -> Result<T> {
        value.ok_or_else(|| BulkError::DomParseFailed(format!("Empty reply from `{}`", call)))
    }
}

/// Quote a string as a JavaScript literal
fn js_str(value: &str) -> String {
    serde_json::to_string(value).unwrap_or_else(|_| "\"\"".to_string())
}

impl HostPage for ChromePage {
    fn query_all(&self, selector: &str) -> Result<Vec<NodeHandle>> {
        let call = format!("queryAll(null, {})", js_str(selector));
        let reply = self.call::<Vec<NodeHandle>>(&call)?;
        Self::required(reply.value, &call)
    }

    fn query_within(&self, scope: &NodeHandle, selector: &str) -> Result<Vec<NodeHandle>> {
        let call = format!("queryAll({}, {})", scope.id(), js_str(selector));
        let value = self.call_on::<Vec<NodeHandle>>(scope, &call)?;
        Self::required(value, &call)
    }

    fn closest(&self, node: &NodeHandle, selector: &str) -> Result<Option<NodeHandle>> {
        let call = format!("closest({}, {})", node.id(), js_str(selector));
        self.call_on::<NodeHandle>(node, &call)
    }

    fn matches(&self, node: &NodeHandle, selector: &str) -> Result<bool> {
        let call = format!("matches({}, {})", node.id(), js_str(selector));
        let value = self.call_on::<bool>(node, &call)?;
        Self::required(value, &call)
    }

    fn inspect(&self, node: &NodeHandle) -> Result<ElementInfo> {
        let call = format!("inspect({})", node.id());
        let value = self.call_on::<ElementInfo>(node, &call)?;
        Self::required(value, &call)
    }

    fn is_attached(&self, node: &NodeHandle) -> bool {
        let call = format!("attached({})", node.id());
        match self.call::<bool>(&call) {
            Ok(reply) => reply.value.unwrap_or(false),
            Err(e) => {
                log::debug!("Failed to check {}: {}", node, e);
                false
            }
        }
    }

    fn click(&self, node: &NodeHandle) -> Result<()> {
        let call = format!("click({})", node.id());
        self.call_on::<bool>(node, &call)?;
        Ok(())
    }

    fn set_value(&self, node: &NodeHandle, value: &str) -> Result<()> {
        let call = format!("setValue({}, {})", node.id(), js_str(value));
        self.call_on::<bool>(node, &call)?;
        Ok(())
    }

    fn click_body(&self) -> Result<()> {
        self.call::<bool>("clickBody()")?;
        Ok(())
    }

    fn scroll_to_bottom(&self) -> Result<()> {
        self.call::<bool>("scrollToBottom()")?;
        Ok(())
    }

    fn document_height(&self) -> Result<u64> {
        let reply = self.call::<f64>("documentHeight()")?;
        Ok(Self::required(reply.value, "documentHeight()")?.max(0.0) as u64)
    }
}
