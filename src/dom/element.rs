use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Snapshot of one live element, as read from the host page
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ElementInfo {
    /// HTML tag name, lowercase (e.g., "button", "tp-yt-paper-item")
    pub tag_name: String,

    /// Trimmed text content
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,

    /// The attributes the engine looks at (aria-label, aria-disabled, title, ...)
    #[serde(default)]
    pub attributes: HashMap<String, String>,

    /// Rendered box, `None` when the element has no layout
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bounding_box: Option<BoundingBox>,

    /// Computed visibility related style
    #[serde(default)]
    pub style: ComputedStyle,

    /// Whether the element takes part in layout (`offsetParent !== null`)
    #[serde(default)]
    pub has_offset_parent: bool,

    /// The `disabled` property of form controls
    #[serde(default)]
    pub disabled: bool,
}

/// Bounding box coordinates for an element
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct BoundingBox {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

/// The three computed style properties that can hide an element
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ComputedStyle {
    pub visibility: String,
    pub opacity: String,
    pub display: String,
}

impl Default for ComputedStyle {
    fn default() -> Self {
        Self {
            visibility: "visible".to_string(),
            opacity: "1".to_string(),
            display: "block".to_string(),
        }
    }
}

impl ComputedStyle {
    /// Style of an element with `display: none`
    pub fn hidden() -> Self {
        Self { display: "none".to_string(), ..Self::default() }
    }

    /// True when any of visibility, opacity or display hides the element
    pub fn is_hidden(&self) -> bool {
        self.visibility == "hidden" || self.opacity.trim() == "0" || self.display == "none"
    }
}

impl ElementInfo {
    /// Create a new ElementInfo
    pub fn new(tag_name: impl Into<String>) -> Self {
        Self {
            tag_name: tag_name.into(),
            text: None,
            attributes: HashMap::new(),
            bounding_box: None,
            style: ComputedStyle::default(),
            has_offset_parent: false,
            disabled: false,
        }
    }

    /// Builder method: set text content
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    /// Builder method: set attributes
    pub fn with_attributes(mut self, attributes: HashMap<String, String>) -> Self {
        self.attributes = attributes;
        self
    }

    /// Builder method: set bounding box
    pub fn with_bounding_box(mut self, x: f64, y: f64, width: f64, height: f64) -> Self {
        self.bounding_box = Some(BoundingBox { x, y, width, height });
        self
    }

    /// Builder method: set computed style
    pub fn with_style(mut self, style: ComputedStyle) -> Self {
        self.style = style;
        self
    }

    /// Builder method: set layout participation
    pub fn with_offset_parent(mut self, has_offset_parent: bool) -> Self {
        self.has_offset_parent = has_offset_parent;
        self
    }

    /// Builder method: set disabled property
    pub fn with_disabled(mut self, disabled: bool) -> Self {
        self.disabled = disabled;
        self
    }

    /// Add a single attribute
    pub fn add_attribute(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.attributes.insert(key.into(), value.into());
    }

    /// Get attribute value by key
    pub fn get_attribute(&self, key: &str) -> Option<&String> {
        self.attributes.get(key)
    }

    /// Check if element is a specific tag
    pub fn is_tag(&self, tag: &str) -> bool {
        self.tag_name.eq_ignore_ascii_case(tag)
    }

    /// Trimmed text, `None` if empty
    pub fn trimmed_text(&self) -> Option<&str> {
        self.text.as_deref().map(str::trim).filter(|t| !t.is_empty())
    }

    /// Non-empty attribute value, trimmed
    pub fn non_empty_attribute(&self, key: &str) -> Option<&str> {
        self.get_attribute(key).map(|v| v.trim()).filter(|v| !v.is_empty())
    }

    /// Has a non-zero rendered size
    pub fn has_size(&self) -> bool {
        self.bounding_box.is_some_and(|b| b.is_visible())
    }

    /// Rendered with a non-zero height and part of the layout.
    ///
    /// This is the check used for menu entries.
    pub fn is_rendered(&self) -> bool {
        self.has_offset_parent && self.bounding_box.is_some_and(|b| b.height > 0.0)
    }

    /// Non-zero box and not hidden by computed style.
    ///
    /// This is the geometric half of the dialog visibility check.
    pub fn is_displayed(&self) -> bool {
        self.has_size() && !self.style.is_hidden()
    }

    /// Disabled through the property or through `aria-disabled`
    pub fn is_disabled(&self) -> bool {
        if self.disabled {
            return true;
        }
        match self.get_attribute("aria-disabled") {
            Some(value) => value != "false",
            None => false,
        }
    }
}

impl BoundingBox {
    /// Create a new BoundingBox
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self { x, y, width, height }
    }

    /// Check if the bounding box is visible (has non-zero dimensions)
    pub fn is_visible(&self) -> bool {
        self.width > 0.0 && self.height > 0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_element_info_creation() {
        let mut attrs = HashMap::new();
        attrs.insert("aria-label".to_string(), "Create".to_string());

        let element = ElementInfo::new("button")
            .with_attributes(attrs)
            .with_text("  Create  ")
            .with_bounding_box(0.0, 0.0, 80.0, 36.0)
            .with_offset_parent(true);

        assert!(element.is_tag("BUTTON"));
        assert_eq!(element.trimmed_text(), Some("Create"));
        assert_eq!(element.non_empty_attribute("aria-label"), Some("Create"));
        assert!(element.is_rendered());
        assert!(element.is_displayed());
    }

    #[test]
    fn test_rendered_requires_layout_and_height() {
        let detached_layout = ElementInfo::new("tp-yt-paper-item").with_bounding_box(0.0, 0.0, 100.0, 20.0);
        assert!(!detached_layout.is_rendered());

        let flat = ElementInfo::new("tp-yt-paper-item")
            .with_bounding_box(0.0, 0.0, 100.0, 0.0)
            .with_offset_parent(true);
        assert!(!flat.is_rendered());
    }

    #[test]
    fn test_style_hides_element() {
        let base = ElementInfo::new("div").with_bounding_box(0.0, 0.0, 10.0, 10.0);
        assert!(base.is_displayed());

        let none = base.clone().with_style(ComputedStyle::hidden());
        assert!(!none.is_displayed());

        let transparent = base.clone().with_style(ComputedStyle { opacity: "0".into(), ..ComputedStyle::default() });
        assert!(!transparent.is_displayed());

        let invisible = base.with_style(ComputedStyle { visibility: "hidden".into(), ..ComputedStyle::default() });
        assert!(!invisible.is_displayed());
    }

    #[test]
    fn test_is_disabled() {
        let mut button = ElementInfo::new("button");
        assert!(!button.is_disabled());

        button.add_attribute("aria-disabled", "false");
        assert!(!button.is_disabled());

        button.add_attribute("aria-disabled", "true");
        assert!(button.is_disabled());

        let plain = ElementInfo::new("button").with_disabled(true);
        assert!(plain.is_disabled());
    }

    #[test]
    fn test_deserialize_from_page_json() {
        let json = r#"{
            "tag_name": "textarea",
            "text": "",
            "attributes": {"aria-label": "Title"},
            "bounding_box": {"x": 1.0, "y": 2.0, "width": 300.0, "height": 40.0},
            "style": {"visibility": "visible", "opacity": "1", "display": "block"},
            "has_offset_parent": true
        }"#;
        let info: ElementInfo = serde_json::from_str(json).unwrap();
        assert!(info.is_displayed());
        assert_eq!(info.trimmed_text(), None);
        assert!(!info.disabled);
    }

    #[test]
    fn test_bounding_box() {
        assert!(BoundingBox::new(10.0, 20.0, 100.0, 50.0).is_visible());
        assert!(!BoundingBox::new(0.0, 0.0, 0.0, 0.0).is_visible());
    }
}
