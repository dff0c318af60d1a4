//! Scripted in-memory host page for tests
//!
//! Nodes match selectors by exact string: a node "matches" a selector when the
//! selector was listed for it with [`FakeNode::matching`]. That is enough for
//! the engine, which only ever passes the constants from `selectors`.

use crate::dom::selectors as sel;
use crate::dom::{BoundingBox, ComputedStyle, ElementInfo, HostPage, NodeHandle};
use crate::error::{BulkError, Result};
use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;
use std::time::Duration;
use tokio::time::Instant;

#[derive(Clone)]
pub(crate) enum Effect {
    Show(usize),
    /// Show the node once the (paused) clock has advanced by the duration
    ShowAfter(usize, Duration),
    Hide(usize),
    Remove(usize),
    Enable(usize),
    Run(Rc<dyn Fn()>),
}

#[derive(Clone)]
pub(crate) struct FakeNode {
    tag: String,
    label: String,
    selectors: Vec<&'static str>,
    text: Option<String>,
    attributes: HashMap<String, String>,
    parent: Option<usize>,
    shown: bool,
    shown_at: Option<Instant>,
    present_from: u32,
    present_until: Option<u32>,
    removed: bool,
    disabled: bool,
    height: u64,
    value: String,
    on_click: Vec<Effect>,
    on_input: Vec<Effect>,
}

impl FakeNode {
    pub fn new(tag: &str) -> Self {
        Self {
            tag: tag.to_string(),
            label: tag.to_string(),
            selectors: Vec::new(),
            text: None,
            attributes: HashMap::new(),
            parent: None,
            shown: true,
            shown_at: None,
            present_from: 0,
            present_until: None,
            removed: false,
            disabled: false,
            height: 0,
            value: String::new(),
            on_click: Vec::new(),
            on_input: Vec::new(),
        }
    }

    pub fn matching(mut self, selector: &'static str) -> Self {
        self.selectors.push(selector);
        self
    }

    pub fn label(mut self, label: &str) -> Self {
        self.label = label.to_string();
        self
    }

    pub fn text(mut self, text: &str) -> Self {
        self.text = Some(text.to_string());
        self
    }

    pub fn attr(mut self, key: &str, value: &str) -> Self {
        self.attributes.insert(key.to_string(), value.to_string());
        self
    }

    pub fn child_of(mut self, parent: usize) -> Self {
        self.parent = Some(parent);
        self
    }

    pub fn hidden(mut self) -> Self {
        self.shown = false;
        self
    }

    pub fn present_from(mut self, scrolls: u32) -> Self {
        self.present_from = scrolls;
        self
    }

    pub fn present_until(mut self, scrolls: u32) -> Self {
        self.present_until = Some(scrolls);
        self
    }

    pub fn height(mut self, height: u64) -> Self {
        self.height = height;
        self
    }

    pub fn disabled(mut self) -> Self {
        self.disabled = true;
        self.attributes.insert("aria-disabled".to_string(), "true".to_string());
        self
    }
}

#[derive(Default)]
pub(crate) struct FakeDom {
    nodes: Vec<FakeNode>,
    scrolls: u32,
    base_height: u64,
    endless: bool,
    calls: Vec<String>,
}

impl FakeDom {
    pub fn add(&mut self, node: FakeNode) -> usize {
        self.nodes.push(node);
        self.nodes.len() - 1
    }

    pub fn on_click(&mut self, id: usize, effect: Effect) {
        self.nodes[id].on_click.push(effect);
    }

    pub fn on_input(&mut self, id: usize, effect: Effect) {
        self.nodes[id].on_input.push(effect);
    }

    /// Document keeps growing on every scroll, so it never stabilizes
    pub fn endless(&mut self) {
        self.endless = true;
    }

    fn present(&self, id: usize) -> bool {
        let node = &self.nodes[id];
        if node.removed || self.scrolls < node.present_from {
            return false;
        }
        if node.present_until.is_some_and(|until| self.scrolls >= until) {
            return false;
        }
        match node.parent {
            Some(parent) => self.present(parent),
            None => true,
        }
    }

    fn shown(&self, id: usize) -> bool {
        let node = &self.nodes[id];
        let own = node.shown || node.shown_at.is_some_and(|at| Instant::now() >= at);
        own && node.parent.is_none_or(|parent| self.shown(parent))
    }

    fn is_descendant(&self, id: usize, ancestor: usize) -> bool {
        let mut current = self.nodes[id].parent;
        while let Some(parent) = current {
            if parent == ancestor {
                return true;
            }
            current = self.nodes[parent].parent;
        }
        false
    }

    fn resolve(&self, handle: &NodeHandle) -> Result<usize> {
        let id = handle.id() as usize;
        if id < self.nodes.len() && self.present(id) {
            Ok(id)
        } else {
            Err(BulkError::DetachedHandle(handle.to_string()))
        }
    }

    fn apply(&mut self, effect: &Effect) -> Option<Rc<dyn Fn()>> {
        match effect {
            Effect::Show(id) => self.nodes[*id].shown = true,
            Effect::ShowAfter(id, delay) => self.nodes[*id].shown_at = Some(Instant::now() + *delay),
            Effect::Hide(id) => {
                self.nodes[*id].shown = false;
                self.nodes[*id].shown_at = None;
            }
            Effect::Remove(id) => self.nodes[*id].removed = true,
            Effect::Enable(id) => {
                self.nodes[*id].disabled = false;
                self.nodes[*id].attributes.insert("aria-disabled".to_string(), "false".to_string());
            }
            Effect::Run(f) => return Some(f.clone()),
        }
        None
    }
}

/// Cheap-to-clone handle over a shared [`FakeDom`]
#[derive(Clone)]
pub(crate) struct FakePage {
    dom: Rc<RefCell<FakeDom>>,
}

impl FakePage {
    pub fn new(dom: FakeDom) -> Self {
        Self { dom: Rc::new(RefCell::new(dom)) }
    }

    pub fn with_dom<T>(&self, f: impl FnOnce(&mut FakeDom) -> T) -> T {
        f(&mut self.dom.borrow_mut())
    }

    /// Every recorded call, in order (`query:<selector>`, `click:<label>`, ...)
    pub fn calls(&self) -> Vec<String> {
        self.dom.borrow().calls.clone()
    }

    pub fn clicks(&self) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter_map(|c| c.strip_prefix("click:").map(str::to_string))
            .collect()
    }

    pub fn queried(&self, selector: &str) -> bool {
        let needle = format!("query:{}", selector);
        self.calls().iter().any(|c| *c == needle)
    }

    pub fn scrolls(&self) -> u32 {
        self.dom.borrow().scrolls
    }

    pub fn value_of(&self, id: usize) -> String {
        self.dom.borrow().nodes[id].value.clone()
    }

    pub fn handle(id: usize) -> NodeHandle {
        NodeHandle::new(id as u64)
    }

    fn record(&self, call: String) {
        self.dom.borrow_mut().calls.push(call);
    }

    fn run_effects(&self, effects: Vec<Effect>) {
        let callbacks: Vec<_> = {
            let mut dom = self.dom.borrow_mut();
            effects.iter().filter_map(|e| dom.apply(e)).collect()
        };
        for callback in callbacks {
            callback();
        }
    }
}

impl HostPage for FakePage {
    fn query_all(&self, selector: &str) -> Result<Vec<NodeHandle>> {
        self.record(format!("query:{}", selector));
        let dom = self.dom.borrow();
        Ok((0..dom.nodes.len())
            .filter(|&id| dom.present(id) && dom.nodes[id].selectors.contains(&selector))
            .map(Self::handle)
            .collect())
    }

    fn query_within(&self, scope: &NodeHandle, selector: &str) -> Result<Vec<NodeHandle>> {
        self.record(format!("query:{}", selector));
        let dom = self.dom.borrow();
        let scope = dom.resolve(scope)?;
        Ok((0..dom.nodes.len())
            .filter(|&id| {
                dom.present(id) && dom.is_descendant(id, scope) && dom.nodes[id].selectors.contains(&selector)
            })
            .map(Self::handle)
            .collect())
    }

    fn closest(&self, node: &NodeHandle, selector: &str) -> Result<Option<NodeHandle>> {
        let dom = self.dom.borrow();
        let mut current = Some(dom.resolve(node)?);
        while let Some(id) = current {
            if dom.nodes[id].selectors.contains(&selector) {
                return Ok(Some(Self::handle(id)));
            }
            current = dom.nodes[id].parent;
        }
        Ok(None)
    }

    fn matches(&self, node: &NodeHandle, selector: &str) -> Result<bool> {
        let dom = self.dom.borrow();
        let id = dom.resolve(node)?;
        Ok(dom.nodes[id].selectors.contains(&selector))
    }

    fn inspect(&self, node: &NodeHandle) -> Result<ElementInfo> {
        let dom = self.dom.borrow();
        let id = dom.resolve(node)?;
        let fake = &dom.nodes[id];
        let shown = dom.shown(id);

        let mut info = ElementInfo::new(fake.tag.clone())
            .with_attributes(fake.attributes.clone())
            .with_offset_parent(shown)
            .with_disabled(fake.disabled);
        info.text = fake.text.clone();
        if shown {
            info.bounding_box = Some(BoundingBox::new(0.0, 0.0, 200.0, 24.0));
        } else {
            info.bounding_box = Some(BoundingBox::new(0.0, 0.0, 0.0, 0.0));
            info.style = ComputedStyle::hidden();
        }
        Ok(info)
    }

    fn is_attached(&self, node: &NodeHandle) -> bool {
        self.dom.borrow().resolve(node).is_ok()
    }

    fn click(&self, node: &NodeHandle) -> Result<()> {
        let (label, effects) = {
            let dom = self.dom.borrow();
            let id = dom.resolve(node)?;
            (dom.nodes[id].label.clone(), dom.nodes[id].on_click.clone())
        };
        self.record(format!("click:{}", label));
        self.run_effects(effects);
        Ok(())
    }

    fn set_value(&self, node: &NodeHandle, value: &str) -> Result<()> {
        let (label, effects) = {
            let mut dom = self.dom.borrow_mut();
            let id = dom.resolve(node)?;
            dom.nodes[id].value = value.to_string();
            let effects = if value.trim().is_empty() { Vec::new() } else { dom.nodes[id].on_input.clone() };
            (dom.nodes[id].label.clone(), effects)
        };
        self.record(format!("set_value:{}={}", label, value));
        self.run_effects(effects);
        Ok(())
    }

    fn click_body(&self) -> Result<()> {
        self.record("click_body".to_string());
        Ok(())
    }

    fn scroll_to_bottom(&self) -> Result<()> {
        let mut dom = self.dom.borrow_mut();
        dom.scrolls += 1;
        dom.calls.push("scroll".to_string());
        Ok(())
    }

    fn document_height(&self) -> Result<u64> {
        let dom = self.dom.borrow();
        let content: u64 = (0..dom.nodes.len()).filter(|&id| dom.present(id)).map(|id| dom.nodes[id].height).sum();
        let growth = if dom.endless { u64::from(dom.scrolls) * 500 } else { 0 };
        Ok(dom.base_height + content + growth)
    }
}

/// Node ids of the interesting parts of [`playlist_page`]
pub(crate) struct Fixture {
    pub page: FakePage,
    pub items: Vec<usize>,
    pub menu_buttons: Vec<usize>,
    pub add_to_queue: usize,
    pub save_to_playlist: usize,
    pub new_playlist: usize,
    pub name_input: usize,
    pub visibility_trigger: usize,
    pub dropdown: usize,
    pub public_option: usize,
    pub unlisted_option: usize,
    pub create_button: usize,
}

/// A playlist page with `count` items, a context menu, the save dialog, the
/// create dialog and the visibility dropdown, all wired to react to clicks
/// the way the real page does.
pub(crate) fn playlist_page(count: usize) -> Fixture {
    let mut dom = FakeDom { base_height: 800, ..FakeDom::default() };

    let list = dom.add(FakeNode::new("ytd-playlist-video-list-renderer"));
    let mut items = Vec::new();
    let mut menu_buttons = Vec::new();
    for i in 0..count {
        let item = dom.add(
            FakeNode::new("ytd-playlist-video-renderer")
                .label(&format!("item-{}", i))
                .matching(sel::ITEM_RENDERER)
                .child_of(list)
                .height(100),
        );
        dom.add(
            FakeNode::new("a")
                .matching(sel::ITEM_TITLE)
                .attr("aria-label", &format!("Video number {}", i))
                .text(&format!("Video number {}", i))
                .child_of(item),
        );
        dom.add(FakeNode::new("span").matching(sel::ITEM_DURATION).text(&format!("{}:0{}", i + 1, i % 10)).child_of(item));
        dom.add(FakeNode::new("span").matching(sel::ITEM_METADATA_SPAN).text("1.2K views").child_of(item));
        dom.add(
            FakeNode::new("span")
                .matching(sel::ITEM_METADATA_SPAN)
                .text(&format!("{} days ago", i + 1))
                .child_of(item),
        );
        let button = dom.add(
            FakeNode::new("button")
                .label(&format!("menu-{}", i))
                .matching(sel::ITEM_MENU_BUTTON)
                .child_of(item),
        );
        items.push(item);
        menu_buttons.push(button);
    }

    // A menu left over from an earlier popup: same label, never rendered
    let stale_popup = dom.add(FakeNode::new("ytd-menu-popup-renderer").hidden());
    let stale_entry = dom.add(
        FakeNode::new("tp-yt-paper-item")
            .label("stale-add-to-queue")
            .matching(sel::MENU_ENTRY)
            .matching(sel::MENU_ENTRY_CLICKABLE)
            .child_of(stale_popup),
    );
    dom.add(FakeNode::new("yt-formatted-string").matching(sel::MENU_ENTRY_TEXT).text(sel::ADD_TO_QUEUE_LABEL).child_of(stale_entry));

    let popup = dom.add(FakeNode::new("ytd-menu-popup-renderer").matching(sel::OPEN_MENU_POPUP));
    let menu_entry = |dom: &mut FakeDom, label: &str, text: &str| {
        let entry = dom.add(
            FakeNode::new("ytd-menu-service-item-renderer")
                .label(&format!("{}-renderer", label))
                .matching(sel::MENU_ENTRY)
                .child_of(popup)
                .hidden(),
        );
        let clickable = dom.add(
            FakeNode::new("tp-yt-paper-item")
                .label(label)
                .matching(sel::MENU_ENTRY_CLICKABLE)
                .child_of(entry),
        );
        dom.add(FakeNode::new("yt-formatted-string").matching(sel::MENU_ENTRY_TEXT).text(text).child_of(clickable));
        (entry, clickable)
    };
    let (queue_entry, add_to_queue) = menu_entry(&mut dom, "add-to-queue", sel::ADD_TO_QUEUE_LABEL);
    let (save_entry, save_to_playlist) = menu_entry(&mut dom, "save-to-playlist", sel::SAVE_TO_PLAYLIST_LABEL);

    // A closed template of the save dialog that still contains a rendered button
    let template = dom.add(FakeNode::new("ytd-add-to-playlist-renderer").attr("hidden", ""));
    dom.add(
        FakeNode::new("button")
            .label("template-new-playlist")
            .matching(sel::NEW_PLAYLIST_BUTTON.selector)
            .child_of(template),
    );

    let save_dialog = dom.add(FakeNode::new("ytd-add-to-playlist-renderer").matching(sel::OPEN_SAVE_DIALOG));
    let new_playlist = dom.add(
        FakeNode::new("button")
            .label("new-playlist")
            .matching(sel::NEW_PLAYLIST_BUTTON.selector)
            .child_of(save_dialog)
            .hidden(),
    );

    let create_dialog = dom.add(FakeNode::new("yt-create-playlist-dialog-view-model").matching(sel::OPEN_CREATE_DIALOG));
    let name_input = dom.add(
        FakeNode::new("textarea")
            .label("name-input")
            .matching(sel::PLAYLIST_NAME_INPUT.selector)
            .child_of(create_dialog)
            .hidden(),
    );
    let visibility_trigger = dom.add(
        FakeNode::new("div")
            .label("visibility-trigger")
            .matching(sel::VISIBILITY_TRIGGER.selector)
            .child_of(create_dialog)
            .hidden(),
    );
    let create_button = dom.add(
        FakeNode::new("button")
            .label("create")
            .matching(sel::CREATE_PLAYLIST_SUBMIT.selector)
            .child_of(create_dialog)
            .hidden()
            .disabled(),
    );

    let popup_container = dom.add(FakeNode::new("ytd-popup-container"));
    let dropdown = dom.add(
        FakeNode::new("tp-yt-iron-dropdown")
            .matching(sel::VISIBILITY_DROPDOWN)
            .matching(sel::OPEN_POPUP_DROPDOWN)
            .child_of(popup_container)
            .hidden(),
    );
    let option = |dom: &mut FakeDom, label: &str, text: &str| {
        let option = dom.add(
            FakeNode::new("yt-list-item-view-model")
                .label(label)
                .matching(sel::VISIBILITY_OPTION)
                .child_of(dropdown),
        );
        dom.add(FakeNode::new("span").matching(sel::VISIBILITY_OPTION_TEXT).text(text).child_of(option));
        option
    };
    let public_option = option(&mut dom, "public", "Public Anyone can search for and view");
    let unlisted_option = option(&mut dom, "unlisted", "Unlisted Anyone with the link can view");
    option(&mut dom, "private", "Private Only you can view");

    for &button in &menu_buttons {
        dom.on_click(button, Effect::Show(queue_entry));
        dom.on_click(button, Effect::Show(save_entry));
    }
    for entry in [add_to_queue, save_to_playlist] {
        dom.on_click(entry, Effect::Hide(queue_entry));
        dom.on_click(entry, Effect::Hide(save_entry));
    }
    dom.on_click(save_to_playlist, Effect::Show(new_playlist));
    dom.on_click(new_playlist, Effect::Hide(new_playlist));
    for field in [name_input, visibility_trigger, create_button] {
        dom.on_click(new_playlist, Effect::Show(field));
        dom.on_click(create_button, Effect::Hide(field));
    }
    dom.on_input(name_input, Effect::Enable(create_button));
    dom.on_click(visibility_trigger, Effect::Show(dropdown));
    for option in [public_option, unlisted_option] {
        dom.on_click(option, Effect::Hide(dropdown));
    }

    Fixture {
        page: FakePage::new(dom),
        items,
        menu_buttons,
        add_to_queue,
        save_to_playlist,
        new_playlist,
        name_input,
        visibility_trigger,
        dropdown,
        public_option,
        unlisted_option,
        create_button,
    }
}
