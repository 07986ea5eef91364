//! In-memory host with a fake measurable layout, plus a harness that
//! delivers events only through listeners the window actually installed.

#![allow(dead_code)]

use std::cell::{Ref, RefCell, RefMut};
use std::collections::{BTreeMap, BTreeSet};
use std::rc::Rc;

use modal_core::{
    Control, EventOutcome, Host, HostError, Key, ListenTarget, Modal, ModalEvent, ModalOptions,
    PointerInput, Rect, Route, Size, TimerKind,
};

pub const VIEWPORT: Size = Size::new(1280.0, 800.0);
pub const DIALOG: Size = Size::new(640.0, 400.0);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct ListenerId(u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct TimerId(u64);

#[derive(Debug, Default)]
struct FakeNode {
    tag: String,
    attrs: BTreeMap<String, String>,
    classes: BTreeSet<String>,
    styles: BTreeMap<String, String>,
    text: String,
    markup: String,
    children: Vec<NodeId>,
    parent: Option<NodeId>,
}

#[derive(Debug)]
pub struct FakeDom {
    nodes: Vec<FakeNode>,
    document: NodeId,
    head: NodeId,
    body: NodeId,
    active: Option<NodeId>,
    listeners: BTreeMap<ListenerId, (ListenTarget<NodeId>, Route)>,
    timers: BTreeMap<TimerId, (u32, TimerKind)>,
    next_handle: u64,
    pub viewport: Size,
    pub dialog_size: Size,
    pub stylesheets: Vec<String>,
    pub captured_pointer: Option<i32>,
    pub fail_focus: bool,
    pub fail_release: bool,
}

impl FakeDom {
    fn new() -> Self {
        let mut dom = Self {
            nodes: Vec::new(),
            document: NodeId(0),
            head: NodeId(0),
            body: NodeId(0),
            active: None,
            listeners: BTreeMap::new(),
            timers: BTreeMap::new(),
            next_handle: 1,
            viewport: VIEWPORT,
            dialog_size: DIALOG,
            stylesheets: Vec::new(),
            captured_pointer: None,
            fail_focus: false,
            fail_release: false,
        };
        dom.document = dom.alloc("#document");
        dom.head = dom.alloc("head");
        dom.body = dom.alloc("body");
        let (document, head, body) = (dom.document, dom.head, dom.body);
        dom.attach(document, head);
        dom.attach(document, body);
        dom
    }

    pub fn body_id(&self) -> NodeId {
        self.body
    }

    fn alloc(&mut self, tag: &str) -> NodeId {
        self.nodes.push(FakeNode {
            tag: tag.to_string(),
            ..FakeNode::default()
        });
        NodeId(self.nodes.len() - 1)
    }

    fn node(&self, id: NodeId) -> &FakeNode {
        &self.nodes[id.0]
    }

    fn node_mut(&mut self, id: NodeId) -> &mut FakeNode {
        &mut self.nodes[id.0]
    }

    fn handle(&mut self) -> u64 {
        let handle = self.next_handle;
        self.next_handle += 1;
        handle
    }

    fn detach(&mut self, child: NodeId) {
        if let Some(parent) = self.node_mut(child).parent.take() {
            self.node_mut(parent).children.retain(|c| *c != child);
        }
    }

    fn attach(&mut self, parent: NodeId, child: NodeId) {
        self.detach(child);
        self.node_mut(parent).children.push(child);
        self.node_mut(child).parent = Some(parent);
    }

    fn is_attached(&self, node: NodeId) -> bool {
        self.contains(self.document, node)
    }

    fn contains(&self, ancestor: NodeId, node: NodeId) -> bool {
        let mut current = Some(node);
        while let Some(id) = current {
            if id == ancestor {
                return true;
            }
            current = self.node(id).parent;
        }
        false
    }

    fn is_focusable(&self, id: NodeId) -> bool {
        let node = self.node(id);
        if node.attrs.contains_key("disabled") {
            return false;
        }
        if let Some(tabindex) = node.attrs.get("tabindex") {
            return tabindex.parse::<i32>().is_ok_and(|t| t >= 0);
        }
        match node.tag.as_str() {
            "button" | "input" | "select" | "textarea" => true,
            "a" => node.attrs.contains_key("href"),
            _ => false,
        }
    }

    fn collect_focusable(&self, root: NodeId, out: &mut Vec<NodeId>) {
        for child in &self.node(root).children {
            if self.is_focusable(*child) {
                out.push(*child);
            }
            self.collect_focusable(*child, out);
        }
    }

    fn px(&self, id: NodeId, property: &str) -> f64 {
        self.node(id)
            .styles
            .get(property)
            .and_then(|v| v.trim_end_matches("px").parse().ok())
            .unwrap_or(0.0)
    }
}

/// [`Host`] over a [`FakeDom`]. Clones share the same tree.
#[derive(Debug, Clone)]
pub struct FakeHost {
    dom: Rc<RefCell<FakeDom>>,
}

impl FakeHost {
    pub fn new() -> Self {
        Self {
            dom: Rc::new(RefCell::new(FakeDom::new())),
        }
    }

    pub fn dom(&self) -> Ref<'_, FakeDom> {
        self.dom.borrow()
    }

    pub fn dom_mut(&self) -> RefMut<'_, FakeDom> {
        self.dom.borrow_mut()
    }

    /// Create an element and attach it under `parent`.
    pub fn element(&self, tag: &str, parent: NodeId) -> NodeId {
        let mut dom = self.dom.borrow_mut();
        let id = dom.alloc(tag);
        dom.attach(parent, id);
        id
    }

    pub fn create_detached(&self, tag: &str) -> NodeId {
        self.dom.borrow_mut().alloc(tag)
    }

    pub fn button_in_body(&self) -> NodeId {
        self.element("button", self.body())
    }

    pub fn remove(&self, node: NodeId) {
        self.dom.borrow_mut().detach(node);
    }

    pub fn set_active(&self, node: NodeId) {
        self.dom.borrow_mut().active = Some(node);
    }

    pub fn active(&self) -> Option<NodeId> {
        self.dom.borrow().active
    }

    pub fn has_class(&self, node: NodeId, class: &str) -> bool {
        self.dom.borrow().node(node).classes.contains(class)
    }

    pub fn attr(&self, node: NodeId, name: &str) -> Option<String> {
        self.dom.borrow().node(node).attrs.get(name).cloned()
    }

    pub fn style_of(&self, node: NodeId, property: &str) -> Option<String> {
        self.dom.borrow().node(node).styles.get(property).cloned()
    }

    pub fn text(&self, node: NodeId) -> String {
        self.dom.borrow().node(node).text.clone()
    }

    pub fn markup(&self, node: NodeId) -> String {
        self.dom.borrow().node(node).markup.clone()
    }

    pub fn children(&self, node: NodeId) -> Vec<NodeId> {
        self.dom.borrow().node(node).children.clone()
    }

    pub fn tag(&self, node: NodeId) -> String {
        self.dom.borrow().node(node).tag.clone()
    }

    pub fn attached(&self, node: NodeId) -> bool {
        self.dom.borrow().is_attached(node)
    }

    pub fn find_by_class(&self, class: &str) -> Vec<NodeId> {
        let dom = self.dom.borrow();
        (0..dom.nodes.len())
            .map(NodeId)
            .filter(|id| dom.node(*id).classes.contains(class))
            .collect()
    }

    pub fn listener_count(&self) -> usize {
        self.dom.borrow().listeners.len()
    }

    pub fn has_listener(&self, route: Route) -> bool {
        self.dom
            .borrow()
            .listeners
            .values()
            .any(|(_, r)| *r == route)
    }

    pub fn pending_timers(&self) -> Vec<TimerKind> {
        self.dom.borrow().timers.values().map(|(_, k)| *k).collect()
    }

    pub fn stylesheet_count(&self) -> usize {
        self.dom.borrow().stylesheets.len()
    }
}

impl Default for FakeHost {
    fn default() -> Self {
        Self::new()
    }
}

impl Host for FakeHost {
    type Node = NodeId;
    type Listener = ListenerId;
    type Timer = TimerId;

    fn create_element(&self, tag: &str) -> Result<NodeId, HostError> {
        if tag.is_empty() {
            return Err(HostError::ElementCreation {
                tag: tag.to_string(),
                reason: "empty tag".to_string(),
            });
        }
        Ok(self.dom.borrow_mut().alloc(tag))
    }

    fn body(&self) -> NodeId {
        self.dom.borrow().body
    }

    fn element_by_id(&self, id: &str) -> Option<NodeId> {
        let dom = self.dom.borrow();
        (0..dom.nodes.len()).map(NodeId).find(|node| {
            dom.node(*node).attrs.get("id").map(String::as_str) == Some(id)
                && dom.is_attached(*node)
        })
    }

    fn append(&self, parent: &NodeId, child: &NodeId) {
        self.dom.borrow_mut().attach(*parent, *child);
    }

    fn detach(&self, node: &NodeId) {
        self.dom.borrow_mut().detach(*node);
    }

    fn is_attached(&self, node: &NodeId) -> bool {
        self.dom.borrow().is_attached(*node)
    }

    fn contains(&self, ancestor: &NodeId, node: &NodeId) -> bool {
        self.dom.borrow().contains(*ancestor, *node)
    }

    fn set_attribute(&self, node: &NodeId, name: &str, value: &str) {
        self.dom
            .borrow_mut()
            .node_mut(*node)
            .attrs
            .insert(name.to_string(), value.to_string());
    }

    fn add_class(&self, node: &NodeId, class: &str) {
        self.dom
            .borrow_mut()
            .node_mut(*node)
            .classes
            .insert(class.to_string());
    }

    fn remove_class(&self, node: &NodeId, class: &str) {
        self.dom.borrow_mut().node_mut(*node).classes.remove(class);
    }

    fn set_text(&self, node: &NodeId, text: &str) {
        self.dom.borrow_mut().node_mut(*node).text = text.to_string();
    }

    fn set_markup(&self, node: &NodeId, markup: &str) {
        self.dom.borrow_mut().node_mut(*node).markup = markup.to_string();
    }

    fn set_style(&self, node: &NodeId, property: &str, value: Option<&str>) {
        let mut dom = self.dom.borrow_mut();
        let styles = &mut dom.node_mut(*node).styles;
        match value {
            Some(value) => {
                styles.insert(property.to_string(), value.to_string());
            }
            None => {
                styles.remove(property);
            }
        }
    }

    fn bounding_rect(&self, node: &NodeId) -> Rect {
        let dom = self.dom.borrow();
        let classes = &dom.node(*node).classes;
        if classes.contains("modal-overlay") {
            Rect::new(0.0, 0.0, dom.viewport.width, dom.viewport.height)
        } else if classes.contains("modal-dialog") {
            Rect::new(
                dom.px(*node, "left"),
                dom.px(*node, "top"),
                dom.dialog_size.width,
                dom.dialog_size.height,
            )
        } else {
            Rect::default()
        }
    }

    fn focusable_descendants(&self, root: &NodeId) -> Vec<NodeId> {
        let dom = self.dom.borrow();
        let mut out = Vec::new();
        if dom.is_attached(*root) {
            dom.collect_focusable(*root, &mut out);
        }
        out
    }

    fn active_element(&self) -> Option<NodeId> {
        let dom = self.dom.borrow();
        match dom.active {
            Some(active) if dom.is_attached(active) => Some(active),
            _ => Some(dom.body),
        }
    }

    fn focus(&self, node: &NodeId) -> Result<(), HostError> {
        let mut dom = self.dom.borrow_mut();
        if dom.fail_focus {
            return Err(HostError::Focus("focus disabled in test".to_string()));
        }
        if dom.is_attached(*node) {
            dom.active = Some(*node);
        }
        Ok(())
    }

    fn set_pointer_capture(&self, _node: &NodeId, pointer_id: i32) -> Result<(), HostError> {
        self.dom.borrow_mut().captured_pointer = Some(pointer_id);
        Ok(())
    }

    fn release_pointer_capture(&self, _node: &NodeId, _pointer_id: i32) -> Result<(), HostError> {
        let mut dom = self.dom.borrow_mut();
        if dom.fail_release {
            return Err(HostError::PointerCapture("already released".to_string()));
        }
        dom.captured_pointer = None;
        Ok(())
    }

    fn listen(&self, target: ListenTarget<NodeId>, route: Route) -> ListenerId {
        let mut dom = self.dom.borrow_mut();
        let id = ListenerId(dom.handle());
        dom.listeners.insert(id, (target, route));
        id
    }

    fn unlisten(&self, listener: ListenerId) {
        let removed = self.dom.borrow_mut().listeners.remove(&listener);
        assert!(removed.is_some(), "listener {listener:?} removed twice");
    }

    fn schedule(&self, delay_ms: u32, kind: TimerKind) -> TimerId {
        let mut dom = self.dom.borrow_mut();
        let id = TimerId(dom.handle());
        dom.timers.insert(id, (delay_ms, kind));
        id
    }

    fn clear_timer(&self, timer: TimerId) {
        let removed = self.dom.borrow_mut().timers.remove(&timer);
        assert!(removed.is_some(), "timer {timer:?} cleared twice");
    }

    fn inject_stylesheet(&self, css: &str) {
        let mut dom = self.dom.borrow_mut();
        let style = dom.alloc("style");
        let head = dom.head;
        dom.attach(head, style);
        dom.node_mut(style)
            .attrs
            .insert("data-modal-default-styles".to_string(), "true".to_string());
        dom.node_mut(style).text = css.to_string();
        dom.stylesheets.push(css.to_string());
    }
}

/// A window plus the host it renders into.
pub struct Harness {
    pub host: FakeHost,
    pub modal: Modal<FakeHost>,
}

impl Harness {
    pub fn new(options: ModalOptions<FakeHost>) -> Self {
        let host = FakeHost::new();
        let modal = Modal::new(host.clone(), options).expect("modal builds");
        Self { host, modal }
    }

    pub fn mac(title: &str) -> Self {
        Self::new(ModalOptions::new().title(title).mac())
    }

    pub fn dialog(&self) -> NodeId {
        self.modal.surface().dialog
    }

    pub fn overlay(&self) -> NodeId {
        self.modal.surface().overlay
    }

    pub fn header(&self) -> NodeId {
        self.modal.surface().header
    }

    pub fn control(&self, control: Control) -> NodeId {
        *self
            .modal
            .surface()
            .control(control)
            .expect("control rendered")
    }

    /// Open and let the initial-focus timer run.
    pub fn open_settled(&mut self) {
        self.modal.open();
        self.fire(TimerKind::InitialFocus);
    }

    fn deliver(&mut self, route: Route, event: ModalEvent<NodeId>) -> Option<EventOutcome> {
        if self.host.has_listener(route) {
            Some(self.modal.handle(event))
        } else {
            None
        }
    }

    pub fn press(&mut self, key: Key, shift: bool) -> Option<EventOutcome> {
        self.deliver(Route::Keyboard, ModalEvent::KeyDown { key, shift })
    }

    pub fn click_control(&mut self, control: Control) -> Option<EventOutcome> {
        self.deliver(Route::Control(control), ModalEvent::ControlClicked(control))
    }

    pub fn click_footer(&mut self, index: usize) -> Option<EventOutcome> {
        self.deliver(Route::Footer(index), ModalEvent::FooterClicked(index))
    }

    pub fn click_dock_item(&mut self) -> Option<EventOutcome> {
        self.deliver(Route::DockItem, ModalEvent::DockItemClicked)
    }

    pub fn overlay_pointer_down(&mut self, target: NodeId) -> Option<EventOutcome> {
        self.deliver(
            Route::OverlayPointerDown,
            ModalEvent::OverlayPointerDown {
                target: Some(target),
            },
        )
    }

    pub fn titlebar_pointer_down(
        &mut self,
        target: NodeId,
        x: f64,
        y: f64,
    ) -> Option<EventOutcome> {
        self.deliver(
            Route::TitlebarPointerDown,
            ModalEvent::TitlebarPointerDown(PointerInput {
                pointer_id: 1,
                x,
                y,
                target: Some(target),
            }),
        )
    }

    pub fn pointer_move(&mut self, x: f64, y: f64) -> Option<EventOutcome> {
        self.pointer_move_with(1, x, y)
    }

    pub fn pointer_move_with(&mut self, pointer_id: i32, x: f64, y: f64) -> Option<EventOutcome> {
        self.deliver(
            Route::DragMove,
            ModalEvent::PointerMove(PointerInput {
                pointer_id,
                x,
                y,
                target: None,
            }),
        )
    }

    pub fn pointer_up(&mut self) -> Option<EventOutcome> {
        self.deliver(Route::DragEnd, ModalEvent::PointerUp { pointer_id: 1 })
    }

    /// Fire the pending timer of `kind`, if one is scheduled.
    pub fn fire(&mut self, kind: TimerKind) -> bool {
        let pending = self
            .host
            .dom()
            .timers
            .iter()
            .find(|(_, (_, k))| *k == kind)
            .map(|(id, _)| *id);
        let Some(id) = pending else {
            return false;
        };

        let _ = self.modal.handle(ModalEvent::TimerElapsed(kind));
        // A host drops fired timers even when the window ignored them.
        self.host.dom_mut().timers.remove(&id);
        true
    }

    pub fn left_top(&self) -> (Option<String>, Option<String>) {
        (
            self.host.style_of(self.dialog(), "left"),
            self.host.style_of(self.dialog(), "top"),
        )
    }
}
