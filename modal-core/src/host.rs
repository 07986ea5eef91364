//! Capability interface between the window state machine and a rendering
//! surface.
//!
//! A [`Host`] owns the element tree, layout measurement, keyboard focus,
//! event listeners and timers. The browser binding implements it over the
//! DOM; tests implement it over an in-memory tree with a fake layout.

use std::fmt;

use crate::error::HostError;
use crate::geometry::Rect;

/// Window control buttons rendered in the chrome.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Control {
    Close,
    Minimize,
    Maximize,
}

/// Where a listener is installed.
#[derive(Debug, Clone, PartialEq)]
pub enum ListenTarget<N> {
    Document,
    Window,
    Node(N),
}

/// Which window behavior a listener feeds.
///
/// The host maps each route to a concrete event type and translates the
/// raw event into the matching [`ModalEvent`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Route {
    /// `keydown` on the document.
    Keyboard,
    /// Pointer pressed somewhere on the overlay.
    OverlayPointerDown,
    /// Pointer pressed inside the title bar.
    TitlebarPointerDown,
    /// Pointer moved during a drag.
    DragMove,
    /// Pointer released during a drag.
    DragEnd,
    /// Click on a chrome control.
    Control(Control),
    /// Click on the footer button at this index.
    Footer(usize),
    /// Click on the window's dock icon.
    DockItem,
}

impl Route {
    /// DOM event type the route listens for.
    pub const fn event_type(&self) -> &'static str {
        match self {
            Self::Keyboard => "keydown",
            Self::OverlayPointerDown => "mousedown",
            Self::TitlebarPointerDown => "pointerdown",
            Self::DragMove => "pointermove",
            Self::DragEnd => "pointerup",
            Self::Control(_) | Self::Footer(_) | Self::DockItem => "click",
        }
    }
}

/// Deferred work a window can schedule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TimerKind {
    /// Move focus into the dialog once layout has settled.
    InitialFocus,
    /// Detach a minimized window after its fade-out.
    DetachMinimized,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Key {
    Escape,
    Tab,
    Other(String),
}

impl Key {
    /// Parse a DOM `KeyboardEvent.key` value.
    pub fn from_dom(key: &str) -> Self {
        match key {
            "Escape" | "Esc" => Self::Escape,
            "Tab" => Self::Tab,
            other => Self::Other(other.to_string()),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PointerInput<N> {
    pub pointer_id: i32,
    pub x: f64,
    pub y: f64,
    pub target: Option<N>,
}

/// Input delivered to [`Modal::handle`](crate::Modal::handle).
#[derive(Debug, Clone, PartialEq)]
pub enum ModalEvent<N> {
    KeyDown { key: Key, shift: bool },
    OverlayPointerDown { target: Option<N> },
    TitlebarPointerDown(PointerInput<N>),
    PointerMove(PointerInput<N>),
    PointerUp { pointer_id: i32 },
    ControlClicked(Control),
    FooterClicked(usize),
    DockItemClicked,
    TimerElapsed(TimerKind),
}

/// Whether the host should cancel the browser's default action.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[must_use]
pub enum EventOutcome {
    #[default]
    Continue,
    PreventDefault,
}

/// Rendering surface capabilities used by [`Modal`](crate::Modal).
///
/// All methods take `&self`; hosts are expected to use interior
/// mutability, matching how DOM handles behave.
pub trait Host {
    /// Handle to an element. Equality means "same element".
    type Node: Clone + PartialEq + fmt::Debug;
    /// Installed listener; handing it back to [`Host::unlisten`] removes it.
    type Listener: fmt::Debug;
    /// Scheduled callback; handing it back to [`Host::clear_timer`] cancels it.
    type Timer: fmt::Debug;

    fn create_element(&self, tag: &str) -> Result<Self::Node, HostError>;
    fn body(&self) -> Self::Node;
    fn element_by_id(&self, id: &str) -> Option<Self::Node>;

    /// Append `child` to `parent`, moving it if already attached elsewhere.
    fn append(&self, parent: &Self::Node, child: &Self::Node);
    /// Remove `node` from its parent, if any.
    fn detach(&self, node: &Self::Node);
    /// Whether `node` is connected to the document.
    fn is_attached(&self, node: &Self::Node) -> bool;
    /// Inclusive containment: a node contains itself.
    fn contains(&self, ancestor: &Self::Node, node: &Self::Node) -> bool;

    fn set_attribute(&self, node: &Self::Node, name: &str, value: &str);
    fn add_class(&self, node: &Self::Node, class: &str);
    fn remove_class(&self, node: &Self::Node, class: &str);
    fn set_text(&self, node: &Self::Node, text: &str);
    fn set_markup(&self, node: &Self::Node, markup: &str);
    /// Set an inline style property; `None` clears it.
    fn set_style(&self, node: &Self::Node, property: &str, value: Option<&str>);

    fn bounding_rect(&self, node: &Self::Node) -> Rect;
    /// Visible, enabled, tabbable descendants of `root` in document order.
    fn focusable_descendants(&self, root: &Self::Node) -> Vec<Self::Node>;
    fn active_element(&self) -> Option<Self::Node>;
    fn focus(&self, node: &Self::Node) -> Result<(), HostError>;

    fn set_pointer_capture(&self, node: &Self::Node, pointer_id: i32) -> Result<(), HostError>;
    fn release_pointer_capture(&self, node: &Self::Node, pointer_id: i32) -> Result<(), HostError>;

    fn listen(&self, target: ListenTarget<Self::Node>, route: Route) -> Self::Listener;
    fn unlisten(&self, listener: Self::Listener);

    /// Deliver [`ModalEvent::TimerElapsed`] after `delay_ms`.
    fn schedule(&self, delay_ms: u32, kind: TimerKind) -> Self::Timer;
    /// Cancel a pending timer or release a fired one.
    fn clear_timer(&self, timer: Self::Timer);

    fn inject_stylesheet(&self, css: &str);
}
