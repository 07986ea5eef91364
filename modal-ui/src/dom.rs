//! [`Host`] implementation over the browser DOM.

use std::cell::RefCell;
use std::fmt;
use std::rc::{Rc, Weak};

use dioxus_logger::tracing::{debug, warn};
use gloo_timers::callback::Timeout;
use modal_core::{
    EventOutcome, Host, HostError, Key, ListenTarget, ModalEvent, PointerInput, Rect, Route,
    TimerKind,
};
use wasm_bindgen::closure::Closure;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{Document, Element, Event, EventTarget, HtmlElement, KeyboardEvent, PointerEvent};

const FOCUSABLE: &str = "a[href], area[href], \
    input:not([disabled]):not([type=\"hidden\"]), select:not([disabled]), \
    textarea:not([disabled]), button:not([disabled]), iframe, object, embed, \
    [contenteditable], [tabindex]:not([tabindex^=\"-\"])";

const STYLESHEET_MARKER: &str = "data-modal-default-styles";

/// An element handle. Equality is DOM node identity.
#[derive(Debug, Clone)]
pub struct DomNode(pub Element);

impl PartialEq for DomNode {
    fn eq(&self, other: &Self) -> bool {
        self.0.is_same_node(Some(other.0.as_ref()))
    }
}

impl From<Element> for DomNode {
    fn from(element: Element) -> Self {
        Self(element)
    }
}

pub struct DomListener {
    target: EventTarget,
    event_type: &'static str,
    closure: Closure<dyn FnMut(Event)>,
}

impl fmt::Debug for DomListener {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DomListener")
            .field("event_type", &self.event_type)
            .finish_non_exhaustive()
    }
}

pub struct DomTimer(Timeout);

impl fmt::Debug for DomTimer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("DomTimer")
    }
}

/// Receives every event the host's listeners and timers produce.
pub type EventSink = Box<dyn FnMut(ModalEvent<DomNode>) -> EventOutcome>;

struct Shared {
    window: web_sys::Window,
    document: Document,
    body: Element,
    head: Element,
    sink: RefCell<Option<EventSink>>,
    // Closures removed while one of them may still be on the stack. Dropped
    // at the start of the next dispatch.
    retired_listeners: RefCell<Vec<Closure<dyn FnMut(Event)>>>,
    retired_timers: RefCell<Vec<Closure<dyn FnMut()>>>,
}

impl Shared {
    fn deliver(&self, event: ModalEvent<DomNode>) -> EventOutcome {
        let Ok(mut sink) = self.sink.try_borrow_mut() else {
            debug!("modal event dropped during dispatch: {:?}", event);
            return EventOutcome::Continue;
        };
        self.retired_listeners.borrow_mut().clear();
        self.retired_timers.borrow_mut().clear();

        match sink.as_mut() {
            Some(sink) => sink(event),
            None => EventOutcome::Continue,
        }
    }
}

/// Browser host for one window. Clones share the same event sink.
#[derive(Clone)]
pub struct DomHost {
    shared: Rc<Shared>,
}

impl fmt::Debug for DomHost {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DomHost")
            .field("has_sink", &self.shared.sink.borrow().is_some())
            .finish_non_exhaustive()
    }
}

impl DomHost {
    pub fn new() -> Result<Self, HostError> {
        let window = web_sys::window().ok_or(HostError::MissingGlobal("window"))?;
        let document = window
            .document()
            .ok_or(HostError::MissingGlobal("document"))?;
        let body: Element = document
            .body()
            .ok_or(HostError::MissingGlobal("document.body"))?
            .into();
        let head: Element = document
            .head()
            .ok_or(HostError::MissingGlobal("document.head"))?
            .into();

        Ok(Self {
            shared: Rc::new(Shared {
                window,
                document,
                body,
                head,
                sink: RefCell::new(None),
                retired_listeners: RefCell::new(Vec::new()),
                retired_timers: RefCell::new(Vec::new()),
            }),
        })
    }

    /// Route listener and timer events to `sink`, replacing any previous one.
    pub fn set_sink(&self, sink: EventSink) {
        match self.shared.sink.try_borrow_mut() {
            Ok(mut slot) => *slot = Some(sink),
            Err(_) => warn!("modal event sink replaced during dispatch; ignoring"),
        }
    }

    fn event_target(&self, target: ListenTarget<DomNode>) -> EventTarget {
        match target {
            ListenTarget::Document => self.shared.document.clone().into(),
            ListenTarget::Window => self.shared.window.clone().into(),
            ListenTarget::Node(node) => node.0.into(),
        }
    }

    fn html(node: &DomNode) -> Option<&HtmlElement> {
        node.0.dyn_ref::<HtmlElement>()
    }
}

fn describe(value: &JsValue) -> String {
    value
        .as_string()
        .or_else(|| {
            value
                .dyn_ref::<js_sys::Error>()
                .map(|e| String::from(e.message()))
        })
        .unwrap_or_else(|| format!("{value:?}"))
}

fn dom_error(context: &str, value: &JsValue) -> HostError {
    HostError::Dom(format!("{context}: {}", describe(value)))
}

fn event_element(event: &Event) -> Option<DomNode> {
    event
        .target()
        .and_then(|target| target.dyn_into::<Element>().ok())
        .map(DomNode)
}

fn pointer_input(event: &Event) -> Option<PointerInput<DomNode>> {
    let pointer = event.dyn_ref::<PointerEvent>()?;
    Some(PointerInput {
        pointer_id: pointer.pointer_id(),
        x: f64::from(pointer.client_x()),
        y: f64::from(pointer.client_y()),
        target: event_element(event),
    })
}

/// Translate a raw DOM event for the route it arrived on.
fn translate(route: Route, event: &Event) -> Option<ModalEvent<DomNode>> {
    let translated = match route {
        Route::Keyboard => {
            let keyboard = event.dyn_ref::<KeyboardEvent>()?;
            ModalEvent::KeyDown {
                key: Key::from_dom(&keyboard.key()),
                shift: keyboard.shift_key(),
            }
        }
        Route::OverlayPointerDown => ModalEvent::OverlayPointerDown {
            target: event_element(event),
        },
        Route::TitlebarPointerDown => ModalEvent::TitlebarPointerDown(pointer_input(event)?),
        Route::DragMove => ModalEvent::PointerMove(pointer_input(event)?),
        Route::DragEnd => ModalEvent::PointerUp {
            pointer_id: event.dyn_ref::<PointerEvent>()?.pointer_id(),
        },
        Route::Control(control) => ModalEvent::ControlClicked(control),
        Route::Footer(index) => ModalEvent::FooterClicked(index),
        Route::DockItem => ModalEvent::DockItemClicked,
    };
    Some(translated)
}

fn dispatch(shared: &Weak<Shared>, route: Route, event: Event) {
    let Some(shared) = shared.upgrade() else {
        return;
    };
    let Some(modal_event) = translate(route, &event) else {
        return;
    };
    if shared.deliver(modal_event) == EventOutcome::PreventDefault {
        event.prevent_default();
    }
}

impl Host for DomHost {
    type Node = DomNode;
    type Listener = DomListener;
    type Timer = DomTimer;

    fn create_element(&self, tag: &str) -> Result<DomNode, HostError> {
        self.shared
            .document
            .create_element(tag)
            .map(DomNode)
            .map_err(|e| HostError::ElementCreation {
                tag: tag.to_string(),
                reason: describe(&e),
            })
    }

    fn body(&self) -> DomNode {
        DomNode(self.shared.body.clone())
    }

    fn element_by_id(&self, id: &str) -> Option<DomNode> {
        self.shared.document.get_element_by_id(id).map(DomNode)
    }

    fn append(&self, parent: &DomNode, child: &DomNode) {
        if let Err(e) = parent.0.append_child(&child.0) {
            warn!("{}", dom_error("append_child", &e));
        }
    }

    fn detach(&self, node: &DomNode) {
        node.0.remove();
    }

    fn is_attached(&self, node: &DomNode) -> bool {
        node.0.is_connected()
    }

    fn contains(&self, ancestor: &DomNode, node: &DomNode) -> bool {
        ancestor.0.contains(Some(node.0.as_ref()))
    }

    fn set_attribute(&self, node: &DomNode, name: &str, value: &str) {
        let _ = node.0.set_attribute(name, value);
    }

    fn add_class(&self, node: &DomNode, class: &str) {
        let _ = node.0.class_list().add_1(class);
    }

    fn remove_class(&self, node: &DomNode, class: &str) {
        let _ = node.0.class_list().remove_1(class);
    }

    fn set_text(&self, node: &DomNode, text: &str) {
        node.0.set_text_content(Some(text));
    }

    fn set_markup(&self, node: &DomNode, markup: &str) {
        node.0.set_inner_html(markup);
    }

    fn set_style(&self, node: &DomNode, property: &str, value: Option<&str>) {
        let Some(element) = Self::html(node) else {
            return;
        };
        let style = element.style();
        let _ = match value {
            Some(value) => style.set_property(property, value),
            None => style.remove_property(property).map(|_| ()),
        };
    }

    fn bounding_rect(&self, node: &DomNode) -> Rect {
        let rect = node.0.get_bounding_client_rect();
        Rect::new(rect.left(), rect.top(), rect.width(), rect.height())
    }

    fn focusable_descendants(&self, root: &DomNode) -> Vec<DomNode> {
        let Ok(list) = root.0.query_selector_all(FOCUSABLE) else {
            return Vec::new();
        };
        (0..list.length())
            .filter_map(|i| list.get(i))
            .filter_map(|node| node.dyn_into::<HtmlElement>().ok())
            // Hidden elements have no offset parent.
            .filter(|element| element.offset_parent().is_some())
            .map(|element| DomNode(element.into()))
            .collect()
    }

    fn active_element(&self) -> Option<DomNode> {
        self.shared.document.active_element().map(DomNode)
    }

    fn focus(&self, node: &DomNode) -> Result<(), HostError> {
        let element =
            Self::html(node).ok_or_else(|| HostError::Focus("not an HTML element".to_string()))?;
        element.focus().map_err(|e| HostError::Focus(describe(&e)))
    }

    fn set_pointer_capture(&self, node: &DomNode, pointer_id: i32) -> Result<(), HostError> {
        node.0
            .set_pointer_capture(pointer_id)
            .map_err(|e| HostError::PointerCapture(describe(&e)))
    }

    fn release_pointer_capture(&self, node: &DomNode, pointer_id: i32) -> Result<(), HostError> {
        node.0
            .release_pointer_capture(pointer_id)
            .map_err(|e| HostError::PointerCapture(describe(&e)))
    }

    fn listen(&self, target: ListenTarget<DomNode>, route: Route) -> DomListener {
        let shared = Rc::downgrade(&self.shared);
        let closure = Closure::wrap(Box::new(move |event: Event| {
            dispatch(&shared, route, event);
        }) as Box<dyn FnMut(Event)>);

        let target = self.event_target(target);
        let event_type = route.event_type();
        if let Err(e) =
            target.add_event_listener_with_callback(event_type, closure.as_ref().unchecked_ref())
        {
            warn!("{}", dom_error(event_type, &e));
        }

        DomListener {
            target,
            event_type,
            closure,
        }
    }

    fn unlisten(&self, listener: DomListener) {
        let DomListener {
            target,
            event_type,
            closure,
        } = listener;
        let _ = target
            .remove_event_listener_with_callback(event_type, closure.as_ref().unchecked_ref());
        self.shared.retired_listeners.borrow_mut().push(closure);
    }

    fn schedule(&self, delay_ms: u32, kind: TimerKind) -> DomTimer {
        let shared = Rc::downgrade(&self.shared);
        DomTimer(Timeout::new(delay_ms, move || {
            if let Some(shared) = shared.upgrade() {
                let _ = shared.deliver(ModalEvent::TimerElapsed(kind));
            }
        }))
    }

    fn clear_timer(&self, timer: DomTimer) {
        let closure = timer.0.cancel();
        self.shared.retired_timers.borrow_mut().push(closure);
    }

    fn inject_stylesheet(&self, css: &str) {
        let document = &self.shared.document;
        match document.create_element("style") {
            Ok(style) => {
                let _ = style.set_attribute(STYLESHEET_MARKER, "true");
                style.set_text_content(Some(css));
                if let Err(e) = self.shared.head.append_child(&style) {
                    warn!("{}", dom_error("inject stylesheet", &e));
                }
            }
            Err(e) => warn!("{}", dom_error("create stylesheet", &e)),
        }
    }
}
