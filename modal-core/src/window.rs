//! The window state machine.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

use serde_json::Value;

use crate::dock;
use crate::error::ModalResult;
use crate::focus::{trap_tab, TabDirection, TrapAction};
use crate::geometry::{centered, DragOrigin, Point, Position};
use crate::host::{
    Control, EventOutcome, Host, Key, ListenTarget, ModalEvent, PointerInput, Route, TimerKind,
};
use crate::options::{ActionEvent, ChromeStyle, FooterAction, ModalOptions};
use crate::styles;
use crate::surface::{self, action_label, Blueprint, Surface};

const INITIAL_FOCUS_DELAY_MS: u32 = 10;
const MINIMIZE_FADE_MS: u32 = 200;

const BODY_OPEN_CLASS: &str = "modal-open";
const DRAGGING_CLASS: &str = "dragging";
const FADED_CLASS: &str = "hidden";
const MAXIMIZED_CLASS: &str = "mac-maximized";
const MAXIMIZED_WRAPPER_CLASS: &str = "mac-maximized-wrapper";

static NEXT_ID: AtomicU64 = AtomicU64::new(1);

/// Process-unique, monotonically increasing window id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ModalId(u64);

impl ModalId {
    fn next() -> Self {
        Self(NEXT_ID.fetch_add(1, Ordering::Relaxed))
    }

    pub const fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for ModalId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "modal-{}", self.0)
    }
}

/// Lifecycle state. Maximize is tracked separately.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum WindowState {
    #[default]
    Closed,
    Open,
    Minimized,
}

pub type CloseCallback = Box<dyn FnMut(Option<Value>)>;

struct DragSession<H: Host> {
    pointer_id: i32,
    origin: DragOrigin,
    move_listener: H::Listener,
    up_listener: H::Listener,
}

/// Listeners that exist only while the window is open.
struct OpenListeners<H: Host> {
    keyboard: H::Listener,
    overlay: H::Listener,
    drag_handle: Option<H::Listener>,
}

struct DockEntry<H: Host> {
    item: H::Node,
    listener: H::Listener,
}

/// A modal window with optional Mac-style chrome.
///
/// Built detached and `Closed`. Host input reaches it through
/// [`Modal::handle`]; host application code drives it with
/// [`open`](Modal::open), [`close`](Modal::close),
/// [`minimize`](Modal::minimize) and
/// [`toggle_maximize`](Modal::toggle_maximize).
pub struct Modal<H: Host> {
    id: ModalId,
    host: H,
    title: String,
    closable: bool,
    style: ChromeStyle,
    footer: Vec<FooterAction<H>>,
    surface: Surface<H::Node>,
    permanent_listeners: Vec<H::Listener>,

    state: WindowState,
    maximized: bool,
    position: Option<Position>,
    open_listeners: Option<OpenListeners<H>>,
    drag: Option<DragSession<H>>,
    dock_entry: Option<DockEntry<H>>,
    previously_focused: Option<H::Node>,
    on_close: Option<CloseCallback>,

    pending_focus: Option<(H::Timer, H::Node)>,
    pending_detach: Option<H::Timer>,
}

impl<H: Host> Modal<H> {
    pub fn new(host: H, options: ModalOptions<H>) -> ModalResult<Self> {
        styles::ensure_installed(&host);

        let id = ModalId::next();
        let ModalOptions {
            title,
            body,
            closable,
            footer,
            style,
        } = options;

        let (surface, permanent_listeners) = surface::build(
            &host,
            Blueprint {
                id,
                title: &title,
                body,
                closable,
                style,
                footer: footer.as_deref(),
            },
        )?;
        log::debug!("{id} built with {style:?} chrome");

        Ok(Self {
            id,
            host,
            title,
            closable,
            style,
            footer: footer.unwrap_or_default(),
            surface,
            permanent_listeners,
            state: WindowState::Closed,
            maximized: false,
            position: None,
            open_listeners: None,
            drag: None,
            dock_entry: None,
            previously_focused: None,
            on_close: None,
            pending_focus: None,
            pending_detach: None,
        })
    }

    pub fn id(&self) -> ModalId {
        self.id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn closable(&self) -> bool {
        self.closable
    }

    pub fn style(&self) -> ChromeStyle {
        self.style
    }

    pub fn state(&self) -> WindowState {
        self.state
    }

    pub fn is_open(&self) -> bool {
        self.state == WindowState::Open
    }

    pub fn is_minimized(&self) -> bool {
        self.state == WindowState::Minimized
    }

    pub fn is_maximized(&self) -> bool {
        self.maximized
    }

    pub fn is_dragging(&self) -> bool {
        self.drag.is_some()
    }

    /// Last position recorded by a drag, if any.
    pub fn position(&self) -> Option<Position> {
        self.position
    }

    pub fn surface(&self) -> &Surface<H::Node> {
        &self.surface
    }

    pub fn dock_item(&self) -> Option<&H::Node> {
        self.dock_entry.as_ref().map(|entry| &entry.item)
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    /// Register the close observer, replacing any previous one.
    pub fn on_closed(&mut self, callback: impl FnMut(Option<Value>) + 'static) -> &mut Self {
        self.on_close = Some(Box::new(callback));
        self
    }

    pub fn open(&mut self) {
        match self.state {
            WindowState::Open => return,
            WindowState::Closed => self.previously_focused = self.host.active_element(),
            WindowState::Minimized => self.leave_dock(),
        }

        let body = self.host.body();
        self.host.append(&body, &self.surface.overlay);
        self.host.add_class(&body, BODY_OPEN_CLASS);
        self.host
            .set_attribute(&self.surface.dialog, "aria-hidden", "false");
        self.state = WindowState::Open;

        self.install_open_listeners();
        self.place_dialog();
        self.schedule_initial_focus();
        log::debug!("{} opened", self.id);
    }

    pub fn close(&mut self, result: Option<Value>) {
        if self.state != WindowState::Open {
            return;
        }

        self.cancel_initial_focus();
        self.remove_open_listeners();

        let body = self.host.body();
        self.host.detach(&self.surface.overlay);
        self.host.remove_class(&body, BODY_OPEN_CLASS);
        self.host
            .set_attribute(&self.surface.dialog, "aria-hidden", "true");
        self.state = WindowState::Closed;

        if let Some(previous) = self.previously_focused.take() {
            if self.host.is_attached(&previous) {
                if let Err(e) = self.host.focus(&previous) {
                    log::debug!("{}: focus restore failed: {e}", self.id);
                }
            }
        }

        log::debug!("{} closed", self.id);
        if let Some(callback) = self.on_close.as_mut() {
            callback(result);
        }
    }

    pub fn minimize(&mut self) {
        if self.state != WindowState::Open {
            return;
        }

        let item = match dock::ensure_dock(&self.host)
            .and_then(|container| {
                let item = dock::build_dock_item(&self.host, &self.title)?;
                Ok((container, item))
            }) {
            Ok((container, item)) => {
                self.host.append(&container, &item);
                item
            }
            Err(e) => {
                log::warn!("{}: cannot minimize: {e}", self.id);
                return;
            }
        };

        self.cancel_initial_focus();
        self.remove_open_listeners();

        let listener = self
            .host
            .listen(ListenTarget::Node(item.clone()), Route::DockItem);
        self.dock_entry = Some(DockEntry { item, listener });

        self.host.add_class(&self.surface.overlay, FADED_CLASS);
        self.pending_detach = Some(
            self.host
                .schedule(MINIMIZE_FADE_MS, TimerKind::DetachMinimized),
        );
        self.state = WindowState::Minimized;
        log::debug!("{} minimized", self.id);
    }

    pub fn toggle_maximize(&mut self) {
        self.maximized = !self.maximized;
        if self.maximized {
            self.end_drag(None);
        }

        let dialog = &self.surface.dialog;
        let overlay = &self.surface.overlay;
        if self.maximized {
            self.host.add_class(overlay, MAXIMIZED_WRAPPER_CLASS);
            self.host.add_class(dialog, MAXIMIZED_CLASS);
            self.host.set_style(dialog, "left", None);
            self.host.set_style(dialog, "top", None);
            self.host.set_style(dialog, "position", Some("relative"));
        } else {
            self.host.remove_class(overlay, MAXIMIZED_WRAPPER_CLASS);
            self.host.remove_class(dialog, MAXIMIZED_CLASS);
            self.host.set_style(dialog, "position", Some("absolute"));
            if let Some(position) = self.position {
                self.apply_position(position);
            }
        }
        log::debug!("{} maximized={}", self.id, self.maximized);
    }

    /// Forget any dragged position and center the dialog again.
    pub fn recenter(&mut self) {
        self.position = None;
        if self.maximized {
            return;
        }

        let overlay = &self.surface.overlay;
        let attached = self.host.is_attached(overlay);
        if !attached {
            self.host.set_style(overlay, "visibility", Some("hidden"));
            self.host.append(&self.host.body(), overlay);
        }

        self.apply_position(self.centered_position());

        if !attached {
            self.host.detach(overlay);
            self.host.set_style(overlay, "visibility", None);
        }
    }

    /// Route one host event into the state machine.
    pub fn handle(&mut self, event: ModalEvent<H::Node>) -> EventOutcome {
        match event {
            ModalEvent::KeyDown { key, shift } => return self.on_key_down(&key, shift),
            ModalEvent::OverlayPointerDown { target } => {
                if self.is_open() && target.as_ref() == Some(&self.surface.overlay) {
                    self.close(None);
                }
            }
            ModalEvent::TitlebarPointerDown(input) => self.begin_drag(input),
            ModalEvent::PointerMove(input) => self.drag_to(&input),
            ModalEvent::PointerUp { pointer_id } => self.end_drag(Some(pointer_id)),
            ModalEvent::ControlClicked(control) => match control {
                Control::Close => self.close(None),
                Control::Minimize => self.minimize(),
                Control::Maximize => self.toggle_maximize(),
            },
            ModalEvent::FooterClicked(index) => self.run_action(index),
            ModalEvent::DockItemClicked => {
                if self.is_minimized() {
                    self.open();
                }
            }
            ModalEvent::TimerElapsed(kind) => self.on_timer(kind),
        }
        EventOutcome::Continue
    }

    fn on_key_down(&mut self, key: &Key, shift: bool) -> EventOutcome {
        if !self.is_open() {
            return EventOutcome::Continue;
        }

        match key {
            Key::Escape => {
                if self.closable {
                    self.close(None);
                }
                EventOutcome::Continue
            }
            Key::Tab => self.maintain_focus(TabDirection::from_shift(shift)),
            Key::Other(_) => EventOutcome::Continue,
        }
    }

    fn maintain_focus(&mut self, direction: TabDirection) -> EventOutcome {
        let dialog = &self.surface.dialog;
        let focusables = self.host.focusable_descendants(dialog);
        let active = self.host.active_element();
        let inside = active
            .as_ref()
            .is_some_and(|node| self.host.contains(dialog, node));

        match trap_tab(&focusables, active.as_ref(), inside, direction) {
            TrapAction::PassThrough => EventOutcome::Continue,
            TrapAction::Hold => EventOutcome::PreventDefault,
            TrapAction::FocusAndHold(node) => {
                if let Err(e) = self.host.focus(&node) {
                    log::debug!("{}: focus trap could not move focus: {e}", self.id);
                }
                EventOutcome::PreventDefault
            }
        }
    }

    fn run_action(&mut self, index: usize) {
        let Some(action) = self.footer.get_mut(index) else {
            return;
        };
        let event = ActionEvent {
            index,
            text: action_label(&action.text).to_string(),
        };
        let Some(mut callback) = action.on_click.take() else {
            return;
        };

        callback(&event, self);

        if let Some(action) = self.footer.get_mut(index) {
            action.on_click.get_or_insert(callback);
        }
    }

    fn on_timer(&mut self, kind: TimerKind) {
        match kind {
            TimerKind::InitialFocus => {
                let Some((timer, target)) = self.pending_focus.take() else {
                    return;
                };
                self.host.clear_timer(timer);
                if self.is_open() {
                    if let Err(e) = self.host.focus(&target) {
                        log::debug!("{}: initial focus failed: {e}", self.id);
                    }
                }
            }
            TimerKind::DetachMinimized => {
                let Some(timer) = self.pending_detach.take() else {
                    return;
                };
                self.host.clear_timer(timer);
                if self.is_minimized() {
                    self.finish_minimize();
                }
            }
        }
    }

    fn finish_minimize(&mut self) {
        let body = self.host.body();
        self.host.detach(&self.surface.overlay);
        self.host.remove_class(&body, BODY_OPEN_CLASS);
        self.host
            .set_attribute(&self.surface.dialog, "aria-hidden", "true");
        if let Err(e) = self.host.focus(&body) {
            log::debug!("{}: could not return focus to body: {e}", self.id);
        }
    }

    /// Undo the minimized presentation before reopening.
    fn leave_dock(&mut self) {
        if let Some(timer) = self.pending_detach.take() {
            self.host.clear_timer(timer);
        }
        if let Some(entry) = self.dock_entry.take() {
            self.host.detach(&entry.item);
            self.host.unlisten(entry.listener);
        }
        self.host.remove_class(&self.surface.overlay, FADED_CLASS);
    }

    fn install_open_listeners(&mut self) {
        let keyboard = self.host.listen(ListenTarget::Document, Route::Keyboard);
        let overlay = self.host.listen(
            ListenTarget::Node(self.surface.overlay.clone()),
            Route::OverlayPointerDown,
        );
        let drag_handle = (self.style == ChromeStyle::Mac).then(|| {
            self.host.listen(
                ListenTarget::Node(self.surface.header.clone()),
                Route::TitlebarPointerDown,
            )
        });

        self.open_listeners = Some(OpenListeners {
            keyboard,
            overlay,
            drag_handle,
        });
    }

    fn remove_open_listeners(&mut self) {
        self.end_drag(None);
        if let Some(listeners) = self.open_listeners.take() {
            self.host.unlisten(listeners.keyboard);
            self.host.unlisten(listeners.overlay);
            if let Some(drag_handle) = listeners.drag_handle {
                self.host.unlisten(drag_handle);
            }
        }
    }

    fn schedule_initial_focus(&mut self) {
        self.cancel_initial_focus();
        let dialog = &self.surface.dialog;
        let target = self
            .host
            .focusable_descendants(dialog)
            .into_iter()
            .next()
            .unwrap_or_else(|| dialog.clone());
        let timer = self
            .host
            .schedule(INITIAL_FOCUS_DELAY_MS, TimerKind::InitialFocus);
        self.pending_focus = Some((timer, target));
    }

    fn cancel_initial_focus(&mut self) {
        if let Some((timer, _)) = self.pending_focus.take() {
            self.host.clear_timer(timer);
        }
    }

    fn place_dialog(&mut self) {
        if self.maximized {
            return;
        }
        let position = self.position.unwrap_or_else(|| self.centered_position());
        self.apply_position(position);
    }

    fn centered_position(&self) -> Position {
        let container = self.host.bounding_rect(&self.surface.overlay).size();
        let dialog = self.host.bounding_rect(&self.surface.dialog).size();
        centered(container, dialog)
    }

    fn apply_position(&self, position: Position) {
        let dialog = &self.surface.dialog;
        self.host.set_style(dialog, "position", Some("absolute"));
        self.host
            .set_style(dialog, "left", Some(&format!("{}px", position.left)));
        self.host
            .set_style(dialog, "top", Some(&format!("{}px", position.top)));
    }

    fn begin_drag(&mut self, input: PointerInput<H::Node>) {
        if !self.is_open()
            || self.style != ChromeStyle::Mac
            || self.maximized
            || self.drag.is_some()
        {
            return;
        }

        let on_control = input.target.as_ref().is_some_and(|target| {
            self.surface
                .controls
                .iter()
                .any(|(_, button)| self.host.contains(button, target))
        });
        if on_control {
            return;
        }

        let dialog = &self.surface.dialog;
        let overlay_rect = self.host.bounding_rect(&self.surface.overlay);
        let dialog_rect = self.host.bounding_rect(dialog);
        let origin = DragOrigin {
            pointer: Point::new(input.x, input.y),
            dialog: dialog_rect.offset_within(&overlay_rect),
            container: overlay_rect.size(),
            dialog_size: dialog_rect.size(),
        };

        self.host.add_class(dialog, DRAGGING_CLASS);
        if let Err(e) = self.host.set_pointer_capture(dialog, input.pointer_id) {
            log::debug!("{}: pointer capture failed: {e}", self.id);
        }

        let move_listener = self.host.listen(ListenTarget::Window, Route::DragMove);
        let up_listener = self.host.listen(ListenTarget::Window, Route::DragEnd);
        self.drag = Some(DragSession {
            pointer_id: input.pointer_id,
            origin,
            move_listener,
            up_listener,
        });
    }

    fn drag_to(&mut self, input: &PointerInput<H::Node>) {
        let Some(session) = &self.drag else {
            return;
        };
        if session.pointer_id != input.pointer_id {
            return;
        }

        let position = session.origin.position_for(Point::new(input.x, input.y));
        self.apply_position(position);
        self.position = Some(position);
    }

    /// End the drag session. `None` ends it regardless of pointer.
    fn end_drag(&mut self, pointer_id: Option<i32>) {
        if let (Some(session), Some(pointer_id)) = (&self.drag, pointer_id) {
            if session.pointer_id != pointer_id {
                return;
            }
        }
        let Some(session) = self.drag.take() else {
            return;
        };

        let dialog = &self.surface.dialog;
        if let Err(e) = self
            .host
            .release_pointer_capture(dialog, session.pointer_id)
        {
            log::debug!("{}: pointer release failed: {e}", self.id);
        }
        self.host.unlisten(session.move_listener);
        self.host.unlisten(session.up_listener);
        self.host.remove_class(dialog, DRAGGING_CLASS);
    }
}

impl<H: Host> Drop for Modal<H> {
    fn drop(&mut self) {
        self.cancel_initial_focus();
        if let Some(timer) = self.pending_detach.take() {
            self.host.clear_timer(timer);
        }
        self.remove_open_listeners();
        if let Some(entry) = self.dock_entry.take() {
            self.host.detach(&entry.item);
            self.host.unlisten(entry.listener);
        }
        for listener in self.permanent_listeners.drain(..) {
            self.host.unlisten(listener);
        }
        if self.state != WindowState::Closed {
            self.host.detach(&self.surface.overlay);
            self.host.remove_class(&self.host.body(), BODY_OPEN_CLASS);
        }
    }
}

impl<H: Host> fmt::Debug for Modal<H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Modal")
            .field("id", &self.id)
            .field("title", &self.title)
            .field("style", &self.style)
            .field("state", &self.state)
            .field("maximized", &self.maximized)
            .field("position", &self.position)
            .field("dragging", &self.drag.is_some())
            .finish_non_exhaustive()
    }
}
