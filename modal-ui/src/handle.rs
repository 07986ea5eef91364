//! Shared ownership of a browser window.

use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::{Rc, Weak};

use dioxus_logger::tracing::{debug, warn};
use modal_core::{EventOutcome, Modal, ModalId, ModalOptions, ModalResult, WindowState};
use serde_json::Value;
use wasm_bindgen_futures::spawn_local;

use crate::dom::DomHost;

struct Inner {
    modal: RefCell<Modal<DomHost>>,
    // Last state seen outside a dispatch; read while the window is busy.
    state: Cell<WindowState>,
}

impl Inner {
    fn sync(&self, modal: &Modal<DomHost>) {
        self.state.set(modal.state());
    }
}

/// Cloneable handle to a [`Modal`] wired to its own [`DomHost`].
///
/// Methods called while the window is handling an event (for example from
/// a footer callback) are queued on a microtask instead of re-entering it.
#[derive(Clone)]
pub struct ModalHandle {
    inner: Rc<Inner>,
}

impl fmt::Debug for ModalHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.inner.modal.try_borrow() {
            Ok(modal) => fmt::Debug::fmt(&*modal, f),
            Err(_) => f.write_str("ModalHandle(<busy>)"),
        }
    }
}

/// Non-owning counterpart of [`ModalHandle`].
#[derive(Clone)]
pub struct WeakModalHandle {
    inner: Weak<Inner>,
}

impl WeakModalHandle {
    pub fn upgrade(&self) -> Option<ModalHandle> {
        self.inner.upgrade().map(|inner| ModalHandle { inner })
    }
}

impl ModalHandle {
    pub fn new(options: ModalOptions<DomHost>) -> ModalResult<Self> {
        Self::with_host(DomHost::new()?, options)
    }

    pub fn with_host(host: DomHost, options: ModalOptions<DomHost>) -> ModalResult<Self> {
        let modal = Modal::new(host.clone(), options)?;
        let inner = Rc::new(Inner {
            state: Cell::new(modal.state()),
            modal: RefCell::new(modal),
        });

        let weak = Rc::downgrade(&inner);
        host.set_sink(Box::new(move |event| {
            let Some(inner) = weak.upgrade() else {
                return EventOutcome::Continue;
            };
            let Ok(mut modal) = inner.modal.try_borrow_mut() else {
                debug!("window busy, dropping {:?}", event);
                return EventOutcome::Continue;
            };
            let outcome = modal.handle(event);
            inner.sync(&modal);
            outcome
        }));

        Ok(Self { inner })
    }

    pub fn downgrade(&self) -> WeakModalHandle {
        WeakModalHandle {
            inner: Rc::downgrade(&self.inner),
        }
    }

    /// Run `f` against the window now, or on a microtask if it is busy.
    pub fn with(&self, f: impl FnOnce(&mut Modal<DomHost>) + 'static) {
        if let Ok(mut modal) = self.inner.modal.try_borrow_mut() {
            f(&mut modal);
            self.inner.sync(&modal);
            return;
        }

        let inner = Rc::clone(&self.inner);
        spawn_local(async move {
            match inner.modal.try_borrow_mut() {
                Ok(mut modal) => {
                    f(&mut modal);
                    inner.sync(&modal);
                }
                Err(_) => warn!("window still busy; deferred call dropped"),
            };
        });
    }

    pub fn open(&self) {
        self.with(Modal::open);
    }

    pub fn close(&self, result: Option<Value>) {
        self.with(move |modal| modal.close(result));
    }

    pub fn minimize(&self) {
        self.with(Modal::minimize);
    }

    pub fn toggle_maximize(&self) {
        self.with(Modal::toggle_maximize);
    }

    pub fn recenter(&self) {
        self.with(Modal::recenter);
    }

    pub fn on_closed(&self, callback: impl FnMut(Option<Value>) + 'static) {
        self.with(move |modal| {
            modal.on_closed(callback);
        });
    }

    pub fn state(&self) -> WindowState {
        match self.inner.modal.try_borrow() {
            Ok(modal) => modal.state(),
            Err(_) => self.inner.state.get(),
        }
    }

    pub fn is_maximized(&self) -> Option<bool> {
        self.inner
            .modal
            .try_borrow()
            .ok()
            .map(|modal| modal.is_maximized())
    }

    pub fn id(&self) -> Option<ModalId> {
        self.inner.modal.try_borrow().ok().map(|modal| modal.id())
    }
}
