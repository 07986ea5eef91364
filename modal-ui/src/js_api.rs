//! JavaScript surface: `new Modal(options)` for host pages.

use std::cell::OnceCell;
use std::rc::Rc;

use dioxus_logger::tracing::warn;
use js_sys::{Array, Function, Reflect, JSON};
use modal_core::{ActionEvent, Modal, ModalConfig, ModalOptions, WindowState};
use serde_json::Value;
use wasm_bindgen::prelude::*;
use web_sys::Element;

use crate::dom::{DomHost, DomNode};
use crate::handle::{ModalHandle, WeakModalHandle};

/// A window as seen from JavaScript.
#[wasm_bindgen(js_name = Modal)]
pub struct JsModal {
    handle: ModalHandle,
}

#[wasm_bindgen(js_class = Modal)]
impl JsModal {
    /// Accepts `{ title, html, closable, footer, style }`. `html` may be a
    /// markup string or a DOM element; footer entries may carry an
    /// `onClick(event, modal)` function.
    #[wasm_bindgen(constructor)]
    pub fn new(options: JsValue) -> Result<JsModal, JsValue> {
        let config = config_from_js(&options)?;
        let mut modal_options = ModalOptions::<DomHost>::from_config(config);

        let html_node = property(&options, "html").and_then(|v| v.dyn_into::<Element>().ok());
        if let Some(element) = html_node {
            modal_options = modal_options.node(DomNode::from(element));
        }

        let owner: Rc<OnceCell<WeakModalHandle>> = Rc::new(OnceCell::new());
        if let Some(footer) = modal_options.footer.as_mut() {
            let entries = property(&options, "footer")
                .filter(Array::is_array)
                .map(|value| value.unchecked_into::<Array>());
            for (index, action) in footer.iter_mut().enumerate() {
                let on_click = entries
                    .as_ref()
                    .map(|entries| entries.get(index as u32))
                    .and_then(|entry| property(&entry, "onClick"))
                    .and_then(|f| f.dyn_into::<Function>().ok());
                if let Some(function) = on_click {
                    let owner = Rc::clone(&owner);
                    action.on_click = Some(Box::new(
                        move |event: &ActionEvent, _modal: &mut Modal<DomHost>| {
                            call_action(&function, event, &owner);
                        },
                    ));
                }
            }
        }

        let handle = ModalHandle::new(modal_options).map_err(to_js_error)?;
        let _ = owner.set(handle.downgrade());
        Ok(JsModal { handle })
    }

    pub fn open(&self) {
        self.handle.open();
    }

    /// Close with an optional result passed to the `onClosed` observer.
    pub fn close(&self, result: JsValue) {
        self.handle.close(value_from_js(&result));
    }

    pub fn minimize(&self) {
        self.handle.minimize();
    }

    #[wasm_bindgen(js_name = toggleMaximize)]
    pub fn toggle_maximize(&self) {
        self.handle.toggle_maximize();
    }

    pub fn recenter(&self) {
        self.handle.recenter();
    }

    /// Register the close observer. Returns the window for chaining.
    #[wasm_bindgen(js_name = onClosed)]
    pub fn on_closed(&self, callback: Function) -> JsModal {
        self.handle.on_closed(move |result| {
            let arg = result.as_ref().map_or(JsValue::UNDEFINED, value_to_js);
            if let Err(e) = callback.call1(&JsValue::NULL, &arg) {
                warn!("onClosed callback threw: {:?}", e);
            }
        });
        JsModal {
            handle: self.handle.clone(),
        }
    }

    /// `"closed"`, `"open"` or `"minimized"`.
    #[wasm_bindgen(getter)]
    pub fn state(&self) -> String {
        state_name(self.handle.state()).to_string()
    }
}

impl JsModal {
    pub fn handle(&self) -> &ModalHandle {
        &self.handle
    }
}

fn property(target: &JsValue, key: &str) -> Option<JsValue> {
    if !target.is_object() {
        return None;
    }
    Reflect::get(target, &JsValue::from_str(key))
        .ok()
        .filter(|value| !value.is_undefined() && !value.is_null())
}

fn config_from_js(options: &JsValue) -> Result<ModalConfig, JsValue> {
    if !options.is_object() {
        return Ok(ModalConfig::default());
    }
    let json = match JSON::stringify(options) {
        Ok(json) => json.as_string().unwrap_or_default(),
        Err(e) => {
            warn!("modal options are not serializable, using defaults: {:?}", e);
            return Ok(ModalConfig::default());
        }
    };
    ModalConfig::from_json(&json).map_err(to_js_error)
}

fn call_action(function: &Function, event: &ActionEvent, owner: &OnceCell<WeakModalHandle>) {
    let payload = serde_json::to_value(event)
        .map(|value| value_to_js(&value))
        .unwrap_or(JsValue::UNDEFINED);
    let modal = owner
        .get()
        .and_then(WeakModalHandle::upgrade)
        .map_or(JsValue::UNDEFINED, |handle| JsModal { handle }.into());

    if let Err(e) = function.call2(&JsValue::NULL, &payload, &modal) {
        warn!("footer onClick threw: {:?}", e);
    }
}

/// `undefined` means "no result"; anything else goes through JSON.
fn value_from_js(value: &JsValue) -> Option<Value> {
    if value.is_undefined() {
        return None;
    }
    let json = JSON::stringify(value).ok()?.as_string()?;
    match serde_json::from_str(&json) {
        Ok(value) => Some(value),
        Err(e) => {
            warn!("close result is not JSON-compatible: {}", e);
            None
        }
    }
}

fn value_to_js(value: &Value) -> JsValue {
    JSON::parse(&value.to_string()).unwrap_or(JsValue::UNDEFINED)
}

fn to_js_error(error: impl std::fmt::Display) -> JsValue {
    js_sys::Error::new(&error.to_string()).into()
}

pub(crate) fn state_name(state: WindowState) -> &'static str {
    match state {
        WindowState::Closed => "closed",
        WindowState::Open => "open",
        WindowState::Minimized => "minimized",
    }
}
