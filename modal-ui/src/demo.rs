use std::collections::HashMap;

use dioxus::prelude::*;
use dioxus_logger::tracing::{info, warn};
use modal_core::{FooterAction, ModalOptions, ModalResult};
use serde_json::{json, Value};

use crate::dom::DomHost;
use crate::handle::ModalHandle;

const DEMO_STYLES: &str = r#"
.modal-demo { font-family: system-ui, sans-serif; padding: 2rem; display: flex; flex-direction: column; gap: 0.75rem; max-width: 420px; }
.modal-demo button { padding: 0.5rem 0.9rem; border-radius: 6px; border: 1px solid #cbd5e1; background: #f8fafc; cursor: pointer; text-align: left; }
.modal-demo .demo-result { color: #475569; font-size: 0.9rem; }
"#;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DemoWindow {
    Dialog,
    Settings,
    Terms,
}

impl DemoWindow {
    fn options(self) -> ModalOptions<DomHost> {
        match self {
            Self::Dialog => ModalOptions::new()
                .title("Welcome")
                .markup("<p>Press Escape, click the backdrop or pick a button.</p>")
                .action(
                    FooterAction::new("Cancel")
                        .class_name("btn-secondary")
                        .on_click(|_, modal| modal.close(None)),
                )
                .action(
                    FooterAction::new("OK")
                        .class_name("btn-primary")
                        .on_click(|event, modal| modal.close(Some(json!(event.text)))),
                ),
            Self::Settings => ModalOptions::new()
                .title("Settings")
                .mac()
                .markup(
                    "<p>Drag the title bar, minimize to the dock or maximize.</p>\
                     <label>Name <input type=\"text\" /></label>",
                )
                .action(
                    FooterAction::new("Done")
                        .class_name("btn-primary")
                        .on_click(|_, modal| modal.close(Some(json!({ "saved": true })))),
                ),
            Self::Terms => ModalOptions::new()
                .title("Terms of use")
                .closable(false)
                .markup("<p>This dialog ignores Escape.</p>")
                .action(
                    FooterAction::new("Accept")
                        .class_name("btn-primary")
                        .on_click(|_, modal| modal.close(Some(json!("accepted")))),
                ),
        }
    }

    fn label(self) -> &'static str {
        match self {
            Self::Dialog => "Default dialog",
            Self::Settings => "Mac window",
            Self::Terms => "Non-closable dialog",
        }
    }
}

fn describe_result(result: Option<&Value>) -> String {
    match result {
        None => "dismissed".to_string(),
        Some(value) => value.to_string(),
    }
}

fn build(kind: DemoWindow, mut last_result: Signal<String>) -> ModalResult<ModalHandle> {
    let handle = ModalHandle::new(kind.options())?;
    handle.on_closed(move |result| {
        let text = describe_result(result.as_ref());
        info!("{:?} closed: {}", kind, text);
        last_result.set(text);
    });
    Ok(handle)
}

/// Launchers for each window flavor plus the last close result.
#[component]
pub fn Demo() -> Element {
    let last_result = use_signal(|| "none yet".to_string());
    let mut windows = use_signal(HashMap::<DemoWindow, ModalHandle>::new);

    let mut show = move |kind: DemoWindow| {
        if let Some(handle) = windows.read().get(&kind) {
            handle.open();
            return;
        }
        match build(kind, last_result) {
            Ok(handle) => {
                handle.open();
                windows.write().insert(kind, handle);
            }
            Err(e) => warn!("Failed to build {:?} window: {}", kind, e),
        }
    };

    rsx! {
        style { {DEMO_STYLES} }
        div { class: "modal-demo",
            h1 { "Modal windows" }
            for kind in [DemoWindow::Dialog, DemoWindow::Settings, DemoWindow::Terms] {
                button {
                    key: "{kind:?}",
                    onclick: move |_| show(kind),
                    {kind.label()}
                }
            }
            p { class: "demo-result", "Last result: {last_result}" }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_describe_result() {
        assert_eq!(describe_result(None), "dismissed");
        assert_eq!(describe_result(Some(&json!("accepted"))), "\"accepted\"");
        assert_eq!(describe_result(Some(&json!({ "saved": true }))), "{\"saved\":true}");
    }
}
