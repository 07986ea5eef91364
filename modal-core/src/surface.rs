//! Element tree of one window: overlay, dialog, chrome, body and footer.

use crate::error::HostError;
use crate::host::{Control, Host, ListenTarget, Route};
use crate::options::{Body, ChromeStyle, FooterAction};
use crate::window::ModalId;

/// Handles to the elements the state machine touches after construction.
#[derive(Debug, Clone)]
pub struct Surface<N> {
    pub overlay: N,
    pub dialog: N,
    /// Mac title bar or plain header; the drag handle for `mac` chrome.
    pub header: N,
    pub content: N,
    pub footer: Option<N>,
    pub controls: Vec<(Control, N)>,
    pub footer_buttons: Vec<N>,
}

impl<N: PartialEq> Surface<N> {
    pub fn control(&self, control: Control) -> Option<&N> {
        self.controls
            .iter()
            .find(|(kind, _)| *kind == control)
            .map(|(_, node)| node)
    }
}

/// Inputs for [`build`].
pub(crate) struct Blueprint<'a, H: Host> {
    pub id: ModalId,
    pub title: &'a str,
    pub body: Body<H::Node>,
    pub closable: bool,
    pub style: ChromeStyle,
    pub footer: Option<&'a [FooterAction<H>]>,
}

/// Create the detached element tree and wire the permanent click
/// listeners. The listeners live as long as the window.
pub(crate) fn build<H: Host>(
    host: &H,
    blueprint: Blueprint<'_, H>,
) -> Result<(Surface<H::Node>, Vec<H::Listener>), HostError> {
    let id = blueprint.id.to_string();
    let mut listeners = Vec::new();

    let overlay = host.create_element("div")?;
    host.add_class(&overlay, "modal-overlay");
    host.set_attribute(&overlay, "role", "presentation");
    host.set_attribute(&overlay, "data-modal-id", &id);

    let dialog = host.create_element("div")?;
    host.add_class(&dialog, "modal-dialog");
    host.set_attribute(&dialog, "role", "dialog");
    host.set_attribute(&dialog, "aria-modal", "true");
    host.set_attribute(&dialog, "aria-hidden", "true");
    host.set_attribute(&dialog, "tabindex", "-1");
    host.set_attribute(&dialog, "data-modal-id", &id);

    let (header, controls) = match blueprint.style {
        ChromeStyle::Mac => mac_titlebar(host, blueprint.title)?,
        ChromeStyle::Default => {
            plain_header(host, &dialog, &id, blueprint.title, blueprint.closable)?
        }
    };
    for (control, button) in &controls {
        listeners.push(host.listen(ListenTarget::Node(button.clone()), Route::Control(*control)));
    }
    host.append(&dialog, &header);

    let content = host.create_element("div")?;
    host.add_class(&content, "modal-content");
    match blueprint.body {
        Body::Markup(markup) => host.set_markup(&content, &markup),
        Body::Node(node) => host.append(&content, &node),
    }
    host.append(&dialog, &content);

    let mut footer_buttons = Vec::new();
    let footer = match blueprint.footer {
        Some(actions) => {
            let footer = host.create_element("div")?;
            host.add_class(&footer, "modal-footer");
            for (index, action) in actions.iter().enumerate() {
                let button = host.create_element("button")?;
                host.set_attribute(&button, "type", "button");
                host.add_class(&button, "btn");
                for class in action.class_name.split_whitespace() {
                    host.add_class(&button, class);
                }
                host.set_text(&button, action_label(&action.text));
                listeners.push(host.listen(
                    ListenTarget::Node(button.clone()),
                    Route::Footer(index),
                ));
                host.append(&footer, &button);
                footer_buttons.push(button);
            }
            host.append(&dialog, &footer);
            Some(footer)
        }
        None => None,
    };

    host.append(&overlay, &dialog);

    Ok((
        Surface {
            overlay,
            dialog,
            header,
            content,
            footer,
            controls,
            footer_buttons,
        },
        listeners,
    ))
}

pub(crate) fn action_label(text: &str) -> &str {
    if text.is_empty() {
        "Button"
    } else {
        text
    }
}

type Chrome<N> = (N, Vec<(Control, N)>);

fn mac_titlebar<H: Host>(host: &H, title: &str) -> Result<Chrome<H::Node>, HostError> {
    let titlebar = host.create_element("div")?;
    host.add_class(&titlebar, "mac-titlebar");
    host.set_attribute(&titlebar, "data-drag-handle", "true");

    let left = host.create_element("div")?;
    host.add_class(&left, "mac-left");

    let mut controls = Vec::with_capacity(3);
    for (control, color, label, tooltip) in [
        (Control::Close, "red", "Close window", "Close"),
        (Control::Minimize, "yellow", "Minimize window", "Minimize"),
        (Control::Maximize, "green", "Maximize or restore window", "Maximize/Restore"),
    ] {
        let button = host.create_element("button")?;
        host.set_attribute(&button, "type", "button");
        host.add_class(&button, "mac-btn");
        host.add_class(&button, color);
        host.set_attribute(&button, "aria-label", label);
        host.set_attribute(&button, "title", tooltip);
        host.append(&left, &button);
        controls.push((control, button));
    }

    let title_el = host.create_element("div")?;
    host.add_class(&title_el, "mac-title");
    host.set_text(&title_el, title);

    host.append(&titlebar, &left);
    host.append(&titlebar, &title_el);
    Ok((titlebar, controls))
}

fn plain_header<H: Host>(
    host: &H,
    dialog: &H::Node,
    id: &str,
    title: &str,
    closable: bool,
) -> Result<Chrome<H::Node>, HostError> {
    let header = host.create_element("div")?;
    host.add_class(&header, "modal-header");

    let title_id = format!("{id}-title");
    let title_el = host.create_element("h2")?;
    host.add_class(&title_el, "modal-title");
    host.set_attribute(&title_el, "id", &title_id);
    host.set_text(&title_el, title);
    host.set_attribute(dialog, "aria-labelledby", &title_id);
    host.append(&header, &title_el);

    let mut controls = Vec::new();
    if closable {
        let close = host.create_element("button")?;
        host.set_attribute(&close, "type", "button");
        host.add_class(&close, "modal-close");
        host.set_attribute(&close, "aria-label", "Close dialog");
        host.set_text(&close, "✕");
        host.append(&header, &close);
        controls.push((Control::Close, close));
    }

    Ok((header, controls))
}
