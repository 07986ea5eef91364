//! Shared dock that holds the icons of minimized windows.

use crate::error::HostError;
use crate::host::Host;

/// Element id of the process-wide dock container.
pub const DOCK_ID: &str = "modal-dock";

const LABEL_MAX_CHARS: usize = 12;
const LABEL_KEEP_CHARS: usize = 10;

/// Single uppercase letter shown on the icon badge.
pub fn badge_letter(title: &str) -> String {
    match title.trim().chars().next() {
        Some(first) => first.to_uppercase().collect(),
        None => "•".to_string(),
    }
}

/// Caption under the badge; long titles are cut to ten characters.
pub fn dock_label(title: &str) -> String {
    if title.chars().count() > LABEL_MAX_CHARS {
        let head: String = title.chars().take(LABEL_KEEP_CHARS).collect();
        format!("{head}…")
    } else {
        title.to_string()
    }
}

pub fn dock_tooltip(title: &str) -> &str {
    if title.is_empty() {
        "Window"
    } else {
        title
    }
}

/// Find the dock container, creating it on first use.
pub fn ensure_dock<H: Host>(host: &H) -> Result<H::Node, HostError> {
    if let Some(dock) = host.element_by_id(DOCK_ID) {
        return Ok(dock);
    }

    let dock = host.create_element("div")?;
    host.set_attribute(&dock, "id", DOCK_ID);
    host.append(&host.body(), &dock);
    log::debug!("created shared dock container #{DOCK_ID}");
    Ok(dock)
}

/// Build the (detached) icon for a minimized window.
pub fn build_dock_item<H: Host>(host: &H, title: &str) -> Result<H::Node, HostError> {
    let item = host.create_element("div")?;
    host.add_class(&item, "modal-dock-item");
    host.set_attribute(&item, "title", dock_tooltip(title));
    host.set_attribute(&item, "role", "button");

    let badge = host.create_element("div")?;
    host.add_class(&badge, "modal-dock-icon");
    host.set_text(&badge, &badge_letter(title));

    let label = host.create_element("div")?;
    host.add_class(&label, "modal-dock-label");
    host.set_text(&label, &dock_label(title));

    host.append(&item, &badge);
    host.append(&item, &label);
    Ok(item)
}
