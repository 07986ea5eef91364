//! Construction options and the serde-backed configuration layer.

use std::fmt;

use serde::de::{DeserializeOwned, Deserializer};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::ModalResult;
use crate::host::Host;
use crate::window::Modal;

/// Window chrome variant.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChromeStyle {
    /// Plain header with a title and an optional close button.
    #[default]
    Default,
    /// Traffic-light title bar; draggable, minimizable, maximizable.
    Mac,
}

/// Dialog body content.
#[derive(Debug, Clone, PartialEq)]
pub enum Body<N> {
    /// Raw markup inserted as the content's inner HTML.
    Markup(String),
    /// A host node appended to the content element.
    Node(N),
}

impl<N> Default for Body<N> {
    fn default() -> Self {
        Self::Markup(String::new())
    }
}

/// Passed to footer callbacks alongside the window.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ActionEvent {
    pub index: usize,
    pub text: String,
}

pub type ActionCallback<H> = Box<dyn FnMut(&ActionEvent, &mut Modal<H>)>;

/// One footer button. Activating it only runs the callback; closing the
/// window, if wanted, is up to the callback.
pub struct FooterAction<H: Host> {
    pub text: String,
    pub class_name: String,
    pub on_click: Option<ActionCallback<H>>,
}

impl<H: Host> FooterAction<H> {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            class_name: String::new(),
            on_click: None,
        }
    }

    pub fn class_name(mut self, class_name: impl Into<String>) -> Self {
        self.class_name = class_name.into();
        self
    }

    pub fn on_click(mut self, callback: impl FnMut(&ActionEvent, &mut Modal<H>) + 'static) -> Self {
        self.on_click = Some(Box::new(callback));
        self
    }
}

impl<H: Host> fmt::Debug for FooterAction<H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FooterAction")
            .field("text", &self.text)
            .field("class_name", &self.class_name)
            .field("on_click", &self.on_click.is_some())
            .finish()
    }
}

/// Everything needed to build a [`Modal`].
pub struct ModalOptions<H: Host> {
    pub title: String,
    pub body: Body<H::Node>,
    pub closable: bool,
    pub footer: Option<Vec<FooterAction<H>>>,
    pub style: ChromeStyle,
}

impl<H: Host> Default for ModalOptions<H> {
    fn default() -> Self {
        Self {
            title: String::new(),
            body: Body::default(),
            closable: true,
            footer: None,
            style: ChromeStyle::Default,
        }
    }
}

impl<H: Host> fmt::Debug for ModalOptions<H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ModalOptions")
            .field("title", &self.title)
            .field("body", &self.body)
            .field("closable", &self.closable)
            .field("footer", &self.footer)
            .field("style", &self.style)
            .finish()
    }
}

impl<H: Host> ModalOptions<H> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Lift plain configuration into options. Footer buttons start without
    /// callbacks; attach them through `footer` afterwards.
    pub fn from_config(config: ModalConfig) -> Self {
        Self {
            title: config.title,
            body: Body::Markup(config.html),
            closable: config.closable,
            footer: config.footer.map(|items| {
                items
                    .into_iter()
                    .map(|item| FooterAction {
                        text: item.text.unwrap_or_default(),
                        class_name: item.class_name.unwrap_or_default(),
                        on_click: None,
                    })
                    .collect()
            }),
            style: config.style,
        }
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    pub fn markup(mut self, markup: impl Into<String>) -> Self {
        self.body = Body::Markup(markup.into());
        self
    }

    pub fn node(mut self, node: H::Node) -> Self {
        self.body = Body::Node(node);
        self
    }

    pub fn closable(mut self, closable: bool) -> Self {
        self.closable = closable;
        self
    }

    pub fn style(mut self, style: ChromeStyle) -> Self {
        self.style = style;
        self
    }

    pub fn mac(self) -> Self {
        self.style(ChromeStyle::Mac)
    }

    /// Append a footer button, creating the footer if needed.
    pub fn action(mut self, action: FooterAction<H>) -> Self {
        self.footer.get_or_insert_with(Vec::new).push(action);
        self
    }
}

/// Serializable part of [`ModalOptions`], as accepted from JSON or JS
/// objects. Malformed fields fall back to their defaults instead of
/// failing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ModalConfig {
    #[serde(deserialize_with = "lenient")]
    pub title: String,
    #[serde(deserialize_with = "lenient")]
    pub html: String,
    #[serde(deserialize_with = "truthy")]
    pub closable: bool,
    #[serde(deserialize_with = "footer_list")]
    pub footer: Option<Vec<FooterConfig>>,
    #[serde(deserialize_with = "lenient")]
    pub style: ChromeStyle,
}

impl Default for ModalConfig {
    fn default() -> Self {
        Self {
            title: String::new(),
            html: String::new(),
            closable: true,
            footer: None,
            style: ChromeStyle::Default,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct FooterConfig {
    #[serde(deserialize_with = "lenient")]
    pub text: Option<String>,
    #[serde(deserialize_with = "lenient")]
    pub class_name: Option<String>,
}

impl ModalConfig {
    pub fn from_json(json: &str) -> ModalResult<Self> {
        let value: Value = serde_json::from_str(json)?;
        Ok(Self::from_value(value))
    }

    /// Anything that is not an object yields the default configuration.
    pub fn from_value(value: Value) -> Self {
        if value.is_object() {
            serde_json::from_value(value).unwrap_or_default()
        } else {
            Self::default()
        }
    }
}

fn lenient<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned + Default,
{
    let value = Value::deserialize(deserializer)?;
    Ok(serde_json::from_value(value).unwrap_or_default())
}

/// JavaScript truthiness, so `closable: 0` or `closable: ""` disable closing.
fn truthy<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Null => false,
        Value::Bool(b) => b,
        Value::Number(n) => n.as_f64().is_some_and(|n| n != 0.0 && !n.is_nan()),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    })
}

fn footer_list<'de, D>(deserializer: D) -> Result<Option<Vec<FooterConfig>>, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::Array(items) => Ok(Some(
            items
                .into_iter()
                .map(|item| serde_json::from_value(item).unwrap_or_default())
                .collect(),
        )),
        _ => Ok(None),
    }
}
