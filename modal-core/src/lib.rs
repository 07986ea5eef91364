//! Modal windows with optional Mac-style chrome
//!
//! The state machine, placement math and focus trap live here and talk to
//! the rendering surface only through the [`Host`] trait:
//! - `modal-ui` implements it over the browser DOM
//! - the tests implement it over an in-memory tree with a fake layout

pub mod dock;
pub mod error;
pub mod focus;
pub mod geometry;
pub mod host;
pub mod options;
pub mod styles;
pub mod surface;
pub mod window;

pub use error::{HostError, ModalError, ModalResult};
pub use geometry::{Point, Position, Rect, Size, EDGE_PADDING};
pub use host::{
    Control, EventOutcome, Host, Key, ListenTarget, ModalEvent, PointerInput, Route, TimerKind,
};
pub use options::{
    ActionCallback, ActionEvent, Body, ChromeStyle, FooterAction, FooterConfig, ModalConfig,
    ModalOptions,
};
pub use surface::Surface;
pub use window::{CloseCallback, Modal, ModalId, WindowState};
