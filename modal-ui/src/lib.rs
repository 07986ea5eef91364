pub mod demo;
pub mod dom;
pub mod handle;
pub mod js_api;

pub use demo::*;
pub use dom::*;
pub use handle::*;
pub use js_api::*;
