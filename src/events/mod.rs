pub mod lifecycle;
pub mod pointer;

pub use lifecycle::{wire_lifecycle, Lifecycle};
pub use pointer::{wire_flame_clicks, wire_like_button, wire_tilt};
