//! Platform abstraction layer
//!
//! Browser and native front ends translate their raw events into
//! [`InputEvent`]s; the session drains them once per animation frame.

pub mod input;

pub use input::{Action, InputEvent, InputQueue};
