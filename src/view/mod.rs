//! View layer
//!
//! Stateless drawing functions; all state lives in `model` and `session`.

pub mod dock;
pub mod terminal;
pub mod theme;
pub mod wrap;
