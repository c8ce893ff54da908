//! Collaborators with side effects: clock, logging, terminal setup, and the
//! outside world (relay, link opener, storage, introduction source).

pub mod intro;
pub mod log_dirs;
pub mod opener;
pub mod relay;
pub mod storage;
pub mod terminal_modes;
pub mod time_source;
pub mod tracing_setup;
