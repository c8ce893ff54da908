//! Pure state: transcript, window lifecycle, animations and intro playback.
//!
//! Nothing in this module reads a clock or touches the terminal; callers pass
//! the current instant and viewport in.

pub mod animation;
pub mod playback;
pub mod transcript;
pub mod window;
