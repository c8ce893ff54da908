pub mod commands;
pub mod message_relay;
pub mod setname_persistence;
pub mod window;
