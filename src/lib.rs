// termfolio library - exposes all core modules for the binary and tests

pub mod app;
pub mod background;
pub mod command;
pub mod config;
pub mod config_io;
pub mod model;
pub mod services;
pub mod session;
pub mod view;
