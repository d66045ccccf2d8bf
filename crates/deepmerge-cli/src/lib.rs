//! Library interface for the deepmerge CLI components

pub mod config;
pub mod input;
pub mod logging;
pub mod server;

pub use config::Config;
pub use server::{serve, Dispatcher};
