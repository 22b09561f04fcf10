// Crate root library declaration and module exports.
pub mod cli;
pub mod config;
pub mod context;
pub mod market;
pub mod model;
pub mod preferences;
pub mod storage;
pub mod typography;

#[cfg(feature = "tui")]
pub mod tui;
