//! CLI library components for the `sharc` tool.

pub mod cli;
pub mod commands;
pub mod logging;
pub mod summary;
