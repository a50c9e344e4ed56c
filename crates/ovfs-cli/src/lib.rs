//! ovfs CLI library.
//!
//! Exposes the command implementations, formatters, and mount loading used
//! by the `ovfs` binary so they can be tested without spawning a process.

pub mod cli;
pub mod commands;
pub mod formatters;
pub mod loader;
