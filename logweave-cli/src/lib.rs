//! logweave CLI library
//!
//! The binary in `main.rs` is a thin wrapper: argument parsing lives in [`cli`],
//! command handlers in [`commands`] and report rendering in [`output`].

pub mod cli;
pub mod commands;
pub mod error;
pub mod logging;
pub mod output;
