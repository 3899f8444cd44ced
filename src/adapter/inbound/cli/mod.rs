//! Command-line adapter: argument parsing, handlers and terminal output.

pub mod command;
pub mod output;
pub mod reach;
pub mod route;
pub mod warm;
