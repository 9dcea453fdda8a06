//! medconnect-cli library root.
//!
//! Re-exports the binary's modules so integration tests can exercise
//! config handling and REPL parsing without a terminal.

pub mod config;
pub mod form_file;
pub mod session;
