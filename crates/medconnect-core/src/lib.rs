//! medconnect-core
//!
//! Pure domain types and copilot endpoint conventions.
//! No HTTP dependency; this is the shared vocabulary of the MedConnect
//! assistant.

pub mod endpoints;
pub mod error;
pub mod models;
