//! # domains
//!
//! Entities, the shared error type and the port traits of the PropertyHub
//! listing store. Nothing in this crate touches storage or the clock
//! directly; services receive those through the ports.

pub mod error;
pub mod models;
pub mod ports;

// Re-exporting for easier access in other crates
pub use error::*;
pub use models::*;
pub use ports::*;
