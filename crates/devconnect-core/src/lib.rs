//! Core types and trait definitions for the devconnect profile service.
//!
//! This crate is deliberately free of HTTP and database dependencies.
//! All other crates depend on it; it depends on nothing proprietary.

pub mod error;
pub mod experience;
pub mod identity;
pub mod profile;
pub mod store;

pub use error::{Error, Result};
