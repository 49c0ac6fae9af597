//! core
//!
//! Shared infrastructure for the harness binary.
//!
//! # Modules
//!
//! - [`config`] - Configuration schema and loading

pub mod config;
