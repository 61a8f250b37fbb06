//! # Periodica Application Library
//!
//! The CLI surface and export profiles of the Periodica binary, exposed
//! as a library so integration tests can drive commands directly.

pub mod cli;
pub mod config;
