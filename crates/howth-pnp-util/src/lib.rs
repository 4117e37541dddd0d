#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

//! Shared utilities for howth-pnp.
//!
//! This crate provides pure helper functions with no logging/tracing dependencies.
//! Logging is left to the embedding bundler to keep this library lightweight.

pub mod fs;
pub mod path;
