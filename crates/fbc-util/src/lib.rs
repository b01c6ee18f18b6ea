//! Shared utilities for fbc-filter.
//!
//! This crate provides the cross-cutting concerns used by the other crates:
//! the unified error type, filesystem helpers for locating catalog files, and
//! stderr status lines.

pub mod errors;
pub mod fs;
pub mod progress;
