//! Core data types for fbc-filter.
//!
//! This crate defines the in-memory catalog model (packages, channels,
//! bundles), semantic bundle versions, the on-disk declarative catalog
//! format that is rendered into and serialized back out of the model, and
//! the `FilterConfiguration` document that drives filtering.
//!
//! This crate is intentionally free of filtering logic; see `fbc-filter`.

pub mod declcfg;
pub mod filter_config;
pub mod model;
pub mod version;
