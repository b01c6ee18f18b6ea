//! Catalog pruning engine.
//!
//! Given a rendered [`fbc_core::model::Catalog`] and a
//! [`fbc_core::filter_config::FilterConfiguration`], drops unlisted
//! packages and channels, prunes each configured channel to a version
//! range, and keeps every channel's replaces chain anchored at a single
//! resolvable head even when that requires retaining out-of-range bundles.
//!
//! Everything here is synchronous and performs no I/O. Warnings are handed
//! to a caller-supplied sink in traversal order as they are detected.

pub mod catalog;
pub mod chain;
pub mod channel;
pub mod constraint;
pub mod error;
pub mod package;
pub mod validate;

pub use catalog::filter_catalog;
pub use chain::BundleChain;
pub use constraint::VersionConstraint;
pub use error::FilterError;
