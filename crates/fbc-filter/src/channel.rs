//! Prune a channel's bundles to a version range while keeping one coherent
//! channel head.
//!
//! The retained span runs from the newest bundle on the replaces chain that
//! is, or skips directly to, something in range, down to the last bundle
//! that still leads into the range. Out-of-range bundles inside that span
//! are kept so the chain stays unbroken, and each one produces a warning.
//! In-range skip targets of retained bundles are kept even when they sit
//! off the main chain.

use std::collections::BTreeSet;

use fbc_core::model::Channel;

use crate::chain::BundleChain;
use crate::constraint::VersionConstraint;
use crate::error::FilterError;

/// Restrict `channel` to the bundles needed to cover `range`.
pub fn filter_bundles(
    channel: &mut Channel,
    range: &str,
    warn: &mut dyn FnMut(String),
) -> Result<(), FilterError> {
    let keep = retained_bundles(channel, range, warn)?;
    let before = channel.bundles.len();
    channel.bundles.retain(|name, _| keep.contains(name));
    tracing::debug!(
        "Channel {:?} of package {:?}: kept {} of {} bundles for range {:?}",
        channel.name,
        channel.package,
        channel.bundles.len(),
        before,
        range
    );
    Ok(())
}

/// Names of the bundles [`filter_bundles`] keeps, without mutating anything.
pub fn retained_bundles(
    channel: &Channel,
    range: &str,
    warn: &mut dyn FnMut(String),
) -> Result<BTreeSet<String>, FilterError> {
    let invalid = |source: FilterError| FilterError::InvalidChannel {
        package: channel.package.clone(),
        channel: channel.name.clone(),
        source: Box::new(source),
    };

    let chain = BundleChain::new(channel);
    let head = chain.head().map_err(invalid)?;
    let constraint = VersionConstraint::parse(range)?;
    let path = chain.replaces_chain(head).map_err(invalid)?;

    let mut keep = BTreeSet::new();
    let Some(start) = path.iter().position(|b| chain.hits_range(b, &constraint)) else {
        return Err(no_bundles(channel, &constraint));
    };

    let mut end = path.len();
    for (i, bundle) in path.iter().enumerate().skip(start) {
        if !chain
            .is_or_descends_into_range(bundle, &constraint)
            .map_err(invalid)?
        {
            end = i;
            break;
        }
    }
    tracing::debug!(
        "Channel {:?}: retained head {:?}, tail boundary {:?}",
        channel.name,
        path[start].name,
        path.get(end).map(|b| b.name.as_str())
    );

    for bundle in &path[start..end] {
        if !constraint.satisfies(&bundle.version) {
            warn(format!(
                "including bundle {:?} with version {:?} in channel {:?} for package {:?}: \
                 it falls outside the specified range of {:?} but is required to ensure \
                 inclusion of all bundles in the range",
                bundle.name,
                bundle.version.to_string(),
                channel.name,
                channel.package,
                constraint.as_str()
            ));
        }
        keep.insert(bundle.name.clone());
        for skip in chain.skip_targets(bundle) {
            if constraint.satisfies(&skip.version) {
                keep.insert(skip.name.clone());
            }
        }
    }

    if keep.is_empty() {
        return Err(no_bundles(channel, &constraint));
    }
    Ok(keep)
}

fn no_bundles(channel: &Channel, constraint: &VersionConstraint) -> FilterError {
    FilterError::NoBundlesInRange {
        package: channel.package.clone(),
        channel: channel.name.clone(),
        range: constraint.as_str().to_string(),
    }
}
