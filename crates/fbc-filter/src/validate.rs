//! Structural validation of a (filtered) catalog.

use std::collections::HashMap;

use fbc_core::model::{Catalog, Channel, Package};
use petgraph::algo::is_cyclic_directed;
use petgraph::graph::DiGraph;

use crate::chain::BundleChain;
use crate::error::FilterError;

/// Check every package and channel, reporting all problems at once.
///
/// A bundle whose `replaces` names something outside its channel is fine:
/// the oldest retained bundle of a pruned channel still points at its
/// dropped predecessor.
pub fn validate_catalog(catalog: &Catalog) -> Result<(), FilterError> {
    let mut problems = Vec::new();
    for (key, package) in &catalog.packages {
        validate_package(key, package, &mut problems);
    }
    if problems.is_empty() {
        Ok(())
    } else {
        Err(FilterError::InvalidResultingCatalog { problems })
    }
}

fn validate_package(key: &str, package: &Package, problems: &mut Vec<String>) {
    if package.name.is_empty() {
        problems.push(format!("package under key {key:?} has no name"));
    } else if package.name != key {
        problems.push(format!(
            "package {:?} is stored under key {key:?}",
            package.name
        ));
    }
    if package.channels.is_empty() {
        problems.push(format!("package {:?} has no channels", package.name));
    } else if !package.has_channel(&package.default_channel) {
        problems.push(format!(
            "package {:?} default channel {:?} not found",
            package.name, package.default_channel
        ));
    }
    for (channel_key, channel) in &package.channels {
        validate_channel(package, channel_key, channel, problems);
    }
}

fn validate_channel(package: &Package, key: &str, channel: &Channel, problems: &mut Vec<String>) {
    let label = format!("package {:?}, channel {:?}", package.name, channel.name);
    if channel.name != key {
        problems.push(format!("{label} is stored under key {key:?}"));
    }
    if channel.package != package.name {
        problems.push(format!(
            "{label} refers to owning package {:?}",
            channel.package
        ));
    }
    if channel.bundles.is_empty() {
        problems.push(format!("{label} has no bundles"));
        return;
    }

    for (bundle_key, bundle) in &channel.bundles {
        if bundle.name != *bundle_key {
            problems.push(format!(
                "{label}: bundle {:?} is stored under key {bundle_key:?}",
                bundle.name
            ));
        }
        if bundle.package != package.name || bundle.channel != channel.name {
            problems.push(format!(
                "{label}: bundle {:?} refers to package {:?}, channel {:?}",
                bundle.name, bundle.package, bundle.channel
            ));
        }
    }

    if has_replaces_cycle(channel) {
        problems.push(format!("{label}: replaces graph contains a cycle"));
        return;
    }
    if let Err(e) = BundleChain::new(channel).head() {
        problems.push(format!("{label}: {e}"));
    }
}

fn has_replaces_cycle(channel: &Channel) -> bool {
    let mut graph = DiGraph::<&str, ()>::new();
    let nodes: HashMap<&str, _> = channel
        .bundles
        .keys()
        .map(|name| (name.as_str(), graph.add_node(name.as_str())))
        .collect();
    for bundle in channel.bundles.values() {
        let from = nodes.get(bundle.name.as_str());
        let to = bundle.replaces.as_deref().and_then(|r| nodes.get(r));
        if let (Some(&from), Some(&to)) = (from, to) {
            graph.add_edge(from, to, ());
        }
    }
    is_cyclic_directed(&graph)
}
