//! In-memory catalog model: packages own channels, channels own bundles.
//!
//! Bundles refer to each other (`replaces`, `skips`) by name only. The
//! bundle map of a channel is the arena those names resolve against, so no
//! bundle ever owns or borrows another.

use std::collections::BTreeMap;

use crate::version::BundleVersion;

/// A catalog: every package keyed by its name.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Catalog {
    pub packages: BTreeMap<String, Package>,
}

impl Catalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a package, replacing any existing package with the same name.
    pub fn insert(&mut self, package: Package) {
        self.packages.insert(package.name.clone(), package);
    }

    pub fn with_package(mut self, package: Package) -> Self {
        self.insert(package);
        self
    }

    pub fn package(&self, name: &str) -> Option<&Package> {
        self.packages.get(name)
    }

    pub fn package_mut(&mut self, name: &str) -> Option<&mut Package> {
        self.packages.get_mut(name)
    }

    pub fn len(&self) -> usize {
        self.packages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.packages.is_empty()
    }

    /// Total number of (channel, bundle) memberships across the catalog.
    pub fn bundle_count(&self) -> usize {
        self.packages
            .values()
            .flat_map(|p| p.channels.values())
            .map(|c| c.bundles.len())
            .sum()
    }
}

/// A package with its channels and the name of its default channel.
#[derive(Debug, Clone, PartialEq)]
pub struct Package {
    pub name: String,
    pub default_channel: String,
    pub channels: BTreeMap<String, Channel>,
}

impl Package {
    pub fn new(name: impl Into<String>, default_channel: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            default_channel: default_channel.into(),
            channels: BTreeMap::new(),
        }
    }

    /// Add a channel, rewriting its package back-reference to this package.
    pub fn insert_channel(&mut self, mut channel: Channel) {
        channel.package = self.name.clone();
        for bundle in channel.bundles.values_mut() {
            bundle.package = self.name.clone();
        }
        self.channels.insert(channel.name.clone(), channel);
    }

    pub fn with_channel(mut self, channel: Channel) -> Self {
        self.insert_channel(channel);
        self
    }

    pub fn channel(&self, name: &str) -> Option<&Channel> {
        self.channels.get(name)
    }

    pub fn channel_mut(&mut self, name: &str) -> Option<&mut Channel> {
        self.channels.get_mut(name)
    }

    pub fn has_channel(&self, name: &str) -> bool {
        self.channels.contains_key(name)
    }
}

/// A named channel holding a replaces/skips update graph of bundles.
#[derive(Debug, Clone, PartialEq)]
pub struct Channel {
    pub name: String,
    /// Name of the owning package.
    pub package: String,
    pub bundles: BTreeMap<String, Bundle>,
}

impl Channel {
    pub fn new(package: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            package: package.into(),
            bundles: BTreeMap::new(),
        }
    }

    /// Add a bundle, rewriting its package and channel back-references.
    pub fn insert_bundle(&mut self, mut bundle: Bundle) {
        bundle.package = self.package.clone();
        bundle.channel = self.name.clone();
        self.bundles.insert(bundle.name.clone(), bundle);
    }

    pub fn with_bundle(mut self, bundle: Bundle) -> Self {
        self.insert_bundle(bundle);
        self
    }

    pub fn bundle(&self, name: &str) -> Option<&Bundle> {
        self.bundles.get(name)
    }

    /// Bundle names in map order.
    pub fn bundle_names(&self) -> Vec<&str> {
        self.bundles.keys().map(String::as_str).collect()
    }
}

/// A single installable bundle as seen from one channel.
#[derive(Debug, Clone, PartialEq)]
pub struct Bundle {
    pub name: String,
    pub package: String,
    pub channel: String,
    pub version: BundleVersion,
    /// The bundle this one upgrades from, if any.
    pub replaces: Option<String>,
    /// Bundles this one may upgrade from directly, skipping the chain.
    pub skips: Vec<String>,
}

impl Bundle {
    pub fn new(name: impl Into<String>, version: BundleVersion) -> Self {
        Self {
            name: name.into(),
            package: String::new(),
            channel: String::new(),
            version,
            replaces: None,
            skips: Vec::new(),
        }
    }

    pub fn with_replaces(mut self, replaces: impl Into<String>) -> Self {
        self.replaces = Some(replaces.into());
        self
    }

    pub fn with_skips<I, S>(mut self, skips: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.skips = skips.into_iter().map(Into::into).collect();
        self
    }
}
