//! Read-only traversal of a channel's replaces/skips update graph.

use std::collections::HashSet;

use fbc_core::model::{Bundle, Channel};

use crate::constraint::VersionConstraint;
use crate::error::FilterError;

/// Name-based view over the bundles of one channel.
#[derive(Debug, Clone, Copy)]
pub struct BundleChain<'a> {
    channel: &'a Channel,
}

impl<'a> BundleChain<'a> {
    pub fn new(channel: &'a Channel) -> Self {
        Self { channel }
    }

    /// The unique bundle that no other bundle replaces or skips.
    ///
    /// Fails when there is no such bundle, when there are several, or when
    /// the replaces chain below the head loops back on itself.
    pub fn head(&self) -> Result<&'a Bundle, FilterError> {
        let mut incoming: HashSet<&str> = HashSet::new();
        for bundle in self.channel.bundles.values() {
            if let Some(replaces) = bundle.replaces.as_deref() {
                incoming.insert(replaces);
            }
            incoming.extend(bundle.skips.iter().map(String::as_str));
        }

        let heads: Vec<&'a Bundle> = self
            .channel
            .bundles
            .values()
            .filter(|b| !incoming.contains(b.name.as_str()))
            .collect();

        let head = match heads.as_slice() {
            [] => return Err(self.head_error("no channel head found in graph".to_string())),
            [head] => *head,
            many => {
                let names: Vec<&str> = many.iter().map(|b| b.name.as_str()).collect();
                return Err(self.head_error(format!(
                    "multiple channel heads found in graph: {}",
                    names.join(", ")
                )));
            }
        };

        self.replaces_chain(head)?;
        Ok(head)
    }

    /// Look up a bundle by name. Unknown names are not an error.
    pub fn resolve(&self, name: &str) -> Option<&'a Bundle> {
        self.channel.bundles.get(name)
    }

    /// The bundle `bundle` replaces, if it is present in this channel.
    pub fn predecessor_of(&self, bundle: &Bundle) -> Option<&'a Bundle> {
        bundle.replaces.as_deref().and_then(|name| self.resolve(name))
    }

    /// Skip targets of `bundle` that resolve within this channel.
    pub fn skip_targets<'b>(&self, bundle: &'b Bundle) -> impl Iterator<Item = &'a Bundle> + 'b
    where
        'a: 'b,
    {
        let chain = *self;
        bundle.skips.iter().filter_map(move |name| chain.resolve(name))
    }

    /// `from` followed by each successive predecessor, newest first.
    pub fn replaces_chain(&self, from: &'a Bundle) -> Result<Vec<&'a Bundle>, FilterError> {
        let mut seen = HashSet::new();
        let mut path = Vec::new();
        let mut cur = Some(from);
        while let Some(bundle) = cur {
            if !seen.insert(bundle.name.as_str()) {
                return Err(self.cycle_error(bundle));
            }
            path.push(bundle);
            cur = self.predecessor_of(bundle);
        }
        Ok(path)
    }

    /// True if `bundle`, one of its skip targets, or anything further down
    /// its replaces chain satisfies `range`.
    pub fn is_or_descends_into_range(
        &self,
        bundle: &Bundle,
        range: &VersionConstraint,
    ) -> Result<bool, FilterError> {
        let mut seen = HashSet::new();
        let mut cur = Some(bundle);
        while let Some(b) = cur {
            if !seen.insert(b.name.as_str()) {
                return Err(self.cycle_error(b));
            }
            if self.hits_range(b, range) {
                return Ok(true);
            }
            cur = self.predecessor_of(b);
        }
        Ok(false)
    }

    /// True if `bundle` or one of its resolvable skip targets is in `range`.
    pub fn hits_range(&self, bundle: &Bundle, range: &VersionConstraint) -> bool {
        range.satisfies(&bundle.version)
            || self
                .skip_targets(bundle)
                .any(|skip| range.satisfies(&skip.version))
    }

    fn head_error(&self, reason: String) -> FilterError {
        FilterError::AmbiguousOrMissingHead {
            channel: self.channel.name.clone(),
            reason,
        }
    }

    fn cycle_error(&self, at: &Bundle) -> FilterError {
        self.head_error(format!("replaces chain cycle detected at bundle {:?}", at.name))
    }
}
