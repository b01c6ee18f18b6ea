//! Errors raised while filtering a catalog. Every variant is terminal for
//! the current filtering run.

use miette::Diagnostic;
use thiserror::Error;

#[derive(Debug, Error, Diagnostic)]
pub enum FilterError {
    /// A version range expression could not be parsed.
    #[error("invalid version range {range:?}: {reason}")]
    #[diagnostic(help(
        "Use semver range syntax, e.g. \">=1.2.0 <2.0.0\", \"^1.2\", \"~1.2.3\" or \"1.0 - 1.4\""
    ))]
    InvalidRangeSyntax { range: String, reason: String },

    /// The channel has zero or several heads, or its replaces chain loops.
    #[error("channel {channel:?}: {reason}")]
    AmbiguousOrMissingHead { channel: String, reason: String },

    /// The channel's update graph could not be traversed.
    #[error("error getting head of channel {channel:?} in package {package:?}")]
    InvalidChannel {
        package: String,
        channel: String,
        #[source]
        source: Box<FilterError>,
    },

    /// Nothing in the channel matched the version range.
    #[error(
        "no bundles in channel {channel:?} for package {package:?} matched the version range {range:?}"
    )]
    #[diagnostic(help("Widen the versionRange, or remove it to keep every bundle in the channel"))]
    NoBundlesInRange {
        package: String,
        channel: String,
        range: String,
    },

    /// Both the configured override and the original default channel are gone.
    #[error(
        "specified default channel override {requested:?} does not exist, and original default channel {original:?} does not exist"
    )]
    DefaultChannelUnresolvable {
        package: String,
        requested: String,
        original: String,
    },

    /// The original default channel was filtered out and no override was given.
    #[error(
        "the default channel {original:?} was filtered out, a new default channel must be configured in the FilterConfiguration for package {package:?}"
    )]
    #[diagnostic(help("Set defaultChannel for this package to one of the retained channels"))]
    DefaultChannelRequired { package: String, original: String },

    /// The filtered catalog failed structural validation.
    #[error("filtered catalog is invalid: {}", .problems.join("; "))]
    InvalidResultingCatalog { problems: Vec<String> },

    #[error("could not filter channels in package {package:?}")]
    InPackage {
        package: String,
        #[source]
        source: Box<FilterError>,
    },

    #[error("could not filter bundles in channel {channel:?} of package {package:?}")]
    InChannel {
        package: String,
        channel: String,
        #[source]
        source: Box<FilterError>,
    },
}

impl FilterError {
    /// The underlying error with package/channel annotations stripped.
    pub fn root_cause(&self) -> &FilterError {
        match self {
            FilterError::InPackage { source, .. } | FilterError::InChannel { source, .. } => {
                source.root_cause()
            }
            other => other,
        }
    }

    pub fn in_package(package: &str, source: FilterError) -> Self {
        FilterError::InPackage {
            package: package.to_string(),
            source: Box::new(source),
        }
    }

    pub fn in_channel(package: &str, channel: &str, source: FilterError) -> Self {
        FilterError::InChannel {
            package: package.to_string(),
            channel: channel.to_string(),
            source: Box::new(source),
        }
    }
}
