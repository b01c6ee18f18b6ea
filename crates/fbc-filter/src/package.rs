//! Prune a package's channels and settle its default channel.

use std::collections::HashSet;

use fbc_core::model::Package;

use crate::error::FilterError;

/// Drop every channel not named in `channel_names` (an empty list keeps
/// them all), then resolve the default channel against what is left.
pub fn filter_channels(
    package: &mut Package,
    channel_names: &[&str],
    default_override: Option<&str>,
    warn: &mut dyn FnMut(String),
) -> Result<(), FilterError> {
    if !channel_names.is_empty() {
        let allowed: HashSet<&str> = channel_names.iter().copied().collect();
        let package_name = package.name.clone();
        package.channels.retain(|name, _| {
            let keep = allowed.contains(name.as_str());
            if !keep {
                tracing::debug!("Dropping channel {name:?} from package {package_name:?}");
            }
            keep
        });
    }
    resolve_default_channel(package, default_override, warn)
}

/// Apply the default-channel override, or confirm the original default
/// survived channel filtering.
///
/// An override naming a retained channel wins. An override naming a removed
/// channel falls back to the original default with a warning, provided the
/// original survived. Without an override the original must have survived.
pub fn resolve_default_channel(
    package: &mut Package,
    default_override: Option<&str>,
    warn: &mut dyn FnMut(String),
) -> Result<(), FilterError> {
    let original_survives = package.has_channel(&package.default_channel);

    match default_override {
        Some(requested) if package.has_channel(requested) => {
            if requested != package.default_channel {
                tracing::debug!(
                    "Package {:?}: default channel {:?} -> {:?}",
                    package.name,
                    package.default_channel,
                    requested
                );
            }
            package.default_channel = requested.to_string();
            Ok(())
        }
        Some(requested) if original_survives => {
            warn(format!(
                "specified default channel override {requested:?} does not exist in package {:?}, \
                 keeping original default channel {:?} from catalog",
                package.name, package.default_channel
            ));
            Ok(())
        }
        Some(requested) => Err(FilterError::DefaultChannelUnresolvable {
            package: package.name.clone(),
            requested: requested.to_string(),
            original: package.default_channel.clone(),
        }),
        None if original_survives => Ok(()),
        None => Err(FilterError::DefaultChannelRequired {
            package: package.name.clone(),
            original: package.default_channel.clone(),
        }),
    }
}
