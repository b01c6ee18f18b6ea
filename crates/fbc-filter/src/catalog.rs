//! Whole-catalog filtering driven by a `FilterConfiguration`.

use std::collections::HashSet;

use fbc_core::filter_config::FilterConfiguration;
use fbc_core::model::Catalog;

use crate::channel::filter_bundles;
use crate::error::FilterError;
use crate::package::filter_channels;
use crate::validate::validate_catalog;

/// Filter `catalog` in place according to `config`.
///
/// Packages are processed in configuration order, and within each package
/// its channels in configuration order, so warnings arrive in a stable
/// sequence. The first fatal error aborts the run and leaves `catalog`
/// untouched.
pub fn filter_catalog(
    catalog: &mut Catalog,
    config: &FilterConfiguration,
    warn: &mut dyn FnMut(String),
) -> Result<(), FilterError> {
    let mut filtered = catalog.clone();
    filter_in_place(&mut filtered, config, warn)?;
    *catalog = filtered;
    tracing::info!(
        "Filtered catalog: {} packages, {} channel bundles",
        catalog.len(),
        catalog.bundle_count()
    );
    Ok(())
}

fn filter_in_place(
    catalog: &mut Catalog,
    config: &FilterConfiguration,
    warn: &mut dyn FnMut(String),
) -> Result<(), FilterError> {
    let wanted: HashSet<&str> = config.packages.iter().map(|p| p.name.as_str()).collect();
    catalog.packages.retain(|name, _| wanted.contains(name.as_str()));

    for spec in &config.packages {
        let Some(package) = catalog.package_mut(&spec.name) else {
            warn(format!("package {:?} not found in catalog", spec.name));
            continue;
        };

        filter_channels(
            package,
            &spec.channel_names(),
            spec.default_channel_override(),
            warn,
        )
        .map_err(|e| FilterError::in_package(&spec.name, e))?;

        for channel_spec in &spec.channels {
            let Some(channel) = package.channel_mut(&channel_spec.name) else {
                warn(format!(
                    "channel {:?} not found in package {:?}",
                    channel_spec.name, spec.name
                ));
                continue;
            };
            if let Some(range) = channel_spec.range() {
                filter_bundles(channel, range, warn)
                    .map_err(|e| FilterError::in_channel(&spec.name, &channel_spec.name, e))?;
            }
        }
    }

    validate_catalog(catalog)
}
