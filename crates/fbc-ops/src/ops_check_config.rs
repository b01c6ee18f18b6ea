//! Operation: validate a filter configuration without touching a catalog.

use std::path::Path;

use fbc_core::filter_config::FilterConfiguration;
use fbc_filter::{FilterError, VersionConstraint};
use fbc_util::errors::FbcResult;
use fbc_util::progress;

/// Load `path`, check its discriminators and names, and compile every
/// version range. Returns the number of ranges checked.
pub fn check_config(path: &Path) -> FbcResult<usize> {
    let config = FilterConfiguration::from_path(path)?;
    let ranges = check_ranges(&config)?;
    progress::status(
        "Checked",
        &format!(
            "{}: {} package(s), {ranges} version range(s)",
            path.display(),
            config.packages.len()
        ),
    );
    Ok(ranges)
}

/// Compile every configured version range, stopping at the first bad one.
pub fn check_ranges(config: &FilterConfiguration) -> Result<usize, FilterError> {
    let mut count = 0;
    for pkg in &config.packages {
        for channel in &pkg.channels {
            let Some(range) = channel.range() else {
                continue;
            };
            let constraint = VersionConstraint::parse(range)
                .map_err(|e| FilterError::in_channel(&pkg.name, &channel.name, e))?;
            tracing::debug!(
                "Package {:?}, channel {:?}: range {constraint}",
                pkg.name,
                channel.name
            );
            count += 1;
        }
    }
    Ok(count)
}
