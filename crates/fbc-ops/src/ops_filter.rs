//! Operation: filter a declarative catalog.
//!
//! Loads the filter configuration and the catalog, renders the catalog into
//! the model, prunes it, and serializes the surviving blobs to stdout or a
//! file.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::PathBuf;

use fbc_core::declcfg::{DeclarativeConfig, OutputFormat};
use fbc_core::filter_config::FilterConfiguration;
use fbc_util::errors::{FbcError, FbcResult};
use fbc_util::progress;

/// Options for `fbc-filter filter`.
#[derive(Debug, Clone, Default)]
pub struct FilterOptions {
    /// Path to the `FilterConfiguration` document.
    pub config: PathBuf,
    /// Catalog directory or single catalog file.
    pub catalog: PathBuf,
    pub output: OutputFormat,
    /// Write here instead of stdout.
    pub output_file: Option<PathBuf>,
}

/// A filtered catalog together with the warnings raised while producing it.
#[derive(Debug)]
pub struct FilterOutcome {
    pub catalog: DeclarativeConfig,
    pub warnings: Vec<String>,
}

/// Filter the catalog named in `opts` and write the result.
pub fn filter(opts: &FilterOptions) -> FbcResult<()> {
    let config = FilterConfiguration::from_path(&opts.config)?;
    let source = DeclarativeConfig::load(&opts.catalog)?;
    let outcome = filter_declcfg(source, &config)?;

    match &opts.output_file {
        Some(path) => {
            fbc_util::fs::ensure_parent_dir(path).map_err(FbcError::Io)?;
            let file = File::create(path).map_err(|e| FbcError::Output {
                message: format!("Failed to create {}: {e}", path.display()),
            })?;
            let mut w = BufWriter::new(file);
            outcome.catalog.write(&mut w, opts.output)?;
            progress::status("Wrote", &path.display().to_string());
        }
        None => {
            let stdout = std::io::stdout();
            let mut w = BufWriter::new(stdout.lock());
            outcome.catalog.write(&mut w, opts.output)?;
            w.flush().map_err(FbcError::Io)?;
        }
    }

    progress::status(
        "Filtered",
        &format!(
            "{} package(s), {} bundle(s)",
            outcome.catalog.packages.len(),
            outcome.catalog.bundles.len()
        ),
    );
    if !outcome.warnings.is_empty() {
        progress::status_warn(
            "Warnings",
            &format!("{} raised while filtering", outcome.warnings.len()),
        );
    }
    Ok(())
}

/// Filter an in-memory catalog. Each warning is logged as it is raised and
/// also returned, in order, on the outcome.
pub fn filter_declcfg(
    source: DeclarativeConfig,
    config: &FilterConfiguration,
) -> FbcResult<FilterOutcome> {
    let mut catalog = source.to_catalog()?;
    let mut warnings = Vec::new();
    fbc_filter::filter_catalog(&mut catalog, config, &mut |message: String| {
        tracing::warn!("{message}");
        warnings.push(message);
    })?;
    Ok(FilterOutcome {
        catalog: source.retain(&catalog),
        warnings,
    })
}
