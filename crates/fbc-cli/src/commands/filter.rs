//! Handler for `fbc-filter filter`.

use std::path::PathBuf;

use fbc_core::declcfg::OutputFormat;
use fbc_ops::ops_filter::{self, FilterOptions};
use fbc_util::errors::FbcError;
use miette::Result;

pub fn exec(
    config: PathBuf,
    catalog: PathBuf,
    output: OutputFormat,
    output_file: Option<PathBuf>,
) -> Result<()> {
    if !catalog.exists() {
        return Err(FbcError::Catalog {
            message: format!("{} does not exist", catalog.display()),
        }
        .into());
    }

    let opts = FilterOptions {
        config,
        catalog,
        output,
        output_file,
    };
    ops_filter::filter(&opts)
}
