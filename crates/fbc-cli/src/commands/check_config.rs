//! Handler for `fbc-filter check-config`.

use std::path::Path;

use miette::Result;

pub fn exec(config: &Path) -> Result<()> {
    fbc_ops::ops_check_config::check_config(config).map(|_| ())
}
