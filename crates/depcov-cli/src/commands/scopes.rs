//! Handler for `depcov scopes`.

use std::path::Path;

use miette::Result;

use depcov_ops::ops_scopes;

use crate::cli::AuditArgs;

pub fn exec(config_path: Option<&Path>, args: &AuditArgs) -> Result<()> {
    let (project_dir, config) = super::load(config_path, args)?;
    ops_scopes::scopes(&project_dir, &config, super::output_format(args.format))
}
