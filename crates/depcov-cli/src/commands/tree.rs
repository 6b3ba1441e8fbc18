//! Handler for `depcov tree`.

use std::path::Path;

use miette::Result;

use depcov_ops::ops_tree;

use crate::cli::AuditArgs;

pub fn exec(config_path: Option<&Path>, args: &AuditArgs) -> Result<()> {
    let (project_dir, config) = super::load(config_path, args)?;
    ops_tree::tree(&project_dir, &config, super::output_format(args.format))
}
