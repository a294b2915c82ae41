use std::fs;
use std::path::PathBuf;

use super::catalog_loader::load_catalog;
use super::{CliError, CliResult};

pub struct PackArgs {
    pub catalog: PathBuf,
    pub output: PathBuf,
}

pub fn run(args: PackArgs) -> CliResult {
    let catalog = load_catalog(&args.catalog)?;
    let bytes = catalog.to_binary().map_err(|source| CliError::Catalog {
        path: args.output.clone(),
        source,
    })?;
    fs::write(&args.output, &bytes).map_err(|source| CliError::Write {
        path: args.output.clone(),
        source,
    })?;
    tracing::info!(
        types = catalog.len(),
        bytes = bytes.len(),
        path = %args.output.display(),
        "packed catalog"
    );
    Ok(())
}
