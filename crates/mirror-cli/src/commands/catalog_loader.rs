use std::fs;
use std::io::{self, Read};
use std::path::Path;

use mirror_core::Catalog;

use super::{CliError, CliResult};

/// Load a JSON or packed catalog from `path`, or stdin for `-`.
pub fn load_catalog(path: &Path) -> CliResult<Catalog> {
    let bytes = read_input(path)?;
    let catalog = Catalog::load(&bytes).map_err(|source| CliError::Catalog {
        path: path.to_path_buf(),
        source,
    })?;
    tracing::debug!(path = %path.display(), types = catalog.len(), "loaded catalog");
    Ok(catalog)
}

fn read_input(path: &Path) -> CliResult<Vec<u8>> {
    let read_err = |source| CliError::Read {
        path: path.to_path_buf(),
        source,
    };

    if path.as_os_str() == "-" {
        let mut buf = Vec::new();
        io::stdin().read_to_end(&mut buf).map_err(read_err)?;
        return Ok(buf);
    }
    fs::read(path).map_err(read_err)
}
