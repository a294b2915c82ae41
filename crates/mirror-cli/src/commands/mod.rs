pub mod catalog_loader;
pub mod generate;
pub mod names;
pub mod pack;

#[cfg(test)]
mod generate_tests;
#[cfg(test)]
mod pack_tests;
#[cfg(test)]
mod test_utils;

use std::io;
use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum CliError {
    #[error("failed to read '{}': {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to write '{}': {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("invalid catalog '{}': {source}", path.display())]
    Catalog {
        path: PathBuf,
        #[source]
        source: mirror_core::CatalogError,
    },

    #[error(transparent)]
    Generate(#[from] mirror_codegen::GenError),

    #[error("failed to serialize: {0}")]
    Json(#[from] serde_json::Error),
}

pub type CliResult<T = ()> = Result<T, CliError>;
