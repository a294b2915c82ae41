use std::io::{self, Write};
use std::path::PathBuf;

use mirror_codegen::{Config, Generator};

use super::CliResult;
use super::catalog_loader::load_catalog;

/// Default manifest file name inside the output directory.
pub const MANIFEST_FILE: &str = "mirror-manifest.json";

pub struct GenerateArgs {
    pub catalog: PathBuf,
    pub config: Config,
    pub output: PathBuf,
    pub manifest: PathBuf,
    pub dry_run: bool,
}

pub fn run(args: GenerateArgs) -> CliResult {
    let mut stdout = io::stdout().lock();
    execute(args, &mut stdout)
}

pub(crate) fn execute(args: GenerateArgs, out: &mut impl Write) -> CliResult {
    let catalog = load_catalog(&args.catalog)?;
    let generation = Generator::new(&catalog, args.config).generate()?;

    if args.dry_run {
        for file in &generation.files {
            writeln!(out, "{}", args.output.join(&file.path).display()).map_err(stdout_err)?;
        }
        writeln!(out, "{}", args.manifest.display()).map_err(stdout_err)?;
        return Ok(());
    }

    generation.write_sources(&args.output)?;
    generation.write_manifest(&args.manifest)?;
    writeln!(
        out,
        "generated {} types into {} files",
        generation.mapping.len(),
        generation.files.len()
    )
    .map_err(stdout_err)?;
    Ok(())
}

pub(crate) fn stdout_err(source: io::Error) -> super::CliError {
    super::CliError::Write {
        path: PathBuf::from("<stdout>"),
        source,
    }
}
