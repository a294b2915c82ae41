use std::io::{self, Write};
use std::path::PathBuf;

use mirror_codegen::scan::scan;
use mirror_codegen::{Config, GenError, NameMapping};

use super::CliResult;
use super::catalog_loader::load_catalog;
use super::generate::stdout_err;

pub struct NamesArgs {
    pub catalog: PathBuf,
    pub config: Config,
    pub json: bool,
}

pub fn run(args: NamesArgs) -> CliResult {
    let mut stdout = io::stdout().lock();
    execute(args, &mut stdout)
}

pub(crate) fn execute(args: NamesArgs, out: &mut impl Write) -> CliResult {
    if args.config.packages().is_empty() {
        return Err(GenError::NoPackages.into());
    }

    let catalog = load_catalog(&args.catalog)?;
    let scanned = scan(&catalog, &args.config);
    let mapping = NameMapping::build(&scanned, &args.config);

    if args.json {
        writeln!(out, "{}", mapping.to_manifest().to_json()?).map_err(stdout_err)?;
        return Ok(());
    }

    let width = mapping.iter().map(|(orig, _)| orig.len()).max().unwrap_or(0);
    for (original, mirror) in mapping.iter() {
        let line = match mapping.implementation(original) {
            Some(imp) => writeln!(
                out,
                "{original:<width$}  {}  (impl {})",
                mirror.canonical(),
                imp.canonical()
            ),
            None => writeln!(out, "{original:<width$}  {}", mirror.canonical()),
        };
        line.map_err(stdout_err)?;
    }
    Ok(())
}
