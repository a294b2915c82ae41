mod cli;
mod commands;
mod logging;

use cli::{GenerateParams, NamesParams, PackParams, build_cli};

fn main() {
    logging::init();
    let matches = build_cli().get_matches();

    let result = match matches.subcommand() {
        Some(("generate", m)) => commands::generate::run(GenerateParams::from_matches(m).into()),
        Some(("names", m)) => commands::names::run(NamesParams::from_matches(m).into()),
        Some(("pack", m)) => commands::pack::run(PackParams::from_matches(m).into()),
        _ => unreachable!("clap should have caught this"),
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
