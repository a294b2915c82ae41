//! Command builders for the CLI.

use clap::Command;

use super::args::*;

/// Build the complete CLI with all subcommands.
pub fn build_cli() -> Command {
    Command::new("mirror")
        .about("Generate API mirrors that forward to a remote process")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .subcommand(generate_command())
        .subcommand(names_command())
        .subcommand(pack_command())
}

/// Adds the flags that shape the name mapping.
fn with_mapping_args(cmd: Command) -> Command {
    cmd.arg(catalog_arg())
        .arg(root_arg())
        .arg(package_arg())
        .arg(package_to_arg())
        .arg(mirror_suffix_arg())
        .arg(impl_suffix_arg())
}

pub fn generate_command() -> Command {
    let cmd = Command::new("generate")
        .about("Generate mirror sources and the name manifest")
        .after_help(
            r#"EXAMPLES:
  mirror generate api.json -r mirror -p org.bukkit -o out/
  mirror generate api.bin -r mirror -p org.bukkit --package-to net.kyori=mirror.adventure -o out/
  mirror generate api.json -r mirror -p org.bukkit -o out/ --dry-run"#,
        );

    with_mapping_args(cmd)
        .arg(bridge_arg())
        .arg(output_dir_arg())
        .arg(manifest_arg())
        .arg(dry_run_arg())
}

pub fn names_command() -> Command {
    let cmd = Command::new("names")
        .about("Print the name mapping without generating sources")
        .after_help(
            r#"EXAMPLES:
  mirror names api.json -r mirror -p org.bukkit
  mirror names api.json -r mirror -p org.bukkit --json"#,
        );

    with_mapping_args(cmd).arg(json_arg())
}

pub fn pack_command() -> Command {
    Command::new("pack")
        .about("Convert a JSON catalog to the packed binary form")
        .after_help(
            r#"EXAMPLES:
  mirror pack api.json -o api.bin"#,
        )
        .arg(catalog_arg())
        .arg(output_file_arg())
}
