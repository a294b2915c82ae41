//! Shared argument builders for CLI commands.

use std::path::PathBuf;

use clap::{Arg, ArgAction, value_parser};

/// API catalog, JSON or packed (positional).
pub fn catalog_arg() -> Arg {
    Arg::new("catalog")
        .value_name("CATALOG")
        .required(true)
        .value_parser(value_parser!(PathBuf))
        .help("API catalog file, JSON or packed (`-` for stdin)")
}

/// Root package of the generated mirrors (--root).
pub fn root_arg() -> Arg {
    Arg::new("root")
        .short('r')
        .long("root")
        .value_name("PACKAGE")
        .required(true)
        .help("Package the mirrors are generated under")
}

/// Package prefix to mirror (-p/--package, repeatable).
pub fn package_arg() -> Arg {
    Arg::new("package")
        .short('p')
        .long("package")
        .value_name("PREFIX")
        .action(ArgAction::Append)
        .help("Package prefix to mirror; maps to <root>.<last segment>")
}

/// Package prefix with an explicit target (--package-to PREFIX=TARGET).
pub fn package_to_arg() -> Arg {
    Arg::new("package_to")
        .long("package-to")
        .value_name("PREFIX=TARGET")
        .action(ArgAction::Append)
        .value_parser(parse_package_mapping)
        .help("Package prefix to mirror into an explicit target package")
}

pub fn mirror_suffix_arg() -> Arg {
    Arg::new("mirror_suffix")
        .long("mirror-suffix")
        .value_name("SUFFIX")
        .help("Suffix appended to every mirror name")
}

pub fn impl_suffix_arg() -> Arg {
    Arg::new("impl_suffix")
        .long("impl-suffix")
        .value_name("SUFFIX")
        .help("Suffix of interface implementations [default: Impl]")
}

pub fn bridge_arg() -> Arg {
    Arg::new("bridge")
        .long("bridge")
        .value_name("CLASS")
        .help("Class that forwarded calls go through [default: <root>.runtime.MirrorHandler]")
}

/// Output directory (-o/--output).
pub fn output_dir_arg() -> Arg {
    Arg::new("output")
        .short('o')
        .long("output")
        .value_name("DIR")
        .required(true)
        .value_parser(value_parser!(PathBuf))
        .help("Directory to write mirror sources into")
}

/// Output file (-o/--output).
pub fn output_file_arg() -> Arg {
    Arg::new("output")
        .short('o')
        .long("output")
        .value_name("FILE")
        .required(true)
        .value_parser(value_parser!(PathBuf))
        .help("File to write")
}

/// Manifest destination (--manifest).
pub fn manifest_arg() -> Arg {
    Arg::new("manifest")
        .long("manifest")
        .value_name("FILE")
        .value_parser(value_parser!(PathBuf))
        .help("Where to write the name manifest [default: <output>/mirror-manifest.json]")
}

/// Print JSON instead of text (--json).
pub fn json_arg() -> Arg {
    Arg::new("json")
        .long("json")
        .action(ArgAction::SetTrue)
        .help("Print the manifest JSON")
}

/// Don't write files, only report (--dry-run).
pub fn dry_run_arg() -> Arg {
    Arg::new("dry_run")
        .long("dry-run")
        .action(ArgAction::SetTrue)
        .help("List the files that would be written")
}

fn parse_package_mapping(s: &str) -> Result<(String, String), String> {
    let (prefix, target) = s
        .split_once('=')
        .ok_or_else(|| format!("expected PREFIX=TARGET, got `{s}`"))?;
    if prefix.is_empty() || target.is_empty() {
        return Err(format!("expected PREFIX=TARGET, got `{s}`"));
    }
    Ok((prefix.to_string(), target.to_string()))
}
