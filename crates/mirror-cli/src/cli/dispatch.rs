//! Extract params from `ArgMatches` and convert them to command args.

use std::path::PathBuf;

use clap::ArgMatches;
use mirror_codegen::Config;

use crate::commands::generate::GenerateArgs;
use crate::commands::names::NamesArgs;
use crate::commands::pack::PackArgs;

/// Flags shared by every command that builds a name mapping.
pub struct MappingParams {
    pub catalog: PathBuf,
    pub root: String,
    pub packages: Vec<String>,
    pub packages_to: Vec<(String, String)>,
    pub mirror_suffix: Option<String>,
    pub impl_suffix: Option<String>,
}

impl MappingParams {
    fn from_matches(m: &ArgMatches) -> Self {
        Self {
            catalog: m.get_one::<PathBuf>("catalog").cloned().unwrap_or_default(),
            root: m.get_one::<String>("root").cloned().unwrap_or_default(),
            packages: m
                .get_many::<String>("package")
                .map(|v| v.cloned().collect())
                .unwrap_or_default(),
            packages_to: m
                .get_many::<(String, String)>("package_to")
                .map(|v| v.cloned().collect())
                .unwrap_or_default(),
            mirror_suffix: m.get_one::<String>("mirror_suffix").cloned(),
            impl_suffix: m.get_one::<String>("impl_suffix").cloned(),
        }
    }

    pub fn config(&self) -> Config {
        let mut config = Config::new(&self.root);
        for prefix in &self.packages {
            config = config.package(prefix);
        }
        for (prefix, target) in &self.packages_to {
            config = config.package_to(prefix, target);
        }
        if let Some(suffix) = &self.mirror_suffix {
            config = config.mirror_suffix(suffix);
        }
        if let Some(suffix) = &self.impl_suffix {
            config = config.impl_suffix(suffix);
        }
        config
    }
}

pub struct GenerateParams {
    pub mapping: MappingParams,
    pub bridge: Option<String>,
    pub output: PathBuf,
    pub manifest: Option<PathBuf>,
    pub dry_run: bool,
}

impl GenerateParams {
    pub fn from_matches(m: &ArgMatches) -> Self {
        Self {
            mapping: MappingParams::from_matches(m),
            bridge: m.get_one::<String>("bridge").cloned(),
            output: m.get_one::<PathBuf>("output").cloned().unwrap_or_default(),
            manifest: m.get_one::<PathBuf>("manifest").cloned(),
            dry_run: m.get_flag("dry_run"),
        }
    }
}

impl From<GenerateParams> for GenerateArgs {
    fn from(p: GenerateParams) -> Self {
        let mut config = p.mapping.config();
        if let Some(bridge) = p.bridge {
            config = config.bridge_class(bridge);
        }
        let manifest = p
            .manifest
            .unwrap_or_else(|| p.output.join(crate::commands::generate::MANIFEST_FILE));
        Self {
            catalog: p.mapping.catalog,
            config,
            output: p.output,
            manifest,
            dry_run: p.dry_run,
        }
    }
}

pub struct NamesParams {
    pub mapping: MappingParams,
    pub json: bool,
}

impl NamesParams {
    pub fn from_matches(m: &ArgMatches) -> Self {
        Self {
            mapping: MappingParams::from_matches(m),
            json: m.get_flag("json"),
        }
    }
}

impl From<NamesParams> for NamesArgs {
    fn from(p: NamesParams) -> Self {
        Self {
            config: p.mapping.config(),
            catalog: p.mapping.catalog,
            json: p.json,
        }
    }
}

pub struct PackParams {
    pub catalog: PathBuf,
    pub output: PathBuf,
}

impl PackParams {
    pub fn from_matches(m: &ArgMatches) -> Self {
        Self {
            catalog: m.get_one::<PathBuf>("catalog").cloned().unwrap_or_default(),
            output: m.get_one::<PathBuf>("output").cloned().unwrap_or_default(),
        }
    }
}

impl From<PackParams> for PackArgs {
    fn from(p: PackParams) -> Self {
        Self {
            catalog: p.catalog,
            output: p.output,
        }
    }
}
