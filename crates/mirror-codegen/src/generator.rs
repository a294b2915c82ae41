//! Generation driver: scan, name, emit, render.

use std::fs;
use std::path::{Path, PathBuf};

use indexmap::IndexMap;
use mirror_core::{Catalog, Manifest, TypeDescriptor};

use crate::emit::{Emitted, Emitter, render_file};
use crate::naming::NameMapping;
use crate::scan::scan;
use crate::{Config, GenError};

/// One rendered compilation unit.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GeneratedFile {
    /// Relative to the output root, e.g. `mirror/bukkit/Server.java`.
    pub path: PathBuf,
    pub source: String,
}

/// Everything a generation run produced.
#[derive(Debug)]
pub struct Generation {
    pub mapping: NameMapping,
    /// Top-level definitions in emission order.
    pub emitted: Vec<Emitted>,
    pub files: Vec<GeneratedFile>,
}

impl Generation {
    pub fn manifest(&self) -> Manifest {
        self.mapping.to_manifest()
    }

    pub fn file(&self, path: impl AsRef<Path>) -> Option<&GeneratedFile> {
        self.files.iter().find(|f| f.path == path.as_ref())
    }

    /// Write every source file below `root`, creating package directories.
    pub fn write_sources(&self, root: &Path) -> Result<(), GenError> {
        for file in &self.files {
            let path = root.join(&file.path);
            if let Some(dir) = path.parent() {
                fs::create_dir_all(dir).map_err(|source| GenError::Io {
                    path: dir.to_path_buf(),
                    source,
                })?;
            }
            fs::write(&path, &file.source).map_err(|source| GenError::Io { path, source })?;
        }
        tracing::info!(files = self.files.len(), root = %root.display(), "wrote mirror sources");
        Ok(())
    }

    pub fn write_manifest(&self, path: &Path) -> Result<(), GenError> {
        let json = self.manifest().to_json()?;
        if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
            fs::create_dir_all(dir).map_err(|source| GenError::Io {
                path: dir.to_path_buf(),
                source,
            })?;
        }
        fs::write(path, json).map_err(|source| GenError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        tracing::debug!(path = %path.display(), "wrote name manifest");
        Ok(())
    }
}

pub struct Generator<'a> {
    catalog: &'a Catalog,
    config: Config,
}

impl<'a> Generator<'a> {
    pub fn new(catalog: &'a Catalog, config: Config) -> Self {
        Self { catalog, config }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Names are complete before anything is emitted; a single unresolved
    /// reference fails the whole run.
    pub fn generate(&self) -> Result<Generation, GenError> {
        if self.config.packages().is_empty() {
            return Err(GenError::NoPackages);
        }

        let scanned = scan(self.catalog, &self.config);
        tracing::debug!(count = scanned.len(), "scanned types");

        let mapping = NameMapping::build(&scanned, &self.config);

        let mut nested: IndexMap<&str, Vec<&TypeDescriptor>> = IndexMap::new();
        for ty in &scanned {
            if let Some(enclosing) = &ty.enclosing {
                nested.entry(enclosing.as_str()).or_default().push(*ty);
            }
        }

        let emitter = Emitter::new(self.catalog, &mapping, &self.config);
        let bridge = self.config.bridge();
        let mut emitted = Vec::new();
        let mut files = Vec::new();
        for ty in scanned.iter().filter(|t| !t.is_nested()) {
            let result = emit_tree(&emitter, ty, &nested)?;
            files.push(GeneratedFile {
                path: result.definition.name.file_path(),
                source: render_file(&result.definition, &bridge),
            });
            if let Some(implementation) = &result.implementation {
                files.push(GeneratedFile {
                    path: implementation.name.file_path(),
                    source: render_file(implementation, &bridge),
                });
            }
            emitted.push(result);
        }

        tracing::info!(
            types = mapping.len(),
            files = files.len(),
            "generated mirrors"
        );
        Ok(Generation {
            mapping,
            emitted,
            files,
        })
    }
}

fn emit_tree(
    emitter: &Emitter<'_>,
    ty: &TypeDescriptor,
    nested: &IndexMap<&str, Vec<&TypeDescriptor>>,
) -> Result<Emitted, GenError> {
    let mut members = Vec::new();
    for child in nested.get(ty.name.as_str()).into_iter().flatten() {
        let result = emit_tree(emitter, child, nested)?;
        members.push(result.definition);
        members.extend(result.implementation);
    }
    tracing::debug!(name = %ty.name, members = members.len(), "emitting");
    emitter.emit(ty, members)
}
