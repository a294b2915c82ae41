//! Mirror name assignment.
//!
//! Names are assigned once, namespace by namespace, before anything is
//! emitted. The resulting [`NameMapping`] is immutable.

use std::collections::HashSet;
use std::fmt;
use std::path::PathBuf;

use indexmap::IndexMap;
use mirror_core::names::{canonical, is_under, package_of, qualify};
use mirror_core::{Manifest, TypeDescriptor, TypeReference};

use crate::{Config, GenError};

/// Mirror identity: package plus the nested simple-name path.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct MirrorName {
    pub package: String,
    /// Enclosing mirror names followed by the type's own simple name.
    pub path: Vec<String>,
}

impl MirrorName {
    pub fn simple(&self) -> &str {
        self.path.last().map_or("", String::as_str)
    }

    pub fn canonical(&self) -> String {
        qualify(&self.package, &self.path.join("."))
    }

    pub fn is_nested(&self) -> bool {
        self.path.len() > 1
    }

    /// Source file holding this name's top-level type, relative to the
    /// output root.
    pub fn file_path(&self) -> PathBuf {
        let mut path: PathBuf = self.package.split('.').filter(|s| !s.is_empty()).collect();
        path.push(format!("{}.java", self.path.first().map_or("", String::as_str)));
        path
    }
}

impl fmt::Display for MirrorName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.canonical())
    }
}

/// Bijection between original binary names and mirror names.
#[derive(Clone, Debug, Default)]
pub struct NameMapping {
    mirrors: IndexMap<String, MirrorName>,
    implementations: IndexMap<String, MirrorName>,
    prefixes: Vec<String>,
}

impl NameMapping {
    /// Assign a mirror name to every scanned type.
    ///
    /// Types are processed by nesting depth so that an enclosing type is
    /// always named before its members.
    pub fn build(types: &[&TypeDescriptor], config: &Config) -> Self {
        let mut mapping = NameMapping {
            prefixes: config.packages().iter().map(|p| p.prefix.clone()).collect(),
            ..Self::default()
        };
        let mut taken: HashSet<String> = HashSet::new();

        let mut ordered = types.to_vec();
        ordered.sort_by(|a, b| a.depth().cmp(&b.depth()).then_with(|| a.name.cmp(&b.name)));

        let max_depth = ordered.iter().map(|t| t.depth()).max().unwrap_or(0);
        for depth in 0..=max_depth {
            let mut namespaces: IndexMap<(String, Vec<String>), Vec<&TypeDescriptor>> =
                IndexMap::new();
            for ty in ordered.iter().filter(|t| t.depth() == depth) {
                let parent = match &ty.enclosing {
                    None => match config.target_package(ty.package()) {
                        Some(package) => (package, Vec::new()),
                        None => continue,
                    },
                    Some(enclosing) => match mapping.mirrors.get(enclosing) {
                        Some(m) => (m.package.clone(), m.path.clone()),
                        None => continue,
                    },
                };
                namespaces.entry(parent).or_default().push(*ty);
            }

            for ((package, parent_path), members) in namespaces {
                mapping.assign_namespace(&package, &parent_path, &members, config, &mut taken);
            }
        }

        mapping
    }

    fn assign_namespace(
        &mut self,
        package: &str,
        parent_path: &[String],
        members: &[&TypeDescriptor],
        config: &Config,
        taken: &mut HashSet<String>,
    ) {
        let base = |ty: &TypeDescriptor| format!("{}{}", ty.simple_name(), config.mirror_suffix);
        let reserved: HashSet<String> = members
            .iter()
            .filter(|t| t.is_interface())
            .map(|t| format!("{}{}", base(*t), config.impl_suffix))
            .collect();
        // A member type may not share its enclosing type's name.
        let mut used: HashSet<String> = parent_path.iter().cloned().collect();

        let full = |simple: &str| {
            let mut path = parent_path.to_vec();
            path.push(simple.to_string());
            MirrorName {
                package: package.to_string(),
                path,
            }
        };

        for &ty in members {
            let name = unique_name(&base(ty), |candidate| {
                !used.contains(candidate)
                    && !reserved.contains(candidate)
                    && !taken.contains(&full(candidate).canonical())
            });
            used.insert(name.clone());
            let mirror = full(&name);
            taken.insert(mirror.canonical());
            self.mirrors.insert(ty.name.clone(), mirror);
        }

        for ty in members.iter().filter(|t| t.is_interface()) {
            let wanted = format!("{}{}", self.mirrors[&ty.name].simple(), config.impl_suffix);
            let name = unique_name(&wanted, |candidate| {
                !used.contains(candidate) && !taken.contains(&full(candidate).canonical())
            });
            used.insert(name.clone());
            let implementation = full(&name);
            taken.insert(implementation.canonical());
            self.implementations.insert(ty.name.clone(), implementation);
        }
    }

    pub fn get(&self, original: &str) -> Option<&MirrorName> {
        self.mirrors.get(original)
    }

    pub fn implementation(&self, original: &str) -> Option<&MirrorName> {
        self.implementations.get(original)
    }

    pub fn is_mirrored(&self, original: &str) -> bool {
        self.mirrors.contains_key(original)
    }

    /// Whether a reference points at a mirrored class (through arrays).
    pub fn is_mirror_type(&self, ty: &TypeReference) -> bool {
        match ty {
            TypeReference::Array(element) => self.is_mirror_type(element),
            _ => ty.class_name().is_some_and(|name| self.is_mirrored(name)),
        }
    }

    /// Source name to use for an original class name.
    ///
    /// Classes outside every mirrored prefix keep their own name; a class
    /// under a mirrored prefix without a mapping is unresolved.
    pub fn resolve(&self, original: &str) -> Result<String, GenError> {
        if let Some(mirror) = self.mirrors.get(original) {
            return Ok(mirror.canonical());
        }
        let package = package_of(original);
        if self.prefixes.iter().any(|p| is_under(package, p)) {
            return Err(GenError::UnresolvedType(original.to_string()));
        }
        Ok(canonical(original))
    }

    /// Rewrite a reference into mirror space.
    pub fn mirror_type(&self, ty: &TypeReference) -> Result<TypeReference, GenError> {
        ty.try_rename(&mut |name| self.resolve(name))
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &MirrorName)> {
        self.mirrors.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.mirrors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.mirrors.is_empty()
    }

    pub fn to_manifest(&self) -> Manifest {
        Manifest {
            types: self
                .mirrors
                .iter()
                .map(|(k, v)| (k.clone(), v.canonical()))
                .collect(),
            implementations: self
                .implementations
                .iter()
                .map(|(k, v)| (k.clone(), v.canonical()))
                .collect(),
        }
    }
}

/// `base` if free, otherwise `base` followed by the smallest free counter from 0.
fn unique_name(base: &str, is_free: impl Fn(&str) -> bool) -> String {
    if is_free(base) {
        return base.to_string();
    }

    let mut counter = 0;
    loop {
        let name = format!("{}{}", base, counter);
        if is_free(&name) {
            return name;
        }
        counter += 1;
    }
}
