//! Type discovery over a catalog.

use mirror_core::{Catalog, TypeDescriptor, Visibility};

use crate::Config;

/// Types to mirror, ordered by binary name.
///
/// A type qualifies when it is public or package-visible, neither anonymous
/// nor synthetic, lives under a configured prefix, and every type enclosing
/// it qualifies too.
pub fn scan<'a>(catalog: &'a Catalog, config: &Config) -> Vec<&'a TypeDescriptor> {
    let mut found: Vec<&TypeDescriptor> = catalog
        .types()
        .filter(|ty| qualifies(catalog, ty, config))
        .collect();
    found.sort_by(|a, b| a.name.cmp(&b.name));
    found
}

fn qualifies(catalog: &Catalog, ty: &TypeDescriptor, config: &Config) -> bool {
    let visible = matches!(ty.visibility, Visibility::Public | Visibility::Package);
    if !visible || ty.anonymous || ty.synthetic || config.root_for(ty.package()).is_none() {
        return false;
    }
    match &ty.enclosing {
        None => true,
        Some(enclosing) => catalog
            .get(enclosing)
            .is_some_and(|outer| qualifies(catalog, outer, config)),
    }
}
