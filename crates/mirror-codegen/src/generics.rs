//! Generic substitution across inheritance chains.

use std::collections::VecDeque;

use indexmap::IndexMap;
use mirror_core::{Bindings, Catalog, TypeDescriptor, TypeReference};

/// Bindings for one ancestor, seen from the type the map was resolved for.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Ancestor {
    pub bindings: Bindings,
    /// Inheritance distance: 1 for direct supertypes.
    pub depth: usize,
}

/// Per-ancestor type-variable bindings, nearest ancestors first.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SubstitutionMap {
    ancestors: IndexMap<String, Ancestor>,
}

impl SubstitutionMap {
    /// Walk every ancestor of `ty` reachable through the catalog.
    ///
    /// The walk is breadth-first, so an ancestor reachable through several
    /// paths keeps the bindings of the shortest one. Raw supertypes bind
    /// nothing; ancestors missing from the catalog end their branch.
    pub fn resolve(catalog: &Catalog, ty: &TypeDescriptor, universal_root: &str) -> Self {
        let mut ancestors: IndexMap<String, Ancestor> = IndexMap::new();
        let mut queue = VecDeque::from([(ty, Bindings::new(), 0usize)]);

        while let Some((current, bindings, depth)) = queue.pop_front() {
            for supertype in current.supertypes() {
                let Some(raw) = supertype.class_name() else {
                    continue;
                };
                if raw == universal_root || raw == ty.name || ancestors.contains_key(raw) {
                    continue;
                }
                let Some(ancestor) = catalog.get(raw) else {
                    continue;
                };

                let args: &[TypeReference] = match supertype {
                    TypeReference::Parameterized { args, .. } => args,
                    _ => &[],
                };
                let own: Bindings = ancestor
                    .type_params
                    .iter()
                    .zip(args)
                    .map(|(param, arg)| (param.name.clone(), arg.substitute(&bindings)))
                    .collect();

                ancestors.insert(
                    raw.to_string(),
                    Ancestor {
                        bindings: own.clone(),
                        depth: depth + 1,
                    },
                );
                queue.push_back((ancestor, own, depth + 1));
            }
        }

        Self { ancestors }
    }

    pub fn get(&self, ancestor: &str) -> Option<&Ancestor> {
        self.ancestors.get(ancestor)
    }

    pub fn bindings(&self, ancestor: &str) -> Option<&Bindings> {
        self.ancestors.get(ancestor).map(|a| &a.bindings)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Ancestor)> {
        self.ancestors.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.ancestors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ancestors.is_empty()
    }
}
