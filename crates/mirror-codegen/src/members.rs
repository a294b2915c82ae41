//! Member selection: the minimal de-duplicated member set of a type.

use std::cmp::Ordering;

use mirror_core::{
    Bindings, Catalog, Constructor, Field, Method, TypeDescriptor, TypeKind, TypeParam,
    TypeReference,
};

use crate::generics::SubstitutionMap;
use crate::naming::NameMapping;

/// Never mirrored on any type.
const BANNED: &[&str] = &[
    "getClass()",
    "notify()",
    "notifyAll()",
    "wait()",
    "wait(long)",
    "wait(long, int)",
];

/// Compiler-provided on every enum.
const BANNED_ENUM: &[&str] = &[
    "valueOf(java.lang.Class, java.lang.String)",
    "valueOf(java.lang.String)",
    "compareTo(java.lang.Object)",
    "compareTo(java.lang.Enum)",
    "hashCode()",
    "name()",
    "equals(java.lang.Object)",
    "describeConstable()",
    "getDeclaringClass()",
    "ordinal()",
    "values()",
];

/// Compiler-provided on every record.
const BANNED_RECORD: &[&str] = &["equals(java.lang.Object)"];

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SelectionMode {
    /// Members the type itself declares.
    InterfaceShape,
    /// Own members plus public members inherited through superclasses that
    /// are not mirrored themselves.
    ClassShape,
    /// Everything a concrete implementation must provide.
    Implementation,
}

/// A member together with where it was declared.
#[derive(Clone, Debug, PartialEq)]
pub struct Declared<T> {
    pub item: T,
    /// Binary name of the declaring type.
    pub owner: String,
    /// Inheritance distance from the selecting type.
    pub depth: usize,
}

#[derive(Clone, Debug, Default)]
pub struct Selection {
    pub methods: Vec<Declared<Method>>,
    pub fields: Vec<Declared<Field>>,
    pub constructors: Vec<Constructor>,
}

pub struct MemberSelector<'a> {
    catalog: &'a Catalog,
    mapping: &'a NameMapping,
}

impl<'a> MemberSelector<'a> {
    pub fn new(catalog: &'a Catalog, mapping: &'a NameMapping) -> Self {
        Self { catalog, mapping }
    }

    pub fn select(
        &self,
        ty: &TypeDescriptor,
        substitutions: &SubstitutionMap,
        mode: SelectionMode,
    ) -> Selection {
        let mut selection = Selection::default();

        self.collect(ty, ty, &Bindings::new(), 0, &mut selection);
        if mode == SelectionMode::ClassShape {
            self.collect_unmirrored_superclasses(ty, substitutions, &mut selection);
        }
        if mode == SelectionMode::Implementation {
            for (name, ancestor) in substitutions.iter() {
                let Some(declaring) = self.catalog.get(name) else {
                    continue;
                };
                self.collect(ty, declaring, &ancestor.bindings, ancestor.depth, &mut selection);
            }
            selection
                .methods
                .retain(|m| !m.item.is_default && !m.item.is_static);
            selection.fields.retain(|f| !f.item.is_static);
        }

        selection.constructors = ty
            .constructors
            .iter()
            .filter(|c| c.visibility.is_exported() && !c.synthetic)
            .cloned()
            .collect();

        selection
    }

    /// Walk up the superclass chain until a mirrored class takes over.
    fn collect_unmirrored_superclasses(
        &self,
        ty: &TypeDescriptor,
        substitutions: &SubstitutionMap,
        selection: &mut Selection,
    ) {
        let mut next = ty.superclass.as_ref().and_then(TypeReference::class_name);
        while let Some(name) = next {
            if self.mapping.is_mirrored(name) {
                break;
            }
            let (Some(declaring), Some(ancestor)) =
                (self.catalog.get(name), substitutions.get(name))
            else {
                break;
            };
            self.collect(ty, declaring, &ancestor.bindings, ancestor.depth, selection);
            next = declaring.superclass.as_ref().and_then(TypeReference::class_name);
        }
    }

    fn collect(
        &self,
        selecting: &TypeDescriptor,
        declaring: &TypeDescriptor,
        bindings: &Bindings,
        depth: usize,
        selection: &mut Selection,
    ) {
        for method in &declaring.methods {
            if !method.visibility.is_exported() || method.bridge || method.synthetic {
                continue;
            }
            if is_banned(method, selecting.kind) {
                continue;
            }
            let candidate = Declared {
                item: substitute_method(method, bindings),
                owner: declaring.name.clone(),
                depth,
            };
            self.insert_method(&mut selection.methods, candidate);
        }

        for field in &declaring.fields {
            if !field.visibility.is_exported() || field.synthetic {
                continue;
            }
            if selecting.enum_constants.contains(&field.name) && depth == 0 {
                continue;
            }
            if selection.fields.iter().any(|f| f.item.name == field.name) {
                continue;
            }
            let mut item = field.clone();
            item.ty = field.ty.substitute(bindings);
            selection.fields.push(Declared {
                item,
                owner: declaring.name.clone(),
                depth,
            });
        }
    }

    /// Insert-if-absent, replacing a same member the candidate precedes.
    fn insert_method(&self, methods: &mut Vec<Declared<Method>>, candidate: Declared<Method>) {
        match methods
            .iter()
            .position(|m| m.item.same_member(&candidate.item))
        {
            Some(idx) => {
                if self.precedence(&candidate, &methods[idx]) == Ordering::Greater {
                    methods[idx] = candidate;
                }
            }
            None => methods.push(candidate),
        }
    }

    /// Total order between two same members; `Greater` means `candidate` wins.
    ///
    /// Compared in turn: mirror-typed parameters, mirror-typed return, nearer
    /// declaration, smaller rendered return type, smaller owner name.
    pub fn precedence(&self, candidate: &Declared<Method>, existing: &Declared<Method>) -> Ordering {
        let mirrored = |ty: &TypeReference| i32::from(self.mapping.is_mirror_type(ty));

        let params: i32 = candidate
            .item
            .params
            .iter()
            .zip(&existing.item.params)
            .map(|(c, e)| mirrored(&c.ty) - mirrored(&e.ty))
            .sum();
        let returns = mirrored(&candidate.item.returns) - mirrored(&existing.item.returns);

        params
            .cmp(&0)
            .then(returns.cmp(&0))
            .then(existing.depth.cmp(&candidate.depth))
            .then_with(|| {
                existing
                    .item
                    .returns
                    .to_string()
                    .cmp(&candidate.item.returns.to_string())
            })
            .then_with(|| existing.owner.cmp(&candidate.owner))
    }
}

fn is_banned(method: &Method, kind: TypeKind) -> bool {
    let signature = method.erased_signature();
    let extra: &[&str] = match kind {
        TypeKind::Enum => BANNED_ENUM,
        TypeKind::Record => BANNED_RECORD,
        _ => &[],
    };
    BANNED.iter().chain(extra).any(|b| *b == signature)
}

/// Apply ancestor bindings to a method, honoring its own type parameters.
fn substitute_method(method: &Method, bindings: &Bindings) -> Method {
    if bindings.is_empty() {
        return method.clone();
    }
    let shadowed = method.type_param_names();
    let mut out = method.clone();
    for param in &mut out.params {
        param.ty = param.ty.substitute_shadowed(bindings, &shadowed);
    }
    out.returns = method.returns.substitute_shadowed(bindings, &shadowed);
    out.type_params = method
        .type_params
        .iter()
        .map(|p| TypeParam {
            name: p.name.clone(),
            bounds: p
                .bounds
                .iter()
                .map(|b| b.substitute_shadowed(bindings, &shadowed))
                .collect(),
        })
        .collect();
    out
}
