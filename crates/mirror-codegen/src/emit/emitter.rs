//! Builds [`TypeDefinition`]s from descriptors.

use mirror_core::{
    Annotation, Catalog, Field, Method, Parameter, TypeDescriptor, TypeKind,
    TypeParam, TypeReference, Visibility,
};

use super::ir::{
    Access, ConstructorBody, ConstructorDef, DefinitionKind, Dispatch, FieldDef, FieldInit,
    Forward, MethodDef, Modifiers, ParamDef, SuperArg, TypeDefinition, TypeParamDef,
};
use crate::generics::SubstitutionMap;
use crate::members::{Declared, MemberSelector, SelectionMode};
use crate::naming::NameMapping;
use crate::{Config, GenError};

/// A mirror definition and, for interfaces, its implementation.
#[derive(Clone, Debug, PartialEq)]
pub struct Emitted {
    pub definition: TypeDefinition,
    pub implementation: Option<TypeDefinition>,
}

pub struct Emitter<'a> {
    catalog: &'a Catalog,
    mapping: &'a NameMapping,
    config: &'a Config,
    selector: MemberSelector<'a>,
}

impl<'a> Emitter<'a> {
    pub fn new(catalog: &'a Catalog, mapping: &'a NameMapping, config: &'a Config) -> Self {
        Self {
            catalog,
            mapping,
            config,
            selector: MemberSelector::new(catalog, mapping),
        }
    }

    /// Emit one type. `members` are the already emitted definitions of its
    /// nested types.
    pub fn emit(
        &self,
        ty: &TypeDescriptor,
        members: Vec<TypeDefinition>,
    ) -> Result<Emitted, GenError> {
        let substitutions =
            SubstitutionMap::resolve(self.catalog, ty, &self.config.universal_root);

        let mut definition = match ty.kind {
            TypeKind::Interface => self.emit_interface(ty, &substitutions)?,
            TypeKind::Class => self.emit_class(ty, &substitutions)?,
            TypeKind::Enum => self.emit_enum(ty, &substitutions)?,
            TypeKind::Record => self.emit_record(ty, &substitutions)?,
            TypeKind::Annotation => self.emit_annotation(ty, &substitutions)?,
        };
        definition.members = members;

        let implementation = match ty.kind {
            TypeKind::Interface => Some(self.emit_implementation(ty, &substitutions)?),
            _ => None,
        };

        Ok(Emitted {
            definition,
            implementation,
        })
    }

    fn header(&self, ty: &TypeDescriptor, kind: DefinitionKind) -> Result<TypeDefinition, GenError> {
        let name = self
            .mapping
            .get(&ty.name)
            .ok_or_else(|| GenError::UnresolvedType(ty.name.clone()))?
            .clone();
        let mut def = TypeDefinition::new(kind, name, ty.name.clone());
        def.modifiers.is_static = ty.is_nested() && kind == DefinitionKind::Class;
        def.type_params = self.type_params(&ty.type_params)?;
        def.annotations = self.annotations(&ty.annotations)?;
        def.interfaces = ty
            .interfaces
            .iter()
            .map(|i| self.mapping.mirror_type(i))
            .collect::<Result<_, _>>()?;
        Ok(def)
    }

    fn emit_interface(
        &self,
        ty: &TypeDescriptor,
        substitutions: &SubstitutionMap,
    ) -> Result<TypeDefinition, GenError> {
        let mut def = self.header(ty, DefinitionKind::Interface)?;
        let selection = self
            .selector
            .select(ty, substitutions, SelectionMode::InterfaceShape);

        def.fields = selection
            .fields
            .iter()
            .map(|f| {
                let mut field = self.field(f)?;
                field.modifiers.is_static = true;
                field.modifiers.is_final = true;
                Ok(field)
            })
            .collect::<Result<_, GenError>>()?;
        def.methods = selection
            .methods
            .iter()
            .map(|m| {
                let body = (m.item.is_default || m.item.is_static).then(|| self.forward(m));
                let mut method = self.method(m, body)?;
                method.modifiers.is_default = m.item.is_default;
                Ok(method)
            })
            .collect::<Result<_, GenError>>()?;
        Ok(def)
    }

    /// Concrete stand-in for an interface: every inherited abstract member
    /// forwards to the bridge.
    fn emit_implementation(
        &self,
        ty: &TypeDescriptor,
        substitutions: &SubstitutionMap,
    ) -> Result<TypeDefinition, GenError> {
        let name = self
            .mapping
            .implementation(&ty.name)
            .ok_or_else(|| GenError::UnresolvedType(ty.name.clone()))?
            .clone();
        let mut def = TypeDefinition::new(DefinitionKind::Class, name, ty.name.clone());
        def.modifiers.is_static = ty.is_nested();
        def.type_params = self.type_params(&ty.type_params)?;
        def.interfaces = vec![self.self_reference(ty)?];

        let selection = self
            .selector
            .select(ty, substitutions, SelectionMode::Implementation);

        def.fields = selection
            .fields
            .iter()
            .map(|f| self.field(f))
            .collect::<Result<_, _>>()?;
        def.constructors = vec![ConstructorDef {
            modifiers: Modifiers::with_access(Access::Protected),
            params: Vec::new(),
            annotations: Vec::new(),
            super_args: None,
            compact: false,
            body: ConstructorBody::Empty,
            fields: self.field_inits(ty, &def.fields),
        }];
        def.methods = selection
            .methods
            .iter()
            .map(|m| {
                let mut method = self.method(m, Some(self.forward(m)))?;
                method.modifiers.is_abstract = false;
                Ok(method)
            })
            .collect::<Result<_, GenError>>()?;
        Ok(def)
    }

    fn emit_class(
        &self,
        ty: &TypeDescriptor,
        substitutions: &SubstitutionMap,
    ) -> Result<TypeDefinition, GenError> {
        let mut def = self.header(ty, DefinitionKind::Class)?;
        def.modifiers.is_abstract = ty.is_abstract;
        def.modifiers.is_final = ty.is_final;
        def.superclass = match &ty.superclass {
            Some(sup) if sup.class_name().is_some_and(|n| self.mapping.is_mirrored(n)) => {
                Some(self.mapping.mirror_type(sup)?)
            }
            _ => None,
        };

        let selection = self
            .selector
            .select(ty, substitutions, SelectionMode::ClassShape);
        def.fields = selection
            .fields
            .iter()
            .map(|f| self.field(f))
            .collect::<Result<_, _>>()?;

        let super_args = self.super_args(ty, substitutions)?;
        let fields = self.field_inits(ty, &def.fields);
        let track = |args: Vec<String>| ConstructorBody::TrackNew {
            owner: ty.name.clone(),
            args,
            guarded: !ty.is_final,
        };
        let constructors: Vec<ConstructorDef> = selection
            .constructors
            .iter()
            .map(|c| {
                Ok(ConstructorDef {
                    modifiers: Modifiers::with_access(access(c.visibility)),
                    params: self.params(&c.params, c.varargs)?,
                    annotations: self.annotations(&c.annotations)?,
                    super_args: super_args.clone(),
                    compact: false,
                    body: track(c.params.iter().map(|p| p.name.clone()).collect()),
                    fields: fields.clone(),
                })
            })
            .collect::<Result<_, GenError>>()?;
        def.constructors = if constructors.is_empty() {
            vec![ConstructorDef {
                modifiers: Modifiers::with_access(Access::Protected),
                params: Vec::new(),
                annotations: Vec::new(),
                super_args,
                compact: false,
                body: track(Vec::new()),
                fields,
            }]
        } else {
            constructors
        };

        def.methods = selection
            .methods
            .iter()
            .map(|m| {
                let body = (!m.item.is_abstract).then(|| self.forward(m));
                self.method(m, body)
            })
            .collect::<Result<_, _>>()?;
        Ok(def)
    }

    fn emit_enum(
        &self,
        ty: &TypeDescriptor,
        substitutions: &SubstitutionMap,
    ) -> Result<TypeDefinition, GenError> {
        let mut def = self.header(ty, DefinitionKind::Enum)?;
        def.constants = ty.enum_constants.clone();

        let selection = self
            .selector
            .select(ty, substitutions, SelectionMode::ClassShape);
        def.fields = selection
            .fields
            .iter()
            .map(|f| self.field(f))
            .collect::<Result<_, _>>()?;

        let fields = self.field_inits(ty, &def.fields);
        let bind = |params: Vec<ParamDef>| ConstructorDef {
            modifiers: Modifiers::with_access(Access::Private),
            params,
            annotations: Vec::new(),
            super_args: None,
            compact: false,
            body: ConstructorBody::BindConstant {
                owner: ty.name.clone(),
            },
            fields: fields.clone(),
        };
        def.constructors.push(bind(Vec::new()));
        for ctor in ty.constructors.iter().filter(|c| !c.synthetic && !c.params.is_empty()) {
            def.constructors.push(bind(self.params(&ctor.params, ctor.varargs)?));
        }

        // Constant-specific bodies do not exist here, so nothing stays abstract.
        def.methods = selection
            .methods
            .iter()
            .map(|m| {
                let mut method = self.method(m, Some(self.forward(m)))?;
                method.modifiers.is_abstract = false;
                Ok(method)
            })
            .collect::<Result<_, GenError>>()?;
        Ok(def)
    }

    fn emit_record(
        &self,
        ty: &TypeDescriptor,
        substitutions: &SubstitutionMap,
    ) -> Result<TypeDefinition, GenError> {
        let mut def = self.header(ty, DefinitionKind::Record)?;
        def.components = ty
            .record_components
            .iter()
            .map(|c| {
                Ok(ParamDef {
                    name: c.name.clone(),
                    ty: self.mapping.mirror_type(&c.ty)?,
                    annotations: Vec::new(),
                    varargs: false,
                })
            })
            .collect::<Result<_, GenError>>()?;
        def.constructors = vec![ConstructorDef {
            modifiers: Modifiers::default(),
            params: Vec::new(),
            annotations: Vec::new(),
            super_args: None,
            compact: true,
            body: ConstructorBody::TrackNew {
                owner: ty.name.clone(),
                args: ty.record_components.iter().map(|c| c.name.clone()).collect(),
                guarded: false,
            },
            fields: Vec::new(),
        }];

        let selection = self
            .selector
            .select(ty, substitutions, SelectionMode::ClassShape);
        def.fields = selection
            .fields
            .iter()
            .filter(|f| f.item.is_static)
            .map(|f| self.field(f))
            .collect::<Result<_, _>>()?;
        def.methods = selection
            .methods
            .iter()
            .map(|m| self.method(m, Some(self.forward(m))))
            .collect::<Result<_, _>>()?;
        Ok(def)
    }

    fn emit_annotation(
        &self,
        ty: &TypeDescriptor,
        substitutions: &SubstitutionMap,
    ) -> Result<TypeDefinition, GenError> {
        let mut def = self.header(ty, DefinitionKind::Annotation)?;
        def.interfaces.clear();
        let selection = self
            .selector
            .select(ty, substitutions, SelectionMode::InterfaceShape);
        def.methods = selection
            .methods
            .iter()
            .filter(|m| !m.item.is_static)
            .map(|m| {
                let mut method = self.method(m, None)?;
                method.modifiers.is_abstract = true;
                Ok(method)
            })
            .collect::<Result<_, GenError>>()?;
        Ok(def)
    }

    /// The type as used from its own implementation: `Mirror<T, U>`.
    fn self_reference(&self, ty: &TypeDescriptor) -> Result<TypeReference, GenError> {
        let raw = self.mapping.resolve(&ty.name)?;
        if ty.type_params.is_empty() {
            return Ok(TypeReference::Concrete(raw));
        }
        Ok(TypeReference::Parameterized {
            raw,
            args: ty
                .type_params
                .iter()
                .map(|p| TypeReference::variable(p.name.clone()))
                .collect(),
        })
    }

    /// Instance fields a constructor of `ty` fetches after registration: its
    /// own, then those of mirrored superclasses not hidden by a nearer one.
    ///
    /// Superclass constructors skip their fetches when a subclass mirror is
    /// being built, so the most derived constructor does them all.
    fn field_inits(&self, ty: &TypeDescriptor, own: &[FieldDef]) -> Vec<FieldInit> {
        let mut inits: Vec<FieldInit> = own
            .iter()
            .filter(|f| !f.modifiers.is_static)
            .map(|f| FieldInit {
                name: f.name.clone(),
                owner: f.owner.clone(),
            })
            .collect();

        let mut next = ty.superclass.as_ref().and_then(TypeReference::class_name);
        while let Some(name) = next.filter(|n| self.mapping.is_mirrored(n)) {
            let Some(parent) = self.catalog.get(name) else {
                break;
            };
            let substitutions =
                SubstitutionMap::resolve(self.catalog, parent, &self.config.universal_root);
            let selection = self
                .selector
                .select(parent, &substitutions, SelectionMode::ClassShape);
            for field in selection.fields.iter().filter(|f| !f.item.is_static) {
                if inits.iter().any(|i| i.name == field.item.name) {
                    continue;
                }
                inits.push(FieldInit {
                    name: field.item.name.clone(),
                    owner: field.owner.clone(),
                });
            }
            next = parent.superclass.as_ref().and_then(TypeReference::class_name);
        }
        inits
    }

    /// Arguments for the superclass constructor with the fewest parameters.
    ///
    /// `None` when the superclass is not mirrored or has no visible
    /// constructor (the implicit one is used).
    fn super_args(
        &self,
        ty: &TypeDescriptor,
        substitutions: &SubstitutionMap,
    ) -> Result<Option<Vec<SuperArg>>, GenError> {
        let Some(raw) = ty.superclass.as_ref().and_then(|s| s.class_name()) else {
            return Ok(None);
        };
        if !self.mapping.is_mirrored(raw) {
            return Ok(None);
        }
        let Some(parent) = self.catalog.get(raw) else {
            return Ok(None);
        };
        let Some(ctor) = parent
            .constructors
            .iter()
            .filter(|c| c.visibility.is_exported() && !c.synthetic)
            .min_by_key(|c| c.params.len())
        else {
            return Ok(None);
        };

        let bindings = substitutions.bindings(raw).cloned().unwrap_or_default();
        ctor.params
            .iter()
            .map(|p| self.super_arg(&p.ty.substitute(&bindings)))
            .collect::<Result<Vec<_>, _>>()
            .map(Some)
    }

    fn super_arg(&self, ty: &TypeReference) -> Result<SuperArg, GenError> {
        if let Some(literal) = ty.class_name().and_then(default_literal) {
            return Ok(SuperArg::Literal(literal));
        }
        let erased = self.mapping.mirror_type(&ty.erasure())?;
        let ty = self.mapping.mirror_type(ty)?;
        Ok(match erased {
            TypeReference::Array(_) => SuperArg::EmptyArray { ty, erased },
            _ => SuperArg::Placeholder { ty, erased },
        })
    }

    fn forward(&self, method: &Declared<Method>) -> Forward {
        Forward {
            dispatch: if method.item.is_static {
                Dispatch::Static
            } else {
                Dispatch::Instance
            },
            member: method.item.name.clone(),
            owner: method.owner.clone(),
            args: method.item.params.iter().map(|p| p.name.clone()).collect(),
        }
    }

    fn method(
        &self,
        declared: &Declared<Method>,
        body: Option<Forward>,
    ) -> Result<MethodDef, GenError> {
        let m = &declared.item;
        Ok(MethodDef {
            name: m.name.clone(),
            modifiers: Modifiers {
                access: access(m.visibility),
                is_abstract: body.is_none(),
                is_default: false,
                is_static: m.is_static,
                is_final: false,
            },
            type_params: self.type_params(&m.type_params)?,
            params: self.params(&m.params, m.varargs)?,
            returns: self.mapping.mirror_type(&m.returns)?,
            annotations: self.annotations(&m.annotations)?,
            body,
        })
    }

    fn field(&self, declared: &Declared<Field>) -> Result<FieldDef, GenError> {
        let f = &declared.item;
        Ok(FieldDef {
            name: f.name.clone(),
            modifiers: Modifiers {
                access: access(f.visibility),
                is_static: f.is_static,
                // Instance fields are assigned behind a runtime guard.
                is_final: f.is_final && f.is_static,
                ..Modifiers::default()
            },
            ty: self.mapping.mirror_type(&f.ty)?,
            annotations: self.annotations(&f.annotations)?,
            owner: declared.owner.clone(),
        })
    }

    fn params(&self, params: &[Parameter], varargs: bool) -> Result<Vec<ParamDef>, GenError> {
        let last = params.len().saturating_sub(1);
        params
            .iter()
            .enumerate()
            .map(|(i, p)| {
                Ok(ParamDef {
                    name: p.name.clone(),
                    ty: self.mapping.mirror_type(&p.ty)?,
                    annotations: self.annotations(&p.annotations)?,
                    varargs: varargs && i == last,
                })
            })
            .collect()
    }

    fn type_params(&self, params: &[TypeParam]) -> Result<Vec<TypeParamDef>, GenError> {
        params
            .iter()
            .map(|p| {
                Ok(TypeParamDef {
                    name: p.name.clone(),
                    bounds: p
                        .bounds
                        .iter()
                        .map(|b| self.mapping.mirror_type(b))
                        .collect::<Result<_, _>>()?,
                })
            })
            .collect()
    }

    /// Public annotations, remapped; internal JDK ones are dropped.
    fn annotations(&self, annotations: &[Annotation]) -> Result<Vec<String>, GenError> {
        annotations
            .iter()
            .filter(|a| a.public && !a.name.starts_with("jdk.internal."))
            .map(|a| self.mapping.resolve(&a.name))
            .collect()
    }
}

fn access(visibility: Visibility) -> Access {
    match visibility {
        Visibility::Protected => Access::Protected,
        Visibility::Private => Access::Private,
        Visibility::Public | Visibility::Package => Access::Public,
    }
}

fn default_literal(primitive: &str) -> Option<&'static str> {
    Some(match primitive {
        "boolean" => "false",
        "byte" => "(byte) 0",
        "short" => "(short) 0",
        "int" => "0",
        "long" => "0L",
        "float" => "0F",
        "double" => "0D",
        "char" => "'\\0'",
        _ => return None,
    })
}
