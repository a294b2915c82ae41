//! Java source rendering of [`TypeDefinition`]s.
//!
//! Every type name is written fully qualified, so files need no imports and
//! mirror names can never be shadowed.

use mirror_core::TypeReference;

use super::ir::{
    Access, ConstructorBody, ConstructorDef, DefinitionKind, Dispatch, FieldDef, Forward,
    MethodDef, Modifiers, ParamDef, SuperArg, TypeDefinition, TypeParamDef,
};

const INDENT: &str = "    ";

/// Render a top-level definition as a complete compilation unit.
pub fn render_file(def: &TypeDefinition, bridge: &str) -> String {
    let mut renderer = Renderer {
        bridge,
        output: String::new(),
        depth: 0,
    };
    renderer.output.push_str(&format!(
        "// Generated mirror of {}. Do not edit.\n",
        def.original.replace('$', ".")
    ));
    if !def.name.package.is_empty() {
        renderer
            .output
            .push_str(&format!("package {};\n", def.name.package));
    }
    renderer.output.push('\n');
    renderer.render_type(def);
    renderer.output
}

struct Renderer<'a> {
    bridge: &'a str,
    output: String,
    depth: usize,
}

impl Renderer<'_> {
    fn line(&mut self, text: &str) {
        if !text.is_empty() {
            for _ in 0..self.depth {
                self.output.push_str(INDENT);
            }
            self.output.push_str(text);
        }
        self.output.push('\n');
    }

    fn render_type(&mut self, def: &TypeDefinition) {
        for annotation in &def.annotations {
            self.line(&format!("@{annotation}"));
        }
        self.line(&format!("{} {{", self.type_header(def)));
        self.depth += 1;

        let mut first = true;
        let mut separate = |r: &mut Self| {
            if !first {
                r.line("");
            }
            first = false;
        };

        let has_body = !def.fields.is_empty()
            || !def.constructors.is_empty()
            || !def.methods.is_empty()
            || !def.members.is_empty();
        if def.kind == DefinitionKind::Enum && (!def.constants.is_empty() || has_body) {
            separate(self);
            if def.constants.is_empty() {
                self.line(";");
            }
            let last = def.constants.len().saturating_sub(1);
            for (i, constant) in def.constants.iter().enumerate() {
                let end = if i < last { "," } else { ";" };
                self.line(&format!("{constant}{end}"));
            }
        }
        for field in &def.fields {
            separate(self);
            self.render_field(field, def.kind);
        }
        for ctor in &def.constructors {
            separate(self);
            self.render_constructor(ctor, def.name.simple());
        }
        for method in &def.methods {
            separate(self);
            self.render_method(method);
        }
        for member in &def.members {
            separate(self);
            self.render_type(member);
        }

        self.depth -= 1;
        self.line("}");
    }

    fn type_header(&self, def: &TypeDefinition) -> String {
        let keyword = match def.kind {
            DefinitionKind::Interface => "interface",
            DefinitionKind::Class => "class",
            DefinitionKind::Enum => "enum",
            DefinitionKind::Record => "record",
            DefinitionKind::Annotation => "@interface",
        };
        let mut header = format!(
            "{}{} {}{}",
            modifiers(&def.modifiers),
            keyword,
            def.name.simple(),
            type_params(&def.type_params)
        );

        if def.kind == DefinitionKind::Record {
            let components: Vec<String> = def.components.iter().map(param).collect();
            header.push_str(&format!("({})", components.join(", ")));
        }
        if let Some(superclass) = &def.superclass {
            header.push_str(&format!(" extends {superclass}"));
        }
        if !def.interfaces.is_empty() {
            let keyword = match def.kind {
                DefinitionKind::Interface => "extends",
                _ => "implements",
            };
            header.push_str(&format!(" {keyword} {}", join(&def.interfaces)));
        }
        header
    }

    fn render_field(&mut self, field: &FieldDef, owner_kind: DefinitionKind) {
        for annotation in &field.annotations {
            self.line(&format!("@{annotation}"));
        }
        let mut mods = field.modifiers;
        if owner_kind == DefinitionKind::Interface {
            mods.is_static = true;
            mods.is_final = true;
        }
        // Instance fields are fetched by the constructors.
        if !mods.is_static {
            self.line(&format!("{}{} {};", modifiers(&mods), field.ty, field.name));
            return;
        }
        self.line(&format!(
            "{}{} {} = {}.handleStaticField({}, {});",
            modifiers(&mods),
            field.ty,
            field.name,
            self.bridge,
            quote(&field.name),
            quote(&field.owner)
        ));
    }

    fn render_constructor(&mut self, ctor: &ConstructorDef, name: &str) {
        for annotation in &ctor.annotations {
            self.line(&format!("@{annotation}"));
        }
        let signature = if ctor.compact {
            format!("{}{}", modifiers(&ctor.modifiers), name)
        } else {
            format!("{}{}({})", modifiers(&ctor.modifiers), name, params(&ctor.params))
        };

        let mut setup = Vec::new();
        let mut guarded = false;
        match &ctor.body {
            ConstructorBody::TrackNew {
                owner,
                args,
                guarded: guard,
            } => {
                let mut call_args = vec!["this".to_string(), quote(owner)];
                call_args.extend(args.iter().cloned());
                setup.push(format!("{}.trackNew({});", self.bridge, call_args.join(", ")));
                guarded = *guard;
            }
            ConstructorBody::BindConstant { owner } => {
                setup.push(format!(
                    "{}.bindStaticField(this, {}, name());",
                    self.bridge,
                    quote(owner)
                ));
            }
            ConstructorBody::Empty => {}
        }
        for field in &ctor.fields {
            setup.push(format!(
                "this.{} = {}.handleField({}, {}, this);",
                field.name,
                self.bridge,
                quote(&field.name),
                quote(&field.owner)
            ));
        }

        let super_call = ctor.super_args.as_ref().map(|args| {
            let args: Vec<String> = args.iter().map(|a| self.super_arg(a)).collect();
            format!("super({});", args.join(", "))
        });
        if super_call.is_none() && setup.is_empty() {
            self.line(&format!("{signature} {{}}"));
            return;
        }
        self.line(&format!("{signature} {{"));
        self.depth += 1;
        if let Some(call) = &super_call {
            self.line(call);
        }
        if guarded && !setup.is_empty() {
            self.line(&format!("if (getClass() == {name}.class) {{"));
            self.depth += 1;
        }
        for statement in &setup {
            self.line(statement);
        }
        if guarded && !setup.is_empty() {
            self.depth -= 1;
            self.line("}");
        }
        self.depth -= 1;
        self.line("}");
    }

    fn render_method(&mut self, method: &MethodDef) {
        for annotation in &method.annotations {
            self.line(&format!("@{annotation}"));
        }
        let tps = type_params(&method.type_params);
        let signature = format!(
            "{}{}{} {}({})",
            modifiers(&method.modifiers),
            if tps.is_empty() { String::new() } else { format!("{tps} ") },
            method.returns,
            method.name,
            params(&method.params)
        );

        let Some(forward) = &method.body else {
            self.line(&format!("{signature};"));
            return;
        };
        self.line(&format!("{signature} {{"));
        self.depth += 1;
        let call = self.forward(forward);
        if method.returns.is_void() {
            self.line(&format!("{call};"));
        } else {
            self.line(&format!("return {call};"));
        }
        self.depth -= 1;
        self.line("}");
    }

    fn forward(&self, forward: &Forward) -> String {
        let mut args = vec![quote(&forward.member), quote(&forward.owner)];
        let entry = match forward.dispatch {
            Dispatch::Instance => {
                args.push("this".to_string());
                "handle"
            }
            Dispatch::Static => "handleStatic",
        };
        args.extend(forward.args.iter().cloned());
        format!("{}.{}({})", self.bridge, entry, args.join(", "))
    }

    fn super_arg(&self, arg: &SuperArg) -> String {
        match arg {
            SuperArg::Literal(literal) => literal.to_string(),
            SuperArg::Placeholder { ty, erased } => {
                format!("({ty}) {}.placeholder({erased}.class)", self.bridge)
            }
            SuperArg::EmptyArray { ty, erased } => {
                format!("({ty}) new {}", empty_array(erased))
            }
        }
    }
}

fn modifiers(mods: &Modifiers) -> String {
    let mut out = String::new();
    match mods.access {
        Access::Public => out.push_str("public "),
        Access::Protected => out.push_str("protected "),
        Access::Private => out.push_str("private "),
    }
    if mods.is_abstract {
        out.push_str("abstract ");
    }
    if mods.is_default {
        out.push_str("default ");
    }
    if mods.is_static {
        out.push_str("static ");
    }
    if mods.is_final {
        out.push_str("final ");
    }
    out
}

fn type_params(params: &[TypeParamDef]) -> String {
    if params.is_empty() {
        return String::new();
    }
    let rendered: Vec<String> = params
        .iter()
        .map(|p| {
            if p.bounds.is_empty() {
                p.name.clone()
            } else {
                let bounds: Vec<String> = p.bounds.iter().map(ToString::to_string).collect();
                format!("{} extends {}", p.name, bounds.join(" & "))
            }
        })
        .collect();
    format!("<{}>", rendered.join(", "))
}

fn param(p: &ParamDef) -> String {
    let mut out = String::new();
    for annotation in &p.annotations {
        out.push_str(&format!("@{annotation} "));
    }
    match (&p.ty, p.varargs) {
        (TypeReference::Array(element), true) => out.push_str(&format!("{element}... ")),
        (ty, _) => out.push_str(&format!("{ty} ")),
    }
    out.push_str(&p.name);
    out
}

fn params(params: &[ParamDef]) -> String {
    params.iter().map(param).collect::<Vec<_>>().join(", ")
}

fn join(types: &[TypeReference]) -> String {
    types
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// `int[][]` becomes `int[0][]`.
fn empty_array(erased: &TypeReference) -> String {
    let mut dims = 0;
    let mut element = erased;
    while let TypeReference::Array(inner) = element {
        dims += 1;
        element = inner;
    }
    format!("{element}[0]{}", "[]".repeat(dims.max(1) - 1))
}

fn quote(s: &str) -> String {
    format!("\"{}\"", s.replace('\\', "\\\\").replace('"', "\\\""))
}
