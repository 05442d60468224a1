//! Java source rendering for top-level types.

use std::fmt::Write as _;

use crate::code_model::{CodeModel, DefinedType, Method, TypeHandle};
use crate::types::{AnnotationUse, AnnotationValue, Modifier, TypeKind, TypeRef};

const INDENT: &str = "    ";

/// Renders defined types of a [`CodeModel`] as Java source.
pub struct JavaWriter<'a> {
    model: &'a CodeModel,
}

impl<'a> JavaWriter<'a> {
    /// Create a writer over `model`.
    pub fn new(model: &'a CodeModel) -> Self { Self { model } }

    /// Render the compilation unit of a top-level type.
    pub fn render(&self, handle: TypeHandle) -> String {
        let ty = self.model.get(handle);
        let mut out = String::new();
        if !ty.package().is_empty() {
            out.push_str(&format!("\npackage {};\n\n", ty.package()));
        }
        self.render_type(&mut out, handle, 0);
        out
    }

    fn render_type(&self, out: &mut String, handle: TypeHandle, depth: usize) {
        let ty = self.model.get(handle);
        let pad = INDENT.repeat(depth);
        let package = ty.package();

        render_doc(out, &pad, ty.doc());
        for annotation in ty.annotations() {
            let _ = writeln!(out, "{}{}", pad, render_annotation(annotation, package));
        }
        let mut header = modifiers(&ty.modifiers);
        header.push_str(ty.kind().keyword());
        header.push(' ');
        header.push_str(ty.name());
        if let Some(superclass) = ty.superclass() {
            let _ = write!(header, " extends {}", render_type_ref(superclass, package));
        }
        let _ = writeln!(out, "{}{} {{", pad, header);

        let inner = INDENT.repeat(depth + 1);
        if ty.kind() == TypeKind::Enum && !ty.enum_constants().is_empty() {
            out.push('\n');
            let constants = ty.enum_constants().join(&format!(",\n{}", inner));
            let _ = writeln!(out, "{}{};", inner, constants);
        }
        for field in ty.fields() {
            out.push('\n');
            render_doc(out, &inner, &field.doc);
            for annotation in field.annotations() {
                let _ = writeln!(out, "{}{}", inner, render_annotation(annotation, package));
            }
            let _ = writeln!(
                out,
                "{}{}{} {};",
                inner,
                modifiers(&field.modifiers),
                render_type_ref(field.type_ref(), package),
                field.name()
            );
        }
        for method in ty.methods() {
            out.push('\n');
            self.render_method(out, method, ty, depth + 1);
        }
        for nested in ty.nested() {
            out.push('\n');
            self.render_type(out, *nested, depth + 1);
        }
        let _ = writeln!(out, "\n{}}}", pad);
    }

    fn render_method(&self, out: &mut String, method: &Method, owner: &DefinedType, depth: usize) {
        let pad = INDENT.repeat(depth);
        let package = owner.package();

        render_doc(out, &pad, method.doc());
        for annotation in method.annotations() {
            let _ = writeln!(out, "{}{}", pad, render_annotation(annotation, package));
        }
        let params: Vec<String> = method
            .params()
            .iter()
            .map(|p| {
                let mut rendered = String::new();
                for annotation in p.annotations() {
                    rendered.push_str(&render_annotation(annotation, package));
                    rendered.push(' ');
                }
                let _ = write!(rendered, "{} {}", render_type_ref(p.type_ref(), package), p.name());
                rendered
            })
            .collect();
        let signature = match method.return_type() {
            Some(ret) => format!("{} {}", render_type_ref(ret, package), method.name()),
            None => method.name().to_string(),
        };
        let head = format!("{}{}{}({})", pad, modifiers(method.modifiers()), signature, params.join(", "));
        match method.body() {
            None => {
                let _ = writeln!(out, "{};", head);
            }
            Some(lines) => {
                let _ = writeln!(out, "{} {{", head);
                for line in lines {
                    let _ = writeln!(out, "{}{}{}", pad, INDENT, line);
                }
                let _ = writeln!(out, "{}}}", pad);
            }
        }
    }
}

fn modifiers(modifiers: &[Modifier]) -> String {
    let mut sorted = modifiers.to_vec();
    sorted.sort();
    sorted.dedup();
    sorted.iter().map(|m| format!("{} ", m.keyword())).collect()
}

fn render_doc(out: &mut String, pad: &str, doc: &[String]) {
    if doc.is_empty() {
        return;
    }
    let _ = writeln!(out, "{}/**", pad);
    for line in doc {
        if line.is_empty() {
            let _ = writeln!(out, "{} *", pad);
        } else {
            let _ = writeln!(out, "{} * {}", pad, line.replace("*/", "*&#47;"));
        }
    }
    let _ = writeln!(out, "{} */", pad);
}

/// Render a type reference as seen from a compilation unit in `package`.
///
/// `java.lang` types and types of the same package are written with their
/// short names; everything else is fully qualified.
pub fn render_type_ref(type_ref: &TypeRef, package: &str) -> String {
    match type_ref {
        TypeRef::Primitive(p) => p.keyword().to_string(),
        TypeRef::Class { name, args } => {
            let mut rendered = shorten(name, package).to_string();
            if !args.is_empty() {
                let args: Vec<String> = args.iter().map(|a| render_type_ref(a, package)).collect();
                let _ = write!(rendered, "<{}>", args.join(", "));
            }
            rendered
        }
    }
}

fn shorten<'n>(name: &'n str, package: &str) -> &'n str {
    if let Some(rest) = name.strip_prefix("java.lang.") {
        if !rest.contains('.') {
            return rest;
        }
    }
    if !package.is_empty() {
        if let Some(rest) = name.strip_prefix(package).and_then(|r| r.strip_prefix('.')) {
            if rest.starts_with(|c: char| c.is_ascii_uppercase()) {
                return rest;
            }
        }
    }
    name
}

/// Render an annotation as seen from a compilation unit in `package`.
pub fn render_annotation(annotation: &AnnotationUse, package: &str) -> String {
    let name = render_type_ref(&annotation.annotation, package);
    match annotation.params.as_slice() {
        [] => format!("@{}", name),
        [(member, value)] if member == "value" => {
            format!("@{}({})", name, render_value(value, package))
        }
        params => {
            let members: Vec<String> = params
                .iter()
                .map(|(member, value)| format!("{} = {}", member, render_value(value, package)))
                .collect();
            format!("@{}({})", name, members.join(", "))
        }
    }
}

fn render_value(value: &AnnotationValue, package: &str) -> String {
    match value {
        AnnotationValue::Str(s) => quote(s),
        AnnotationValue::Int(i) => i.to_string(),
        AnnotationValue::Bool(b) => b.to_string(),
        AnnotationValue::EnumConstant { owner, name } => {
            format!("{}.{}", render_type_ref(owner, package), name)
        }
        AnnotationValue::Class(ty) => format!("{}.class", render_type_ref(ty, package)),
        AnnotationValue::Array(values) if values.len() == 1 => render_value(&values[0], package),
        AnnotationValue::Array(values) => {
            let values: Vec<String> = values.iter().map(|v| render_value(v, package)).collect();
            format!("{{{}}}", values.join(", "))
        }
    }
}

/// Quote and escape a string literal.
pub fn quote(s: &str) -> String {
    let mut quoted = String::with_capacity(s.len() + 2);
    quoted.push('"');
    for c in s.chars() {
        match c {
            '"' => quoted.push_str("\\\""),
            '\\' => quoted.push_str("\\\\"),
            '\n' => quoted.push_str("\\n"),
            '\r' => quoted.push_str("\\r"),
            '\t' => quoted.push_str("\\t"),
            c => quoted.push(c),
        }
    }
    quoted.push('"');
    quoted
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shorten() {
        assert_eq!(shorten("java.lang.String", "com.acme"), "String");
        assert_eq!(shorten("java.lang.annotation.Target", "com.acme"), "java.lang.annotation.Target");
        assert_eq!(shorten("com.acme.Users.Genre", "com.acme"), "Users.Genre");
        assert_eq!(shorten("com.acme.model.Foo", "com.acme"), "com.acme.model.Foo");
        assert_eq!(shorten("com.acmecorp.Foo", "com.acme"), "com.acmecorp.Foo");
    }

    #[test]
    fn test_render_annotation_forms() {
        let path = AnnotationUse::with_value(TypeRef::class("javax.ws.rs.Path"), "/users");
        assert_eq!(render_annotation(&path, "com.acme"), "@javax.ws.rs.Path(\"/users\")");

        let get = AnnotationUse::new(TypeRef::class("javax.ws.rs.GET"));
        assert_eq!(render_annotation(&get, "com.acme"), "@javax.ws.rs.GET");

        let produces = AnnotationUse::with_value(
            TypeRef::class("javax.ws.rs.Produces"),
            AnnotationValue::Array(vec!["application/json".into(), "text/xml".into()]),
        );
        assert_eq!(
            render_annotation(&produces, "com.acme"),
            "@javax.ws.rs.Produces({\"application/json\", \"text/xml\"})"
        );

        let multi = AnnotationUse::new(TypeRef::class("x.Y"))
            .param("a", AnnotationValue::Int(3))
            .param("b", AnnotationValue::Class(TypeRef::class("java.lang.String")));
        assert_eq!(render_annotation(&multi, "com.acme"), "@x.Y(a = 3, b = String.class)");
    }

    #[test]
    fn test_quote_escapes() {
        assert_eq!(quote("a\"b\\c\n"), "\"a\\\"b\\\\c\\n\"");
    }
}
