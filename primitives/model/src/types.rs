//! Type references, modifiers and annotation values.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Kind of a defined type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TypeKind {
    /// `interface`
    Interface,
    /// `class`
    Class,
    /// `enum`
    Enum,
    /// `@interface`
    Annotation,
}

impl TypeKind {
    /// Source keyword for declarations of this kind.
    pub fn keyword(&self) -> &'static str {
        match self {
            TypeKind::Interface => "interface",
            TypeKind::Class => "class",
            TypeKind::Enum => "enum",
            TypeKind::Annotation => "@interface",
        }
    }
}

/// Declaration modifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Modifier {
    /// `public`
    Public,
    /// `protected`
    Protected,
    /// `private`
    Private,
    /// `abstract`
    Abstract,
    /// `static`
    Static,
    /// `final`
    Final,
}

impl Modifier {
    /// Source keyword.
    pub fn keyword(&self) -> &'static str {
        match self {
            Modifier::Public => "public",
            Modifier::Protected => "protected",
            Modifier::Private => "private",
            Modifier::Abstract => "abstract",
            Modifier::Static => "static",
            Modifier::Final => "final",
        }
    }
}

/// Primitive types of the target language.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Primitive {
    /// `boolean`
    Boolean,
    /// `byte`
    Byte,
    /// `char`
    Char,
    /// `short`
    Short,
    /// `int`
    Int,
    /// `long`
    Long,
    /// `float`
    Float,
    /// `double`
    Double,
    /// `void`
    Void,
}

impl Primitive {
    /// Source keyword.
    pub fn keyword(&self) -> &'static str {
        match self {
            Primitive::Boolean => "boolean",
            Primitive::Byte => "byte",
            Primitive::Char => "char",
            Primitive::Short => "short",
            Primitive::Int => "int",
            Primitive::Long => "long",
            Primitive::Float => "float",
            Primitive::Double => "double",
            Primitive::Void => "void",
        }
    }

    /// Parse a primitive keyword.
    pub fn from_keyword(keyword: &str) -> Option<Self> {
        let primitive = match keyword {
            "boolean" => Primitive::Boolean,
            "byte" => Primitive::Byte,
            "char" => Primitive::Char,
            "short" => Primitive::Short,
            "int" => Primitive::Int,
            "long" => Primitive::Long,
            "float" => Primitive::Float,
            "double" => Primitive::Double,
            "void" => Primitive::Void,
            _ => return None,
        };
        Some(primitive)
    }

    /// Fully-qualified name of the boxed class.
    pub fn boxed_name(&self) -> &'static str {
        match self {
            Primitive::Boolean => "java.lang.Boolean",
            Primitive::Byte => "java.lang.Byte",
            Primitive::Char => "java.lang.Character",
            Primitive::Short => "java.lang.Short",
            Primitive::Int => "java.lang.Integer",
            Primitive::Long => "java.lang.Long",
            Primitive::Float => "java.lang.Float",
            Primitive::Double => "java.lang.Double",
            Primitive::Void => "java.lang.Void",
        }
    }
}

/// Reference to a type, defined in the model or not.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum TypeRef {
    /// A primitive type
    Primitive(Primitive),
    /// A class-like type by fully-qualified name, with optional type arguments
    Class {
        /// Fully-qualified name, nested types separated by `.`
        name: String,
        /// Type arguments
        args: Vec<TypeRef>,
    },
}

impl TypeRef {
    /// Reference to a class by fully-qualified name.
    pub fn class(name: impl Into<String>) -> Self { TypeRef::Class { name: name.into(), args: vec![] } }

    /// Parse a type descriptor: primitive keywords map to primitives, anything
    /// else is taken as a fully-qualified class name.
    pub fn parse(descriptor: &str) -> Self {
        let descriptor = descriptor.trim();
        match Primitive::from_keyword(descriptor) {
            Some(primitive) => TypeRef::Primitive(primitive),
            None => TypeRef::class(descriptor),
        }
    }

    /// `java.util.List<item>`
    pub fn list_of(item: TypeRef) -> Self {
        TypeRef::Class { name: "java.util.List".into(), args: vec![item.boxed()] }
    }

    /// Replace the type arguments.
    pub fn with_args(self, args: Vec<TypeRef>) -> Self {
        match self {
            TypeRef::Class { name, .. } => TypeRef::Class { name, args },
            primitive => primitive,
        }
    }

    /// Boxed equivalent of a primitive; classes are returned unchanged.
    pub fn boxed(self) -> Self {
        match self {
            TypeRef::Primitive(p) => TypeRef::class(p.boxed_name()),
            class => class,
        }
    }

    /// Whether this is a primitive type.
    pub fn is_primitive(&self) -> bool { matches!(self, TypeRef::Primitive(_)) }

    /// Fully-qualified name, without type arguments.
    pub fn fully_qualified_name(&self) -> &str {
        match self {
            TypeRef::Primitive(p) => p.keyword(),
            TypeRef::Class { name, .. } => name,
        }
    }

    /// Last segment of the fully-qualified name.
    pub fn simple_name(&self) -> &str {
        let name = self.fully_qualified_name();
        name.rsplit('.').next().unwrap_or(name)
    }
}

impl fmt::Display for TypeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeRef::Primitive(p) => write!(f, "{}", p.keyword()),
            TypeRef::Class { name, args } if args.is_empty() => write!(f, "{}", name),
            TypeRef::Class { name, args } => {
                let args: Vec<String> = args.iter().map(|a| a.to_string()).collect();
                write!(f, "{}<{}>", name, args.join(", "))
            }
        }
    }
}

/// Value of an annotation member.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum AnnotationValue {
    /// String literal
    Str(String),
    /// Integer literal
    Int(i64),
    /// Boolean literal
    Bool(bool),
    /// Constant of an enum type, e.g. `ElementType.METHOD`
    EnumConstant {
        /// Enum type
        owner: TypeRef,
        /// Constant name
        name: String,
    },
    /// Class literal, e.g. `String.class`
    Class(TypeRef),
    /// Array of values
    Array(Vec<AnnotationValue>),
}

impl From<&str> for AnnotationValue {
    fn from(value: &str) -> Self { AnnotationValue::Str(value.to_string()) }
}

impl From<String> for AnnotationValue {
    fn from(value: String) -> Self { AnnotationValue::Str(value) }
}

/// An annotation applied to a declaration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnnotationUse {
    /// Annotation type
    pub annotation: TypeRef,
    /// Members in declaration order
    pub params: Vec<(String, AnnotationValue)>,
}

impl AnnotationUse {
    /// Annotation without members.
    pub fn new(annotation: TypeRef) -> Self { Self { annotation, params: vec![] } }

    /// Add a member.
    pub fn param(mut self, name: &str, value: impl Into<AnnotationValue>) -> Self {
        self.params.push((name.to_string(), value.into()));
        self
    }

    /// Annotation with a single `value` member.
    pub fn with_value(annotation: TypeRef, value: impl Into<AnnotationValue>) -> Self {
        Self::new(annotation).param("value", value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_special_cases_primitives() {
        assert_eq!(TypeRef::parse("int"), TypeRef::Primitive(Primitive::Int));
        assert_eq!(TypeRef::parse(" void "), TypeRef::Primitive(Primitive::Void));
        assert_eq!(TypeRef::parse("java.lang.String"), TypeRef::class("java.lang.String"));
        assert_eq!(TypeRef::parse("Integer"), TypeRef::class("Integer"));
    }

    #[test]
    fn test_display_and_names() {
        let list = TypeRef::list_of(TypeRef::Primitive(Primitive::Long));
        assert_eq!(list.to_string(), "java.util.List<java.lang.Long>");
        assert_eq!(list.simple_name(), "List");
        assert_eq!(TypeRef::class("Foo").simple_name(), "Foo");
        assert!(TypeRef::parse("double").is_primitive());
    }
}
