//! Arena-backed code model.
//!
//! Handles are only meaningful for the model that created them. Passing a
//! handle to a different model panics on out-of-range access.

use std::collections::BTreeMap;
use std::io::Write;
use std::path::Path;

use crate::types::{AnnotationUse, Modifier, TypeKind, TypeRef};
use crate::writer::JavaWriter;
use crate::{ModelError, Result};

/// Handle to a defined type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TypeHandle(usize);

/// Handle to a method or constructor of a defined type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MethodHandle {
    owner: TypeHandle,
    index: usize,
}

/// Handle to a method parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ParamHandle {
    method: MethodHandle,
    index: usize,
}

/// Handle to a field of a defined type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct FieldHandle {
    owner: TypeHandle,
    index: usize,
}

impl MethodHandle {
    /// Type declaring this method.
    pub fn owner(&self) -> TypeHandle { self.owner }
}

/// Anything that can carry annotations and documentation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Target {
    /// A defined type
    Type(TypeHandle),
    /// A method or constructor
    Method(MethodHandle),
    /// A method parameter
    Param(ParamHandle),
    /// A field
    Field(FieldHandle),
}

impl From<TypeHandle> for Target {
    fn from(handle: TypeHandle) -> Self { Target::Type(handle) }
}

impl From<MethodHandle> for Target {
    fn from(handle: MethodHandle) -> Self { Target::Method(handle) }
}

impl From<ParamHandle> for Target {
    fn from(handle: ParamHandle) -> Self { Target::Param(handle) }
}

impl From<FieldHandle> for Target {
    fn from(handle: FieldHandle) -> Self { Target::Field(handle) }
}

/// A type declared in the model.
#[derive(Debug, Clone)]
pub struct DefinedType {
    pub(crate) name: String,
    pub(crate) package: String,
    pub(crate) fqn: String,
    pub(crate) kind: TypeKind,
    pub(crate) outer: Option<TypeHandle>,
    pub(crate) modifiers: Vec<Modifier>,
    pub(crate) superclass: Option<TypeRef>,
    pub(crate) doc: Vec<String>,
    pub(crate) annotations: Vec<AnnotationUse>,
    pub(crate) fields: Vec<Field>,
    pub(crate) methods: Vec<Method>,
    pub(crate) enum_constants: Vec<String>,
    pub(crate) nested: Vec<TypeHandle>,
}

impl DefinedType {
    /// Simple name.
    pub fn name(&self) -> &str { &self.name }

    /// Package the type belongs to.
    pub fn package(&self) -> &str { &self.package }

    /// Fully-qualified name, including enclosing types.
    pub fn fully_qualified_name(&self) -> &str { &self.fqn }

    /// Declaration kind.
    pub fn kind(&self) -> TypeKind { self.kind }

    /// Enclosing type, for nested types.
    pub fn outer(&self) -> Option<TypeHandle> { self.outer }

    /// Superclass, if any.
    pub fn superclass(&self) -> Option<&TypeRef> { self.superclass.as_ref() }

    /// Documentation lines.
    pub fn doc(&self) -> &[String] { &self.doc }

    /// Annotations in application order.
    pub fn annotations(&self) -> &[AnnotationUse] { &self.annotations }

    /// Fields in declaration order.
    pub fn fields(&self) -> &[Field] { &self.fields }

    /// Methods and constructors in declaration order.
    pub fn methods(&self) -> &[Method] { &self.methods }

    /// Enum constants in insertion order.
    pub fn enum_constants(&self) -> &[String] { &self.enum_constants }

    /// Nested types in declaration order.
    pub fn nested(&self) -> &[TypeHandle] { &self.nested }
}

/// A method, or a constructor when `return_type` is `None`.
#[derive(Debug, Clone)]
pub struct Method {
    pub(crate) name: String,
    pub(crate) return_type: Option<TypeRef>,
    pub(crate) modifiers: Vec<Modifier>,
    pub(crate) params: Vec<Param>,
    pub(crate) annotations: Vec<AnnotationUse>,
    pub(crate) doc: Vec<String>,
    pub(crate) body: Option<Vec<String>>,
}

impl Method {
    /// Method name (the declaring type's name for constructors).
    pub fn name(&self) -> &str { &self.name }

    /// Return type; `None` for constructors.
    pub fn return_type(&self) -> Option<&TypeRef> { self.return_type.as_ref() }

    /// Modifiers.
    pub fn modifiers(&self) -> &[Modifier] { &self.modifiers }

    /// Parameters in declaration order.
    pub fn params(&self) -> &[Param] { &self.params }

    /// Annotations in application order.
    pub fn annotations(&self) -> &[AnnotationUse] { &self.annotations }

    /// Documentation lines.
    pub fn doc(&self) -> &[String] { &self.doc }

    /// Body statements; `None` for abstract and interface methods.
    pub fn body(&self) -> Option<&[String]> { self.body.as_deref() }
}

/// A method parameter.
#[derive(Debug, Clone)]
pub struct Param {
    pub(crate) name: String,
    pub(crate) type_ref: TypeRef,
    pub(crate) annotations: Vec<AnnotationUse>,
}

impl Param {
    /// Parameter name.
    pub fn name(&self) -> &str { &self.name }

    /// Parameter type.
    pub fn type_ref(&self) -> &TypeRef { &self.type_ref }

    /// Annotations in application order.
    pub fn annotations(&self) -> &[AnnotationUse] { &self.annotations }
}

/// A field of a class.
#[derive(Debug, Clone)]
pub struct Field {
    pub(crate) name: String,
    pub(crate) type_ref: TypeRef,
    pub(crate) modifiers: Vec<Modifier>,
    pub(crate) annotations: Vec<AnnotationUse>,
    pub(crate) doc: Vec<String>,
}

impl Field {
    /// Field name.
    pub fn name(&self) -> &str { &self.name }

    /// Field type.
    pub fn type_ref(&self) -> &TypeRef { &self.type_ref }

    /// Annotations in application order.
    pub fn annotations(&self) -> &[AnnotationUse] { &self.annotations }
}

/// The in-memory output model.
#[derive(Debug, Default)]
pub struct CodeModel {
    types: Vec<DefinedType>,
    by_name: BTreeMap<String, TypeHandle>,
}

impl CodeModel {
    /// Create an empty model.
    pub fn new() -> Self { Self::default() }

    /// Number of defined types, nested ones included.
    pub fn len(&self) -> usize { self.types.len() }

    /// Whether no type has been defined.
    pub fn is_empty(&self) -> bool { self.types.is_empty() }

    /// Define a public top-level type in `package`.
    pub fn define_type(&mut self, package: &str, name: &str, kind: TypeKind) -> Result<TypeHandle> {
        let fqn = if package.is_empty() { name.to_string() } else { format!("{}.{}", package, name) };
        self.insert(package, name, fqn, kind, None)
    }

    /// Define a public type nested in `outer`.
    pub fn define_nested(
        &mut self,
        outer: TypeHandle,
        name: &str,
        kind: TypeKind,
    ) -> Result<TypeHandle> {
        let (package, fqn) = {
            let outer = self.get(outer);
            (outer.package.clone(), format!("{}.{}", outer.fqn, name))
        };
        let handle = self.insert(&package, name, fqn, kind, Some(outer))?;
        self.get_mut(outer).nested.push(handle);
        Ok(handle)
    }

    fn insert(
        &mut self,
        package: &str,
        name: &str,
        fqn: String,
        kind: TypeKind,
        outer: Option<TypeHandle>,
    ) -> Result<TypeHandle> {
        if self.by_name.contains_key(&fqn) {
            return Err(ModelError::TypeAlreadyExists(fqn));
        }
        let handle = TypeHandle(self.types.len());
        self.types.push(DefinedType {
            name: name.to_string(),
            package: package.to_string(),
            fqn: fqn.clone(),
            kind,
            outer,
            modifiers: vec![Modifier::Public],
            superclass: None,
            doc: vec![],
            annotations: vec![],
            fields: vec![],
            methods: vec![],
            enum_constants: vec![],
            nested: vec![],
        });
        self.by_name.insert(fqn, handle);
        Ok(handle)
    }

    /// Look up a defined type by fully-qualified name.
    pub fn find_type(&self, fqn: &str) -> Option<TypeHandle> { self.by_name.get(fqn).copied() }

    /// Access a defined type.
    pub fn get(&self, handle: TypeHandle) -> &DefinedType { &self.types[handle.0] }

    /// Access a defined type, or `None` for a handle this model did not issue.
    pub fn try_get(&self, handle: TypeHandle) -> Option<&DefinedType> { self.types.get(handle.0) }

    fn get_mut(&mut self, handle: TypeHandle) -> &mut DefinedType { &mut self.types[handle.0] }

    /// Reference to a defined type.
    pub fn type_ref(&self, handle: TypeHandle) -> TypeRef { TypeRef::class(self.get(handle).fqn.clone()) }

    /// Replace the modifiers of a type.
    pub fn set_modifiers(&mut self, handle: TypeHandle, modifiers: &[Modifier]) {
        self.get_mut(handle).modifiers = modifiers.to_vec();
    }

    /// Set the superclass of a class.
    pub fn set_superclass(&mut self, handle: TypeHandle, superclass: TypeRef) {
        self.get_mut(handle).superclass = Some(superclass);
    }

    /// Append a constant to an enum.
    pub fn add_enum_constant(&mut self, handle: TypeHandle, value: &str) -> Result<()> {
        let ty = self.get_mut(handle);
        if ty.kind != TypeKind::Enum {
            return Err(ModelError::KindMismatch { name: ty.fqn.clone(), expected: "an enum" });
        }
        ty.enum_constants.push(value.to_string());
        Ok(())
    }

    /// Add a method to `owner`.
    pub fn add_method(
        &mut self,
        owner: TypeHandle,
        modifiers: &[Modifier],
        return_type: TypeRef,
        name: &str,
    ) -> MethodHandle {
        self.push_method(owner, modifiers, Some(return_type), name.to_string())
    }

    /// Add a constructor to `owner`.
    pub fn add_constructor(&mut self, owner: TypeHandle, modifiers: &[Modifier]) -> MethodHandle {
        let name = self.get(owner).name.clone();
        self.push_method(owner, modifiers, None, name)
    }

    fn push_method(
        &mut self,
        owner: TypeHandle,
        modifiers: &[Modifier],
        return_type: Option<TypeRef>,
        name: String,
    ) -> MethodHandle {
        let ty = self.get_mut(owner);
        ty.methods.push(Method {
            name,
            return_type,
            modifiers: modifiers.to_vec(),
            params: vec![],
            annotations: vec![],
            doc: vec![],
            body: None,
        });
        MethodHandle { owner, index: ty.methods.len() - 1 }
    }

    /// Replace the return type of a method.
    pub fn set_return_type(&mut self, handle: MethodHandle, return_type: TypeRef) {
        self.get_mut(handle.owner).methods[handle.index].return_type = Some(return_type);
    }

    /// Access a method.
    pub fn method(&self, handle: MethodHandle) -> &Method {
        &self.get(handle.owner).methods[handle.index]
    }

    fn method_mut(&mut self, handle: MethodHandle) -> &mut Method {
        &mut self.get_mut(handle.owner).methods[handle.index]
    }

    /// Set the body statements of a method.
    pub fn set_body(&mut self, handle: MethodHandle, lines: Vec<String>) {
        self.method_mut(handle).body = Some(lines);
    }

    /// Add a parameter to a method.
    pub fn add_param(&mut self, method: MethodHandle, type_ref: TypeRef, name: &str) -> ParamHandle {
        let m = self.method_mut(method);
        m.params.push(Param { name: name.to_string(), type_ref, annotations: vec![] });
        ParamHandle { method, index: m.params.len() - 1 }
    }

    /// Access a parameter.
    pub fn param(&self, handle: ParamHandle) -> &Param {
        &self.method(handle.method).params[handle.index]
    }

    /// Add a field to `owner`.
    pub fn add_field(
        &mut self,
        owner: TypeHandle,
        modifiers: &[Modifier],
        type_ref: TypeRef,
        name: &str,
    ) -> FieldHandle {
        let ty = self.get_mut(owner);
        ty.fields.push(Field {
            name: name.to_string(),
            type_ref,
            modifiers: modifiers.to_vec(),
            annotations: vec![],
            doc: vec![],
        });
        FieldHandle { owner, index: ty.fields.len() - 1 }
    }

    /// Access a field.
    pub fn field(&self, handle: FieldHandle) -> &Field { &self.get(handle.owner).fields[handle.index] }

    /// Apply an annotation to a target.
    pub fn annotate(&mut self, target: impl Into<Target>, annotation: AnnotationUse) {
        match target.into() {
            Target::Type(h) => self.get_mut(h).annotations.push(annotation),
            Target::Method(h) => self.method_mut(h).annotations.push(annotation),
            Target::Param(h) => {
                self.method_mut(h.method).params[h.index].annotations.push(annotation)
            }
            Target::Field(h) => self.get_mut(h.owner).fields[h.index].annotations.push(annotation),
        }
    }

    /// Annotations currently applied to a target.
    pub fn annotations(&self, target: impl Into<Target>) -> &[AnnotationUse] {
        match target.into() {
            Target::Type(h) => &self.get(h).annotations,
            Target::Method(h) => &self.method(h).annotations,
            Target::Param(h) => &self.param(h).annotations,
            Target::Field(h) => &self.field(h).annotations,
        }
    }

    /// Append a documentation line to a target. Parameters carry no documentation
    /// of their own; their lines are attached to the declaring method.
    pub fn add_doc(&mut self, target: impl Into<Target>, line: impl Into<String>) {
        let line = line.into();
        match target.into() {
            Target::Type(h) => self.get_mut(h).doc.push(line),
            Target::Method(h) => self.method_mut(h).doc.push(line),
            Target::Param(h) => self.method_mut(h.method).doc.push(line),
            Target::Field(h) => self.get_mut(h.owner).fields[h.index].doc.push(line),
        }
    }

    /// Top-level types ordered by fully-qualified name.
    pub fn top_level_types(&self) -> Vec<TypeHandle> {
        self.by_name.values().copied().filter(|h| self.get(*h).outer.is_none()).collect()
    }

    /// Write every top-level type below `out_dir` as `<package path>/<Name>.java`.
    ///
    /// Each written path, relative to `out_dir` and `/`-separated, is printed on
    /// its own line to `manifest`.
    pub fn build(&self, out_dir: &Path, manifest: &mut dyn Write) -> Result<()> {
        let writer = JavaWriter::new(self);
        for handle in self.top_level_types() {
            let ty = self.get(handle);
            let relative = if ty.package.is_empty() {
                format!("{}.java", ty.name)
            } else {
                format!("{}/{}.java", ty.package.replace('.', "/"), ty.name)
            };
            let path = out_dir.join(&relative);
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent)?;
            }
            std::fs::write(&path, writer.render(handle))?;
            writeln!(manifest, "{}", relative)?;
        }
        Ok(())
    }
}
