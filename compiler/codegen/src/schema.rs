//! Schema bridge: JSON schema documents to value classes.
//!
//! [`SchemaMapper`] is the seam the generation coordinator calls through;
//! [`JsonSchemaMapper`] is the default implementation. It understands the
//! subset of JSON schema used by REST API descriptions:
//!
//! - `type`: `object`, `array`, `string`, `integer`, `number`, `boolean`, `any`, `null`
//! - `properties`, `required` (array form, or `"required": true` on a property)
//! - `items`, `uniqueItems`
//! - `enum` on strings
//! - `$ref` to relative files, `#` and `#/json/pointer` fragments
//! - `javaType` on non-root schemas
//!
//! Objects become public classes with private fields and accessors. Nested
//! objects become further top-level classes in the same package, named after
//! their property; string enums become enums nested in the declaring class.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use config::{AnnotationStyle, SchemaGenerationConfig};
use model::{AnnotationUse, AnnotationValue, CodeModel, Modifier, Primitive, Target, TypeHandle, TypeKind, TypeRef};
use registry::NameRegistry;
use serde_json::Value;

use crate::utils::{capitalize, to_class_name, to_constant_name, to_member_name};
use crate::{CodegenError, Result};

/// Where a schema document comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SchemaLocation {
    /// A schema file on disk
    File(PathBuf),
    /// Schema text embedded in the API description
    Inline {
        /// Schema document
        document: String,
        /// Directory relative `$ref`s are resolved against
        base_dir: Option<PathBuf>,
    },
}

impl SchemaLocation {
    /// Schema stored in a file.
    pub fn file(path: impl Into<PathBuf>) -> Self { SchemaLocation::File(path.into()) }

    /// Inline schema text.
    pub fn inline(document: impl Into<String>, base_dir: Option<PathBuf>) -> Self {
        SchemaLocation::Inline { document: document.into(), base_dir }
    }
}

/// Generates value types from schema documents.
pub trait SchemaMapper {
    /// Generate the type described by `location` into `package` under `type_name`.
    ///
    /// Returns a reference to the generated type.
    fn generate(
        &mut self,
        model: &mut CodeModel,
        type_name: &str,
        package: &str,
        location: &SchemaLocation,
    ) -> Result<TypeRef>;
}

/// A loaded schema document.
struct Document {
    /// Origin shown in error messages
    id: String,
    /// Identity in the schema store; inline documents are keyed by content
    key: String,
    base_dir: Option<PathBuf>,
    root: Value,
}

impl Document {
    fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .map_err(|source| CodegenError::SchemaRead { path: path.to_path_buf(), source })?;
        let id = std::fs::canonicalize(path).unwrap_or_else(|_| path.to_path_buf());
        let base_dir = id.parent().map(Path::to_path_buf);
        let id = id.display().to_string();
        Ok(Self { key: id.clone(), base_dir, root: parse(&text, &id)?, id })
    }
}

fn parse(text: &str, origin: &str) -> Result<Value> {
    let root: Value = serde_json::from_str(text)
        .map_err(|e| CodegenError::Schema(format!("{}: {}", origin, e)))?;
    if !root.is_object() {
        return Err(CodegenError::Schema(format!("{}: schema must be a JSON object", origin)));
    }
    Ok(root)
}

/// JSON schema mapper configured once per run.
#[derive(Debug)]
pub struct JsonSchemaMapper {
    config: SchemaGenerationConfig,
    /// Types generated per `document#fragment`, so each is generated once.
    store: BTreeMap<String, TypeRef>,
    /// Class names handed out per package.
    class_names: BTreeMap<String, NameRegistry>,
    /// Store key each root type was generated from, by fully-qualified name.
    roots: BTreeMap<String, String>,
    /// `$ref` targets currently being resolved, innermost last.
    resolving: Vec<String>,
}

impl JsonSchemaMapper {
    /// Create a mapper with the given generation options.
    pub fn new(config: SchemaGenerationConfig) -> Self {
        Self {
            config,
            store: BTreeMap::new(),
            class_names: BTreeMap::new(),
            roots: BTreeMap::new(),
            resolving: Vec::new(),
        }
    }

    /// Generation options in use.
    pub fn config(&self) -> &SchemaGenerationConfig { &self.config }

    /// Number of schema documents and fragments generated so far.
    pub fn generated(&self) -> usize { self.store.len() }

    fn generate_root(
        &mut self,
        model: &mut CodeModel,
        type_name: &str,
        package: &str,
        doc: &Document,
    ) -> Result<TypeRef> {
        let key = format!("{}#", doc.key);
        if let Some(existing) = self.store.get(&key) {
            return Ok(existing.clone());
        }
        let fqn = qualify(package, type_name);
        if let Some(origin) = self.roots.get(&fqn) {
            return Err(CodegenError::Schema(format!(
                "{}: {} was already generated from a different schema ({})",
                doc.id, fqn, origin
            )));
        }
        self.names(package).reserve(type_name);
        if let Some(existing) = model.find_type(&fqn) {
            tracing::debug!("reusing existing type {}", model.get(existing).fully_qualified_name());
            let type_ref = model.type_ref(existing);
            self.store.insert(key, type_ref.clone());
            return Ok(type_ref);
        }

        let type_ref = match schema_type(&doc.root)? {
            "object" => {
                let handle = declare_class(model, package, type_name, &doc.root, self.config.annotation_style)?;
                let type_ref = model.type_ref(handle);
                self.store.insert(key.clone(), type_ref.clone());
                self.fill_class(model, doc, package, handle, &doc.root)?;
                type_ref
            }
            "string" if doc.root.get("enum").is_some() => {
                let handle = model.define_type(package, type_name, TypeKind::Enum)?;
                fill_enum(model, handle, &doc.root)?;
                let type_ref = model.type_ref(handle);
                self.store.insert(key.clone(), type_ref.clone());
                type_ref
            }
            other => {
                return Err(CodegenError::Schema(format!(
                    "{}: schema for {} must describe an object or a string enum, found {}",
                    doc.id, type_name, other
                )))
            }
        };
        self.roots.insert(fqn, key);
        tracing::debug!("generated {} from {}", type_ref, doc.id);
        Ok(type_ref)
    }

    fn names(&mut self, package: &str) -> &mut NameRegistry {
        self.class_names.entry(package.to_string()).or_default()
    }

    /// Allocate a class name in `package` not used by the mapper nor the model.
    fn unique_class_name(&mut self, model: &CodeModel, package: &str, candidate: &str) -> String {
        loop {
            let name = self.names(package).allocate(candidate);
            if model.find_type(&qualify(package, &name)).is_none() {
                return name;
            }
        }
    }

    fn map_schema(
        &mut self,
        model: &mut CodeModel,
        doc: &Document,
        package: &str,
        schema: &Value,
        name_hint: &str,
        owner: Option<TypeHandle>,
    ) -> Result<TypeRef> {
        if let Some(reference) = schema.get("$ref").and_then(Value::as_str) {
            return self.resolve_ref(model, doc, package, reference);
        }
        let kind = schema_type(schema)?;
        if let Some(java_type) = schema.get("javaType").and_then(Value::as_str) {
            if kind != "object" {
                return Ok(TypeRef::parse(java_type));
            }
        }

        match kind {
            "object" => {
                let handle = match schema.get("javaType").and_then(Value::as_str) {
                    Some(java_type) => {
                        let (java_package, name) = split_qualified(java_type);
                        if let Some(existing) = model.find_type(java_type) {
                            return Ok(model.type_ref(existing));
                        }
                        declare_class(model, java_package, name, schema, self.config.annotation_style)?
                    }
                    None => {
                        let name = self.unique_class_name(model, package, &to_class_name(name_hint));
                        declare_class(model, package, &name, schema, self.config.annotation_style)?
                    }
                };
                self.fill_class(model, doc, package, handle, schema)?;
                Ok(model.type_ref(handle))
            }
            "array" => {
                let item = match schema.get("items") {
                    Some(items) if items.is_object() => {
                        self.map_schema(model, doc, package, items, name_hint, owner)?
                    }
                    Some(Value::Array(tuple)) if !tuple.is_empty() => {
                        self.map_schema(model, doc, package, &tuple[0], name_hint, owner)?
                    }
                    _ => TypeRef::class("java.lang.Object"),
                };
                let unique = schema.get("uniqueItems").and_then(Value::as_bool).unwrap_or(false);
                if unique {
                    Ok(TypeRef::class("java.util.Set").with_args(vec![item.boxed()]))
                } else {
                    Ok(TypeRef::list_of(item))
                }
            }
            "string" if schema.get("enum").is_some() => {
                let handle = match owner {
                    Some(owner) => {
                        let candidate = to_class_name(name_hint);
                        let mut taken: Vec<String> =
                            model.get(owner).nested().iter().map(|h| model.get(*h).name().to_string()).collect();
                        taken.push(model.get(owner).name().to_string());
                        let name = NameRegistry::with_reserved(taken).allocate(&candidate);
                        model.define_nested(owner, &name, TypeKind::Enum)?
                    }
                    None => {
                        let name = self.unique_class_name(model, package, &to_class_name(name_hint));
                        model.define_type(package, &name, TypeKind::Enum)?
                    }
                };
                fill_enum(model, handle, schema)?;
                Ok(model.type_ref(handle))
            }
            "string" => Ok(string_type(schema)),
            "integer" if self.config.use_long_integers => Ok(TypeRef::class("java.lang.Long")),
            "integer" => Ok(TypeRef::class("java.lang.Integer")),
            "number" if self.config.use_double_numbers => Ok(TypeRef::class("java.lang.Double")),
            "number" => Ok(TypeRef::class("java.lang.Float")),
            "boolean" => Ok(TypeRef::class("java.lang.Boolean")),
            _ => Ok(TypeRef::class("java.lang.Object")),
        }
    }

    fn resolve_ref(
        &mut self,
        model: &mut CodeModel,
        doc: &Document,
        package: &str,
        reference: &str,
    ) -> Result<TypeRef> {
        let (file, fragment) = match reference.split_once('#') {
            Some((file, fragment)) => (file, fragment),
            None => (reference, ""),
        };
        if file.contains("://") {
            return Err(CodegenError::Schema(format!("remote $ref '{}' is not supported", reference)));
        }

        let loaded;
        let target_doc = if file.is_empty() {
            doc
        } else {
            let base = doc.base_dir.as_ref().ok_or_else(|| {
                CodegenError::Schema(format!(
                    "relative $ref '{}' in {} has no base directory to resolve against",
                    reference, doc.id
                ))
            })?;
            loaded = Document::load(&base.join(file))?;
            &loaded
        };

        let key = format!("{}#{}", target_doc.key, fragment);
        if let Some(existing) = self.store.get(&key) {
            return Ok(existing.clone());
        }
        if self.resolving.contains(&key) {
            return Err(CodegenError::Schema(format!(
                "circular $ref '{}' in {}: {}",
                reference,
                doc.id,
                self.resolving.join(" -> ")
            )));
        }

        self.resolving.push(key.clone());
        let result = self.resolve_target(model, target_doc, package, reference, file, fragment, key);
        self.resolving.pop();
        result
    }

    #[allow(clippy::too_many_arguments)]
    fn resolve_target(
        &mut self,
        model: &mut CodeModel,
        target_doc: &Document,
        package: &str,
        reference: &str,
        file: &str,
        fragment: &str,
        key: String,
    ) -> Result<TypeRef> {
        let schema = if fragment.is_empty() || fragment == "/" {
            &target_doc.root
        } else {
            target_doc.root.pointer(fragment).ok_or_else(|| {
                CodegenError::Schema(format!("$ref '{}' does not resolve in {}", reference, target_doc.id))
            })?
        };
        let hint = ref_name_hint(schema, file, fragment);

        if schema_type(schema)? == "object" && schema.get("javaType").is_none() {
            let name = self.unique_class_name(model, package, &to_class_name(&hint));
            let handle = declare_class(model, package, &name, schema, self.config.annotation_style)?;
            let type_ref = model.type_ref(handle);
            // registered before the properties so recursive references terminate
            self.store.insert(key, type_ref.clone());
            self.fill_class(model, target_doc, package, handle, schema)?;
            return Ok(type_ref);
        }
        let type_ref = self.map_schema(model, target_doc, package, schema, &hint, None)?;
        self.store.insert(key, type_ref.clone());
        Ok(type_ref)
    }

    fn fill_class(
        &mut self,
        model: &mut CodeModel,
        doc: &Document,
        package: &str,
        handle: TypeHandle,
        schema: &Value,
    ) -> Result<()> {
        let properties = match schema.get("properties") {
            None => return Ok(()),
            Some(Value::Object(properties)) => properties,
            Some(_) => {
                return Err(CodegenError::Schema(format!(
                    "{}: properties of {} must be an object",
                    doc.id,
                    model.get(handle).name()
                )))
            }
        };
        let required: Vec<&str> = schema
            .get("required")
            .and_then(Value::as_array)
            .map(|names| names.iter().filter_map(Value::as_str).collect())
            .unwrap_or_default();

        let mut members = NameRegistry::new();
        for (property, property_schema) in properties {
            let type_ref = self.map_schema(model, doc, package, property_schema, property, Some(handle))?;
            let field_name = members.allocate(&to_member_name(property));
            let field = model.add_field(handle, &[Modifier::Private], type_ref.clone(), &field_name);

            if let Some(description) = property_schema.get("description").and_then(Value::as_str) {
                model.add_doc(field, description);
            }
            let is_required = required.contains(&property.as_str())
                || property_schema.get("required").and_then(Value::as_bool).unwrap_or(false);
            if is_required {
                model.add_doc(field, "(Required)");
            }
            annotate_property(model, field, property, self.config.annotation_style);
            add_accessors(model, handle, type_ref, &field_name);
        }
        Ok(())
    }
}

impl SchemaMapper for JsonSchemaMapper {
    fn generate(
        &mut self,
        model: &mut CodeModel,
        type_name: &str,
        package: &str,
        location: &SchemaLocation,
    ) -> Result<TypeRef> {
        let doc = match location {
            SchemaLocation::File(path) => Document::load(path)?,
            SchemaLocation::Inline { document, base_dir } => {
                let id = format!("inline:{}", qualify(package, type_name));
                let root = parse(document, &id)?;
                let key = format!("inline:{}:{}", package, root);
                Document { id, key, base_dir: base_dir.clone(), root }
            }
        };
        self.generate_root(model, type_name, package, &doc)
    }
}

fn qualify(package: &str, name: &str) -> String {
    if package.is_empty() {
        name.to_string()
    } else {
        format!("{}.{}", package, name)
    }
}

fn split_qualified(fqn: &str) -> (&str, &str) {
    match fqn.rsplit_once('.') {
        Some((package, name)) => (package, name),
        None => ("", fqn),
    }
}

/// Effective `type` of a schema.
fn schema_type(schema: &Value) -> Result<&str> {
    let declared = match schema.get("type") {
        None => None,
        Some(Value::String(kind)) => Some(kind.as_str()),
        Some(Value::Array(kinds)) => kinds.iter().filter_map(Value::as_str).find(|k| *k != "null"),
        Some(other) => return Err(CodegenError::Schema(format!("unsupported type declaration {}", other))),
    };
    match declared {
        Some(kind @ ("object" | "array" | "string" | "integer" | "number" | "boolean" | "any" | "null")) => {
            Ok(kind)
        }
        Some(other) => Err(CodegenError::Schema(format!("unknown schema type '{}'", other))),
        None if schema.get("properties").is_some() => Ok("object"),
        None if schema.get("items").is_some() => Ok("array"),
        None if schema.get("enum").is_some() => Ok("string"),
        None => Ok("any"),
    }
}

fn string_type(schema: &Value) -> TypeRef {
    match schema.get("format").and_then(Value::as_str) {
        Some("date-time") => TypeRef::class("java.util.Date"),
        Some("uri") => TypeRef::class("java.net.URI"),
        Some("regex") => TypeRef::class("java.util.regex.Pattern"),
        Some("utc-millisec") => TypeRef::Primitive(Primitive::Long).boxed(),
        _ => TypeRef::class("java.lang.String"),
    }
}

fn ref_name_hint(schema: &Value, file: &str, fragment: &str) -> String {
    if let Some(title) = schema.get("title").and_then(Value::as_str) {
        return title.to_string();
    }
    if let Some(last) = fragment.rsplit('/').find(|s| !s.is_empty()) {
        return last.to_string();
    }
    let stem = Path::new(file).file_stem().and_then(|s| s.to_str()).unwrap_or(file);
    stem.split('.').next().unwrap_or(stem).to_string()
}

fn declare_class(
    model: &mut CodeModel,
    package: &str,
    name: &str,
    schema: &Value,
    style: AnnotationStyle,
) -> Result<TypeHandle> {
    let handle = model.define_type(package, name, TypeKind::Class)?;
    for key in ["title", "description"] {
        if let Some(text) = schema.get(key).and_then(Value::as_str) {
            model.add_doc(handle, text);
        }
    }
    match style {
        AnnotationStyle::Jackson1 => model.annotate(
            handle,
            AnnotationUse::new(TypeRef::class("org.codehaus.jackson.map.annotate.JsonSerialize")).param(
                "include",
                AnnotationValue::EnumConstant {
                    owner: TypeRef::class("org.codehaus.jackson.map.annotate.JsonSerialize.Inclusion"),
                    name: "NON_NULL".to_string(),
                },
            ),
        ),
        AnnotationStyle::Jackson2 => model.annotate(
            handle,
            AnnotationUse::with_value(
                TypeRef::class("com.fasterxml.jackson.annotation.JsonInclude"),
                AnnotationValue::EnumConstant {
                    owner: TypeRef::class("com.fasterxml.jackson.annotation.JsonInclude.Include"),
                    name: "NON_NULL".to_string(),
                },
            ),
        ),
        AnnotationStyle::Gson | AnnotationStyle::None => {}
    }
    Ok(handle)
}

fn annotate_property(model: &mut CodeModel, field: impl Into<Target>, property: &str, style: AnnotationStyle) {
    let field = field.into();
    match style {
        AnnotationStyle::Jackson1 => model.annotate(
            field,
            AnnotationUse::with_value(TypeRef::class("org.codehaus.jackson.annotate.JsonProperty"), property),
        ),
        AnnotationStyle::Jackson2 => model.annotate(
            field,
            AnnotationUse::with_value(TypeRef::class("com.fasterxml.jackson.annotation.JsonProperty"), property),
        ),
        AnnotationStyle::Gson => {
            model.annotate(
                field,
                AnnotationUse::with_value(TypeRef::class("com.google.gson.annotations.SerializedName"), property),
            );
            model.annotate(field, AnnotationUse::new(TypeRef::class("com.google.gson.annotations.Expose")));
        }
        AnnotationStyle::None => {}
    }
}

fn add_accessors(model: &mut CodeModel, owner: TypeHandle, type_ref: TypeRef, field_name: &str) {
    let mut suffix = capitalize(field_name.trim_start_matches('_'));
    if suffix == "Class" {
        // Object.getClass() is final
        suffix.push('_');
    }
    let getter = model.add_method(owner, &[Modifier::Public], type_ref.clone(), &format!("get{}", suffix));
    model.set_body(getter, vec![format!("return {};", field_name)]);

    let setter =
        model.add_method(owner, &[Modifier::Public], TypeRef::Primitive(Primitive::Void), &format!("set{}", suffix));
    model.add_param(setter, type_ref, field_name);
    model.set_body(setter, vec![format!("this.{0} = {0};", field_name)]);
}

/// Constants carry their wire value; `toString()` returns it.
fn fill_enum(model: &mut CodeModel, handle: TypeHandle, schema: &Value) -> Result<()> {
    let values = schema
        .get("enum")
        .and_then(Value::as_array)
        .filter(|values| !values.is_empty())
        .ok_or_else(|| {
            CodegenError::Schema(format!("enum of {} must be a non-empty array", model.get(handle).name()))
        })?;

    let mut constants = NameRegistry::new();
    for value in values {
        let wire = match value {
            Value::String(s) => s.clone(),
            other => other.to_string(),
        };
        let constant = constants.allocate(&to_constant_name(&wire));
        model.add_enum_constant(handle, &format!("{}({})", constant, model::writer::quote(&wire)))?;
    }

    let string = TypeRef::class("java.lang.String");
    model.add_field(handle, &[Modifier::Private, Modifier::Final], string.clone(), "value");
    let constructor = model.add_constructor(handle, &[Modifier::Private]);
    model.add_param(constructor, string.clone(), "value");
    model.set_body(constructor, vec!["this.value = value;".to_string()]);
    let to_string = model.add_method(handle, &[Modifier::Public], string, "toString");
    model.annotate(to_string, AnnotationUse::new(TypeRef::class("java.lang.Override")));
    model.set_body(to_string, vec!["return this.value;".to_string()]);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mapper(style: AnnotationStyle) -> JsonSchemaMapper {
        JsonSchemaMapper::new(SchemaGenerationConfig {
            annotation_style: style,
            use_long_integers: false,
            use_double_numbers: true,
        })
    }

    #[test]
    fn test_schema_type_inference() {
        assert_eq!(schema_type(&serde_json::json!({"properties": {}})).expect("type"), "object");
        assert_eq!(schema_type(&serde_json::json!({"type": ["null", "integer"]})).expect("type"), "integer");
        assert_eq!(schema_type(&serde_json::json!({})).expect("type"), "any");
        assert!(schema_type(&serde_json::json!({"type": "decimal"})).is_err());
    }

    #[test]
    fn test_number_options() {
        let mut model = CodeModel::new();
        let doc = Document { id: "t".into(), key: "t".into(), base_dir: None, root: serde_json::json!({}) };
        let mut long_mapper = JsonSchemaMapper::new(SchemaGenerationConfig {
            annotation_style: AnnotationStyle::None,
            use_long_integers: true,
            use_double_numbers: false,
        });
        let integer = serde_json::json!({"type": "integer"});
        let number = serde_json::json!({"type": "number"});
        assert_eq!(
            long_mapper.map_schema(&mut model, &doc, "p", &integer, "n", None).expect("map"),
            TypeRef::class("java.lang.Long")
        );
        assert_eq!(
            long_mapper.map_schema(&mut model, &doc, "p", &number, "n", None).expect("map"),
            TypeRef::class("java.lang.Float")
        );
        assert_eq!(
            mapper(AnnotationStyle::None).map_schema(&mut model, &doc, "p", &integer, "n", None).expect("map"),
            TypeRef::class("java.lang.Integer")
        );
    }

    #[test]
    fn test_gson_annotations() {
        let mut model = CodeModel::new();
        let schema = r#"{"type": "object", "properties": {"first-name": {"type": "string"}}}"#;
        mapper(AnnotationStyle::Gson)
            .generate(&mut model, "Person", "p.model", &SchemaLocation::inline(schema, None))
            .expect("generate");

        let person = model.get(model.find_type("p.model.Person").expect("generated"));
        assert!(person.annotations().is_empty());
        let field = &person.fields()[0];
        assert_eq!(field.name(), "firstName");
        assert_eq!(field.annotations().len(), 2);
        assert_eq!(
            field.annotations()[0],
            AnnotationUse::with_value(TypeRef::class("com.google.gson.annotations.SerializedName"), "first-name")
        );
    }

    #[test]
    fn test_ref_name_hint() {
        let schema = serde_json::json!({"type": "object"});
        assert_eq!(ref_name_hint(&schema, "address.schema.json", ""), "address");
        assert_eq!(ref_name_hint(&schema, "", "/definitions/street"), "street");
        assert_eq!(ref_name_hint(&serde_json::json!({"title": "Home"}), "a.json", ""), "Home");
    }
}
