use config::{AnnotationStyle, SchemaGenerationConfig};
use model::{AnnotationUse, CodeModel, TypeKind, TypeRef};
use restgen_codegen::{CodegenError, JsonSchemaMapper, SchemaLocation, SchemaMapper};

fn mapper(style: AnnotationStyle) -> JsonSchemaMapper {
    JsonSchemaMapper::new(SchemaGenerationConfig {
        annotation_style: style,
        use_long_integers: false,
        use_double_numbers: true,
    })
}

const USER_SCHEMA: &str = r#"{
    "type": "object",
    "description": "A registered user",
    "properties": {
        "id": {"type": "integer"},
        "name": {"type": "string", "description": "Display name"},
        "tags": {"type": "array", "items": {"type": "string"}},
        "status": {"type": "string", "enum": ["active", "on-hold"]},
        "address": {
            "type": "object",
            "properties": {"street": {"type": "string"}}
        }
    },
    "required": ["id"]
}"#;

#[test]
fn test_object_schema_becomes_class() {
    let mut model = CodeModel::new();
    let type_ref = mapper(AnnotationStyle::Jackson2)
        .generate(&mut model, "User", "com.acme.model", &SchemaLocation::inline(USER_SCHEMA, None))
        .expect("Failed to generate User");

    assert_eq!(type_ref, TypeRef::class("com.acme.model.User"));
    let user = model.get(model.find_type("com.acme.model.User").expect("User defined"));
    assert_eq!(user.kind(), TypeKind::Class);
    assert_eq!(user.doc(), &["A registered user".to_string()]);

    let fields: Vec<(&str, String)> =
        user.fields().iter().map(|f| (f.name(), f.type_ref().to_string())).collect();
    assert_eq!(
        fields,
        vec![
            ("id", "java.lang.Integer".to_string()),
            ("name", "java.lang.String".to_string()),
            ("tags", "java.util.List<java.lang.String>".to_string()),
            ("status", "com.acme.model.User.Status".to_string()),
            ("address", "com.acme.model.Address".to_string()),
        ]
    );
    assert_eq!(
        user.fields()[0].annotations(),
        &[AnnotationUse::with_value(TypeRef::class("com.fasterxml.jackson.annotation.JsonProperty"), "id")]
    );
    // getter + setter per property
    assert_eq!(user.methods().len(), 10);
    assert_eq!(user.methods()[0].name(), "getId");
    assert_eq!(user.methods()[1].name(), "setId");

    let status = model.get(model.find_type("com.acme.model.User.Status").expect("nested enum"));
    assert_eq!(status.enum_constants(), &["ACTIVE(\"active\")".to_string(), "ON_HOLD(\"on-hold\")".to_string()]);
    assert!(model.find_type("com.acme.model.Address").is_some());
}

#[test]
fn test_existing_type_is_reused() {
    let mut model = CodeModel::new();
    let mut mapper = mapper(AnnotationStyle::None);
    mapper
        .generate(&mut model, "User", "com.acme.model", &SchemaLocation::inline(USER_SCHEMA, None))
        .expect("first generation");
    let before = model.len();

    let again = mapper
        .generate(&mut model, "User", "com.acme.model", &SchemaLocation::inline(r#"{"type":"object"}"#, None))
        .expect("second generation");

    assert_eq!(again, TypeRef::class("com.acme.model.User"));
    assert_eq!(model.len(), before);
}

#[test]
fn test_relative_file_refs_are_generated_once() {
    let dir = tempfile::tempdir().expect("Failed to create temporary directory");
    std::fs::write(
        dir.path().join("address.json"),
        r#"{"type": "object", "properties": {"city": {"type": "string"}}}"#,
    )
    .expect("write address schema");
    std::fs::write(
        dir.path().join("order.json"),
        r#"{"type": "object", "properties": {
            "billing": {"$ref": "address.json"},
            "shipping": {"$ref": "address.json"}
        }}"#,
    )
    .expect("write order schema");

    let mut model = CodeModel::new();
    mapper(AnnotationStyle::None)
        .generate(&mut model, "Order", "com.acme.model", &SchemaLocation::file(dir.path().join("order.json")))
        .expect("Failed to generate Order");

    let order = model.get(model.find_type("com.acme.model.Order").expect("Order"));
    assert_eq!(order.fields()[0].type_ref(), &TypeRef::class("com.acme.model.Address"));
    assert_eq!(order.fields()[1].type_ref(), &TypeRef::class("com.acme.model.Address"));
    // Order + Address only
    assert_eq!(model.len(), 2);
}

#[test]
fn test_inline_ref_resolves_against_base_dir() {
    let dir = tempfile::tempdir().expect("Failed to create temporary directory");
    std::fs::write(dir.path().join("tag.json"), r#"{"type": "string", "enum": ["a", "b"]}"#)
        .expect("write tag schema");
    let schema = r#"{"type": "object", "properties": {"tag": {"$ref": "tag.json"}}}"#;

    let mut model = CodeModel::new();
    mapper(AnnotationStyle::None)
        .generate(
            &mut model,
            "Item",
            "p.model",
            &SchemaLocation::inline(schema, Some(dir.path().to_path_buf())),
        )
        .expect("Failed to generate Item");

    let tag = model.find_type("p.model.Tag").expect("enum from referenced file");
    assert_eq!(model.get(tag).kind(), TypeKind::Enum);

    let no_base = mapper(AnnotationStyle::None).generate(
        &mut CodeModel::new(),
        "Item",
        "p.model",
        &SchemaLocation::inline(schema, None),
    );
    assert!(matches!(no_base, Err(CodegenError::Schema(_))));
}

#[test]
fn test_recursive_pointer_ref_terminates() {
    let schema = r##"{
        "type": "object",
        "properties": {
            "children": {"type": "array", "items": {"$ref": "#"}},
            "parent": {"$ref": "#/definitions/node"}
        },
        "definitions": {
            "node": {"type": "object", "properties": {"next": {"$ref": "#/definitions/node"}}}
        }
    }"##;

    let mut model = CodeModel::new();
    mapper(AnnotationStyle::None)
        .generate(&mut model, "Tree", "p.model", &SchemaLocation::inline(schema, None))
        .expect("Failed to generate Tree");

    let tree = model.get(model.find_type("p.model.Tree").expect("Tree"));
    assert_eq!(tree.fields()[0].type_ref().to_string(), "java.util.List<p.model.Tree>");
    let node = model.get(model.find_type("p.model.Node").expect("Node"));
    assert_eq!(node.fields()[0].type_ref(), &TypeRef::class("p.model.Node"));
}

#[test]
fn test_schema_errors() {
    let mut model = CodeModel::new();
    let mut mapper = mapper(AnnotationStyle::None);

    let malformed = mapper.generate(&mut model, "A", "p", &SchemaLocation::inline("{not json", None));
    assert!(matches!(malformed, Err(CodegenError::Schema(_))));

    let array_root = mapper.generate(&mut model, "B", "p", &SchemaLocation::inline(r#"{"type":"array"}"#, None));
    assert!(matches!(array_root, Err(CodegenError::Schema(_))));

    let missing = mapper.generate(&mut model, "C", "p", &SchemaLocation::file("/nonexistent/c.json"));
    assert!(matches!(missing, Err(CodegenError::SchemaRead { .. })));
}

#[test]
fn test_self_referencing_array_is_a_schema_error() {
    let schema = r##"{
        "properties": {"tree": {"$ref": "#/definitions/tree"}},
        "definitions": {"tree": {"type": "array", "items": {"$ref": "#/definitions/tree"}}}
    }"##;

    let mut model = CodeModel::new();
    let result = mapper(AnnotationStyle::None).generate(
        &mut model,
        "Forest",
        "p.model",
        &SchemaLocation::inline(schema, None),
    );

    match result {
        Err(CodegenError::Schema(message)) => assert!(message.contains("circular $ref"), "{}", message),
        other => panic!("Expected circular $ref error, got {:?}", other),
    }
}

#[test]
fn test_inline_documents_are_keyed_by_content() {
    let mut model = CodeModel::new();
    let mut mapper = mapper(AnnotationStyle::None);
    let first = r#"{"type": "object", "properties": {"a": {"type": "string"}}}"#;
    let second = r#"{"type": "object", "properties": {"b": {"type": "integer"}}}"#;

    mapper
        .generate(&mut model, "Entity", "p.model", &SchemaLocation::inline(first, None))
        .expect("Failed to generate first Entity");
    let clash = mapper.generate(&mut model, "Entity", "p.model", &SchemaLocation::inline(second, None));
    assert!(matches!(clash, Err(CodegenError::Schema(_))));

    // the same document under the same name is generated once
    let again = mapper
        .generate(&mut model, "Entity", "p.model", &SchemaLocation::inline(first, None))
        .expect("Failed to reuse Entity");
    assert_eq!(again, TypeRef::class("p.model.Entity"));

    let entity = model.get(model.find_type("p.model.Entity").expect("Entity"));
    let fields: Vec<&str> = entity.fields().iter().map(|f| f.name()).collect();
    assert_eq!(fields, vec!["a"]);
}
