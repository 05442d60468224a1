//! Unit tests for the parsed API description

use std::collections::BTreeMap;

use restgen_ir::*;

fn schema_entry(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
    pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect()
}

#[test]
fn test_find_global_schema_first_match_wins() {
    let mut api = ApiDescription::new("Test API");
    api.schemas = vec![
        schema_entry(&[("user", "{\"first\": true}")]),
        schema_entry(&[("order", "{}"), ("user", "{\"first\": false}")]),
    ];

    assert_eq!(api.find_global_schema("user"), Some("{\"first\": true}"));
    assert_eq!(api.find_global_schema("order"), Some("{}"));
    assert_eq!(api.find_global_schema("unknown"), None);
}

#[test]
fn test_find_global_schema_empty() {
    let api = ApiDescription::new("Empty");
    assert_eq!(api.find_global_schema("user"), None);
    assert_eq!(api.resource_count(), 0);
}

#[test]
fn test_from_json_str() {
    let json = r#"{
        "title": "Songs",
        "version": "v1",
        "schemas": [{ "song": "{\"type\": \"object\"}" }],
        "resources": [{
            "relative_uri": "/songs",
            "actions": [{
                "method": "get",
                "query_parameters": [
                    { "name": "genre", "type": "string", "enum": ["rock", "jazz"] },
                    { "name": "limit", "type": "integer", "default": "10" }
                ],
                "responses": { "200": { "body": { "application/json": { "schema": "song" } } } }
            }],
            "resources": [{
                "relative_uri": "/{songId}",
                "uri_parameters": [{ "name": "songId", "required": true }],
                "actions": [{ "method": "PATCH" }]
            }]
        }]
    }"#;

    let api = ApiDescription::from_json_str(json).expect("Failed to parse API description");

    assert_eq!(api.title, "Songs");
    assert_eq!(api.version.as_deref(), Some("v1"));
    assert_eq!(api.resource_count(), 2);

    let songs = &api.resources[0];
    let get = &songs.actions[0];
    assert_eq!(get.method, "get");
    assert_eq!(get.query_parameters[0].enum_values, Some(vec!["rock".into(), "jazz".into()]));
    assert_eq!(get.query_parameters[1].param_type, ParamType::Integer);
    assert_eq!(get.query_parameters[1].default_value.as_deref(), Some("10"));
    assert_eq!(get.response_media_types(), vec!["application/json"]);

    let song = &songs.resources[0];
    assert_eq!(song.uri_parameters[0].param_type, ParamType::String);
    assert!(song.uri_parameters[0].required);
    assert!(song.actions[0].responses.is_empty());
}

#[test]
fn test_from_json_str_invalid() {
    let result = ApiDescription::from_json_str("{ not json");
    assert!(matches!(result, Err(IrError::Json(_))));
}

#[test]
fn test_from_file() {
    let dir = tempfile::tempdir().expect("Failed to create temporary directory");
    let path = dir.path().join("api.json");
    std::fs::write(&path, r#"{ "title": "From disk" }"#).expect("Failed to write API file");

    let api = ApiDescription::from_file(&path).expect("Failed to load API description");
    assert_eq!(api.title, "From disk");
    assert!(api.resources.is_empty());

    let missing = ApiDescription::from_file(&dir.path().join("missing.json"));
    assert!(matches!(missing, Err(IrError::Io(_))));
}

#[test]
fn test_response_media_types_dedup() {
    let body = |types: &[&str]| -> BTreeMap<String, MimeType> {
        types.iter().map(|t| (t.to_string(), MimeType::default())).collect()
    };
    let mut action = Action { method: "get".into(), ..Default::default() };
    action.responses.insert(
        "200".into(),
        Response { description: None, body: body(&["application/xml", "application/json"]) },
    );
    action
        .responses
        .insert("404".into(), Response { description: None, body: body(&["application/json"]) });

    assert_eq!(action.response_media_types(), vec!["application/json", "application/xml"]);
}
