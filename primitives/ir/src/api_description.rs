//! Parsed REST API description
//!
//! These structures mirror the resource tree of a REST API description after it
//! has been parsed from its source notation: a list of global schemas followed
//! by nested resources, each carrying the HTTP actions it supports.

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised while loading an API description.
#[derive(Debug, Error)]
pub enum IrError {
    /// The description file could not be read.
    #[error("failed to read API description: {0}")]
    Io(#[from] std::io::Error),
    /// The description is not valid JSON for this model.
    #[error("failed to parse API description: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result alias for IR operations.
pub type Result<T> = std::result::Result<T, IrError>;

/// A complete REST API description.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ApiDescription {
    /// API title
    pub title: String,
    /// API version (e.g., "v1")
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    /// Base URI of the API, possibly templated with `{version}`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_uri: Option<String>,
    /// Global schemas in declaration order.
    ///
    /// Each entry maps one or more schema names to their documents; the same
    /// name may appear in several entries, in which case the first one wins.
    #[serde(default)]
    pub schemas: Vec<BTreeMap<String, String>>,
    /// Top-level resources
    #[serde(default)]
    pub resources: Vec<Resource>,
}

/// A resource of the API, addressed by a URI relative to its parent.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Resource {
    /// URI relative to the parent resource (e.g., "/users", "/{userId}")
    pub relative_uri: String,
    /// Human readable name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    /// Resource description
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Parameters appearing in `relative_uri`
    #[serde(default)]
    pub uri_parameters: Vec<Parameter>,
    /// HTTP actions supported by this resource
    #[serde(default)]
    pub actions: Vec<Action>,
    /// Child resources
    #[serde(default)]
    pub resources: Vec<Resource>,
}

/// One HTTP action (verb) on a resource.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Action {
    /// HTTP verb token, case-insensitive (e.g., "get", "PATCH")
    pub method: String,
    /// Action description
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Query string parameters
    #[serde(default)]
    pub query_parameters: Vec<Parameter>,
    /// Request headers
    #[serde(default)]
    pub headers: Vec<Parameter>,
    /// Request bodies keyed by media type
    #[serde(default)]
    pub body: BTreeMap<String, MimeType>,
    /// Responses keyed by status code
    #[serde(default)]
    pub responses: BTreeMap<String, Response>,
}

/// A named parameter (URI, query, header or form field).
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Parameter {
    /// Parameter name as it appears on the wire
    pub name: String,
    /// Declared primitive type
    #[serde(default, rename = "type")]
    pub param_type: ParamType,
    /// Whether the parameter must be present
    #[serde(default)]
    pub required: bool,
    /// Allowed values, if restricted
    #[serde(default, rename = "enum", skip_serializing_if = "Option::is_none")]
    pub enum_values: Option<Vec<String>>,
    /// Default value applied when absent
    #[serde(default, rename = "default", skip_serializing_if = "Option::is_none")]
    pub default_value: Option<String>,
    /// Parameter description
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Primitive parameter types.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ParamType {
    /// Free-form text
    #[default]
    String,
    /// Floating point number
    Number,
    /// Integral number
    Integer,
    /// Date, transported as text
    Date,
    /// true / false
    Boolean,
    /// Uploaded file content
    File,
}

/// A body declaration for a single media type.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct MimeType {
    /// Schema: either the name of a global schema or an inline document
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schema: Option<String>,
    /// Form parameters, for form media types
    #[serde(default)]
    pub form_parameters: Vec<Parameter>,
}

/// A declared response.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Response {
    /// Response description
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Response bodies keyed by media type
    #[serde(default)]
    pub body: BTreeMap<String, MimeType>,
}

impl ApiDescription {
    /// Create a new description with the given title and no content.
    pub fn new(title: impl Into<String>) -> Self {
        Self { title: title.into(), ..Default::default() }
    }

    /// Load a description from a JSON file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json_str(&content)
    }

    /// Parse a description from JSON text.
    pub fn from_json_str(json: &str) -> Result<Self> { Ok(serde_json::from_str(json)?) }

    /// Find the first global schema registered under `name`, in declaration order.
    pub fn find_global_schema(&self, name: &str) -> Option<&str> {
        self.schemas.iter().find_map(|entry| entry.get(name)).map(|s| s.as_str())
    }

    /// Total number of resources, nested ones included.
    pub fn resource_count(&self) -> usize { self.resources.iter().map(Resource::count).sum() }
}

impl Resource {
    /// Number of resources in this subtree, including `self`.
    pub fn count(&self) -> usize { 1 + self.resources.iter().map(Resource::count).sum::<usize>() }
}

impl Action {
    /// Media types produced by this action, across all responses, deduplicated and sorted.
    pub fn response_media_types(&self) -> Vec<&str> {
        let mut types: Vec<&str> = self
            .responses
            .values()
            .flat_map(|r| r.body.keys())
            .map(|s| s.as_str())
            .collect();
        types.sort_unstable();
        types.dedup();
        types
    }
}
