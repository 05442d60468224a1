#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![deny(clippy::unwrap_used)]

//! Code generation building blocks for JAX-RS resource interfaces.
//!
//! This crate holds the pieces the generation coordinator delegates to:
//! HTTP-verb annotation resolution (standard and synthesized custom verbs),
//! the schema bridge that turns JSON schemas into value classes, the
//! embedded support-file templates, and identifier naming helpers.
//!
//! Walking the API description and owning the run state reside in the
//! pipeline crate.

use std::path::PathBuf;

use model::ModelError;
use thiserror::Error;

/// Error type for code generation operations in this crate.
#[derive(Debug, Error)]
pub enum CodegenError {
    /// Underlying I/O error while reading or writing files.
    #[error(transparent)]
    Io(#[from] std::io::Error),
    /// The output model rejected an operation.
    #[error(transparent)]
    Model(#[from] ModelError),
    /// A schema document could not be read.
    #[error("failed to read schema {}: {source}", path.display())]
    SchemaRead {
        /// Location of the schema document
        path: PathBuf,
        /// Underlying error
        source: std::io::Error,
    },
    /// A schema document is malformed or unsupported.
    #[error("invalid schema: {0}")]
    Schema(String),
    /// An HTTP verb token cannot name an annotation type.
    #[error("invalid HTTP method '{0}'")]
    InvalidVerb(String),
    /// Annotation resolution state contradicts itself; a programming defect.
    #[error("inconsistent HTTP method annotation state: {0}")]
    InconsistentAnnotation(String),
}

/// Convenient result type for codegen functions in this crate.
pub type Result<T> = std::result::Result<T, CodegenError>;

/// Sub-crate: **`annotations`**
///
/// Maps HTTP verbs to JAX-RS annotations, synthesizing `@HttpMethod`
/// annotation types for non-standard verbs.
pub mod annotations;

/// Sub-crate: **`schema`**
///
/// Schema bridge and the JSON schema to value class mapper.
pub mod schema;

/// Sub-crate: **`support`**
///
/// Embedded support-file templates.
pub mod support;

/// Sub-crate: **`utils`**
///
/// Utility functions for code generation.
pub mod utils;

pub use annotations::{
    AnnotationCache, AnnotationResolver, HttpMethodAnnotation, SharedAnnotationCache,
    STANDARD_HTTP_METHODS,
};
pub use schema::{JsonSchemaMapper, SchemaLocation, SchemaMapper};
