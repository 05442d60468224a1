#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![deny(clippy::unwrap_used)]

//! Output object model for generated interface artifacts.
//!
//! The model is an arena of defined types (interfaces, classes, enums and
//! annotation types) addressed through small copyable handles. Generators add
//! types, members and annotations while walking their input, then call
//! [`CodeModel::build`] once to serialize every top-level type to a Java source
//! file and report the written paths.

pub mod code_model;
pub mod types;
pub mod writer;

use thiserror::Error;

/// Errors raised by the output model.
#[derive(Debug, Error)]
pub enum ModelError {
    /// A type with the same fully-qualified name is already defined.
    #[error("type already exists: {0}")]
    TypeAlreadyExists(String),
    /// An operation required a different kind of type.
    #[error("{name} is not {expected}")]
    KindMismatch {
        /// Fully-qualified name of the offending type
        name: String,
        /// Kind the operation required
        expected: &'static str,
    },
    /// Writing generated sources failed.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Result alias for model operations.
pub type Result<T> = std::result::Result<T, ModelError>;

pub use code_model::{
    CodeModel, DefinedType, Field, FieldHandle, Method, MethodHandle, Param, ParamHandle, Target,
    TypeHandle,
};
pub use types::{AnnotationUse, AnnotationValue, Modifier, Primitive, TypeKind, TypeRef};
