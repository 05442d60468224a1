#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![deny(clippy::unwrap_used)]

//! High-level pipeline that turns a REST API description into JAX-RS
//! resource interfaces.
//!
//! ## Module Organization
//!
//! - `generation_context` - Per-run generation state and its operations
//! - `resource_generator` - Walks the API description and drives the context
//! - `template_management` - Support files written next to the generated model
//! - `orchestration` - Main pipeline entry points (`run`, `run_all`)

use thiserror::Error;

/// Convenient result type for pipeline operations.
pub type Result<T> = std::result::Result<T, PipelineError>;

/// Errors that can occur while running the codegen pipeline.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// Missing or invalid configuration, detected before generation starts.
    #[error("configuration error: {0}")]
    Configuration(String),
    /// Error loading or validating configuration.
    #[error(transparent)]
    Config(#[from] config::ConfigError),
    /// Error loading the API description.
    #[error(transparent)]
    Ir(#[from] ir::IrError),
    /// Error propagated from the codegen crate.
    #[error(transparent)]
    Codegen(#[from] codegen::CodegenError),
    /// Error from the output model.
    #[error(transparent)]
    Model(#[from] model::ModelError),
    /// A handle passed to the context does not name a resource interface.
    #[error("not a resource interface: {0}")]
    UnknownResourceInterface(String),
    /// I/O error while creating or writing files.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub mod generation_context;
pub mod orchestration;
pub mod resource_generator;
pub mod template_management;

pub use generation_context::{GenerationContext, GenerationContextBuilder};
pub use orchestration::{prepare_output_dir, run, run_all};
pub use resource_generator::ResourceGenerator;
