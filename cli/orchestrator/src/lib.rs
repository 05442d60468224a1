#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![deny(clippy::unwrap_used)]
//! Collection of utilities for the restgen command line.
//!
//! Resolves the effective [`Config`] from an optional file and the command
//! line overrides before the pipeline runs.

use std::path::{Path, PathBuf};

use config::{AnnotationStyle, Config, ConfigError, JaxrsVersion};
use thiserror::Error;

/// Errors that can occur during CLI operations.
#[derive(Debug, Error)]
pub enum CliError {
    /// Configuration could not be loaded, saved or validated.
    #[error(transparent)]
    Config(#[from] ConfigError),
    /// Generation failed.
    #[error(transparent)]
    Pipeline(#[from] pipeline::PipelineError),
    /// Filesystem error outside the pipeline.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// Logging could not be initialized.
    #[error(transparent)]
    Logging(#[from] logging::LoggingError),
}

/// Result type alias for CLI operations.
pub type Result<T> = std::result::Result<T, CliError>;

/// Settings given on the command line that take precedence over the file.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    /// Output directory
    pub output: Option<PathBuf>,
    /// Base package name
    pub base_package: Option<String>,
    /// JAX-RS version key
    pub jaxrs_version: Option<String>,
    /// JSON annotation style
    pub json_mapper: Option<String>,
}

/// Load the configuration for a run
///
/// An explicit `path` must exist. Without one, the file at
/// [`Config::default_path`] is used when present, and built-in defaults
/// otherwise.
pub fn load_config(path: Option<&Path>) -> Result<Config> {
    if let Some(path) = path {
        return Ok(Config::from_file(path)?);
    }
    match Config::default_path() {
        Ok(default) if default.is_file() => Ok(Config::from_file(default)?),
        _ => Ok(Config::default()),
    }
}

/// Apply command line overrides and validate the result.
pub fn apply_overrides(mut config: Config, overrides: &Overrides) -> Result<Config> {
    if let Some(output) = &overrides.output {
        config.codegen.output_directory = output.clone();
    }
    if let Some(base_package) = &overrides.base_package {
        config.codegen.base_package_name = base_package.clone();
    }
    if let Some(version) = &overrides.jaxrs_version {
        config.codegen.jaxrs_version = version.parse::<JaxrsVersion>()?;
    }
    if let Some(style) = &overrides.json_mapper {
        config.codegen.json_mapper = style.parse::<AnnotationStyle>()?;
    }
    config.codegen.validate()?;
    Ok(config)
}

/// Write the default configuration to `path`, or to [`Config::default_path`].
///
/// Returns the path written.
pub fn init_config(path: Option<&Path>) -> Result<PathBuf> {
    let path = match path {
        Some(path) => path.to_path_buf(),
        None => Config::default_path()?,
    };
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    Config::default().save(&path)?;
    Ok(path)
}
