//! Template management for the pipeline.
//!
//! This module writes the support files rendered from embedded templates.

use std::fs;
use std::path::{Path, PathBuf};

use codegen::support::{render_response_wrapper, response_wrapper_path, RESPONSE_WRAPPER_NAME};
use config::JaxrsVersion;

use crate::PipelineError;

/// Create the directory of `package` below `output_dir`
///
/// # Returns
///
/// Returns `Result<PathBuf>` containing the path to the package directory
pub fn create_package_directory(output_dir: &Path, package: &str) -> Result<PathBuf, PipelineError> {
    let dir = package.split('.').fold(output_dir.to_path_buf(), |dir, segment| dir.join(segment));
    fs::create_dir_all(&dir)?;
    Ok(dir)
}

/// Write the response wrapper for `version` into the support package
///
/// # Arguments
///
/// * `output_dir` - Root of the generated sources
/// * `version` - JAX-RS version selecting the template
/// * `support_package` - Package the wrapper is declared in
///
/// # Returns
///
/// Returns the written path relative to `output_dir`, `/`-separated
pub fn write_response_wrapper(
    output_dir: &Path,
    version: JaxrsVersion,
    support_package: &str,
) -> Result<String, PipelineError> {
    let dir = create_package_directory(output_dir, support_package)?;
    let source = render_response_wrapper(version, support_package);
    fs::write(dir.join(format!("{}.java", RESPONSE_WRAPPER_NAME)), source)?;
    tracing::debug!("wrote JAX-RS {} response wrapper to {}", version, dir.display());
    Ok(response_wrapper_path(support_package))
}
