//! Pipeline orchestration for the main entry points.
//!
//! This module contains the main pipeline entry points that coordinate all the modules
//! to execute the complete code generation process.

use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};

use codegen::{AnnotationCache, SharedAnnotationCache};
use config::Config;
use ir::ApiDescription;

use crate::generation_context::GenerationContext;
use crate::resource_generator::ResourceGenerator;
use crate::PipelineError;

/// Create the output directory if it does not exist yet
///
/// Existing content is left in place; generated files overwrite their
/// previous versions.
pub fn prepare_output_dir(dir: &Path) -> Result<(), PipelineError> {
    if dir.is_file() {
        return Err(PipelineError::Configuration(format!(
            "output directory {} is a file",
            dir.display()
        )));
    }
    fs::create_dir_all(dir)?;
    Ok(())
}

/// Generate resource interfaces for one API description
///
/// # Arguments
///
/// * `config` - Loaded configuration
/// * `api_path` - Path to the API description (JSON)
///
/// # Returns
///
/// Returns the generated files, relative to the configured output directory
pub fn run(config: &Config, api_path: &Path) -> Result<BTreeSet<String>, PipelineError> {
    run_with_cache(config, api_path, None)
}

/// Generate resource interfaces for several API descriptions into the same
/// output directory
///
/// Custom HTTP-verb annotations are synthesized once and shared by all runs.
///
/// # Returns
///
/// Returns the union of the generated files
pub fn run_all(config: &Config, api_paths: &[PathBuf]) -> Result<BTreeSet<String>, PipelineError> {
    let cache = AnnotationCache::shared();
    let mut generated = BTreeSet::new();
    for api_path in api_paths {
        generated.extend(run_with_cache(config, api_path, Some(cache.clone()))?);
    }
    Ok(generated)
}

fn run_with_cache(
    config: &Config,
    api_path: &Path,
    cache: Option<SharedAnnotationCache>,
) -> Result<BTreeSet<String>, PipelineError> {
    let mut codegen_config = config.codegen.clone();
    if codegen_config.source_directory.is_none() {
        codegen_config.source_directory = api_path.parent().map(Path::to_path_buf);
    }
    codegen_config.validate().map_err(|e| PipelineError::Configuration(e.to_string()))?;
    prepare_output_dir(&codegen_config.output_directory)?;

    let api = ApiDescription::from_file(api_path)?;
    tracing::info!("generating {} from {}", api.title, api_path.display());

    let mut builder = GenerationContext::builder().config(codegen_config).api(api);
    if let Some(cache) = cache {
        builder = builder.annotation_cache(cache);
    }
    let mut ctx = builder.build()?;

    ResourceGenerator::new(&mut ctx).generate()?;
    let generated = ctx.emit()?;
    tracing::info!("generated {} files from {}", generated.len(), api_path.display());
    Ok(generated)
}
