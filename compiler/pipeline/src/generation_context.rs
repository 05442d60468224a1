//! Generation context for the code generation pipeline.
//!
//! One [`GenerationContext`] exists per run. It owns the output model, the
//! identifier registries, the HTTP-verb annotation resolver and the schema
//! bridge, and is consumed by [`GenerationContext::emit`] once the API
//! description has been walked.

use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::sync::Arc;

use codegen::support::RESPONSE_WRAPPER_NAME;
use codegen::{
    AnnotationResolver, HttpMethodAnnotation, JsonSchemaMapper, SchemaLocation, SchemaMapper,
    SharedAnnotationCache,
};
use config::CodegenConfig;
use ir::ApiDescription;
use model::{CodeModel, MethodHandle, Target, TypeHandle, TypeKind, TypeRef};
use registry::{NameRegistry, NameRegistryReader};

use crate::template_management::write_response_wrapper;
use crate::{PipelineError, Result};

/// State of one generation run.
pub struct GenerationContext {
    config: CodegenConfig,
    api: Arc<ApiDescription>,
    model: CodeModel,
    /// Run-wide resource interface names
    resource_names: NameRegistry,
    /// Method names per resource interface
    method_names: BTreeMap<TypeHandle, NameRegistry>,
    annotations: AnnotationResolver,
    schema_mapper: Box<dyn SchemaMapper>,
    response_wrapper_requested: bool,
}

impl GenerationContext {
    /// Create a new builder for GenerationContext
    pub fn builder() -> GenerationContextBuilder { GenerationContextBuilder::default() }

    /// Code generation settings of this run
    pub fn config(&self) -> &CodegenConfig { &self.config }

    /// The API description being generated
    pub fn api(&self) -> &ApiDescription { &self.api }

    /// Shared handle to the API description, for walking it while mutating the context
    pub fn shared_api(&self) -> Arc<ApiDescription> { Arc::clone(&self.api) }

    /// The output model
    pub fn model(&self) -> &CodeModel { &self.model }

    /// Mutable access to the output model
    pub fn model_mut(&mut self) -> &mut CodeModel { &mut self.model }

    /// Names of the resource interfaces created so far
    pub fn resource_interface_names(&self) -> Vec<&str> { self.resource_names.names() }

    /// Whether the response wrapper support file will be emitted
    pub fn response_wrapper_requested(&self) -> bool { self.response_wrapper_requested }

    /// Create a resource interface in the resource package.
    ///
    /// `name` is made unique among the resource interfaces of this run by
    /// appending `1`, `2`, ... on collision.
    pub fn create_resource_interface(&mut self, name: &str) -> Result<TypeHandle> {
        let actual = self.resource_names.allocate(name);
        let handle =
            self.model.define_type(&self.config.resource_package(), &actual, TypeKind::Interface)?;
        self.method_names.insert(handle, NameRegistry::new());
        tracing::debug!("created resource interface {}", self.model.get(handle).fully_qualified_name());
        Ok(handle)
    }

    /// Create a method without modifiers on a resource interface.
    ///
    /// `name` is made unique among the methods of that interface only.
    pub fn create_resource_method(
        &mut self,
        interface: TypeHandle,
        name: &str,
        return_type: TypeRef,
    ) -> Result<MethodHandle> {
        let names = match self.method_names.get_mut(&interface) {
            Some(names) => names,
            None => {
                let name = match self.model.try_get(interface) {
                    Some(ty) => ty.fully_qualified_name().to_string(),
                    None => format!("{:?}", interface),
                };
                return Err(PipelineError::UnknownResourceInterface(name));
            }
        };
        let actual = names.allocate(name);
        Ok(self.model.add_method(interface, &[], return_type, &actual))
    }

    /// Create an enum nested in a resource interface, with constants in the given order.
    pub fn create_resource_enum(
        &mut self,
        interface: TypeHandle,
        name: &str,
        values: &[String],
    ) -> Result<TypeHandle> {
        let handle = self.model.define_nested(interface, name, TypeKind::Enum)?;
        for value in values {
            self.model.add_enum_constant(handle, value)?;
        }
        Ok(handle)
    }

    /// Annotate `target` with the annotation for HTTP verb `verb`.
    pub fn add_http_method_annotation(
        &mut self,
        verb: &str,
        target: impl Into<Target>,
    ) -> Result<HttpMethodAnnotation> {
        Ok(self.annotations.resolve(&mut self.model, verb, target)?)
    }

    /// Type reference for a primitive keyword or a fully-qualified class name.
    pub fn lookup_type(&self, descriptor: &str) -> TypeRef { TypeRef::parse(descriptor) }

    /// First global schema registered under `name`, in declaration order.
    pub fn find_global_schema(&self, name: &str) -> Option<&str> { self.api.find_global_schema(name) }

    /// Generate a value class named `class_name` in the model package from a schema.
    ///
    /// A document already generated under another name resolves to that type.
    pub fn materialize_schema(&mut self, class_name: &str, location: &SchemaLocation) -> Result<TypeRef> {
        let package = self.config.model_package();
        Ok(self.schema_mapper.generate(&mut self.model, class_name, &package, location)?)
    }

    /// Reference to the response wrapper support type; requesting it makes
    /// [`emit`](Self::emit) write the support file.
    pub fn response_wrapper_type(&mut self) -> TypeRef {
        self.response_wrapper_requested = true;
        TypeRef::class(format!("{}.{}", self.config.support_package(), RESPONSE_WRAPPER_NAME))
    }

    /// Write the output model and support files to the output directory.
    ///
    /// Returns the written paths, relative to the output directory.
    pub fn emit(self) -> Result<BTreeSet<String>> {
        let output_dir = &self.config.output_directory;
        fs::create_dir_all(output_dir)?;

        let mut manifest = Vec::new();
        self.model.build(output_dir, &mut manifest)?;
        let mut generated: BTreeSet<String> =
            String::from_utf8_lossy(&manifest).split_whitespace().map(str::to_string).collect();

        if self.response_wrapper_requested {
            let path = write_response_wrapper(
                output_dir,
                self.config.jaxrs_version,
                &self.config.support_package(),
            )?;
            generated.insert(path);
        }

        tracing::info!("emitted {} files to {}", generated.len(), output_dir.display());
        Ok(generated)
    }
}

#[derive(Default)]
/// Builder for GenerationContext
pub struct GenerationContextBuilder {
    /// Code generation settings
    config: Option<CodegenConfig>,
    /// The API description to generate from
    api: Option<ApiDescription>,
    /// Schema bridge implementation
    schema_mapper: Option<Box<dyn SchemaMapper>>,
    /// Annotation cache shared with other runs
    annotation_cache: Option<SharedAnnotationCache>,
}

impl GenerationContextBuilder {
    /// Set the code generation settings
    pub fn config(mut self, config: CodegenConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Set the API description
    pub fn api(mut self, api: ApiDescription) -> Self {
        self.api = Some(api);
        self
    }

    /// Replace the default JSON schema mapper
    pub fn schema_mapper(mut self, mapper: Box<dyn SchemaMapper>) -> Self {
        self.schema_mapper = Some(mapper);
        self
    }

    /// Share the custom HTTP-verb annotation cache with other runs (optional; a
    /// private cache is created by default)
    pub fn annotation_cache(mut self, cache: SharedAnnotationCache) -> Self {
        self.annotation_cache = Some(cache);
        self
    }

    /// Build the GenerationContext
    pub fn build(self) -> Result<GenerationContext> {
        let config = self
            .config
            .ok_or_else(|| PipelineError::Configuration("config is required".to_string()))?;
        config.validate().map_err(|e| PipelineError::Configuration(e.to_string()))?;
        let api =
            self.api.ok_or_else(|| PipelineError::Configuration("api is required".to_string()))?;

        let support_package = config.support_package();
        let annotations = match self.annotation_cache {
            Some(cache) => AnnotationResolver::with_shared_cache(support_package, cache),
            None => AnnotationResolver::new(support_package),
        };
        let schema_mapper = self.schema_mapper.unwrap_or_else(|| {
            Box::new(JsonSchemaMapper::new(config.schema_generation_config()))
        });

        Ok(GenerationContext {
            config,
            api: Arc::new(api),
            model: CodeModel::new(),
            resource_names: NameRegistry::new(),
            method_names: BTreeMap::new(),
            annotations,
            schema_mapper,
            response_wrapper_requested: false,
        })
    }
}
