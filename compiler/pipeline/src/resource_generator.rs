//! Walks an API description and builds resource interfaces through a
//! [`GenerationContext`].
//!
//! Each top-level resource becomes one interface. Actions of the resource and
//! of all its descendants become methods of that interface, with `@Path`
//! carrying the URI below the interface.

use std::sync::Arc;

use codegen::utils::{
    capitalize, resource_method_name, to_class_name, to_constant_name, to_member_name,
    uri_template_params,
};
use codegen::SchemaLocation;
use ir::{Action, ApiDescription, MimeType, ParamType, Parameter, Resource};
use model::writer::quote;
use model::{AnnotationUse, AnnotationValue, MethodHandle, Modifier, TypeHandle, TypeKind, TypeRef};
use registry::NameRegistry;

use crate::generation_context::GenerationContext;
use crate::Result;

const RESPONSE: &str = "javax.ws.rs.core.Response";
const INPUT_STREAM: &str = "java.io.InputStream";

fn jaxrs(annotation: &str) -> TypeRef { TypeRef::class(format!("javax.ws.rs.{}", annotation)) }

fn is_json(media_type: &str) -> bool { media_type.contains("json") }

fn is_form(media_type: &str) -> bool {
    media_type == "application/x-www-form-urlencoded" || media_type == "multipart/form-data"
}

/// Name fragment for a media type: `application/json` → `Json`.
fn media_infix(media_type: &str) -> String {
    let essence = media_type.split(';').next().unwrap_or(media_type);
    let subtype = essence.rsplit('/').next().unwrap_or(essence);
    to_class_name(subtype)
}

/// A unique name for a type nested in `owner`.
fn nested_name(ctx: &GenerationContext, owner: TypeHandle, candidate: &str) -> String {
    let model = ctx.model();
    let mut taken: Vec<String> =
        model.get(owner).nested().iter().map(|h| model.get(*h).name().to_string()).collect();
    taken.push(model.get(owner).name().to_string());
    NameRegistry::with_reserved(taken).allocate(candidate)
}

/// Drives a [`GenerationContext`] over its API description.
pub struct ResourceGenerator<'a> {
    ctx: &'a mut GenerationContext,
    api: Arc<ApiDescription>,
    /// Class names given to inline schemas
    inline_names: NameRegistry,
}

impl<'a> ResourceGenerator<'a> {
    /// Create a generator over the context's API description.
    pub fn new(ctx: &'a mut GenerationContext) -> Self {
        let api = ctx.shared_api();
        Self { ctx, api, inline_names: NameRegistry::new() }
    }

    /// Generate one resource interface per top-level resource.
    ///
    /// Returns the number of interfaces created.
    pub fn generate(&mut self) -> Result<usize> {
        let api = Arc::clone(&self.api);
        for resource in &api.resources {
            self.generate_resource(resource)?;
        }
        tracing::info!(
            "generated {} resource interfaces covering {} resources",
            api.resources.len(),
            api.resource_count()
        );
        Ok(api.resources.len())
    }

    fn generate_resource(&mut self, resource: &Resource) -> Result<TypeHandle> {
        let base = resource
            .display_name
            .as_deref()
            .filter(|name| !name.trim().is_empty())
            .unwrap_or(&resource.relative_uri);
        let interface = self.ctx.create_resource_interface(&format!("{}Resource", to_class_name(base)))?;

        let model = self.ctx.model_mut();
        model.annotate(interface, AnnotationUse::with_value(jaxrs("Path"), resource.relative_uri.as_str()));
        if let Some(description) = &resource.description {
            model.add_doc(interface, description.trim());
        }

        self.generate_methods(interface, resource, &resource.relative_uri, "", &resource.uri_parameters)?;
        Ok(interface)
    }

    fn generate_methods(
        &mut self,
        interface: TypeHandle,
        resource: &Resource,
        full_uri: &str,
        sub_path: &str,
        uri_parameters: &[Parameter],
    ) -> Result<()> {
        for action in &resource.actions {
            self.generate_action(interface, action, full_uri, sub_path, uri_parameters)?;
        }
        for child in &resource.resources {
            let mut parameters = uri_parameters.to_vec();
            parameters.extend(child.uri_parameters.iter().cloned());
            self.generate_methods(
                interface,
                child,
                &format!("{}{}", full_uri, child.relative_uri),
                &format!("{}{}", sub_path, child.relative_uri),
                &parameters,
            )?;
        }
        Ok(())
    }

    fn generate_action(
        &mut self,
        interface: TypeHandle,
        action: &Action,
        full_uri: &str,
        sub_path: &str,
        uri_parameters: &[Parameter],
    ) -> Result<()> {
        let base_name = resource_method_name(&action.method, sub_path);
        if action.body.is_empty() {
            return self.generate_method(interface, action, &base_name, None, full_uri, sub_path, uri_parameters);
        }
        // one method per request media type
        for (media_type, mime) in &action.body {
            let name = if action.body.len() > 1 {
                format!("{}As{}", base_name, media_infix(media_type))
            } else {
                base_name.clone()
            };
            let body = Some((media_type.as_str(), mime));
            self.generate_method(interface, action, &name, body, full_uri, sub_path, uri_parameters)?;
        }
        Ok(())
    }

    #[allow(clippy::too_many_arguments)]
    fn generate_method(
        &mut self,
        interface: TypeHandle,
        action: &Action,
        name: &str,
        body: Option<(&str, &MimeType)>,
        full_uri: &str,
        sub_path: &str,
        uri_parameters: &[Parameter],
    ) -> Result<()> {
        let method = self.ctx.create_resource_method(interface, name, TypeRef::class(RESPONSE))?;
        let name = self.ctx.model().method(method).name().to_string();
        if !action.responses.is_empty() {
            let return_type = self.response_class(interface, &name, action)?;
            self.ctx.model_mut().set_return_type(method, return_type);
        }
        self.ctx.add_http_method_annotation(&action.method, method)?;

        let model = self.ctx.model_mut();
        if !sub_path.is_empty() {
            model.annotate(method, AnnotationUse::with_value(jaxrs("Path"), sub_path));
        }
        if let Some((media_type, _)) = body {
            model.annotate(method, AnnotationUse::with_value(jaxrs("Consumes"), media_type));
        }
        let produces = action.response_media_types();
        if !produces.is_empty() {
            let values = produces.into_iter().map(AnnotationValue::from).collect();
            model.annotate(method, AnnotationUse::with_value(jaxrs("Produces"), AnnotationValue::Array(values)));
        }
        if let Some(description) = &action.description {
            model.add_doc(method, description.trim());
        }

        let mut names = NameRegistry::new();
        for template_param in uri_template_params(full_uri) {
            let parameter = match uri_parameters.iter().find(|p| p.name == template_param) {
                Some(declared) => declared.clone(),
                None => Parameter { name: template_param, required: true, ..Default::default() },
            };
            self.add_parameter(interface, method, &mut names, &parameter, "PathParam")?;
        }
        for parameter in &action.query_parameters {
            self.add_parameter(interface, method, &mut names, parameter, "QueryParam")?;
        }
        for parameter in &action.headers {
            self.add_parameter(interface, method, &mut names, parameter, "HeaderParam")?;
        }
        if let Some((media_type, mime)) = body {
            self.add_body(interface, method, &mut names, &name, media_type, mime)?;
        }
        Ok(())
    }

    fn add_parameter(
        &mut self,
        interface: TypeHandle,
        method: MethodHandle,
        names: &mut NameRegistry,
        parameter: &Parameter,
        annotation: &str,
    ) -> Result<()> {
        let type_ref = self.parameter_type(interface, parameter)?;
        let java_name = names.allocate(&to_member_name(&parameter.name));

        let model = self.ctx.model_mut();
        let handle = model.add_param(method, type_ref, &java_name);
        model.annotate(handle, AnnotationUse::with_value(jaxrs(annotation), parameter.name.as_str()));
        if let Some(default) = &parameter.default_value {
            model.annotate(handle, AnnotationUse::with_value(jaxrs("DefaultValue"), default.as_str()));
        }
        if let Some(description) = &parameter.description {
            model.add_doc(handle, format!("@param {} {}", java_name, description.trim()));
        }
        Ok(())
    }

    fn parameter_type(&mut self, interface: TypeHandle, parameter: &Parameter) -> Result<TypeRef> {
        if let Some(values) = parameter.enum_values.as_ref().filter(|v| !v.is_empty()) {
            return self.parameter_enum(interface, &parameter.name, values);
        }
        let descriptor = match (parameter.param_type, parameter.required) {
            (ParamType::String, _) => "java.lang.String",
            (ParamType::Date, _) => "java.util.Date",
            (ParamType::File, _) => INPUT_STREAM,
            (ParamType::Integer, true) => "long",
            (ParamType::Integer, false) => "java.lang.Long",
            (ParamType::Number, true) => "double",
            (ParamType::Number, false) => "java.lang.Double",
            (ParamType::Boolean, true) => "boolean",
            (ParamType::Boolean, false) => "java.lang.Boolean",
        };
        Ok(self.ctx.lookup_type(descriptor))
    }

    /// Nested enum for a restricted parameter, shared by parameters of the same
    /// name and values on one interface.
    fn parameter_enum(&mut self, interface: TypeHandle, name: &str, values: &[String]) -> Result<TypeRef> {
        let mut constant_names = NameRegistry::new();
        let constants: Vec<String> =
            values.iter().map(|v| constant_names.allocate(&to_constant_name(v))).collect();
        let candidate = to_class_name(name);

        let model = self.ctx.model();
        let existing = model.get(interface).nested().iter().copied().find(|h| {
            let nested = model.get(*h);
            nested.name() == candidate && nested.kind() == TypeKind::Enum && nested.enum_constants() == constants
        });
        if let Some(existing) = existing {
            return Ok(model.type_ref(existing));
        }

        let enum_name = nested_name(self.ctx, interface, &candidate);
        let handle = self.ctx.create_resource_enum(interface, &enum_name, &constants)?;
        Ok(self.ctx.model().type_ref(handle))
    }

    fn add_body(
        &mut self,
        interface: TypeHandle,
        method: MethodHandle,
        names: &mut NameRegistry,
        method_name: &str,
        media_type: &str,
        mime: &MimeType,
    ) -> Result<()> {
        if is_form(media_type) && !mime.form_parameters.is_empty() {
            for parameter in &mime.form_parameters {
                self.add_parameter(interface, method, names, parameter, "FormParam")?;
            }
            return Ok(());
        }

        let type_ref = match &mime.schema {
            Some(schema) if is_json(media_type) => {
                self.schema_type(schema, &format!("{}Entity", capitalize(method_name)))?
            }
            _ => TypeRef::class(INPUT_STREAM),
        };
        let entity = names.allocate("entity");
        self.ctx.model_mut().add_param(method, type_ref, &entity);
        Ok(())
    }

    /// Value type for a body schema: a global schema name, or an inline document
    /// generated under `inline_name`.
    fn schema_type(&mut self, schema: &str, inline_name: &str) -> Result<TypeRef> {
        let base_dir = self.ctx.config().source_directory.clone();
        match self.ctx.find_global_schema(schema).map(str::to_string) {
            Some(document) => self
                .ctx
                .materialize_schema(&to_class_name(schema), &SchemaLocation::inline(document, base_dir)),
            None => {
                let name = self.inline_class_name(inline_name);
                self.ctx.materialize_schema(&name, &SchemaLocation::inline(schema, base_dir))
            }
        }
    }

    /// A class name for an inline schema not yet taken in the model package.
    fn inline_class_name(&mut self, candidate: &str) -> String {
        let package = self.ctx.config().model_package();
        loop {
            let name = self.inline_names.allocate(candidate);
            if self.ctx.model().find_type(&format!("{}.{}", package, name)).is_none() {
                return name;
            }
        }
    }

    /// Nested `<Method>Response` class with one static factory per declared
    /// status and media type.
    fn response_class(&mut self, interface: TypeHandle, method_name: &str, action: &Action) -> Result<TypeRef> {
        let wrapper = self.ctx.response_wrapper_type();
        let name = nested_name(self.ctx, interface, &format!("{}Response", capitalize(method_name)));

        let model = self.ctx.model_mut();
        let class = model.define_nested(interface, &name, TypeKind::Class)?;
        let class_ref = model.type_ref(class);
        model.set_superclass(class, wrapper);
        let constructor = model.add_constructor(class, &[Modifier::Private]);
        model.add_param(constructor, TypeRef::class(RESPONSE), "delegate");
        model.set_body(constructor, vec!["super(delegate);".to_string()]);

        let mut factories = NameRegistry::new();
        for (status, response) in &action.responses {
            let code: u16 = match status.trim().parse() {
                Ok(code) => code,
                Err(_) => {
                    tracing::warn!("skipping response '{}' of {}: not a numeric status", status, name);
                    continue;
                }
            };
            let builder = format!("{}.ResponseBuilder responseBuilder = {}.status({})", RESPONSE, RESPONSE, code);

            if response.body.is_empty() {
                let factory = factories.allocate(&format!("with{}", code));
                let model = self.ctx.model_mut();
                let method = model.add_method(class, &[Modifier::Public, Modifier::Static], class_ref.clone(), &factory);
                if let Some(description) = &response.description {
                    model.add_doc(method, description.trim());
                }
                model.set_body(
                    method,
                    vec![format!("{};", builder), format!("return new {}(responseBuilder.build());", name)],
                );
                continue;
            }

            for (media_type, mime) in &response.body {
                let entity_type = match &mime.schema {
                    Some(schema) if is_json(media_type) => self.schema_type(
                        schema,
                        &format!("{}{}{}Entity", capitalize(method_name), media_infix(media_type), code),
                    )?,
                    _ => TypeRef::class("java.lang.Object"),
                };
                let factory = factories.allocate(&format!("with{}{}", media_infix(media_type), code));

                let model = self.ctx.model_mut();
                let method = model.add_method(class, &[Modifier::Public, Modifier::Static], class_ref.clone(), &factory);
                model.add_param(method, entity_type, "entity");
                if let Some(description) = &response.description {
                    model.add_doc(method, description.trim());
                }
                model.set_body(
                    method,
                    vec![
                        format!("{}.header(\"Content-Type\", {});", builder, quote(media_type)),
                        "responseBuilder.entity(entity);".to_string(),
                        format!("return new {}(responseBuilder.build());", name),
                    ],
                );
            }
        }
        Ok(class_ref)
    }
}
