//! HTTP-verb annotation resolution.
//!
//! Standard verbs map to the annotations shipped with JAX-RS. Any other verb
//! gets an annotation type synthesized once in the support package:
//!
//! ```java
//! /**
//!  * Custom JAX-RS support for HTTP PATCH.
//!  */
//! @java.lang.annotation.Target(java.lang.annotation.ElementType.METHOD)
//! @java.lang.annotation.Retention(java.lang.annotation.RetentionPolicy.RUNTIME)
//! @javax.ws.rs.HttpMethod("PATCH")
//! public @interface PATCH {
//! }
//! ```
//!
//! The cache is per resolver unless a [`SharedAnnotationCache`] is injected, in
//! which case every resolver holding it reuses the same synthesized constructs.

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};

use model::{AnnotationUse, AnnotationValue, CodeModel, Target, TypeKind, TypeRef};

use crate::{CodegenError, Result};

/// Verbs with a built-in JAX-RS annotation, and that annotation.
pub const STANDARD_HTTP_METHODS: [(&str, &str); 6] = [
    ("DELETE", "javax.ws.rs.DELETE"),
    ("GET", "javax.ws.rs.GET"),
    ("HEAD", "javax.ws.rs.HEAD"),
    ("OPTIONS", "javax.ws.rs.OPTIONS"),
    ("POST", "javax.ws.rs.POST"),
    ("PUT", "javax.ws.rs.PUT"),
];

/// Annotation resolved for an HTTP verb.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HttpMethodAnnotation {
    /// Built-in JAX-RS annotation
    Standard(TypeRef),
    /// Annotation type synthesized for a non-standard verb
    Custom {
        /// Reference to the synthesized annotation type
        annotation: TypeRef,
        /// Support package the annotation type was declared in
        support_package: String,
    },
}

impl HttpMethodAnnotation {
    /// Annotation type to apply.
    pub fn type_ref(&self) -> &TypeRef {
        match self {
            HttpMethodAnnotation::Standard(annotation) => annotation,
            HttpMethodAnnotation::Custom { annotation, .. } => annotation,
        }
    }

    /// Whether this is a synthesized annotation.
    pub fn is_custom(&self) -> bool { matches!(self, HttpMethodAnnotation::Custom { .. }) }
}

/// Known verb annotations keyed by upper-cased verb.
#[derive(Debug, Clone)]
pub struct AnnotationCache {
    entries: BTreeMap<String, HttpMethodAnnotation>,
    synthesized: usize,
}

/// Annotation cache shared between resolvers, possibly across runs.
pub type SharedAnnotationCache = Arc<Mutex<AnnotationCache>>;

impl Default for AnnotationCache {
    fn default() -> Self {
        let entries = STANDARD_HTTP_METHODS
            .iter()
            .map(|(verb, fqn)| (verb.to_string(), HttpMethodAnnotation::Standard(TypeRef::class(*fqn))))
            .collect();
        Self { entries, synthesized: 0 }
    }
}

impl AnnotationCache {
    /// Create a cache holding the standard verbs only.
    pub fn new() -> Self { Self::default() }

    /// Create a cache ready to be shared between resolvers.
    pub fn shared() -> SharedAnnotationCache { Arc::new(Mutex::new(Self::new())) }

    /// Cached annotation for `verb`, matched case-insensitively.
    pub fn get(&self, verb: &str) -> Option<&HttpMethodAnnotation> {
        self.entries.get(&normalize(verb))
    }

    /// Number of custom annotations synthesized through this cache.
    pub fn synthesized(&self) -> usize { self.synthesized }

    /// Number of known verbs, standard ones included.
    pub fn len(&self) -> usize { self.entries.len() }

    /// Whether no verb is known.
    pub fn is_empty(&self) -> bool { self.entries.is_empty() }

    fn lookup_or_synthesize(&mut self, verb: &str, support_package: &str) -> Result<HttpMethodAnnotation> {
        if let Some(entry) = self.entries.get(verb) {
            if let HttpMethodAnnotation::Custom { support_package: declared_in, .. } = entry {
                if declared_in != support_package {
                    return Err(CodegenError::InconsistentAnnotation(format!(
                        "annotation for {} was declared in {}, not {}",
                        verb, declared_in, support_package
                    )));
                }
            }
            return Ok(entry.clone());
        }

        let annotation = HttpMethodAnnotation::Custom {
            annotation: TypeRef::class(format!("{}.{}", support_package, verb)),
            support_package: support_package.to_string(),
        };
        self.entries.insert(verb.to_string(), annotation.clone());
        self.synthesized += 1;
        tracing::info!("synthesized custom HTTP method annotation {}", annotation.type_ref());
        Ok(annotation)
    }
}

#[derive(Debug)]
enum CacheSlot {
    Owned(AnnotationCache),
    Shared(SharedAnnotationCache),
}

/// Attaches HTTP-verb annotations to methods of the output model.
#[derive(Debug)]
pub struct AnnotationResolver {
    support_package: String,
    cache: CacheSlot,
}

impl AnnotationResolver {
    /// Create a resolver with a private cache, declaring custom annotations in
    /// `support_package`.
    pub fn new(support_package: impl Into<String>) -> Self {
        Self { support_package: support_package.into(), cache: CacheSlot::Owned(AnnotationCache::new()) }
    }

    /// Create a resolver backed by a cache shared with other resolvers.
    pub fn with_shared_cache(support_package: impl Into<String>, cache: SharedAnnotationCache) -> Self {
        Self { support_package: support_package.into(), cache: CacheSlot::Shared(cache) }
    }

    /// Package custom annotation types are declared in.
    pub fn support_package(&self) -> &str { &self.support_package }

    /// Number of custom annotations synthesized through this resolver's cache.
    pub fn synthesized(&self) -> Result<usize> {
        match &self.cache {
            CacheSlot::Owned(cache) => Ok(cache.synthesized()),
            CacheSlot::Shared(shared) => Ok(lock(shared)?.synthesized()),
        }
    }

    /// Annotate `target` with the annotation for `verb`.
    ///
    /// The verb is matched case-insensitively. Unknown verbs get an annotation
    /// type synthesized in the support package on first use; later uses of the
    /// same verb reuse it.
    pub fn resolve(
        &mut self,
        model: &mut CodeModel,
        verb: &str,
        target: impl Into<Target>,
    ) -> Result<HttpMethodAnnotation> {
        let verb = normalize(verb);
        if !is_annotation_name(&verb) {
            return Err(CodegenError::InvalidVerb(verb));
        }

        let annotation = match &mut self.cache {
            CacheSlot::Owned(cache) => cache.lookup_or_synthesize(&verb, &self.support_package)?,
            CacheSlot::Shared(shared) => {
                lock(shared)?.lookup_or_synthesize(&verb, &self.support_package)?
            }
        };
        if annotation.is_custom() {
            declare_custom(model, &self.support_package, &verb)?;
        }

        model.annotate(target, AnnotationUse::new(annotation.type_ref().clone()));
        Ok(annotation)
    }
}

fn lock(shared: &SharedAnnotationCache) -> Result<std::sync::MutexGuard<'_, AnnotationCache>> {
    shared
        .lock()
        .map_err(|_| CodegenError::InconsistentAnnotation("annotation cache lock poisoned".to_string()))
}

fn normalize(verb: &str) -> String { verb.trim().to_uppercase() }

fn is_annotation_name(verb: &str) -> bool {
    let mut chars = verb.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

/// Declare the annotation type for a custom verb unless the model already has it.
fn declare_custom(model: &mut CodeModel, support_package: &str, verb: &str) -> Result<()> {
    let fqn = format!("{}.{}", support_package, verb);
    if let Some(existing) = model.find_type(&fqn) {
        if model.get(existing).kind() != TypeKind::Annotation {
            return Err(CodegenError::InconsistentAnnotation(format!(
                "{} is already declared as a {}",
                fqn,
                model.get(existing).kind().keyword()
            )));
        }
        return Ok(());
    }

    let handle = model.define_type(support_package, verb, TypeKind::Annotation)?;
    model.annotate(
        handle,
        AnnotationUse::with_value(
            TypeRef::class("java.lang.annotation.Target"),
            AnnotationValue::EnumConstant {
                owner: TypeRef::class("java.lang.annotation.ElementType"),
                name: "METHOD".to_string(),
            },
        ),
    );
    model.annotate(
        handle,
        AnnotationUse::with_value(
            TypeRef::class("java.lang.annotation.Retention"),
            AnnotationValue::EnumConstant {
                owner: TypeRef::class("java.lang.annotation.RetentionPolicy"),
                name: "RUNTIME".to_string(),
            },
        ),
    );
    model.annotate(handle, AnnotationUse::with_value(TypeRef::class("javax.ws.rs.HttpMethod"), verb));
    model.add_doc(handle, format!("Custom JAX-RS support for HTTP {}.", verb));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn method(model: &mut CodeModel) -> model::MethodHandle {
        let owner = model.define_type("p.resource", "Users", TypeKind::Interface).expect("define");
        model.add_method(owner, &[], TypeRef::class("javax.ws.rs.core.Response"), "get")
    }

    #[test]
    fn test_standard_verb_is_attached_directly() {
        let mut model = CodeModel::new();
        let get = method(&mut model);
        let mut resolver = AnnotationResolver::new("p.support");

        let annotation = resolver.resolve(&mut model, "get", get).expect("resolve GET");

        assert_eq!(annotation, HttpMethodAnnotation::Standard(TypeRef::class("javax.ws.rs.GET")));
        assert_eq!(model.annotations(get), &[AnnotationUse::new(TypeRef::class("javax.ws.rs.GET"))]);
        assert_eq!(resolver.synthesized().expect("count"), 0);
        assert_eq!(model.len(), 1);
    }

    #[test]
    fn test_custom_verb_declaration() {
        let mut model = CodeModel::new();
        let m = method(&mut model);
        let mut resolver = AnnotationResolver::new("p.support");

        resolver.resolve(&mut model, " patch ", m).expect("resolve PATCH");

        let handle = model.find_type("p.support.PATCH").expect("annotation type declared");
        let declared = model.get(handle);
        assert_eq!(declared.kind(), TypeKind::Annotation);
        assert_eq!(declared.doc(), &["Custom JAX-RS support for HTTP PATCH.".to_string()]);
        assert_eq!(declared.annotations().len(), 3);
        assert_eq!(
            declared.annotations()[2],
            AnnotationUse::with_value(TypeRef::class("javax.ws.rs.HttpMethod"), "PATCH")
        );
    }

    #[test]
    fn test_invalid_verbs_are_rejected() {
        let mut model = CodeModel::new();
        let m = method(&mut model);
        let mut resolver = AnnotationResolver::new("p.support");

        assert!(matches!(resolver.resolve(&mut model, "", m), Err(CodegenError::InvalidVerb(_))));
        assert!(matches!(
            resolver.resolve(&mut model, "M-SEARCH", m),
            Err(CodegenError::InvalidVerb(_))
        ));
        assert!(model.annotations(m).is_empty());
    }

    #[test]
    fn test_non_annotation_type_at_custom_name_is_fatal() {
        let mut model = CodeModel::new();
        let m = method(&mut model);
        model.define_type("p.support", "PURGE", TypeKind::Class).expect("define");
        let mut resolver = AnnotationResolver::new("p.support");

        let result = resolver.resolve(&mut model, "PURGE", m);
        assert!(matches!(result, Err(CodegenError::InconsistentAnnotation(_))));
    }

    #[test]
    fn test_cache_lookup_is_case_insensitive() {
        let cache = AnnotationCache::new();
        assert_eq!(cache.len(), STANDARD_HTTP_METHODS.len());
        assert!(cache.get("delete").is_some());
        assert!(cache.get("Options").is_some());
        assert!(cache.get("PATCH").is_none());
    }
}
