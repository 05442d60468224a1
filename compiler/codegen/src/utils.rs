// codegen/src/utils.rs

use std::sync::OnceLock;

use regex::Regex;

/// Reserved words of the target language; never usable as identifiers.
const JAVA_KEYWORDS: &[&str] = &[
    "abstract", "assert", "boolean", "break", "byte", "case", "catch", "char", "class", "const",
    "continue", "default", "do", "double", "else", "enum", "extends", "false", "final", "finally",
    "float", "for", "goto", "if", "implements", "import", "instanceof", "int", "interface", "long",
    "native", "new", "null", "package", "private", "protected", "public", "return", "short",
    "static", "strictfp", "super", "switch", "synchronized", "this", "throw", "throws",
    "transient", "true", "try", "void", "volatile", "while",
];

fn uri_param_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\{([^{}/]+)\}").expect("valid URI parameter regex"))
}

/// Capitalize the first letter of a string
pub fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        None => String::new(),
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
    }
}

/// Lower-case the first letter of a string
pub fn uncapitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        None => String::new(),
        Some(first) => first.to_lowercase().collect::<String>() + chars.as_str(),
    }
}

/// Whether `name` is a reserved word
pub fn is_reserved(name: &str) -> bool { JAVA_KEYWORDS.contains(&name) }

fn words(raw: &str) -> Vec<&str> {
    raw.split(|c: char| !c.is_alphanumeric()).filter(|w| !w.is_empty()).collect()
}

/// Convert free text to a PascalCase type name
///
/// ```
/// use restgen_codegen::utils::to_class_name;
/// assert_eq!(to_class_name("/users"), "Users");
/// assert_eq!(to_class_name("song-lyrics"), "SongLyrics");
/// assert_eq!(to_class_name("3d models"), "_3dModels");
/// ```
pub fn to_class_name(raw: &str) -> String {
    let name: String = words(raw).into_iter().map(capitalize).collect();
    if name.is_empty() {
        return "Root".to_string();
    }
    if name.starts_with(|c: char| c.is_ascii_digit()) {
        return format!("_{}", name);
    }
    name
}

/// Convert free text to a camelCase member name
///
/// ```
/// use restgen_codegen::utils::to_member_name;
/// assert_eq!(to_member_name("user-id"), "userId");
/// assert_eq!(to_member_name("Content-Type"), "contentType");
/// assert_eq!(to_member_name("class"), "_class");
/// ```
pub fn to_member_name(raw: &str) -> String {
    let name = uncapitalize(&to_class_name(raw));
    if is_reserved(&name) {
        return format!("_{}", name);
    }
    name
}

/// Convert free text to an UPPER_SNAKE constant name
///
/// ```
/// use restgen_codegen::utils::to_constant_name;
/// assert_eq!(to_constant_name("application/json"), "APPLICATION_JSON");
/// assert_eq!(to_constant_name("camelCase"), "CAMEL_CASE");
/// assert_eq!(to_constant_name("3d"), "_3D");
/// ```
pub fn to_constant_name(raw: &str) -> String {
    let mut result = String::new();
    for word in words(raw) {
        if !result.is_empty() {
            result.push('_');
        }
        let chars: Vec<char> = word.chars().collect();
        for (i, c) in chars.iter().enumerate() {
            if c.is_uppercase() && i > 0 && chars[i - 1].is_lowercase() {
                result.push('_');
            }
            result.extend(c.to_uppercase());
        }
    }
    if result.is_empty() {
        return "_".to_string();
    }
    if result.starts_with(|c: char| c.is_ascii_digit()) {
        return format!("_{}", result);
    }
    result
}

/// Names of the `{template}` parameters of a URI, in order of appearance
pub fn uri_template_params(uri: &str) -> Vec<String> {
    uri_param_regex().captures_iter(uri).map(|c| c[1].to_string()).collect()
}

/// Build a resource method name from the HTTP verb and the URI below the
/// resource interface
///
/// Static segments are appended in PascalCase, template parameters as
/// `By<Param>`.
///
/// ```
/// use restgen_codegen::utils::resource_method_name;
/// assert_eq!(resource_method_name("GET", ""), "get");
/// assert_eq!(resource_method_name("get", "/{userId}"), "getByUserId");
/// assert_eq!(resource_method_name("post", "/{userId}/orders"), "postByUserIdOrders");
/// ```
pub fn resource_method_name(verb: &str, relative_uri: &str) -> String {
    let mut name = to_member_name(&verb.to_lowercase());
    for segment in relative_uri.split('/').filter(|s| !s.is_empty()) {
        let params = uri_template_params(segment);
        if params.is_empty() {
            name.push_str(&to_class_name(segment));
        } else {
            for param in params {
                name.push_str("By");
                name.push_str(&to_class_name(&param));
            }
        }
    }
    name
}
