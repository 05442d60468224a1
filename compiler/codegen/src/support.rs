//! Support files shipped alongside generated sources.
//!
//! Templates are embedded at build time and selected by JAX-RS version. The
//! only substitution is the support package name.

use config::JaxrsVersion;

/// Placeholder replaced by the support package name.
pub const SUPPORT_PACKAGE_PLACEHOLDER: &str = "${codegen.support.package}";

/// Simple name of the response wrapper type.
pub const RESPONSE_WRAPPER_NAME: &str = "ResponseWrapper";

const RESPONSE_WRAPPER_1_1: &str = include_str!("../templates/ResponseWrapper.1.1.template");
const RESPONSE_WRAPPER_2_0: &str = include_str!("../templates/ResponseWrapper.2.0.template");

/// Raw response wrapper template for `version`.
pub fn response_wrapper_template(version: JaxrsVersion) -> &'static str {
    match version {
        JaxrsVersion::V1_1 => RESPONSE_WRAPPER_1_1,
        JaxrsVersion::V2_0 => RESPONSE_WRAPPER_2_0,
    }
}

/// Response wrapper source for `support_package`.
pub fn render_response_wrapper(version: JaxrsVersion, support_package: &str) -> String {
    response_wrapper_template(version).replace(SUPPORT_PACKAGE_PLACEHOLDER, support_package)
}

/// Output path of the response wrapper, relative to the output directory.
///
/// ```
/// use restgen_codegen::support::response_wrapper_path;
/// assert_eq!(response_wrapper_path("com.acme.support"), "com/acme/support/ResponseWrapper.java");
/// ```
pub fn response_wrapper_path(support_package: &str) -> String {
    format!("{}/{}.java", support_package.replace('.', "/"), RESPONSE_WRAPPER_NAME)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_templates_carry_placeholder() {
        for version in [JaxrsVersion::V1_1, JaxrsVersion::V2_0] {
            let template = response_wrapper_template(version);
            assert!(template.contains(SUPPORT_PACKAGE_PLACEHOLDER), "{} template", version);
            assert!(template.contains("public class ResponseWrapper extends Response"));
        }
    }

    #[test]
    fn test_render_substitutes_package() {
        let source = render_response_wrapper(JaxrsVersion::V2_0, "com.acme.support");
        assert!(source.contains("package com.acme.support;"));
        assert!(!source.contains(SUPPORT_PACKAGE_PLACEHOLDER));
        assert!(source.contains("getStatusInfo"));
        assert!(!render_response_wrapper(JaxrsVersion::V1_1, "x").contains("getStatusInfo"));
    }
}
