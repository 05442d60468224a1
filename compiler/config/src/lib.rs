#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![deny(clippy::unwrap_used)]

//! restgen Configuration
//!
//! This crate provides configuration management for restgen.
//! It handles loading, saving, and validating configuration files that specify:
//! - Code generation parameters (base package, output directory, JAX-RS version)
//! - Schema-to-type generation options (annotation style, number mapping)
//! - Logging configuration
//!
//! Configuration is stored in TOML format and can be loaded from files or created
//! with sensible defaults.

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors that can occur when loading, saving or validating configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read the configuration file from disk
    #[error("Failed to read config file: {0}")]
    FileRead(#[from] std::io::Error),
    /// Failed to parse the TOML configuration file
    #[error("Failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),
    /// Failed to serialize configuration to TOML format
    #[error("Failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),
    /// Could not locate the user's configuration directory
    #[error("Could not find user config directory")]
    ConfigDirUnavailable,
    /// A required setting is missing or malformed
    #[error("Invalid configuration: {0}")]
    Invalid(String),
    /// Unknown JAX-RS version key
    #[error("Unknown JAX-RS version '{0}'. Supported: 1.1, 2.0")]
    UnknownJaxrsVersion(String),
    /// Unknown JSON annotation style
    #[error("Unknown JSON mapper '{0}'. Supported: jackson1, jackson2, gson, none")]
    UnknownAnnotationStyle(String),
}

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Code generation settings
    pub codegen: CodegenConfig,
    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Code generation configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CodegenConfig {
    /// Base package of all generated types (e.g., "com.acme.api")
    pub base_package_name: String,
    /// Where to write generated sources
    pub output_directory: PathBuf,
    /// Directory that relative schema references are resolved against
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_directory: Option<PathBuf>,
    /// Target JAX-RS version, selects the support templates
    #[serde(default)]
    pub jaxrs_version: JaxrsVersion,
    /// Annotation style applied to schema-derived value types
    #[serde(default)]
    pub json_mapper: AnnotationStyle,
    /// Map JSON schema `integer` to `Long` instead of `Integer`
    #[serde(default)]
    pub use_long_integers: bool,
    /// Map JSON schema `number` to `Double` instead of `Float`
    #[serde(default = "default_true")]
    pub use_double_numbers: bool,
}

fn default_true() -> bool { true }

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    pub level: String,
    /// Emit JSON lines instead of human readable output
    #[serde(default)]
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self { Self { level: "info".to_string(), json: false } }
}

/// Supported JAX-RS versions.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum JaxrsVersion {
    /// JAX-RS 1.1
    #[default]
    #[serde(rename = "1.1")]
    V1_1,
    /// JAX-RS 2.0
    #[serde(rename = "2.0")]
    V2_0,
}

impl JaxrsVersion {
    /// Version key as used in template names.
    pub fn as_str(&self) -> &'static str {
        match self {
            JaxrsVersion::V1_1 => "1.1",
            JaxrsVersion::V2_0 => "2.0",
        }
    }
}

impl fmt::Display for JaxrsVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(self.as_str()) }
}

impl FromStr for JaxrsVersion {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "1.1" | "1" => Ok(JaxrsVersion::V1_1),
            "2.0" | "2" => Ok(JaxrsVersion::V2_0),
            other => Err(ConfigError::UnknownJaxrsVersion(other.to_string())),
        }
    }
}

/// Annotation style for schema-derived value types.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnnotationStyle {
    /// Jackson 1.x (`org.codehaus.jackson`)
    #[default]
    Jackson1,
    /// Jackson 2.x (`com.fasterxml.jackson`)
    Jackson2,
    /// Gson
    Gson,
    /// No annotations
    None,
}

impl FromStr for AnnotationStyle {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "jackson1" | "jackson" => Ok(AnnotationStyle::Jackson1),
            "jackson2" => Ok(AnnotationStyle::Jackson2),
            "gson" => Ok(AnnotationStyle::Gson),
            "none" => Ok(AnnotationStyle::None),
            other => Err(ConfigError::UnknownAnnotationStyle(other.to_string())),
        }
    }
}

/// Options handed to the schema-to-type mapper.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SchemaGenerationConfig {
    /// Annotation style for generated fields
    pub annotation_style: AnnotationStyle,
    /// `integer` → `Long`
    pub use_long_integers: bool,
    /// `number` → `Double`
    pub use_double_numbers: bool,
}

impl CodegenConfig {
    /// Create a configuration with default options.
    pub fn new(base_package_name: impl Into<String>, output_directory: impl Into<PathBuf>) -> Self {
        Self {
            base_package_name: base_package_name.into(),
            output_directory: output_directory.into(),
            source_directory: None,
            jaxrs_version: JaxrsVersion::default(),
            json_mapper: AnnotationStyle::default(),
            use_long_integers: false,
            use_double_numbers: true,
        }
    }

    /// Check the settings required before any generation work begins.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.base_package_name.trim().is_empty() {
            return Err(ConfigError::Invalid("base_package_name can't be empty".to_string()));
        }
        if let Some(segment) =
            self.base_package_name.split('.').find(|segment| !is_java_identifier(segment))
        {
            return Err(ConfigError::Invalid(format!(
                "base_package_name '{}' has invalid segment '{}'",
                self.base_package_name, segment
            )));
        }
        if self.output_directory.as_os_str().is_empty() {
            return Err(ConfigError::Invalid("output_directory can't be empty".to_string()));
        }
        Ok(())
    }

    /// Package of generated resource interfaces.
    pub fn resource_package(&self) -> String { format!("{}.resource", self.base_package_name) }

    /// Package of schema-derived value types.
    pub fn model_package(&self) -> String { format!("{}.model", self.base_package_name) }

    /// Package of support types (custom annotations, response wrapper).
    pub fn support_package(&self) -> String { format!("{}.support", self.base_package_name) }

    /// Options for the schema-to-type mapper.
    pub fn schema_generation_config(&self) -> SchemaGenerationConfig {
        SchemaGenerationConfig {
            annotation_style: self.json_mapper,
            use_long_integers: self.use_long_integers,
            use_double_numbers: self.use_double_numbers,
        }
    }
}

fn is_java_identifier(segment: &str) -> bool {
    let mut chars = segment.chars();
    match chars.next() {
        Some(c) if c.is_alphabetic() || c == '_' || c == '$' => {}
        _ => return false,
    }
    chars.all(|c| c.is_alphanumeric() || c == '_' || c == '$')
}

impl Config {
    /// Load and validate configuration from a TOML file at `path`
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path.as_ref())?;
        let config: Config = toml::from_str(&contents)?;
        config.codegen.validate()?;
        Ok(config)
    }

    /// Save this configuration as a pretty-printed TOML file at `path`
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), ConfigError> {
        let contents = toml::to_string_pretty(self)?;
        std::fs::write(path, contents)?;
        Ok(())
    }

    /// Returns the default config file path:
    /// `{config_dir()}/restgen/config.toml`
    pub fn default_path() -> Result<PathBuf, ConfigError> {
        let config_dir =
            dirs::config_dir().ok_or(ConfigError::ConfigDirUnavailable)?.join("restgen");
        Ok(config_dir.join("config.toml"))
    }

    /// Get the default output directory for generated code
    pub fn default_output_dir() -> PathBuf {
        Self::default_output_dir_internal(std::env::current_dir().ok())
    }

    fn default_output_dir_internal(current_dir: Option<PathBuf>) -> PathBuf {
        match current_dir {
            Some(dir) => dir.join("generated-sources"),
            None => PathBuf::from("generated-sources"),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            codegen: CodegenConfig::new("com.example.api", Self::default_output_dir()),
            logging: LoggingConfig::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use tempfile::NamedTempFile;

    use super::*;

    #[test]
    fn test_from_file() {
        let temp_file = NamedTempFile::new().expect("Failed to create temporary file");
        let toml_content = r#"
            [codegen]
            base_package_name = "com.acme.api"
            output_directory = "generated"
            jaxrs_version = "2.0"
            json_mapper = "gson"
            use_long_integers = true

            [logging]
            level = "debug"
            json = true
        "#;
        fs::write(&temp_file, toml_content).expect("Failed to write TOML content");

        let config = Config::from_file(&temp_file).expect("Failed to load config");
        assert_eq!(config.codegen.base_package_name, "com.acme.api");
        assert_eq!(config.codegen.output_directory, PathBuf::from("generated"));
        assert_eq!(config.codegen.jaxrs_version, JaxrsVersion::V2_0);
        assert_eq!(config.codegen.json_mapper, AnnotationStyle::Gson);
        assert!(config.codegen.use_long_integers);
        assert!(config.codegen.use_double_numbers);
        assert_eq!(config.codegen.source_directory, None);
        assert_eq!(config.logging.level, "debug");
        assert!(config.logging.json);

        // Minimal file falls back to defaults
        let minimal = NamedTempFile::new().expect("Failed to create temporary file");
        fs::write(
            &minimal,
            "[codegen]\nbase_package_name = \"org.x\"\noutput_directory = \"out\"\n",
        )
        .expect("Failed to write minimal TOML");
        let config = Config::from_file(&minimal).expect("Failed to load minimal config");
        assert_eq!(config.codegen.jaxrs_version, JaxrsVersion::V1_1);
        assert_eq!(config.codegen.json_mapper, AnnotationStyle::Jackson1);
        assert_eq!(config.logging, LoggingConfig::default());

        // Test file not found error
        match Config::from_file("nonexistent_file.toml").expect_err("Expected error") {
            ConfigError::FileRead(_) => {}
            other => panic!("Expected FileRead error, got {:?}", other),
        }

        // Test parse error
        let invalid = NamedTempFile::new().expect("Failed to create temporary file");
        fs::write(&invalid, "invalid toml content").expect("Failed to write invalid TOML");
        match Config::from_file(&invalid).expect_err("Expected parse error") {
            ConfigError::Parse(_) => {}
            other => panic!("Expected Parse error, got {:?}", other),
        }

        // Test validation error surfaces at load time
        let empty_pkg = NamedTempFile::new().expect("Failed to create temporary file");
        fs::write(&empty_pkg, "[codegen]\nbase_package_name = \"\"\noutput_directory = \"out\"\n")
            .expect("Failed to write TOML");
        match Config::from_file(&empty_pkg).expect_err("Expected validation error") {
            ConfigError::Invalid(msg) => assert!(msg.contains("base_package_name")),
            other => panic!("Expected Invalid error, got {:?}", other),
        }
    }

    #[test]
    fn test_save_and_reload() {
        let mut config = Config::default();
        config.codegen.jaxrs_version = JaxrsVersion::V2_0;
        let temp_file = NamedTempFile::new().expect("Failed to create temporary file");

        config.save(&temp_file).expect("Failed to save config");
        let contents = fs::read_to_string(&temp_file).expect("Failed to read saved config");
        assert!(contents.contains("com.example.api"));
        assert!(contents.contains("\"2.0\""));

        let reloaded = Config::from_file(&temp_file).expect("Failed to reload config");
        assert_eq!(reloaded.codegen, config.codegen);

        let temp_dir = tempfile::tempdir().expect("Failed to create temporary directory");
        let missing = temp_dir.path().join("nonexistent").join("config.toml");
        match config.save(&missing).expect_err("Expected write error") {
            ConfigError::FileRead(_) => (),
            other => panic!("Expected FileRead error, got {:?}", other),
        }
    }

    #[test]
    fn test_validate() {
        assert!(CodegenConfig::new("com.acme", "out").validate().is_ok());
        assert!(CodegenConfig::new("acme", "out").validate().is_ok());
        assert!(CodegenConfig::new("  ", "out").validate().is_err());
        assert!(CodegenConfig::new("com..acme", "out").validate().is_err());
        assert!(CodegenConfig::new("com.1acme", "out").validate().is_err());
        assert!(CodegenConfig::new("com.acme-api", "out").validate().is_err());
        assert!(CodegenConfig::new("com.acme", "").validate().is_err());
    }

    #[test]
    fn test_packages() {
        let config = CodegenConfig::new("com.acme", "out");
        assert_eq!(config.resource_package(), "com.acme.resource");
        assert_eq!(config.model_package(), "com.acme.model");
        assert_eq!(config.support_package(), "com.acme.support");

        let schema = config.schema_generation_config();
        assert_eq!(schema.annotation_style, AnnotationStyle::Jackson1);
        assert!(!schema.use_long_integers);
        assert!(schema.use_double_numbers);
    }

    #[test]
    fn test_parse_enums() {
        assert_eq!("2.0".parse::<JaxrsVersion>().expect("2.0"), JaxrsVersion::V2_0);
        assert_eq!("1".parse::<JaxrsVersion>().expect("1"), JaxrsVersion::V1_1);
        assert!(matches!("3.0".parse::<JaxrsVersion>(), Err(ConfigError::UnknownJaxrsVersion(_))));
        assert_eq!(JaxrsVersion::V2_0.to_string(), "2.0");

        assert_eq!("Jackson2".parse::<AnnotationStyle>().expect("jackson2"), AnnotationStyle::Jackson2);
        assert_eq!("none".parse::<AnnotationStyle>().expect("none"), AnnotationStyle::None);
        assert!("moshi".parse::<AnnotationStyle>().is_err());
    }

    #[test]
    fn test_default_path() {
        let path = Config::default_path().expect("Failed to get default config path");
        let path_str = path.to_str().expect("Path should be valid UTF-8");
        assert!(path_str.contains("restgen"));
        assert!(path_str.ends_with("config.toml"));
    }

    #[test]
    fn test_default_output_dir_internal() {
        let dir = Config::default_output_dir_internal(Some(PathBuf::from("/tmp/current")));
        assert_eq!(dir, PathBuf::from("/tmp/current/generated-sources"));

        let dir = Config::default_output_dir_internal(None);
        assert_eq!(dir, PathBuf::from("generated-sources"));
    }
}
