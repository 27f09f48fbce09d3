//! Configuration management for the Ecore toolkit
//!
//! Supports loading configuration from:
//! - Default values
//! - Config file (ecore.toml)
//! - Environment variables (ECORE__*)
//!
//! ## Example config file (ecore.toml):
//! ```toml
//! [parser]
//! type_discriminator = "xsi:type"
//!
//! [loader]
//! extensions = ["ecore"]
//! skip_prefixes = ["target/", ".git/"]
//!
//! [codegen.naming]
//! impl_suffix = "Impl"
//!
//! [codegen.types]
//! many = "Vec<{}>"
//! class_ref = "Rc<dyn {}>"
//!
//! [[codegen.types.data_types]]
//! ecore = "EDate"
//! rust = "std::time::SystemTime"
//! scalar = "other"
//! ```

use config_crate::{Config, ConfigError, Environment, File};
use serde::{Deserialize, Serialize};

use crate::codegen::CodegenConfig;
use crate::loader::LoadConfig;
use crate::parser::ParserConfig;

/// Main configuration for the toolkit
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ToolkitConfig {
    /// Event builder settings
    #[serde(default)]
    pub parser: ParserConfig,

    /// Directory loading settings
    #[serde(default)]
    pub loader: LoadConfig,

    /// Code generation settings
    #[serde(default)]
    pub codegen: CodegenConfig,
}

impl ToolkitConfig {
    /// Load configuration from default locations
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(None)
    }

    /// Load configuration with an optional explicit file
    pub fn load_from(config_path: Option<&str>) -> Result<Self, ConfigError> {
        let mut builder = Config::builder();

        // Load from default locations
        let config_locations = ["ecore.toml", ".ecore.toml", "config/ecore.toml"];

        for location in config_locations {
            builder = builder.add_source(File::with_name(location).required(false));
        }

        // Load from XDG config directory
        if let Some(config_dir) = directories::ProjectDirs::from("dev", "recore", "ecore-schemas") {
            let xdg_config = config_dir.config_dir().join("ecore.toml");
            if xdg_config.exists() {
                builder = builder.add_source(File::from(xdg_config).required(false));
            }
        }

        // Load from specified path
        if let Some(path) = config_path {
            builder = builder.add_source(File::with_name(path).required(true));
        }

        // Load from environment variables (ECORE__*)
        builder = builder.add_source(
            Environment::with_prefix("ECORE")
                .separator("__")
                .try_parsing(true),
        );

        let config = builder.build()?;
        config.try_deserialize()
    }

    /// Save configuration to a TOML file
    pub fn save(&self, path: &str) -> std::io::Result<()> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?;
        std::fs::write(path, content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_config() {
        let config = ToolkitConfig::default();
        assert_eq!(config.parser.type_discriminator, "xsi:type");
        assert_eq!(config.loader.extensions, vec!["ecore".to_string()]);
        assert_eq!(config.codegen.naming.impl_suffix, "Impl");
    }

    #[test]
    fn test_serialize_config() {
        let config = ToolkitConfig::default();
        let toml_str = toml::to_string_pretty(&config).unwrap();
        assert!(toml_str.contains("[parser]"));
        assert!(toml_str.contains("[loader]"));
        assert!(toml_str.contains("type_discriminator"));
    }

    #[test]
    fn test_save_and_load_explicit_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("custom.toml");
        let path_str = path.to_str().unwrap();

        let mut config = ToolkitConfig::default();
        config.parser.type_discriminator = "xsi:kind".to_string();
        config.codegen.naming.impl_suffix = "Data".to_string();
        config.save(path_str).unwrap();

        let loaded = ToolkitConfig::load_from(Some(path_str)).unwrap();
        assert_eq!(loaded.parser.type_discriminator, "xsi:kind");
        assert_eq!(loaded.codegen.naming.impl_suffix, "Data");
        assert!(loaded.codegen.types.data_type("EString").is_some());
    }

    #[test]
    fn test_data_type_entries_keep_builtin_table() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("types.toml");
        std::fs::write(
            &path,
            "[[codegen.types.data_types]]\necore = \"EDate\"\nrust = \"std::time::SystemTime\"\nscalar = \"other\"\n",
        )
        .unwrap();

        let loaded = ToolkitConfig::load_from(path.to_str()).unwrap();
        let types = &loaded.codegen.types;
        assert_eq!(types.data_type("EDate").unwrap().rust, "std::time::SystemTime");
        assert_eq!(types.data_type("EString").unwrap().rust, "String");
        assert_eq!(types.data_type("EInt").unwrap().rust, "i32");
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("partial.toml");
        std::fs::write(&path, "[loader]\nextensions = [\"xcore\"]\n").unwrap();

        let loaded = ToolkitConfig::load_from(path.to_str()).unwrap();
        assert_eq!(loaded.loader.extensions, vec!["xcore".to_string()]);
        assert_eq!(loaded.loader.skip_prefixes.len(), 2);
        assert_eq!(loaded.parser.type_discriminator, "xsi:type");
    }
}
