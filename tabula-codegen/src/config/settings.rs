//! Configuration settings for tabula-codegen

use config::{Config, Environment, File};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use super::defaults;
use crate::codegen::{
    AgentNoun, CasingConfig, EntityFilter, FlavoredIdentifier, GenerationConfig, TypeDefinition,
};
use crate::error::{CodegenError, Result};
use crate::schema::Subject;

/// Main configuration struct for code generation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CodegenConfig {
    /// Path to the schema file (JSON schema model or `.sql` DDL)
    #[serde(default)]
    pub schema_file: PathBuf,

    /// Schema name given to tables read from a DDL file
    #[serde(default = "default_ddl_schema_name")]
    pub ddl_schema_name: String,

    /// Entities to include (comma-separated, or "*" for all)
    #[serde(default = "default_include_entities")]
    pub include_entities: String,

    /// Entities to exclude (comma-separated)
    #[serde(default = "default_exclude_entities")]
    pub exclude_entities: String,

    /// Output directory for generated files
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,

    /// Remove the output directory before writing
    #[serde(default = "default_pre_delete_output_folder")]
    pub pre_delete_output_folder: bool,

    /// Dry run mode - preview without writing files
    #[serde(default = "default_dry_run")]
    pub dry_run: bool,

    /// Log level (trace, debug, info, warn, error)
    /// Can be overridden by RUST_LOG env var
    #[serde(default)]
    pub log_level: Option<String>,

    #[serde(default)]
    pub casing: CasingConfig,

    /// Qualified type name -> TypeScript type
    #[serde(default)]
    pub type_map: IndexMap<String, TypeDefinition>,

    #[serde(default = "default_consider_default_values")]
    pub consider_default_values: bool,

    /// Generate flavored identifier types for primary keys
    #[serde(default = "default_identifier_types")]
    pub identifier_types: bool,

    /// Interfaces generated per table
    #[serde(default = "default_agents")]
    pub agents: Vec<AgentNoun>,

    #[serde(default = "default_generate_index_file")]
    pub generate_index_file: bool,

    #[serde(default = "default_mark_as_generated")]
    pub mark_as_generated: bool,
}

// Default value functions for serde
fn default_ddl_schema_name() -> String {
    defaults::DDL_SCHEMA_NAME.to_string()
}
fn default_include_entities() -> String {
    defaults::INCLUDE_ENTITIES.to_string()
}
fn default_exclude_entities() -> String {
    defaults::EXCLUDE_ENTITIES.to_string()
}
fn default_output_dir() -> PathBuf {
    PathBuf::from(defaults::OUTPUT_DIR)
}
fn default_pre_delete_output_folder() -> bool {
    defaults::PRE_DELETE_OUTPUT_FOLDER
}
fn default_dry_run() -> bool {
    defaults::DRY_RUN
}
fn default_consider_default_values() -> bool {
    defaults::CONSIDER_DEFAULT_VALUES
}
fn default_identifier_types() -> bool {
    defaults::IDENTIFIER_TYPES
}
fn default_agents() -> Vec<AgentNoun> {
    vec![
        AgentNoun::Selector,
        AgentNoun::Initializer,
        AgentNoun::Mutator,
    ]
}
fn default_generate_index_file() -> bool {
    defaults::GENERATE_INDEX_FILE
}
fn default_mark_as_generated() -> bool {
    defaults::MARK_AS_GENERATED
}

impl Default for CodegenConfig {
    fn default() -> Self {
        Self {
            schema_file: PathBuf::new(),
            ddl_schema_name: default_ddl_schema_name(),
            include_entities: default_include_entities(),
            exclude_entities: default_exclude_entities(),
            output_dir: default_output_dir(),
            pre_delete_output_folder: default_pre_delete_output_folder(),
            dry_run: default_dry_run(),
            log_level: None,
            casing: CasingConfig::default(),
            type_map: IndexMap::new(),
            consider_default_values: default_consider_default_values(),
            identifier_types: default_identifier_types(),
            agents: default_agents(),
            generate_index_file: default_generate_index_file(),
            mark_as_generated: default_mark_as_generated(),
        }
    }
}

impl CodegenConfig {
    /// Create a default config with the given schema file
    pub fn default_with_schema(schema_file: PathBuf) -> Self {
        Self {
            schema_file,
            ..Default::default()
        }
    }

    /// Load configuration from a TOML file
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: CodegenConfig = toml::from_str(&content).map_err(|e| {
            CodegenError::ConfigError(format!(
                "Failed to parse config file {}: {}",
                path.display(),
                e
            ))
        })?;
        Ok(config)
    }

    /// Load configuration using config-rs (file + environment variables)
    pub fn load(config_path: Option<&Path>) -> Result<Self> {
        let mut builder = Config::builder();

        if let Some(path) = config_path {
            builder = builder.add_source(File::from(path));
        } else {
            builder =
                builder.add_source(File::with_name(defaults::CONFIG_FILE_NAME).required(false));
        }

        // TABULA_OUTPUT_DIR, TABULA_CASING__TYPE_NAME, ...
        builder = builder.add_source(
            Environment::with_prefix(defaults::ENV_PREFIX)
                .prefix_separator("_")
                .separator("__"),
        );

        let config: CodegenConfig = builder.build()?.try_deserialize()?;

        Ok(config)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if self.schema_file.as_os_str().is_empty() {
            return Err(CodegenError::ValidationError(
                "schema_file is required".into(),
            ));
        }

        if !self.schema_file.exists() {
            return Err(CodegenError::ValidationError(format!(
                "Schema file not found: {}",
                self.schema_file.display()
            )));
        }

        if self.agents.is_empty() {
            return Err(CodegenError::ValidationError(
                "agents must name at least one of selector, initializer, mutator".into(),
            ));
        }

        if !self.agents.contains(&AgentNoun::Selector) {
            return Err(CodegenError::ValidationError(
                "agents must include selector (views and composite types only have a selector)"
                    .into(),
            ));
        }

        if !self.dry_run && self.output_dir.as_os_str().is_empty() {
            return Err(CodegenError::ValidationError(
                "output_dir is required unless dry_run is set".into(),
            ));
        }

        Ok(())
    }

    /// Entity filter built from the include/exclude lists
    pub fn entity_filter(&self) -> Option<EntityFilter> {
        entity_filter(&self.include_entities, &self.exclude_entities)
    }

    /// Runtime generation settings with the default plug-ins
    pub fn generation_config(&self) -> GenerationConfig {
        GenerationConfig {
            casing: self.casing,
            type_map: self.type_map.clone(),
            consider_default_values: self.consider_default_values,
            agents: self.agents.clone(),
            identifier_types: if self.identifier_types {
                Some(Arc::new(FlavoredIdentifier))
            } else {
                None
            },
            filter: self.entity_filter(),
            ..Default::default()
        }
    }
}

/// Filter subjects by include/exclude patterns.
///
/// Patterns match either the plain name or the qualified `schema.name`.
/// Returns `None` when everything is included and nothing excluded.
pub fn entity_filter(include: &str, exclude: &str) -> Option<EntityFilter> {
    let include_all = include.trim() == "*" || include.trim().is_empty();
    let include_set: Vec<String> = if include_all {
        Vec::new()
    } else {
        split_list(include)
    };
    let exclude_set = split_list(exclude);

    if include_all && exclude_set.is_empty() {
        return None;
    }

    let matches = |set: &[String], subject: &Subject<'_>| {
        let qualified = subject.qualified_name();
        set.iter()
            .any(|pattern| pattern == subject.name() || *pattern == qualified)
    };

    Some(Arc::new(move |subject: &Subject<'_>| {
        let included = include_all || matches(&include_set, subject);
        let excluded = matches(&exclude_set, subject);
        included && !excluded
    }))
}

fn split_list(list: &str) -> Vec<String> {
    list.split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}
