//! tabula-codegen: Generate TypeScript declarations and ordered seed data from relational schema metadata
//!
//! This crate provides both a CLI tool and a library. A schema model (a JSON
//! document produced by an introspection tool, or MySQL `CREATE TABLE` DDL
//! parsed with `sqlparser-rs`) runs through a pipeline that produces:
//!
//! - One file per table/view/composite type with a default-exported selector
//!   interface, plus initializer and mutator interfaces for tables
//! - Flavored identifier types for primary keys, reused by foreign keys
//! - Union types for enums and aliases for domains
//!
//! The companion seed preprocessor orders seed tables by their foreign keys
//! and resolves cross-row references.
//!
//! # Programmatic use
//!
//! ```rust,no_run
//! # async fn run() -> tabula_codegen::Result<()> {
//! tabula_codegen::CodegenBuilder::new("schema.json")
//!     .output_dir("src/generated")
//!     .exclude_entities(&["knex_migrations"])
//!     .index_file()
//!     .generate()
//!     .await?;
//! # Ok(())
//! # }
//! ```
//!
//! # Custom pipelines
//!
//! ```rust,no_run
//! use tabula_codegen::codegen::GenerationConfig;
//! use tabula_codegen::pipeline::{GenerateIndexFile, MarkAsGenerated, Pipeline};
//!
//! # async fn run(schemas: Vec<tabula_codegen::schema::Schema>) -> tabula_codegen::Result<()> {
//! let rendered = Pipeline::with_default_generators(GenerationConfig::default())
//!     .pre_render(GenerateIndexFile::default())
//!     .post_render(MarkAsGenerated)
//!     .run(&schemas)
//!     .await?;
//! # Ok(())
//! # }
//! ```
//!
//! # CLI Usage
//!
//! ```bash
//! tabula --schema schema.json --output ./src/generated generate
//! tabula --schema schema.json seed --input seeds/initial.json
//! ```

pub mod codegen;
pub mod config;
pub mod error;
pub mod pipeline;
pub mod schema;
pub mod seed;
pub mod writer;

use std::path::Path;

use tracing::{debug, info};

pub use codegen::RenderedOutput;
pub use config::CodegenConfig;
pub use error::{CodegenError, Result};

use pipeline::{GenerateIndexFile, MarkAsGenerated, Pipeline};
use schema::Schema;

/// Load the schema model named by the config
pub async fn load_schemas(config: &CodegenConfig) -> Result<Vec<Schema>> {
    let provider = schema::provider_for_file(&config.schema_file, &config.ddl_schema_name);
    let schemas = provider.load().await?;
    info!(
        "Loaded {} schemas ({} entities)",
        schemas.len(),
        schemas.iter().map(|s| s.entities.len()).sum::<usize>()
    );
    Ok(schemas)
}

/// Default generators plus the built-in hooks enabled in the config
pub fn build_pipeline(config: &CodegenConfig) -> Pipeline {
    let mut pipeline = Pipeline::with_default_generators(config.generation_config());
    if config.generate_index_file {
        pipeline = pipeline.pre_render(GenerateIndexFile::default());
    }
    if config.mark_as_generated {
        pipeline = pipeline.post_render(MarkAsGenerated);
    }
    pipeline
}

/// Main entry point for code generation.
///
/// Files are only written once every stage succeeded; in dry-run mode nothing
/// is written and the rendered files are just returned.
pub async fn generate(config: &CodegenConfig) -> Result<RenderedOutput> {
    let schemas = load_schemas(config).await?;
    let rendered = build_pipeline(config).run(&schemas).await?;
    debug!(
        "Rendered files: {:?}",
        rendered.paths().collect::<Vec<_>>()
    );

    if config.dry_run {
        info!("Dry run, skipping write of {} files", rendered.len());
    } else {
        writer::write_output(
            &rendered,
            &config.output_dir,
            config.pre_delete_output_folder,
        )?;
    }

    info!("Code generation complete");
    Ok(rendered)
}

/// Builder pattern for easy configuration in build scripts and tools
pub struct CodegenBuilder {
    config: CodegenConfig,
}

impl CodegenBuilder {
    /// Create a new builder with the given schema file
    pub fn new(schema_file: impl AsRef<Path>) -> Self {
        Self {
            config: CodegenConfig::default_with_schema(schema_file.as_ref().to_path_buf()),
        }
    }

    /// Set the output directory
    pub fn output_dir(mut self, dir: impl AsRef<Path>) -> Self {
        self.config.output_dir = dir.as_ref().to_path_buf();
        self
    }

    /// Set entities to include
    pub fn include_entities(mut self, entities: &[&str]) -> Self {
        self.config.include_entities = entities.join(",");
        self
    }

    /// Set entities to exclude
    pub fn exclude_entities(mut self, entities: &[&str]) -> Self {
        self.config.exclude_entities = entities.join(",");
        self
    }

    /// Schema name for tables read from a DDL file
    pub fn ddl_schema_name(mut self, name: &str) -> Self {
        self.config.ddl_schema_name = name.to_string();
        self
    }

    pub fn casing(mut self, casing: codegen::CasingConfig) -> Self {
        self.config.casing = casing;
        self
    }

    /// Map a qualified database type name to a TypeScript type
    pub fn map_type(mut self, type_name: &str, definition: codegen::TypeDefinition) -> Self {
        self.config
            .type_map
            .insert(type_name.to_string(), definition);
        self
    }

    /// Render nullable columns as `T | null` instead of optional properties
    pub fn ignore_default_values(mut self) -> Self {
        self.config.consider_default_values = false;
        self
    }

    /// Use the plain column types for identifiers
    pub fn without_identifier_types(mut self) -> Self {
        self.config.identifier_types = false;
        self
    }

    pub fn agents(mut self, agents: &[codegen::AgentNoun]) -> Self {
        self.config.agents = agents.to_vec();
        self
    }

    /// Add an index file re-exporting every type
    pub fn index_file(mut self) -> Self {
        self.config.generate_index_file = true;
        self
    }

    /// Skip the do-not-edit banner
    pub fn without_banner(mut self) -> Self {
        self.config.mark_as_generated = false;
        self
    }

    /// Remove the output directory before writing
    pub fn pre_delete_output_folder(mut self) -> Self {
        self.config.pre_delete_output_folder = true;
        self
    }

    /// Enable dry run mode (preview without writing files)
    pub fn dry_run(mut self) -> Self {
        self.config.dry_run = true;
        self
    }

    pub fn config(&self) -> &CodegenConfig {
        &self.config
    }

    /// Generate the code
    pub async fn generate(self) -> Result<RenderedOutput> {
        self.config.validate()?;
        generate(&self.config).await
    }
}
