//! Schema providers: where the immutable schema model comes from

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use serde::Deserialize;
use tracing::{debug, info};

use super::ddl::parse_schema;
use super::model::Schema;
use crate::error::Result;

/// Supplies the schema model for one generation run.
///
/// Live-database introspection lives outside this crate; anything that can
/// produce [`Schema`] values can drive the pipeline.
#[async_trait]
pub trait SchemaProvider: Send + Sync {
    /// Load all schemas. Called once per run.
    async fn load(&self) -> Result<Vec<Schema>>;
}

/// Reads a serialized schema model (a single schema object or an array of them)
pub struct JsonSchemaProvider {
    path: PathBuf,
}

/// Parses `CREATE TABLE` DDL into a single schema
pub struct DdlSchemaProvider {
    path: PathBuf,
    schema_name: String,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum SchemaDocument {
    Many(Vec<Schema>),
    One(Schema),
}

impl JsonSchemaProvider {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl DdlSchemaProvider {
    pub fn new(path: impl Into<PathBuf>, schema_name: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            schema_name: schema_name.into(),
        }
    }
}

/// Parse a JSON schema document
pub fn parse_schema_json(json: &str) -> Result<Vec<Schema>> {
    let schemas = match serde_json::from_str::<SchemaDocument>(json)? {
        SchemaDocument::Many(schemas) => schemas,
        SchemaDocument::One(schema) => vec![schema],
    };
    Ok(schemas.into_iter().map(Schema::link).collect())
}

#[async_trait]
impl SchemaProvider for JsonSchemaProvider {
    async fn load(&self) -> Result<Vec<Schema>> {
        info!("Loading schema model: {:?}", self.path);
        let json = tokio::fs::read_to_string(&self.path).await?;
        let schemas = parse_schema_json(&json)?;
        debug!("Loaded {} schemas", schemas.len());
        Ok(schemas)
    }
}

#[async_trait]
impl SchemaProvider for DdlSchemaProvider {
    async fn load(&self) -> Result<Vec<Schema>> {
        info!("Parsing schema DDL: {:?}", self.path);
        let sql = tokio::fs::read_to_string(&self.path).await?;
        let schema = parse_schema(&sql, &self.schema_name)?;
        debug!("Found {} tables", schema.entities.len());
        Ok(vec![schema])
    }
}

/// Pick a provider from the file extension: `.sql` is DDL, anything else JSON
pub fn provider_for_file(path: &Path, ddl_schema_name: &str) -> Box<dyn SchemaProvider> {
    let is_sql = path
        .extension()
        .map(|ext| ext.eq_ignore_ascii_case("sql"))
        .unwrap_or(false);
    if is_sql {
        Box::new(DdlSchemaProvider::new(path, ddl_schema_name))
    } else {
        Box::new(JsonSchemaProvider::new(path))
    }
}
