//! Error types for tabula-codegen

use thiserror::Error;

/// Result type alias for tabula-codegen operations
pub type Result<T> = std::result::Result<T, CodegenError>;

/// Errors that can occur during code generation and seed preprocessing
#[derive(Error, Debug)]
pub enum CodegenError {
    #[error("Unsalvageable name: {0:?}")]
    UnsalvageableName(String),

    #[error("Name collision in {declaration}: `{first}` and `{second}` both resolve to `{resolved}`")]
    Collision {
        declaration: String,
        first: String,
        second: String,
        resolved: String,
    },

    #[error("Duplicate declaration `{name}` in {path}")]
    DuplicateDeclaration { path: String, name: String },

    #[error("Conflicting file kinds merged into {path}")]
    FileKindMismatch { path: String },

    #[error("Invalid @{tag} tag on {entity}.{column}: {message}")]
    InvalidTag {
        entity: String,
        column: String,
        tag: String,
        message: String,
    },

    #[error("Table not found: {0}")]
    TableNotFound(String),

    #[error("Column not found: {table}.{column}")]
    ColumnNotFound { table: String, column: String },

    #[error("Column {table}.{column} is tagged as a reference but is not a foreign key")]
    NotAForeignKey { table: String, column: String },

    #[error("No row with key {key:?} in seed table {table}")]
    RowNotFound { table: String, key: String },

    #[error("Duplicate row key {key:?} in seed table {table}")]
    DuplicateRowKey { table: String, key: String },

    #[error("Seed tables form a dependency cycle: {}", tables.join(", "))]
    DependencyCycle { tables: Vec<String> },

    #[error("Generator `{generator}` failed on {subject}: {source}")]
    Generator {
        generator: String,
        subject: String,
        #[source]
        source: Box<CodegenError>,
    },

    #[error("Pre-render hook `{hook}` failed: {source}")]
    PreRenderHook {
        hook: String,
        #[source]
        source: anyhow::Error,
    },

    #[error("Post-render hook `{hook}` failed: {source}")]
    PostRenderHook {
        hook: String,
        #[source]
        source: anyhow::Error,
    },

    #[error("Failed to render {path}: {source}")]
    Render {
        path: String,
        #[source]
        source: Box<CodegenError>,
    },

    #[error("Failed to parse SQL schema: {0}")]
    ParseError(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl From<sqlparser::parser::ParserError> for CodegenError {
    fn from(err: sqlparser::parser::ParserError) -> Self {
        CodegenError::ParseError(err.to_string())
    }
}

impl From<config::ConfigError> for CodegenError {
    fn from(err: config::ConfigError) -> Self {
        CodegenError::ConfigError(err.to_string())
    }
}
