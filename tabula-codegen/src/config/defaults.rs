//! Default configuration values - single source of truth

/// Default include pattern (all entities)
pub const INCLUDE_ENTITIES: &str = "*";

/// Default exclude pattern (none)
pub const EXCLUDE_ENTITIES: &str = "";

/// Schema name assigned to tables read from a DDL file
pub const DDL_SCHEMA_NAME: &str = "public";

/// Default output directory
pub const OUTPUT_DIR: &str = "./generated";

/// Whether to clear the output directory before writing
pub const PRE_DELETE_OUTPUT_FOLDER: bool = false;

/// Whether to run in dry-run mode by default
pub const DRY_RUN: bool = false;

/// Whether nullable/defaulted columns become optional properties
pub const CONSIDER_DEFAULT_VALUES: bool = true;

/// Whether identifier columns get flavored alias types
pub const IDENTIFIER_TYPES: bool = true;

/// Whether to add an index file re-exporting all types
pub const GENERATE_INDEX_FILE: bool = false;

/// Whether to stamp rendered files with a do-not-edit banner
pub const MARK_AS_GENERATED: bool = true;

/// Environment variable prefix (`TABULA_OUTPUT_DIR`, ...)
pub const ENV_PREFIX: &str = "TABULA";

/// Config file looked up when none is given (`tabula.toml`, ...)
pub const CONFIG_FILE_NAME: &str = "tabula";
