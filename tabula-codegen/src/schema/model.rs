//! Introspected schema model handed to the generation core

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Parsed inline tags attached to a column or entity comment.
///
/// Tag extraction happens in the schema provider; the core only reads the
/// resulting map (`type`, `identifier`, ...).
pub type Tags = BTreeMap<String, serde_json::Value>;

/// One database schema (namespace)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Schema {
    /// Schema name (e.g., "public")
    pub name: String,

    /// Tables, views, materialized views and composite types, in source order
    #[serde(default)]
    pub entities: Vec<Entity>,

    /// Enum types
    #[serde(default)]
    pub enums: Vec<EnumType>,

    /// Domain types
    #[serde(default)]
    pub domains: Vec<DomainType>,
}

/// Kind of a generatable entity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    Table,
    View,
    MaterializedView,
    CompositeType,
}

/// A table, view, materialized view or composite type
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Entity {
    pub kind: EntityKind,

    /// Owning schema name, filled in by [`Schema::link`] when omitted
    #[serde(default)]
    pub schema: String,

    pub name: String,

    #[serde(default)]
    pub comment: Option<String>,

    /// Columns (or composite attributes) in source order
    #[serde(default)]
    pub columns: Vec<Column>,
}

/// Metadata for a column or composite attribute
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Column {
    pub name: String,

    /// Schema-qualified underlying type name (e.g., "pg_catalog.int4")
    pub type_name: String,

    #[serde(default)]
    pub is_array: bool,

    #[serde(default)]
    pub nullable: bool,

    /// Default value expression (if any)
    #[serde(default)]
    pub default_value: Option<String>,

    /// Identity column (values supplied by the database)
    #[serde(default)]
    pub is_identity: bool,

    /// GENERATED ALWAYS column, never written by clients
    #[serde(default)]
    pub generated: bool,

    /// Indices this column participates in
    #[serde(default)]
    pub indices: Vec<ColumnIndex>,

    /// Foreign-key targets
    #[serde(default)]
    pub references: Vec<ColumnReference>,

    /// Comment with tags already stripped
    #[serde(default)]
    pub comment: Option<String>,

    #[serde(default)]
    pub tags: Tags,
}

/// Index membership of a column
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnIndex {
    pub name: String,

    #[serde(default)]
    pub is_primary: bool,
}

/// Foreign-key target of a column
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnReference {
    /// Target schema; defaults to the referencing entity's schema
    #[serde(default)]
    pub schema: Option<String>,

    pub table: String,

    pub column: String,
}

/// An enum type with ordered literal values
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnumType {
    #[serde(default)]
    pub schema: String,

    pub name: String,

    pub values: Vec<String>,

    #[serde(default)]
    pub comment: Option<String>,
}

/// A domain over a base type
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DomainType {
    #[serde(default)]
    pub schema: String,

    pub name: String,

    /// Schema-qualified base type name
    pub base_type: String,

    #[serde(default)]
    pub comment: Option<String>,
}

impl Schema {
    /// Propagate the schema name into children that omitted it
    pub fn link(mut self) -> Self {
        for entity in &mut self.entities {
            if entity.schema.is_empty() {
                entity.schema = self.name.clone();
            }
        }
        for enum_type in &mut self.enums {
            if enum_type.schema.is_empty() {
                enum_type.schema = self.name.clone();
            }
        }
        for domain in &mut self.domains {
            if domain.schema.is_empty() {
                domain.schema = self.name.clone();
            }
        }
        self
    }

    /// Get an entity by name
    pub fn entity(&self, name: &str) -> Option<&Entity> {
        self.entities.iter().find(|e| e.name == name)
    }

    /// All generatable subjects: entities first, then enums, then domains
    pub fn subjects(&self) -> impl Iterator<Item = Subject<'_>> {
        self.entities
            .iter()
            .map(Subject::Entity)
            .chain(self.enums.iter().map(Subject::Enum))
            .chain(self.domains.iter().map(Subject::Domain))
    }
}

impl EntityKind {
    /// Human-readable label used in comments and logs
    pub fn label(&self) -> &'static str {
        match self {
            EntityKind::Table => "table",
            EntityKind::View => "view",
            EntityKind::MaterializedView => "materialized view",
            EntityKind::CompositeType => "composite type",
        }
    }
}

impl Entity {
    /// "schema.name"
    pub fn qualified_name(&self) -> String {
        format!("{}.{}", self.schema, self.name)
    }

    /// Get a column by name
    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name == name)
    }
}

impl Column {
    /// Check if the column is part of the primary key
    pub fn is_primary_key(&self) -> bool {
        self.indices.iter().any(|idx| idx.is_primary)
    }

    /// Primary-key columns and columns tagged `@identifier`
    pub fn is_identifier(&self) -> bool {
        self.is_primary_key() || self.tags.contains_key("identifier")
    }

    /// Whether the database can supply a value when the column is omitted
    pub fn has_default(&self) -> bool {
        self.default_value.is_some() || self.is_identity
    }

    pub fn is_foreign_key(&self) -> bool {
        !self.references.is_empty()
    }
}

impl ColumnReference {
    /// Target schema, falling back to the referencing entity's schema
    pub fn schema_or<'a>(&'a self, owner_schema: &'a str) -> &'a str {
        self.schema.as_deref().unwrap_or(owner_schema)
    }
}

impl EnumType {
    pub fn qualified_name(&self) -> String {
        format!("{}.{}", self.schema, self.name)
    }
}

impl DomainType {
    pub fn qualified_name(&self) -> String {
        format!("{}.{}", self.schema, self.name)
    }
}

/// Borrowed view over anything a generator can be asked to handle
#[derive(Debug, Clone, Copy)]
pub enum Subject<'a> {
    Entity(&'a Entity),
    Enum(&'a EnumType),
    Domain(&'a DomainType),
}

impl<'a> Subject<'a> {
    pub fn schema(&self) -> &'a str {
        match self {
            Subject::Entity(e) => &e.schema,
            Subject::Enum(e) => &e.schema,
            Subject::Domain(d) => &d.schema,
        }
    }

    pub fn name(&self) -> &'a str {
        match self {
            Subject::Entity(e) => &e.name,
            Subject::Enum(e) => &e.name,
            Subject::Domain(d) => &d.name,
        }
    }

    pub fn comment(&self) -> Option<&'a str> {
        match self {
            Subject::Entity(e) => e.comment.as_deref(),
            Subject::Enum(e) => e.comment.as_deref(),
            Subject::Domain(d) => d.comment.as_deref(),
        }
    }

    pub fn kind_label(&self) -> &'static str {
        match self {
            Subject::Entity(e) => e.kind.label(),
            Subject::Enum(_) => "enum",
            Subject::Domain(_) => "domain",
        }
    }

    pub fn qualified_name(&self) -> String {
        format!("{}.{}", self.schema(), self.name())
    }
}

impl fmt::Display for Subject<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.kind_label(), self.qualified_name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_link_fills_schema_names() {
        let schema: Schema = serde_json::from_str(
            r#"{
                "name": "public",
                "entities": [
                    { "kind": "table", "name": "actor", "columns": [
                        { "name": "actor_id", "type_name": "pg_catalog.int4",
                          "indices": [{ "name": "actor_pkey", "is_primary": true }] }
                    ]}
                ],
                "enums": [{ "name": "mpaa_rating", "values": ["G", "PG"] }]
            }"#,
        )
        .unwrap();
        let schema = schema.link();

        assert_eq!(schema.entities[0].schema, "public");
        assert_eq!(schema.enums[0].qualified_name(), "public.mpaa_rating");
        assert!(schema.entities[0].columns[0].is_primary_key());
        assert!(schema.entities[0].columns[0].is_identifier());
    }

    #[test]
    fn test_subject_order_and_display() {
        let schema = Schema {
            name: "public".into(),
            entities: vec![Entity {
                kind: EntityKind::MaterializedView,
                schema: "public".into(),
                name: "sales".into(),
                comment: None,
                columns: vec![],
            }],
            enums: vec![EnumType {
                schema: "public".into(),
                name: "mood".into(),
                values: vec!["sad".into()],
                comment: None,
            }],
            domains: vec![],
        };

        let labels: Vec<String> = schema.subjects().map(|s| s.to_string()).collect();
        assert_eq!(
            labels,
            vec!["materialized view public.sales", "enum public.mood"]
        );
    }

    #[test]
    fn test_identifier_tag() {
        let mut column = Column {
            name: "code".into(),
            type_name: "pg_catalog.text".into(),
            ..Default::default()
        };
        assert!(!column.is_identifier());
        column
            .tags
            .insert("identifier".into(), serde_json::Value::Bool(true));
        assert!(column.is_identifier());
    }
}
