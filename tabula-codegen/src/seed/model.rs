//! Seed input and output documents

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Role of a tagged seed column
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SeedTag {
    /// Row key other tables refer to; not inserted
    Index,
    /// Foreign-key column holding the key of a row in the referenced table
    Reference,
}

/// Seed data as authored, before ordering and reference resolution
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawSeedInput {
    #[serde(default)]
    pub tables: Vec<RawTable>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawTable {
    /// Table name, optionally schema-qualified
    pub name: String,

    #[serde(default)]
    pub tags: IndexMap<String, SeedTag>,

    #[serde(default)]
    pub rows: Vec<IndexMap<String, serde_json::Value>>,
}

/// Ordered, reference-resolved seed data
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SeedData {
    pub tables: Vec<TableData>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableData {
    pub schema: String,
    pub name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub index_column: Option<String>,

    pub rows: Vec<SeedRow>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeedRow {
    /// Value of the index column, if the table has one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key: Option<String>,

    pub values: IndexMap<String, SeedValue>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SeedValue {
    Literal(serde_json::Value),
    Reference(Reference),
}

/// `schema.table.key.column`: the value of `column` in the row of
/// `schema.table` keyed `key`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reference {
    pub schema: String,
    pub table: String,
    pub key: String,
    pub column: String,
}

impl TableData {
    pub fn qualified_name(&self) -> String {
        format!("{}.{}", self.schema, self.name)
    }
}

impl SeedData {
    /// Look up a table by qualified name, or by plain name (first match)
    pub fn table(&self, name: &str) -> Option<&TableData> {
        match name.split_once('.') {
            Some((schema, table)) => self
                .tables
                .iter()
                .find(|t| t.schema == schema && t.name == table),
            None => self.tables.iter().find(|t| t.name == name),
        }
    }

    /// Table names in emission order
    pub fn table_names(&self) -> Vec<&str> {
        self.tables.iter().map(|t| t.name.as_str()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_raw_input_deserialize() {
        let raw: RawSeedInput = serde_json::from_str(
            r#"{
                "tables": [
                    {
                        "name": "actor",
                        "tags": { "key": "index" },
                        "rows": [{ "key": "penelope", "first_name": "Penelope" }]
                    }
                ]
            }"#,
        )
        .unwrap();

        assert_eq!(raw.tables[0].tags.get("key"), Some(&SeedTag::Index));
        assert_eq!(raw.tables[0].rows[0]["first_name"], "Penelope");
    }

    #[test]
    fn test_seed_value_serialize() {
        let value = SeedValue::Reference(Reference {
            schema: "public".into(),
            table: "actor".into(),
            key: "penelope".into(),
            column: "actor_id".into(),
        });
        assert_eq!(
            serde_json::to_value(&value).unwrap(),
            serde_json::json!({
                "reference": { "schema": "public", "table": "actor", "key": "penelope", "column": "actor_id" }
            })
        );
        assert_eq!(
            serde_json::to_value(SeedValue::Literal(serde_json::json!(3))).unwrap(),
            serde_json::json!({ "literal": 3 })
        );
    }
}
