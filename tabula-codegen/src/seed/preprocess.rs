//! Seed preprocessing: validate against the schema, resolve references, order tables

use std::collections::{HashMap, HashSet};

use indexmap::IndexMap;
use tracing::{debug, info};

use super::graph::DependencyGraph;
use super::model::{RawSeedInput, RawTable, Reference, SeedData, SeedRow, SeedTag, SeedValue, TableData};
use crate::error::{CodegenError, Result};
use crate::schema::{Entity, Schema};

/// Turn raw seed input into ordered, reference-resolved seed data.
///
/// Tables are ordered so that every referenced table precedes the tables
/// referencing it; otherwise the input order is kept.
pub fn preprocess(raw: &RawSeedInput, schemas: &[Schema]) -> Result<SeedData> {
    let entities = raw
        .tables
        .iter()
        .map(|table| find_entity(schemas, &table.name))
        .collect::<Result<Vec<_>>>()?;

    // Keyed by qualified name so same-named tables in different schemas stay apart
    let mut positions: HashMap<String, usize> = HashMap::new();
    for (position, table) in raw.tables.iter().enumerate() {
        if positions
            .insert(entities[position].qualified_name(), position)
            .is_some()
        {
            return Err(CodegenError::ValidationError(format!(
                "Seed table {} is listed more than once",
                table.name
            )));
        }
    }

    let index_columns = raw
        .tables
        .iter()
        .map(index_column)
        .collect::<Result<Vec<_>>>()?;
    let keys = raw
        .tables
        .iter()
        .zip(&index_columns)
        .map(|(table, index)| row_keys(table, index.as_deref()))
        .collect::<Result<Vec<_>>>()?;

    let mut graph = DependencyGraph::new(raw.tables.len());
    let mut resolved = Vec::with_capacity(raw.tables.len());

    for (position, table) in raw.tables.iter().enumerate() {
        let entity = entities[position];
        let index = index_columns[position].as_deref();
        check_tagged_columns(table, entity, index)?;

        let mut rows = Vec::with_capacity(table.rows.len());
        for (row, key) in table.rows.iter().zip(&keys[position].0) {
            let mut values = IndexMap::new();

            for (column_name, value) in row {
                if Some(column_name.as_str()) == index {
                    continue;
                }
                let column = entity.column(column_name).ok_or_else(|| {
                    CodegenError::ColumnNotFound {
                        table: table.name.clone(),
                        column: column_name.clone(),
                    }
                })?;

                let seed_value = match table.tags.get(column_name) {
                    Some(SeedTag::Reference) if !value.is_null() => {
                        let target = column.references.first().ok_or_else(|| {
                            CodegenError::NotAForeignKey {
                                table: table.name.clone(),
                                column: column_name.clone(),
                            }
                        })?;
                        let target_schema = target.schema_or(&entity.schema);
                        let target_name = format!("{}.{}", target_schema, target.table);
                        let target_position =
                            *positions.get(&target_name).ok_or_else(|| {
                                CodegenError::TableNotFound(target_name.clone())
                            })?;

                        let target_key = key_of(value, &table.name, column_name)?
                            .unwrap_or_default();
                        if !keys[target_position].1.contains(&target_key) {
                            return Err(CodegenError::RowNotFound {
                                table: target_name,
                                key: target_key,
                            });
                        }

                        graph.add_edge(target_position, position);
                        SeedValue::Reference(Reference {
                            schema: target_schema.to_string(),
                            table: target.table.clone(),
                            key: target_key,
                            column: target.column.clone(),
                        })
                    }
                    _ => SeedValue::Literal(value.clone()),
                };
                values.insert(column_name.clone(), seed_value);
            }

            rows.push(SeedRow {
                key: key.clone(),
                values,
            });
        }

        resolved.push(Some(TableData {
            schema: entity.schema.clone(),
            name: entity.name.clone(),
            index_column: index.map(str::to_string),
            rows,
        }));
    }

    let order = graph.order().map_err(|remaining| CodegenError::DependencyCycle {
        tables: remaining
            .into_iter()
            .map(|position| entities[position].qualified_name())
            .collect(),
    })?;
    debug!("Seed table order: {:?}", order);

    let tables: Vec<TableData> = order
        .into_iter()
        .filter_map(|position| resolved[position].take())
        .collect();

    info!("Preprocessed {} seed tables", tables.len());
    Ok(SeedData { tables })
}

/// Find a seed table's entity by plain or schema-qualified name
fn find_entity<'a>(schemas: &'a [Schema], name: &str) -> Result<&'a Entity> {
    let found = match name.split_once('.') {
        Some((schema_name, table_name)) => schemas
            .iter()
            .filter(|s| s.name == schema_name)
            .find_map(|s| s.entity(table_name)),
        None => schemas.iter().find_map(|s| s.entity(name)),
    };
    found.ok_or_else(|| CodegenError::TableNotFound(name.to_string()))
}

/// The table's index column, if exactly one is tagged
fn index_column(table: &RawTable) -> Result<Option<String>> {
    let mut tagged = table
        .tags
        .iter()
        .filter(|(_, tag)| **tag == SeedTag::Index)
        .map(|(column, _)| column);

    let first = tagged.next().cloned();
    if let Some(second) = tagged.next() {
        return Err(CodegenError::ValidationError(format!(
            "Seed table {} has more than one index column ({}, {})",
            table.name,
            first.unwrap_or_default(),
            second
        )));
    }
    Ok(first)
}

/// Per-row keys (in row order) and the set of all keys
fn row_keys(table: &RawTable, index: Option<&str>) -> Result<(Vec<Option<String>>, HashSet<String>)> {
    let mut per_row = Vec::with_capacity(table.rows.len());
    let mut all = HashSet::new();

    for row in &table.rows {
        let key = match index.and_then(|column| row.get(column).map(|v| (column, v))) {
            Some((column, value)) => key_of(value, &table.name, column)?,
            None => None,
        };
        if let Some(key) = &key {
            if !all.insert(key.clone()) {
                return Err(CodegenError::DuplicateRowKey {
                    table: table.name.clone(),
                    key: key.clone(),
                });
            }
        }
        per_row.push(key);
    }

    Ok((per_row, all))
}

/// Every tagged column other than the index column must exist on the entity
fn check_tagged_columns(table: &RawTable, entity: &Entity, index: Option<&str>) -> Result<()> {
    for (column_name, tag) in &table.tags {
        if *tag == SeedTag::Index || Some(column_name.as_str()) == index {
            continue;
        }
        let column = entity
            .column(column_name)
            .ok_or_else(|| CodegenError::ColumnNotFound {
                table: table.name.clone(),
                column: column_name.clone(),
            })?;
        if *tag == SeedTag::Reference && !column.is_foreign_key() {
            return Err(CodegenError::NotAForeignKey {
                table: table.name.clone(),
                column: column_name.clone(),
            });
        }
    }
    Ok(())
}

/// Row keys are strings; numbers and booleans are accepted and stringified
fn key_of(value: &serde_json::Value, table: &str, column: &str) -> Result<Option<String>> {
    match value {
        serde_json::Value::Null => Ok(None),
        serde_json::Value::String(s) => Ok(Some(s.clone())),
        serde_json::Value::Number(n) => Ok(Some(n.to_string())),
        serde_json::Value::Bool(b) => Ok(Some(b.to_string())),
        _ => Err(CodegenError::ValidationError(format!(
            "{}.{} holds a value that cannot be used as a row key: {}",
            table, column, value
        ))),
    }
}
