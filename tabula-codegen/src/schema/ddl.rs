//! DDL schema provider backend using sqlparser-rs

use sqlparser::ast::{
    ColumnOption, DataType, EnumMember, Expr, ForeignKeyConstraint, Ident, IndexColumn,
    IndexConstraint, ObjectName, PrimaryKeyConstraint, Statement, TableConstraint,
    UniqueConstraint,
};
use sqlparser::dialect::MySqlDialect;
use sqlparser::parser::Parser;

use super::model::*;
use crate::error::Result;

/// Index collected while walking a CREATE TABLE statement
struct PendingIndex {
    name: String,
    columns: Vec<String>,
    is_primary: bool,
}

/// Parse `CREATE TABLE` DDL into a single schema named `schema_name`.
///
/// Inline `ENUM(...)` columns become enum types named `<table>_<column>`.
pub fn parse_schema(sql: &str, schema_name: &str) -> Result<Schema> {
    let dialect = MySqlDialect {};
    let statements = Parser::parse_sql(&dialect, sql)?;

    let mut schema = Schema {
        name: schema_name.to_string(),
        ..Default::default()
    };

    for stmt in statements {
        if let Statement::CreateTable(create_table) = stmt {
            let (entity, enums) = extract_table(&create_table, schema_name)?;
            schema.entities.push(entity);
            schema.enums.extend(enums);
        }
    }

    Ok(schema)
}

/// Extract an entity (and its inline enums) from a CREATE TABLE statement
fn extract_table(
    create: &sqlparser::ast::CreateTable,
    schema_name: &str,
) -> Result<(Entity, Vec<EnumType>)> {
    let name = extract_table_name(&create.name);

    let mut columns = Vec::new();
    let mut enums = Vec::new();
    let mut indexes: Vec<PendingIndex> = Vec::new();

    for col_def in &create.columns {
        let (mut column, col_pk, col_unique) = extract_column(col_def)?;

        if let Some(values) = extract_enum_values(&col_def.data_type) {
            let enum_name = format!("{}_{}", name, column.name);
            column.type_name = format!("{}.{}", schema_name, enum_name);
            enums.push(EnumType {
                schema: schema_name.to_string(),
                name: enum_name,
                values,
                comment: None,
            });
        }

        if col_pk {
            indexes.push(PendingIndex {
                name: format!("{}_pkey", name),
                columns: vec![column.name.clone()],
                is_primary: true,
            });
        }

        if col_unique {
            indexes.push(PendingIndex {
                name: format!("{}_unique", column.name),
                columns: vec![column.name.clone()],
                is_primary: false,
            });
        }

        columns.push(column);
    }

    // Table-level constraints
    for constraint in &create.constraints {
        match constraint {
            TableConstraint::PrimaryKey(PrimaryKeyConstraint {
                columns: pk_cols, ..
            }) => {
                let pk_columns: Vec<String> = pk_cols
                    .iter()
                    .map(extract_ident_from_index_column)
                    .collect();
                // PK columns are never nullable
                for col_name in &pk_columns {
                    if let Some(col) = columns.iter_mut().find(|c| &c.name == col_name) {
                        col.nullable = false;
                    }
                }
                indexes.push(PendingIndex {
                    name: format!("{}_pkey", name),
                    columns: pk_columns,
                    is_primary: true,
                });
            }
            TableConstraint::Unique(UniqueConstraint {
                columns: uniq_cols,
                name: idx_name,
                ..
            }) => {
                let idx_name = idx_name.as_ref().map(extract_ident).unwrap_or_else(|| {
                    let first_col = extract_ident_from_index_column(&uniq_cols[0]);
                    format!("{}_unique", first_col)
                });
                indexes.push(PendingIndex {
                    name: idx_name,
                    columns: uniq_cols
                        .iter()
                        .map(extract_ident_from_index_column)
                        .collect(),
                    is_primary: false,
                });
            }
            TableConstraint::Index(IndexConstraint {
                columns: idx_cols,
                name: idx_name,
                ..
            }) => {
                let idx_name = idx_name.as_ref().map(extract_ident).unwrap_or_else(|| {
                    let first_col = extract_ident_from_index_column(&idx_cols[0]);
                    format!("idx_{}", first_col)
                });
                indexes.push(PendingIndex {
                    name: idx_name,
                    columns: idx_cols
                        .iter()
                        .map(extract_ident_from_index_column)
                        .collect(),
                    is_primary: false,
                });
            }
            TableConstraint::ForeignKey(ForeignKeyConstraint {
                columns: fk_cols,
                foreign_table,
                referred_columns,
                ..
            }) => {
                for (col, ref_col) in fk_cols.iter().zip(referred_columns.iter()) {
                    let col_name = extract_ident(col);
                    if let Some(column) = columns.iter_mut().find(|c| c.name == col_name) {
                        column.references.push(ColumnReference {
                            schema: None,
                            table: extract_table_name(foreign_table),
                            column: extract_ident(ref_col),
                        });
                    }
                }
            }
            _ => {}
        }
    }

    for index in &indexes {
        for col_name in &index.columns {
            if let Some(column) = columns.iter_mut().find(|c| &c.name == col_name) {
                column.indices.push(ColumnIndex {
                    name: index.name.clone(),
                    is_primary: index.is_primary,
                });
            }
        }
    }

    let entity = Entity {
        kind: EntityKind::Table,
        schema: schema_name.to_string(),
        name,
        comment: None, // sqlparser doesn't expose table comments directly
        columns,
    };

    Ok((entity, enums))
}

/// Extract a column from a column definition, returning inline PK/UNIQUE flags
fn extract_column(col_def: &sqlparser::ast::ColumnDef) -> Result<(Column, bool, bool)> {
    let name = extract_ident(&col_def.name);
    let type_name = format!("{}", col_def.data_type).to_lowercase();

    let mut nullable = true; // Default to nullable
    let mut default_value = None;
    let mut is_identity = false;
    let mut generated = false;
    let mut col_is_primary = false;
    let mut col_is_unique = false;
    let mut comment = None;

    for option in &col_def.options {
        match &option.option {
            ColumnOption::NotNull => {
                nullable = false;
            }
            ColumnOption::Null => {
                nullable = true;
            }
            ColumnOption::Default(expr) => {
                default_value = Some(format!("{}", expr));
            }
            ColumnOption::PrimaryKey(_) => {
                col_is_primary = true;
                nullable = false;
            }
            ColumnOption::Unique(_) => {
                col_is_unique = true;
            }
            ColumnOption::Comment(c) => {
                comment = Some(c.clone());
            }
            ColumnOption::DialectSpecific(tokens) => {
                // AUTO_INCREMENT arrives as MySQL-specific tokens
                let token_str = tokens
                    .iter()
                    .map(|t| t.to_string())
                    .collect::<Vec<_>>()
                    .join(" ")
                    .to_uppercase();
                if token_str.contains("AUTO_INCREMENT") {
                    is_identity = true;
                }
            }
            other => {
                if other.to_string().to_uppercase().starts_with("GENERATED ALWAYS") {
                    generated = true;
                }
            }
        }
    }

    let column = Column {
        name,
        type_name,
        nullable,
        default_value,
        is_identity,
        generated,
        comment,
        ..Default::default()
    };

    Ok((column, col_is_primary, col_is_unique))
}

/// Extract enum values from a data type
fn extract_enum_values(data_type: &DataType) -> Option<Vec<String>> {
    match data_type {
        DataType::Enum(members, _) => Some(
            members
                .iter()
                .map(|m| match m {
                    EnumMember::Name(s) => s.clone(),
                    EnumMember::NamedValue(s, _) => s.clone(),
                })
                .collect(),
        ),
        _ => None,
    }
}

/// Extract the unqualified table name from an ObjectName
fn extract_table_name(name: &ObjectName) -> String {
    name.0
        .last()
        .and_then(|part| part.as_ident())
        .map(|ident| ident.value.clone())
        .unwrap_or_default()
}

fn extract_ident(ident: &Ident) -> String {
    ident.value.clone()
}

/// Extract a column name string from an IndexColumn
fn extract_ident_from_index_column(ic: &IndexColumn) -> String {
    match &ic.column.expr {
        Expr::Identifier(ident) => ident.value.clone(),
        other => format!("{}", other),
    }
}
