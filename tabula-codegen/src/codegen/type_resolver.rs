//! Database to TypeScript type mapping

use tracing::warn;

use super::context::{AgentNoun, GenerationContext};
use super::declaration::{TypeDefinition, TypeImport, TypeRef};
use crate::error::{CodegenError, Result};
use crate::schema::{Column, Entity};

/// Resolve column and type names to TypeScript types.
///
/// Resolution order for a column:
/// 1. an explicit `type` tag on the column
/// 2. the identifier alias, for identifier columns and foreign keys to them
/// 3. the configured type map
/// 4. user-defined types (enums, domains, composites), imported from their file
/// 5. the builtin table, falling back to `unknown`
#[derive(Clone, Copy)]
pub struct TypeResolver<'a> {
    ctx: GenerationContext<'a>,
}

impl<'a> TypeResolver<'a> {
    pub fn new(ctx: GenerationContext<'a>) -> Self {
        Self { ctx }
    }

    /// Get the TypeScript type for a column (without nullability)
    pub fn resolve(&self, column: &Column, entity: &Entity) -> Result<TypeRef> {
        if let Some(tagged) = self.tagged_type(column, entity)? {
            return Ok(tagged);
        }

        let base = match self.identifier_type(column, entity)? {
            Some(identifier) => identifier,
            None => self.resolve_type_name(&column.type_name)?,
        };

        Ok(if column.is_array {
            base.into_array()
        } else {
            base
        })
    }

    /// The column's `type` tag, taken verbatim
    fn tagged_type(&self, column: &Column, entity: &Entity) -> Result<Option<TypeRef>> {
        let Some(value) = column.tags.get("type") else {
            return Ok(None);
        };

        let definition: TypeDefinition =
            serde_json::from_value(value.clone()).map_err(|e| CodegenError::InvalidTag {
                entity: entity.qualified_name(),
                column: column.name.clone(),
                tag: "type".to_string(),
                message: e.to_string(),
            })?;
        Ok(Some(definition.into()))
    }

    /// Identifier alias for an identifier column or a foreign key pointing at one
    pub fn identifier_type(&self, column: &Column, entity: &Entity) -> Result<Option<TypeRef>> {
        let Some(generator) = self.ctx.config.identifier_types.as_ref() else {
            return Ok(None);
        };

        if column.is_identifier() {
            let identifier = generator.identifier_type(column, entity, &self.ctx)?;
            return Ok(Some(TypeRef::imported(TypeImport::relative(
                identifier.declaration.name,
                identifier.path,
            ))));
        }

        for reference in &column.references {
            let schema = reference.schema_or(&entity.schema);
            let Some(target) = self.ctx.find_entity(schema, &reference.table) else {
                continue;
            };
            let Some(target_column) = target.column(&reference.column) else {
                continue;
            };
            if target_column.is_identifier() {
                let identifier = generator.identifier_type(target_column, target, &self.ctx)?;
                return Ok(Some(TypeRef::imported(TypeImport::relative(
                    identifier.declaration.name,
                    identifier.path,
                ))));
            }
        }

        Ok(None)
    }

    /// Resolve a qualified type name through the type map, user types and builtins
    pub fn resolve_type_name(&self, type_name: &str) -> Result<TypeRef> {
        if let Some(mapped) = self.ctx.config.type_map.get(type_name) {
            return Ok(mapped.clone().into());
        }

        if let Some(subject) = self.ctx.find_user_type(type_name) {
            let meta = self
                .ctx
                .config
                .metadata
                .metadata(subject, AgentNoun::Selector, &self.ctx)?;
            return Ok(TypeRef::imported(
                TypeImport::relative(meta.name, meta.path).as_default(),
            ));
        }

        match builtin_type(type_name) {
            Some(builtin) => Ok(TypeRef::literal(builtin)),
            None => {
                warn!("No type mapping for '{}', using unknown", type_name);
                Ok(TypeRef::literal("unknown"))
            }
        }
    }
}

/// Builtin mapping for a (possibly schema-qualified) database type name
pub fn builtin_type(type_name: &str) -> Option<&'static str> {
    let lower = type_name.trim().to_lowercase();
    let unqualified = match lower.split_once('(') {
        Some((head, _)) => head.rsplit('.').next().unwrap_or(head),
        None => lower.rsplit('.').next().unwrap_or(&lower),
    };

    // TINYINT(1) and BIT(1) are booleans in MySQL
    if is_boolean_type(&lower, unqualified) {
        return Some("boolean");
    }

    let base = unqualified.trim_end_matches(" unsigned").trim();
    let ts_type = match base {
        "int2" | "int4" | "smallint" | "integer" | "int" | "tinyint" | "mediumint" | "serial"
        | "serial2" | "serial4" | "smallserial" | "float" | "float4" | "float8" | "real"
        | "double" | "double precision" | "oid" | "year" => "number",

        // Exceed the safe integer range or need exact precision
        "int8" | "bigint" | "bigserial" | "serial8" | "numeric" | "decimal" | "money" => "string",

        "text" | "varchar" | "character varying" | "char" | "character" | "bpchar" | "name"
        | "citext" | "uuid" | "tinytext" | "mediumtext" | "longtext" | "set" | "enum"
        | "time" | "timetz" | "time with time zone" | "time without time zone" | "interval"
        | "inet" | "cidr" | "macaddr" | "xml" | "tsvector" | "bit" | "varbit" => "string",

        "date" | "timestamp" | "timestamptz" | "timestamp with time zone"
        | "timestamp without time zone" | "datetime" => "Date",

        "json" | "jsonb" => "unknown",

        "bytea" | "blob" | "tinyblob" | "mediumblob" | "longblob" | "binary" | "varbinary" => {
            "Buffer"
        }

        _ => return None,
    };
    Some(ts_type)
}

fn is_boolean_type(lower: &str, unqualified: &str) -> bool {
    if unqualified == "bool" || unqualified == "boolean" {
        return true;
    }
    let compact: String = lower.chars().filter(|c| !c.is_whitespace()).collect();
    compact.ends_with("tinyint(1)") || compact.ends_with("bit(1)")
}
