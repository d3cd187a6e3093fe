//! Identifier types: branded aliases for primary-key columns

use super::casing::CasingAxis;
use super::context::{AgentNoun, GenerationContext};
use super::declaration::{ExportAs, TypeDeclaration};
use super::escape::escape_identifier;
use crate::error::Result;
use crate::schema::{Column, Entity, Subject};

/// A generated identifier alias and the output path it is declared in
#[derive(Debug, Clone, PartialEq)]
pub struct IdentifierType {
    pub declaration: TypeDeclaration,
    pub path: String,
}

/// Produces the alias declaration for an identifier column
pub trait IdentifierTypeGenerator: Send + Sync {
    fn identifier_type(
        &self,
        column: &Column,
        entity: &Entity,
        ctx: &GenerationContext<'_>,
    ) -> Result<IdentifierType>;
}

/// `type ActorId = number & { __flavor?: 'ActorId' }`
///
/// Flavoring keeps plain values assignable while preventing ids of
/// different entities from being mixed up.
#[derive(Debug, Clone, Copy, Default)]
pub struct FlavoredIdentifier;

impl FlavoredIdentifier {
    /// `{Entity}{Column}`, unless the column name already carries the entity name
    pub fn alias_name(
        column: &Column,
        entity: &Entity,
        ctx: &GenerationContext<'_>,
    ) -> Result<String> {
        let entity_name = ctx.resolve_name(&entity.name, CasingAxis::TypeName);
        let column_name = ctx.resolve_name(&column.name, CasingAxis::TypeName);

        let name = if column_name.starts_with(&entity_name) && column_name.len() > entity_name.len()
        {
            column_name
        } else {
            ctx.config.casing.type_name.join(&entity_name, &column.name)
        };
        escape_identifier(&name)
    }
}

impl IdentifierTypeGenerator for FlavoredIdentifier {
    fn identifier_type(
        &self,
        column: &Column,
        entity: &Entity,
        ctx: &GenerationContext<'_>,
    ) -> Result<IdentifierType> {
        let name = Self::alias_name(column, entity, ctx)?;
        let inner = ctx.type_resolver().resolve_type_name(&column.type_name)?;
        let path = ctx
            .config
            .metadata
            .metadata(Subject::Entity(entity), AgentNoun::Selector, ctx)?
            .path;

        Ok(IdentifierType {
            declaration: TypeDeclaration {
                comment: vec![format!("Identifier type for {}", entity.qualified_name())],
                type_definition: vec![format!("{} & {{ __flavor?: '{}' }}", inner.name, name)],
                imports: inner.imports,
                export_as: ExportAs::Named,
                name,
            },
            path,
        })
    }
}
