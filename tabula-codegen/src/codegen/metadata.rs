//! Declaration metadata: names, comment headers and output paths

use super::casing::CasingAxis;
use super::context::{AgentNoun, GenerationContext};
use super::escape::{escape_field_name, escape_identifier};
use crate::error::Result;
use crate::schema::{Column, Entity, Subject};

/// Name, comment and output path of a top-level declaration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeclarationMetadata {
    pub name: String,
    pub comment: Vec<String>,
    /// Extension-less output path, e.g. `public/Actor`
    pub path: String,
}

/// Name and comment of an interface property
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PropertyMetadata {
    pub name: String,
    pub comment: Vec<String>,
}

/// Per-agent-noun metadata plug-in
pub trait MetadataGenerator: Send + Sync {
    /// Metadata for an entity (per agent), enum or domain.
    /// Enums and domains are always asked with [`AgentNoun::Selector`].
    fn metadata(
        &self,
        subject: Subject<'_>,
        agent: AgentNoun,
        ctx: &GenerationContext<'_>,
    ) -> Result<DeclarationMetadata>;

    fn property_metadata(
        &self,
        column: &Column,
        entity: &Entity,
        agent: AgentNoun,
        ctx: &GenerationContext<'_>,
    ) -> Result<PropertyMetadata>;
}

/// Default naming: `<TypeName>[<Suffix>]` in `<schema>/<FileName>`
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultMetadata;

impl MetadataGenerator for DefaultMetadata {
    fn metadata(
        &self,
        subject: Subject<'_>,
        agent: AgentNoun,
        ctx: &GenerationContext<'_>,
    ) -> Result<DeclarationMetadata> {
        let base = ctx.resolve_name(subject.name(), CasingAxis::TypeName);
        let name = match agent.suffix() {
            Some(suffix) => ctx.config.casing.type_name.join(&base, suffix),
            None => base,
        };
        let name = escape_identifier(&name)?;

        let file_name = ctx.resolve_name(subject.name(), CasingAxis::Filename);
        let path = format!("{}/{}", subject.schema(), file_name);

        let comment = match agent.suffix() {
            None => match subject.comment().filter(|c| !c.trim().is_empty()) {
                Some(comment) => comment_lines(comment),
                None => vec![format!(
                    "Represents the {} {}",
                    subject.kind_label(),
                    subject.qualified_name()
                )],
            },
            Some(suffix) => vec![format!(
                "Represents the {} for the {} {}",
                suffix,
                subject.kind_label(),
                subject.qualified_name()
            )],
        };

        Ok(DeclarationMetadata {
            name,
            comment,
            path,
        })
    }

    fn property_metadata(
        &self,
        column: &Column,
        _entity: &Entity,
        _agent: AgentNoun,
        ctx: &GenerationContext<'_>,
    ) -> Result<PropertyMetadata> {
        let name = escape_field_name(&ctx.resolve_name(&column.name, CasingAxis::Property));
        Ok(PropertyMetadata {
            name,
            comment: column_comment(column),
        })
    }
}

/// Split a free-text comment into lines, dropping trailing whitespace
fn comment_lines(comment: &str) -> Vec<String> {
    comment
        .lines()
        .map(|line| line.trim_end().to_string())
        .collect()
}

/// Property comment: description, default value, then one line per index
pub fn column_comment(column: &Column) -> Vec<String> {
    let mut lines = Vec::new();

    if let Some(comment) = column.comment.as_deref().filter(|c| !c.trim().is_empty()) {
        lines.extend(comment_lines(comment));
    }

    if let Some(default_value) = &column.default_value {
        lines.push(format!("Default value: {}", default_value));
    }

    for index in &column.indices {
        if index.is_primary {
            lines.push(format!("Primary key. Index: {}", index.name));
        } else {
            lines.push(format!("Index: {}", index.name));
        }
    }

    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codegen::casing::{Casing, CasingConfig};
    use crate::codegen::context::GenerationConfig;
    use crate::schema::{ColumnIndex, EntityKind, EnumType};

    fn film_actor() -> Entity {
        Entity {
            kind: EntityKind::Table,
            schema: "public".into(),
            name: "film_actor".into(),
            comment: None,
            columns: vec![],
        }
    }

    #[test]
    fn test_entity_metadata_per_agent() {
        let config = GenerationConfig::default();
        let ctx = GenerationContext::new(&[], &config);
        let entity = film_actor();

        let selector = DefaultMetadata
            .metadata(Subject::Entity(&entity), AgentNoun::Selector, &ctx)
            .unwrap();
        assert_eq!(selector.name, "FilmActor");
        assert_eq!(selector.path, "public/FilmActor");
        assert_eq!(selector.comment, vec!["Represents the table public.film_actor"]);

        let initializer = DefaultMetadata
            .metadata(Subject::Entity(&entity), AgentNoun::Initializer, &ctx)
            .unwrap();
        assert_eq!(initializer.name, "FilmActorInitializer");
        assert_eq!(initializer.path, selector.path);
        assert_eq!(
            initializer.comment,
            vec!["Represents the initializer for the table public.film_actor"]
        );

        let mutator = DefaultMetadata
            .metadata(Subject::Entity(&entity), AgentNoun::Mutator, &ctx)
            .unwrap();
        assert_eq!(mutator.name, "FilmActorMutator");
    }

    #[test]
    fn test_metadata_casing() {
        let config = GenerationConfig {
            casing: CasingConfig {
                type_name: Casing::Snake,
                filename: Casing::Dash,
                ..Default::default()
            },
            ..Default::default()
        };
        let ctx = GenerationContext::new(&[], &config);
        let entity = film_actor();

        let initializer = DefaultMetadata
            .metadata(Subject::Entity(&entity), AgentNoun::Initializer, &ctx)
            .unwrap();
        assert_eq!(initializer.name, "film_actor_initializer");
        assert_eq!(initializer.path, "public/film-actor");
    }

    #[test]
    fn test_enum_comment_from_source() {
        let config = GenerationConfig::default();
        let ctx = GenerationContext::new(&[], &config);
        let rating = EnumType {
            schema: "public".into(),
            name: "mpaa_rating".into(),
            values: vec![],
            comment: Some("Film ratings\nas assigned by the MPAA".into()),
        };

        let meta = DefaultMetadata
            .metadata(Subject::Enum(&rating), AgentNoun::Selector, &ctx)
            .unwrap();
        assert_eq!(meta.name, "MpaaRating");
        assert_eq!(meta.comment, vec!["Film ratings", "as assigned by the MPAA"]);
    }

    #[test]
    fn test_column_comment_line_counts() {
        let mut column = Column {
            name: "title".into(),
            type_name: "pg_catalog.text".into(),
            ..Default::default()
        };
        assert!(column_comment(&column).is_empty());

        column.comment = Some("Film title".into());
        assert_eq!(column_comment(&column), vec!["Film title"]);

        column.default_value = Some("'untitled'::text".into());
        column.indices = vec![
            ColumnIndex {
                name: "film_pkey".into(),
                is_primary: true,
            },
            ColumnIndex {
                name: "idx_title".into(),
                is_primary: false,
            },
        ];
        assert_eq!(
            column_comment(&column),
            vec![
                "Film title",
                "Default value: 'untitled'::text",
                "Primary key. Index: film_pkey",
                "Index: idx_title",
            ]
        );
    }

    #[test]
    fn test_property_name_is_escaped() {
        let config = GenerationConfig::default();
        let ctx = GenerationContext::new(&[], &config);
        let entity = film_actor();
        let column = Column {
            name: "has space".into(),
            type_name: "pg_catalog.text".into(),
            ..Default::default()
        };

        let meta = DefaultMetadata
            .property_metadata(&column, &entity, AgentNoun::Selector, &ctx)
            .unwrap();
        assert_eq!(meta.name, "'has space'");
    }
}
