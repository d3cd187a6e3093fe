//! Interface synthesis: one interface per entity and agent noun

use std::collections::HashMap;

use super::context::{AgentNoun, GenerationContext};
use super::declaration::{ExportAs, InterfaceDeclaration, InterfaceProperty};
use crate::error::{CodegenError, Result};
use crate::schema::{Column, Entity, Subject};

/// Build the interface describing `entity` in the role of `agent`.
///
/// The selector is the file's default export; initializer and mutator are
/// named exports and never mention generated columns.
pub fn synthesize_interface(
    entity: &Entity,
    agent: AgentNoun,
    ctx: &GenerationContext<'_>,
) -> Result<InterfaceDeclaration> {
    let meta = ctx
        .config
        .metadata
        .metadata(Subject::Entity(entity), agent, ctx)?;
    let resolver = ctx.type_resolver();

    let mut seen: HashMap<String, &str> = HashMap::new();
    let mut properties = Vec::with_capacity(entity.columns.len());

    for column in &entity.columns {
        if column.generated && agent != AgentNoun::Selector {
            continue;
        }

        let property = ctx
            .config
            .metadata
            .property_metadata(column, entity, agent, ctx)?;

        if let Some(first) = seen.insert(property.name.clone(), &column.name) {
            return Err(CodegenError::Collision {
                declaration: meta.name,
                first: first.to_string(),
                second: column.name.clone(),
                resolved: property.name,
            });
        }

        let type_ref = resolver.resolve(column, entity)?;
        let (optional, nullable) = optionality(column, agent, ctx.config.consider_default_values);

        properties.push(InterfaceProperty {
            name: property.name,
            comment: property.comment,
            type_ref,
            nullable,
            optional,
        });
    }

    Ok(InterfaceDeclaration {
        name: meta.name,
        comment: meta.comment,
        base: None,
        properties,
        export_as: match agent {
            AgentNoun::Selector => ExportAs::Default,
            _ => ExportAs::Named,
        },
    })
}

/// Whether the property may be left out: nullable or defaulted columns,
/// and every column of a mutator (updates are partial)
fn may_be_omitted(column: &Column, agent: AgentNoun) -> bool {
    match agent {
        AgentNoun::Mutator => true,
        AgentNoun::Selector | AgentNoun::Initializer => column.nullable || column.has_default(),
    }
}

/// `(optional, nullable)` for a property.
///
/// With default values considered, omittable columns become optional and
/// `| null` is never added; otherwise every property is required and only
/// nullable columns get `| null`.
fn optionality(column: &Column, agent: AgentNoun, consider_default_values: bool) -> (bool, bool) {
    if consider_default_values {
        (may_be_omitted(column, agent), false)
    } else {
        (false, column.nullable)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codegen::context::GenerationConfig;
    use crate::schema::{ColumnIndex, EntityKind, Schema};

    fn column(name: &str, type_name: &str) -> Column {
        Column {
            name: name.into(),
            type_name: type_name.into(),
            ..Default::default()
        }
    }

    fn actor() -> Entity {
        let mut actor_id = column("actor_id", "pg_catalog.int4");
        actor_id.default_value = Some("nextval('actor_actor_id_seq'::regclass)".into());
        actor_id.indices = vec![ColumnIndex {
            name: "actor_pkey".into(),
            is_primary: true,
        }];

        let mut last_update = column("last_update", "pg_catalog.timestamp");
        last_update.default_value = Some("now()".into());

        let mut nickname = column("nickname", "pg_catalog.text");
        nickname.nullable = true;

        let mut full_name = column("full_name", "pg_catalog.text");
        full_name.generated = true;

        Entity {
            kind: EntityKind::Table,
            schema: "public".into(),
            name: "actor".into(),
            comment: None,
            columns: vec![
                actor_id,
                column("first_name", "pg_catalog.text"),
                last_update,
                nickname,
                full_name,
            ],
        }
    }

    fn flags(interface: &InterfaceDeclaration) -> Vec<(&str, bool, bool)> {
        interface
            .properties
            .iter()
            .map(|p| (p.name.as_str(), p.optional, p.nullable))
            .collect()
    }

    #[test]
    fn test_selector_with_default_values() {
        let schemas = vec![Schema {
            name: "public".into(),
            entities: vec![actor()],
            ..Default::default()
        }];
        let config = GenerationConfig::default();
        let ctx = GenerationContext::new(&schemas, &config);

        let selector = synthesize_interface(&schemas[0].entities[0], AgentNoun::Selector, &ctx).unwrap();
        assert_eq!(selector.name, "Actor");
        assert_eq!(selector.export_as, ExportAs::Default);
        assert_eq!(
            flags(&selector),
            vec![
                ("actor_id", true, false),
                ("first_name", false, false),
                ("last_update", true, false),
                ("nickname", true, false),
                ("full_name", false, false),
            ]
        );
        assert_eq!(selector.properties[0].type_ref.name, "ActorId");
        assert_eq!(selector.properties[2].type_ref.name, "Date");
    }

    #[test]
    fn test_initializer_and_mutator() {
        let schemas = vec![Schema {
            name: "public".into(),
            entities: vec![actor()],
            ..Default::default()
        }];
        let config = GenerationConfig::default();
        let ctx = GenerationContext::new(&schemas, &config);
        let entity = &schemas[0].entities[0];

        let initializer = synthesize_interface(entity, AgentNoun::Initializer, &ctx).unwrap();
        assert_eq!(initializer.name, "ActorInitializer");
        assert_eq!(initializer.export_as, ExportAs::Named);
        assert_eq!(
            flags(&initializer),
            vec![
                ("actor_id", true, false),
                ("first_name", false, false),
                ("last_update", true, false),
                ("nickname", true, false),
            ]
        );

        let mutator = synthesize_interface(entity, AgentNoun::Mutator, &ctx).unwrap();
        assert!(mutator.properties.iter().all(|p| p.optional && !p.nullable));
        assert_eq!(mutator.properties.len(), 4);
    }

    #[test]
    fn test_selector_and_initializer_share_rule() {
        let schemas = vec![Schema {
            name: "public".into(),
            entities: vec![actor()],
            ..Default::default()
        }];
        let config = GenerationConfig::default();
        let ctx = GenerationContext::new(&schemas, &config);
        let entity = &schemas[0].entities[0];

        let selector = synthesize_interface(entity, AgentNoun::Selector, &ctx).unwrap();
        let initializer = synthesize_interface(entity, AgentNoun::Initializer, &ctx).unwrap();
        for property in &initializer.properties {
            let column = entity.column(&property.name).unwrap();
            let expected = column.nullable || column.has_default();
            assert_eq!(property.optional, expected, "{}", property.name);
            assert!(!property.nullable);

            let on_selector = selector
                .properties
                .iter()
                .find(|p| p.name == property.name)
                .unwrap();
            assert_eq!(on_selector.optional, property.optional, "{}", property.name);
        }
    }

    #[test]
    fn test_without_default_values() {
        let schemas = vec![Schema {
            name: "public".into(),
            entities: vec![actor()],
            ..Default::default()
        }];
        let config = GenerationConfig {
            consider_default_values: false,
            ..Default::default()
        };
        let ctx = GenerationContext::new(&schemas, &config);
        let entity = &schemas[0].entities[0];

        for agent in [AgentNoun::Selector, AgentNoun::Initializer, AgentNoun::Mutator] {
            let interface = synthesize_interface(entity, agent, &ctx).unwrap();
            for property in &interface.properties {
                assert!(!property.optional);
                assert_eq!(property.nullable, property.name == "nickname");
            }
        }
    }

    #[test]
    fn test_property_collision() {
        let entity = Entity {
            kind: EntityKind::Table,
            schema: "public".into(),
            name: "account".into(),
            comment: None,
            columns: vec![
                column("user_name", "pg_catalog.text"),
                column("userName", "pg_catalog.text"),
            ],
        };
        let config = GenerationConfig::default();
        let ctx = GenerationContext::new(&[], &config);

        let err = synthesize_interface(&entity, AgentNoun::Selector, &ctx);
        // snake -> snake keeps raw names, so no collision
        assert!(err.is_ok());

        let config = GenerationConfig {
            casing: crate::codegen::casing::CasingConfig {
                property: crate::codegen::casing::Casing::Camel,
                ..Default::default()
            },
            ..Default::default()
        };
        let ctx = GenerationContext::new(&[], &config);
        let err = synthesize_interface(&entity, AgentNoun::Selector, &ctx).unwrap_err();
        match err {
            CodegenError::Collision {
                declaration,
                first,
                second,
                resolved,
            } => {
                assert_eq!(declaration, "Account");
                assert_eq!(first, "user_name");
                assert_eq!(second, "userName");
                assert_eq!(resolved, "userName");
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}
