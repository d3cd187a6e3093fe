//! Generation context: the schema set and resolved configuration shared by generators

use std::fmt;
use std::sync::Arc;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use super::casing::{CasingAxis, CasingConfig};
use super::declaration::TypeDefinition;
use super::identifier::{FlavoredIdentifier, IdentifierTypeGenerator};
use super::metadata::{DefaultMetadata, MetadataGenerator};
use super::type_resolver::TypeResolver;
use crate::schema::{Entity, EntityKind, Schema, Subject};

/// Role-specific variant of an entity's type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AgentNoun {
    /// Plain row/selection type
    Selector,
    /// Insert type
    Initializer,
    /// Update type
    Mutator,
}

impl AgentNoun {
    /// Word appended to the entity name, if any
    pub fn suffix(&self) -> Option<&'static str> {
        match self {
            AgentNoun::Selector => None,
            AgentNoun::Initializer => Some("initializer"),
            AgentNoun::Mutator => Some("mutator"),
        }
    }
}

/// Predicate deciding which subjects take part in generation
pub type EntityFilter = Arc<dyn Fn(&Subject<'_>) -> bool + Send + Sync>;

/// Resolved, run-wide generation settings and plug-ins
#[derive(Clone)]
pub struct GenerationConfig {
    pub casing: CasingConfig,

    /// Qualified type name -> replacement type
    pub type_map: IndexMap<String, TypeDefinition>,

    /// Render nullable/defaulted columns as optional properties instead of `| null`
    pub consider_default_values: bool,

    /// Agents generated for tables; other entities only get a selector
    pub agents: Vec<AgentNoun>,

    /// Identifier alias generator; `None` disables identifier types
    pub identifier_types: Option<Arc<dyn IdentifierTypeGenerator>>,

    /// Names, comments and paths for declarations
    pub metadata: Arc<dyn MetadataGenerator>,

    pub filter: Option<EntityFilter>,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            casing: CasingConfig::default(),
            type_map: IndexMap::new(),
            consider_default_values: true,
            agents: vec![
                AgentNoun::Selector,
                AgentNoun::Initializer,
                AgentNoun::Mutator,
            ],
            identifier_types: Some(Arc::new(FlavoredIdentifier)),
            metadata: Arc::new(DefaultMetadata),
            filter: None,
        }
    }
}

impl fmt::Debug for GenerationConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GenerationConfig")
            .field("casing", &self.casing)
            .field("type_map", &self.type_map)
            .field("consider_default_values", &self.consider_default_values)
            .field("agents", &self.agents)
            .field("identifier_types", &self.identifier_types.is_some())
            .field("filter", &self.filter.is_some())
            .finish_non_exhaustive()
    }
}

/// Read-only view handed to generators, resolvers and metadata plug-ins
#[derive(Clone, Copy)]
pub struct GenerationContext<'a> {
    pub schemas: &'a [Schema],
    pub config: &'a GenerationConfig,
}

impl<'a> GenerationContext<'a> {
    pub fn new(schemas: &'a [Schema], config: &'a GenerationConfig) -> Self {
        Self { schemas, config }
    }

    /// Shorthand for `config.casing.resolve_name`
    pub fn resolve_name(&self, raw: &str, axis: CasingAxis) -> String {
        self.config.casing.resolve_name(raw, axis)
    }

    pub fn type_resolver(&self) -> TypeResolver<'a> {
        TypeResolver::new(*self)
    }

    /// Whether the configured entity filter lets a subject through
    pub fn accepts(&self, subject: &Subject<'_>) -> bool {
        self.config
            .filter
            .as_ref()
            .map(|filter| filter(subject))
            .unwrap_or(true)
    }

    pub fn find_entity(&self, schema: &str, name: &str) -> Option<&'a Entity> {
        self.schemas
            .iter()
            .filter(|s| s.name == schema)
            .find_map(|s| s.entity(name))
    }

    /// Look up a user-defined type (enum, domain or composite) by qualified name
    pub fn find_user_type(&self, qualified: &str) -> Option<Subject<'a>> {
        let (schema_name, name) = qualified.split_once('.')?;
        let schema = self.schemas.iter().find(|s| s.name == schema_name)?;

        if let Some(enum_type) = schema.enums.iter().find(|e| e.name == name) {
            return Some(Subject::Enum(enum_type));
        }
        if let Some(domain) = schema.domains.iter().find(|d| d.name == name) {
            return Some(Subject::Domain(domain));
        }
        schema
            .entities
            .iter()
            .find(|e| e.kind == EntityKind::CompositeType && e.name == name)
            .map(Subject::Entity)
    }
}
