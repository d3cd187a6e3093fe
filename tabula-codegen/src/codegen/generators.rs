//! Generators: schema subjects -> declarations grouped by output path

use tracing::debug;

use super::context::{AgentNoun, GenerationContext};
use super::declaration::{Declaration, ExportAs, TypeDeclaration};
use super::escape::escape_string;
use super::interface::synthesize_interface;
use super::output::FileKind;
use crate::error::Result;
use crate::schema::{DomainType, Entity, EntityKind, EnumType, Subject};

/// Declarations destined for one output path
#[derive(Debug, Clone, PartialEq)]
pub struct GeneratedFile {
    pub path: String,
    pub kind: FileKind,
    pub declarations: Vec<Declaration>,
}

/// Produces declarations for the subjects it accepts
pub trait Generator: Send + Sync {
    fn name(&self) -> &str;

    /// Whether this generator handles the subject at all
    fn accepts(&self, subject: &Subject<'_>) -> bool;

    fn generate(
        &self,
        subject: Subject<'_>,
        ctx: &GenerationContext<'_>,
    ) -> Result<Vec<GeneratedFile>>;
}

/// Entity, enum and domain generators, in that order
pub fn default_generators() -> Vec<Box<dyn Generator>> {
    vec![
        Box::new(EntityGenerator),
        Box::new(EnumGenerator),
        Box::new(DomainGenerator),
    ]
}

/// Tables, views, materialized views and composite types
#[derive(Debug, Clone, Copy, Default)]
pub struct EntityGenerator;

impl EntityGenerator {
    fn generate_entity(
        &self,
        entity: &Entity,
        ctx: &GenerationContext<'_>,
    ) -> Result<Vec<GeneratedFile>> {
        let path = ctx
            .config
            .metadata
            .metadata(Subject::Entity(entity), AgentNoun::Selector, ctx)?
            .path;

        let mut declarations = Vec::new();

        if let Some(identifiers) = ctx.config.identifier_types.as_ref() {
            for column in entity.columns.iter().filter(|c| c.is_identifier()) {
                let identifier = identifiers.identifier_type(column, entity, ctx)?;
                declarations.push(Declaration::TypeAlias(identifier.declaration));
            }
        }

        // Only tables are written to
        let agents = ctx
            .config
            .agents
            .iter()
            .copied()
            .filter(|agent| entity.kind == EntityKind::Table || *agent == AgentNoun::Selector);

        for agent in agents {
            let interface = synthesize_interface(entity, agent, ctx)?;
            declarations.push(Declaration::Interface(interface));
        }

        debug!(
            "Generated {} declarations for {}",
            declarations.len(),
            entity.qualified_name()
        );

        Ok(vec![GeneratedFile {
            path,
            kind: FileKind::TypeScript,
            declarations,
        }])
    }
}

impl Generator for EntityGenerator {
    fn name(&self) -> &str {
        "entities"
    }

    fn accepts(&self, subject: &Subject<'_>) -> bool {
        matches!(subject, Subject::Entity(_))
    }

    fn generate(
        &self,
        subject: Subject<'_>,
        ctx: &GenerationContext<'_>,
    ) -> Result<Vec<GeneratedFile>> {
        match subject {
            Subject::Entity(entity) => self.generate_entity(entity, ctx),
            _ => Ok(Vec::new()),
        }
    }
}

/// Enums become a default-exported union of string literals
#[derive(Debug, Clone, Copy, Default)]
pub struct EnumGenerator;

impl EnumGenerator {
    fn generate_enum(
        &self,
        enum_type: &EnumType,
        ctx: &GenerationContext<'_>,
    ) -> Result<Vec<GeneratedFile>> {
        let meta = ctx
            .config
            .metadata
            .metadata(Subject::Enum(enum_type), AgentNoun::Selector, ctx)?;

        let declaration = TypeDeclaration {
            name: meta.name,
            comment: meta.comment,
            type_definition: enum_type
                .values
                .iter()
                .map(|value| format!("| {}", escape_string(value)))
                .collect(),
            imports: Vec::new(),
            export_as: ExportAs::Default,
        };

        Ok(vec![GeneratedFile {
            path: meta.path,
            kind: FileKind::TypeScript,
            declarations: vec![Declaration::TypeAlias(declaration)],
        }])
    }
}

impl Generator for EnumGenerator {
    fn name(&self) -> &str {
        "enums"
    }

    fn accepts(&self, subject: &Subject<'_>) -> bool {
        matches!(subject, Subject::Enum(_))
    }

    fn generate(
        &self,
        subject: Subject<'_>,
        ctx: &GenerationContext<'_>,
    ) -> Result<Vec<GeneratedFile>> {
        match subject {
            Subject::Enum(enum_type) => self.generate_enum(enum_type, ctx),
            _ => Ok(Vec::new()),
        }
    }
}

/// Domains alias their base type
#[derive(Debug, Clone, Copy, Default)]
pub struct DomainGenerator;

impl DomainGenerator {
    fn generate_domain(
        &self,
        domain: &DomainType,
        ctx: &GenerationContext<'_>,
    ) -> Result<Vec<GeneratedFile>> {
        let meta = ctx
            .config
            .metadata
            .metadata(Subject::Domain(domain), AgentNoun::Selector, ctx)?;
        let base = ctx.type_resolver().resolve_type_name(&domain.base_type)?;

        let declaration = TypeDeclaration {
            name: meta.name,
            comment: meta.comment,
            type_definition: vec![base.name],
            imports: base.imports,
            export_as: ExportAs::Default,
        };

        Ok(vec![GeneratedFile {
            path: meta.path,
            kind: FileKind::TypeScript,
            declarations: vec![Declaration::TypeAlias(declaration)],
        }])
    }
}

impl Generator for DomainGenerator {
    fn name(&self) -> &str {
        "domains"
    }

    fn accepts(&self, subject: &Subject<'_>) -> bool {
        matches!(subject, Subject::Domain(_))
    }

    fn generate(
        &self,
        subject: Subject<'_>,
        ctx: &GenerationContext<'_>,
    ) -> Result<Vec<GeneratedFile>> {
        match subject {
            Subject::Domain(domain) => self.generate_domain(domain, ctx),
            _ => Ok(Vec::new()),
        }
    }
}
