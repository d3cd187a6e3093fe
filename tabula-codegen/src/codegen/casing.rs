//! Naming utilities: casing axes and name resolution

use heck::{ToKebabCase, ToLowerCamelCase, ToPascalCase, ToSnakeCase};
use serde::{Deserialize, Serialize};

/// A name casing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Casing {
    Camel,
    Snake,
    Pascal,
    #[serde(alias = "kebab")]
    Dash,
}

/// Which name transform to apply
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CasingAxis {
    /// As stored in the database
    Source,
    TypeName,
    Property,
    Filename,
}

/// Casing per axis
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CasingConfig {
    #[serde(default = "default_source")]
    pub source: Casing,

    #[serde(default = "default_type_name")]
    pub type_name: Casing,

    #[serde(default = "default_property")]
    pub property: Casing,

    #[serde(default = "default_filename")]
    pub filename: Casing,
}

fn default_source() -> Casing {
    Casing::Snake
}
fn default_type_name() -> Casing {
    Casing::Pascal
}
fn default_property() -> Casing {
    Casing::Snake
}
fn default_filename() -> Casing {
    Casing::Pascal
}

impl Default for CasingConfig {
    fn default() -> Self {
        Self {
            source: default_source(),
            type_name: default_type_name(),
            property: default_property(),
            filename: default_filename(),
        }
    }
}

impl Casing {
    /// Convert a name into this casing
    pub fn apply(&self, raw: &str) -> String {
        match self {
            Casing::Camel => raw.to_lower_camel_case(),
            Casing::Snake => raw.to_snake_case(),
            Casing::Pascal => raw.to_pascal_case(),
            Casing::Dash => raw.to_kebab_case(),
        }
    }

    /// Append a suffix word to an already-cased name
    /// e.g., Pascal: ("FilmActor", "initializer") -> "FilmActorInitializer"
    pub fn join(&self, base: &str, suffix: &str) -> String {
        match self {
            Casing::Camel | Casing::Pascal => format!("{}{}", base, suffix.to_pascal_case()),
            Casing::Snake => format!("{}_{}", base, suffix.to_snake_case()),
            Casing::Dash => format!("{}-{}", base, suffix.to_kebab_case()),
        }
    }
}

impl CasingConfig {
    /// Casing configured for an axis
    pub fn casing_for(&self, axis: CasingAxis) -> Casing {
        match axis {
            CasingAxis::Source => self.source,
            CasingAxis::TypeName => self.type_name,
            CasingAxis::Property => self.property,
            CasingAxis::Filename => self.filename,
        }
    }

    /// Resolve a raw (source-cased) name for an axis.
    ///
    /// Names are returned verbatim when the target casing equals the source
    /// casing, so stored names survive untouched.
    pub fn resolve_name(&self, raw: &str, axis: CasingAxis) -> String {
        let target = self.casing_for(axis);
        if target == self.source {
            raw.to_string()
        } else {
            target.apply(raw)
        }
    }
}
