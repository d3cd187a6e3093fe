//! Declaration model: the generatable units and the type references between them

use serde::{Deserialize, Serialize};

/// An import a declaration needs in order to mention a type
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TypeImport {
    /// Name the type is referred to by
    pub name: String,

    /// Output path (relative imports) or module name (absolute imports)
    pub path: String,

    /// `import Name from ...` rather than `import { Name } from ...`
    #[serde(default)]
    pub is_default: bool,

    /// Use `path` verbatim instead of resolving it against the importing file
    #[serde(default)]
    pub is_absolute: bool,
}

/// A type expression together with the imports it requires
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeRef {
    pub name: String,
    pub imports: Vec<TypeImport>,
}

/// User-supplied type: a literal expression or an importable name
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TypeDefinition {
    Literal(String),
    Reference(TypeImport),
}

/// Whether a declaration is the file's default export or a named export
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExportAs {
    #[default]
    Named,
    Default,
}

#[derive(Debug, Clone, PartialEq)]
pub struct InterfaceProperty {
    pub name: String,
    pub comment: Vec<String>,
    pub type_ref: TypeRef,
    /// Rendered as `T | null`
    pub nullable: bool,
    /// Rendered as `name?:`
    pub optional: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct InterfaceDeclaration {
    pub name: String,
    pub comment: Vec<String>,
    pub base: Option<TypeRef>,
    pub properties: Vec<InterfaceProperty>,
    pub export_as: ExportAs,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TypeDeclaration {
    pub name: String,
    pub comment: Vec<String>,
    /// Type expression lines; more than one line renders as a hanging block
    pub type_definition: Vec<String>,
    pub imports: Vec<TypeImport>,
    pub export_as: ExportAs,
}

/// Hand-rolled content: literal lines plus the imports they use
#[derive(Debug, Clone, PartialEq)]
pub struct GenericDeclaration {
    pub comment: Vec<String>,
    pub lines: Vec<String>,
    pub imports: Vec<TypeImport>,
}

/// A named, typed unit of generated code
#[derive(Debug, Clone, PartialEq)]
pub enum Declaration {
    Interface(InterfaceDeclaration),
    TypeAlias(TypeDeclaration),
    Generic(GenericDeclaration),
}

impl TypeImport {
    /// Named import of an output-relative path
    pub fn relative(name: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            path: path.into(),
            is_default: false,
            is_absolute: false,
        }
    }

    /// Named import from a module
    pub fn absolute(name: impl Into<String>, module: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            path: module.into(),
            is_default: false,
            is_absolute: true,
        }
    }

    pub fn as_default(mut self) -> Self {
        self.is_default = true;
        self
    }
}

impl TypeRef {
    /// A builtin or otherwise import-free type expression
    pub fn literal(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            imports: Vec::new(),
        }
    }

    pub fn imported(import: TypeImport) -> Self {
        Self {
            name: import.name.clone(),
            imports: vec![import],
        }
    }

    /// Wrap as an array type, parenthesizing compound expressions
    pub fn into_array(self) -> Self {
        let is_compound = self
            .name
            .chars()
            .any(|c| c.is_whitespace() || c == '|' || c == '&');
        let name = if is_compound {
            format!("({})[]", self.name)
        } else {
            format!("{}[]", self.name)
        };
        Self {
            name,
            imports: self.imports,
        }
    }
}

impl From<TypeDefinition> for TypeRef {
    fn from(definition: TypeDefinition) -> Self {
        match definition {
            TypeDefinition::Literal(name) => TypeRef::literal(name),
            TypeDefinition::Reference(import) => TypeRef::imported(import),
        }
    }
}

impl Declaration {
    /// Declared name, if the declaration introduces one
    pub fn name(&self) -> Option<&str> {
        match self {
            Declaration::Interface(i) => Some(&i.name),
            Declaration::TypeAlias(t) => Some(&t.name),
            Declaration::Generic(_) => None,
        }
    }

    pub fn export_as(&self) -> Option<ExportAs> {
        match self {
            Declaration::Interface(i) => Some(i.export_as),
            Declaration::TypeAlias(t) => Some(t.export_as),
            Declaration::Generic(_) => None,
        }
    }

    /// Every import the declaration needs, in first-mention order
    pub fn type_imports(&self) -> Vec<&TypeImport> {
        match self {
            Declaration::Interface(i) => i
                .base
                .iter()
                .flat_map(|base| base.imports.iter())
                .chain(i.properties.iter().flat_map(|p| p.type_ref.imports.iter()))
                .collect(),
            Declaration::TypeAlias(t) => t.imports.iter().collect(),
            Declaration::Generic(g) => g.imports.iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_array_wrapping() {
        assert_eq!(TypeRef::literal("string").into_array().name, "string[]");
        assert_eq!(
            TypeRef::literal("string | number").into_array().name,
            "(string | number)[]"
        );
    }

    #[test]
    fn test_type_definition_deserialize() {
        let literal: TypeDefinition = serde_json::from_str(r#""string""#).unwrap();
        assert_eq!(literal, TypeDefinition::Literal("string".into()));

        let reference: TypeDefinition =
            serde_json::from_str(r#"{ "name": "Range", "path": "postgres-range", "is_absolute": true }"#)
                .unwrap();
        let type_ref = TypeRef::from(reference);
        assert_eq!(type_ref.name, "Range");
        assert_eq!(
            type_ref.imports,
            vec![TypeImport::absolute("Range", "postgres-range")]
        );
    }

    #[test]
    fn test_interface_collects_imports() {
        let declaration = Declaration::Interface(InterfaceDeclaration {
            name: "Film".into(),
            comment: vec![],
            base: Some(TypeRef::imported(TypeImport::relative("Base", "public/Base"))),
            properties: vec![
                InterfaceProperty {
                    name: "rating".into(),
                    comment: vec![],
                    type_ref: TypeRef::imported(
                        TypeImport::relative("MpaaRating", "public/MpaaRating").as_default(),
                    ),
                    nullable: true,
                    optional: false,
                },
                InterfaceProperty {
                    name: "title".into(),
                    comment: vec![],
                    type_ref: TypeRef::literal("string"),
                    nullable: false,
                    optional: false,
                },
            ],
            export_as: ExportAs::Default,
        });

        let names: Vec<&str> = declaration
            .type_imports()
            .iter()
            .map(|i| i.name.as_str())
            .collect();
        assert_eq!(names, vec!["Base", "MpaaRating"]);
        assert_eq!(declaration.name(), Some("Film"));
    }
}
