//! Renderer: declarations -> TypeScript source text

use std::collections::{BTreeMap, BTreeSet, HashSet};

use indexmap::IndexMap;
use tracing::debug;

use super::declaration::{
    Declaration, ExportAs, GenericDeclaration, InterfaceDeclaration, TypeDeclaration,
};
use super::escape::escape_comment;
use super::output::{FileContents, Output};
use crate::error::{CodegenError, Result};

const INDENT: &str = "  ";

/// Rendered files: output path (with extension) -> source text.
///
/// Post-render hooks only ever see this type, never the declaration model.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RenderedOutput {
    files: IndexMap<String, String>,
}

impl RenderedOutput {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, path: impl Into<String>, text: impl Into<String>) -> Option<String> {
        self.files.insert(path.into(), text.into())
    }

    pub fn get(&self, path: &str) -> Option<&str> {
        self.files.get(path).map(String::as_str)
    }

    pub fn get_mut(&mut self, path: &str) -> Option<&mut String> {
        self.files.get_mut(path)
    }

    pub fn remove(&mut self, path: &str) -> Option<String> {
        self.files.shift_remove(path)
    }

    pub fn paths(&self) -> impl Iterator<Item = &str> {
        self.files.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &String)> {
        self.files.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = (&String, &mut String)> {
        self.files.iter_mut()
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}

impl IntoIterator for RenderedOutput {
    type Item = (String, String);
    type IntoIter = indexmap::map::IntoIter<String, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.files.into_iter()
    }
}

/// Render every artifact in the accumulator
pub fn render_output(output: &Output) -> Result<RenderedOutput> {
    let mut rendered = RenderedOutput::new();
    for (path, contents) in output.iter() {
        let text = render_file(path, contents).map_err(|source| CodegenError::Render {
            path: path.clone(),
            source: Box::new(source),
        })?;
        let file_name = format!("{}{}", path, contents.kind.extension());
        debug!("Rendered {} ({} declarations)", file_name, contents.declarations.len());
        rendered.insert(file_name, text);
    }
    Ok(rendered)
}

/// Render one artifact: grouped imports, then declarations separated by blank lines
pub fn render_file(path: &str, contents: &FileContents) -> Result<String> {
    check_declared_names(path, &contents.declarations)?;

    let mut sections = Vec::new();

    let imports = render_imports(path, &contents.declarations);
    if !imports.is_empty() {
        sections.push(imports.concat());
    }
    for declaration in &contents.declarations {
        sections.push(render_declaration(declaration));
    }

    Ok(sections.join("\n"))
}

/// Declared names must be unique within one file, and only one default export is allowed
fn check_declared_names(path: &str, declarations: &[Declaration]) -> Result<()> {
    let mut seen = HashSet::new();
    let mut default_exports = 0;
    for declaration in declarations {
        if let Some(name) = declaration.name() {
            if !seen.insert(name) {
                return Err(CodegenError::DuplicateDeclaration {
                    path: path.to_string(),
                    name: name.to_string(),
                });
            }
        }
        if declaration.export_as() == Some(ExportAs::Default) {
            default_exports += 1;
        }
    }
    if default_exports > 1 {
        return Err(CodegenError::ValidationError(format!(
            "{} has {} default exports",
            path, default_exports
        )));
    }
    Ok(())
}

#[derive(Default)]
struct ImportGroup {
    defaults: BTreeSet<String>,
    named: BTreeSet<String>,
}

/// Group imports by source: relative sources first, then absolute, each sorted.
/// Imports of the file itself are dropped.
fn render_imports(path: &str, declarations: &[Declaration]) -> Vec<String> {
    let mut groups: BTreeMap<(bool, String), ImportGroup> = BTreeMap::new();

    for import in declarations.iter().flat_map(Declaration::type_imports) {
        if !import.is_absolute && import.path == path {
            continue;
        }
        let group = groups
            .entry((import.is_absolute, import.path.clone()))
            .or_default();
        if import.is_default {
            group.defaults.insert(import.name.clone());
        } else {
            group.named.insert(import.name.clone());
        }
    }

    let mut lines = Vec::new();
    for ((is_absolute, target), group) in &groups {
        let source = if *is_absolute {
            target.clone()
        } else {
            relative_import_path(path, target)
        };
        for default in &group.defaults {
            lines.push(format!("import type {} from '{}';\n", default, source));
        }
        if !group.named.is_empty() {
            let named: Vec<&str> = group.named.iter().map(String::as_str).collect();
            lines.push(format!(
                "import type {{ {} }} from '{}';\n",
                named.join(", "),
                source
            ));
        }
    }
    lines
}

/// Relative module specifier from one output path to another.
/// e.g., ("public/Film", "public/Actor") -> "./Actor"
pub fn relative_import_path(from: &str, to: &str) -> String {
    let from_parts: Vec<&str> = from.split('/').filter(|p| !p.is_empty()).collect();
    let to_parts: Vec<&str> = to.split('/').filter(|p| !p.is_empty()).collect();

    let from_dir = &from_parts[..from_parts.len().saturating_sub(1)];
    let to_dir = &to_parts[..to_parts.len().saturating_sub(1)];

    let common = from_dir
        .iter()
        .zip(to_dir.iter())
        .take_while(|(a, b)| a == b)
        .count();

    let ups = from_dir.len() - common;
    let rest = to_parts[common..].join("/");

    if ups == 0 {
        format!("./{}", rest)
    } else {
        format!("{}{}", "../".repeat(ups), rest)
    }
}

/// Render a comment block.
///
/// No lines renders nothing, one line the single-line form, more than one a
/// multi-line block.
pub fn render_comment(lines: &[String], indent: &str) -> String {
    match lines {
        [] => String::new(),
        [line] => format!("{}/** {} */\n", indent, escape_comment(line)),
        _ => {
            let mut out = format!("{}/**\n", indent);
            for line in lines {
                let line = escape_comment(line);
                if line.is_empty() {
                    out.push_str(&format!("{} *\n", indent));
                } else {
                    out.push_str(&format!("{} * {}\n", indent, line));
                }
            }
            out.push_str(&format!("{} */\n", indent));
            out
        }
    }
}

pub fn render_declaration(declaration: &Declaration) -> String {
    match declaration {
        Declaration::Interface(interface) => render_interface(interface),
        Declaration::TypeAlias(alias) => render_type_alias(alias),
        Declaration::Generic(generic) => render_generic(generic),
    }
}

fn render_interface(interface: &InterfaceDeclaration) -> String {
    let mut code = render_comment(&interface.comment, "");

    let export = match interface.export_as {
        ExportAs::Default => "export default ",
        ExportAs::Named => "export ",
    };
    let extends = interface
        .base
        .as_ref()
        .map(|base| format!(" extends {}", base.name))
        .unwrap_or_default();

    if interface.properties.is_empty() {
        code.push_str(&format!("{}interface {}{} {{}}\n", export, interface.name, extends));
        return code;
    }

    code.push_str(&format!("{}interface {}{} {{\n", export, interface.name, extends));
    for (i, property) in interface.properties.iter().enumerate() {
        if i > 0 && !property.comment.is_empty() {
            code.push('\n');
        }
        code.push_str(&render_comment(&property.comment, INDENT));
        let optional = if property.optional { "?" } else { "" };
        let null = if property.nullable { " | null" } else { "" };
        code.push_str(&format!(
            "{}{}{}: {}{};\n",
            INDENT, property.name, optional, property.type_ref.name, null
        ));
    }
    code.push_str("}\n");
    code
}

fn render_type_alias(alias: &TypeDeclaration) -> String {
    let mut code = render_comment(&alias.comment, "");

    let export = match alias.export_as {
        ExportAs::Default => "",
        ExportAs::Named => "export ",
    };

    match alias.type_definition.as_slice() {
        [] => code.push_str(&format!("{}type {} = never;\n", export, alias.name)),
        [single] => code.push_str(&format!("{}type {} = {};\n", export, alias.name, single)),
        lines => {
            code.push_str(&format!("{}type {} =\n", export, alias.name));
            let last = lines.len() - 1;
            for (i, line) in lines.iter().enumerate() {
                let terminator = if i == last { ";" } else { "" };
                code.push_str(&format!("{}{}{}\n", INDENT, line, terminator));
            }
        }
    }

    if alias.export_as == ExportAs::Default {
        code.push_str(&format!("export default {};\n", alias.name));
    }
    code
}

fn render_generic(generic: &GenericDeclaration) -> String {
    let mut code = render_comment(&generic.comment, "");
    for line in &generic.lines {
        code.push_str(line);
        code.push('\n');
    }
    code
}
