//! Pre-render hook that adds an index file re-exporting every generated type

use async_trait::async_trait;

use super::hooks::PreRenderHook;
use crate::codegen::{
    relative_import_path, Declaration, ExportAs, FileKind, GenericDeclaration, Output,
};

/// Adds `<path>` re-exporting the default and named exports of every other file
#[derive(Debug, Clone)]
pub struct GenerateIndexFile {
    path: String,
}

impl GenerateIndexFile {
    pub fn new(path: impl Into<String>) -> Self {
        Self { path: path.into() }
    }

    fn export_lines(&self, output: &Output) -> Vec<String> {
        let mut lines = Vec::new();

        for (path, contents) in output.iter() {
            if *path == self.path || contents.kind != FileKind::TypeScript {
                continue;
            }
            let source = relative_import_path(&self.path, path);

            let mut named = Vec::new();
            for declaration in &contents.declarations {
                let Some(name) = declaration.name() else {
                    continue;
                };
                match declaration.export_as() {
                    Some(ExportAs::Default) => lines.push(format!(
                        "export type {{ default as {} }} from '{}';",
                        name, source
                    )),
                    Some(ExportAs::Named) => named.push(name),
                    None => {}
                }
            }
            if !named.is_empty() {
                lines.push(format!(
                    "export type {{ {} }} from '{}';",
                    named.join(", "),
                    source
                ));
            }
        }

        lines
    }
}

impl Default for GenerateIndexFile {
    fn default() -> Self {
        Self::new("index")
    }
}

#[async_trait]
impl PreRenderHook for GenerateIndexFile {
    fn name(&self) -> &str {
        "index-file"
    }

    async fn apply(&self, mut output: Output) -> anyhow::Result<Output> {
        let lines = self.export_lines(&output);
        if lines.is_empty() {
            return Ok(output);
        }

        output.merge(
            self.path.clone(),
            FileKind::TypeScript,
            vec![Declaration::Generic(GenericDeclaration {
                comment: vec![],
                lines,
                imports: vec![],
            })],
        )?;
        Ok(output)
    }
}
