//! Output accumulator: logical output path -> artifact

use indexmap::IndexMap;

use super::declaration::Declaration;
use crate::error::{CodegenError, Result};

/// Kind of file an artifact renders to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FileKind {
    #[default]
    TypeScript,
    /// Ambient declaration file (`.d.ts`)
    Declaration,
}

impl FileKind {
    pub fn extension(&self) -> &'static str {
        match self {
            FileKind::TypeScript => ".ts",
            FileKind::Declaration => ".d.ts",
        }
    }
}

/// One artifact: a file kind plus its ordered declarations
#[derive(Debug, Clone, PartialEq, Default)]
pub struct FileContents {
    pub kind: FileKind,
    pub declarations: Vec<Declaration>,
}

/// The accumulated, not yet rendered, output of a run.
///
/// Paths are extension-less and relative to the output directory
/// (e.g., `public/Actor`). Insertion order is preserved.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Output {
    files: IndexMap<String, FileContents>,
}

impl Output {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append declarations to the artifact at `path`, creating it if needed.
    ///
    /// Existing declarations are kept; merging a different file kind into an
    /// existing path is an error.
    pub fn merge(
        &mut self,
        path: impl Into<String>,
        kind: FileKind,
        declarations: Vec<Declaration>,
    ) -> Result<()> {
        let path = path.into();
        match self.files.get_mut(&path) {
            Some(existing) => {
                if existing.kind != kind {
                    return Err(CodegenError::FileKindMismatch { path });
                }
                existing.declarations.extend(declarations);
            }
            None => {
                self.files.insert(path, FileContents { kind, declarations });
            }
        }
        Ok(())
    }

    /// Replace the artifact at `path`, returning the previous one
    pub fn insert(&mut self, path: impl Into<String>, contents: FileContents) -> Option<FileContents> {
        self.files.insert(path.into(), contents)
    }

    pub fn remove(&mut self, path: &str) -> Option<FileContents> {
        self.files.shift_remove(path)
    }

    pub fn get(&self, path: &str) -> Option<&FileContents> {
        self.files.get(path)
    }

    pub fn get_mut(&mut self, path: &str) -> Option<&mut FileContents> {
        self.files.get_mut(path)
    }

    pub fn contains(&self, path: &str) -> bool {
        self.files.contains_key(path)
    }

    pub fn paths(&self) -> impl Iterator<Item = &str> {
        self.files.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &FileContents)> {
        self.files.iter()
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}
