//! Post-render hook stamping a do-not-edit banner on every file

use super::hooks::PostRenderHook;
use crate::codegen::RenderedOutput;

const BANNER: &str = "// @generated\n\
// This file is automatically generated by Tabula. Do not modify manually.\n\n";

/// Prepends a do-not-edit banner to every rendered file
#[derive(Debug, Clone, Copy, Default)]
pub struct MarkAsGenerated;

impl PostRenderHook for MarkAsGenerated {
    fn name(&self) -> &str {
        "mark-as-generated"
    }

    fn apply(&self, mut rendered: RenderedOutput) -> anyhow::Result<RenderedOutput> {
        for (_, text) in rendered.iter_mut() {
            if !text.starts_with(BANNER) {
                text.insert_str(0, BANNER);
            }
        }
        Ok(rendered)
    }
}
