//! Writes rendered files to disk

use std::fs;
use std::path::{Component, Path, PathBuf};

use tracing::{debug, info};

use crate::codegen::RenderedOutput;
use crate::error::{CodegenError, Result};

/// Write every rendered file under `output_dir`, creating directories as needed.
///
/// Every path is checked before anything on disk changes, and files are
/// staged in a temporary directory beside `output_dir` first. A failure
/// leaves the previous output untouched. With `pre_delete`, the directory is
/// cleared once staging succeeded so stale files from earlier runs disappear.
pub fn write_output(
    rendered: &RenderedOutput,
    output_dir: &Path,
    pre_delete: bool,
) -> Result<Vec<PathBuf>> {
    let relative_paths = rendered
        .paths()
        .map(checked_relative_path)
        .collect::<Result<Vec<_>>>()?;

    let parent = output_dir
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    fs::create_dir_all(parent)?;
    let staging = tempfile::Builder::new()
        .prefix(".tabula-")
        .tempdir_in(parent)?;

    for (relative, (_, text)) in relative_paths.iter().zip(rendered.iter()) {
        let staged = staging.path().join(relative);
        if let Some(dir) = staged.parent() {
            fs::create_dir_all(dir)?;
        }
        fs::write(&staged, text)?;
    }
    debug!("Staged {} files in {:?}", relative_paths.len(), staging.path());

    if pre_delete && output_dir.exists() {
        info!("Clearing output directory {:?}", output_dir);
        fs::remove_dir_all(output_dir)?;
    }
    fs::create_dir_all(output_dir)?;

    let mut written = Vec::with_capacity(relative_paths.len());
    for relative in &relative_paths {
        let target = output_dir.join(relative);
        if let Some(dir) = target.parent() {
            fs::create_dir_all(dir)?;
        }
        fs::rename(staging.path().join(relative), &target)?;
        debug!("Wrote {:?}", target);
        written.push(target);
    }

    info!("Wrote {} files to {:?}", written.len(), output_dir);
    Ok(written)
}

/// Rendered paths must stay inside the output directory
fn checked_relative_path(path: &str) -> Result<&Path> {
    let relative = Path::new(path);
    if relative.is_absolute() || relative.components().any(|c| matches!(c, Component::ParentDir)) {
        return Err(CodegenError::ValidationError(format!(
            "Refusing to write outside the output directory: {}",
            path
        )));
    }
    Ok(relative)
}
