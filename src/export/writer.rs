use std::fs;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use chrono::Utc;
use tracing::info;

use super::manifest::{ContentDigest, ExportManifest};
use super::ExportError;
use crate::paths::resolve_in_working_dir;

/// Output file location; see [`resolve_in_working_dir`].
pub fn resolve_output_path(file_name: Option<&Path>, default_name: &str) -> Result<PathBuf, ExportError> {
    Ok(resolve_in_working_dir(file_name, default_name, "output txt file")?)
}

/// Writes entries back to back as UTF-8. Entries already use `\n` line endings.
pub fn write_output<I>(path: &Path, entries: I) -> Result<ExportManifest, ExportError>
where
    I: IntoIterator<Item = String>,
{
    let file = fs::File::create(path)?;
    let mut writer = BufWriter::new(file);
    let mut digest = ContentDigest::new();
    let mut story_count = 0;
    let mut byte_count = 0;

    for entry in entries {
        writer.write_all(entry.as_bytes())?;
        digest.update(&entry);
        story_count += 1;
        byte_count += entry.len();
    }

    let file = writer.into_inner().map_err(|e| e.into_error())?;
    file.sync_all()?;

    let manifest = ExportManifest {
        path: path.to_path_buf(),
        story_count,
        byte_count,
        content_digest: digest.finish(),
        written_at: Utc::now(),
    };
    info!(
        path = %manifest.path.display(),
        stories = manifest.story_count,
        bytes = manifest.byte_count,
        "export written"
    );
    Ok(manifest)
}
