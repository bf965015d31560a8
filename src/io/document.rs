use std::path::Path;

use anyhow::{Context, Result};

/// Read a whole transcript, normalising Windows line endings
pub fn read_document(path: &Path) -> Result<String> {
    let content =
        std::fs::read_to_string(path).with_context(|| format!("Failed to read file: {:?}", path))?;
    Ok(if content.contains("\r\n") {
        content.replace("\r\n", "\n")
    } else {
        content
    })
}

/// Replace the file's contents with `text`
pub fn write_document(path: &Path, text: &str) -> Result<()> {
    std::fs::write(path, text).with_context(|| format!("Failed to write file: {:?}", path))
}
