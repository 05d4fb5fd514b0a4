use std::io::{Cursor, Read};

use thiserror::Error;
use tracing::debug;

use super::extract::DocumentKind;

#[derive(Debug, Error)]
pub enum ArchiveError {
    #[error("Unreadable resume archive: {0}")]
    Zip(#[from] zip::result::ZipError),

    #[error("Failed to read archive entry '{name}': {source}")]
    Entry {
        name: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Resume archive unpacks to more than {limit} bytes (stopped at '{name}')")]
    TooLarge { name: String, limit: u64 },
}

/// A single resume pulled out of the uploaded archive.
#[derive(Debug, Clone)]
pub struct ResumeDocument {
    /// Path inside the archive, used in warnings and as a fallback identity.
    pub file_name: String,
    /// Declared extension including the dot, lower-cased (`.pdf` / `.docx`).
    pub extension: String,
    pub bytes: Vec<u8>,
}

impl ResumeDocument {
    pub fn new(file_name: impl Into<String>, bytes: Vec<u8>) -> Self {
        let file_name = file_name.into();
        let extension = std::path::Path::new(&file_name)
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| format!(".{}", ext.to_ascii_lowercase()))
            .unwrap_or_default();
        Self {
            file_name,
            extension,
            bytes,
        }
    }

    /// File name without directories or extension.
    pub fn stem(&self) -> &str {
        std::path::Path::new(&self.file_name)
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or(&self.file_name)
    }
}

/// Reads every PDF/DOCX entry from a ZIP archive, in archive order.
///
/// `max_unpacked` caps the total uncompressed size of the kept entries. The
/// sizes declared in the archive headers are never trusted for allocation.
pub fn read_resume_archive(
    bytes: &[u8],
    max_unpacked: u64,
) -> Result<Vec<ResumeDocument>, ArchiveError> {
    let mut archive = zip::ZipArchive::new(Cursor::new(bytes))?;
    let mut documents = Vec::new();
    let mut remaining = max_unpacked;

    for index in 0..archive.len() {
        let mut entry = archive.by_index(index)?;
        let name = entry.name().to_string();

        if entry.is_dir() || is_resource_fork(&name) || DocumentKind::from_file_name(&name).is_none()
        {
            debug!("Skipping archive entry {name}");
            continue;
        }

        let mut data = Vec::new();
        entry
            .by_ref()
            .take(remaining.saturating_add(1))
            .read_to_end(&mut data)
            .map_err(|source| ArchiveError::Entry {
                name: name.clone(),
                source,
            })?;

        let read = data.len() as u64;
        if read > remaining {
            return Err(ArchiveError::TooLarge {
                name,
                limit: max_unpacked,
            });
        }
        remaining -= read;

        documents.push(ResumeDocument::new(name, data));
    }

    Ok(documents)
}

/// macOS Finder zips carry `__MACOSX/._name.pdf` shadow entries.
fn is_resource_fork(name: &str) -> bool {
    name.starts_with("__MACOSX/")
        || name
            .rsplit('/')
            .next()
            .map(|base| base.starts_with("._"))
            .unwrap_or(false)
}
