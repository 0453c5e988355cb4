//! Result archive
//!
//! Builds the in-memory ZIP returned for a processed batch.

use std::collections::HashSet;
use std::io::{Cursor, Write};

use chrono::NaiveDateTime;
use zip::write::{SimpleFileOptions, ZipWriter};
use zip::CompressionMethod;

use crate::error::DomainError;

/// Timestamp layout used in entry and archive names
pub const TIMESTAMP_FORMAT: &str = "%Y%m%d_%H%M%S";

/// Name of an archive entry for a processed upload
pub fn entry_name(at: NaiveDateTime, file_name: &str) -> String {
    format!("processed_{}_{}", at.format(TIMESTAMP_FORMAT), file_name)
}

/// Download name of a batch archive
pub fn archive_file_name(at: NaiveDateTime) -> String {
    format!("processed_images_{}.zip", at.format(TIMESTAMP_FORMAT))
}

/// Insert `_n` before the extension, or append it when there is none
fn with_suffix(name: &str, n: usize) -> String {
    match name.rfind('.') {
        Some(dot) if dot > 0 => format!("{}_{}{}", &name[..dot], n, &name[dot..]),
        _ => format!("{}_{}", name, n),
    }
}

/// In-memory ZIP writer that never emits duplicate entry names
pub struct ArchiveBuilder {
    zip: ZipWriter<Cursor<Vec<u8>>>,
    names: HashSet<String>,
}

impl ArchiveBuilder {
    pub fn new() -> Self {
        Self {
            zip: ZipWriter::new(Cursor::new(Vec::new())),
            names: HashSet::new(),
        }
    }

    /// Add an entry, returning the name it was stored under.
    ///
    /// Encoded images are already compressed, so entries are stored as is.
    pub fn add(&mut self, name: &str, data: &[u8]) -> Result<String, DomainError> {
        let name = self.unique_name(name);
        let options = SimpleFileOptions::default().compression_method(CompressionMethod::Stored);

        self.zip.start_file(name.as_str(), options)?;
        self.zip.write_all(data)?;
        self.names.insert(name.clone());

        tracing::debug!("Added {} ({} bytes) to archive", name, data.len());
        Ok(name)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Finish the archive and return its bytes
    pub fn finish(self) -> Result<Vec<u8>, DomainError> {
        let cursor = self.zip.finish()?;
        Ok(cursor.into_inner())
    }

    fn unique_name(&self, name: &str) -> String {
        if !self.names.contains(name) {
            return name.to_string();
        }
        (1..)
            .map(|n| with_suffix(name, n))
            .find(|candidate| !self.names.contains(candidate))
            .unwrap_or_else(|| name.to_string())
    }
}

impl Default for ArchiveBuilder {
    fn default() -> Self {
        Self::new()
    }
}
