//! Upload and batch domain entities
//!
//! An upload batch is one submission of the processing form; its result is
//! a single archive of re-encoded images.

use uuid::Uuid;

/// Unique identifier for one processing request, used to correlate logs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BatchId(pub Uuid);

impl BatchId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for BatchId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for BatchId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A single file received from the upload form
#[derive(Debug, Clone)]
pub struct UploadedImage {
    /// File name as sent by the client, possibly with a directory part
    pub file_name: Option<String>,
    pub data: Vec<u8>,
}

impl UploadedImage {
    #[cfg(test)]
    pub fn new(file_name: impl Into<String>, data: Vec<u8>) -> Self {
        Self {
            file_name: Some(file_name.into()),
            data,
        }
    }

    /// Base name of the client file name, or `None` when there is nothing usable
    pub fn base_name(&self) -> Option<&str> {
        let name = self.file_name.as_deref()?;
        let base = name.rsplit(|c: char| c == '/' || c == '\\').next().unwrap_or(name);
        if base.is_empty() {
            None
        } else {
            Some(base)
        }
    }
}

/// An upload that could not be processed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FailedUpload {
    pub file_name: String,
    pub reason: String,
}

/// Result of processing one upload batch
#[derive(Debug, Clone)]
pub struct ProcessedBatch {
    /// ZIP archive bytes
    pub archive: Vec<u8>,
    /// Suggested download name for the archive
    pub archive_name: String,
    pub processed: usize,
    pub failures: Vec<FailedUpload>,
}
