use crate::export::ExportFormat;
use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

pub const FILE_PREFIX: &str = "reddit_export_userdata";

/// Deterministic output naming for one run:
///   <folder>/reddit_export_userdata[_<account>][_archivebox]_<timestamp>.<ext>
#[derive(Clone, Debug)]
pub struct ExportPaths {
    pub folder: PathBuf,
    pub timestamp: i64, // run start, seconds since epoch
}

impl ExportPaths {
    pub fn new(folder: impl AsRef<Path>, timestamp: i64) -> Self {
        Self { folder: folder.as_ref().to_path_buf(), timestamp }
    }

    /// Path without extension.
    pub fn stem(&self, owner: Option<&str>, format: ExportFormat) -> PathBuf {
        let mut name = String::from(FILE_PREFIX);
        if let Some(owner) = owner {
            name.push('_');
            name.push_str(owner);
        }
        if let Some(tag) = format.discriminator() {
            name.push('_');
            name.push_str(tag);
        }
        name.push_str(&format!("_{}", self.timestamp));
        self.folder.join(name)
    }

    /// Idempotent.
    pub fn ensure_folder(&self) -> Result<()> {
        fs::create_dir_all(&self.folder).with_context(|| format!("create {}", self.folder.display()))
    }
}
