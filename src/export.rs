//! Group serialization: `;`-delimited CSV with a header, or a plain URL list
//! in the format ArchiveBox ingests (one URL per line).
//! Files are written to a staging name next to the target and promoted when complete.

use crate::error::ExportError;
use crate::partition::ExportGroup;
use crate::util::{create_with_backoff, replace_file_atomic_backoff};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ExportFormat {
    /// Every column, one row per record.
    Csv,
    /// Only the URLs of each record.
    UrlList,
}

impl ExportFormat {
    pub fn from_url_only(url_only: bool) -> Self {
        if url_only { ExportFormat::UrlList } else { ExportFormat::Csv }
    }

    pub fn extension(self) -> &'static str {
        match self {
            ExportFormat::Csv => "csv",
            ExportFormat::UrlList => "txt",
        }
    }

    /// Tag inserted into file names, if any.
    pub fn discriminator(self) -> Option<&'static str> {
        match self {
            ExportFormat::Csv => None,
            ExportFormat::UrlList => Some("archivebox"),
        }
    }
}

pub const CSV_DELIMITER: u8 = b';';

/// Writes groups in one format.
#[derive(Clone, Copy, Debug)]
pub struct Exporter {
    pub format: ExportFormat,
    pub human_timestamps: bool,
}

impl Exporter {
    pub fn new(format: ExportFormat) -> Self {
        Self { format, human_timestamps: false }
    }

    pub fn human_timestamps(mut self, yes: bool) -> Self {
        self.human_timestamps = yes;
        self
    }

    /// Write `group` to `stem` plus the format's extension. Returns the final path.
    pub fn write(&self, group: &ExportGroup, stem: &Path) -> Result<PathBuf, ExportError> {
        let path = stem.with_extension(self.format.extension());
        let staging = path.with_extension(format!("{}.inprogress", self.format.extension()));

        let file = create_with_backoff(&staging).map_err(|e| ExportError::io(&staging, e))?;
        let mut out = BufWriter::new(file);
        let written = match self.format {
            ExportFormat::Csv => self.write_csv(group, &path, &mut out),
            ExportFormat::UrlList => write_url_list(group, &mut out).map_err(|e| ExportError::io(&staging, e)),
        }
        .and_then(|_| out.flush().map_err(|e| ExportError::io(&staging, e)));

        if let Err(e) = written {
            drop(out);
            let _ = std::fs::remove_file(&staging);
            return Err(e);
        }
        drop(out);

        replace_file_atomic_backoff(&staging, &path).map_err(|e| {
            ExportError::io(&path, std::io::Error::new(std::io::ErrorKind::Other, format!("{e:#}")))
        })?;
        tracing::debug!("Wrote {} records to {}", group.records.len(), path.display());
        Ok(path)
    }

    fn write_csv<W: Write>(&self, group: &ExportGroup, path: &Path, out: W) -> Result<(), ExportError> {
        let first = group
            .records
            .first()
            .ok_or_else(|| ExportError::EmptyGroup { path: path.to_path_buf() })?;
        let header: Vec<&'static str> = first.columns(self.human_timestamps).into_iter().map(|(k, _)| k).collect();

        let mut w = csv::WriterBuilder::new()
            .delimiter(CSV_DELIMITER)
            .quote_style(csv::QuoteStyle::Necessary)
            .from_writer(out);
        w.write_record(&header)?;

        for (index, record) in group.records.iter().enumerate() {
            let (keys, values): (Vec<&'static str>, Vec<String>) =
                record.columns(self.human_timestamps).into_iter().unzip();
            if keys != header {
                return Err(ExportError::SchemaMismatch {
                    index,
                    expected: header.iter().map(|s| s.to_string()).collect(),
                    found: keys.iter().map(|s| s.to_string()).collect(),
                });
            }
            w.write_record(&values)?;
        }
        w.flush().map_err(|e| ExportError::io(path, e))?;
        Ok(())
    }
}

/// Per record: canonical URL, legacy URL, then the external link when present.
pub fn write_url_list<W: Write>(group: &ExportGroup, out: &mut W) -> std::io::Result<()> {
    for record in &group.records {
        writeln!(out, "{}", record.canonical_url)?;
        writeln!(out, "{}", record.legacy_url)?;
        if let Some(link) = record.external_link() {
            writeln!(out, "{}", link)?;
        }
    }
    Ok(())
}

/// Convenience wrapper using epoch-second timestamps.
pub fn export_group(group: &ExportGroup, stem: &Path, format: ExportFormat) -> Result<PathBuf, ExportError> {
    Exporter::new(format).write(group, stem)
}
