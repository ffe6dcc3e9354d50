//! Dataset export. Each format renders the full record set to bytes, then a
//! single file `<base_filename>.<ext>` is written into the output directory.

pub mod csv;
pub mod html;
pub mod xlsx;
pub mod xml;

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use chrono::{DateTime, Utc};

use crate::error::{Error, Result};
use crate::models::UserRecord;

pub const FILENAME_PREFIX: &str = "tiktok_users";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Json,
    Csv,
    Xlsx,
    Html,
    Xml,
}

impl ExportFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Json => "json",
            ExportFormat::Csv => "csv",
            ExportFormat::Xlsx => "xlsx",
            ExportFormat::Html => "html",
            ExportFormat::Xml => "xml",
        }
    }
}

impl FromStr for ExportFormat {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "json" => Ok(ExportFormat::Json),
            "csv" => Ok(ExportFormat::Csv),
            "xlsx" => Ok(ExportFormat::Xlsx),
            "html" => Ok(ExportFormat::Html),
            "xml" => Ok(ExportFormat::Xml),
            _ => Err(Error::UnsupportedFormat(s.to_string())),
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.extension())
    }
}

/// `<prefix>_<YYYYmmdd_HHMMSS>` in UTC.
pub fn timestamped_filename(prefix: &str, now: DateTime<Utc>) -> String {
    format!("{}_{}", prefix, now.format("%Y%m%d_%H%M%S"))
}

/// Render records in the given format without touching the filesystem.
pub fn render(records: &[UserRecord], format: ExportFormat) -> Result<Vec<u8>> {
    match format {
        ExportFormat::Json => Ok(serde_json::to_vec_pretty(records)?),
        ExportFormat::Csv => Ok(csv::render(records).into_bytes()),
        ExportFormat::Html => Ok(html::render(records).into_bytes()),
        ExportFormat::Xml => Ok(xml::render(records).into_bytes()),
        ExportFormat::Xlsx => xlsx::render(records),
    }
}

#[derive(Debug, Default)]
pub struct DatasetExporter;

impl DatasetExporter {
    pub fn new() -> Self {
        Self
    }

    /// Write `records` to `<output_dir>/<base_filename>.<ext>` and return the absolute path.
    pub fn export(
        &self,
        records: &[UserRecord],
        format: ExportFormat,
        output_dir: &Path,
        base_filename: &str,
    ) -> Result<PathBuf> {
        let output_dir = std::path::absolute(output_dir)?;
        std::fs::create_dir_all(&output_dir).map_err(|source| Error::Export {
            path: output_dir.clone(),
            source,
        })?;

        let path = output_dir.join(format!("{}.{}", base_filename, format.extension()));
        tracing::info!(
            "Exporting {} records to {} ({})",
            records.len(),
            path.display(),
            format
        );

        let bytes = render(records, format)?;
        std::fs::write(&path, bytes).map_err(|source| Error::Export {
            path: path.clone(),
            source,
        })?;

        Ok(path)
    }
}

/// Escape text for HTML and XML bodies and attribute values.
///
/// Control characters XML 1.0 cannot carry are dropped.
pub(crate) fn escape_markup(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&apos;"),
            '\t' | '\n' | '\r' => escaped.push(c),
            c if c.is_control() => {}
            c => escaped.push(c),
        }
    }
    escaped
}
