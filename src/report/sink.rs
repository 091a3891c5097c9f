use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use log::info;

/// UTF-8 byte order mark, prepended so spreadsheet tools open the export
/// with the right encoding.
const UTF8_BOM: &str = "\u{feff}";

/// Download filename for a finished report.
pub fn suggested_filename(subject: &str, date: NaiveDate) -> String {
    format!("observation-log_{}_{}.txt", subject, date.format("%Y-%m-%d"))
}

/// Destination for a finished report. The report text is complete by the
/// time it reaches a sink; delivery failures are the sink's own concern and
/// never feed back into session data.
pub trait ReportSink {
    fn deliver(&mut self, report: &str, filename: &str) -> Result<()>;
}

/// Writes the report as BOM-prefixed UTF-8 into a directory.
pub struct FileSink {
    dir: PathBuf,
}

impl FileSink {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }
}

impl ReportSink for FileSink {
    fn deliver(&mut self, report: &str, filename: &str) -> Result<()> {
        let path = self.dir.join(filename);
        let mut contents = String::with_capacity(UTF8_BOM.len() + report.len());
        contents.push_str(UTF8_BOM);
        contents.push_str(report);
        fs::write(&path, contents)
            .with_context(|| format!("failed to write report to {}", path.display()))?;
        info!("report written to {}", path.display());
        Ok(())
    }
}

/// Keeps delivered reports in memory. Stands in for the clipboard in tests
/// and headless use.
#[derive(Default)]
pub struct MemorySink {
    pub delivered: Vec<String>,
}

impl ReportSink for MemorySink {
    fn deliver(&mut self, report: &str, _filename: &str) -> Result<()> {
        self.delivered.push(report.to_string());
        Ok(())
    }
}
