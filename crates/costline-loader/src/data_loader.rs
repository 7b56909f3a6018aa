//! Data loader for gzip-compressed cost and usage reports
//!
//! This module is the row source in front of the store: it decompresses the
//! report, splits each line on commas, resolves the header, and feeds decoded
//! line items into a [`Report`]. Quoted fields are not supported; the report
//! format this reads never quotes.
//!
//! # Examples
//!
//! ```no_run
//! use costline_loader::data_loader::{ErrorPolicy, ReportLoader};
//!
//! # async fn example() -> costline_core::Result<()> {
//! let loaded = ReportLoader::new()
//!     .with_policy(ErrorPolicy::Skip)
//!     .load_path("cur-2020-05.csv.gz")
//!     .await?;
//!
//! println!(
//!     "{} line items, {} duplicates",
//!     loaded.report.len(),
//!     loaded.summary.duplicates
//! );
//! # Ok(())
//! # }
//! ```

use costline_core::decoder::{HeaderIndex, LineItemDecoder};
use costline_core::diagnostics::Diagnostic;
use costline_core::error::{CostlineError, Result};
use costline_core::identity::IdentityHasher;
use costline_core::report::{IngestOutcome, Report};
use flate2::read::GzDecoder;
use indicatif::{ProgressBar, ProgressStyle};
use serde::Serialize;
use std::io::{BufRead, BufReader};
use std::path::Path;
use tracing::{debug, info};

/// What to do with a row that fails to decode
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ErrorPolicy {
    /// Stop loading and return the error
    #[default]
    Abort,
    /// Record a `SkippedRow` diagnostic and continue
    Skip,
}

/// Counters and diagnostics collected while loading
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct LoadSummary {
    /// Data rows read, excluding the header and blank lines
    pub rows_read: usize,
    /// Line items stored
    pub inserted: usize,
    /// Rows dropped as duplicates
    pub duplicates: usize,
    /// Rows skipped under [`ErrorPolicy::Skip`]
    pub skipped: usize,
    /// Every duplicate and skip, in input order
    pub diagnostics: Vec<Diagnostic>,
}

/// A populated report and how it was loaded
#[derive(Debug, Clone)]
pub struct LoadedReport {
    pub report: Report,
    pub summary: LoadSummary,
}

/// Loads reports into the time-indexed store
#[derive(Debug, Clone, Default)]
pub struct ReportLoader {
    /// Identity hash for line-item ids
    hasher: IdentityHasher,
    /// Row failure handling
    policy: ErrorPolicy,
    /// Whether to show a progress spinner
    show_progress: bool,
}

impl ReportLoader {
    /// Create a loader with the default hash and abort-on-error policy
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the identity hash
    pub fn with_hasher(mut self, hasher: IdentityHasher) -> Self {
        self.hasher = hasher;
        self
    }

    /// Set the row failure policy
    pub fn with_policy(mut self, policy: ErrorPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Enable or disable the progress spinner
    pub fn with_progress(mut self, show_progress: bool) -> Self {
        self.show_progress = show_progress;
        self
    }

    /// Load a gzip-compressed report from disk
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or decompressed, if the
    /// header is missing or incomplete, or if a row fails to decode under
    /// [`ErrorPolicy::Abort`].
    pub async fn load_path(&self, path: impl AsRef<Path>) -> Result<LoadedReport> {
        let path = path.as_ref();
        let compressed = tokio::fs::read(path).await?;
        debug!(
            "Read {} compressed bytes from {}",
            compressed.len(),
            path.display()
        );

        let reader = BufReader::new(GzDecoder::new(compressed.as_slice()));
        let loaded = self.load_from_reader(reader)?;
        info!(
            "Loaded {} line items from {} ({} distinct start times)",
            loaded.report.len(),
            path.display(),
            loaded.report.bucket_count()
        );
        Ok(loaded)
    }

    /// Load plain CSV text, header row first
    pub fn load_from_reader<R: BufRead>(&self, reader: R) -> Result<LoadedReport> {
        let mut lines = reader.lines();

        let header_line = lines.next().ok_or(CostlineError::EmptyReport)??;
        let header_line = trim_line_ending(&header_line);
        let header: Vec<&str> = split_row(header_line);
        let decoder = LineItemDecoder::new(HeaderIndex::from_header(&header)?, self.hasher);
        debug!("Header has {} columns", header.len());

        let progress = self.progress_bar();
        let mut report = Report::new();
        let mut summary = LoadSummary::default();

        // Header is line 1
        for (idx, line) in lines.enumerate() {
            let line_number = idx + 2;
            let line = line?;
            let line = trim_line_ending(&line);
            if line.is_empty() {
                continue;
            }
            summary.rows_read += 1;

            let item = match decoder.decode(&split_row(line)) {
                Ok(item) => item,
                Err(e) => match self.policy {
                    ErrorPolicy::Abort => {
                        if let Some(pb) = &progress {
                            pb.abandon();
                        }
                        return Err(e.at_line(line_number));
                    }
                    ErrorPolicy::Skip => {
                        let diagnostic = Diagnostic::SkippedRow {
                            line: line_number,
                            reason: e.to_string(),
                        };
                        diagnostic.log();
                        summary.skipped += 1;
                        summary.diagnostics.push(diagnostic);
                        continue;
                    }
                },
            };

            match report.ingest(item) {
                IngestOutcome::Inserted => summary.inserted += 1,
                IngestOutcome::Duplicate(diagnostic) => {
                    summary.duplicates += 1;
                    summary.diagnostics.push(diagnostic);
                }
            }

            if let Some(pb) = &progress {
                pb.inc(1);
            }
        }

        if let Some(pb) = progress {
            pb.finish_with_message(format!("Loaded {} line items", summary.inserted));
        }

        Ok(LoadedReport { report, summary })
    }

    fn progress_bar(&self) -> Option<ProgressBar> {
        if !self.show_progress {
            return None;
        }
        let pb = ProgressBar::new_spinner();
        pb.set_style(
            ProgressStyle::default_spinner()
                .template("{spinner:.green} [{elapsed_precise}] {pos} rows {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner()),
        );
        pb.set_message("Loading report...");
        Some(pb)
    }
}

fn split_row(line: &str) -> Vec<&str> {
    line.split(',').collect()
}

fn trim_line_ending(line: &str) -> &str {
    line.strip_suffix('\r').unwrap_or(line)
}
