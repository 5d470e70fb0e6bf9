use std::io::Write;

use crate::core::types::ErrorCode;
use crate::core::worklist::WorklistRow;

/// Classification of one worklist row
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RowOutcome {
    pub code: ErrorCode,
    /// Diagnostic summary, only written with `--details`
    pub details: Option<String>,
}

impl RowOutcome {
    #[must_use]
    pub fn ok() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn fault(code: ErrorCode, details: Option<String>) -> Self {
        Self { code, details }
    }

    /// Worst of several faults found in the same row.
    ///
    /// Ties keep the first outcome, so its details win.
    #[must_use]
    pub fn worst(outcomes: impl IntoIterator<Item = Self>) -> Self {
        outcomes
            .into_iter()
            .reduce(|worst, next| if next.code > worst.code { next } else { worst })
            .unwrap_or_default()
    }
}

/// Writes one tab-delimited line per faulting row and keeps the running
/// maximum severity over every row recorded.
///
/// Line layout: `code  merge_id  alignment_path  json_path [details]`.
pub struct Report<W: Write> {
    writer: csv::Writer<W>,
    details: bool,
    max_code: ErrorCode,
    rows: usize,
    faults: usize,
}

impl<W: Write> Report<W> {
    pub fn new(writer: W, details: bool) -> Self {
        let writer = csv::WriterBuilder::new()
            .delimiter(b'\t')
            .quote_style(csv::QuoteStyle::Never)
            .flexible(true)
            .has_headers(false)
            .from_writer(writer);
        Self {
            writer,
            details,
            max_code: ErrorCode::Ok,
            rows: 0,
            faults: 0,
        }
    }

    /// Record a row's outcome; rows without a fault write nothing.
    ///
    /// # Errors
    ///
    /// Returns an error if the output line cannot be written.
    pub fn record(&mut self, row: &WorklistRow, outcome: &RowOutcome) -> csv::Result<()> {
        self.rows += 1;
        self.max_code = self.max_code.max(outcome.code);
        if outcome.code.is_ok() {
            return Ok(());
        }
        self.faults += 1;

        let code = outcome.code.to_string();
        let alignment = row.alignment_path.to_string_lossy();
        let json = row.json_path.to_string_lossy();
        let mut record = vec![
            code.as_str(),
            row.merge_id.as_str(),
            alignment.as_ref(),
            json.as_ref(),
        ];
        if self.details {
            record.push(outcome.details.as_deref().unwrap_or(""));
        }
        self.writer.write_record(&record)?;
        // Lines appear as rows finish
        self.writer.flush()?;
        Ok(())
    }

    #[must_use]
    pub fn max_code(&self) -> ErrorCode {
        self.max_code
    }

    #[must_use]
    pub fn rows(&self) -> usize {
        self.rows
    }

    #[must_use]
    pub fn faults(&self) -> usize {
        self.faults
    }

    /// Flush the output and return the maximum severity seen.
    ///
    /// # Errors
    ///
    /// Returns an error if the output cannot be flushed.
    pub fn finish(mut self) -> std::io::Result<ErrorCode> {
        self.writer.flush()?;
        Ok(self.max_code)
    }
}
