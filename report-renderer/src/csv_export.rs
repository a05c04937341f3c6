//! CSV export of the filtered roster.
//!
//! Header is the selected column labels in canonical order (every column
//! when nothing is selected). Every filtered row is written, fields are
//! quoted only when needed, and records end in CRLF.

use std::io::Write;

use csv::{QuoteStyle, Terminator, WriterBuilder};
use report_core::roster::{ColumnSelection, RosterProvider};

use crate::error::{RenderError, RenderResult};

/// Write the roster as CSV to `writer`.
///
/// # Errors
///
/// Returns an error if writing fails.
pub fn write_csv<W: Write>(
    writer: W,
    rows: &[RosterProvider],
    selection: &ColumnSelection,
) -> RenderResult<()> {
    let columns = selection.effective_columns();
    let mut out = WriterBuilder::new()
        .terminator(Terminator::CRLF)
        .quote_style(QuoteStyle::Necessary)
        .from_writer(writer);

    out.write_record(columns.iter().map(|c| c.label()))?;
    for row in rows {
        out.write_record(columns.iter().map(|c| row.cell(*c)))?;
    }
    out.flush()?;

    tracing::debug!("Wrote CSV with {} columns and {} rows", columns.len(), rows.len());
    Ok(())
}

/// Render the roster as CSV bytes.
///
/// # Errors
///
/// Returns an error if encoding fails.
pub fn export_csv(rows: &[RosterProvider], selection: &ColumnSelection) -> RenderResult<Vec<u8>> {
    let mut buf = Vec::new();
    write_csv(&mut buf, rows, selection)?;
    Ok(buf)
}

/// Render the roster as a CSV string.
///
/// # Errors
///
/// Returns an error if encoding fails.
pub fn export_csv_string(rows: &[RosterProvider], selection: &ColumnSelection) -> RenderResult<String> {
    String::from_utf8(export_csv(rows, selection)?)
        .map_err(|e| RenderError::Export(format!("CSV is not valid UTF-8: {e}")))
}
