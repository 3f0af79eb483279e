//! CSV serialization of a [`RowSet`].

use std::path::Path;

use log::info;

use crate::extract::RowSet;

/// Errors raised while writing the output file.
#[derive(Debug, thiserror::Error)]
pub enum WriteError {
    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// CSV serialization error
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

/// Write a row set to `path`, truncating any existing file.
///
/// The output has exactly three sections: a comment line naming the source
/// container, one line of column headers, and one line per data row. The
/// field delimiter is `;` rather than `,` so that numeric data survives
/// locales using the comma as decimal separator without quoting. No cleanup
/// is attempted on a partial write.
pub fn write_csv(path: &Path, rows: &RowSet, source_label: &str) -> Result<(), WriteError> {
    let mut writer = csv::WriterBuilder::new()
        .delimiter(b';')
        // Record lengths differ between the comment line and the data rows.
        .flexible(true)
        .from_path(path)?;

    writer.write_record([format!("## Automatically generated from '{source_label}'")])?;
    writer.write_record(&rows.headers)?;
    for row in &rows.rows {
        writer.write_record(row.iter().map(|value| value.to_string()))?;
    }
    writer.flush()?;

    info!("CSV file '{}' written successfully", path.display());
    Ok(())
}
