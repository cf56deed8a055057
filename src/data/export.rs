use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};

use super::filter::FilterSelection;
use super::model::SalesTable;

/// Default file name offered by the save dialog.
pub const EXPORT_FILE_NAME: &str = "filtered_sales_data.csv";
pub const EXPORT_MIME: &str = "text/csv";

/// Serialize a table to UTF-8 CSV, header row first.
///
/// Fields are quoted only when they contain the delimiter, a quote or a line
/// break. Output is byte-identical for identical tables.
pub fn to_csv_bytes(table: &SalesTable) -> Result<Vec<u8>> {
    let mut writer = csv::WriterBuilder::new()
        .terminator(csv::Terminator::Any(b'\n'))
        .quote_style(csv::QuoteStyle::Necessary)
        .from_writer(Vec::new());
    writer
        .write_record(&table.columns)
        .context("writing CSV header")?;
    for (row_no, rec) in table.records.iter().enumerate() {
        writer
            .write_record(rec.cells.iter().map(|c| c.to_field()))
            .with_context(|| format!("writing CSV row {row_no}"))?;
    }
    writer
        .into_inner()
        .map_err(|e| anyhow::anyhow!("flushing CSV buffer: {}", e.error()))
}

/// Write an encoded export to disk.
pub fn write_export(path: &Path, bytes: &[u8]) -> Result<()> {
    std::fs::write(path, bytes).with_context(|| format!("writing {}", path.display()))?;
    log::info!("Exported {} bytes of {EXPORT_MIME} to {}", bytes.len(), path.display());
    Ok(())
}

// ---------------------------------------------------------------------------
// Export memoization
// ---------------------------------------------------------------------------

/// Encoded exports keyed by the selection that produced them.
///
/// Keys only identify a filtered view of one table, so a fresh cache goes
/// with every loaded dataset. Entries are never evicted.
#[derive(Debug, Default)]
pub struct ExportCache {
    entries: HashMap<FilterSelection, Arc<[u8]>>,
}

impl ExportCache {
    /// Return the cached CSV for `selection`, encoding `filtered` on a miss.
    pub fn get_or_encode(
        &mut self,
        selection: &FilterSelection,
        filtered: &SalesTable,
    ) -> Result<Arc<[u8]>> {
        if let Some(bytes) = self.entries.get(selection) {
            log::debug!("export cache hit ({} bytes)", bytes.len());
            return Ok(Arc::clone(bytes));
        }
        let bytes: Arc<[u8]> = to_csv_bytes(filtered)?.into();
        log::debug!(
            "export cache miss, encoded {} rows into {} bytes",
            filtered.len(),
            bytes.len()
        );
        self.entries.insert(selection.clone(), Arc::clone(&bytes));
        Ok(bytes)
    }

    /// Number of cached encodings.
    pub fn len(&self) -> usize {
        self.entries.len()
    }
}
