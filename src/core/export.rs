// LuckyDraw - core/export.rs
//
// CSV and JSON export of the draw history.
// Core layer: writes to any Write trait object.

use crate::core::model::Winner;
use crate::util::error::ExportError;
use std::io::Write;
use std::path::Path;

/// Export winners to CSV, newest first.
///
/// Writes: rank, name, email, won_at (RFC 3339). Rank 1 is the newest win.
pub fn export_csv<'a, W: Write>(
    winners: impl IntoIterator<Item = &'a Winner>,
    writer: W,
    export_path: &Path,
) -> Result<usize, ExportError> {
    let csv_err = |e| ExportError::Csv {
        path: export_path.to_path_buf(),
        source: e,
    };
    let mut csv_writer = csv::Writer::from_writer(writer);

    csv_writer
        .write_record(["rank", "name", "email", "won_at"])
        .map_err(csv_err)?;

    let mut count = 0;
    for winner in winners {
        count += 1;
        let rank = count.to_string();
        let won_at = winner.timestamp.to_rfc3339();
        csv_writer
            .write_record([
                rank.as_str(),
                winner.participant.name.as_str(),
                winner.participant.email.as_deref().unwrap_or(""),
                won_at.as_str(),
            ])
            .map_err(csv_err)?;
    }

    csv_writer.flush().map_err(|e| ExportError::Io {
        path: export_path.to_path_buf(),
        source: e,
    })?;

    tracing::debug!(count, path = %export_path.display(), "History exported as CSV");
    Ok(count)
}

/// Export winners to JSON (array of objects, newest first).
pub fn export_json<'a, W: Write>(
    winners: impl IntoIterator<Item = &'a Winner>,
    writer: W,
    export_path: &Path,
) -> Result<usize, ExportError> {
    let winners: Vec<&Winner> = winners.into_iter().collect();
    serde_json::to_writer_pretty(writer, &winners).map_err(|e| ExportError::Json {
        path: export_path.to_path_buf(),
        source: e,
    })?;
    tracing::debug!(count = winners.len(), path = %export_path.display(), "History exported as JSON");
    Ok(winners.len())
}
