// LuckyDraw - core/import.rs
//
// Line-oriented parsing of bulk-import text into candidate participants,
// plus the pending-import draft the user edits before accepting.
// Core layer: accepts text, never touches the filesystem directly.

use crate::core::model::{IdAllocator, ImportFormat, Participant};
use crate::util::constants::IMPORT_FIELD_SEPARATORS;

/// Result of parsing one block of import text.
#[derive(Debug, Default)]
pub struct ImportResult {
    /// Candidates in input line order.
    pub candidates: Vec<Participant>,
    /// Total lines seen, including blank ones.
    pub lines_processed: usize,
    /// Lines dropped because they were blank or had an empty name field.
    pub lines_skipped: usize,
}

/// Parse raw import text under `format`.
///
/// Lines are split on `\n` and trimmed (which also drops the `\r` of CRLF
/// input). Blank lines are skipped. In [`ImportFormat::NameAndContact`] the
/// line is split on commas and tabs; field 0 is the name, field 1 (if
/// non-empty) the email, anything after is ignored. A line with no separator
/// is taken whole as the name.
///
/// Does not touch the registry. Every candidate gets a fresh id from `ids`,
/// so re-parsing the same text yields new ids.
pub fn parse_import(text: &str, format: ImportFormat, ids: &mut IdAllocator) -> ImportResult {
    let mut result = ImportResult::default();

    for line in text.split('\n') {
        result.lines_processed += 1;
        let line = line.trim();
        if line.is_empty() {
            result.lines_skipped += 1;
            continue;
        }

        let (name, email) = match format {
            ImportFormat::NamesOnly => (line, None),
            ImportFormat::NameAndContact => {
                let mut fields = line.split(&IMPORT_FIELD_SEPARATORS[..]).map(str::trim);
                let name = fields.next().unwrap_or_default();
                (name, fields.next())
            }
        };

        match Participant::new(ids.next_id(), name, email) {
            Some(candidate) => result.candidates.push(candidate),
            None => result.lines_skipped += 1,
        }
    }

    tracing::debug!(
        format = %format,
        candidates = result.candidates.len(),
        lines = result.lines_processed,
        skipped = result.lines_skipped,
        "Import text parsed"
    );
    result
}

// =============================================================================
// Pending import draft
// =============================================================================

/// Text and format the user is editing, with the preview re-derived on
/// every change.
#[derive(Debug, Default)]
pub struct ImportDraft {
    text: String,
    format: ImportFormat,
    preview: Vec<Participant>,
}

impl ImportDraft {
    pub fn new(format: ImportFormat) -> Self {
        Self {
            format,
            ..Default::default()
        }
    }

    /// Replace the raw text and re-parse.
    pub fn set_text(&mut self, text: &str, ids: &mut IdAllocator) {
        self.text = text.to_string();
        self.reparse(ids);
    }

    /// Switch format and re-parse the current text.
    pub fn set_format(&mut self, format: ImportFormat, ids: &mut IdAllocator) {
        self.format = format;
        self.reparse(ids);
    }

    fn reparse(&mut self, ids: &mut IdAllocator) {
        self.preview = if self.text.is_empty() {
            Vec::new()
        } else {
            parse_import(&self.text, self.format, ids).candidates
        };
    }

    /// Take the preview for acceptance and clear the text.
    /// The selected format is kept for the next import.
    pub fn take_preview(&mut self) -> Vec<Participant> {
        self.text.clear();
        std::mem::take(&mut self.preview)
    }

    /// Discard text and preview.
    pub fn clear(&mut self) {
        self.text.clear();
        self.preview.clear();
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn format(&self) -> ImportFormat {
        self.format
    }

    pub fn preview(&self) -> &[Participant] {
        &self.preview
    }

    pub fn len(&self) -> usize {
        self.preview.len()
    }

    pub fn is_empty(&self) -> bool {
        self.preview.is_empty()
    }

    /// First `limit` preview rows plus the count of rows not shown.
    pub fn display_page(&self, limit: usize) -> (&[Participant], usize) {
        let shown = self.preview.len().min(limit);
        (&self.preview[..shown], self.preview.len() - shown)
    }
}
