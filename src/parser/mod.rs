pub mod extract;
pub mod fields;
pub mod segment;
pub mod tokens;

use tracing::{debug, warn};

use crate::record::ProjectRecord;
use extract::ExtractContext;
use segment::Layout;
use tokens::Document;

/// What to do with labels that match no canonical field.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum UnknownLabels {
    /// Keep the value under the sanitized label text.
    #[default]
    Retain,
    Drop,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ExtractOptions {
    /// Force one page layout instead of auto-detecting.
    pub layout: Option<Layout>,
    pub unknown_labels: UnknownLabels,
}

/// Two-pass pipeline: document → blocks → records. Records come back in
/// document order without `project_id`s.
pub fn extract_document(
    raw: &str,
    department: &str,
    source: &str,
    options: &ExtractOptions,
) -> Vec<ProjectRecord> {
    let doc = Document::parse(raw);
    let blocks = segment::segment(&doc, options.layout);
    if blocks.is_empty() {
        warn!("No project blocks found in {}", source);
        return Vec::new();
    }

    let ctx = ExtractContext {
        department,
        source,
        unknown_labels: options.unknown_labels,
    };
    let records: Vec<ProjectRecord> = blocks.iter().map(|b| extract::extract_record(b, &ctx)).collect();
    debug!(
        "Extracted {} records from {} ({} without a title)",
        records.len(),
        source,
        records.iter().filter(|r| r.project_title.is_none()).count()
    );
    records
}

// ── Tests ──
