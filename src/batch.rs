use std::collections::HashSet;
use std::path::Path;

use indicatif::ProgressBar;
use tracing::{info, warn};

use crate::error::SourceError;
use crate::fetch::{is_url, Fetcher};
use crate::parser::{self, ExtractOptions};
use crate::record::ProjectRecord;

/// A department as named by its source reference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Department {
    pub slug: String,
    pub source: String,
}

impl Department {
    /// URL → last path segment; file → file stem. Either way the extension is
    /// dropped, hyphens and spaces become underscores and the result is
    /// lowercased: `.../electrical-and-computer-engineering/` →
    /// `electrical_and_computer_engineering`.
    pub fn resolve(source: &str) -> Department {
        let raw = if is_url(source) {
            url::Url::parse(source)
                .ok()
                .and_then(|u| {
                    u.path_segments()
                        .and_then(|segs| segs.filter(|s| !s.is_empty()).last().map(str::to_string))
                        .or_else(|| u.host_str().map(str::to_string))
                })
                .unwrap_or_default()
        } else {
            Path::new(source)
                .file_stem()
                .map(|s| s.to_string_lossy().into_owned())
                .unwrap_or_default()
        };
        Department {
            slug: slugify(strip_extension(&raw)),
            source: source.to_string(),
        }
    }
}

fn strip_extension(segment: &str) -> &str {
    for ext in [".html", ".htm", ".php", ".aspx", ".txt"] {
        let Some(cut) = segment.len().checked_sub(ext.len()).filter(|c| *c > 0) else {
            continue;
        };
        if segment.is_char_boundary(cut) && segment[cut..].eq_ignore_ascii_case(ext) {
            return &segment[..cut];
        }
    }
    segment
}

fn slugify(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for ch in raw.trim().chars() {
        if ch.is_alphanumeric() {
            out.extend(ch.to_lowercase());
        } else if !out.ends_with('_') {
            out.push('_');
        }
    }
    let out = out.trim_matches('_').to_string();
    if out.is_empty() {
        "department".to_string()
    } else {
        out
    }
}

/// Records of one department, `project_id`s assigned.
#[derive(Debug, Clone)]
pub struct SourceOutput {
    pub department: Department,
    pub records: Vec<ProjectRecord>,
}

impl SourceOutput {
    pub fn count(&self) -> usize {
        self.records.len()
    }
}

/// A source that produced nothing, with the reason.
#[derive(Debug)]
pub struct SourceFailure {
    pub source: String,
    pub department: String,
    pub error: SourceError,
}

/// Result of a batch run. `combined` holds every successful record in input
/// order with its department-scoped id untouched.
#[derive(Debug, Default)]
pub struct BatchReport {
    pub attempted: usize,
    pub outputs: Vec<SourceOutput>,
    pub failures: Vec<SourceFailure>,
    pub combined: Vec<ProjectRecord>,
}

impl BatchReport {
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Extract one already-fetched document and number its records
/// `{slug}_1..=n` in document order.
pub fn extract_source(
    document: &str,
    department: &Department,
    options: &ExtractOptions,
) -> Result<SourceOutput, SourceError> {
    let mut records = parser::extract_document(document, &department.slug, &department.source, options);
    for (i, record) in records.iter_mut().enumerate() {
        record.project_id = Some(format!("{}_{}", department.slug, i + 1));
    }
    verify_ids(&records)?;

    if records.is_empty() {
        warn!("{}: 0 projects extracted", department.slug);
    } else {
        info!("{}: {} projects extracted", department.slug, records.len());
    }
    Ok(SourceOutput {
        department: department.clone(),
        records,
    })
}

fn verify_ids(records: &[ProjectRecord]) -> Result<(), SourceError> {
    let mut seen = HashSet::new();
    for r in records {
        let id = r
            .project_id
            .as_deref()
            .ok_or_else(|| SourceError::Internal("record without project_id".into()))?;
        if !seen.insert(id) {
            return Err(SourceError::Internal(format!("duplicate project_id {}", id)));
        }
    }
    Ok(())
}

/// Process sources one after another. A failing source is recorded and
/// skipped; the rest still run.
///
/// A source whose slug is already taken in this run gets the first free
/// `_2`, `_3`, ... suffix, checked against every slug assigned so far, so ids
/// and output files stay unique.
pub fn run_batch<F: Fetcher>(
    sources: &[String],
    fetcher: &F,
    options: &ExtractOptions,
    progress: &ProgressBar,
) -> BatchReport {
    let mut report = BatchReport {
        attempted: sources.len(),
        ..Default::default()
    };
    let mut assigned: HashSet<String> = HashSet::new();

    for source in sources {
        let mut department = Department::resolve(source);
        if assigned.contains(&department.slug) {
            let unique = (2..)
                .map(|n| format!("{}_{}", department.slug, n))
                .find(|candidate| !assigned.contains(candidate))
                .unwrap_or_default();
            warn!("Department slug {} repeats; using {}", department.slug, unique);
            department.slug = unique;
        }
        assigned.insert(department.slug.clone());
        progress.set_message(department.slug.clone());

        let result = fetcher
            .fetch(source)
            .and_then(|doc| extract_source(&doc, &department, options));
        match result {
            Ok(output) => {
                report.combined.extend(output.records.iter().cloned());
                report.outputs.push(output);
            }
            Err(error) => {
                warn!("Skipping {}: {}", source, error);
                report.failures.push(SourceFailure {
                    source: source.clone(),
                    department: department.slug,
                    error,
                });
            }
        }
        progress.inc(1);
    }

    progress.finish_and_clear();
    report
}

// ── Tests ──
