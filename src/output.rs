use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::batch::BatchReport;
use crate::config::OutputConfig;
use crate::record::ProjectRecord;

/// Pretty-printed JSON array, parent directories created as needed.
pub fn write_records(path: &Path, records: &[ProjectRecord]) -> Result<()> {
    write_json(path, &records)
}

pub fn read_records(path: &Path) -> Result<Vec<ProjectRecord>> {
    let text = fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))?;
    serde_json::from_str(&text).with_context(|| format!("Malformed records in {}", path.display()))
}

fn write_json<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<()> {
    if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
        fs::create_dir_all(dir).with_context(|| format!("Failed to create {}", dir.display()))?;
    }
    let json = serde_json::to_string_pretty(value)?;
    fs::write(path, json).with_context(|| format!("Failed to write {}", path.display()))?;
    Ok(())
}

#[derive(Debug, Serialize, Deserialize)]
pub struct RunSummary {
    pub generated_at: DateTime<Utc>,
    pub attempted: usize,
    pub succeeded: usize,
    /// False when any source failed: the combined file is then partial.
    pub complete: bool,
    pub total_projects: usize,
    pub departments: Vec<DepartmentSummary>,
    pub failures: Vec<FailureSummary>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct DepartmentSummary {
    pub department: String,
    pub source: String,
    pub projects: usize,
    pub file: PathBuf,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct FailureSummary {
    pub department: String,
    pub source: String,
    pub kind: String,
    pub error: String,
}

/// Write every department file, then the combined file, then the summary.
/// Runs once, after all sources were attempted.
pub fn persist_batch(config: &OutputConfig, report: &BatchReport) -> Result<RunSummary> {
    let mut departments = Vec::with_capacity(report.outputs.len());
    for output in &report.outputs {
        let path = config.department_path(&output.department.slug);
        write_records(&path, &output.records)?;
        info!("Saved {} projects to {}", output.count(), path.display());
        departments.push(DepartmentSummary {
            department: output.department.slug.clone(),
            source: output.department.source.clone(),
            projects: output.count(),
            file: path,
        });
    }

    let combined = config.combined_path();
    write_records(&combined, &report.combined)?;
    if !report.is_complete() {
        warn!(
            "{} is partial: {} of {} sources failed",
            combined.display(),
            report.failures.len(),
            report.attempted
        );
    }

    let summary = RunSummary {
        generated_at: Utc::now(),
        attempted: report.attempted,
        succeeded: report.outputs.len(),
        complete: report.is_complete(),
        total_projects: report.combined.len(),
        departments,
        failures: report
            .failures
            .iter()
            .map(|f| FailureSummary {
                department: f.department.clone(),
                source: f.source.clone(),
                kind: f.error.kind().to_string(),
                error: f.error.to_string(),
            })
            .collect(),
    };
    write_json(&config.summary_path(), &summary)?;
    Ok(summary)
}

// ── Tests ──

#[cfg(test)]
mod tests {
    use super::*;
    use crate::batch::{Department, SourceFailure, SourceOutput};
    use crate::error::SourceError;
    use crate::record::Field;

    fn sample(dept: &str, n: usize) -> Vec<ProjectRecord> {
        (1..=n)
            .map(|i| {
                let mut r = ProjectRecord::new(dept, &format!("{}.html", dept));
                r.set(Field::ProjectTitle, format!("Project {}", i));
                r.set(Field::ProjectId, format!("{}_{}", dept, i));
                r
            })
            .collect()
    }

    #[test]
    fn records_round_trip_through_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested/chemistry_projects.json");
        let records = sample("chemistry", 2);
        write_records(&path, &records).unwrap();
        assert_eq!(read_records(&path).unwrap(), records);
    }

    #[test]
    fn on_disk_shape_is_flat_array() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.json");
        write_records(&path, &sample("physics", 1)).unwrap();
        let value: serde_json::Value = serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        let obj = value.as_array().unwrap()[0].as_object().unwrap();
        let mut keys: Vec<&str> = obj.keys().map(String::as_str).collect();
        keys.sort();
        assert_eq!(keys, vec!["department", "project_id", "project_title", "source"]);
    }

    #[test]
    fn partial_batch_is_flagged() {
        let dir = tempfile::tempdir().unwrap();
        let config = OutputConfig {
            root: dir.path().to_path_buf(),
            ..Default::default()
        };
        let records = sample("chemistry", 3);
        let report = BatchReport {
            attempted: 2,
            outputs: vec![SourceOutput {
                department: Department::resolve("chemistry.html"),
                records: records.clone(),
            }],
            failures: vec![SourceFailure {
                source: "https://x.edu/physics/".into(),
                department: "physics".into(),
                error: SourceError::unavailable("https://x.edu/physics/", "HTTP 404 Not Found"),
            }],
            combined: records.clone(),
        };

        let summary = persist_batch(&config, &report).unwrap();
        assert!(!summary.complete);
        assert_eq!(summary.succeeded, 1);
        assert_eq!(summary.total_projects, 3);
        assert_eq!(summary.failures[0].kind, "source_unavailable");

        assert_eq!(read_records(&config.department_path("chemistry")).unwrap(), records);
        assert_eq!(read_records(&config.combined_path()).unwrap(), records);
        let on_disk: RunSummary =
            serde_json::from_str(&fs::read_to_string(config.summary_path()).unwrap()).unwrap();
        assert!(!on_disk.complete);
        assert_eq!(on_disk.failures[0].department, "physics");
    }
}
