use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};

use crate::parser::ExtractOptions;

pub const DEFAULT_OUTPUT_DIR: &str = "data/json";
pub const DEFAULT_FILENAME_TEMPLATE: &str = "{department}_projects.json";
pub const DEFAULT_COMBINED_NAME: &str = "all_projects.json";
pub const SUMMARY_NAME: &str = "run_summary.json";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_MAX_RETRIES: u32 = 3;

/// Where and under which names output files land.
#[derive(Debug, Clone)]
pub struct OutputConfig {
    pub root: PathBuf,
    /// `{department}` is replaced by the department slug.
    pub filename_template: String,
    pub combined_name: String,
    pub summary_name: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        OutputConfig {
            root: PathBuf::from(DEFAULT_OUTPUT_DIR),
            filename_template: DEFAULT_FILENAME_TEMPLATE.to_string(),
            combined_name: DEFAULT_COMBINED_NAME.to_string(),
            summary_name: SUMMARY_NAME.to_string(),
        }
    }
}

impl OutputConfig {
    pub fn department_path(&self, slug: &str) -> PathBuf {
        self.root.join(self.filename_template.replace("{department}", slug))
    }

    pub fn combined_path(&self) -> PathBuf {
        self.root.join(&self.combined_name)
    }

    pub fn summary_path(&self) -> PathBuf {
        self.root.join(&self.summary_name)
    }
}

/// Everything one invocation needs, resolved from the command line.
#[derive(Debug, Clone)]
pub struct RunConfig {
    pub timeout: Duration,
    pub max_retries: u32,
    pub extract: ExtractOptions,
    pub output: OutputConfig,
}

impl Default for RunConfig {
    fn default() -> Self {
        RunConfig {
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            max_retries: DEFAULT_MAX_RETRIES,
            extract: ExtractOptions::default(),
            output: OutputConfig::default(),
        }
    }
}

/// One source per line; blank lines and `#` comments are skipped.
pub fn read_sources_file(path: &Path) -> Result<Vec<String>> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read sources file {}", path.display()))?;
    Ok(parse_sources(&text))
}

fn parse_sources(text: &str) -> Vec<String> {
    text.lines()
        .map(str::trim)
        .filter(|l| !l.is_empty() && !l.starts_with('#'))
        .map(str::to_string)
        .collect()
}

// ── Tests ──

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn template_expands_slug() {
        let cfg = OutputConfig {
            root: PathBuf::from("out"),
            ..Default::default()
        };
        assert_eq!(cfg.department_path("chemistry"), PathBuf::from("out/chemistry_projects.json"));
        assert_eq!(cfg.combined_path(), PathBuf::from("out/all_projects.json"));
    }

    #[test]
    fn sources_file_skips_comments() {
        let list = parse_sources("# ECE\nhttps://a.edu/ece/\n\n  data/chem.html  \n");
        assert_eq!(list, vec!["https://a.edu/ece/", "data/chem.html"]);
    }
}
