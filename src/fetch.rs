use std::path::Path;
use std::time::Duration;

use anyhow::Result;
use reqwest::blocking::Client;
use reqwest::StatusCode;
use tracing::{info, warn};

use crate::error::SourceError;

const BASE_BACKOFF_MS: u64 = 2000;
const USER_AGENT: &str = concat!("research_scraper/", env!("CARGO_PKG_VERSION"));

/// Turns a source reference into document text.
pub trait Fetcher {
    fn fetch(&self, source: &str) -> Result<String, SourceError>;
}

pub fn is_url(source: &str) -> bool {
    source.starts_with("http://") || source.starts_with("https://")
}

/// Fetches URLs over HTTP and reads everything else from disk.
pub struct SourceFetcher {
    client: Client,
    timeout: Duration,
    max_retries: u32,
}

impl SourceFetcher {
    pub fn new(timeout: Duration, max_retries: u32) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .build()?;
        Ok(SourceFetcher {
            client,
            timeout,
            max_retries,
        })
    }

    /// The first request plus every retry.
    fn total_attempts(&self) -> u32 {
        self.max_retries + 1
    }

    fn fetch_url(&self, url: &str) -> Result<String, SourceError> {
        let attempts = self.total_attempts();
        for attempt in 0..attempts {
            info!("Fetching {}", url);
            let response = self.client.get(url).send().map_err(|e| {
                if e.is_timeout() {
                    SourceError::unavailable(url, format!("timed out after {}s", self.timeout.as_secs()))
                } else {
                    SourceError::unavailable(url, e)
                }
            })?;

            let status = response.status();
            if status.is_success() {
                return response.text().map_err(|e| SourceError::unavailable(url, e));
            }
            if !should_retry(status) || attempt + 1 == attempts {
                return Err(SourceError::unavailable(url, format!("HTTP {}", status)));
            }

            let backoff = Duration::from_millis(BASE_BACKOFF_MS * 2u64.pow(attempt));
            warn!(
                "HTTP {} on {} (attempt {}/{}), backing off {:.1}s",
                status,
                url,
                attempt + 1,
                attempts,
                backoff.as_secs_f64()
            );
            std::thread::sleep(backoff);
        }
        Err(SourceError::unavailable(url, "retries exhausted"))
    }
}

impl Fetcher for SourceFetcher {
    fn fetch(&self, source: &str) -> Result<String, SourceError> {
        if is_url(source) {
            self.fetch_url(source)
        } else {
            read_file(Path::new(source))
        }
    }
}

fn should_retry(status: StatusCode) -> bool {
    status == StatusCode::TOO_MANY_REQUESTS || status.is_server_error()
}

fn read_file(path: &Path) -> Result<String, SourceError> {
    let bytes = std::fs::read(path).map_err(|e| SourceError::unavailable(&path.display().to_string(), e))?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

// ── Tests ──

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn url_detection() {
        assert!(is_url("https://www.eng.ufl.edu/research/chemistry/"));
        assert!(is_url("http://localhost/x"));
        assert!(!is_url("data/html/chemistry.html"));
        assert!(!is_url("httpdocs/page.html"));
    }

    #[test]
    fn retry_policy() {
        assert!(should_retry(StatusCode::TOO_MANY_REQUESTS));
        assert!(should_retry(StatusCode::BAD_GATEWAY));
        assert!(!should_retry(StatusCode::NOT_FOUND));
    }

    #[test]
    fn retries_come_on_top_of_the_first_attempt() {
        let fetcher = SourceFetcher::new(Duration::from_secs(1), 3).unwrap();
        assert_eq!(fetcher.total_attempts(), 4);
        let fetcher = SourceFetcher::new(Duration::from_secs(1), 0).unwrap();
        assert_eq!(fetcher.total_attempts(), 1);
    }

    #[test]
    fn missing_file_is_unavailable() {
        let fetcher = SourceFetcher::new(Duration::from_secs(1), 0).unwrap();
        let err = fetcher.fetch("tests/fixtures/does_not_exist.html").unwrap_err();
        assert_eq!(err.kind(), "source_unavailable");
    }

    #[test]
    fn reads_local_fixture() {
        let fetcher = SourceFetcher::new(Duration::from_secs(1), 0).unwrap();
        let text = fetcher.fetch("tests/fixtures/biology.txt").unwrap();
        assert!(text.contains("Coral Reef Genomics"));
    }
}
