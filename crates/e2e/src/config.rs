//! Suite configuration from environment variables
//!
//! - `BASE_URL`: UI base URL for relative navigation
//! - `API_BASE_URL`: base URL for the API client (default Open Library)
//! - `HEADLESS`: `"true"` launches the browser headless
//! - `CI`: enables scenario retries and disables `@only`
//! - `WEBDRIVER_URL`: attach to an already-running WebDriver server instead
//!   of spawning chromedriver

use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_API_BASE_URL: &str = "https://openlibrary.org";

/// Retries applied per failed scenario when running under CI.
pub const CI_RETRIES: usize = 2;

#[derive(Debug, Clone)]
pub struct SuiteConfig {
    /// UI base URL; relative navigation fails without it.
    pub base_url: Option<String>,

    /// Base URL for the API request client.
    pub api_base_url: String,

    /// Launch the browser without a visible window.
    pub headless: bool,

    /// Running under CI: retries on, `@only` disabled.
    pub ci: bool,

    /// Existing WebDriver server to attach to, if any.
    pub webdriver_url: Option<String>,

    /// Upper bound for a whole test.
    pub test_timeout: Duration,

    /// Upper bound for a single expectation.
    pub assert_timeout: Duration,

    /// Poll interval for bounded waits.
    pub poll_interval: Duration,

    /// Directory for JSON results, HTML report, and failure screenshots.
    pub results_dir: PathBuf,
}

impl SuiteConfig {
    pub fn from_env() -> Self {
        let base_url = non_empty_env("BASE_URL");
        let api_base_url =
            non_empty_env("API_BASE_URL").unwrap_or_else(|| DEFAULT_API_BASE_URL.to_string());
        let headless = std::env::var("HEADLESS").map(|v| v == "true").unwrap_or(false);
        let ci = non_empty_env("CI").is_some();

        Self {
            base_url,
            api_base_url,
            headless,
            ci,
            webdriver_url: non_empty_env("WEBDRIVER_URL"),
            test_timeout: Duration::from_secs(60),
            assert_timeout: Duration::from_secs(10),
            poll_interval: Duration::from_millis(500),
            results_dir: PathBuf::from("test-results"),
        }
    }

    /// Scenario retries: whole-scenario reruns only, CI only.
    pub fn retries(&self) -> Option<usize> {
        self.ci.then_some(CI_RETRIES)
    }

    /// Concurrent scenarios: one at a time. Each scenario owns a full
    /// browser session; cucumber's `--concurrency` flag raises this for a
    /// local run.
    pub fn workers(&self) -> usize {
        1
    }

    pub fn screenshots_dir(&self) -> PathBuf {
        self.results_dir.join("screenshots")
    }

    pub fn json_report_path(&self) -> PathBuf {
        self.results_dir.join("cucumber_report.json")
    }
}

fn non_empty_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn runs_one_scenario_at_a_time_by_default() {
        let mut cfg = SuiteConfig::from_env();
        cfg.ci = false;
        assert_eq!(cfg.workers(), 1);
        cfg.ci = true;
        assert_eq!(cfg.workers(), 1);
    }

    #[test]
    fn ci_enables_retries() {
        let mut cfg = SuiteConfig::from_env();
        cfg.ci = true;
        assert_eq!(cfg.retries(), Some(CI_RETRIES));

        cfg.ci = false;
        assert_eq!(cfg.retries(), None);
    }
}
