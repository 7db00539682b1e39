//! Page Object layer
//!
//! Each page object owns a fixed set of `By` locators computed once at
//! construction. `By` is a lazy descriptor: it re-resolves against the live
//! DOM on every use, so nothing here caches a stale element handle.

pub mod calculator;
pub mod stamp_duty;

pub use calculator::CalculatorPage;
pub use stamp_duty::StampDutyPage;

use std::time::{Duration, Instant};

use serde::Deserialize;
use thirtyfour::prelude::*;
use tokio::time::sleep;
use tracing::{info, warn};

use crate::error::{E2eError, E2eResult};

/// Resolves a navigation target. Absolute URLs pass through verbatim;
/// relative paths are joined to the base URL with exactly one slash.
pub fn resolve_url(base_url: Option<&str>, path_or_url: &str) -> E2eResult<String> {
    if path_or_url.starts_with("http") {
        return Ok(path_or_url.to_string());
    }

    let base = base_url.ok_or_else(|| {
        E2eError::Config("BASE_URL is not defined and a relative path was provided".into())
    })?;

    Ok(format!(
        "{}/{}",
        base.trim_end_matches('/'),
        path_or_url.trim_start_matches('/')
    ))
}

/// One finding of the in-page accessibility audit.
#[derive(Debug, Clone, Deserialize)]
pub struct A11yViolation {
    pub id: String,
    pub description: String,
    pub targets: Vec<String>,
}

/// In-page audit covering a handful of common WCAG failures. Returns an
/// array of `{id, description, targets}` objects.
const A11Y_AUDIT_JS: &str = r#"
const violations = [];
const target = (el) => {
  let t = el.tagName.toLowerCase();
  if (el.id) t += '#' + el.id;
  else if (el.className && typeof el.className === 'string')
    t += '.' + el.className.trim().split(/\s+/).join('.');
  return t;
};
const record = (id, description, els) => {
  if (els.length) violations.push({ id, description, targets: els.map(target) });
};
record('image-alt', 'Images must have an alt attribute',
  Array.from(document.querySelectorAll('img:not([alt])')));
record('label', 'Form fields must have an associated label',
  Array.from(document.querySelectorAll('input:not([type=hidden]), select, textarea'))
    .filter((el) => !el.labels?.length && !el.getAttribute('aria-label')
      && !el.getAttribute('aria-labelledby') && !el.getAttribute('title')));
record('button-name', 'Buttons must have discernible text',
  Array.from(document.querySelectorAll('button'))
    .filter((el) => !el.textContent.trim() && !el.getAttribute('aria-label')));
record('link-name', 'Links must have discernible text',
  Array.from(document.querySelectorAll('a[href]'))
    .filter((el) => !el.textContent.trim() && !el.getAttribute('aria-label')));
if (!document.documentElement.getAttribute('lang'))
  violations.push({ id: 'html-has-lang', description: 'The html element must have a lang attribute', targets: ['html'] });
return violations;
"#;

/// Common capability set shared by every page object.
pub trait PageObject {
    fn driver(&self) -> &WebDriver;
    fn base_url(&self) -> Option<&str>;
    fn assert_timeout(&self) -> Duration;
    fn poll_interval(&self) -> Duration;

    /// Navigates to a path or full URL and waits until the DOM is parsed.
    /// Fails with a configuration error when a relative path is given and no
    /// base URL is known.
    async fn navigate_to(&self, path_or_url: &str) -> E2eResult<()> {
        let target = resolve_url(self.base_url(), path_or_url)?;
        info!("Navigating to: {target}");
        self.driver().goto(&target).await?;
        wait_for_dom_ready(self.driver(), self.assert_timeout(), self.poll_interval()).await
    }

    /// Runs the accessibility audit against the current page state and logs
    /// violations. Never fails the scenario.
    async fn run_accessibility_scan(&self) -> E2eResult<()> {
        let ret = self.driver().execute(A11Y_AUDIT_JS, vec![]).await?;
        let violations: Vec<A11yViolation> = serde_json::from_value(ret.json().clone())?;
        let url = self.driver().current_url().await?;

        if violations.is_empty() {
            info!("No accessibility violations found on {url}");
        } else {
            warn!("Accessibility violations found on {url}:");
            for violation in &violations {
                warn!(
                    "- {}: {} (targets: {})",
                    violation.id,
                    violation.description,
                    violation.targets.join(", ")
                );
            }
        }
        Ok(())
    }
}

/// Polls until `document.readyState` reports the DOM as parsed.
pub(crate) async fn wait_for_dom_ready(
    driver: &WebDriver,
    timeout: Duration,
    poll: Duration,
) -> E2eResult<()> {
    let start = Instant::now();
    loop {
        let state = driver.execute("return document.readyState;", vec![]).await?;
        if matches!(state.json().as_str(), Some("interactive") | Some("complete")) {
            return Ok(());
        }
        if start.elapsed() > timeout {
            return Err(E2eError::Timeout("DOM to finish parsing".into()));
        }
        sleep(poll).await;
    }
}

/// Resolves a locator and waits until the element is visible, bounded by
/// the assertion timeout. `what` names the expectation in failure messages.
pub(crate) async fn wait_displayed(
    driver: &WebDriver,
    by: By,
    timeout: Duration,
    poll: Duration,
    what: &str,
) -> E2eResult<WebElement> {
    let elem = driver
        .query(by)
        .wait(timeout, poll)
        .first()
        .await
        .map_err(|_| E2eError::Timeout(format!("{what} to appear")))?;

    elem.wait_until()
        .wait(timeout, poll)
        .displayed()
        .await
        .map_err(|_| E2eError::Timeout(format!("{what} to become visible")))?;

    Ok(elem)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn relative_paths_join_with_exactly_one_slash() {
        let with_trailing = resolve_url(Some("https://example.gov.au/"), "transaction/duty");
        let with_leading = resolve_url(Some("https://example.gov.au"), "/transaction/duty");
        assert_eq!(with_trailing.unwrap(), "https://example.gov.au/transaction/duty");
        assert_eq!(with_leading.unwrap(), "https://example.gov.au/transaction/duty");
    }

    #[test]
    fn absolute_urls_pass_through() {
        let url = resolve_url(None, "https://other.example/page").unwrap();
        assert_eq!(url, "https://other.example/page");
    }

    #[test]
    fn relative_path_without_base_is_a_config_error() {
        let err = resolve_url(None, "/transaction/duty").unwrap_err();
        assert!(matches!(err, E2eError::Config(_)));
    }
}
