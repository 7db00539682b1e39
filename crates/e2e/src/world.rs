//! Shared per-scenario state
//!
//! One `ScenarioWorld` is constructed per scenario and never reused. It owns
//! the scenario's WebDriver session (the browsing-context analog: isolated
//! cookies and storage), both page objects bound to that session, and the
//! API client with the last response seen by the API steps.

use std::fmt;
use std::path::PathBuf;

use thirtyfour::{WebDriver, WindowHandle};
use tracing::{info, warn};

use crate::api::{ApiClient, ApiExchange};
use crate::config::SuiteConfig;
use crate::error::{E2eError, E2eResult};
use crate::pages::{CalculatorPage, StampDutyPage};
use crate::webdriver;

#[derive(cucumber::World)]
#[world(init = Self::new)]
pub struct ScenarioWorld {
    pub config: SuiteConfig,

    /// Taken out at teardown; page objects hold their own session handles.
    driver: Option<WebDriver>,

    pub stamp_duty: StampDutyPage,
    pub calculator: CalculatorPage,

    pub api: ApiClient,
    pub last_api: Option<ApiExchange>,

    /// Window opened by the most recent new-tab interaction.
    pub last_window: Option<WindowHandle>,
}

impl ScenarioWorld {
    /// Scenario-start hook: opens one isolated browser session against the
    /// suite's WebDriver server and binds both page objects to it. The page
    /// objects are never reconstructed mid-scenario.
    async fn new() -> anyhow::Result<Self> {
        let config = SuiteConfig::from_env();

        let driver = webdriver::new_session(webdriver::suite_server_url()?, &config).await?;
        let stamp_duty = StampDutyPage::new(driver.clone(), &config);
        let calculator = CalculatorPage::new(driver.clone(), &config);
        let api = ApiClient::new(&config)?;

        Ok(Self {
            config,
            driver: Some(driver),
            stamp_duty,
            calculator,
            api,
            last_api: None,
            last_window: None,
        })
    }

    /// The last API exchange, or a descriptive error when a step asserts
    /// before any call was made.
    pub fn last_api(&self) -> E2eResult<&ApiExchange> {
        self.last_api
            .as_ref()
            .ok_or_else(|| E2eError::NoApiData("no API call has been made in this scenario".into()))
    }

    /// Captures a screenshot of the scenario's page, named after the
    /// scenario with whitespace collapsed to underscores. WebDriver's
    /// screenshot command only covers the current viewport, not the full
    /// scroll height of the page.
    pub async fn capture_failure_screenshot(&self, scenario_name: &str) -> E2eResult<PathBuf> {
        let driver = self.driver.as_ref().ok_or_else(|| {
            E2eError::Config("no live page to screenshot for this scenario".into())
        })?;

        let png = driver.screenshot_as_png().await?;

        let dir = self.config.screenshots_dir();
        std::fs::create_dir_all(&dir)?;
        let path = dir.join(format!("{}.png", screenshot_file_stem(scenario_name)));
        std::fs::write(&path, png)?;

        info!("Saved failure screenshot to {}", path.display());
        Ok(path)
    }

    /// Scenario-end teardown. Each close is best-effort and independent; a
    /// resource that is already gone is skipped, not an error.
    pub async fn teardown(&mut self) {
        if let Some(driver) = self.driver.take() {
            if let Err(e) = driver.quit().await {
                warn!("Failed to quit WebDriver session: {e}");
            }
        }
        // The API client holds no connection state that needs closing.
        self.last_api = None;
        self.last_window = None;
    }
}

fn screenshot_file_stem(scenario_name: &str) -> String {
    scenario_name.split_whitespace().collect::<Vec<_>>().join("_")
}

impl fmt::Debug for ScenarioWorld {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ScenarioWorld")
            .field("base_url", &self.config.base_url)
            .field("api_base_url", &self.config.api_base_url)
            .field("session_open", &self.driver.is_some())
            .field("last_api", &self.last_api)
            .field("last_window", &self.last_window)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn screenshot_names_collapse_whitespace() {
        assert_eq!(
            screenshot_file_stem("Calculate stamp duty  for a vehicle"),
            "Calculate_stamp_duty_for_a_vehicle"
        );
    }
}
