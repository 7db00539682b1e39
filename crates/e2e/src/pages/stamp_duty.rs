//! Page object for the Service NSW stamp duty information page

use std::time::Duration;

use thirtyfour::prelude::*;

use crate::config::SuiteConfig;
use crate::error::{E2eError, E2eResult};
use crate::pages::{wait_displayed, PageObject};

const STAMP_DUTY_PATH: &str = "/transaction/check-motor-vehicle-stamp-duty";
const EXPECTED_TITLE: &str = "Check motor vehicle stamp duty";

#[derive(Debug, Clone)]
pub struct StampDutyPage {
    driver: WebDriver,
    base_url: Option<String>,
    assert_timeout: Duration,
    poll_interval: Duration,

    page_title: By,
    check_online_btn: By,
}

impl StampDutyPage {
    pub fn new(driver: WebDriver, config: &SuiteConfig) -> Self {
        Self {
            driver,
            base_url: config.base_url.clone(),
            assert_timeout: config.assert_timeout,
            poll_interval: config.poll_interval,
            page_title: By::Css("#page-title"),
            check_online_btn: By::Css(r#".cta__action a[aria-label^="Check online"]"#),
        }
    }

    /// Opens the stamp duty transaction page by its fixed relative path.
    pub async fn open(&self) -> E2eResult<()> {
        self.navigate_to(STAMP_DUTY_PATH).await
    }

    /// Asserts the page title is visible and carries the expected heading.
    pub async fn verify_page_title(&self) -> E2eResult<()> {
        let title = wait_displayed(
            &self.driver,
            self.page_title.clone(),
            self.assert_timeout,
            self.poll_interval,
            "stamp duty page title",
        )
        .await?;

        let text = title.text().await?;
        if !text.contains(EXPECTED_TITLE) {
            return Err(E2eError::assertion(format!(
                "page title '{text}' does not contain '{EXPECTED_TITLE}'"
            )));
        }
        Ok(())
    }

    /// Clicks the "Check online" call-to-action once it is visible.
    pub async fn click_check_online(&self) -> E2eResult<()> {
        let button = wait_displayed(
            &self.driver,
            self.check_online_btn.clone(),
            self.assert_timeout,
            self.poll_interval,
            "Check online button",
        )
        .await?;
        button.click().await?;
        Ok(())
    }
}

impl PageObject for StampDutyPage {
    fn driver(&self) -> &WebDriver {
        &self.driver
    }

    fn base_url(&self) -> Option<&str> {
        self.base_url.as_deref()
    }

    fn assert_timeout(&self) -> Duration {
        self.assert_timeout
    }

    fn poll_interval(&self) -> Duration {
        self.poll_interval
    }
}
