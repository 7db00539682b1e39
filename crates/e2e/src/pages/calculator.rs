//! Page object for the Revenue NSW motor vehicle registration duty calculator
//!
//! Covers form interaction, the results modal, and its currency assertions.

use std::collections::HashSet;
use std::time::{Duration, Instant};

use thirtyfour::prelude::*;
use tokio::time::sleep;
use tracing::debug;

use crate::config::SuiteConfig;
use crate::currency::{is_currency_formatted, parse_currency};
use crate::error::{E2eError, E2eResult};
use crate::pages::{wait_displayed, wait_for_dom_ready, PageObject};

const CALCULATOR_DOMAIN: &str = "revenue.nsw.gov.au";
const HELP_LINK_FRAGMENT: &str = "motor-vehicle-duty";

#[derive(Debug, Clone)]
pub struct CalculatorPage {
    driver: WebDriver,
    base_url: Option<String>,
    assert_timeout: Duration,
    poll_interval: Duration,

    page_title: By,
    calculator_heading: By,
    passenger_legend: By,
    passenger_link: By,
    purchase_price_input: By,
    calculate_btn: By,
    reset_btn: By,
    refresh_btn: By,
    modal: By,
    modal_title: By,
    modal_subtitle: By,
    modal_print_icon: By,
    modal_close_btn: By,
}

impl CalculatorPage {
    pub fn new(driver: WebDriver, config: &SuiteConfig) -> Self {
        Self {
            driver,
            base_url: config.base_url.clone(),
            assert_timeout: config.assert_timeout,
            poll_interval: config.poll_interval,
            page_title: By::XPath("//h1[contains(normalize-space(.), 'Revenue NSW calculators')]"),
            calculator_heading: By::XPath(
                "//h1[contains(normalize-space(.), 'Motor vehicle registration duty calculator')] \
                 | //h2[contains(normalize-space(.), 'Motor vehicle registration duty calculator')]",
            ),
            passenger_legend: By::Css("legend"),
            passenger_link: By::XPath("//legend//a[contains(normalize-space(.), 'passenger vehicle')]"),
            purchase_price_input: By::XPath(
                "//input[@id = //label[contains(normalize-space(.), 'Purchase price or value')]/@for]",
            ),
            calculate_btn: By::XPath(
                "//button[normalize-space()='Calculate'] | //input[@value='Calculate']",
            ),
            reset_btn: By::XPath("//button[normalize-space()='Reset'] | //input[@value='Reset']"),
            refresh_btn: By::XPath(
                "//button[normalize-space()='Refresh'] | //input[@value='Refresh']",
            ),
            modal: By::Css(".modal-content"),
            modal_title: By::Css(".modal-content .modal-title"),
            modal_subtitle: By::XPath(
                "//*[contains(@class, 'modal-content')]//*[self::h1 or self::h2 or self::h3]\
                 [contains(normalize-space(.), 'Motor vehicle registration')]",
            ),
            modal_print_icon: By::Css(".modal-content .print-icon"),
            modal_close_btn: By::XPath(
                "//*[contains(@class, 'modal-footer')]//button[contains(normalize-space(.), 'Close')]",
            ),
        }
    }

    /// Locator for one of the yes/no passenger vehicle options by its label.
    fn passenger_option(&self, label: &str) -> By {
        let xpath = format!("//*[@id='passenger']//label[normalize-space()='{label}']");
        By::XPath(&xpath)
    }

    /// Asserts the current URL sits on the calculator domain under the
    /// expected partial path, polling until the navigation settles.
    pub async fn verify_page_url(&self, partial_path: &str) -> E2eResult<()> {
        let start = Instant::now();
        loop {
            let url = self.driver.current_url().await?;
            let url = url.as_str();
            if url.contains(CALCULATOR_DOMAIN) && url.contains(partial_path) {
                return Ok(());
            }
            if start.elapsed() > self.assert_timeout {
                return Err(E2eError::assertion(format!(
                    "URL '{url}' does not match {CALCULATOR_DOMAIN}{partial_path}"
                )));
            }
            sleep(self.poll_interval).await;
        }
    }

    /// Asserts the fixed set of required controls and labels is visible.
    pub async fn verify_page_elements(&self) -> E2eResult<()> {
        self.wait_visible(&self.page_title, "Revenue NSW calculators title").await?;
        self.wait_visible(&self.calculator_heading, "duty calculator heading").await?;
        self.verify_passenger_legend_details().await?;
        self.wait_visible(&self.passenger_option("Yes"), "passenger 'Yes' option").await?;
        self.wait_visible(&self.passenger_option("No"), "passenger 'No' option").await?;
        self.wait_visible(&self.purchase_price_input, "purchase price input").await?;
        self.wait_visible(&self.calculate_btn, "Calculate button").await?;
        self.wait_visible(&self.reset_btn, "Reset button").await?;
        Ok(())
    }

    /// Verifies the passenger question legend and its embedded help link.
    pub async fn verify_passenger_legend_details(&self) -> E2eResult<()> {
        let legend = self
            .wait_visible(&self.passenger_legend, "passenger vehicle legend")
            .await?;
        let text = legend.text().await?;
        for expected in [
            "Is this registration for a passenger vehicle?",
            "See the definition of a passenger vehicle",
        ] {
            if !text.contains(expected) {
                return Err(E2eError::assertion(format!(
                    "legend text '{text}' does not contain '{expected}'"
                )));
            }
        }

        let link = self.driver.find(self.passenger_link.clone()).await?;
        let href = link.attr("href").await?.unwrap_or_default();
        if !href.contains(HELP_LINK_FRAGMENT) {
            return Err(E2eError::assertion(format!(
                "help link href '{href}' does not contain '{HELP_LINK_FRAGMENT}'"
            )));
        }
        Ok(())
    }

    /// Selects the yes/no option for the passenger vehicle question,
    /// scrolling it into view and falling back to a script click when the
    /// control is not normally clickable.
    pub async fn select_passenger_vehicle(&self, is_passenger: bool) -> E2eResult<()> {
        let label = if is_passenger { "Yes" } else { "No" };
        let option = self
            .wait_visible(&self.passenger_option(label), "passenger vehicle option")
            .await?;

        option.scroll_into_view().await?;
        if let Err(e) = option.click().await {
            debug!("Native click on '{label}' failed ({e}), forcing script click");
            self.driver
                .execute("arguments[0].click();", vec![option.to_json()?])
                .await?;
        }
        Ok(())
    }

    pub async fn enter_purchase_price(&self, amount: &str) -> E2eResult<()> {
        let input = self
            .wait_visible(&self.purchase_price_input, "purchase price input")
            .await?;
        input.clear().await?;
        input.send_keys(amount).await?;
        Ok(())
    }

    pub async fn click_calculate(&self) -> E2eResult<()> {
        let button = self.wait_visible(&self.calculate_btn, "Calculate button").await?;
        button.click().await?;
        Ok(())
    }

    /// Resets the form and asserts the purchase price input becomes empty.
    pub async fn reset_form(&self) -> E2eResult<()> {
        let button = self.wait_visible(&self.reset_btn, "Reset button").await?;
        button.click().await?;
        self.verify_price_input_empty().await
    }

    /// Polls until the purchase price input is empty.
    pub async fn verify_price_input_empty(&self) -> E2eResult<()> {
        let input = self
            .wait_visible(&self.purchase_price_input, "purchase price input")
            .await?;

        let start = Instant::now();
        loop {
            let value = input.prop("value").await?.unwrap_or_default();
            if value.is_empty() {
                return Ok(());
            }
            if start.elapsed() > self.assert_timeout {
                return Err(E2eError::assertion(format!(
                    "purchase price input to be empty, but it holds '{value}'"
                )));
            }
            sleep(self.poll_interval).await;
        }
    }

    /// Clicks the calculator's own Refresh control and asserts the URL is
    /// unchanged once the reload completes.
    pub async fn refresh_page(&self) -> E2eResult<()> {
        let before = self.driver.current_url().await?;
        let button = self.wait_visible(&self.refresh_btn, "Refresh button").await?;
        button.click().await?;
        wait_for_dom_ready(&self.driver, self.assert_timeout, self.poll_interval).await?;

        let after = self.driver.current_url().await?;
        if before != after {
            return Err(E2eError::assertion(format!(
                "URL changed across reload: '{before}' -> '{after}'"
            )));
        }
        Ok(())
    }

    /// Follows the passenger vehicle help link, which opens a new tab, and
    /// returns the new window's handle. The click and the wait for the new
    /// window are bounded together so the window event is never missed.
    pub async fn open_passenger_help_link(&self) -> E2eResult<WindowHandle> {
        let before: HashSet<WindowHandle> = self.driver.windows().await?.into_iter().collect();

        let link = self
            .wait_visible(&self.passenger_link, "passenger vehicle help link")
            .await?;
        link.scroll_into_view().await?;
        link.click().await?;

        let start = Instant::now();
        loop {
            let windows = self.driver.windows().await?;
            if let Some(new_window) = windows.iter().find(|w| !before.contains(w)) {
                return Ok(new_window.clone());
            }
            if start.elapsed() > self.assert_timeout {
                return Err(E2eError::Timeout("a new tab to open from the help link".into()));
            }
            sleep(self.poll_interval).await;
        }
    }

    /// Verifies the full content of the calculation results modal: title,
    /// vehicle type (case-insensitive), purchase price (strict format plus
    /// lenient numeric equality), and a strictly positive duty payable.
    pub async fn verify_calculation_results(
        &self,
        registration: &str,
        purchase_amount: &str,
    ) -> E2eResult<()> {
        self.wait_visible(&self.modal, "calculation results modal").await?;

        let title = self.wait_visible(&self.modal_title, "results modal title").await?;
        let title_text = title.text().await?;
        if !title_text.to_lowercase().contains("calculation") {
            return Err(E2eError::assertion(format!(
                "modal title '{title_text}' does not mention 'Calculation'"
            )));
        }
        self.wait_visible(&self.modal_subtitle, "results modal subtitle").await?;
        self.wait_visible(&self.modal_print_icon, "results modal print icon").await?;

        let vehicle_type = self.modal_row_value("passenger vehicle").await?;
        if !vehicle_type.trim().eq_ignore_ascii_case(registration) {
            return Err(E2eError::assertion(format!(
                "vehicle type '{vehicle_type}' does not match expected '{registration}'"
            )));
        }

        let price_text = self.modal_row_value("Purchase price").await?;
        let price_text = price_text.trim();
        if !is_currency_formatted(Some(price_text)) {
            return Err(E2eError::assertion(format!(
                "purchase price '{price_text}' is not in currency format"
            )));
        }
        let actual = parse_currency(price_text);
        let expected = parse_currency(purchase_amount);
        if actual != expected {
            return Err(E2eError::assertion(format!(
                "purchase price mismatch: displayed {actual}, entered {expected}"
            )));
        }

        let duty_text = self.modal_row_value("Duty payable").await?;
        let duty_text = duty_text.trim();
        if !is_currency_formatted(Some(duty_text)) {
            return Err(E2eError::assertion(format!(
                "duty payable '{duty_text}' is not in currency format"
            )));
        }
        let duty = parse_currency(duty_text);
        if !(duty > 0.0) {
            return Err(E2eError::assertion(format!(
                "duty payable should be greater than zero, got {duty_text}"
            )));
        }

        Ok(())
    }

    /// Dismisses the results modal and confirms it is no longer shown.
    pub async fn close_modal(&self) -> E2eResult<()> {
        let modal = self.wait_visible(&self.modal, "calculation results modal").await?;
        let close = self.wait_visible(&self.modal_close_btn, "modal Close button").await?;
        close.click().await?;

        match modal
            .wait_until()
            .wait(self.assert_timeout, self.poll_interval)
            .not_displayed()
            .await
        {
            Ok(()) => Ok(()),
            // The modal was removed from the DOM entirely
            Err(thirtyfour::error::WebDriverError::StaleElementReference(_)) => Ok(()),
            Err(_) => Err(E2eError::Timeout("results modal to be dismissed".into())),
        }
    }

    /// Reads the value cell of the modal row whose text mentions `label`.
    async fn modal_row_value(&self, label: &str) -> E2eResult<String> {
        let modal = self.driver.find(self.modal.clone()).await?;
        let rows = modal.find_all(By::Css("tr")).await?;
        let needle = label.to_lowercase();

        for row in rows {
            let text = row.text().await?;
            if text.to_lowercase().contains(&needle) {
                let value = row.find(By::Css("td.right")).await.map_err(|_| {
                    E2eError::assertion(format!(
                        "results modal row '{label}' has no value cell"
                    ))
                })?;
                return Ok(value.text().await?);
            }
        }

        Err(E2eError::assertion(format!(
            "results modal has no row mentioning '{label}'"
        )))
    }

    async fn wait_visible(&self, by: &By, what: &str) -> E2eResult<WebElement> {
        wait_displayed(
            &self.driver,
            by.clone(),
            self.assert_timeout,
            self.poll_interval,
            what,
        )
        .await
    }
}

impl PageObject for CalculatorPage {
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
