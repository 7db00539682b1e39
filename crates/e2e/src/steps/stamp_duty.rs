//! UI steps for the stamp duty calculation workflow

use anyhow::{bail, Result};
use cucumber::{given, then, when};

use crate::error::E2eError;
use crate::pages::PageObject;
use crate::world::ScenarioWorld;

#[given("I am on the Service NSW stamp duty page")]
async fn open_stamp_duty_page(world: &mut ScenarioWorld) -> Result<()> {
    world.stamp_duty.open().await?;
    world.stamp_duty.verify_page_title().await?;
    Ok(())
}

#[when("I click the Check online button")]
async fn click_check_online(world: &mut ScenarioWorld) -> Result<()> {
    world.stamp_duty.click_check_online().await?;
    Ok(())
}

#[then("I should be redirected to the Revenue NSW calculator page")]
async fn verify_calculator_page(world: &mut ScenarioWorld) -> Result<()> {
    world
        .calculator
        .verify_page_url("/erevenue/calculators/motorsimple.php")
        .await?;
    world.calculator.verify_page_elements().await?;
    Ok(())
}

#[when(expr = "I select {string} for the passenger vehicle question")]
async fn select_passenger_vehicle(world: &mut ScenarioWorld, registration: String) -> Result<()> {
    world
        .calculator
        .select_passenger_vehicle(registration == "Yes")
        .await?;
    Ok(())
}

#[when(expr = "I enter Purchase price or value as {string}")]
async fn enter_purchase_price(world: &mut ScenarioWorld, amount: String) -> Result<()> {
    world.calculator.enter_purchase_price(&amount).await?;
    Ok(())
}

#[when("I click Calculate")]
async fn click_calculate(world: &mut ScenarioWorld) -> Result<()> {
    world.calculator.click_calculate().await?;
    Ok(())
}

#[then(
    expr = "the duty payable should be calculated for a passenger vehicle: {string} \
            with purchase price: {string}"
)]
async fn verify_calculation_results(
    world: &mut ScenarioWorld,
    registration: String,
    amount: String,
) -> Result<()> {
    world
        .calculator
        .verify_calculation_results(&registration, &amount)
        .await?;
    Ok(())
}

#[when("I close the calculation results")]
async fn close_results(world: &mut ScenarioWorld) -> Result<()> {
    world.calculator.close_modal().await?;
    Ok(())
}

#[when("I reset the calculator form")]
async fn reset_form(world: &mut ScenarioWorld) -> Result<()> {
    world.calculator.reset_form().await?;
    Ok(())
}

#[then("the purchase price input should be empty")]
async fn price_input_empty(world: &mut ScenarioWorld) -> Result<()> {
    world.calculator.verify_price_input_empty().await?;
    Ok(())
}

#[when("I refresh the calculator page")]
async fn refresh_calculator(world: &mut ScenarioWorld) -> Result<()> {
    world.calculator.refresh_page().await?;
    Ok(())
}

#[when("I open the passenger vehicle help link")]
async fn open_help_link(world: &mut ScenarioWorld) -> Result<()> {
    let window = world.calculator.open_passenger_help_link().await?;
    world.last_window = Some(window);
    Ok(())
}

#[then("a new browser tab should be opened")]
async fn new_tab_opened(world: &mut ScenarioWorld) -> Result<()> {
    if world.last_window.is_none() {
        bail!("no new browser tab was recorded by a previous step");
    }
    Ok(())
}

#[then(regex = r"^I perform an accessibility check on the (.+) page$")]
async fn accessibility_check(world: &mut ScenarioWorld, page_name: String) -> Result<()> {
    let normalized = page_name.to_lowercase();

    if normalized.contains("service nsw") {
        world.stamp_duty.run_accessibility_scan().await?;
    } else if normalized.contains("calculator") {
        world.calculator.run_accessibility_scan().await?;
    } else {
        return Err(E2eError::UnrecognizedInput(format!(
            "accessibility scan failed: page name '{page_name}' not recognized"
        ))
        .into());
    }
    Ok(())
}
