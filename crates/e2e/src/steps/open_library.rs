//! API steps against the Open Library author endpoint
//!
//! A self-contained JSON API integration with no coupling to the stamp duty
//! UI workflow; it exercises the API client and dotted-path assertions.

use anyhow::{ensure, Result};
use cucumber::{given, then};

use crate::api::{assert_path_contains, assert_path_eq};
use crate::world::ScenarioWorld;

#[given(expr = "I fetch details for author {string}")]
async fn fetch_author(world: &mut ScenarioWorld, author_id: String) -> Result<()> {
    let exchange = world
        .api
        .get_json(&format!("/authors/{author_id}.json"))
        .await?;

    ensure!(
        exchange.status.is_success(),
        "failed to fetch author {author_id}: {}",
        exchange.status.canonical_reason().unwrap_or("unknown status")
    );

    world.last_api = Some(exchange);
    Ok(())
}

#[then(expr = "the {string} should be {string}")]
async fn field_should_equal(world: &mut ScenarioWorld, key: String, expected: String) -> Result<()> {
    let exchange = world.last_api()?;
    assert_path_eq(&exchange.data, &key, &expected)?;
    Ok(())
}

#[then(expr = "the {string} should contain {string}")]
async fn field_should_contain(
    world: &mut ScenarioWorld,
    key: String,
    expected: String,
) -> Result<()> {
    let exchange = world.last_api()?;
    assert_path_contains(&exchange.data, &key, &expected)?;
    Ok(())
}
