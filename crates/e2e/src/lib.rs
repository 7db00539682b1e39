//! DutyCheck E2E suite
//!
//! A browser-driven BDD suite validating the NSW motor vehicle stamp duty
//! workflow across the Service NSW information page and the Revenue NSW
//! calculator, plus a self-contained Open Library JSON API integration.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                     BDD harness (tests/bdd)                   │
//! │   cucumber runner: tag filter, retries, JSON results, hooks   │
//! ├──────────────────────────────────────────────────────────────┤
//! │  ScenarioWorld (per scenario)                                 │
//! │    ├── WebDriver session        (isolated browsing context)   │
//! │    ├── StampDutyPage / CalculatorPage (page objects)          │
//! │    └── ApiClient + last ApiExchange                           │
//! ├──────────────────────────────────────────────────────────────┤
//! │  ChromeDriverHandle (per suite)                               │
//! │    one chromedriver process, health-checked, SIGTERM on exit  │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! Lifecycle: the suite launches one browser process for the whole run;
//! every scenario opens its own session, page objects, and API client in
//! `ScenarioWorld::new`, and releases them in the runner's after-hook,
//! capturing a screenshot first when the scenario failed.

pub mod api;
pub mod config;
pub mod currency;
pub mod error;
pub mod pages;
pub mod report;
pub mod steps;
pub mod webdriver;
pub mod world;

pub use config::SuiteConfig;
pub use error::{E2eError, E2eResult};
pub use world::ScenarioWorld;
