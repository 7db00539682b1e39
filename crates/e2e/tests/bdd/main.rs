//! BDD harness entry point
//!
//! Runs the Gherkin features under `tests/features` against a suite-scoped
//! chromedriver. Run with: cargo test --package dutycheck-e2e --test bdd
//!
//! Scenarios run one at a time unless cucumber's `--concurrency` flag
//! raises the limit. Scenarios tagged `@ignore` are always skipped.
//! Outside CI, tagging any scenario `@only` focuses the run on those
//! scenarios; under CI, `@only` scenarios are disabled and failed
//! scenarios are retried from scratch (lifecycle hooks rerun).

use std::fs;
use std::path::PathBuf;

use cucumber::event::ScenarioFinished;
use cucumber::gherkin::{Feature, GherkinEnv};
use cucumber::writer::Stats as _;
use cucumber::{cli, writer, World as _, WriterExt as _};
use futures::FutureExt as _;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use dutycheck_e2e::webdriver::{set_suite_server_url, ChromeDriverHandle};
use dutycheck_e2e::{ScenarioWorld, SuiteConfig};

const FEATURES_DIR: &str = "tests/features";

#[derive(clap::Args, Debug)]
struct CustomOpts {
    /// List the scenarios that would run, without launching a browser.
    #[arg(long)]
    dry_run: bool,
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("info".parse().unwrap()))
        .init();

    let opts = cli::Opts::<_, _, _, CustomOpts>::parsed();

    if opts.custom.dry_run {
        list_scenarios();
        return;
    }

    let config = SuiteConfig::from_env();
    if config.base_url.is_none() {
        eprintln!(
            "BASE_URL is not set; skipping the browser suite. \
             Set BASE_URL (and optionally API_BASE_URL, HEADLESS, WEBDRIVER_URL) to run it."
        );
        return;
    }

    if let Err(e) = fs::create_dir_all(&config.results_dir) {
        eprintln!("Error creating results directory: {e}");
        std::process::exit(2);
    }
    let json_report = match fs::File::create(config.json_report_path()) {
        Ok(file) => file,
        Err(e) => {
            eprintln!("Error creating JSON results file: {e}");
            std::process::exit(2);
        }
    };

    // Suite start: exactly one browser process for the whole run.
    let mut chromedriver = match ChromeDriverHandle::launch(&config).await {
        Ok(handle) => handle,
        Err(e) => {
            eprintln!("Error: {e}");
            std::process::exit(2);
        }
    };
    set_suite_server_url(chromedriver.server_url().to_string());

    let ci = config.ci;
    let only_mode = !ci && features_mention_only();

    let summary = ScenarioWorld::cucumber()
        .with_writer(
            writer::Basic::stdout()
                .summarized()
                .tee::<ScenarioWorld, _>(writer::Json::for_tee(json_report))
                .normalized(),
        )
        .with_cli(opts)
        .max_concurrent_scenarios(config.workers())
        .retries(config.retries())
        .before(|_feature, _rule, scenario, _world| {
            async move {
                info!("Starting scenario: {}", scenario.name);
            }
            .boxed_local()
        })
        .after(|_feature, _rule, scenario, finished, world| {
            async move {
                let Some(world) = world else { return };

                // Screenshot before any teardown, only on failure.
                if matches!(
                    finished,
                    ScenarioFinished::StepFailed(..) | ScenarioFinished::BeforeHookFailed(_)
                ) {
                    if let Err(e) = world.capture_failure_screenshot(&scenario.name).await {
                        warn!("Could not capture failure screenshot: {e}");
                    }
                }

                world.teardown().await;
            }
            .boxed_local()
        })
        .filter_run(FEATURES_DIR, move |feature, _rule, scenario| {
            let tagged =
                |tag: &str| scenario.tags.iter().chain(feature.tags.iter()).any(|t| t == tag);

            if tagged("ignore") {
                return false;
            }
            if ci && tagged("only") {
                return false;
            }
            if only_mode && !tagged("only") {
                return false;
            }
            true
        })
        .await;

    // Suite end: release the shared browser process before reporting.
    chromedriver.stop();

    if summary.execution_has_failed() {
        std::process::exit(1);
    }
}

/// Prints every feature and scenario the harness can see.
fn list_scenarios() {
    let mut paths: Vec<PathBuf> = match fs::read_dir(FEATURES_DIR) {
        Ok(entries) => entries
            .filter_map(|e| e.ok().map(|e| e.path()))
            .filter(|p| p.extension().is_some_and(|ext| ext == "feature"))
            .collect(),
        Err(e) => {
            eprintln!("Error reading {FEATURES_DIR}: {e}");
            std::process::exit(2);
        }
    };
    paths.sort();

    for path in paths {
        match Feature::parse_path(&path, GherkinEnv::default()) {
            Ok(feature) => {
                println!("Feature: {}", feature.name);
                for scenario in &feature.scenarios {
                    println!("  Scenario: {}", scenario.name);
                }
            }
            Err(e) => {
                eprintln!("Error parsing {}: {e}", path.display());
                std::process::exit(2);
            }
        }
    }
}

/// True when any feature file carries an `@only` tag.
fn features_mention_only() -> bool {
    let Ok(entries) = fs::read_dir(FEATURES_DIR) else {
        return false;
    };
    entries
        .filter_map(|e| e.ok())
        .filter(|e| e.path().extension().is_some_and(|ext| ext == "feature"))
        .any(|e| {
            fs::read_to_string(e.path())
                .map(|text| text.lines().any(|line| line.trim().split_whitespace().any(|t| t == "@only")))
                .unwrap_or(false)
        })
}
