//! Post-run dashboard generator
//!
//! Consumes the Cucumber JSON results written by the BDD harness and
//! produces a consolidated HTML dashboard.
//! Run with: cargo run --package dutycheck-e2e --bin report

use std::path::PathBuf;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use dutycheck_e2e::report::{self, CustomField, ReportMetadata};

#[derive(Parser, Debug)]
#[command(name = "report")]
#[command(about = "Generate the HTML dashboard from Cucumber JSON results")]
struct Args {
    /// Path to the Cucumber JSON results file
    #[arg(short, long, default_value = "test-results/cucumber_report.json")]
    json: PathBuf,

    /// Output directory for the dashboard
    #[arg(short, long, default_value = "test-results/report")]
    output: PathBuf,

    /// Extra label=value pairs for the Execution Info panel
    #[arg(short, long = "data", value_parser = parse_field)]
    data: Vec<CustomField>,
}

fn parse_field(raw: &str) -> Result<CustomField, String> {
    match raw.split_once('=') {
        Some((label, value)) if !label.is_empty() => Ok(CustomField {
            label: label.to_string(),
            value: value.to_string(),
        }),
        _ => Err(format!("expected label=value, got '{raw}'")),
    }
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("info".parse().unwrap()))
        .init();

    let args = Args::parse();

    let mut fields = vec![
        CustomField { label: "Project".into(), value: "NSW Stamp Duty Check".into() },
        CustomField { label: "Cycle".into(), value: "Sprint 1".into() },
    ];
    fields.extend(args.data);

    match report::generate(&args.json, &args.output, &ReportMetadata::default(), &fields) {
        Ok(path) => println!("Dashboard written to {}", path.display()),
        Err(e) => {
            eprintln!("Error: {e}");
            std::process::exit(2);
        }
    }
}
