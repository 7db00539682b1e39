//! Consolidated HTML dashboard built from the Cucumber JSON results
//!
//! A post-run step, separate from the suite itself: it reads the JSON
//! results file the BDD runner wrote and renders a single static HTML page
//! with run totals, per-scenario outcomes, and run metadata.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Serialize;
use serde_json::Value;
use tracing::info;

use crate::error::{E2eError, E2eResult};

/// Static environment labels shown on the dashboard.
#[derive(Debug, Clone, Serialize)]
pub struct ReportMetadata {
    pub browser_name: String,
    pub browser_version: String,
    pub device: String,
    pub platform_name: String,
    pub platform_version: String,
}

impl Default for ReportMetadata {
    fn default() -> Self {
        Self {
            browser_name: "chrome".into(),
            browser_version: "latest".into(),
            device: "QA Machine".into(),
            platform_name: "OSX/Linux".into(),
            platform_version: "Latest".into(),
        }
    }
}

/// Custom title/label pair rendered in the "Execution Info" panel.
#[derive(Debug, Clone)]
pub struct CustomField {
    pub label: String,
    pub value: String,
}

#[derive(Debug, Default)]
struct ScenarioSummary {
    feature: String,
    name: String,
    passed: bool,
    duration_ms: u64,
}

/// Reads the Cucumber JSON results and writes `index.html` under
/// `output_dir`. Returns the path of the written dashboard.
pub fn generate(
    json_path: &Path,
    output_dir: &Path,
    metadata: &ReportMetadata,
    custom: &[CustomField],
) -> E2eResult<PathBuf> {
    let raw = fs::read_to_string(json_path)?;
    let features: Value = serde_json::from_str(&raw)?;
    let scenarios = collect_scenarios(&features)?;

    fs::create_dir_all(output_dir)?;
    let out_path = output_dir.join("index.html");
    fs::write(&out_path, render_html(&scenarios, metadata, custom))?;

    info!("Wrote dashboard to {}", out_path.display());
    Ok(out_path)
}

fn collect_scenarios(features: &Value) -> E2eResult<Vec<ScenarioSummary>> {
    let features = features
        .as_array()
        .ok_or_else(|| E2eError::Config("results JSON is not an array of features".into()))?;

    let mut scenarios = Vec::new();
    for feature in features {
        let feature_name = feature["name"].as_str().unwrap_or("(unnamed feature)");
        let Some(elements) = feature["elements"].as_array() else {
            continue;
        };

        for element in elements {
            if element["type"].as_str() == Some("background") {
                continue;
            }
            let steps = element["steps"].as_array().cloned().unwrap_or_default();
            let passed = !steps.is_empty()
                && steps
                    .iter()
                    .all(|s| s["result"]["status"].as_str() == Some("passed"));
            // Step durations are reported in nanoseconds
            let duration_ms = steps
                .iter()
                .filter_map(|s| s["result"]["duration"].as_u64())
                .sum::<u64>()
                / 1_000_000;

            scenarios.push(ScenarioSummary {
                feature: feature_name.to_string(),
                name: element["name"].as_str().unwrap_or("(unnamed)").to_string(),
                passed,
                duration_ms,
            });
        }
    }
    Ok(scenarios)
}

fn render_html(
    scenarios: &[ScenarioSummary],
    metadata: &ReportMetadata,
    custom: &[CustomField],
) -> String {
    let total = scenarios.len();
    let passed = scenarios.iter().filter(|s| s.passed).count();
    let failed = total - passed;

    let mut rows = String::new();
    for s in scenarios {
        let (class, status) = if s.passed { ("passed", "PASSED") } else { ("failed", "FAILED") };
        rows.push_str(&format!(
            "<tr class=\"{class}\"><td>{}</td><td>{}</td><td>{status}</td><td>{} ms</td></tr>\n",
            escape(&s.feature),
            escape(&s.name),
            s.duration_ms,
        ));
    }

    let mut info = format!(
        "<li>Browser: {} {}</li><li>Device: {}</li><li>Platform: {} {}</li>",
        escape(&metadata.browser_name),
        escape(&metadata.browser_version),
        escape(&metadata.device),
        escape(&metadata.platform_name),
        escape(&metadata.platform_version),
    );
    for field in custom {
        info.push_str(&format!(
            "<li>{}: {}</li>",
            escape(&field.label),
            escape(&field.value)
        ));
    }

    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<title>Stamp Duty E2E Results</title>
<style>
body {{ font-family: sans-serif; margin: 2rem; }}
table {{ border-collapse: collapse; width: 100%; }}
td, th {{ border: 1px solid #ccc; padding: 0.4rem 0.8rem; text-align: left; }}
tr.passed td:nth-child(3) {{ color: #1a7f37; }}
tr.failed td:nth-child(3) {{ color: #cf222e; }}
</style>
</head>
<body>
<h1>Stamp Duty E2E Results</h1>
<p>{total} scenarios: {passed} passed, {failed} failed</p>
<h2>Execution Info</h2>
<ul>{info}</ul>
<h2>Scenarios</h2>
<table>
<tr><th>Feature</th><th>Scenario</th><th>Status</th><th>Duration</th></tr>
{rows}</table>
</body>
</html>
"#
    )
}

fn escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample_results() -> Value {
        json!([{
            "name": "Motor vehicle stamp duty check",
            "elements": [
                {
                    "type": "scenario",
                    "name": "Calculate stamp duty",
                    "steps": [
                        { "result": { "status": "passed", "duration": 1_200_000_000u64 } },
                        { "result": { "status": "passed", "duration": 300_000_000u64 } }
                    ]
                },
                {
                    "type": "scenario",
                    "name": "Reset clears the price",
                    "steps": [
                        { "result": { "status": "failed", "duration": 80_000_000u64 } }
                    ]
                }
            ]
        }])
    }

    #[test]
    fn summarizes_scenarios_with_durations() {
        let scenarios = collect_scenarios(&sample_results()).unwrap();
        assert_eq!(scenarios.len(), 2);
        assert!(scenarios[0].passed);
        assert_eq!(scenarios[0].duration_ms, 1500);
        assert!(!scenarios[1].passed);
    }

    #[test]
    fn writes_dashboard_html() {
        let dir = tempfile::tempdir().unwrap();
        let json_path = dir.path().join("cucumber_report.json");
        fs::write(&json_path, sample_results().to_string()).unwrap();

        let out = generate(
            &json_path,
            &dir.path().join("report"),
            &ReportMetadata::default(),
            &[CustomField { label: "Project".into(), value: "DutyCheck".into() }],
        )
        .unwrap();

        let html = fs::read_to_string(out).unwrap();
        assert!(html.contains("2 scenarios: 1 passed, 1 failed"));
        assert!(html.contains("Project: DutyCheck"));
        assert!(html.contains("Reset clears the price"));
    }

    #[test]
    fn rejects_non_array_results() {
        let err = collect_scenarios(&json!({"not": "an array"})).unwrap_err();
        assert!(err.to_string().contains("not an array"));
    }
}
