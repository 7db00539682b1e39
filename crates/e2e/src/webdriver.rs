//! Suite-scoped browser process management
//!
//! One chromedriver serves the whole run; each scenario opens its own
//! WebDriver session against it, which gives the scenario isolated
//! cookies/storage. Set `WEBDRIVER_URL` to attach to an external server
//! (e.g. a Selenium grid) instead of spawning a local chromedriver.

use std::process::{Child, Command, Stdio};
use std::sync::OnceLock;
use std::time::Duration;
use thirtyfour::prelude::*;
use tokio::time::sleep;
use tracing::{info, warn};

use crate::config::SuiteConfig;
use crate::error::{E2eError, E2eResult};

const STARTUP_TIMEOUT: Duration = Duration::from_secs(15);

/// Handle to the WebDriver server backing the suite.
pub struct ChromeDriverHandle {
    /// Present only when this suite spawned the process itself.
    child: Option<Child>,
    server_url: String,
}

impl ChromeDriverHandle {
    /// Launches chromedriver (or attaches to `WEBDRIVER_URL`) and waits for
    /// it to report ready.
    pub async fn launch(config: &SuiteConfig) -> E2eResult<Self> {
        if let Some(url) = &config.webdriver_url {
            let handle = Self {
                child: None,
                server_url: url.trim_end_matches('/').to_string(),
            };
            handle.wait_for_ready().await?;
            info!("Attached to WebDriver server at {}", handle.server_url);
            return Ok(handle);
        }

        let port = find_free_port();
        let server_url = format!("http://127.0.0.1:{port}");

        info!("Spawning chromedriver on port {port}");

        let child = Command::new("chromedriver")
            .arg(format!("--port={port}"))
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
            .map_err(|e| E2eError::DriverStartup(format!("failed to spawn chromedriver: {e}")))?;

        let handle = Self {
            child: Some(child),
            server_url,
        };

        handle.wait_for_ready().await?;
        info!("chromedriver ready at {}", handle.server_url);
        Ok(handle)
    }

    /// Polls the WebDriver `/status` endpoint until it answers.
    async fn wait_for_ready(&self) -> E2eResult<()> {
        let status_url = format!("{}/status", self.server_url);
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(2))
            .build()?;

        let start = std::time::Instant::now();
        let mut attempts = 0;

        while start.elapsed() < STARTUP_TIMEOUT {
            attempts += 1;

            match client.get(&status_url).send().await {
                Ok(resp) if resp.status().is_success() => return Ok(()),
                Ok(resp) => warn!("WebDriver status returned {}", resp.status()),
                Err(e) => {
                    if attempts == 1 {
                        info!("Waiting for chromedriver to start...");
                    }
                    // A refused connection just means it is not listening yet
                    if !e.is_connect() {
                        warn!("WebDriver status error: {e}");
                    }
                }
            }

            sleep(Duration::from_millis(100)).await;
        }

        Err(E2eError::DriverHealthCheck(attempts))
    }

    pub fn server_url(&self) -> &str {
        &self.server_url
    }

    /// Stops a spawned chromedriver; attaching to an external server is a no-op.
    pub fn stop(&mut self) {
        let Some(mut child) = self.child.take() else {
            return;
        };

        info!("Stopping chromedriver (pid: {})", child.id());

        // SIGTERM lets chromedriver close its sessions cleanly
        #[cfg(unix)]
        {
            use nix::sys::signal::{kill, Signal};
            use nix::unistd::Pid;

            let pid = Pid::from_raw(child.id() as i32);
            if kill(pid, Signal::SIGTERM).is_ok() {
                std::thread::sleep(Duration::from_millis(200));
            }
        }

        // Whatever survived the grace period gets killed outright
        let _ = child.kill();
        let _ = child.wait();
    }
}

impl Drop for ChromeDriverHandle {
    fn drop(&mut self) {
        self.stop();
    }
}

/// Opens one isolated browser session for a scenario.
pub async fn new_session(server_url: &str, config: &SuiteConfig) -> E2eResult<WebDriver> {
    let mut caps = DesiredCapabilities::chrome();
    if config.headless {
        caps.set_headless()?;
    }
    if config.ci {
        caps.set_no_sandbox()?;
    }
    caps.add_arg("--window-size=1280,800")?;

    let driver = WebDriver::new(server_url, caps).await?;
    driver.set_page_load_timeout(config.test_timeout).await?;
    Ok(driver)
}

static SUITE_SERVER_URL: OnceLock<String> = OnceLock::new();

/// Publishes the suite's WebDriver server URL for scenario setup. Called
/// once by the harness after the suite-scoped launch.
pub fn set_suite_server_url(url: String) {
    let _ = SUITE_SERVER_URL.set(url);
}

pub fn suite_server_url() -> E2eResult<&'static str> {
    SUITE_SERVER_URL
        .get()
        .map(String::as_str)
        .ok_or_else(|| E2eError::Config("suite WebDriver server has not been launched".into()))
}

fn find_free_port() -> u16 {
    use std::net::TcpListener;

    TcpListener::bind("127.0.0.1:0")
        .expect("bind an ephemeral local port")
        .local_addr()
        .expect("read the bound local address")
        .port()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_find_free_port() {
        let port = find_free_port();
        assert!(port > 1024);
    }
}
