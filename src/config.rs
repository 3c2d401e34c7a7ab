use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::{HarvestError, Result};

/// Configuration for a harvest run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HarvestConfig {
    /// URL for the WebDriver instance
    #[serde(default = "default_webdriver_url")]
    pub webdriver_url: String,

    /// Marketplace origin used to build search URLs
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Lower bound of the politeness delay, in seconds
    #[serde(default = "default_min_delay")]
    pub min_delay_secs: f64,

    /// Upper bound of the politeness delay, in seconds
    #[serde(default = "default_max_delay")]
    pub max_delay_secs: f64,

    /// Bound on every explicit element wait
    #[serde(default = "default_element_timeout")]
    pub element_timeout_secs: u64,

    /// Bound on a single page load
    #[serde(default = "default_page_load_timeout")]
    pub page_load_timeout_secs: u64,

    /// Bound on a single image download
    #[serde(default = "default_image_timeout")]
    pub image_timeout_secs: u64,

    /// Dataset root; images land in `<output_dir>/imagenes`
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,

    /// User agents to pick from when opening the browser session
    #[serde(default = "default_user_agents")]
    pub user_agents: Vec<String>,
}

fn default_webdriver_url() -> String {
    "http://localhost:4444".to_string()
}

fn default_base_url() -> String {
    "https://www.airbnb.es".to_string()
}

fn default_min_delay() -> f64 {
    3.0
}

fn default_max_delay() -> f64 {
    7.0
}

fn default_element_timeout() -> u64 {
    10
}

fn default_page_load_timeout() -> u64 {
    45
}

fn default_image_timeout() -> u64 {
    30
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("dataset")
}

fn default_user_agents() -> Vec<String> {
    vec![
        "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36".to_string(),
        "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36".to_string(),
        "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36".to_string(),
    ]
}

impl Default for HarvestConfig {
    fn default() -> Self {
        Self {
            webdriver_url: default_webdriver_url(),
            base_url: default_base_url(),
            min_delay_secs: default_min_delay(),
            max_delay_secs: default_max_delay(),
            element_timeout_secs: default_element_timeout(),
            page_load_timeout_secs: default_page_load_timeout(),
            image_timeout_secs: default_image_timeout(),
            output_dir: default_output_dir(),
            user_agents: default_user_agents(),
        }
    }
}

impl HarvestConfig {
    /// Load configuration from a JSON file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let mut file = File::open(path)?;
        let mut contents = String::new();
        file.read_to_string(&mut contents)?;

        Self::from_json(&contents)
    }

    /// Load configuration from a JSON string
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        Ok(config)
    }

    /// Apply the `WEBDRIVER_URL` environment override, if set
    pub fn with_env_overrides(mut self) -> Self {
        if let Ok(webdriver_url) = std::env::var("WEBDRIVER_URL") {
            if !webdriver_url.is_empty() {
                self.webdriver_url = webdriver_url;
            }
        }
        self
    }

    /// Reject settings the pipeline cannot run with
    pub fn validate(&self) -> Result<()> {
        let (min, max) = (self.min_delay_secs, self.max_delay_secs);
        if !min.is_finite() || !max.is_finite() || min < 0.0 || min > max {
            return Err(HarvestError::Config(format!(
                "invalid politeness delay range [{min}, {max}]"
            )));
        }
        if self.element_timeout_secs == 0 || self.page_load_timeout_secs == 0 {
            return Err(HarvestError::Config(
                "timeouts must be at least one second".to_string(),
            ));
        }
        Ok(())
    }

    pub fn element_timeout(&self) -> Duration {
        Duration::from_secs(self.element_timeout_secs)
    }

    pub fn page_load_timeout(&self) -> Duration {
        Duration::from_secs(self.page_load_timeout_secs)
    }

    pub fn image_timeout(&self) -> Duration {
        Duration::from_secs(self.image_timeout_secs)
    }
}
