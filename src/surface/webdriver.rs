use fantoccini::elements::Element as WdElement;
use fantoccini::{Client, ClientBuilder, Locator as WdLocator};
use rand::seq::SliceRandom;
use serde_json::json;
use std::time::Duration;
use tokio::time::timeout;
use url::Url;

use super::{Element, Role, Surface, filter_by_text};
use crate::error::{HarvestError, Result};

/// Ports tried when the configured WebDriver server refuses the session
const FALLBACK_WEBDRIVER_URLS: [&str; 2] = [
    "http://localhost:9515", // ChromeDriver default
    "http://127.0.0.1:4444", // Try with IP instead of localhost
];

/// A browsing surface backed by a WebDriver session
pub struct WebDriverSurface {
    client: Client,
    page_load_timeout: Duration,
}

/// Element handle of a live WebDriver session
pub struct WebDriverElement(WdElement);

impl Element for WebDriverElement {
    async fn text(&self) -> Result<String> {
        let text = self
            .0
            .text()
            .await
            .map_err(|e| HarvestError::WebDriver(e.to_string()))?;
        Ok(text.trim().to_string())
    }

    async fn attr(&self, name: &str) -> Result<Option<String>> {
        self.0
            .attr(name)
            .await
            .map_err(|e| HarvestError::WebDriver(e.to_string()))
    }
}

impl WebDriverSurface {
    /// Opens a Chrome session on the given WebDriver server, presenting one
    /// of `user_agents` picked at random
    pub async fn connect(
        webdriver_url: &str,
        user_agents: &[String],
        page_load_timeout: Duration,
    ) -> Result<Self> {
        let user_agent = user_agents.choose(&mut rand::thread_rng());

        let mut args = vec!["--disable-search-engine-choice-screen".to_string()];
        if let Some(agent) = user_agent {
            args.push(format!("user-agent={agent}"));
        }
        let mut capabilities = serde_json::Map::new();
        capabilities.insert("goog:chromeOptions".to_string(), json!({ "args": args }));

        let client = connect_with_fallbacks(webdriver_url, capabilities).await?;
        let surface = Self {
            client,
            page_load_timeout,
        };
        surface.log_user_agent().await;
        Ok(surface)
    }

    /// Logs the user agent the browser actually reports
    async fn log_user_agent(&self) {
        match self
            .client
            .execute("return navigator.userAgent;", Vec::new())
            .await
        {
            Ok(agent) => ::log::info!("Browser user agent: {}", agent.as_str().unwrap_or("")),
            Err(e) => ::log::warn!("Could not read browser user agent: {}", e),
        }
    }

    async fn raw_find_all(&self, role: Role) -> Result<Vec<WebDriverElement>> {
        let locator = role.locator();
        let elements = self
            .client
            .find_all(WdLocator::Css(locator.css))
            .await
            .map_err(|e| HarvestError::element_not_found(role, e))?;
        let elements = elements.into_iter().map(WebDriverElement).collect();
        Ok(filter_by_text(locator, elements).await)
    }
}

async fn connect_with_fallbacks(
    webdriver_url: &str,
    capabilities: serde_json::Map<String, serde_json::Value>,
) -> Result<Client> {
    let mut builder = ClientBuilder::native();
    builder.capabilities(capabilities);

    let first_error = match builder.connect(webdriver_url).await {
        Ok(client) => {
            ::log::debug!("Connected to WebDriver at {}", webdriver_url);
            return Ok(client);
        }
        Err(e) => {
            ::log::error!("Failed to connect to WebDriver at {}: {}", webdriver_url, e);
            e.to_string()
        }
    };

    for url in FALLBACK_WEBDRIVER_URLS.iter() {
        if *url == webdriver_url {
            continue;
        }

        ::log::info!("Trying fallback WebDriver URL: {}", url);
        if let Ok(client) = builder.connect(url).await {
            ::log::debug!("Connected to fallback WebDriver at {}", url);
            return Ok(client);
        }
    }

    ::log::error!(
        "Make sure a WebDriver server is running or set the WEBDRIVER_URL environment variable"
    );
    Err(HarvestError::WebDriver(first_error))
}

impl Surface for WebDriverSurface {
    type Element = WebDriverElement;

    async fn load(&self, url: &Url) -> Result<()> {
        ::log::debug!("Loading {}", url);
        match timeout(self.page_load_timeout, self.client.goto(url.as_str())).await {
            Ok(Ok(())) => Ok(()),
            Ok(Err(e)) => Err(HarvestError::navigation(url.as_str(), e)),
            Err(_) => Err(HarvestError::navigation(
                url.as_str(),
                format!("page did not load within {:?}", self.page_load_timeout),
            )),
        }
    }

    async fn wait_for(&self, role: Role, timeout: Duration) -> Result<WebDriverElement> {
        let locator = role.locator();
        let first = self
            .client
            .wait()
            .at_most(timeout)
            .for_element(WdLocator::Css(locator.css))
            .await
            .map_err(|e| HarvestError::element_not_found(role, e))?;

        if locator.text_contains.is_none() {
            return Ok(WebDriverElement(first));
        }
        self.raw_find_all(role)
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| HarvestError::element_not_found(role, "no element with matching text"))
    }

    async fn current_url(&self) -> Result<Url> {
        self.client
            .current_url()
            .await
            .map_err(|e| HarvestError::navigation("current page", e))
    }

    async fn click(&self, role: Role) -> Result<()> {
        let control = self
            .raw_find_all(role)
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| HarvestError::element_not_found(role, "no such control"))?;
        control
            .0
            .click()
            .await
            .map_err(|e| HarvestError::element_not_found(role, e))
    }

    async fn find_all(&self, role: Role) -> Result<Vec<WebDriverElement>> {
        self.raw_find_all(role).await
    }

    async fn close(self) -> Result<()> {
        self.client
            .close()
            .await
            .map_err(|e| HarvestError::WebDriver(e.to_string()))
    }
}
