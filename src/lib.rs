//! Harvests listing records from a rental marketplace's search results.
//!
//! A run walks the paginated results of one [`SearchSession`] in a WebDriver
//! browser, visits every listing's detail page, downloads its hero image and
//! returns a [`Dataset`] of normalized [`ListingRecord`]s.

pub mod config;
pub mod error;
pub mod harvest;
pub mod output;
pub mod parsers;
pub mod politeness;
pub mod results;
pub mod session;
pub mod surface;
pub mod utils;

pub use config::HarvestConfig;
pub use error::{HarvestError, Result};
pub use harvest::{Dataset, Harvester, PageState, RunReport};
pub use results::ListingRecord;
pub use session::SearchSession;

use harvest::{HttpImageSource, ImageCapture, ImageStore};
use politeness::Governor;
use surface::WebDriverSurface;

/// Default number of results pages to walk
pub const DEFAULT_PAGES: u32 = 14;

/// Builder for a harvest run against a live WebDriver browser
pub struct Harvest {
    session: SearchSession,
    config: HarvestConfig,
    pages: u32,
}

impl Harvest {
    /// Create a new Harvest builder for the given session
    pub fn new(session: SearchSession) -> Self {
        Self {
            session,
            config: HarvestConfig::default(),
            pages: DEFAULT_PAGES,
        }
    }

    /// Apply a configuration
    pub fn with_config(mut self, config: HarvestConfig) -> Self {
        self.config = config;
        self
    }

    /// Load configuration from a JSON file
    pub fn with_config_file(self, path: impl AsRef<std::path::Path>) -> Result<Self> {
        let config = HarvestConfig::from_file(path)?;
        Ok(self.with_config(config))
    }

    /// Set how many results pages to walk at most
    pub fn with_pages(mut self, pages: u32) -> Self {
        self.pages = pages;
        self
    }

    /// Open the browser and run the pipeline to completion
    pub async fn run(self) -> Result<RunReport> {
        let config = self.config;
        config.validate()?;

        let governor = Governor::new(config.min_delay_secs, config.max_delay_secs)?;
        let images = ImageCapture::new(
            HttpImageSource::new(config.image_timeout())?,
            ImageStore::new(&config.output_dir),
        );

        ::log::info!(
            "Connecting to WebDriver at {} for {}",
            config.webdriver_url,
            self.session.base_url()
        );
        let surface = WebDriverSurface::connect(
            &config.webdriver_url,
            &config.user_agents,
            config.page_load_timeout(),
        )
        .await?;

        Harvester::new(surface, images, governor, config.element_timeout())
            .run(&self.session, self.pages)
            .await
    }
}
