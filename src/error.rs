use thiserror::Error;

use crate::surface::Role;

/// Errors raised while harvesting listings
#[derive(Error, Debug)]
pub enum HarvestError {
    /// The browsing surface could not reach a loaded page
    #[error("navigation to {url} failed: {reason}")]
    Navigation { url: String, reason: String },

    /// An expected structural element is missing from the current page
    #[error("element {role:?} not found: {reason}")]
    ElementNotFound { role: Role, reason: String },

    /// An image or other network resource could not be fetched
    #[error("fetch of {url} failed: {reason}")]
    Fetch { url: String, reason: String },

    /// The politeness delay could not be sampled or slept
    #[error("politeness delay fault: {0}")]
    SamplingFault(String),

    /// A WebDriver session could not be created
    #[error("webdriver session error: {0}")]
    WebDriver(String),

    #[error("invalid url {url}: {source}")]
    InvalidUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },

    #[error("configuration error: {0}")]
    Config(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Csv(#[from] csv::Error),
}

impl HarvestError {
    pub fn navigation(url: impl Into<String>, reason: impl ToString) -> Self {
        Self::Navigation {
            url: url.into(),
            reason: reason.to_string(),
        }
    }

    pub fn element_not_found(role: Role, reason: impl ToString) -> Self {
        Self::ElementNotFound {
            role,
            reason: reason.to_string(),
        }
    }

    pub fn fetch(url: impl Into<String>, reason: impl ToString) -> Self {
        Self::Fetch {
            url: url.into(),
            reason: reason.to_string(),
        }
    }

    /// Whether this error must stop the whole run instead of being
    /// isolated to the current item or page
    pub fn is_fatal(&self) -> bool {
        matches!(self, HarvestError::SamplingFault(_))
    }
}

impl From<serde_json::Error> for HarvestError {
    fn from(err: serde_json::Error) -> Self {
        HarvestError::Config(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, HarvestError>;
