use url::Url;

use crate::error::{HarvestError, Result};

/// The destination being searched and the results URL the run starts from
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchSession {
    destination: String,
    base_url: Url,
}

impl SearchSession {
    /// Builds the search URL `<origin>/s/<destination>/homes`
    pub fn for_destination(origin: &str, destination: &str) -> Result<Self> {
        let encoded = destination.trim().replace(' ', "%20");
        let raw = format!("{}/s/{}/homes", origin.trim_end_matches('/'), encoded);
        let base_url = parse_url(&raw)?;
        Ok(Self {
            destination: destination.trim().to_string(),
            base_url,
        })
    }

    /// Uses a fully-formed search URL as is
    pub fn from_url(url: &str) -> Result<Self> {
        let base_url = parse_url(url)?;
        let destination = base_url
            .path_segments()
            .and_then(|mut segments| {
                segments.find(|s| *s == "s")?;
                segments.next()
            })
            .unwrap_or_default()
            .to_string();
        Ok(Self {
            destination,
            base_url,
        })
    }

    pub fn destination(&self) -> &str {
        &self.destination
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }
}

fn parse_url(raw: &str) -> Result<Url> {
    Url::parse(raw).map_err(|source| HarvestError::InvalidUrl {
        url: raw.to_string(),
        source,
    })
}
