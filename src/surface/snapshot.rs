//! In-memory browsing surface over saved HTML documents.
//!
//! This backend is meant for tests and offline replays of captured pages:
//! it never touches the network and does no waiting. Live runs use
//! [`WebDriverSurface`](super::WebDriverSurface).

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use url::Url;

use super::{Element, Role, Surface, filter_by_text};
use crate::error::{HarvestError, Result};
use crate::parsers::html::{self, NodeSnapshot};

/// A browsing surface serving fixed HTML documents from memory.
///
/// Pages are keyed by their full URL. Loading an unknown URL fails the way
/// an unreachable page does, and clicking a control follows its `href`.
#[derive(Debug, Default)]
pub struct SnapshotSurface {
    pages: HashMap<String, String>,
    current: Mutex<Option<Url>>,
    visits: Arc<Mutex<Vec<String>>>,
    closed: Arc<AtomicBool>,
}

/// Element captured from a static document
#[derive(Debug, Clone)]
pub struct SnapshotElement(NodeSnapshot);

impl Element for SnapshotElement {
    async fn text(&self) -> Result<String> {
        Ok(self.0.text.clone())
    }

    async fn attr(&self, name: &str) -> Result<Option<String>> {
        Ok(self.0.attrs.get(name).cloned())
    }
}

impl SnapshotSurface {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers the document served at `url`
    pub fn with_page(mut self, url: &str, html: impl Into<String>) -> Self {
        let key = Url::parse(url)
            .map(String::from)
            .unwrap_or_else(|_| url.to_string());
        self.pages.insert(key, html.into());
        self
    }

    /// Shared log of every URL loaded, in order
    pub fn visits(&self) -> Arc<Mutex<Vec<String>>> {
        Arc::clone(&self.visits)
    }

    /// Flag set once the surface has been closed
    pub fn closed_flag(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.closed)
    }

    fn current_document(&self) -> Result<(Url, &str)> {
        let current = self
            .current
            .lock()
            .map_err(|_| HarvestError::navigation("current page", "surface state poisoned"))?
            .clone()
            .ok_or_else(|| HarvestError::navigation("current page", "no page loaded"))?;
        let html = self
            .pages
            .get(current.as_str())
            .ok_or_else(|| HarvestError::navigation(current.as_str(), "page vanished"))?;
        Ok((current, html.as_str()))
    }

    fn select(&self, role: Role) -> Result<Vec<SnapshotElement>> {
        let (_, document) = self.current_document()?;
        let nodes = html::select(document, role.locator().css)
            .map_err(|e| HarvestError::element_not_found(role, e))?;
        Ok(nodes.into_iter().map(SnapshotElement).collect())
    }
}

impl Surface for SnapshotSurface {
    type Element = SnapshotElement;

    async fn load(&self, url: &Url) -> Result<()> {
        if let Ok(mut visits) = self.visits.lock() {
            visits.push(url.to_string());
        }
        if !self.pages.contains_key(url.as_str()) {
            return Err(HarvestError::navigation(url.as_str(), "no document at this address"));
        }
        let mut current = self
            .current
            .lock()
            .map_err(|_| HarvestError::navigation(url.as_str(), "surface state poisoned"))?;
        *current = Some(url.clone());
        Ok(())
    }

    async fn wait_for(&self, role: Role, _timeout: Duration) -> Result<SnapshotElement> {
        // Static documents never change, so there is nothing to wait for.
        self.find_all(role)
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| HarvestError::element_not_found(role, "not present in document"))
    }

    async fn current_url(&self) -> Result<Url> {
        let (current, _) = self.current_document()?;
        Ok(current)
    }

    async fn click(&self, role: Role) -> Result<()> {
        let control = self
            .find_one(role)
            .await?
            .ok_or_else(|| HarvestError::element_not_found(role, "no such control"))?;
        let href = control
            .attr("href")
            .await?
            .ok_or_else(|| HarvestError::element_not_found(role, "control has no href"))?;
        let base = self.current_url().await?;
        let target = base
            .join(&href)
            .map_err(|e| HarvestError::navigation(href.as_str(), e))?;
        self.load(&target).await
    }

    async fn find_all(&self, role: Role) -> Result<Vec<SnapshotElement>> {
        let elements = self.select(role)?;
        Ok(filter_by_text(role.locator(), elements).await)
    }

    async fn close(self) -> Result<()> {
        self.closed.store(true, Ordering::SeqCst);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const RESULTS: &str = r#"<html><body>
        <div data-testid="listing-card-title">Loft</div>
        <a aria-label="Siguiente" href="/s/page2">Next</a>
    </body></html>"#;

    #[tokio::test]
    async fn test_load_find_and_click() {
        let surface = SnapshotSurface::new()
            .with_page("https://example.test/s/page1", RESULTS)
            .with_page("https://example.test/s/page2", "<html><body></body></html>");
        let visits = surface.visits();

        let start = Url::parse("https://example.test/s/page1").unwrap();
        surface.load(&start).await.unwrap();

        let titles = surface.find_all(Role::CardTitle).await.unwrap();
        assert_eq!(titles.len(), 1);
        assert_eq!(titles[0].text().await.unwrap(), "Loft");

        surface.click(Role::NextPage).await.unwrap();
        assert_eq!(
            surface.current_url().await.unwrap().as_str(),
            "https://example.test/s/page2"
        );
        assert!(surface.find_one(Role::NextPage).await.unwrap().is_none());
        assert_eq!(visits.lock().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_unknown_page_is_navigation_error() {
        let surface = SnapshotSurface::new();
        let url = Url::parse("https://example.test/missing").unwrap();
        assert!(matches!(
            surface.load(&url).await,
            Err(HarvestError::Navigation { .. })
        ));
    }

    #[tokio::test]
    async fn test_wait_for_missing_element() {
        let surface = SnapshotSurface::new().with_page("https://example.test/", RESULTS);
        surface
            .load(&Url::parse("https://example.test/").unwrap())
            .await
            .unwrap();
        let err = surface
            .wait_for(Role::DetailHeading, Duration::from_secs(1))
            .await
            .err()
            .unwrap();
        assert!(matches!(
            err,
            HarvestError::ElementNotFound {
                role: Role::DetailHeading,
                ..
            }
        ));
    }

    #[tokio::test]
    async fn test_close_sets_flag() {
        let surface = SnapshotSurface::new();
        let closed = surface.closed_flag();
        surface.close().await.unwrap();
        assert!(closed.load(Ordering::SeqCst));
    }
}
