//! The browsing surface the pipeline drives.
//!
//! A run owns exactly one surface and uses it strictly sequentially. Every
//! operation that can block takes an explicit timeout or is bounded by the
//! backend's page-load timeout.

pub mod roles;
pub mod snapshot;
pub mod webdriver;

pub use roles::{Locator, Role};
pub use snapshot::SnapshotSurface;
pub use webdriver::WebDriverSurface;

use std::time::Duration;
use url::Url;

use crate::error::Result;

/// An element handle returned by a [`Surface`] lookup
#[allow(async_fn_in_trait)]
pub trait Element {
    /// Visible text of the element
    async fn text(&self) -> Result<String>;

    /// Value of an attribute, `None` when the attribute is absent
    async fn attr(&self, name: &str) -> Result<Option<String>>;
}

/// Navigation and lookup operations over a single browsing surface
#[allow(async_fn_in_trait)]
pub trait Surface {
    type Element: Element;

    /// Directs the surface to `url`, failing with `Navigation` if the page
    /// does not finish loading in time
    async fn load(&self, url: &Url) -> Result<()>;

    /// Waits up to `timeout` for an element filling `role`, failing with
    /// `ElementNotFound`
    async fn wait_for(&self, role: Role, timeout: Duration) -> Result<Self::Element>;

    /// The surface's present location
    async fn current_url(&self) -> Result<Url>;

    /// Locates and activates the first control filling `role`
    async fn click(&self, role: Role) -> Result<()>;

    /// All elements currently filling `role`, in document order
    async fn find_all(&self, role: Role) -> Result<Vec<Self::Element>>;

    /// The first element filling `role`, `None` when there is none
    async fn find_one(&self, role: Role) -> Result<Option<Self::Element>> {
        Ok(self.find_all(role).await?.into_iter().next())
    }

    /// Releases the surface
    async fn close(self) -> Result<()>;
}

/// Keeps the elements whose text passes the locator's text filter
pub(crate) async fn filter_by_text<E: Element>(locator: Locator, elements: Vec<E>) -> Vec<E> {
    if locator.text_contains.is_none() {
        return elements;
    }

    let mut kept = Vec::with_capacity(elements.len());
    for element in elements {
        match element.text().await {
            Ok(text) if locator.accepts_text(&text) => kept.push(element),
            Ok(_) => {}
            Err(e) => ::log::debug!("Dropping unreadable element for {:?}: {}", locator.css, e),
        }
    }
    kept
}
