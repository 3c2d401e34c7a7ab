use std::time::Duration;
use url::Url;

use super::images::{ImageCapture, ImageSource};
use crate::error::{HarvestError, Result};
use crate::politeness::Governor;
use crate::results::{ListingSummary, RawListing, listing_id};
use crate::surface::{Element, Role, Surface};

/// Everything the detail extractor needs besides the listing itself
pub struct DetailContext<'a, S, F> {
    pub surface: &'a S,
    pub governor: &'a Governor,
    pub images: &'a ImageCapture<F>,
    pub element_timeout: Duration,
}

impl<S: Surface, F: ImageSource> DetailContext<'_, S, F> {
    /// Visits a listing's detail page and reads its raw fields, then goes
    /// back to `return_to`.
    ///
    /// Fails when the page cannot be reached or its heading never appears.
    /// Missing rating, review counts and image are not failures.
    pub async fn extract(&self, summary: &ListingSummary, return_to: &Url) -> Result<RawListing> {
        let link = &summary.detail_link;
        let id = listing_id(link).ok_or_else(|| {
            HarvestError::element_not_found(Role::CardLink, format!("no listing id in {link}"))
        })?;

        self.surface.load(link).await?;
        self.governor.wait().await?;

        let description = self
            .surface
            .wait_for(Role::DetailHeading, self.element_timeout)
            .await?
            .text()
            .await?;
        let amenity_lines = self.amenity_lines(&id).await;
        let rating_text = self.optional_text(Role::Rating, &id).await;
        let review_count = self.optional_text(Role::ReviewCount, &id).await;
        let review_count_link = self.optional_text(Role::ReviewCountLink, &id).await;

        let image_refs = self.images.capture(self.surface, &id).await;

        if let Err(e) = self.surface.load(return_to).await {
            ::log::warn!(listing_id = id.as_str(); "Could not return to results page: {}", e);
        }
        self.governor.wait().await?;

        Ok(RawListing {
            id,
            title: summary.title.clone(),
            price_text: summary.price_text.clone(),
            description,
            amenity_lines,
            rating_text,
            review_count,
            review_count_link,
            link: link.clone(),
            image_refs,
        })
    }

    /// Non-empty amenity lines; a failed lookup leaves them empty
    async fn amenity_lines(&self, id: &str) -> Vec<String> {
        let elements = match self.surface.find_all(Role::AmenityLine).await {
            Ok(elements) => elements,
            Err(e) => {
                ::log::warn!(listing_id = id; "Could not read amenity lines: {}", e);
                return Vec::new();
            }
        };

        let mut lines = Vec::new();
        for element in elements {
            match element.text().await {
                Ok(text) if !text.trim().is_empty() => lines.push(text.trim().to_string()),
                Ok(_) => {}
                Err(e) => ::log::debug!("Unreadable amenity line: {}", e),
            }
        }
        lines
    }

    /// Text of the first element filling `role`. Absence and failed
    /// lookups are both `None`.
    async fn optional_text(&self, role: Role, id: &str) -> Option<String> {
        let element = match self.surface.find_one(role).await {
            Ok(element) => element?,
            Err(e) => {
                ::log::warn!(listing_id = id; "Could not look up {:?}: {}", role, e);
                return None;
            }
        };
        let text = match element.text().await {
            Ok(text) => text,
            Err(e) => {
                ::log::warn!(listing_id = id; "Could not read {:?}: {}", role, e);
                return None;
            }
        };
        let text = text.trim();
        (!text.is_empty()).then(|| text.to_string())
    }
}
