use url::Url;

use crate::error::{HarvestError, Result};
use crate::results::ListingSummary;
use crate::surface::{Element, Role, Surface};

/// Reads the visible cards of the loaded results page, in document order.
///
/// Titles, price rows and links are collected independently and paired by
/// position up to the shortest list. A card whose fields cannot be read is
/// skipped; relative links are resolved against `page_url`.
pub async fn harvest_summaries<S: Surface>(
    surface: &S,
    page_url: &Url,
) -> Result<Vec<ListingSummary>> {
    let titles = surface.find_all(Role::CardTitle).await?;
    let prices = surface.find_all(Role::CardPrice).await?;
    let links = surface.find_all(Role::CardLink).await?;

    let count = titles.len().min(prices.len()).min(links.len());
    if titles.len() != prices.len() || titles.len() != links.len() {
        ::log::warn!(
            "Uneven card fields on {}: {} titles, {} prices, {} links",
            page_url,
            titles.len(),
            prices.len(),
            links.len()
        );
    }

    let mut summaries = Vec::with_capacity(count);
    for (index, ((title, price), link)) in titles.iter().zip(&prices).zip(&links).enumerate() {
        match read_card(title, price, link, page_url).await {
            Ok(summary) => summaries.push(summary),
            Err(e) => ::log::error!("Skipping card {} on {}: {}", index, page_url, e),
        }
    }

    ::log::debug!("Harvested {} summaries from {}", summaries.len(), page_url);
    Ok(summaries)
}

async fn read_card<E: Element>(
    title: &E,
    price: &E,
    link: &E,
    page_url: &Url,
) -> Result<ListingSummary> {
    let title = title.text().await?;
    let price_text = price.text().await?;
    let href = link
        .attr("href")
        .await?
        .filter(|href| !href.trim().is_empty())
        .ok_or_else(|| HarvestError::element_not_found(Role::CardLink, "card link has no href"))?;

    let detail_link = page_url
        .join(href.trim())
        .map_err(|source| HarvestError::InvalidUrl {
            url: href.clone(),
            source,
        })?;
    if !matches!(detail_link.scheme(), "http" | "https") {
        return Err(HarvestError::element_not_found(
            Role::CardLink,
            format!("card link {detail_link} is not dereferenceable"),
        ));
    }

    Ok(ListingSummary {
        title,
        price_text,
        detail_link,
    })
}
