use serde::{Deserialize, Serialize};
use url::Url;

use crate::parsers::{self, AmenityCounts};

/// Card data read from a results page before visiting the listing
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListingSummary {
    pub title: String,
    pub price_text: String,
    /// Fully-qualified address of the listing's detail page
    pub detail_link: Url,
}

/// What the detail page yielded, before normalization
#[derive(Debug, Clone, PartialEq)]
pub struct RawListing {
    pub id: String,
    pub title: String,
    pub price_text: String,
    pub description: String,
    pub amenity_lines: Vec<String>,
    pub rating_text: Option<String>,
    /// Short count shown next to the rating
    pub review_count: Option<String>,
    /// Longer count embedded in the reviews link
    pub review_count_link: Option<String>,
    pub link: Url,
    pub image_refs: Vec<Url>,
}

/// One harvested listing with normalized fields
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ListingRecord {
    pub id: String,
    pub title: String,
    pub description: String,
    pub amenity_lines: Vec<String>,
    pub price_low: Option<f64>,
    pub price_high: Option<f64>,
    pub rating: Option<f64>,
    pub rating_count: Option<u32>,
    pub travelers: Option<u32>,
    pub bedrooms: Option<u32>,
    pub beds: Option<u32>,
    pub baths: Option<u32>,
    pub link: Url,
    pub image_refs: Vec<Url>,
}

impl From<RawListing> for ListingRecord {
    fn from(raw: RawListing) -> Self {
        let (price_low, price_high) = parsers::parse_price_range(&raw.price_text);
        let AmenityCounts {
            travelers,
            bedrooms,
            beds,
            baths,
        } = parsers::parse_amenities(&raw.amenity_lines);
        let rating = raw.rating_text.as_deref().and_then(parsers::parse_rating);
        let rating_count = parsers::resolve_review_count(
            raw.review_count.as_deref(),
            raw.review_count_link.as_deref(),
        );

        Self {
            id: raw.id,
            title: raw.title,
            description: raw.description,
            amenity_lines: raw.amenity_lines,
            price_low,
            price_high,
            rating,
            rating_count,
            travelers,
            bedrooms,
            beds,
            baths,
            link: raw.link,
            image_refs: raw.image_refs,
        }
    }
}

/// Derives a listing id from the last non-empty path segment of its link.
///
/// Query string and fragment are ignored.
pub fn listing_id(link: &Url) -> Option<String> {
    link.path_segments()?
        .filter(|segment| !segment.is_empty())
        .next_back()
        .map(str::to_string)
}
