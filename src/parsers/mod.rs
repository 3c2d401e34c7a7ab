//! Text extraction helpers: field normalization and static-document queries.

pub mod fields;
pub mod html;

#[cfg(test)]
mod tests;

pub use fields::{
    AmenityCounts, parse_amenities, parse_count, parse_price_range, parse_rating,
    resolve_review_count,
};
