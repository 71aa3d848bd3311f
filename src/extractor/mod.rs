//! Listing extraction pipeline
//!
//! Three independently-fallible tiers, ranked by reliability, merged
//! field by field:
//!
//! 1. Structured data (`application/ld+json` Product blocks)
//! 2. Application state (`__NEXT_DATA__` normalized graph)
//! 3. Presentation (meta tags and generic markup)
//!
//! The core fields (title, description, price, location) fall through the
//! tiers in that order. Everything else (category, condition, images,
//! seller, listing metadata, payment) comes exclusively from the
//! application-state tier and is never backfilled.

mod app_state;
mod fetch;
mod presentation;
mod structured_data;

use scraper::Html;

use crate::model::ListingData;

pub use fetch::{FetchError, HttpListingFetcher, ListingFetcher};

/// Extract a normalized listing record from a fetched document
///
/// Callers must check [`ListingData::has_core_fields`] on the result: a
/// record with no title, description, or price is unextractable and must
/// not progress through the pipeline.
pub fn extract(html: &str) -> ListingData {
    let document = Html::parse_document(html);

    let structured = structured_data::extract(&document);
    let state = app_state::extract(&document);
    let presentation = presentation::extract(&document);

    merge(structured, state, presentation)
}

/// Field-by-field merge, not record-by-record
fn merge(
    structured: ListingData,
    state: ListingData,
    presentation: ListingData,
) -> ListingData {
    ListingData {
        title: structured
            .title
            .or(state.title)
            .or(presentation.title),
        description: structured
            .description
            .or(state.description)
            .or(presentation.description),
        price: structured.price.or(state.price).or(presentation.price),
        location: structured
            .location
            .or(state.location)
            .or(presentation.location),
        // Exclusive to the application-state tier
        category: state.category,
        condition: state.condition,
        images: state.images,
        seller: state.seller,
        listing_meta: state.listing_meta,
        payment: state.payment,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Images, Price, Seller};

    fn listing_with_title(title: &str) -> ListingData {
        ListingData {
            title: Some(title.to_string()),
            ..ListingData::default()
        }
    }

    #[test]
    fn core_fields_prefer_structured_tier() {
        let structured = listing_with_title("from structured");
        let state = listing_with_title("from state");
        let presentation = listing_with_title("from presentation");

        let merged = merge(structured, state, presentation);
        assert_eq!(merged.title.as_deref(), Some("from structured"));
    }

    #[test]
    fn core_fields_fall_through_tiers() {
        let state = ListingData {
            price: Some(Price {
                amount: 99.0,
                currency: None,
                original_amount: None,
            }),
            ..ListingData::default()
        };
        let presentation = listing_with_title("from presentation");

        let merged = merge(ListingData::default(), state, presentation);
        assert_eq!(merged.title.as_deref(), Some("from presentation"));
        assert_eq!(merged.price.unwrap().amount, 99.0);
    }

    #[test]
    fn exclusive_fields_never_backfilled() {
        // A structured tier can never supply seller/images; even if another
        // source produced them they must come from the state tier alone
        let state = ListingData {
            seller: Some(Seller {
                id: None,
                verified: false,
                seller_type: None,
                name: None,
                number_of_listings: None,
                has_profile_photo: false,
            }),
            images: Some(Images {
                count: 0,
                urls: vec![],
            }),
            ..ListingData::default()
        };

        let merged = merge(ListingData::default(), state, ListingData::default());
        assert!(merged.seller.is_some());
        assert_eq!(merged.images.unwrap().count, 0);

        let merged_without_state =
            merge(listing_with_title("t"), ListingData::default(), ListingData::default());
        assert!(merged_without_state.seller.is_none());
        assert!(merged_without_state.images.is_none());
    }

    #[test]
    fn zero_signal_extraction_fails_core_check() {
        let merged = merge(
            ListingData::default(),
            ListingData::default(),
            ListingData::default(),
        );
        assert!(!merged.has_core_fields());
    }

    #[test]
    fn full_document_combines_tiers() {
        let html = r#"<html><head>
            <script type="application/ld+json">
            {"@type": "Product", "name": "Canoe", "offers": {"price": "600"}}
            </script>
            <meta name="description" content="Fallback description" />
        </head><body></body></html>"#;

        let listing = extract(html);
        assert_eq!(listing.title.as_deref(), Some("Canoe"));
        assert_eq!(listing.price.unwrap().amount, 600.0);
        assert_eq!(listing.description.as_deref(), Some("Fallback description"));
    }
}
