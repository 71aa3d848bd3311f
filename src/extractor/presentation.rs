//! Presentation extraction tier
//!
//! Meta tags and generic markup selectors, the last resort for the core
//! title/description/price/location fields when neither embedded data
//! source is usable.

use scraper::{Html, Selector};

use crate::model::{ListingData, Location, Price};

/// Extract core fields from meta tags and generic selectors
pub fn extract(document: &Html) -> ListingData {
    ListingData {
        title: extract_meta_property(document, "og:title").or_else(|| extract_title_tag(document)),
        description: extract_meta_name(document, "description")
            .or_else(|| extract_meta_property(document, "og:description")),
        price: extract_price(document),
        location: extract_location(document),
        ..ListingData::default()
    }
}

fn extract_title_tag(document: &Html) -> Option<String> {
    let selector = Selector::parse("title").ok()?;
    let el = document.select(&selector).next()?;
    let title = el.text().collect::<String>().trim().to_string();
    if title.is_empty() {
        None
    } else {
        Some(title)
    }
}

fn extract_price(document: &Html) -> Option<Price> {
    // Product meta tags first, itemprop markup as fallback
    let amount = extract_meta_property(document, "product:price:amount")
        .and_then(|raw| parse_money(&raw))
        .or_else(|| {
            let selector = Selector::parse(r#"[itemprop="price"]"#).ok()?;
            let el = document.select(&selector).next()?;
            let raw = el
                .value()
                .attr("content")
                .map(str::to_string)
                .unwrap_or_else(|| el.text().collect::<String>());
            parse_money(&raw)
        })?;

    Some(Price {
        amount,
        currency: extract_meta_property(document, "product:price:currency"),
        original_amount: None,
    })
}

fn extract_location(document: &Html) -> Option<Location> {
    let name = extract_meta_name(document, "geo.placename").or_else(|| {
        let selector = Selector::parse(r#"[itemprop="addressLocality"]"#).ok()?;
        let el = document.select(&selector).next()?;
        let name = el.text().collect::<String>().trim().to_string();
        if name.is_empty() {
            None
        } else {
            Some(name)
        }
    })?;

    Some(Location {
        name: Some(name),
        address: None,
    })
}

/// Parse a displayed money string ("$1,250.00") into a decimal amount
fn parse_money(raw: &str) -> Option<f64> {
    let cleaned: String = raw
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '.')
        .collect();
    if cleaned.is_empty() {
        return None;
    }
    cleaned.parse().ok()
}

/// Extract content from `<meta name="...">`
fn extract_meta_name(document: &Html, name: &str) -> Option<String> {
    extract_meta_attr(document, &format!("meta[name=\"{}\"]", name))
}

/// Extract content from `<meta property="...">`
fn extract_meta_property(document: &Html, property: &str) -> Option<String> {
    extract_meta_attr(document, &format!("meta[property=\"{}\"]", property))
}

fn extract_meta_attr(document: &Html, selector_str: &str) -> Option<String> {
    let selector = Selector::parse(selector_str).ok()?;
    let el = document.select(&selector).next()?;
    let content = el.value().attr("content")?.trim();
    if content.is_empty() {
        None
    } else {
        Some(content.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(html: &str) -> ListingData {
        extract(&Html::parse_document(html))
    }

    #[test]
    fn extracts_meta_tags() {
        let html = r#"<html><head>
            <meta property="og:title" content="Vintage Desk" />
            <meta name="description" content="Solid oak desk" />
            <meta property="product:price:amount" content="125.00" />
            <meta property="product:price:currency" content="CAD" />
            <meta name="geo.placename" content="Halifax" />
        </head><body></body></html>"#;

        let listing = parse(html);
        assert_eq!(listing.title.as_deref(), Some("Vintage Desk"));
        assert_eq!(listing.description.as_deref(), Some("Solid oak desk"));
        assert_eq!(listing.price.as_ref().unwrap().amount, 125.0);
        assert_eq!(listing.location.unwrap().name.as_deref(), Some("Halifax"));
    }

    #[test]
    fn falls_back_to_title_tag_and_itemprop_price() {
        let html = r#"<html><head><title>Garage Sale Finds</title></head>
            <body><span itemprop="price">$1,250.00</span></body></html>"#;

        let listing = parse(html);
        assert_eq!(listing.title.as_deref(), Some("Garage Sale Finds"));
        assert_eq!(listing.price.unwrap().amount, 1250.0);
    }

    #[test]
    fn never_supplies_exclusive_fields() {
        let html = r#"<html><head><meta property="og:title" content="Thing" /></head><body></body></html>"#;
        let listing = parse(html);
        assert!(listing.seller.is_none());
        assert!(listing.images.is_none());
        assert!(listing.payment.is_none());
    }
}
