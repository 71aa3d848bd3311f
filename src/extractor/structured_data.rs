//! Structured-data extraction tier
//!
//! Parses embedded `application/ld+json` blocks looking for a schema.org
//! Product with an Offer. The most reliable tier when present; any malformed
//! block is skipped without aborting extraction.

use scraper::{Html, Selector};
use serde_json::Value;

use crate::model::{ListingData, Location, Price};

/// Extract title, description, price, and location from JSON-LD blocks
pub fn extract(document: &Html) -> ListingData {
    let mut out = ListingData::default();

    let selector = match Selector::parse(r#"script[type="application/ld+json"]"#) {
        Ok(s) => s,
        Err(_) => return out,
    };

    for script in document.select(&selector) {
        let raw = script.text().collect::<String>();
        let value: Value = match serde_json::from_str(&raw) {
            Ok(v) => v,
            Err(e) => {
                tracing::debug!(error = %e, "Skipping malformed linked-data block");
                continue;
            }
        };

        for product in collect_products(&value) {
            apply_product(&mut out, product);
        }
    }

    out
}

/// Find Product nodes at the top level, inside arrays, or inside `@graph`
fn collect_products(value: &Value) -> Vec<&Value> {
    let mut products = Vec::new();

    match value {
        Value::Array(items) => {
            for item in items {
                products.extend(collect_products(item));
            }
        }
        Value::Object(map) => {
            if is_product(value) {
                products.push(value);
            }
            if let Some(graph) = map.get("@graph") {
                products.extend(collect_products(graph));
            }
        }
        _ => {}
    }

    products
}

fn is_product(value: &Value) -> bool {
    match value.get("@type") {
        Some(Value::String(t)) => t == "Product",
        Some(Value::Array(types)) => types.iter().any(|t| t.as_str() == Some("Product")),
        _ => false,
    }
}

/// Fill still-empty fields from one Product node; earlier blocks win
fn apply_product(out: &mut ListingData, product: &Value) {
    if out.title.is_none() {
        out.title = non_empty_string(product.get("name"));
    }

    if out.description.is_none() {
        out.description = non_empty_string(product.get("description"));
    }

    let offer = first_offer(product);

    if out.price.is_none() {
        if let Some(offer) = offer {
            if let Some(amount) = parse_amount(offer.get("price")) {
                out.price = Some(Price {
                    amount,
                    currency: non_empty_string(offer.get("priceCurrency")),
                    original_amount: None,
                });
            }
        }
    }

    if out.location.is_none() {
        out.location = offer.and_then(offer_location);
    }
}

/// `offers` may be a single Offer object or an array; take the first
fn first_offer(product: &Value) -> Option<&Value> {
    match product.get("offers") {
        Some(Value::Array(offers)) => offers.first(),
        Some(offer @ Value::Object(_)) => Some(offer),
        _ => None,
    }
}

fn offer_location(offer: &Value) -> Option<Location> {
    let address = offer.get("availableAtOrFrom")?.get("address")?;

    let name = non_empty_string(address.get("addressLocality"));
    let street = non_empty_string(address.get("streetAddress"));

    if name.is_none() && street.is_none() {
        return None;
    }

    Some(Location {
        name,
        address: street,
    })
}

/// JSON-LD prices arrive as either a number or a numeric string
fn parse_amount(value: Option<&Value>) -> Option<f64> {
    match value? {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn non_empty_string(value: Option<&Value>) -> Option<String> {
    let s = value?.as_str()?.trim();
    if s.is_empty() {
        None
    } else {
        Some(s.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(html: &str) -> ListingData {
        extract(&Html::parse_document(html))
    }

    #[test]
    fn extracts_product_fields() {
        let html = r#"<html><head>
            <script type="application/ld+json">
            {
              "@context": "https://schema.org",
              "@type": "Product",
              "name": "Road Bike",
              "description": "Lightly used road bike",
              "offers": {
                "@type": "Offer",
                "price": "450.00",
                "priceCurrency": "CAD",
                "availableAtOrFrom": {
                  "address": { "addressLocality": "Toronto" }
                }
              }
            }
            </script>
        </head><body></body></html>"#;

        let listing = parse(html);
        assert_eq!(listing.title.as_deref(), Some("Road Bike"));
        assert_eq!(listing.description.as_deref(), Some("Lightly used road bike"));
        let price = listing.price.unwrap();
        assert_eq!(price.amount, 450.0);
        assert_eq!(price.currency.as_deref(), Some("CAD"));
        assert_eq!(listing.location.unwrap().name.as_deref(), Some("Toronto"));
    }

    #[test]
    fn malformed_block_is_skipped() {
        let html = r#"<html><head>
            <script type="application/ld+json">{not valid json</script>
            <script type="application/ld+json">
            {"@type": "Product", "name": "Couch", "offers": {"price": 80}}
            </script>
        </head><body></body></html>"#;

        let listing = parse(html);
        assert_eq!(listing.title.as_deref(), Some("Couch"));
        assert_eq!(listing.price.unwrap().amount, 80.0);
    }

    #[test]
    fn product_inside_graph_is_found() {
        let html = r#"<html><head>
            <script type="application/ld+json">
            {"@graph": [
                {"@type": "WebPage", "name": "ignored"},
                {"@type": "Product", "name": "Lamp"}
            ]}
            </script>
        </head><body></body></html>"#;

        let listing = parse(html);
        assert_eq!(listing.title.as_deref(), Some("Lamp"));
    }

    #[test]
    fn no_blocks_yields_empty_record() {
        let listing = parse("<html><body><p>hello</p></body></html>");
        assert!(listing.title.is_none());
        assert!(listing.price.is_none());
    }
}
