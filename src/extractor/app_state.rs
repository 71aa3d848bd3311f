//! Application-state extraction tier
//!
//! Parses the embedded `__NEXT_DATA__` payload and its normalized client
//! state graph: a map of `Type:id` keyed nodes that cross-reference each
//! other through `{"__ref": "Type:id"}` values. This tier is the exclusive
//! source for seller, images, category hierarchy, listing lifecycle
//! metadata, and payment attributes, and a fallback source for the core
//! title/description/price/location fields.
//!
//! Prices in the state graph are stored in minor currency units and are
//! converted to decimal here.

use chrono::{DateTime, NaiveDateTime, Utc};
use scraper::{Html, Selector};
use serde_json::{Map, Value};
use std::collections::HashSet;

use crate::model::{Images, ListingData, ListingMeta, Location, Payment, Price, Seller};

type StateGraph = Map<String, Value>;

/// Extract a listing record from the application state graph, if present
pub fn extract(document: &Html) -> ListingData {
    let state = match load_state_graph(document) {
        Some(state) => state,
        None => return ListingData::default(),
    };

    let listing = match find_listing_node(&state) {
        Some(node) => node,
        None => {
            tracing::debug!("Application state present but no listing node found");
            return ListingData::default();
        }
    };

    let attributes = collect_attributes(&state, listing);

    ListingData {
        title: string_field(listing, "title"),
        description: string_field(listing, "description"),
        price: extract_price(&state, listing),
        location: extract_location(&state, listing),
        category: extract_category_path(&state, listing),
        condition: attribute_value(&attributes, "condition"),
        images: extract_images(listing),
        seller: extract_seller(&state, listing),
        listing_meta: extract_listing_meta(listing),
        payment: extract_payment(&attributes),
    }
}

/// Locate and parse the `__NEXT_DATA__` script, then the state graph inside
fn load_state_graph(document: &Html) -> Option<StateGraph> {
    let selector = Selector::parse("script#__NEXT_DATA__").ok()?;
    let script = document.select(&selector).next()?;
    let raw = script.text().collect::<String>();

    let root: Value = match serde_json::from_str(&raw) {
        Ok(v) => v,
        Err(e) => {
            tracing::debug!(error = %e, "Failed to parse __NEXT_DATA__ payload");
            return None;
        }
    };

    let props = root.get("props")?;
    let state = props
        .get("pageProps")
        .and_then(|p| p.get("__APOLLO_STATE__"))
        .or_else(|| props.get("__APOLLO_STATE__"))?;

    state.as_object().cloned()
}

/// The listing node is keyed `Listing*:<id>`; take the first one
fn find_listing_node(state: &StateGraph) -> Option<&Value> {
    state.iter().find_map(|(key, value)| {
        let type_name = key.split(':').next()?;
        if type_name.starts_with("Listing") && value.is_object() {
            Some(value)
        } else {
            None
        }
    })
}

/// Follow a `{"__ref": "Type:id"}` value into the graph; pass through
/// inline objects unchanged
fn resolve<'a>(state: &'a StateGraph, value: &'a Value) -> Option<&'a Value> {
    if let Some(reference) = value.get("__ref").and_then(Value::as_str) {
        return state.get(reference);
    }
    if value.is_object() {
        return Some(value);
    }
    None
}

fn extract_price(state: &StateGraph, listing: &Value) -> Option<Price> {
    let node = resolve(state, listing.get("price")?)?;

    // Amounts are stored in minor currency units
    let amount = node.get("amount").and_then(Value::as_f64)? / 100.0;
    let original_amount = node
        .get("originalAmount")
        .and_then(Value::as_f64)
        .map(|cents| cents / 100.0);

    Some(Price {
        amount,
        currency: string_field(node, "currency"),
        original_amount,
    })
}

fn extract_location(state: &StateGraph, listing: &Value) -> Option<Location> {
    let node = resolve(state, listing.get("location")?)?;

    let name = string_field(node, "name");
    let address = string_field(node, "address");

    if name.is_none() && address.is_none() {
        return None;
    }

    Some(Location { name, address })
}

fn extract_images(listing: &Value) -> Option<Images> {
    let urls: Vec<String> = match listing.get("imageUrls") {
        Some(Value::Array(items)) => items
            .iter()
            .filter_map(|v| v.as_str())
            .map(str::to_string)
            .collect(),
        _ => match listing.get("images") {
            Some(Value::Array(items)) => items
                .iter()
                .filter_map(|v| v.get("url").and_then(Value::as_str))
                .map(str::to_string)
                .collect(),
            _ => return None,
        },
    };

    Some(Images {
        count: urls.len() as u32,
        urls,
    })
}

/// Walk the category reference chain leaf-to-root, then reverse so the path
/// reads root first
fn extract_category_path(state: &StateGraph, listing: &Value) -> Option<Vec<String>> {
    let start = listing.get("category")?;
    let mut node = resolve(state, start)?;
    let mut path = Vec::new();

    let mut visited = HashSet::new();
    if let Some(reference) = start.get("__ref").and_then(Value::as_str) {
        visited.insert(reference.to_string());
    }

    loop {
        if let Some(name) = category_display_name(node) {
            path.push(name);
        }

        let parent = match node.get("parent").or_else(|| node.get("parentCategory")) {
            Some(p) => p,
            None => break,
        };

        // Guard against reference cycles in a malformed graph
        if let Some(reference) = parent.get("__ref").and_then(Value::as_str) {
            if !visited.insert(reference.to_string()) {
                break;
            }
        }

        node = match resolve(state, parent) {
            Some(n) => n,
            None => break,
        };
    }

    if path.is_empty() {
        return None;
    }

    path.reverse();
    Some(path)
}

/// Category names may be plain strings or locale-keyed objects
fn category_display_name(node: &Value) -> Option<String> {
    match node.get("localizedName") {
        Some(Value::String(s)) if !s.trim().is_empty() => return Some(s.trim().to_string()),
        Some(Value::Object(locales)) => {
            if let Some(name) = locales.get("en").and_then(Value::as_str) {
                return Some(name.trim().to_string());
            }
        }
        _ => {}
    }
    string_field(node, "name")
}

fn extract_seller(state: &StateGraph, listing: &Value) -> Option<Seller> {
    let reference = listing.get("profile").or_else(|| listing.get("seller"))?;
    let node = resolve(state, reference)?;

    let has_profile_photo = node
        .get("hasProfilePhoto")
        .and_then(Value::as_bool)
        .unwrap_or_else(|| string_field(node, "photoUrl").is_some());

    Some(Seller {
        id: id_field(node),
        verified: node
            .get("verified")
            .and_then(Value::as_bool)
            .unwrap_or(false),
        seller_type: string_field(node, "sellerType"),
        name: string_field(node, "name"),
        number_of_listings: node
            .get("numberOfListings")
            .and_then(Value::as_u64)
            .map(|n| n as u32),
        has_profile_photo,
    })
}

fn extract_listing_meta(listing: &Value) -> Option<ListingMeta> {
    let meta = ListingMeta {
        id: id_field(listing),
        activation_date: date_field(listing, "activationDate"),
        end_date: date_field(listing, "endDate"),
        views: listing.get("viewCount").and_then(Value::as_u64),
        top_ad: listing.get("topAd").and_then(Value::as_bool).unwrap_or(false),
        ad_source: string_field(listing, "adSource"),
    };

    // The node always carries an id; a meta record with nothing else in it
    // still signals lifecycle data was absent
    if meta.id.is_none()
        && meta.activation_date.is_none()
        && meta.end_date.is_none()
        && meta.views.is_none()
        && !meta.top_ad
        && meta.ad_source.is_none()
    {
        return None;
    }

    Some(meta)
}

/// Listing attributes resolved to `(canonical_name, canonical_value)` pairs
fn collect_attributes(state: &StateGraph, listing: &Value) -> Vec<(String, String)> {
    let items = match listing.get("attributes") {
        Some(Value::Array(items)) => items,
        _ => return Vec::new(),
    };

    items
        .iter()
        .filter_map(|item| {
            let node = resolve(state, item)?;
            let name = string_field(node, "canonicalName").or_else(|| string_field(node, "name"))?;
            let value = match node.get("canonicalValues") {
                Some(Value::Array(values)) => values.first().and_then(Value::as_str)?.to_string(),
                _ => string_field(node, "value")?,
            };
            Some((name.to_lowercase(), value))
        })
        .collect()
}

fn attribute_value(attributes: &[(String, String)], name: &str) -> Option<String> {
    attributes
        .iter()
        .find(|(n, _)| n == name)
        .map(|(_, v)| v.clone())
}

/// Payment attributes are boolean-valued, stored as canonical strings
fn extract_payment(attributes: &[(String, String)]) -> Option<Payment> {
    let cash_accepted = attribute_value(attributes, "cashaccepted");
    let cashless = attribute_value(attributes, "cashless");
    let shipping = attribute_value(attributes, "shipping");

    if cash_accepted.is_none() && cashless.is_none() && shipping.is_none() {
        return None;
    }

    Some(Payment {
        cash_accepted: as_canonical_bool(cash_accepted),
        cashless: as_canonical_bool(cashless),
        shipping: as_canonical_bool(shipping),
    })
}

fn as_canonical_bool(value: Option<String>) -> bool {
    value.as_deref() == Some("true")
}

fn string_field(node: &Value, key: &str) -> Option<String> {
    let s = node.get(key)?.as_str()?.trim();
    if s.is_empty() {
        None
    } else {
        Some(s.to_string())
    }
}

/// Ids appear as strings or numbers depending on the node type
fn id_field(node: &Value) -> Option<String> {
    match node.get("id") {
        Some(Value::String(s)) => Some(s.clone()),
        Some(Value::Number(n)) => Some(n.to_string()),
        _ => None,
    }
}

fn date_field(node: &Value, key: &str) -> Option<DateTime<Utc>> {
    let raw = node.get(key)?.as_str()?;

    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }

    NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S")
        .ok()
        .map(|naive| DateTime::from_naive_utc_and_offset(naive, Utc))
}
