//! Deterministic check functions
//!
//! Each function inspects one aspect of a listing and returns evidence text
//! when the rule triggers, `None` otherwise. A missing sub-structure (no
//! price, no seller, and so on) makes the check report "not triggered",
//! never an error. Evidence is deterministic for a given listing and names
//! the exact values or phrases that matched.

use chrono::Duration;
use regex::Regex;
use std::sync::LazyLock;

use crate::model::ListingData;

const PRICE_DROP_THRESHOLD_PCT: f64 = 60.0;
const NEAR_FREE_THRESHOLD: f64 = 10.0;
const FEW_LISTINGS_THRESHOLD: u32 = 2;
const CHEAP_PROMOTION_THRESHOLD: f64 = 50.0;
const SHORT_DURATION_DAYS: i64 = 7;

const URGENCY_PHRASES: &[&str] = &[
    "must sell today",
    "first come first served",
    "won't last",
    "act fast",
    "moving sale",
    "need gone asap",
    "today only",
    "serious buyers only",
];

const OFF_PLATFORM_KEYWORDS: &[&str] = &[
    "text me",
    "whatsapp",
    "call me",
    "email me",
    "dm on instagram",
    "telegram",
];

const DEPOSIT_PHRASES: &[&str] = &[
    "deposit required",
    "e-transfer before",
    "send payment",
    "pay first",
    "etransfer to hold",
];

const UNUSUAL_PAYMENT_KEYWORDS: &[&str] = &[
    "gift card",
    "crypto",
    "bitcoin",
    "wire transfer",
    "western union",
    "moneygram",
    "zelle",
];

static EMAIL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"[a-z0-9._%+-]+@[a-z0-9.-]+\.[a-z]{2,}").unwrap()
});

static PHONE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(\+?1[\s.-]?)?\(?\d{3}\)?[\s.-]?\d{3}[\s.-]?\d{4}\b").unwrap()
});

pub fn price_drop_extreme(listing: &ListingData) -> Option<String> {
    let price = listing.price.as_ref()?;
    let original = price.original_amount?;

    if original <= 0.0 {
        return None;
    }

    let drop_pct = (original - price.amount) / original * 100.0;
    if drop_pct > PRICE_DROP_THRESHOLD_PCT {
        Some(format!(
            "price dropped {:.1}% from ${:.2} to ${:.2}",
            drop_pct, original, price.amount
        ))
    } else {
        None
    }
}

pub fn free_or_near_free(listing: &ListingData) -> Option<String> {
    let price = listing.price.as_ref()?;

    if price.amount <= NEAR_FREE_THRESHOLD {
        Some(format!(
            "listed at ${:.2}, at or below the ${:.0} threshold",
            price.amount, NEAR_FREE_THRESHOLD
        ))
    } else {
        None
    }
}

pub fn seller_unverified(listing: &ListingData) -> Option<String> {
    let seller = listing.seller.as_ref()?;

    if !seller.verified {
        Some("seller account is not verified".to_string())
    } else {
        None
    }
}

pub fn seller_no_photo(listing: &ListingData) -> Option<String> {
    let seller = listing.seller.as_ref()?;

    if !seller.has_profile_photo {
        Some("seller has no profile photo".to_string())
    } else {
        None
    }
}

pub fn seller_few_listings(listing: &ListingData) -> Option<String> {
    let count = listing.seller.as_ref()?.number_of_listings?;

    if count <= FEW_LISTINGS_THRESHOLD {
        Some(format!("seller has only {} active listing(s)", count))
    } else {
        None
    }
}

pub fn no_images(listing: &ListingData) -> Option<String> {
    let images = listing.images.as_ref()?;

    if images.count == 0 {
        Some("listing has no images".to_string())
    } else {
        None
    }
}

pub fn single_image(listing: &ListingData) -> Option<String> {
    let images = listing.images.as_ref()?;

    if images.count == 1 {
        Some("listing has exactly one image".to_string())
    } else {
        None
    }
}

pub fn no_cash_accepted(listing: &ListingData) -> Option<String> {
    let payment = listing.payment.as_ref()?;

    if payment.cashless && !payment.cash_accepted {
        Some("cashless payment accepted but cash is not".to_string())
    } else {
        None
    }
}

pub fn short_listing_duration(listing: &ListingData) -> Option<String> {
    let meta = listing.listing_meta.as_ref()?;
    let start = meta.activation_date?;
    let end = meta.end_date?;

    let duration = end - start;
    if duration >= Duration::zero() && duration < Duration::days(SHORT_DURATION_DAYS) {
        Some(format!(
            "listing runs for only {} day(s)",
            duration.num_days()
        ))
    } else {
        None
    }
}

pub fn promoted_cheap_item(listing: &ListingData) -> Option<String> {
    let meta = listing.listing_meta.as_ref()?;
    let price = listing.price.as_ref()?;

    if meta.top_ad && price.amount < CHEAP_PROMOTION_THRESHOLD {
        Some(format!(
            "paid promotion on an item priced at ${:.2}",
            price.amount
        ))
    } else {
        None
    }
}

pub fn urgency_language(listing: &ListingData) -> Option<String> {
    let text = searchable_text(listing)?;
    let matched = matched_phrases(&text, URGENCY_PHRASES);

    if matched.is_empty() {
        None
    } else {
        Some(format!("matched phrases: {}", quote_list(&matched)))
    }
}

pub fn contact_off_platform(listing: &ListingData) -> Option<String> {
    let text = searchable_text(listing)?;

    let mut indicators = Vec::new();
    if EMAIL_RE.is_match(&text) {
        indicators.push("email address present".to_string());
    }
    if PHONE_RE.is_match(&text) {
        indicators.push("phone number present".to_string());
    }
    for phrase in matched_phrases(&text, OFF_PLATFORM_KEYWORDS) {
        indicators.push(format!("\"{}\"", phrase));
    }

    if indicators.is_empty() {
        None
    } else {
        Some(format!("off-platform contact: {}", indicators.join(", ")))
    }
}

pub fn request_deposit(listing: &ListingData) -> Option<String> {
    let text = searchable_text(listing)?;
    let matched = matched_phrases(&text, DEPOSIT_PHRASES);

    if matched.is_empty() {
        None
    } else {
        Some(format!("matched phrases: {}", quote_list(&matched)))
    }
}

pub fn unusual_payment_method(listing: &ListingData) -> Option<String> {
    let text = searchable_text(listing)?;
    let matched = matched_phrases(&text, UNUSUAL_PAYMENT_KEYWORDS);

    if matched.is_empty() {
        None
    } else {
        Some(format!("mentions: {}", quote_list(&matched)))
    }
}

/// Title and description concatenated, lower-cased, smart quotes normalized
fn searchable_text(listing: &ListingData) -> Option<String> {
    let title = listing.title.as_deref().unwrap_or("");
    let description = listing.description.as_deref().unwrap_or("");

    if title.is_empty() && description.is_empty() {
        return None;
    }

    let combined = format!("{} {}", title, description).to_lowercase();
    Some(
        combined
            .replace(['\u{2018}', '\u{2019}'], "'")
            .replace(['\u{201C}', '\u{201D}'], "\""),
    )
}

fn matched_phrases(text: &str, phrases: &[&'static str]) -> Vec<&'static str> {
    phrases
        .iter()
        .copied()
        .filter(|phrase| text.contains(phrase))
        .collect()
}

fn quote_list(phrases: &[&str]) -> String {
    phrases
        .iter()
        .map(|p| format!("\"{}\"", p))
        .collect::<Vec<_>>()
        .join(", ")
}
