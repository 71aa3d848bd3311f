//! Deterministic rule engine
//!
//! Evaluates the rule catalog against a normalized listing. No AI involved;
//! the output flags are facts handed to the subjective analyzer so it never
//! re-evaluates them.

mod catalog;
mod checks;

pub use catalog::{find, RuleDefinition, CATALOG_VERSION, RULE_CATALOG};

use crate::model::{Finding, FindingType, ListingData, RuleFlag};

type CheckFn = fn(&ListingData) -> Option<String>;

/// Map a catalog id to its check function
///
/// A catalog entry without an implemented check is skipped by evaluation,
/// not treated as an error.
fn check_for(id: &str) -> Option<CheckFn> {
    match id {
        "price_drop_extreme" => Some(checks::price_drop_extreme),
        "free_or_near_free" => Some(checks::free_or_near_free),
        "seller_unverified" => Some(checks::seller_unverified),
        "seller_no_photo" => Some(checks::seller_no_photo),
        "seller_few_listings" => Some(checks::seller_few_listings),
        "no_images" => Some(checks::no_images),
        "single_image" => Some(checks::single_image),
        "no_cash_accepted" => Some(checks::no_cash_accepted),
        "short_listing_duration" => Some(checks::short_listing_duration),
        "promoted_cheap_item" => Some(checks::promoted_cheap_item),
        "urgency_language" => Some(checks::urgency_language),
        "contact_off_platform" => Some(checks::contact_off_platform),
        "request_deposit" => Some(checks::request_deposit),
        "unusual_payment_method" => Some(checks::unusual_payment_method),
        _ => None,
    }
}

/// Run every catalog rule against the listing
///
/// Returns the triggered flags in catalog order; never errors on missing
/// sub-fields.
pub fn evaluate(listing: &ListingData) -> Vec<RuleFlag> {
    let flags: Vec<RuleFlag> = RULE_CATALOG
        .iter()
        .filter_map(|def| {
            let check = check_for(def.id)?;
            check(listing).map(|evidence| RuleFlag {
                id: def.id,
                severity: def.severity,
                evidence,
            })
        })
        .collect();

    tracing::debug!(
        catalog_version = CATALOG_VERSION,
        flag_count = flags.len(),
        "Rule evaluation complete"
    );
    flags
}

/// Convert a triggered flag into a client-facing finding
///
/// Header, summary, and explanation come from the catalog; the flag's
/// evidence is dropped here and never serialized.
pub fn finding_for(flag: &RuleFlag) -> Finding {
    // Flags originate from the catalog, so the lookup always succeeds; fall
    // back to the id to stay total
    let (label, summary, description) = match find(flag.id) {
        Some(def) => (def.label, def.summary, def.description),
        None => (flag.id, flag.id, flag.id),
    };

    Finding {
        id: flag.id.to_string(),
        finding_type: FindingType::RedFlag,
        header: label.to_string(),
        summary: summary.to_string(),
        explanation: description.to_string(),
        severity: flag.severity,
    }
}
