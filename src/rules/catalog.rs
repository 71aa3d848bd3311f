//! Deterministic rule catalog
//!
//! A versioned table of rule definitions, kept separate from the evaluation
//! loop so each rule is independently testable. The label, summary, and
//! description are the client-facing texts used when a triggered flag is
//! converted into a finding; evidence produced by the checks never reaches
//! the client.

use crate::model::Severity;

pub const CATALOG_VERSION: u32 = 1;

/// One deterministic rule definition
#[derive(Debug, Clone, Copy)]
pub struct RuleDefinition {
    pub id: &'static str,
    pub severity: Severity,
    /// Finding header
    pub label: &'static str,
    /// One-line finding summary
    pub summary: &'static str,
    /// Finding explanation
    pub description: &'static str,
}

pub const RULE_CATALOG: &[RuleDefinition] = &[
    RuleDefinition {
        id: "price_drop_extreme",
        severity: Severity::High,
        label: "Extreme price drop",
        summary: "The price is cut by more than 60% from the original.",
        description: "Discounts this deep are the most common bait in marketplace scams. \
                      A legitimate seller rarely gives up more than half an item's value; \
                      verify the item exists before committing money.",
    },
    RuleDefinition {
        id: "free_or_near_free",
        severity: Severity::Medium,
        label: "Free or near-free item",
        summary: "The asking price is at or below $10.",
        description: "Token prices are used to attract a flood of replies or to lure buyers \
                      into paying fees or deposits on an item that does not exist.",
    },
    RuleDefinition {
        id: "seller_unverified",
        severity: Severity::Low,
        label: "Unverified seller",
        summary: "The seller's account is not verified by the platform.",
        description: "An unverified account is not proof of a scam, but throwaway scam \
                      profiles are almost never verified. Weigh it together with the \
                      seller's history and photos.",
    },
    RuleDefinition {
        id: "seller_no_photo",
        severity: Severity::Low,
        label: "No seller profile photo",
        summary: "The seller has no profile photo.",
        description: "Disposable accounts are usually created in a hurry and skip profile \
                      details. Combined with few listings and no verification, this is a \
                      common scam-account pattern.",
    },
    RuleDefinition {
        id: "seller_few_listings",
        severity: Severity::Medium,
        label: "Very few seller listings",
        summary: "The seller has two or fewer active listings.",
        description: "Scam accounts are typically short-lived and carry only one or two \
                      listings. Established sellers accumulate history.",
    },
    RuleDefinition {
        id: "no_images",
        severity: Severity::Medium,
        label: "No photos",
        summary: "The listing has no photos at all.",
        description: "Legitimate sellers almost always photograph the actual item. A \
                      photo-less listing gives you nothing to verify against.",
    },
    RuleDefinition {
        id: "single_image",
        severity: Severity::Low,
        label: "Single photo only",
        summary: "The listing has exactly one photo.",
        description: "One photo is often a stock or stolen image. Ask for additional \
                      photos from different angles before proceeding.",
    },
    RuleDefinition {
        id: "no_cash_accepted",
        severity: Severity::Medium,
        label: "Cash not accepted",
        summary: "The seller accepts cashless payment but refuses cash.",
        description: "Refusing cash for an in-person sale can be a setup for reversible \
                      or untraceable payment fraud.",
    },
    RuleDefinition {
        id: "short_listing_duration",
        severity: Severity::Low,
        label: "Short listing duration",
        summary: "The listing runs for less than a week.",
        description: "Scam listings are often configured to disappear quickly, before \
                      they can be reported or flagged.",
    },
    RuleDefinition {
        id: "promoted_cheap_item",
        severity: Severity::Medium,
        label: "Promoted low-value item",
        summary: "The seller paid to promote an item priced under $50.",
        description: "Paying promotion fees on a very cheap item rarely makes economic \
                      sense for a real seller; it does for a scammer maximizing reach.",
    },
    RuleDefinition {
        id: "urgency_language",
        severity: Severity::Medium,
        label: "Urgency pressure",
        summary: "The listing pressures you to act immediately.",
        description: "Urgency language is designed to short-circuit careful thinking. \
                      Legitimate deals don't usually vanish in minutes.",
    },
    RuleDefinition {
        id: "contact_off_platform",
        severity: Severity::High,
        label: "Off-platform contact request",
        summary: "The listing asks you to communicate outside the platform.",
        description: "Marketplaces log conversations for dispute resolution. Moving to \
                      email, phone, or a messaging app removes that evidence trail.",
    },
    RuleDefinition {
        id: "request_deposit",
        severity: Severity::High,
        label: "Deposit requested",
        summary: "The seller asks for payment or a deposit before meeting.",
        description: "Sending money before seeing the item is one of the most common \
                      prepayment scams. Decline and propose paying in person.",
    },
    RuleDefinition {
        id: "unusual_payment_method",
        severity: Severity::High,
        label: "Unusual payment method",
        summary: "The listing mentions hard-to-trace payment methods.",
        description: "Gift cards, wire transfers, and cryptocurrency are irreversible and \
                      effectively untraceable, which is exactly why scammers ask for them.",
    },
];

/// Look up a catalog entry by id
pub fn find(id: &str) -> Option<&'static RuleDefinition> {
    RULE_CATALOG.iter().find(|def| def.id == id)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn catalog_ids_are_unique() {
        let mut seen = std::collections::HashSet::new();
        for def in RULE_CATALOG {
            assert!(seen.insert(def.id), "duplicate rule id: {}", def.id);
        }
    }

    #[test]
    fn find_resolves_known_ids() {
        assert!(find("price_drop_extreme").is_some());
        assert!(find("nonexistent_rule").is_none());
    }
}
