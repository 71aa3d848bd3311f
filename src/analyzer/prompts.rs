//! Prompts for subjective listing analysis

use crate::model::{ListingData, RuleFlag};

/// System prompt fixing the analysis contract and scoring rubric
pub const ANALYSIS_SYSTEM_PROMPT: &str = r#"You are a scam detection analyst for online marketplace listings. Your job is to evaluate listings for subjective red flags and cognitive biases that automated checks cannot detect.

INPUT FORMAT:
You will receive a message with these sections:
1. LISTING DATA - listing details (title, description, price, category, condition, location, images, seller profile, listing metadata, payment info). Some fields may say "Not available".
2. PRE-FLAGGED FINDINGS - red flags already confirmed by deterministic checks. These are facts. Do NOT re-evaluate or contradict them. Factor their severity into your risk score.
3. SUBJECTIVE FLAG DEFINITIONS - red flags for you to evaluate against the listing. Only flag what you find genuine evidence for.
4. USER CONTEXT - optional note from the user about their situation or concerns.

SCORING RULES:
- Your risk score (0-100) must account for ALL findings: both the pre-flagged findings AND your own findings.
- Severity weights: high = 20-30 points, medium = 10-15 points, low = 3-7 points.
- Risk levels: 0-33 = "low", 34-66 = "medium", 67-100 = "high".
- Ensure risk.level matches the score thresholds above. The score is the source of truth.
- Cap the score at 100.

COGNITIVE BIASES TO DETECT:
Look for these psychological manipulation tactics in the listing:
- Scarcity bias (scarcity_bias): "Only one left", "rare find", "won't last" - creating artificial scarcity.
- Urgency bias (urgency_bias): "Must sell today", "moving tomorrow", "act fast" - pressuring quick action.
- Anchoring bias (anchoring_bias): Showing a high original price next to a low current price to make the deal seem better than it is.
- Authority bias (authority_bias): Overly professional language, brand-name dropping, or credentials to build unearned trust.
- Social proof absence (social_proof_absence): No reviews, no seller history, no verification - the absence of trust signals.
- Loss aversion (loss_aversion): "Someone else is interested", "don't miss out" - fear of missing the deal.

CONSTRAINTS:
- Return 2-6 findings (your own findings only). Do not include the pre-flagged findings - they are handled separately.
- Findings can be "red_flag" type (from SUBJECTIVE FLAG DEFINITIONS) or "cognitive_bias" type.
- Only flag something if you have genuine evidence from the listing data. Do not invent evidence.
- Generate 2-4 reflection prompts tailored to the specific red flags and biases found in THIS listing.
- Do NOT re-evaluate or duplicate the pre-flagged findings. They are confirmed facts."#;

/// Subjective flag definitions injected into the prompt; evaluated by the
/// model, never by the rule engine
pub const SUBJECTIVE_FLAGS: &[(&str, &str)] = &[
    (
        "price_too_low",
        "Price significantly below market value for the item category",
    ),
    (
        "vague_description",
        "Description lacks specific details about the item's condition or history",
    ),
    (
        "too_good_to_be_true",
        "Offer seems unrealistically favorable",
    ),
    (
        "stock_photos_suspected",
        "Images appear to be stock or manufacturer photos rather than the actual item",
    ),
    (
        "description_mismatch",
        "Description contradicts the title, price, or photos",
    ),
];

/// Build the user message from listing data, confirmed flags, subjective
/// flag definitions, and optional user context
pub fn build_analysis_prompt(
    listing: &ListingData,
    rule_flags: &[RuleFlag],
    user_context: Option<&str>,
) -> String {
    let mut prompt = String::from("## LISTING DATA\n");

    push_field(&mut prompt, "Title", listing.title.as_deref());
    push_field(&mut prompt, "Description", listing.description.as_deref());

    match &listing.price {
        Some(price) => {
            let currency = price.currency.as_deref().unwrap_or("");
            prompt.push_str(&format!("Price: {:.2} {}\n", price.amount, currency));
            if let Some(original) = price.original_amount {
                prompt.push_str(&format!("Original price: {:.2} {}\n", original, currency));
            }
        }
        None => prompt.push_str("Price: Not available\n"),
    }

    push_field(
        &mut prompt,
        "Category",
        listing.category.as_ref().map(|c| c.join(" > ")).as_deref(),
    );
    push_field(&mut prompt, "Condition", listing.condition.as_deref());
    push_field(
        &mut prompt,
        "Location",
        listing.location.as_ref().and_then(|l| l.name.as_deref()),
    );
    push_field(
        &mut prompt,
        "Images",
        listing
            .images
            .as_ref()
            .map(|i| format!("{} image(s)", i.count))
            .as_deref(),
    );

    match &listing.seller {
        Some(seller) => {
            prompt.push_str(&format!(
                "Seller: name={}, verified={}, profile photo={}, active listings={}\n",
                seller.name.as_deref().unwrap_or("Not available"),
                seller.verified,
                seller.has_profile_photo,
                seller
                    .number_of_listings
                    .map(|n| n.to_string())
                    .unwrap_or_else(|| "Not available".to_string()),
            ));
        }
        None => prompt.push_str("Seller: Not available\n"),
    }

    match &listing.listing_meta {
        Some(meta) => {
            prompt.push_str(&format!(
                "Listing metadata: posted={}, expires={}, views={}, promoted={}\n",
                meta.activation_date
                    .map(|d| d.to_rfc3339())
                    .unwrap_or_else(|| "Not available".to_string()),
                meta.end_date
                    .map(|d| d.to_rfc3339())
                    .unwrap_or_else(|| "Not available".to_string()),
                meta.views
                    .map(|v| v.to_string())
                    .unwrap_or_else(|| "Not available".to_string()),
                meta.top_ad,
            ));
        }
        None => prompt.push_str("Listing metadata: Not available\n"),
    }

    match &listing.payment {
        Some(payment) => prompt.push_str(&format!(
            "Payment: cash={}, cashless={}, shipping={}\n",
            payment.cash_accepted, payment.cashless, payment.shipping
        )),
        None => prompt.push_str("Payment: Not available\n"),
    }

    prompt.push_str("\n## PRE-FLAGGED FINDINGS\n");
    if rule_flags.is_empty() {
        prompt.push_str("None.\n");
    } else {
        prompt.push_str(
            "Already confirmed by deterministic checks; do not re-evaluate:\n",
        );
        for flag in rule_flags {
            prompt.push_str(&format!(
                "- {} (severity: {:?}): {}\n",
                flag.id, flag.severity, flag.evidence
            ));
        }
    }

    prompt.push_str("\n## SUBJECTIVE FLAG DEFINITIONS\n");
    for (id, description) in SUBJECTIVE_FLAGS {
        prompt.push_str(&format!("- {}: {}\n", id, description));
    }

    prompt.push_str("\n## USER CONTEXT\n");
    match user_context {
        Some(context) => prompt.push_str(context),
        None => prompt.push_str("None provided."),
    }
    prompt.push('\n');

    prompt
}

fn push_field(prompt: &mut String, label: &str, value: Option<&str>) {
    prompt.push_str(&format!(
        "{}: {}\n",
        label,
        value.unwrap_or("Not available")
    ));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Severity;

    #[test]
    fn prompt_carries_all_sections() {
        let listing = ListingData {
            title: Some("iPhone 15".to_string()),
            ..ListingData::default()
        };
        let flags = vec![RuleFlag {
            id: "request_deposit",
            severity: Severity::High,
            evidence: "matched phrases: \"pay first\"".to_string(),
        }];

        let prompt = build_analysis_prompt(&listing, &flags, Some("buying for my daughter"));

        assert!(prompt.contains("## LISTING DATA"));
        assert!(prompt.contains("Title: iPhone 15"));
        assert!(prompt.contains("Description: Not available"));
        assert!(prompt.contains("## PRE-FLAGGED FINDINGS"));
        assert!(prompt.contains("request_deposit"));
        assert!(prompt.contains("matched phrases: \"pay first\""));
        assert!(prompt.contains("## SUBJECTIVE FLAG DEFINITIONS"));
        assert!(prompt.contains("price_too_low"));
        assert!(prompt.contains("buying for my daughter"));
    }

    #[test]
    fn prompt_marks_empty_flags_and_context() {
        let prompt = build_analysis_prompt(&ListingData::default(), &[], None);
        assert!(prompt.contains("None.\n"));
        assert!(prompt.contains("None provided."));
    }
}
