//! Quiz question bank
//!
//! A static ordered table mapping finding ids to multiple-choice questions.
//! Selection walks the table in order, picks entries whose trigger ids
//! intersect the detected findings, records which ids matched, and stops at
//! three questions.

use crate::model::{Finding, QuizFeedback, QuizOption, QuizQuestion};

const MAX_QUESTIONS: usize = 3;

struct BankEntry {
    trigger_ids: &'static [&'static str],
    id: &'static str,
    prompt: &'static str,
    options: &'static [(&'static str, &'static str)],
    correct_option_id: &'static str,
    correct_title: &'static str,
    correct_body: &'static str,
    incorrect_title: &'static str,
    incorrect_body: &'static str,
}

const QUIZ_BANK: &[BankEntry] = &[
    BankEntry {
        trigger_ids: &["request_deposit", "unusual_payment_method"],
        id: "q_deposit",
        prompt: "A seller asks you to send a deposit via e-transfer before meeting. What is the safest response?",
        options: &[
            ("a", "Send a small deposit to reserve it"),
            ("b", "Decline and propose meeting in a public place to pay in person"),
            ("c", "Send the deposit but ask for a receipt"),
        ],
        correct_option_id: "b",
        correct_title: "Strong critical thinking",
        correct_body: "Declining deposits and meeting in person reduces exposure to common prepayment scams.",
        incorrect_title: "Pause and reconsider",
        incorrect_body: "Sending money before seeing the item is one of the most common scam tactics. A receipt from a scammer is worthless.",
    },
    BankEntry {
        trigger_ids: &[
            "seller_unverified",
            "seller_no_photo",
            "seller_few_listings",
            "social_proof_absence",
        ],
        id: "q_seller",
        prompt: "You find a great deal from a seller with no profile photo and no verification. What should you do?",
        options: &[
            ("a", "It's probably fine, lots of people don't bother with profiles"),
            ("b", "Check their other listings and ask questions before committing"),
            ("c", "Ignore the profile and focus only on the item"),
        ],
        correct_option_id: "b",
        correct_title: "Good instinct",
        correct_body: "Verifying the seller's history and asking questions helps distinguish legitimate sellers from throwaway scam accounts.",
        incorrect_title: "Think again",
        incorrect_body: "Unverified accounts with no photo and few listings are a common pattern for disposable scam profiles.",
    },
    BankEntry {
        trigger_ids: &[
            "urgency_language",
            "urgency_bias",
            "scarcity_bias",
            "loss_aversion",
        ],
        id: "q_urgency",
        prompt: "A listing says \"Must sell today, first come first served!\" How should this affect your decision?",
        options: &[
            ("a", "Act quickly before someone else gets it"),
            ("b", "Recognize this as a pressure tactic and take extra time to verify"),
            ("c", "It means the seller is motivated, so offer a lower price"),
        ],
        correct_option_id: "b",
        correct_title: "Well spotted",
        correct_body: "Urgency language is designed to short-circuit careful thinking. Legitimate deals don't usually vanish in minutes.",
        incorrect_title: "Be careful",
        incorrect_body: "Scammers use urgency to pressure you into acting before you can verify the deal. A real seller will wait for a serious buyer.",
    },
    BankEntry {
        trigger_ids: &["contact_off_platform"],
        id: "q_offplatform",
        prompt: "A seller asks you to continue the conversation on WhatsApp instead of the platform. Why might this be risky?",
        options: &[
            ("a", "It's not risky, WhatsApp is just easier to use"),
            ("b", "Moving off-platform removes the safety net of the marketplace's records and protections"),
            ("c", "It only matters if they also ask for payment"),
        ],
        correct_option_id: "b",
        correct_title: "Correct",
        correct_body: "Marketplaces log conversations for dispute resolution. Scammers move off-platform to eliminate that evidence trail.",
        incorrect_title: "Think about it",
        incorrect_body: "Off-platform communication removes your ability to report the conversation and makes disputes much harder to resolve.",
    },
    BankEntry {
        trigger_ids: &[
            "price_drop_extreme",
            "free_or_near_free",
            "price_too_low",
            "anchoring_bias",
        ],
        id: "q_price",
        prompt: "An item normally worth $800 is listed for $200. What is the most important thing to consider?",
        options: &[
            ("a", "Jump on it, this is a rare bargain"),
            ("b", "Ask why the price is so low and verify the item exists before paying"),
            ("c", "It's probably just someone who needs quick cash"),
        ],
        correct_option_id: "b",
        correct_title: "Smart approach",
        correct_body: "Extreme discounts are the #1 lure in marketplace scams. Always verify before committing money.",
        incorrect_title: "Slow down",
        incorrect_body: "Prices far below market value are the most common bait in online scams. If it seems too good to be true, it usually is.",
    },
    BankEntry {
        trigger_ids: &["no_images", "single_image", "stock_photos_suspected"],
        id: "q_images",
        prompt: "A high-value listing has only one photo (or none). What does this suggest?",
        options: &[
            ("a", "The seller is just lazy about photos"),
            ("b", "Ask the seller for additional photos from different angles before proceeding"),
            ("c", "One photo is enough if the description is detailed"),
        ],
        correct_option_id: "b",
        correct_title: "Good thinking",
        correct_body: "Legitimate sellers of valuable items almost always provide multiple photos. Requesting more is a simple way to test authenticity.",
        incorrect_title: "Consider this",
        incorrect_body: "Scam listings often use a single stock photo or no images at all. Multiple original photos are a basic trust signal.",
    },
    BankEntry {
        trigger_ids: &["no_cash_accepted"],
        id: "q_cashless",
        prompt: "A seller insists on cashless payment only for an in-person item. What should you consider?",
        options: &[
            ("a", "Cashless is more convenient, just go ahead"),
            ("b", "Ask why cash isn't accepted and consider meeting at a safe location with a traceable payment method"),
            ("c", "It doesn't matter how you pay as long as you get the item"),
        ],
        correct_option_id: "b",
        correct_title: "Good awareness",
        correct_body: "Refusing cash for in-person sales can be a tactic to avoid traceable transactions or to use reversible payment methods.",
        incorrect_title: "Think twice",
        incorrect_body: "Sellers who refuse cash may be setting up payment fraud. Cash at a public meetup is often the safest option.",
    },
    BankEntry {
        trigger_ids: &[
            "vague_description",
            "description_mismatch",
            "excessive_shipping_language",
        ],
        id: "q_description",
        prompt: "A listing has a vague description that doesn't mention the item's condition or history. How should you proceed?",
        options: &[
            ("a", "The photos tell you everything you need to know"),
            ("b", "Ask the seller specific questions about condition, age, and reason for selling"),
            ("c", "A short description just means the seller is busy"),
        ],
        correct_option_id: "b",
        correct_title: "Smart move",
        correct_body: "Detailed questions help verify the seller actually has the item and knows its history. Scam listings often can't answer specifics.",
        incorrect_title: "Be cautious",
        incorrect_body: "Vague descriptions are a common tactic in scam listings. Legitimate sellers are usually happy to provide details.",
    },
    BankEntry {
        trigger_ids: &["too_good_to_be_true"],
        id: "q_toogood",
        prompt: "A deal seems almost too good to be true, with a great price, popular item, and motivated seller. What's the smartest move?",
        options: &[
            ("a", "Act fast before someone else grabs it"),
            ("b", "Slow down, verify the seller and item independently before committing"),
            ("c", "Trust your gut, if it feels like a deal it probably is"),
        ],
        correct_option_id: "b",
        correct_title: "Exactly right",
        correct_body: "Scammers engineer listings to feel irresistible. Pausing to verify is your strongest defense.",
        incorrect_title: "Hold on",
        incorrect_body: "When everything looks perfect, that's exactly when you should be most careful. Scams are designed to feel like great deals.",
    },
    BankEntry {
        trigger_ids: &["short_listing_duration", "promoted_cheap_item"],
        id: "q_listing",
        prompt: "A listing was posted recently and expires in just a few days, with a paid promotion on a cheap item. What might this suggest?",
        options: &[
            ("a", "The seller is just eager to sell quickly"),
            ("b", "Short durations and promotions on cheap items can be signs of a throwaway scam listing"),
            ("c", "Promoted listings are always more trustworthy"),
        ],
        correct_option_id: "b",
        correct_title: "Sharp observation",
        correct_body: "Scammers often create short-lived, promoted listings to maximize visibility before the listing is flagged or removed.",
        incorrect_title: "Look closer",
        incorrect_body: "Paying to promote a very cheap item is unusual for legitimate sellers. Combined with a short duration, this pattern is worth questioning.",
    },
    BankEntry {
        trigger_ids: &["authority_bias"],
        id: "q_authority",
        prompt: "A listing uses very professional language, brand-name dropping, and impressive credentials. Should you trust it more?",
        options: &[
            ("a", "Professional listings are always more reliable"),
            ("b", "Verify claims independently, as professional language can be used to build false trust"),
            ("c", "Only trust it if the seller is verified"),
        ],
        correct_option_id: "b",
        correct_title: "Well reasoned",
        correct_body: "Authority bias makes us trust professional-sounding content. Scammers exploit this by mimicking legitimate business language.",
        incorrect_title: "Reconsider",
        incorrect_body: "Polished language doesn't guarantee legitimacy. Scammers often use professional templates to appear trustworthy.",
    },
];

/// Select up to three questions whose trigger ids match the detected
/// findings, preserving bank order
pub fn select_questions(findings: &[Finding]) -> Vec<QuizQuestion> {
    let finding_ids: Vec<&str> = findings.iter().map(|f| f.id.as_str()).collect();
    let mut questions = Vec::new();

    for entry in QUIZ_BANK {
        if questions.len() >= MAX_QUESTIONS {
            break;
        }

        let matched: Vec<String> = entry
            .trigger_ids
            .iter()
            .filter(|id| finding_ids.contains(*id))
            .map(|id| id.to_string())
            .collect();

        if matched.is_empty() {
            continue;
        }

        questions.push(build_question(entry, matched));
    }

    questions
}

fn build_question(entry: &BankEntry, linked_finding_ids: Vec<String>) -> QuizQuestion {
    QuizQuestion {
        id: entry.id.to_string(),
        prompt: entry.prompt.to_string(),
        options: entry
            .options
            .iter()
            .map(|(id, text)| QuizOption {
                id: id.to_string(),
                text: text.to_string(),
            })
            .collect(),
        correct_option_id: entry.correct_option_id.to_string(),
        feedback: QuizFeedback {
            correct_title: entry.correct_title.to_string(),
            correct_body: entry.correct_body.to_string(),
            incorrect_title: entry.incorrect_title.to_string(),
            incorrect_body: entry.incorrect_body.to_string(),
        },
        linked_finding_ids,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{FindingType, Severity};

    fn finding(id: &str) -> Finding {
        Finding {
            id: id.to_string(),
            finding_type: FindingType::RedFlag,
            header: String::new(),
            summary: String::new(),
            explanation: String::new(),
            severity: Severity::Low,
        }
    }

    #[test]
    fn no_findings_selects_nothing() {
        assert!(select_questions(&[]).is_empty());
    }

    #[test]
    fn selection_follows_bank_order_and_caps_at_three() {
        // Findings matching five different bank entries
        let findings = vec![
            finding("too_good_to_be_true"),
            finding("no_cash_accepted"),
            finding("contact_off_platform"),
            finding("urgency_language"),
            finding("request_deposit"),
        ];

        let questions = select_questions(&findings);
        assert_eq!(questions.len(), 3);

        // Bank order, not finding order
        let ids: Vec<&str> = questions.iter().map(|q| q.id.as_str()).collect();
        assert_eq!(ids, vec!["q_deposit", "q_urgency", "q_offplatform"]);
    }

    #[test]
    fn matched_ids_are_recorded() {
        let findings = vec![
            finding("request_deposit"),
            finding("unusual_payment_method"),
        ];

        let questions = select_questions(&findings);
        assert_eq!(questions.len(), 1);
        assert_eq!(
            questions[0].linked_finding_ids,
            vec!["request_deposit", "unusual_payment_method"]
        );
    }

    #[test]
    fn cognitive_bias_ids_trigger_questions() {
        let findings = vec![finding("anchoring_bias")];
        let questions = select_questions(&findings);
        assert_eq!(questions.len(), 1);
        assert_eq!(questions[0].id, "q_price");
        assert_eq!(questions[0].linked_finding_ids, vec!["anchoring_bias"]);
    }
}
