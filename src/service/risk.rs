//! Risk synthesis helpers
//!
//! Fallback scoring from rule flags alone, level correction through the
//! shared threshold rule, and presentation ordering of findings.

use std::cmp::Reverse;

use crate::model::{Finding, RiskAssessment, RiskLevel, RuleFlag, Severity};

/// Fixed per-severity point weights for the deterministic fallback score
const WEIGHT_HIGH: u32 = 18;
const WEIGHT_MEDIUM: u32 = 8;
const WEIGHT_LOW: u32 = 3;

/// Summary used when the subjective analyzer could not be reached
pub const FALLBACK_SUMMARY: &str = "External analysis was unavailable. This score reflects \
     automated deterministic checks only; treat it as a lower bound and review the listing \
     carefully yourself.";

/// Compute a risk assessment from rule flags alone
///
/// Used when the subjective analyzer fails for any reason; the request
/// still succeeds with this deterministic score.
pub fn fallback_assessment(flags: &[RuleFlag]) -> RiskAssessment {
    let total: u32 = flags
        .iter()
        .map(|flag| match flag.severity {
            Severity::High => WEIGHT_HIGH,
            Severity::Medium => WEIGHT_MEDIUM,
            Severity::Low => WEIGHT_LOW,
        })
        .sum();

    let score = total.min(100) as u8;

    RiskAssessment {
        score,
        level: RiskLevel::from_score(score),
        summary: FALLBACK_SUMMARY.to_string(),
    }
}

/// Force the level to agree with the score
///
/// The external analyzer supplies its own level, but the score is always
/// authoritative.
pub fn correct_level(mut risk: RiskAssessment) -> RiskAssessment {
    risk.level = RiskLevel::from_score(risk.score);
    risk
}

/// Order findings high to medium to low for presentation
///
/// The sort is stable, so ties keep catalog/arrival order. Ordering never
/// affects the score.
pub fn sort_findings(findings: &mut [Finding]) {
    findings.sort_by_key(|f| Reverse(f.severity));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::FindingType;

    fn flag(id: &'static str, severity: Severity) -> RuleFlag {
        RuleFlag {
            id,
            severity,
            evidence: String::new(),
        }
    }

    fn finding(id: &str, severity: Severity) -> Finding {
        Finding {
            id: id.to_string(),
            finding_type: FindingType::RedFlag,
            header: String::new(),
            summary: String::new(),
            explanation: String::new(),
            severity,
        }
    }

    #[test]
    fn fallback_sums_fixed_weights() {
        let flags = vec![
            flag("a", Severity::High),
            flag("b", Severity::Medium),
            flag("c", Severity::Low),
            flag("d", Severity::Low),
        ];

        let risk = fallback_assessment(&flags);
        assert_eq!(risk.score, 18 + 8 + 3 + 3);
        assert_eq!(risk.level, RiskLevel::Low);
        assert_eq!(risk.summary, FALLBACK_SUMMARY);
    }

    #[test]
    fn fallback_caps_at_one_hundred() {
        let flags: Vec<RuleFlag> = (0..10).map(|_| flag("x", Severity::High)).collect();

        let risk = fallback_assessment(&flags);
        assert_eq!(risk.score, 100);
        assert_eq!(risk.level, RiskLevel::High);
    }

    #[test]
    fn fallback_with_no_flags_is_low() {
        let risk = fallback_assessment(&[]);
        assert_eq!(risk.score, 0);
        assert_eq!(risk.level, RiskLevel::Low);
    }

    #[test]
    fn level_correction_overrides_supplied_level() {
        let risk = correct_level(RiskAssessment {
            score: 80,
            level: RiskLevel::Low,
            summary: "s".to_string(),
        });
        assert_eq!(risk.level, RiskLevel::High);
    }

    #[test]
    fn sort_is_stable_within_severity() {
        let mut findings = vec![
            finding("low_1", Severity::Low),
            finding("high_1", Severity::High),
            finding("med_1", Severity::Medium),
            finding("high_2", Severity::High),
            finding("med_2", Severity::Medium),
        ];

        sort_findings(&mut findings);

        let ids: Vec<&str> = findings.iter().map(|f| f.id.as_str()).collect();
        assert_eq!(ids, vec!["high_1", "high_2", "med_1", "med_2", "low_1"]);
    }
}
