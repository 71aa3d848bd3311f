//! Risk synthesis orchestrator
//!
//! Runs one listing analysis end to end: cache check, extraction, rule
//! evaluation, subjective analysis, merge and score, cache write. Strictly
//! sequential; the only suspension points are the page fetch and the
//! analyzer call. Analyzer failures are absorbed by the deterministic
//! fallback and never fail the request.

use std::sync::Arc;

use url::Url;
use uuid::Uuid;

use crate::analyzer::SubjectiveAnalyzer;
use crate::extractor::{self, FetchError, ListingFetcher};
use crate::model::{AnalysisResult, Finding, Quiz, Source};
use crate::rules;
use crate::service::cache::AnalysisCache;
use crate::service::{quiz, risk};

#[derive(Debug, thiserror::Error)]
pub enum AnalysisError {
    /// No extraction tier produced a title, description, or price
    #[error("Could not extract listing data from the provided URL")]
    UnsupportedSource,

    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Validated analysis request, produced at the API boundary
#[derive(Debug, Clone)]
pub struct AnalysisRequest {
    pub url: Url,
    /// Cache key: trimmed, lower-cased host, no trailing slash
    pub normalized_url: String,
    pub platform: String,
    pub user_context: Option<String>,
}

/// Orchestrates the full analysis pipeline
pub struct AnalysisService {
    fetcher: Arc<dyn ListingFetcher>,
    analyzer: Arc<dyn SubjectiveAnalyzer>,
    cache: AnalysisCache,
}

impl AnalysisService {
    pub fn new(
        fetcher: Arc<dyn ListingFetcher>,
        analyzer: Arc<dyn SubjectiveAnalyzer>,
        cache: AnalysisCache,
    ) -> Self {
        Self {
            fetcher,
            analyzer,
            cache,
        }
    }

    /// Analyze one listing, or return the cached result for its URL
    pub async fn analyze(&self, request: AnalysisRequest) -> Result<AnalysisResult, AnalysisError> {
        if let Some(cached) = self.cache.get(&request.normalized_url) {
            tracing::info!(url = %request.normalized_url, "Returning cached analysis");
            return Ok(cached);
        }

        let html = self.fetcher.fetch(&request.url).await?;

        let listing = extractor::extract(&html);
        if !listing.has_core_fields() {
            tracing::warn!(url = %request.normalized_url, "No extraction tier produced core fields");
            return Err(AnalysisError::UnsupportedSource);
        }

        let flags = rules::evaluate(&listing);
        let mut findings: Vec<Finding> = flags.iter().map(rules::finding_for).collect();

        let (risk_assessment, external_findings, reflection_prompts) = match self
            .analyzer
            .analyze(&listing, &flags, request.user_context.as_deref())
            .await
        {
            Ok(analysis) => {
                tracing::info!(
                    url = %request.normalized_url,
                    score = analysis.risk.score,
                    finding_count = analysis.findings.len(),
                    "Subjective analysis succeeded"
                );
                (
                    risk::correct_level(analysis.risk),
                    analysis.findings,
                    analysis.reflection_prompts,
                )
            }
            Err(e) => {
                tracing::warn!(
                    url = %request.normalized_url,
                    error = %e,
                    "Subjective analysis failed, falling back to rule-based score"
                );
                (risk::fallback_assessment(&flags), Vec::new(), Vec::new())
            }
        };

        findings.extend(external_findings);
        risk::sort_findings(&mut findings);

        let questions = quiz::select_questions(&findings);

        let result = AnalysisResult {
            analysis_id: format!("an_{}", Uuid::new_v4()),
            created_at: chrono::Utc::now(),
            source: Source {
                platform: request.platform,
                url: request.url.to_string(),
            },
            listing,
            risk: risk_assessment,
            findings,
            reflection_prompts,
            quiz: Quiz { questions },
        };

        self.cache.set(&request.normalized_url, result.clone());

        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use chrono::Duration;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use crate::analyzer::{AnalyzerError, SubjectiveAnalysis};
    use crate::model::{
        FindingType, ListingData, ReflectionPrompt, RiskAssessment, RiskLevel, RuleFlag, Severity,
    };
    use crate::service::cache::test_support::ManualClock;

    /// Serves a fixed document and counts fetches
    struct StaticFetcher {
        html: String,
        calls: AtomicUsize,
    }

    impl StaticFetcher {
        fn new(html: &str) -> Self {
            Self {
                html: html.to_string(),
                calls: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait]
    impl ListingFetcher for StaticFetcher {
        async fn fetch(&self, _url: &Url) -> Result<String, FetchError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(self.html.clone())
        }
    }

    struct FailingFetcher;

    #[async_trait]
    impl ListingFetcher for FailingFetcher {
        async fn fetch(&self, _url: &Url) -> Result<String, FetchError> {
            Err(FetchError::Timeout)
        }
    }

    /// Deterministic analyzer double; counts calls, optionally fails
    struct StubAnalyzer {
        response: Result<SubjectiveAnalysis, fn() -> AnalyzerError>,
        calls: AtomicUsize,
    }

    impl StubAnalyzer {
        fn succeeding(analysis: SubjectiveAnalysis) -> Self {
            Self {
                response: Ok(analysis),
                calls: AtomicUsize::new(0),
            }
        }

        fn failing(error: fn() -> AnalyzerError) -> Self {
            Self {
                response: Err(error),
                calls: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait]
    impl SubjectiveAnalyzer for StubAnalyzer {
        async fn analyze(
            &self,
            _listing: &ListingData,
            _rule_flags: &[RuleFlag],
            _user_context: Option<&str>,
        ) -> Result<SubjectiveAnalysis, AnalyzerError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            match &self.response {
                Ok(analysis) => Ok(analysis.clone()),
                Err(error) => Err(error()),
            }
        }
    }

    fn external_finding(id: &str, severity: Severity) -> Finding {
        Finding {
            id: id.to_string(),
            finding_type: FindingType::CognitiveBias,
            header: format!("{} header", id),
            summary: String::new(),
            explanation: String::new(),
            severity,
        }
    }

    fn external_analysis(score: u8, findings: Vec<Finding>) -> SubjectiveAnalysis {
        SubjectiveAnalysis {
            risk: RiskAssessment {
                score,
                level: RiskLevel::from_score(score),
                summary: "external summary".to_string(),
            },
            findings,
            reflection_prompts: vec![
                ReflectionPrompt {
                    id: "rp_1".to_string(),
                    prompt: "Why is the price so low?".to_string(),
                },
                ReflectionPrompt {
                    id: "rp_2".to_string(),
                    prompt: "Have you verified the seller?".to_string(),
                },
            ],
        }
    }

    fn request(url: &str) -> AnalysisRequest {
        let url = Url::parse(url).unwrap();
        let normalized = url.to_string().trim_end_matches('/').to_string();
        AnalysisRequest {
            url,
            normalized_url: normalized,
            platform: "kijiji".to_string(),
            user_context: None,
        }
    }

    /// A document with a title and price but no rule-triggering signals
    const CLEAN_HTML: &str = r#"<html><head>
        <script type="application/ld+json">
        {"@type": "Product", "name": "Bookshelf", "description": "Solid pine bookshelf in good shape", "offers": {"price": "120"}}
        </script>
    </head><body></body></html>"#;

    /// A document triggering deposit (high) and near-free (medium) rules
    const FLAGGED_HTML: &str = r#"<html><head>
        <script type="application/ld+json">
        {"@type": "Product", "name": "Phone", "description": "Deposit required to hold. E-transfer before pickup.", "offers": {"price": "8"}}
        </script>
    </head><body></body></html>"#;

    fn service_with(
        fetcher: Arc<dyn ListingFetcher>,
        analyzer: Arc<dyn SubjectiveAnalyzer>,
    ) -> AnalysisService {
        AnalysisService::new(fetcher, analyzer, AnalysisCache::new(3600))
    }

    #[tokio::test]
    async fn zero_flags_yields_external_findings_in_arrival_order() {
        let analyzer = Arc::new(StubAnalyzer::succeeding(external_analysis(
            30,
            vec![
                external_finding("anchoring_bias", Severity::Medium),
                external_finding("scarcity_bias", Severity::Medium),
            ],
        )));
        let service = service_with(Arc::new(StaticFetcher::new(CLEAN_HTML)), analyzer);

        let result = service
            .analyze(request("https://www.kijiji.ca/v-item/1"))
            .await
            .unwrap();

        let ids: Vec<&str> = result.findings.iter().map(|f| f.id.as_str()).collect();
        assert_eq!(ids, vec!["anchoring_bias", "scarcity_bias"]);
        assert_eq!(result.risk.score, 30);
        assert_eq!(result.reflection_prompts.len(), 2);
    }

    #[tokio::test]
    async fn merged_findings_sort_by_severity_with_rules_first_on_ties() {
        let analyzer = Arc::new(StubAnalyzer::succeeding(external_analysis(
            70,
            vec![
                external_finding("loss_aversion", Severity::Low),
                external_finding("urgency_bias", Severity::High),
            ],
        )));
        let service = service_with(Arc::new(StaticFetcher::new(FLAGGED_HTML)), analyzer);

        let result = service
            .analyze(request("https://www.kijiji.ca/v-item/2"))
            .await
            .unwrap();

        let ids: Vec<&str> = result.findings.iter().map(|f| f.id.as_str()).collect();
        // Rule flags trigger in catalog order: free_or_near_free (medium),
        // request_deposit (high). After the stable severity sort the
        // high-severity rule finding precedes the high-severity external one.
        assert_eq!(
            ids,
            vec![
                "request_deposit",
                "urgency_bias",
                "free_or_near_free",
                "loss_aversion"
            ]
        );
    }

    #[tokio::test]
    async fn external_level_is_corrected_from_score() {
        let mut analysis = external_analysis(80, vec![
            external_finding("anchoring_bias", Severity::Medium),
            external_finding("scarcity_bias", Severity::Low),
        ]);
        analysis.risk.level = RiskLevel::Low; // inconsistent on purpose
        let analyzer = Arc::new(StubAnalyzer::succeeding(analysis));
        let service = service_with(Arc::new(StaticFetcher::new(CLEAN_HTML)), analyzer);

        let result = service
            .analyze(request("https://www.kijiji.ca/v-item/3"))
            .await
            .unwrap();

        assert_eq!(result.risk.level, RiskLevel::High);
    }

    #[tokio::test]
    async fn analyzer_failures_degrade_to_rule_based_score() {
        let failures: Vec<fn() -> AnalyzerError> = vec![
            || AnalyzerError::Timeout,
            || AnalyzerError::RateLimited,
            || AnalyzerError::Unavailable("502".to_string()),
            || AnalyzerError::Malformed("bad json".to_string()),
        ];

        for failure in failures {
            let service = service_with(
                Arc::new(StaticFetcher::new(FLAGGED_HTML)),
                Arc::new(StubAnalyzer::failing(failure)),
            );

            let result = service
                .analyze(request("https://www.kijiji.ca/v-item/4"))
                .await
                .expect("analyzer failure must not fail the request");

            // free_or_near_free (medium=8) + request_deposit (high=18)
            assert_eq!(result.risk.score, 26);
            assert_eq!(result.risk.level, RiskLevel::Low);
            assert_eq!(result.risk.summary, risk::FALLBACK_SUMMARY);
            assert!(result.reflection_prompts.is_empty());
            // Rule findings still present and sorted
            assert_eq!(result.findings.len(), 2);
            assert_eq!(result.findings[0].id, "request_deposit");
        }
    }

    #[tokio::test]
    async fn repeated_request_within_ttl_is_served_from_cache() {
        let fetcher = Arc::new(StaticFetcher::new(CLEAN_HTML));
        let analyzer = Arc::new(StubAnalyzer::succeeding(external_analysis(
            10,
            vec![
                external_finding("anchoring_bias", Severity::Low),
                external_finding("scarcity_bias", Severity::Low),
            ],
        )));
        let service = service_with(fetcher.clone(), analyzer.clone());

        let first = service
            .analyze(request("https://www.kijiji.ca/v-item/5"))
            .await
            .unwrap();
        let second = service
            .analyze(request("https://www.kijiji.ca/v-item/5"))
            .await
            .unwrap();

        // Identical result, including the analysis id; no recomputation
        assert_eq!(first.analysis_id, second.analysis_id);
        assert_eq!(fetcher.calls.load(Ordering::SeqCst), 1);
        assert_eq!(analyzer.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn expired_entry_is_recomputed_and_recached() {
        let clock = Arc::new(ManualClock::new(chrono::Utc::now()));
        let cache = AnalysisCache::with_clock(3600, clock.clone());
        let fetcher = Arc::new(StaticFetcher::new(CLEAN_HTML));
        let analyzer = Arc::new(StubAnalyzer::succeeding(external_analysis(
            10,
            vec![
                external_finding("anchoring_bias", Severity::Low),
                external_finding("scarcity_bias", Severity::Low),
            ],
        )));
        let service = AnalysisService::new(fetcher.clone(), analyzer.clone(), cache);

        let first = service
            .analyze(request("https://www.kijiji.ca/v-item/6"))
            .await
            .unwrap();

        clock.advance(Duration::seconds(3601));

        let second = service
            .analyze(request("https://www.kijiji.ca/v-item/6"))
            .await
            .unwrap();

        assert_ne!(first.analysis_id, second.analysis_id);
        assert_eq!(fetcher.calls.load(Ordering::SeqCst), 2);

        // The fresh result is cached again
        let third = service
            .analyze(request("https://www.kijiji.ca/v-item/6"))
            .await
            .unwrap();
        assert_eq!(second.analysis_id, third.analysis_id);
        assert_eq!(fetcher.calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn zero_signal_extraction_is_unsupported_and_not_cached() {
        let fetcher = Arc::new(StaticFetcher::new("<html><body>nothing here</body></html>"));
        let analyzer = Arc::new(StubAnalyzer::succeeding(external_analysis(10, vec![
            external_finding("anchoring_bias", Severity::Low),
            external_finding("scarcity_bias", Severity::Low),
        ])));
        let service = service_with(fetcher.clone(), analyzer.clone());

        let result = service
            .analyze(request("https://www.kijiji.ca/v-item/7"))
            .await;
        assert!(matches!(result, Err(AnalysisError::UnsupportedSource)));
        assert_eq!(analyzer.calls.load(Ordering::SeqCst), 0);

        // Nothing cached: a retry fetches again
        let _ = service
            .analyze(request("https://www.kijiji.ca/v-item/7"))
            .await;
        assert_eq!(fetcher.calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn fetch_errors_propagate_and_are_not_cached() {
        let service = service_with(
            Arc::new(FailingFetcher),
            Arc::new(StubAnalyzer::failing(|| AnalyzerError::Timeout)),
        );

        let result = service
            .analyze(request("https://www.kijiji.ca/v-item/8"))
            .await;
        assert!(matches!(
            result,
            Err(AnalysisError::Fetch(FetchError::Timeout))
        ));
    }

    #[tokio::test]
    async fn quiz_questions_follow_merged_findings() {
        let analyzer = Arc::new(StubAnalyzer::failing(|| AnalyzerError::Timeout));
        let service = service_with(Arc::new(StaticFetcher::new(FLAGGED_HTML)), analyzer);

        let result = service
            .analyze(request("https://www.kijiji.ca/v-item/9"))
            .await
            .unwrap();

        // request_deposit matches q_deposit; free_or_near_free matches q_price
        let ids: Vec<&str> = result.quiz.questions.iter().map(|q| q.id.as_str()).collect();
        assert_eq!(ids, vec!["q_deposit", "q_price"]);
        assert_eq!(
            result.quiz.questions[0].linked_finding_ids,
            vec!["request_deposit"]
        );
    }

    #[tokio::test]
    async fn analysis_ids_are_unique_and_prefixed() {
        let service = service_with(
            Arc::new(StaticFetcher::new(CLEAN_HTML)),
            Arc::new(StubAnalyzer::failing(|| AnalyzerError::Timeout)),
        );

        let a = service
            .analyze(request("https://www.kijiji.ca/v-item/10"))
            .await
            .unwrap();
        let b = service
            .analyze(request("https://www.kijiji.ca/v-item/11"))
            .await
            .unwrap();

        assert!(a.analysis_id.starts_with("an_"));
        assert_ne!(a.analysis_id, b.analysis_id);
    }
}
