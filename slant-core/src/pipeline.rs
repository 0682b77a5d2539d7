//! Article analysis pipeline.
//!
//! Wires the scorers together for one article: lexicon bias, dual-model
//! sentiment, confidence bucketing and framing. The statistical verdict drives
//! framing because its score is a true [0, 1] confidence.

use chrono::{DateTime, Utc};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, info};
use url::Url;

use slant_common::config::{Config, PipelineConfig};
use slant_common::logging::generate_run_id;
use slant_common::{article_span, Result};

use crate::bias::LexiconBiasScorer;
use crate::compare::DualModelComparator;
use crate::confidence::ConfidenceCutPoints;
use crate::framing::assess_framing;
use crate::sentiment::{LexiconSentimentClassifier, StatisticalSentimentClassifier};
use crate::types::{BiasReport, ConfidenceLevel, DualSentimentReport, FramingVerdict};

/// Source name used when the URL has no host.
pub const UNKNOWN_SOURCE: &str = "unknown";

/// An extracted article as supplied by the fetching layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Article {
    pub url: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub text: String,
}

impl Article {
    pub fn new(url: impl Into<String>, title: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            title: title.into(),
            text: text.into(),
        }
    }

    /// The body, or the title when the body is blank.
    pub fn analysis_text(&self) -> &str {
        if self.text.trim().is_empty() {
            &self.title
        } else {
            &self.text
        }
    }

    /// Host (and port, if any) of the article URL.
    pub fn source(&self) -> String {
        Url::parse(&self.url)
            .ok()
            .and_then(|u| {
                u.host_str().map(|host| match u.port() {
                    Some(port) => format!("{}:{}", host, port),
                    None => host.to_string(),
                })
            })
            .unwrap_or_else(|| UNKNOWN_SOURCE.to_string())
    }
}

/// Full bias and sentiment profile of one article.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArticleProfile {
    pub url: String,
    pub source: String,
    pub title: String,
    pub bias: BiasReport,
    pub sentiment: DualSentimentReport,
    pub confidence_level: ConfidenceLevel,
    pub framing: FramingVerdict,
    pub analyzed_at: DateTime<Utc>,
}

/// Analyzes articles with one fixed set of scorers.
///
/// Cheap to share across threads: every component is immutable after
/// construction.
#[derive(Clone)]
pub struct ArticleAnalyzer {
    scorer: LexiconBiasScorer,
    comparator: DualModelComparator,
    cut_points: ConfidenceCutPoints,
    policy: PipelineConfig,
}

impl ArticleAnalyzer {
    pub fn new(
        scorer: LexiconBiasScorer,
        comparator: DualModelComparator,
        cut_points: ConfidenceCutPoints,
        policy: PipelineConfig,
    ) -> Self {
        Self {
            scorer,
            comparator,
            cut_points,
            policy,
        }
    }

    /// Build every component from configuration. Loads the statistical model.
    pub fn from_config(config: &Config) -> Result<Self> {
        let statistical = StatisticalSentimentClassifier::from_config(&config.statistical)?;
        let lexicon = LexiconSentimentClassifier::from_config(&config.lexicon_sentiment);

        info!(
            model = %statistical.model_name(),
            downgrade_on_disagreement = config.pipeline.downgrade_on_disagreement,
            "Article analyzer ready"
        );

        Ok(Self::new(
            LexiconBiasScorer::from_config(&config.bias),
            DualModelComparator::new(Arc::new(statistical), Arc::new(lexicon)),
            ConfidenceCutPoints::from_config(&config.confidence),
            config.pipeline.clone(),
        ))
    }

    /// Confidence level used for framing.
    fn confidence_level(&self, sentiment: &DualSentimentReport) -> ConfidenceLevel {
        let level = sentiment
            .statistical
            .confidence()
            .map(|c| self.cut_points.level(c))
            .unwrap_or(ConfidenceLevel::Low);

        if self.policy.downgrade_on_disagreement && !sentiment.agreement {
            debug!(from = %level, "Models disagree, downgrading confidence");
            level.step_down()
        } else {
            level
        }
    }

    /// Analyze one article.
    pub fn analyze(&self, article: &Article) -> ArticleProfile {
        let text = article.analysis_text();

        let bias = self.scorer.score(text);
        let sentiment = self.comparator.compare(text);
        let confidence_level = self.confidence_level(&sentiment);
        let framing = assess_framing(sentiment.statistical.label, confidence_level, bias.bias_level);

        let profile = ArticleProfile {
            url: article.url.clone(),
            source: article.source(),
            title: article.title.clone(),
            bias,
            sentiment,
            confidence_level,
            framing,
            analyzed_at: Utc::now(),
        };

        info!(
            url = %profile.url,
            source = %profile.source,
            bias = %profile.bias.bias_level,
            sentiment = %profile.sentiment.statistical.label,
            agreement = profile.sentiment.agreement,
            confidence = %profile.confidence_level,
            framing = %profile.framing.framing_bias,
            "Article analyzed"
        );

        profile
    }

    /// Analyze many articles in parallel. Output order matches input order.
    pub fn analyze_batch(&self, articles: &[Article]) -> Vec<ArticleProfile> {
        let run_id = generate_run_id();
        info!(run_id = %run_id, articles = articles.len(), "Starting batch analysis");

        articles
            .par_iter()
            .map(|article| {
                let span = article_span!(run_id, url = %article.url);
                let _enter = span.enter();
                self.analyze(article)
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sentiment::SentimentClassifier;
    use crate::types::{BiasLevel, ModelKind, SentimentLabel, SentimentVerdict};

    struct FixedClassifier {
        label: SentimentLabel,
        score: f64,
    }

    impl SentimentClassifier for FixedClassifier {
        fn kind(&self) -> ModelKind {
            ModelKind::Statistical
        }

        fn classify(&self, _text: &str) -> SentimentVerdict {
            SentimentVerdict {
                label: self.label,
                score: self.score,
                model: ModelKind::Statistical,
            }
        }
    }

    fn analyzer(label: SentimentLabel, score: f64, policy: PipelineConfig) -> ArticleAnalyzer {
        ArticleAnalyzer::new(
            LexiconBiasScorer::default(),
            DualModelComparator::new(
                Arc::new(FixedClassifier { label, score }),
                Arc::new(LexiconSentimentClassifier::new()),
            ),
            ConfidenceCutPoints::default(),
            policy,
        )
    }

    #[test]
    fn test_source_from_url() {
        let article = Article::new("https://www.example.com/news/1", "t", "");
        assert_eq!(article.source(), "www.example.com");

        let article = Article::new("http://localhost:8080/a", "t", "");
        assert_eq!(article.source(), "localhost:8080");

        let article = Article::new("not a url", "t", "");
        assert_eq!(article.source(), UNKNOWN_SOURCE);
    }

    #[test]
    fn test_title_fallback() {
        let article = Article::new("https://example.com", "Headline only", "  \n ");
        assert_eq!(article.analysis_text(), "Headline only");

        let article = Article::new("https://example.com", "Headline", "Body text");
        assert_eq!(article.analysis_text(), "Body text");
    }

    #[test]
    fn test_emotional_biased_article_frames_high() {
        let analyzer = analyzer(SentimentLabel::Negative, 0.9, PipelineConfig::default());
        let article = Article::new(
            "https://example.com/a",
            "Chaos",
            "Shocking chaos as the crisis deepens and everyone is always worse off.",
        );

        let profile = analyzer.analyze(&article);
        assert_eq!(profile.bias.bias_level, BiasLevel::Moderate);
        assert_eq!(profile.confidence_level, ConfidenceLevel::High);
        assert_eq!(profile.framing.framing_bias, BiasLevel::High);
        assert_eq!(profile.source, "example.com");
    }

    #[test]
    fn test_low_confidence_overrides_framing() {
        let analyzer = analyzer(SentimentLabel::Negative, 0.4, PipelineConfig::default());
        let article = Article::new("https://example.com/a", "t", "Shocking chaos, always and never.");

        let profile = analyzer.analyze(&article);
        assert_eq!(profile.confidence_level, ConfidenceLevel::Low);
        assert_eq!(profile.framing.framing_bias, BiasLevel::Low);
    }

    #[test]
    fn test_downgrade_on_disagreement() {
        let text = "A wonderful and excellent result for the town.";
        let article = Article::new("https://example.com/a", "t", text);

        let keep = analyzer(SentimentLabel::Neutral, 0.8, PipelineConfig::default());
        let profile = keep.analyze(&article);
        assert!(!profile.sentiment.agreement);
        assert_eq!(profile.confidence_level, ConfidenceLevel::High);

        let downgrade = analyzer(
            SentimentLabel::Neutral,
            0.8,
            PipelineConfig {
                downgrade_on_disagreement: true,
            },
        );
        assert_eq!(downgrade.analyze(&article).confidence_level, ConfidenceLevel::Medium);
    }

    #[test]
    fn test_batch_preserves_order() {
        let analyzer = analyzer(SentimentLabel::Neutral, 0.6, PipelineConfig::default());
        let articles: Vec<Article> = (0..20)
            .map(|i| Article::new(format!("https://site{}.example/a", i), "t", "Plain text here."))
            .collect();

        let profiles = analyzer.analyze_batch(&articles);
        assert_eq!(profiles.len(), 20);
        for (article, profile) in articles.iter().zip(&profiles) {
            assert_eq!(article.url, profile.url);
        }
    }

    #[test]
    fn test_from_default_config() {
        let analyzer = ArticleAnalyzer::from_config(&Config::default()).unwrap();
        let profile = analyzer.analyze(&Article::new(
            "https://example.com/park",
            "Park opens",
            "The council said the new park was a wonderful success for residents.",
        ));
        assert_eq!(profile.sentiment.statistical.label, SentimentLabel::Positive);
        assert_eq!(profile.bias.bias_level, BiasLevel::Low);
        assert_eq!(profile.framing.framing_bias, BiasLevel::Low);
    }

    #[test]
    fn test_profile_serializes() {
        let analyzer = analyzer(SentimentLabel::Neutral, 0.6, PipelineConfig::default());
        let profile = analyzer.analyze(&Article::new("https://example.com", "t", "text"));
        let json = serde_json::to_value(&profile).unwrap();
        assert_eq!(json["confidence_level"], "medium");
        assert_eq!(json["sentiment"]["statistical"]["model"], "statistical");
    }
}
