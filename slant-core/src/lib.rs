//! Slant Core Library
//!
//! Explainable bias and sentiment profiling for news articles. Every scorer is
//! a deterministic, side-effect-free function of its input.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                        slant-core (library)                         │
//! ├─────────────────────────────────────────────────────────────────────┤
//! │  ┌─────────────────┐  ┌─────────────────┐  ┌─────────────────┐      │
//! │  │  Tokenizer      │─▶│  Lexicon Bias   │─▶│                 │      │
//! │  └─────────────────┘  │  Scorer         │  │                 │      │
//! │                       └─────────────────┘  │  Framing Bias   │      │
//! │  ┌─────────────────┐  ┌─────────────────┐  │  Reasoner       │      │
//! │  │  Sentiment      │─▶│  Dual-Model     │─▶│                 │      │
//! │  │  Classifiers    │  │  Comparator     │  │                 │      │
//! │  └─────────────────┘  └────────┬────────┘  └────────▲────────┘      │
//! │                                │  ┌─────────────────┐│              │
//! │                                └─▶│  Confidence     │┘              │
//! │                                   │  Bucketer       │               │
//! │                                   └─────────────────┘               │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Key Concepts
//!
//! ## Two score domains
//! - **Polarity** in [-1, 1] from the lexicon model
//! - **Confidence** in [0, 1] from the statistical model
//!
//! Only confidences are bucketed. `SentimentVerdict::model` records which
//! domain a score belongs to.
//!
//! ## Fail-safe to neutral
//! - Empty or too-short input yields a neutral or low default
//! - Statistical model failures yield `(neutral, 0.0)`
//!
//! ## Injected model state
//! The statistical model is loaded once and passed in as an
//! `Arc<dyn SentimentModel>`. The pretrained transformer backend is the
//! production model; the linear model is an offline fallback. Tests
//! substitute stubs.

#![warn(clippy::all)]
#![allow(clippy::pedantic)]

pub mod bias;
pub mod compare;
pub mod confidence;
pub mod framing;
pub mod pipeline;
pub mod sentiment;
pub mod store;
pub mod tokenizer;
pub mod types;

pub use bias::{score_lexicon_bias, BiasLexicon, BiasThresholds, LexiconBiasScorer};
pub use compare::{compare_dual_sentiment, DualModelComparator};
pub use confidence::{bucket_confidence, ConfidenceCutPoints};
pub use framing::assess_framing;
pub use pipeline::{Article, ArticleAnalyzer, ArticleProfile};
pub use sentiment::statistical::classify_sentiment_statistical;
pub use sentiment::{
    classify_sentiment_lexicon, load_sentiment_model, LabelScore, LabelThresholds,
    LexiconSentimentClassifier, LinearSentimentModel, SentimentClassifier, SentimentModel,
    StatisticalSentimentClassifier,
};
#[cfg(feature = "transformer")]
pub use sentiment::TransformerSentimentModel;
pub use store::{InMemoryVerdictStore, StoredProfile, VerdictStore};
pub use tokenizer::{tokenize, tokens};
pub use types::{
    BiasLevel, BiasReport, Confidence, ConfidenceLevel, DualSentimentReport, FramingVerdict,
    ModelKind, SentimentLabel, SentimentVerdict,
};
