//! Japanese tokenizer module
//!
//! This module defines the contract between the annotation pipeline and the
//! external morphological analyzer, and provides a Lindera-backed implementation.

mod japanese;
mod node;
mod session;

pub use japanese::{DictionaryChoice, LinderaTokenizer};
pub use node::{feature_at, FeatureLayout, MorphologicalNode, FEATURE_PLACEHOLDER};
pub use session::{
    initialize_first, open_session, session_plans, InitAttempt, InitError, SessionOptions, SessionPlan,
    CHECK_SENTENCE,
};

use thiserror::Error;

/// Failure of a single tokenizer invocation
#[derive(Debug, Error)]
pub enum TokenizerError {
    /// The analyzer rejected or failed on the input text
    #[error("Morphological analysis failed: {0}")]
    Analysis(String),
}

/// A morphological analyzer the pipeline can run over formatted text
///
/// Implementations are not assumed to be safe for concurrent invocation;
/// callers hold one instance per worker.
pub trait Tokenizer {
    /// Analyze `text` into an ordered sequence of nodes
    fn parse(&self, text: &str) -> Result<Vec<MorphologicalNode>, TokenizerError>;

    /// Positions of the output fields inside each node's feature string
    fn feature_layout(&self) -> FeatureLayout {
        FeatureLayout::UNIDIC
    }
}

impl<T: Tokenizer + ?Sized> Tokenizer for Box<T> {
    fn parse(&self, text: &str) -> Result<Vec<MorphologicalNode>, TokenizerError> {
        (**self).parse(text)
    }

    fn feature_layout(&self) -> FeatureLayout {
        (**self).feature_layout()
    }
}
