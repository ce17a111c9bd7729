//! Token record data structures
//!
//! `TokenRecord` carries the internal alignment state used while the pipeline
//! runs; `AnnotatedToken` is what leaves the pipeline.

use crate::config::SpecialTagPattern;
use crate::tokenizer::{feature_at, FeatureLayout, MorphologicalNode, FEATURE_PLACEHOLDER};
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Part-of-speech used when no feature field qualifies
pub const UNKNOWN_POS: &str = "不明";

/// Number of leading feature fields that form the part-of-speech
const POS_FIELDS: usize = 4;

/// Sentence boundary flag
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum SentenceBoundary {
    /// Sentence-initial token
    #[serde(rename = "B")]
    Begin,
    /// Continuation token
    #[default]
    #[serde(rename = "I")]
    Inside,
}

impl SentenceBoundary {
    pub fn as_str(&self) -> &'static str {
        match self {
            SentenceBoundary::Begin => "B",
            SentenceBoundary::Inside => "I",
        }
    }
}

impl fmt::Display for SentenceBoundary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Half-open character window `[start, end)` in formatted-text coordinates
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CharWindow {
    pub start: usize,
    pub end: usize,
}

impl CharWindow {
    /// Window of `len` characters starting at `start`
    pub fn new(start: usize, len: usize) -> Self {
        Self {
            start,
            end: start + len,
        }
    }

    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }
}

/// Per-node record construction failure
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TokenBuildError {
    #[error("Node '{0}' carries no feature fields")]
    MissingFeatures(String),
}

/// Join up to the first four part-of-speech fields with `-`
///
/// Empty and placeholder fields are dropped; if none remain the result is
/// [`UNKNOWN_POS`].
pub fn format_pos(features: &[&str]) -> String {
    let parts: Vec<&str> = features
        .iter()
        .take(POS_FIELDS)
        .copied()
        .filter(|f| !f.is_empty() && *f != FEATURE_PLACEHOLDER)
        .collect();

    if parts.is_empty() {
        UNKNOWN_POS.to_string()
    } else {
        parts.join("-")
    }
}

/// A token in the pipeline, before internal fields are stripped
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenRecord {
    pub surface_form: String,
    pub lexeme: String,
    pub lexeme_reading: String,
    pub pos: String,
    pub conjugation_type: String,
    pub conjugation_form: String,
    pub pronunciation: String,
    pub word_type: String,
    pub sentence_boundary: SentenceBoundary,
    /// Window in the formatted text, if known
    pub window: Option<CharWindow>,
    pub start_position: usize,
    pub end_position: usize,
    /// Editorial special tag rather than an analyzer node
    pub is_special: bool,
}

impl TokenRecord {
    /// Build a morphological record from an analyzer node at `cursor`
    pub fn from_node(
        node: &MorphologicalNode,
        layout: &FeatureLayout,
        cursor: usize,
    ) -> Result<Self, TokenBuildError> {
        let features = node.features();
        if features.is_empty() {
            return Err(TokenBuildError::MissingFeatures(node.surface.clone()));
        }

        let field = |index: usize| feature_at(&features, index).unwrap_or("").to_string();

        Ok(Self {
            surface_form: node.surface.clone(),
            lexeme: feature_at(&features, layout.lexeme)
                .unwrap_or(&node.surface)
                .to_string(),
            lexeme_reading: field(layout.lexeme_reading),
            pos: format_pos(&features),
            conjugation_type: field(layout.conjugation_type),
            conjugation_form: field(layout.conjugation_form),
            pronunciation: field(layout.pronunciation),
            word_type: layout.word_type.map(field).unwrap_or_default(),
            sentence_boundary: SentenceBoundary::Inside,
            window: Some(CharWindow::new(cursor, node.surface_len())),
            start_position: 0,
            end_position: 0,
            is_special: false,
        })
    }

    /// Degraded record for a node whose features could not be read
    pub fn fallback(surface: &str, cursor: usize) -> Self {
        Self {
            surface_form: surface.to_string(),
            lexeme: surface.to_string(),
            lexeme_reading: String::new(),
            pos: UNKNOWN_POS.to_string(),
            conjugation_type: String::new(),
            conjugation_form: String::new(),
            pronunciation: String::new(),
            word_type: String::new(),
            sentence_boundary: SentenceBoundary::Inside,
            window: Some(CharWindow::new(cursor, surface.chars().count())),
            start_position: 0,
            end_position: 0,
            is_special: false,
        }
    }

    /// Record standing in for a matched special tag at `cursor`
    pub fn special(pattern: &SpecialTagPattern, cursor: usize) -> Self {
        let surface = &pattern.surface_form;
        let or_empty = |value: &Option<String>| value.clone().unwrap_or_default();

        Self {
            surface_form: surface.clone(),
            lexeme: pattern.lexeme.clone().unwrap_or_else(|| surface.clone()),
            lexeme_reading: or_empty(&pattern.lexeme_reading),
            pos: pattern.pos.clone(),
            conjugation_type: or_empty(&pattern.conjugation_type),
            conjugation_form: or_empty(&pattern.conjugation_form),
            pronunciation: or_empty(&pattern.pronunciation),
            word_type: or_empty(&pattern.word_type),
            sentence_boundary: SentenceBoundary::Inside,
            window: Some(CharWindow::new(cursor, surface.chars().count())),
            start_position: 0,
            end_position: 0,
            is_special: true,
        }
    }

    /// Strip internal fields
    pub fn into_annotated(self) -> AnnotatedToken {
        AnnotatedToken {
            start_position: self.start_position,
            end_position: self.end_position,
            sentence_boundary: self.sentence_boundary,
            surface_form: self.surface_form,
            lexeme: self.lexeme,
            lexeme_reading: self.lexeme_reading,
            pos: self.pos,
            conjugation_type: self.conjugation_type,
            conjugation_form: self.conjugation_form,
            pronunciation: self.pronunciation,
            word_type: self.word_type,
        }
    }
}

/// A finished token as handed to output writers
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnnotatedToken {
    pub start_position: usize,
    pub end_position: usize,
    pub sentence_boundary: SentenceBoundary,
    pub surface_form: String,
    pub lexeme: String,
    pub lexeme_reading: String,
    pub pos: String,
    pub conjugation_type: String,
    pub conjugation_form: String,
    pub pronunciation: String,
    pub word_type: String,
}
