//! Morphological nodes returned by the tokenizer

/// Placeholder used by MeCab-style dictionaries for an empty field
pub const FEATURE_PLACEHOLDER: &str = "*";

/// One morphological unit produced by the analyzer
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct MorphologicalNode {
    /// Surface text as it appears in the analyzed input
    pub surface: String,
    /// Raw comma-delimited feature string
    pub feature: String,
    /// Whitespace that follows the surface in the input
    pub white_space: String,
}

impl MorphologicalNode {
    /// Create a node with no trailing whitespace
    pub fn new(surface: impl Into<String>, feature: impl Into<String>) -> Self {
        Self {
            surface: surface.into(),
            feature: feature.into(),
            white_space: String::new(),
        }
    }

    /// Attach trailing whitespace
    pub fn with_white_space(mut self, white_space: impl Into<String>) -> Self {
        self.white_space = white_space.into();
        self
    }

    /// Split the feature string into its positional fields
    pub fn features(&self) -> Vec<&str> {
        if self.feature.is_empty() {
            return Vec::new();
        }
        self.feature.split(',').collect()
    }

    /// Surface length in characters
    pub fn surface_len(&self) -> usize {
        self.surface.chars().count()
    }

    /// Characters consumed in the analyzed text, trailing whitespace included
    pub fn consumed_len(&self) -> usize {
        self.surface_len() + self.white_space.chars().count()
    }
}

/// Indices of the output columns inside a dictionary's feature string
///
/// The first four fields are always the part-of-speech hierarchy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FeatureLayout {
    pub conjugation_type: usize,
    pub conjugation_form: usize,
    pub lexeme_reading: usize,
    pub lexeme: usize,
    pub pronunciation: usize,
    pub word_type: Option<usize>,
}

impl FeatureLayout {
    /// UniDic (MeCab `feature_raw`) layout
    pub const UNIDIC: FeatureLayout = FeatureLayout {
        conjugation_type: 4,
        conjugation_form: 5,
        lexeme_reading: 6,
        lexeme: 7,
        pronunciation: 9,
        word_type: Some(12),
    };

    /// IPADIC layout: base form, reading, pronunciation; no word type
    pub const IPADIC: FeatureLayout = FeatureLayout {
        conjugation_type: 4,
        conjugation_form: 5,
        lexeme_reading: 7,
        lexeme: 6,
        pronunciation: 8,
        word_type: None,
    };
}

impl Default for FeatureLayout {
    fn default() -> Self {
        Self::UNIDIC
    }
}

/// Field at `index`, treating absent and placeholder values as empty
pub fn feature_at<'a>(features: &[&'a str], index: usize) -> Option<&'a str> {
    features
        .get(index)
        .copied()
        .filter(|f| !f.is_empty() && *f != FEATURE_PLACEHOLDER)
}
