//! Japanese tokenizer implementation using Lindera
//!
//! Produces morphological nodes with raw feature strings. Lindera does not
//! report inter-token whitespace, so it is recovered by aligning each surface
//! against the analyzed text.

use super::node::{FeatureLayout, MorphologicalNode};
use super::session::InitError;
use super::{Tokenizer, TokenizerError};
use lindera::{
    dictionary::{load_dictionary, load_embedded_dictionary, load_user_dictionary, DictionaryKind},
    mode::Mode,
    segmenter::Segmenter,
    tokenizer::Tokenizer as LinderaInner,
};
use serde::{Deserialize, Serialize};

/// System dictionary used by the Lindera segmenter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum DictionaryChoice {
    /// Embedded IPADIC
    #[default]
    Ipadic,
    /// Embedded UniDic (requires the `unidic` cargo feature)
    Unidic,
}

impl DictionaryChoice {
    /// Human-readable dictionary name
    pub fn label(&self) -> &'static str {
        match self {
            DictionaryChoice::Ipadic => "IPADIC (embedded)",
            DictionaryChoice::Unidic => "UniDic (embedded)",
        }
    }

    /// Parse a dictionary name as used in config and environment
    pub fn parse(name: &str) -> Option<Self> {
        match name.trim().to_lowercase().as_str() {
            "ipadic" => Some(DictionaryChoice::Ipadic),
            "unidic" => Some(DictionaryChoice::Unidic),
            _ => None,
        }
    }

    /// Feature string layout produced by this dictionary
    pub fn feature_layout(&self) -> FeatureLayout {
        match self {
            DictionaryChoice::Ipadic => FeatureLayout::IPADIC,
            DictionaryChoice::Unidic => FeatureLayout::UNIDIC,
        }
    }

    fn kind(&self) -> Result<DictionaryKind, InitError> {
        match self {
            DictionaryChoice::Ipadic => Ok(DictionaryKind::IPADIC),
            DictionaryChoice::Unidic => unidic_kind(),
        }
    }
}

#[cfg(feature = "unidic")]
fn unidic_kind() -> Result<DictionaryKind, InitError> {
    Ok(DictionaryKind::UniDic)
}

#[cfg(not(feature = "unidic"))]
fn unidic_kind() -> Result<DictionaryKind, InitError> {
    Err(InitError::Dictionary(
        "UniDic support is not compiled in (enable the `unidic` feature)".to_string(),
    ))
}

/// Morphological analyzer backed by a Lindera segmenter
pub struct LinderaTokenizer {
    /// Lindera tokenizer instance
    tokenizer: LinderaInner,
    /// Dictionary the segmenter was built with
    dictionary: DictionaryChoice,
    /// A user dictionary was layered over the system one
    user_dictionary: bool,
}

impl LinderaTokenizer {
    /// Create a tokenizer with the embedded IPADIC dictionary
    pub fn new() -> Result<Self, InitError> {
        Self::with_dictionary(DictionaryChoice::Ipadic)
    }

    /// Create a tokenizer with the given embedded dictionary
    pub fn with_dictionary(dictionary: DictionaryChoice) -> Result<Self, InitError> {
        Self::open(dictionary, None, None)
    }

    /// Create a tokenizer from a system dictionary and an optional user dictionary
    ///
    /// `system_uri` is a Lindera dictionary URI or directory; when absent the
    /// embedded dictionary for `dictionary` is used. `dictionary` also selects
    /// the feature layout. A user dictionary must be built against the same
    /// system dictionary metadata.
    pub fn open(
        dictionary: DictionaryChoice,
        system_uri: Option<&str>,
        user_uri: Option<&str>,
    ) -> Result<Self, InitError> {
        let dict = match system_uri {
            Some(uri) => load_dictionary(uri),
            None => load_embedded_dictionary(dictionary.kind()?),
        }
        .map_err(|e| InitError::Dictionary(e.to_string()))?;

        let user_dict = match user_uri {
            Some(uri) => Some(
                load_user_dictionary(uri, &dict.metadata)
                    .map_err(|e| InitError::UserDictionary(format!("{}: {}", uri, e)))?,
            ),
            None => None,
        };
        let user_dictionary = user_dict.is_some();

        let segmenter = Segmenter::new(Mode::Normal, dict, user_dict);
        let tokenizer = LinderaInner::new(segmenter);

        Ok(Self {
            tokenizer,
            dictionary,
            user_dictionary,
        })
    }

    /// Dictionary in use
    pub fn dictionary(&self) -> DictionaryChoice {
        self.dictionary
    }

    pub fn has_user_dictionary(&self) -> bool {
        self.user_dictionary
    }
}

impl Tokenizer for LinderaTokenizer {
    fn parse(&self, text: &str) -> Result<Vec<MorphologicalNode>, TokenizerError> {
        if text.is_empty() {
            return Ok(Vec::new());
        }

        let mut tokens = self
            .tokenizer
            .tokenize(text)
            .map_err(|e| TokenizerError::Analysis(e.to_string()))?;

        let mut raw = Vec::with_capacity(tokens.len());
        for token in tokens.iter_mut() {
            let surface = token.surface.to_string();
            let feature = token.details().join(",");
            raw.push(MorphologicalNode::new(surface, feature));
        }

        Ok(attach_white_space(text, raw))
    }

    fn feature_layout(&self) -> FeatureLayout {
        self.dictionary.feature_layout()
    }
}

/// Assign whitespace found between consecutive surfaces to the earlier node
///
/// Whitespace before the first node has no owner and is dropped. Surfaces
/// that cannot be located in the text are left without whitespace.
pub(crate) fn attach_white_space(text: &str, mut nodes: Vec<MorphologicalNode>) -> Vec<MorphologicalNode> {
    let mut cursor = 0;
    let mut last_aligned: Option<usize> = None;
    for idx in 0..nodes.len() {
        let Some(offset) = text[cursor..].find(nodes[idx].surface.as_str()) else {
            continue;
        };
        let gap = &text[cursor..cursor + offset];
        if let Some(prev) = last_aligned {
            if !gap.is_empty() && gap.chars().all(char::is_whitespace) {
                nodes[prev].white_space.push_str(gap);
            }
        }
        cursor += offset + nodes[idx].surface.len();
        last_aligned = Some(idx);
    }
    nodes
}
