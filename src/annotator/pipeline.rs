//! Annotation pipeline
//!
//! raw text -> formatter -> tokenizer -> matcher + assembler -> positions ->
//! sentence boundaries

use super::aozora::JisMapping;
use super::assembler::assemble_with_layout;
use super::boundary::resolve;
use super::formatter::format_text;
use super::matcher::find_matches;
use super::position::translate;
use super::preview::{find_tags_in_text, Preview};
use super::record::AnnotatedToken;
use crate::config::path_resolver::resolve_path;
use crate::config::{AppConfig, FormatSettings};
use crate::tokenizer::{Tokenizer, TokenizerError};
use thiserror::Error;

/// Document-level annotation failure
#[derive(Debug, Error)]
pub enum AnnotateError {
    #[error(transparent)]
    Tokenizer(#[from] TokenizerError),

    #[error("Input text is empty")]
    EmptyInput,
}

/// Runs the annotation pipeline with a fixed set of format settings
#[derive(Debug, Clone, Default)]
pub struct Annotator {
    settings: FormatSettings,
    jis_mapping: JisMapping,
}

impl Annotator {
    pub fn new(settings: FormatSettings) -> Self {
        Self {
            settings,
            jis_mapping: JisMapping::default(),
        }
    }

    /// Use `mapping` to resolve Aozora glyph notes
    pub fn with_jis_mapping(mut self, mapping: JisMapping) -> Self {
        self.jis_mapping = mapping;
        self
    }

    /// Build from application config, loading the JIS table if one is configured
    pub fn from_config(config: &AppConfig) -> Self {
        let mapping = match config.jis_mapping_path() {
            Some(path) => match resolve_path(path) {
                Ok(resolved) => JisMapping::load(&resolved),
                Err(e) => {
                    tracing::error!("Cannot resolve JIS mapping path '{}': {}", path, e);
                    JisMapping::default()
                }
            },
            None => {
                if config.format().aozora_cleanup {
                    tracing::warn!("No JIS mapping configured; Aozora glyph notes will be dropped");
                }
                JisMapping::default()
            }
        };

        Self::new(config.format().clone()).with_jis_mapping(mapping)
    }

    pub fn settings(&self) -> &FormatSettings {
        &self.settings
    }

    /// Apply the configured formatting only
    pub fn format_text(&self, text: &str) -> String {
        let patterns = self.settings.tag_special_settings.patterns();
        format_text(text, &self.settings, &patterns, &self.jis_mapping)
    }

    /// Annotate `text` with the configured settings
    pub fn analyze<T: Tokenizer + ?Sized>(
        &self,
        tokenizer: &T,
        text: &str,
    ) -> Result<Vec<AnnotatedToken>, AnnotateError> {
        self.analyze_with(tokenizer, text, &self.settings)
    }

    /// Annotate `text` with temporary format settings
    pub fn analyze_with<T: Tokenizer + ?Sized>(
        &self,
        tokenizer: &T,
        text: &str,
        settings: &FormatSettings,
    ) -> Result<Vec<AnnotatedToken>, AnnotateError> {
        let patterns = settings.tag_special_settings.patterns();
        let formatted = format_text(text, settings, &patterns, &self.jis_mapping);

        let nodes = tokenizer.parse(&formatted).map_err(|e| {
            tracing::error!("Morphological analysis failed: {}", e);
            e
        })?;

        let matches = find_matches(&nodes, &patterns);
        let records = assemble_with_layout(&nodes, &matches, &tokenizer.feature_layout());
        let mut records = translate(records);
        resolve(&mut records);

        tracing::debug!(
            "Annotated {} tokens from {} nodes ({} special)",
            records.len(),
            nodes.len(),
            matches.len()
        );

        Ok(records.into_iter().map(|r| r.into_annotated()).collect())
    }

    /// Formatted display text and special tags located in the raw input
    pub fn preview(&self, text: &str) -> Preview {
        self.preview_with(text, &self.settings)
    }

    pub fn preview_with(&self, text: &str, settings: &FormatSettings) -> Preview {
        if text.trim().is_empty() {
            return Preview::default();
        }

        let patterns = settings.tag_special_settings.patterns();
        Preview {
            formatted_text: format_text(text, settings, &patterns, &self.jis_mapping),
            tags: find_tags_in_text(text, &patterns),
        }
    }
}
