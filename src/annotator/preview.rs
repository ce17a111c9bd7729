//! Special-tag highlighting on unformatted text
//!
//! Unlike the matcher, this works on the raw input with regexes so that a
//! display can mark tags before any formatting or analysis runs.

use crate::config::SpecialTagPattern;
use regex::Regex;
use serde::{Deserialize, Serialize};

/// A special tag located in the raw text
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TagHighlight {
    /// Character offset of the opening bracket
    pub char_start: usize,
    /// Character offset just past the closing bracket
    pub char_end: usize,
    pub original_tag_text: String,
    pub surface_form: String,
    pub pos: String,
    pub lexeme: String,
    pub lexeme_reading: String,
    pub conjugation_type: String,
    pub conjugation_form: String,
    pub pronunciation: String,
    pub word_type: String,
}

impl TagHighlight {
    fn new(char_start: usize, char_end: usize, text: &str, pattern: &SpecialTagPattern) -> Self {
        let or_empty = |value: &Option<String>| value.clone().unwrap_or_default();
        Self {
            char_start,
            char_end,
            original_tag_text: text.to_string(),
            surface_form: pattern.surface_form.clone(),
            pos: pattern.pos.clone(),
            lexeme: pattern
                .lexeme
                .clone()
                .unwrap_or_else(|| pattern.surface_form.clone()),
            lexeme_reading: or_empty(&pattern.lexeme_reading),
            conjugation_type: or_empty(&pattern.conjugation_type),
            conjugation_form: or_empty(&pattern.conjugation_form),
            pronunciation: or_empty(&pattern.pronunciation),
            word_type: or_empty(&pattern.word_type),
        }
    }

    pub fn char_len(&self) -> usize {
        self.char_end - self.char_start
    }
}

/// Formatted display text plus tags found in the raw input
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Preview {
    pub formatted_text: String,
    pub tags: Vec<TagHighlight>,
}

/// Regexes for `<Fえーと>`, `<F:えーと>` and `<F: えーと>`
fn tag_regexes(pattern: &SpecialTagPattern) -> Vec<Regex> {
    let open = regex::escape(pattern.bracket.open());
    let close = regex::escape(pattern.bracket.close());
    let key = regex::escape(&pattern.tag_key);
    let content = regex::escape(&pattern.surface_form);

    [
        format!("{open}{key}{content}{close}"),
        format!("{open}{key}:{content}{close}"),
        format!(r"{open}{key}:\s{content}{close}"),
    ]
    .iter()
    .filter_map(|source| match Regex::new(source) {
        Ok(re) => Some(re),
        Err(e) => {
            tracing::error!("Invalid tag regex '{}': {}", source, e);
            None
        }
    })
    .collect()
}

/// Locate special tags in `text`, non-overlapping and ordered by start
pub fn find_tags_in_text(text: &str, patterns: &[SpecialTagPattern]) -> Vec<TagHighlight> {
    let mut candidates = Vec::new();

    for pattern in patterns {
        for re in tag_regexes(pattern) {
            for m in re.find_iter(text) {
                let char_start = text[..m.start()].chars().count();
                let char_end = char_start + m.as_str().chars().count();
                candidates.push(TagHighlight::new(char_start, char_end, m.as_str(), pattern));
            }
        }
    }

    candidates.sort_by(|a, b| {
        a.char_start
            .cmp(&b.char_start)
            .then(b.char_len().cmp(&a.char_len()))
    });

    let mut last_end = 0;
    let mut accepted: Vec<TagHighlight> = Vec::new();
    for candidate in candidates {
        if candidate.char_start >= last_end {
            last_end = candidate.char_end;
            accepted.push(candidate);
        }
    }
    accepted
}
