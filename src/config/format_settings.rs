//! Text formatting settings
//!
//! Defines tag removal, regex substitution, whitespace stripping and the
//! special-tag patterns applied before morphological analysis.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Maximum number of special-tag patterns honoured per session
pub const MAX_SPECIAL_TAG_PATTERNS: usize = 5;

/// Part-of-speech assigned to a special tag when the pattern names none
pub const DEFAULT_SPECIAL_TAG_POS: &str = "不明-特別タグ";

/// Bracket pairs recognized for special tags
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BracketType {
    Angle,
    AngleFull,
    Round,
    RoundFull,
    Square,
    SquareFull,
    Curly,
    CurlyFull,
    Corner,
}

impl BracketType {
    pub const ALL: [BracketType; 9] = [
        BracketType::Angle,
        BracketType::AngleFull,
        BracketType::Round,
        BracketType::RoundFull,
        BracketType::Square,
        BracketType::SquareFull,
        BracketType::Curly,
        BracketType::CurlyFull,
        BracketType::Corner,
    ];

    /// Parse a config key such as `angle_full`
    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|b| b.key() == key)
    }

    /// Config key of this bracket type
    pub fn key(&self) -> &'static str {
        match self {
            BracketType::Angle => "angle",
            BracketType::AngleFull => "angle_full",
            BracketType::Round => "round",
            BracketType::RoundFull => "round_full",
            BracketType::Square => "square",
            BracketType::SquareFull => "square_full",
            BracketType::Curly => "curly",
            BracketType::CurlyFull => "curly_full",
            BracketType::Corner => "corner",
        }
    }

    /// Opening and closing characters
    pub fn chars(&self) -> (&'static str, &'static str) {
        match self {
            BracketType::Angle => ("<", ">"),
            BracketType::AngleFull => ("＜", "＞"),
            BracketType::Round => ("(", ")"),
            BracketType::RoundFull => ("（", "）"),
            BracketType::Square => ("[", "]"),
            BracketType::SquareFull => ("［", "］"),
            BracketType::Curly => ("{", "}"),
            BracketType::CurlyFull => ("｛", "｝"),
            BracketType::Corner => ("【", "】"),
        }
    }

    pub fn open(&self) -> &'static str {
        self.chars().0
    }

    pub fn close(&self) -> &'static str {
        self.chars().1
    }
}

/// How general tag removal treats bracketed spans
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum TagRemovalMode {
    /// Delete brackets together with their content
    #[default]
    RemoveWithContent,
    /// Delete only the brackets, keeping the content
    RemoveTagsOnly,
}

/// General bracket tag removal
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct TagRemovalSettings {
    pub enabled: bool,
    /// Bracket pair keys such as `<>` or `【】`
    pub types: Vec<String>,
    pub mode: TagRemovalMode,
}

/// A single user regex substitution
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegexRule {
    pub pattern: String,
    /// Replacement in `regex` crate syntax (`$1`, `${name}`)
    #[serde(default)]
    pub replacement: String,
}

impl RegexRule {
    pub fn new(pattern: impl Into<String>, replacement: impl Into<String>) -> Self {
        Self {
            pattern: pattern.into(),
            replacement: replacement.into(),
        }
    }
}

/// Ordered regex substitutions
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct RegexSettings {
    pub enabled: bool,
    pub patterns: Vec<RegexRule>,
}

/// Whitespace stripping flags
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct WhitespaceSettings {
    pub remove_half_space: bool,
    pub remove_full_space: bool,
    pub remove_newline: bool,
}

/// A special-tag pattern as written in the config file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct TagPatternEntry {
    pub bracket_type: String,
    /// Tag key written right after the opening bracket
    pub tag_content: String,
    pub surface_form: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pos_value: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lexeme: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lexeme_reading: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub conjugation_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub conjugation_form: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pronunciation: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub word_type: Option<String>,
}

/// Reasons a config entry cannot become a special-tag pattern
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PatternError {
    #[error("Unknown bracket type '{0}'")]
    UnknownBracket(String),

    #[error("Tag key must be a single ASCII letter, got '{0}'")]
    InvalidTagKey(String),

    #[error("Surface form is empty")]
    EmptySurface,
}

impl TagPatternEntry {
    /// Validate this entry into a usable pattern
    pub fn validate(&self) -> Result<SpecialTagPattern, PatternError> {
        let bracket = BracketType::from_key(self.bracket_type.trim())
            .ok_or_else(|| PatternError::UnknownBracket(self.bracket_type.clone()))?;

        let mut key_chars = self.tag_content.chars();
        let key_ok = matches!(
            (key_chars.next(), key_chars.next()),
            (Some(c), None) if c.is_ascii_alphabetic()
        );
        if !key_ok {
            return Err(PatternError::InvalidTagKey(self.tag_content.clone()));
        }

        if self.surface_form.is_empty() {
            return Err(PatternError::EmptySurface);
        }

        Ok(SpecialTagPattern {
            bracket,
            tag_key: self.tag_content.clone(),
            surface_form: self.surface_form.clone(),
            pos: self
                .pos_value
                .clone()
                .unwrap_or_else(|| DEFAULT_SPECIAL_TAG_POS.to_string()),
            lexeme: self.lexeme.clone(),
            lexeme_reading: self.lexeme_reading.clone(),
            conjugation_type: self.conjugation_type.clone(),
            conjugation_form: self.conjugation_form.clone(),
            pronunciation: self.pronunciation.clone(),
            word_type: self.word_type.clone(),
        })
    }
}

/// A validated special-tag pattern
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpecialTagPattern {
    pub bracket: BracketType,
    pub tag_key: String,
    pub surface_form: String,
    pub pos: String,
    pub lexeme: Option<String>,
    pub lexeme_reading: Option<String>,
    pub conjugation_type: Option<String>,
    pub conjugation_form: Option<String>,
    pub pronunciation: Option<String>,
    pub word_type: Option<String>,
}

impl SpecialTagPattern {
    /// Pattern with only the required fields set
    pub fn new(
        bracket: BracketType,
        tag_key: impl Into<String>,
        surface_form: impl Into<String>,
        pos: impl Into<String>,
    ) -> Self {
        Self {
            bracket,
            tag_key: tag_key.into(),
            surface_form: surface_form.into(),
            pos: pos.into(),
            lexeme: None,
            lexeme_reading: None,
            conjugation_type: None,
            conjugation_form: None,
            pronunciation: None,
            word_type: None,
        }
    }

    pub fn with_lexeme(mut self, lexeme: impl Into<String>) -> Self {
        self.lexeme = Some(lexeme.into());
        self
    }

    pub fn with_lexeme_reading(mut self, reading: impl Into<String>) -> Self {
        self.lexeme_reading = Some(reading.into());
        self
    }

    pub fn with_pronunciation(mut self, pronunciation: impl Into<String>) -> Self {
        self.pronunciation = Some(pronunciation.into());
        self
    }

    pub fn with_word_type(mut self, word_type: impl Into<String>) -> Self {
        self.word_type = Some(word_type.into());
        self
    }
}

/// Special-tag configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct SpecialTagSettings {
    pub tag_patterns: Vec<TagPatternEntry>,
}

impl SpecialTagSettings {
    /// Valid patterns in config order
    ///
    /// Invalid entries are skipped with a warning; entries past
    /// [`MAX_SPECIAL_TAG_PATTERNS`] are ignored.
    pub fn patterns(&self) -> Vec<SpecialTagPattern> {
        if self.tag_patterns.len() > MAX_SPECIAL_TAG_PATTERNS {
            tracing::warn!(
                "{} special tag patterns configured, only the first {} are used",
                self.tag_patterns.len(),
                MAX_SPECIAL_TAG_PATTERNS
            );
        }

        self.tag_patterns
            .iter()
            .take(MAX_SPECIAL_TAG_PATTERNS)
            .filter_map(|entry| match entry.validate() {
                Ok(pattern) => Some(pattern),
                Err(e) => {
                    tracing::warn!("Skipping incomplete special tag pattern {:?}: {}", entry, e);
                    None
                }
            })
            .collect()
    }
}

/// All formatting applied before analysis
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct FormatSettings {
    /// Strip Aozora Bunko markup (colophon, ruby, editorial notes)
    pub aozora_cleanup: bool,
    pub remove_tags: TagRemovalSettings,
    pub regex_settings: RegexSettings,
    pub whitespace: WhitespaceSettings,
    pub tag_special_settings: SpecialTagSettings,
}

impl FormatSettings {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_aozora_cleanup(mut self, enabled: bool) -> Self {
        self.aozora_cleanup = enabled;
        self
    }

    pub fn with_tag_removal(mut self, types: &[&str], mode: TagRemovalMode) -> Self {
        self.remove_tags = TagRemovalSettings {
            enabled: true,
            types: types.iter().map(|t| t.to_string()).collect(),
            mode,
        };
        self
    }

    pub fn with_regex_rules(mut self, rules: Vec<RegexRule>) -> Self {
        self.regex_settings = RegexSettings {
            enabled: true,
            patterns: rules,
        };
        self
    }

    pub fn with_whitespace(mut self, whitespace: WhitespaceSettings) -> Self {
        self.whitespace = whitespace;
        self
    }

    pub fn with_tag_pattern(mut self, entry: TagPatternEntry) -> Self {
        self.tag_special_settings.tag_patterns.push(entry);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(bracket: &str, key: &str, surface: &str) -> TagPatternEntry {
        TagPatternEntry {
            bracket_type: bracket.to_string(),
            tag_content: key.to_string(),
            surface_form: surface.to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_bracket_keys_roundtrip() {
        for bracket in BracketType::ALL {
            assert_eq!(BracketType::from_key(bracket.key()), Some(bracket));
        }
        assert_eq!(BracketType::from_key("double_angle_ja"), None);
    }

    #[test]
    fn test_corner_bracket_chars() {
        assert_eq!(BracketType::Corner.chars(), ("【", "】"));
    }

    #[test]
    fn test_validate_defaults_pos() {
        let pattern = entry("angle", "F", "えーと").validate().unwrap();
        assert_eq!(pattern.bracket, BracketType::Angle);
        assert_eq!(pattern.pos, DEFAULT_SPECIAL_TAG_POS);
        assert!(pattern.lexeme.is_none());
    }

    #[test]
    fn test_validate_keeps_present_empty_pos() {
        let mut with_empty = entry("angle", "F", "えーと");
        with_empty.pos_value = Some(String::new());
        with_empty.lexeme = Some(String::new());

        let pattern = with_empty.validate().unwrap();
        assert_eq!(pattern.pos, "");
        assert_eq!(pattern.lexeme.as_deref(), Some(""));
    }

    #[test]
    fn test_validate_rejects_bad_entries() {
        assert_eq!(
            entry("hexagon", "F", "x").validate(),
            Err(PatternError::UnknownBracket("hexagon".into()))
        );
        assert_eq!(
            entry("angle", "FF", "x").validate(),
            Err(PatternError::InvalidTagKey("FF".into()))
        );
        assert_eq!(
            entry("angle", "あ", "x").validate(),
            Err(PatternError::InvalidTagKey("あ".into()))
        );
        assert_eq!(entry("angle", "F", "").validate(), Err(PatternError::EmptySurface));
    }

    #[test]
    fn test_patterns_capped_and_filtered() {
        let mut settings = SpecialTagSettings::default();
        settings.tag_patterns.push(entry("angle", "", "x"));
        for key in ["A", "B", "C", "D", "E", "G"] {
            settings.tag_patterns.push(entry("round", key, "y"));
        }

        let patterns = settings.patterns();
        // The invalid first entry still counts against the cap
        assert_eq!(patterns.len(), 4);
        assert_eq!(patterns[0].tag_key, "A");
        assert_eq!(patterns[3].tag_key, "D");
    }

    #[test]
    fn test_format_settings_default_disabled() {
        let settings = FormatSettings::default();
        assert!(!settings.aozora_cleanup);
        assert!(!settings.remove_tags.enabled);
        assert_eq!(settings.remove_tags.mode, TagRemovalMode::RemoveWithContent);
        assert!(!settings.regex_settings.enabled);
        assert!(settings.tag_special_settings.tag_patterns.is_empty());
    }

    #[test]
    fn test_tag_removal_mode_serialization() {
        let json = serde_json::to_string(&TagRemovalMode::RemoveTagsOnly).unwrap();
        assert_eq!(json, "\"remove_tags_only\"");
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let settings: FormatSettings =
            serde_json::from_str(r#"{"remove_tags": {"enabled": true}}"#).unwrap();
        assert!(settings.remove_tags.enabled);
        assert!(settings.remove_tags.types.is_empty());
        assert!(!settings.whitespace.remove_newline);
    }
}
