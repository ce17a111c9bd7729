//! Text formatting applied before analysis
//!
//! Steps run in a fixed order: Aozora cleanup, general tag removal, whitespace
//! stripping, user regex substitutions. Offsets into the raw text are not
//! preserved.

use super::aozora::{aozora_cleanup, JisMapping};
use crate::config::{BracketType, FormatSettings, SpecialTagPattern, TagRemovalMode};
use regex::Regex;
use std::collections::HashSet;

/// Bracket pair keys accepted by general tag removal
pub const TAG_REMOVAL_KEYS: [&str; 11] = [
    "<>", "()", "[]", "{}", "＜＞", "（）", "［］", "｛｝", "【】", "《》", "〈〉",
];

/// Special-tag bracket type sharing a removal key, if any
fn claimed_bracket(key: &str) -> Option<BracketType> {
    match key {
        "<>" => Some(BracketType::Angle),
        "()" => Some(BracketType::Round),
        "[]" => Some(BracketType::Square),
        "{}" => Some(BracketType::Curly),
        "＜＞" => Some(BracketType::AngleFull),
        "（）" => Some(BracketType::RoundFull),
        "［］" => Some(BracketType::SquareFull),
        "｛｝" => Some(BracketType::CurlyFull),
        "【】" => Some(BracketType::Corner),
        _ => None,
    }
}

/// Opening and closing characters of a removal key
fn removal_pair(key: &str) -> Option<(char, char)> {
    if !TAG_REMOVAL_KEYS.contains(&key) {
        return None;
    }
    let mut chars = key.chars();
    match (chars.next(), chars.next(), chars.next()) {
        (Some(open), Some(close), None) => Some((open, close)),
        _ => None,
    }
}

/// Format `text` for analysis
///
/// `active` lists the special-tag patterns in effect; their bracket types are
/// exempt from general tag removal.
pub fn format_text(
    text: &str,
    settings: &FormatSettings,
    active: &[SpecialTagPattern],
    jis: &JisMapping,
) -> String {
    let mut formatted = if settings.aozora_cleanup {
        aozora_cleanup(text, jis)
    } else {
        text.to_string()
    };

    if settings.remove_tags.enabled {
        let claimed: HashSet<BracketType> = active.iter().map(|p| p.bracket).collect();
        formatted = remove_tags(
            &formatted,
            &settings.remove_tags.types,
            settings.remove_tags.mode,
            &claimed,
        );
    }

    let ws = &settings.whitespace;
    if ws.remove_full_space {
        formatted = formatted.replace('　', "");
    }
    if ws.remove_half_space {
        formatted = formatted.replace(' ', "");
    }
    if ws.remove_newline {
        formatted = formatted.replace("\r\n", "").replace(['\n', '\r'], "");
    }

    if settings.regex_settings.enabled {
        for rule in &settings.regex_settings.patterns {
            if rule.pattern.is_empty() {
                continue;
            }
            match Regex::new(&rule.pattern) {
                Ok(re) => {
                    formatted = re
                        .replace_all(&formatted, rule.replacement.as_str())
                        .into_owned();
                }
                Err(e) => {
                    tracing::warn!(
                        "Skipping regex '{}' -> '{}': {}",
                        rule.pattern,
                        rule.replacement,
                        e
                    );
                }
            }
        }
    }

    formatted
}

fn remove_tags(
    text: &str,
    keys: &[String],
    mode: TagRemovalMode,
    claimed: &HashSet<BracketType>,
) -> String {
    let mut seen = HashSet::new();
    let mut result = text.to_string();

    for key in keys {
        if !seen.insert(key.as_str()) {
            continue;
        }
        if claimed_bracket(key).is_some_and(|b| claimed.contains(&b)) {
            tracing::debug!("Tag type {} is reserved for special tags", key);
            continue;
        }
        let Some((open, close)) = removal_pair(key) else {
            tracing::warn!("Unknown tag type for general removal: {}", key);
            continue;
        };

        let pattern = format!(
            "{}(.*?){}",
            regex::escape(&open.to_string()),
            regex::escape(&close.to_string())
        );
        let replacement = match mode {
            TagRemovalMode::RemoveWithContent => "",
            TagRemovalMode::RemoveTagsOnly => "${1}",
        };

        match Regex::new(&pattern) {
            Ok(re) => result = re.replace_all(&result, replacement).into_owned(),
            Err(e) => tracing::warn!("Error removing general tag ({}): {}", key, e),
        }
    }

    result
}
