//! Special-tag recognition over analyzer nodes
//!
//! A tag such as `<F:えーと>` is split by the analyzer into several nodes
//! (`<`, `F`, `:`, `えーと`, `>`). Matching walks the node sequence with a
//! small state machine per candidate opening bracket:
//!
//! ```text
//! SeekOpen -> MatchKey -> SkipSeparator -> AccumulateContent -> ExpectClose
//! ```
//!
//! Candidates from every pattern are then reduced to a left-to-right,
//! non-overlapping set, preferring the widest span at each start.

use crate::config::SpecialTagPattern;
use crate::tokenizer::MorphologicalNode;

const KEY_SEPARATOR: &str = ":";
const SEPARATOR_SPACE: &str = " ";

/// Node-index span `[start, end]` covering the opening and closing brackets
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpecialTagMatch<'p> {
    pub start: usize,
    pub end: usize,
    pub pattern: &'p SpecialTagPattern,
}

impl SpecialTagMatch<'_> {
    /// Span width in nodes, minus one
    pub fn width(&self) -> usize {
        self.end - self.start
    }
}

#[derive(Debug)]
enum MatchState {
    /// Concatenating nodes until they spell the tag key
    MatchKey { cursor: usize, key: String },
    /// Optional `:` and a single space after the key
    SkipSeparator { cursor: usize },
    /// Concatenating nodes while they stay a prefix of the expected surface
    AccumulateContent { cursor: usize, content: String },
    /// The next node must be the closing bracket
    ExpectClose { cursor: usize },
}

fn strip_whitespace(s: &str) -> String {
    s.chars().filter(|c| !c.is_whitespace()).collect()
}

/// Run the state machine from the opening bracket at `open`
///
/// Returns the index of the closing bracket node on success.
fn match_at(nodes: &[MorphologicalNode], open: usize, pattern: &SpecialTagPattern) -> Option<usize> {
    let surface_at = |i: usize| nodes.get(i).map(|n| n.surface.as_str());
    let key_len = pattern.tag_key.chars().count();
    let expected = pattern.surface_form.as_str();
    let close = pattern.bracket.close();

    let mut state = MatchState::MatchKey {
        cursor: open + 1,
        key: String::new(),
    };

    loop {
        state = match state {
            MatchState::MatchKey { cursor, mut key } => {
                if key.chars().count() >= key_len {
                    return None;
                }
                key.push_str(surface_at(cursor)?);
                if key == pattern.tag_key {
                    MatchState::SkipSeparator { cursor: cursor + 1 }
                } else {
                    MatchState::MatchKey {
                        cursor: cursor + 1,
                        key,
                    }
                }
            }

            MatchState::SkipSeparator { mut cursor } => {
                if surface_at(cursor) == Some(KEY_SEPARATOR) {
                    cursor += 1;
                    if surface_at(cursor) == Some(SEPARATOR_SPACE) {
                        cursor += 1;
                    }
                }
                MatchState::AccumulateContent {
                    cursor,
                    content: String::new(),
                }
            }

            MatchState::AccumulateContent { cursor, mut content } => {
                let surface = surface_at(cursor)?;
                if surface == close {
                    return None;
                }
                content.push_str(surface);
                if !(expected.starts_with(content.as_str()) || content.starts_with(expected)) {
                    return None;
                }
                if strip_whitespace(&content) == strip_whitespace(expected) {
                    MatchState::ExpectClose { cursor: cursor + 1 }
                } else {
                    MatchState::AccumulateContent {
                        cursor: cursor + 1,
                        content,
                    }
                }
            }

            MatchState::ExpectClose { cursor } => {
                return (surface_at(cursor) == Some(close)).then_some(cursor);
            }
        };
    }
}

/// Find non-overlapping special-tag matches in `nodes`, ordered by start
pub fn find_matches<'p>(
    nodes: &[MorphologicalNode],
    patterns: &'p [SpecialTagPattern],
) -> Vec<SpecialTagMatch<'p>> {
    let mut candidates: Vec<SpecialTagMatch<'p>> = Vec::new();

    for pattern in patterns {
        let open = pattern.bracket.open();
        // SeekOpen
        for (i, node) in nodes.iter().enumerate() {
            if node.surface != open {
                continue;
            }
            if let Some(end) = match_at(nodes, i, pattern) {
                candidates.push(SpecialTagMatch {
                    start: i,
                    end,
                    pattern,
                });
            }
        }
    }

    candidates.sort_by(|a, b| a.start.cmp(&b.start).then(b.width().cmp(&a.width())));

    let mut accepted: Vec<SpecialTagMatch<'p>> = Vec::new();
    for candidate in candidates {
        if accepted.last().map_or(true, |last| candidate.start > last.end) {
            accepted.push(candidate);
        }
    }

    tracing::debug!("Found {} special tag matches", accepted.len());
    accepted
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::BracketType;

    fn nodes(surfaces: &[&str]) -> Vec<MorphologicalNode> {
        surfaces
            .iter()
            .map(|s| MorphologicalNode::new(*s, "記号,一般,*,*"))
            .collect()
    }

    fn filler() -> SpecialTagPattern {
        SpecialTagPattern::new(BracketType::Angle, "F", "えーと", "感動詞-フィラー")
    }

    #[test]
    fn test_match_with_colon() {
        let patterns = [filler()];
        let matches = find_matches(&nodes(&["<", "F", ":", "えーと", ">"]), &patterns);
        assert_eq!(matches.len(), 1);
        assert_eq!((matches[0].start, matches[0].end), (0, 4));
    }

    #[test]
    fn test_match_without_colon_and_with_space() {
        let patterns = [filler()];
        let bare = find_matches(&nodes(&["<", "F", "えーと", ">"]), &patterns);
        assert_eq!((bare[0].start, bare[0].end), (0, 3));

        let spaced = find_matches(&nodes(&["<", "F", ":", " ", "えーと", ">"]), &patterns);
        assert_eq!((spaced[0].start, spaced[0].end), (0, 5));
    }

    #[test]
    fn test_content_split_across_nodes() {
        let patterns = [filler()];
        let matches = find_matches(&nodes(&["a", "<", "F", "え", "ー", "と", ">", "b"]), &patterns);
        assert_eq!((matches[0].start, matches[0].end), (1, 6));
    }

    #[test]
    fn test_content_whitespace_is_normalized() {
        let patterns = [SpecialTagPattern::new(BracketType::Angle, "F", "え と", "感動詞")];
        let matches = find_matches(&nodes(&["<", "F", "え", " と", ">"]), &patterns);
        assert_eq!(matches.len(), 1);
    }

    #[test]
    fn test_wrong_key_or_content_no_match() {
        let patterns = [filler()];
        assert!(find_matches(&nodes(&["<", "D", "えーと", ">"]), &patterns).is_empty());
        assert!(find_matches(&nodes(&["<", "F", "あの", ">"]), &patterns).is_empty());
        assert!(find_matches(&nodes(&["<", "F", "えー", ">"]), &patterns).is_empty());
    }

    #[test]
    fn test_missing_close_no_match() {
        let patterns = [filler()];
        assert!(find_matches(&nodes(&["<", "F", "えーと", "です"]), &patterns).is_empty());
        assert!(find_matches(&nodes(&["<", "F", "えーと"]), &patterns).is_empty());
    }

    #[test]
    fn test_key_longer_than_one_node() {
        let mut pattern = filler();
        pattern.tag_key = "FF".to_string();
        let patterns = [pattern];
        let matches = find_matches(&nodes(&["<", "F", "F", "えーと", ">"]), &patterns);
        assert_eq!((matches[0].start, matches[0].end), (0, 4));
    }

    #[test]
    fn test_shorter_surface_does_not_match_longer_content() {
        let short = SpecialTagPattern::new(BracketType::Round, "D", "あ", "名詞");
        let long = SpecialTagPattern::new(BracketType::Round, "D", "あい", "名詞");
        let patterns = [short, long];
        let input = nodes(&["(", "D", "あい", ")", "(", "D", "あ", ")"]);
        let matches = find_matches(&input, &patterns);

        assert_eq!(matches.len(), 2);
        assert_eq!(matches[0].pattern.surface_form, "あい");
        assert_eq!((matches[1].start, matches[1].end), (4, 7));
        assert!(matches[0].end < matches[1].start);
    }

    #[test]
    fn test_multiple_patterns_ordered_by_start() {
        let a = SpecialTagPattern::new(BracketType::Corner, "X", "x", "記号");
        let b = filler();
        let patterns = [a, b];
        let input = nodes(&["<", "F", "えーと", ">", "【", "X", "x", "】"]);
        let matches = find_matches(&input, &patterns);

        assert_eq!(matches.len(), 2);
        assert_eq!(matches[0].start, 0);
        assert_eq!(matches[1].start, 4);
    }
}
