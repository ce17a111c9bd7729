//! Aozora Bunko markup cleanup
//!
//! Drops the symbol-explanation header and the colophon, resolves
//! `［＃...第3水準1-14-76...］` glyph notes through a JIS table, and strips ruby
//! and editorial notes.

use anyhow::{Context, Result};
use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use std::collections::HashMap;
use std::path::Path;

static SEPARATOR_LINE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?m)^-{5,}[^\r\n]*?-{5,}\r?$").expect("Invalid regex"));
static COLOPHON: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?m)^底本：").expect("Invalid regex"));
static JIS_NOTE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"※?［＃[^］]*?(第\d水準\d+-\d+-\d+)[^］]*?］").expect("Invalid regex")
});
static JIS_CODE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"第\d+水準(\d+)-(\d+)-(\d+)").expect("Invalid regex"));
static RUBY_WITH_BAR: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"([^｜《》]+?)｜([^｜《》]+?)《[^《》]*?》").expect("Invalid regex")
});
static RUBY: Lazy<Regex> = Lazy::new(|| Regex::new(r"《[^《》]*?》").expect("Invalid regex"));
static EDITOR_NOTE: Lazy<Regex> = Lazy::new(|| Regex::new(r"［＃[^］]*?］").expect("Invalid regex"));
static TORTOISE_NOTE: Lazy<Regex> = Lazy::new(|| Regex::new(r"〔.*?〕").expect("Invalid regex"));

/// JIS X 0213 plane-row-cell code (`1-14-76`) to character table
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct JisMapping {
    table: HashMap<String, String>,
}

impl JisMapping {
    pub fn from_map(table: HashMap<String, String>) -> Self {
        Self { table }
    }

    /// Parse a JSON object of `"1-14-76": "𠀋"` entries
    pub fn from_json(json: &str) -> Result<Self> {
        let table: HashMap<String, String> =
            serde_json::from_str(json).context("Invalid JIS mapping JSON")?;
        Ok(Self::from_map(table))
    }

    /// Read a mapping file
    pub fn try_load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read JIS mapping {}", path.display()))?;
        Self::from_json(&content)
    }

    /// Read a mapping file, falling back to an empty table
    pub fn load(path: &Path) -> Self {
        match Self::try_load(path) {
            Ok(mapping) => {
                tracing::debug!(
                    "Loaded {} JIS mapping entries from {}",
                    mapping.len(),
                    path.display()
                );
                mapping
            }
            Err(e) => {
                tracing::error!("{:#}; Aozora glyph notes will be dropped", e);
                Self::default()
            }
        }
    }

    pub fn len(&self) -> usize {
        self.table.len()
    }

    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }

    /// Resolve a note fragment such as `第3水準1-14-76`
    ///
    /// Returns an empty string when the code is malformed or unknown.
    pub fn lookup(&self, code: &str) -> String {
        if self.table.is_empty() {
            tracing::error!("JIS mapping is empty, cannot resolve '{}'", code);
            return String::new();
        }

        let Some(caps) = JIS_CODE.captures(code) else {
            tracing::warn!("Could not parse plane-row-cell from '{}'", code);
            return String::new();
        };

        let number = |i: usize| caps[i].parse::<u32>().unwrap_or(0);
        let key = format!("{}-{:02}-{:02}", number(1), number(2), number(3));

        match self.table.get(&key) {
            Some(ch) => ch.clone(),
            None => {
                tracing::warn!("JIS key '{}' not found (from '{}')", key, code);
                String::new()
            }
        }
    }
}

/// Cut the header notes and colophon, then strip inline markup
pub fn aozora_cleanup(text: &str, jis: &JisMapping) -> String {
    let parts: Vec<&str> = SEPARATOR_LINE.split(text).collect();
    let body = match parts.as_slice() {
        [head, _, tail, ..] => format!("{}\n\n{}", head.trim_end(), tail.trim_start()),
        [head, tail] if head.trim().is_empty() => tail.trim_start().to_string(),
        [head, tail] if tail.trim().is_empty() => head.trim_end().to_string(),
        _ => text.to_string(),
    };

    let body = match COLOPHON.find(&body) {
        Some(m) => &body[..m.start()],
        None => body.as_str(),
    };

    strip_annotations(body, jis).trim().to_string()
}

fn strip_annotations(text: &str, jis: &JisMapping) -> String {
    let text = JIS_NOTE.replace_all(text, |caps: &Captures| jis.lookup(&caps[1]));
    let text = RUBY_WITH_BAR.replace_all(&text, "${1}${2}");
    let text = RUBY.replace_all(&text, "");
    let text = EDITOR_NOTE.replace_all(&text, "");
    TORTOISE_NOTE.replace_all(&text, "").into_owned()
}
