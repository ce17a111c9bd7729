//! Text file I/O and output naming

use crate::output::OutputFormat;
use anyhow::{anyhow, Context, Result};
use chrono::NaiveDateTime;
use encoding_rs::{Encoding, EUC_JP, ISO_2022_JP, SHIFT_JIS, UTF_8};
use once_cell::sync::Lazy;
use regex::Regex;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Suffix used when none is configured
pub const DEFAULT_SUFFIX: &str = "_analyzed";

/// Date placeholders and their strftime equivalents, in replacement order
static DATE_PLACEHOLDERS: Lazy<Vec<(Regex, &'static str)>> = Lazy::new(|| {
    [
        ("(?i)MM", "%m"),
        ("(?i)DD", "%d"),
        ("(?i)HH", "%H"),
        ("(?i)MI", "%M"),
        ("(?i)SS", "%S"),
    ]
    .into_iter()
    .map(|(p, f)| (Regex::new(p).expect("Invalid regex"), f))
    .collect()
});
static YEAR_LONG: Lazy<Regex> = Lazy::new(|| Regex::new("(?i)YYYY").expect("Invalid regex"));
static YEAR_SHORT: Lazy<Regex> = Lazy::new(|| Regex::new("(?i)YY").expect("Invalid regex"));

const ESCAPE: u8 = 0x1B;

/// Text decoded from file bytes
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedText {
    pub text: String,
    pub encoding: &'static Encoding,
    /// Undecodable sequences were replaced with U+FFFD
    pub lossy: bool,
}

impl DecodedText {
    fn clean(text: impl Into<String>, encoding: &'static Encoding) -> Self {
        Self {
            text: text.into(),
            encoding,
            lossy: false,
        }
    }
}

/// Decode file bytes, detecting the encoding
///
/// A BOM wins. Escape sequences select ISO-2022-JP; otherwise UTF-8, then
/// Shift_JIS (Windows-31J) and EUC-JP are tried. If none decodes cleanly the
/// bytes are read as UTF-8 with undecodable sequences replaced.
pub fn decode_text(bytes: &[u8]) -> DecodedText {
    if let Some((encoding, bom_len)) = Encoding::for_bom(bytes) {
        let (text, had_errors) = encoding.decode_without_bom_handling(&bytes[bom_len..]);
        return DecodedText {
            text: text.into_owned(),
            encoding,
            lossy: had_errors,
        };
    }

    if bytes.contains(&ESCAPE) {
        let (text, had_errors) = ISO_2022_JP.decode_without_bom_handling(bytes);
        if !had_errors {
            return DecodedText::clean(text, ISO_2022_JP);
        }
    }

    if let Ok(text) = std::str::from_utf8(bytes) {
        return DecodedText::clean(text, UTF_8);
    }

    for encoding in [SHIFT_JIS, EUC_JP] {
        let (text, had_errors) = encoding.decode_without_bom_handling(bytes);
        if !had_errors {
            return DecodedText::clean(text, encoding);
        }
    }

    DecodedText {
        text: String::from_utf8_lossy(bytes).into_owned(),
        encoding: UTF_8,
        lossy: true,
    }
}

/// Read a text file in UTF-8 or a legacy Japanese encoding
///
/// Undecodable input is read lossily with a warning.
pub fn read_text_file(path: &Path) -> Result<String> {
    let bytes =
        std::fs::read(path).with_context(|| format!("Failed to read {}", path.display()))?;
    let decoded = decode_text(&bytes);

    if decoded.lossy {
        tracing::warn!(
            "{} matches no supported encoding; undecodable bytes replaced",
            path.display()
        );
    } else if decoded.encoding != UTF_8 {
        tracing::debug!("Decoded {} as {}", path.display(), decoded.encoding.name());
    }
    Ok(decoded.text)
}

/// Write `content` with LF line endings, creating parent directories
pub fn write_text_file(content: &str, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory {}", parent.display()))?;
    }
    std::fs::write(path, content.replace("\r\n", "\n"))
        .with_context(|| format!("Failed to write {}", path.display()))
}

/// Files under `dir` with the given extension (`txt` or `.txt`), sorted
pub fn collect_input_files(dir: &Path, extension: &str, recursive: bool) -> Result<Vec<PathBuf>> {
    if !dir.is_dir() {
        return Err(anyhow!("Not a directory: {}", dir.display()));
    }

    let wanted = extension.trim_start_matches('.');
    let max_depth = if recursive { usize::MAX } else { 1 };

    let mut files: Vec<PathBuf> = WalkDir::new(dir)
        .max_depth(max_depth)
        .into_iter()
        .filter_map(|entry| match entry {
            Ok(e) => Some(e),
            Err(err) => {
                tracing::warn!("Skipping unreadable entry: {}", err);
                None
            }
        })
        .filter(|e| e.file_type().is_file())
        .filter(|e| {
            e.path()
                .extension()
                .is_some_and(|ext| ext.to_string_lossy().eq_ignore_ascii_case(wanted))
        })
        .map(|e| e.into_path())
        .collect();

    files.sort();
    Ok(files)
}

/// Replace `YYYY` (or `YY`), `MM`, `DD`, `HH`, `MI`, `SS` case-insensitively
pub fn expand_datetime_placeholders(text: &str, now: &NaiveDateTime) -> String {
    let mut result = if YEAR_LONG.is_match(text) {
        YEAR_LONG
            .replace_all(text, now.format("%Y").to_string().as_str())
            .into_owned()
    } else {
        YEAR_SHORT
            .replace_all(text, now.format("%y").to_string().as_str())
            .into_owned()
    };

    for (placeholder, fmt) in DATE_PLACEHOLDERS.iter() {
        let value = now.format(fmt).to_string();
        result = placeholder.replace_all(&result, value.as_str()).into_owned();
    }
    result
}

/// `{prefix}{stem}{suffix}{ext}` for an input file
///
/// An empty suffix falls back to [`DEFAULT_SUFFIX`].
pub fn output_file_name(
    input: &Path,
    prefix: &str,
    suffix: &str,
    format: OutputFormat,
    now: &NaiveDateTime,
) -> String {
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "analyzed".to_string());
    let suffix = if suffix.is_empty() { DEFAULT_SUFFIX } else { suffix };

    format!(
        "{}{}{}{}",
        prefix,
        stem,
        expand_datetime_placeholders(suffix, now),
        format.extension()
    )
}
