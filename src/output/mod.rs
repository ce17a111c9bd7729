//! Corpus output writers
//!
//! Renders annotated tokens as TSV, CSV or JSON in the fixed OpenCHJ column
//! order. No header row is written.

mod csv;

pub use csv::{csv_escape, csv_unescape};

use crate::annotator::{AnnotatedToken, SentenceBoundary};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use std::str::FromStr;

/// Output column names in order
pub const COLUMNS: [&str; 13] = [
    "file_name",
    "subcorpus_name",
    "start_position",
    "end_position",
    "sentence_boundary",
    "surface_form",
    "lexeme",
    "lexeme_reading",
    "pos",
    "conjugation_type",
    "conjugation_form",
    "pronunciation",
    "word_type",
];

/// Written in the subcorpus column when no name is configured
pub const EMPTY_SUBCORPUS: &str = "-";

/// Serialized result format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Tsv,
    Csv,
    Json,
}

impl OutputFormat {
    /// File extension including the dot
    pub fn extension(&self) -> &'static str {
        match self {
            OutputFormat::Tsv => ".txt",
            OutputFormat::Csv => ".csv",
            OutputFormat::Json => ".json",
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            OutputFormat::Tsv => "tsv",
            OutputFormat::Csv => "csv",
            OutputFormat::Json => "json",
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "tsv" | "txt" => Ok(OutputFormat::Tsv),
            "csv" => Ok(OutputFormat::Csv),
            "json" => Ok(OutputFormat::Json),
            other => Err(format!(
                "unknown output format '{}' (expected tsv, csv or json)",
                other
            )),
        }
    }
}

/// One output row, borrowed from a token
#[derive(Debug, Serialize)]
struct CorpusRow<'a> {
    file_name: &'a str,
    subcorpus_name: &'a str,
    start_position: usize,
    end_position: usize,
    sentence_boundary: SentenceBoundary,
    surface_form: &'a str,
    lexeme: &'a str,
    lexeme_reading: &'a str,
    pos: &'a str,
    conjugation_type: &'a str,
    conjugation_form: &'a str,
    pronunciation: &'a str,
    word_type: &'a str,
}

impl<'a> CorpusRow<'a> {
    fn cells(&self) -> [String; 13] {
        [
            self.file_name.to_string(),
            self.subcorpus_name.to_string(),
            self.start_position.to_string(),
            self.end_position.to_string(),
            self.sentence_boundary.to_string(),
            self.surface_form.to_string(),
            self.lexeme.to_string(),
            self.lexeme_reading.to_string(),
            self.pos.to_string(),
            self.conjugation_type.to_string(),
            self.conjugation_form.to_string(),
            self.pronunciation.to_string(),
            self.word_type.to_string(),
        ]
    }
}

/// Renders tokens for one source document
#[derive(Debug, Clone)]
pub struct CorpusWriter {
    file_name: String,
    subcorpus_name: String,
}

impl CorpusWriter {
    /// `source` may be a bare name or a path; only its stem is written
    pub fn new(source: &str, subcorpus_name: &str) -> Self {
        let file_name = Path::new(source)
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();

        let subcorpus_name = if subcorpus_name.is_empty() {
            EMPTY_SUBCORPUS.to_string()
        } else {
            subcorpus_name.to_string()
        };

        Self {
            file_name,
            subcorpus_name,
        }
    }

    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    pub fn subcorpus_name(&self) -> &str {
        &self.subcorpus_name
    }

    fn row<'a>(&'a self, token: &'a AnnotatedToken) -> CorpusRow<'a> {
        CorpusRow {
            file_name: &self.file_name,
            subcorpus_name: &self.subcorpus_name,
            start_position: token.start_position,
            end_position: token.end_position,
            sentence_boundary: token.sentence_boundary,
            surface_form: &token.surface_form,
            lexeme: &token.lexeme,
            lexeme_reading: &token.lexeme_reading,
            pos: &token.pos,
            conjugation_type: &token.conjugation_type,
            conjugation_form: &token.conjugation_form,
            pronunciation: &token.pronunciation,
            word_type: &token.word_type,
        }
    }

    fn join_rows<F>(&self, tokens: &[AnnotatedToken], separator: &str, cell: F) -> String
    where
        F: Fn(&str) -> String,
    {
        let lines: Vec<String> = tokens
            .iter()
            .map(|token| {
                self.row(token)
                    .cells()
                    .iter()
                    .map(|c| cell(c))
                    .collect::<Vec<_>>()
                    .join(separator)
            })
            .collect();

        lines.join("\n") + "\n"
    }

    /// Tab-separated lines with a trailing newline
    pub fn to_tsv(&self, tokens: &[AnnotatedToken]) -> String {
        self.join_rows(tokens, "\t", |c| c.to_string())
    }

    /// Comma-separated lines with quoted cells where needed
    pub fn to_csv(&self, tokens: &[AnnotatedToken]) -> String {
        self.join_rows(tokens, ",", csv_escape)
    }

    /// Pretty-printed JSON array with a trailing newline
    pub fn to_json(&self, tokens: &[AnnotatedToken]) -> Result<String> {
        let rows: Vec<CorpusRow> = tokens.iter().map(|t| self.row(t)).collect();
        let json = serde_json::to_string_pretty(&rows).context("Failed to serialize tokens")?;
        Ok(json + "\n")
    }

    /// Render in the given format
    pub fn render(&self, format: OutputFormat, tokens: &[AnnotatedToken]) -> Result<String> {
        match format {
            OutputFormat::Tsv => Ok(self.to_tsv(tokens)),
            OutputFormat::Csv => Ok(self.to_csv(tokens)),
            OutputFormat::Json => self.to_json(tokens),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn token(surface: &str, start: usize, boundary: SentenceBoundary) -> AnnotatedToken {
        AnnotatedToken {
            start_position: start,
            end_position: start + surface.chars().count() * 10,
            sentence_boundary: boundary,
            surface_form: surface.to_string(),
            lexeme: surface.to_string(),
            lexeme_reading: String::new(),
            pos: "名詞".to_string(),
            conjugation_type: String::new(),
            conjugation_form: String::new(),
            pronunciation: String::new(),
            word_type: String::new(),
        }
    }

    #[test]
    fn test_format_parse() {
        assert_eq!("TSV".parse::<OutputFormat>(), Ok(OutputFormat::Tsv));
        assert_eq!(" json ".parse::<OutputFormat>(), Ok(OutputFormat::Json));
        assert!("xml".parse::<OutputFormat>().is_err());
    }

    #[test]
    fn test_format_extension() {
        assert_eq!(OutputFormat::Tsv.extension(), ".txt");
        assert_eq!(OutputFormat::Csv.extension(), ".csv");
        assert_eq!(OutputFormat::Json.extension(), ".json");
    }

    #[test]
    fn test_writer_uses_stem_and_dash() {
        let writer = CorpusWriter::new("corpus/genji.txt", "");
        assert_eq!(writer.file_name(), "genji");
        assert_eq!(writer.subcorpus_name(), EMPTY_SUBCORPUS);
    }

    #[test]
    fn test_tsv_row() {
        let writer = CorpusWriter::new("genji.txt", "平安");
        let tsv = writer.to_tsv(&[token("月", 10, SentenceBoundary::Begin)]);
        assert_eq!(tsv, "genji\t平安\t10\t20\tB\t月\t月\t\t名詞\t\t\t\t\n");
    }

    #[test]
    fn test_tsv_empty() {
        let writer = CorpusWriter::new("genji.txt", "");
        assert_eq!(writer.to_tsv(&[]), "\n");
    }

    #[test]
    fn test_csv_quotes_comma_surface() {
        let writer = CorpusWriter::new("a.txt", "");
        let csv = writer.to_csv(&[token(",", 10, SentenceBoundary::Inside)]);
        assert!(csv.starts_with("a,-,10,20,I,\",\",\",\",,名詞"));
    }

    #[test]
    fn test_json_column_order() {
        let writer = CorpusWriter::new("a.txt", "");
        let json = writer.to_json(&[token("月", 10, SentenceBoundary::Begin)]).unwrap();
        let file_pos = json.find("\"file_name\"").unwrap();
        let word_pos = json.find("\"word_type\"").unwrap();
        assert!(file_pos < word_pos);
        assert!(json.contains("\"sentence_boundary\": \"B\""));
        assert!(json.ends_with("]\n"));
    }
}
