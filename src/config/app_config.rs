//! Application configuration module for openchj
//!
//! Provides TOML-based configuration with environment variable override support.
//! Priority: CLI args > Environment variables > Config file > Defaults

use super::format_settings::{FormatSettings, MAX_SPECIAL_TAG_PATTERNS};
use super::path_resolver::resolve_path;
use crate::output::OutputFormat;
use crate::tokenizer::{DictionaryChoice, SessionOptions};
use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Output file settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputSettings {
    /// tsv, csv, or json
    pub format: OutputFormat,
    /// Prepended to the input file stem
    pub prefix: String,
    /// Appended to the input file stem; date placeholders are expanded
    pub suffix: String,
    /// Directory for results (default: the user's Downloads directory)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output_directory: Option<String>,
    /// Descend into subfolders in batch mode
    pub include_subfolders: bool,
}

fn default_suffix() -> String {
    "_analyzed".to_string()
}

impl Default for OutputSettings {
    fn default() -> Self {
        Self {
            format: OutputFormat::default(),
            prefix: String::new(),
            suffix: default_suffix(),
            output_directory: None,
            include_subfolders: false,
        }
    }
}

/// Application configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct AppConfig {
    /// System dictionary: ipadic or unidic
    #[serde(default)]
    dictionary: DictionaryChoice,

    /// Lindera dictionary URI or directory used instead of the embedded one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    dictionary_path: Option<String>,

    /// User dictionary (Lindera CSV or compiled `.bin`)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    user_dictionary_path: Option<String>,

    /// Subcorpus column value (`-` in output when empty)
    #[serde(default)]
    subcorpus_name: String,

    /// JSON table mapping JIS codes (`1-14-76`) to characters for Aozora notes
    #[serde(default, skip_serializing_if = "Option::is_none")]
    jis_mapping_path: Option<String>,

    /// Formatting applied before analysis
    #[serde(default)]
    format: FormatSettings,

    /// Output file settings
    #[serde(default)]
    output: OutputSettings,
}

impl AppConfig {
    /// Create config from a TOML file
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| anyhow!("Failed to read config file {}: {}", path.display(), e))?;
        let config: AppConfig = toml::from_str(&content)
            .map_err(|e| anyhow!("Failed to parse config file: {}", e))?;
        Ok(config)
    }

    /// Load the given file, or the default config file if it exists, or defaults
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(p) => Self::from_file(p),
            None => {
                let default_path = super::path_resolver::get_default_config_path();
                if default_path.is_file() {
                    Self::from_file(&default_path)
                } else {
                    tracing::debug!(
                        "No config file at {}, using defaults",
                        default_path.display()
                    );
                    Ok(Self::default())
                }
            }
        }
    }

    /// Apply the values set in `overrides`, leaving the rest untouched
    pub fn with_overrides(mut self, overrides: &ConfigOverrides) -> Self {
        if let Some(dictionary) = overrides.dictionary {
            self.dictionary = dictionary;
        }
        if let Some(path) = &overrides.dictionary_path {
            self.dictionary_path = Some(path.clone());
        }
        if let Some(path) = &overrides.user_dictionary_path {
            self.user_dictionary_path = Some(path.clone());
        }
        if let Some(name) = &overrides.subcorpus_name {
            self.subcorpus_name = name.clone();
        }
        if let Some(path) = &overrides.jis_mapping_path {
            self.jis_mapping_path = Some(path.clone());
        }
        if let Some(format) = overrides.output_format {
            self.output.format = format;
        }
        if let Some(dir) = &overrides.output_directory {
            self.output.output_directory = Some(dir.clone());
        }
        if let Some(include) = overrides.include_subfolders {
            self.output.include_subfolders = include;
        }
        self
    }

    /// Dictionaries for opening a tokenizer session
    ///
    /// Local paths are expanded and made absolute; URIs with a scheme
    /// (`embedded://ipadic`, `file://...`) pass through.
    pub fn session_options(&self) -> SessionOptions {
        SessionOptions {
            dictionary: self.dictionary,
            dictionary_path: self.dictionary_path.as_deref().map(dictionary_location),
            user_dictionary_path: self.user_dictionary_path.as_deref().map(dictionary_location),
        }
    }

    /// Override the subcorpus name
    pub fn with_subcorpus_name(mut self, name: &str) -> Self {
        self.subcorpus_name = name.to_string();
        self
    }

    /// Override the output format
    pub fn with_output_format(mut self, format: OutputFormat) -> Self {
        self.output.format = format;
        self
    }

    /// Override the output directory
    pub fn with_output_directory(mut self, dir: &str) -> Self {
        self.output.output_directory = Some(dir.to_string());
        self
    }

    /// Override the dictionary
    pub fn with_dictionary(mut self, dictionary: DictionaryChoice) -> Self {
        self.dictionary = dictionary;
        self
    }

    /// Override the formatting settings
    pub fn with_format(mut self, format: FormatSettings) -> Self {
        self.format = format;
        self
    }

    /// Override subfolder traversal
    pub fn with_include_subfolders(mut self, include: bool) -> Self {
        self.output.include_subfolders = include;
        self
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.output.suffix.contains(['/', '\\']) {
            return Err(anyhow!(
                "Output suffix must not contain path separators: '{}'",
                self.output.suffix
            ));
        }

        if self.output.prefix.contains(['/', '\\']) {
            return Err(anyhow!(
                "Output prefix must not contain path separators: '{}'",
                self.output.prefix
            ));
        }

        let pattern_count = self.format.tag_special_settings.tag_patterns.len();
        if pattern_count > MAX_SPECIAL_TAG_PATTERNS {
            tracing::warn!(
                "{} special tag patterns configured; only {} will be used",
                pattern_count,
                MAX_SPECIAL_TAG_PATTERNS
            );
        }

        Ok(())
    }

    /// Serialize to TOML string
    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).map_err(|e| anyhow!("Failed to serialize config: {}", e))
    }

    // Getters
    pub fn dictionary(&self) -> DictionaryChoice {
        self.dictionary
    }

    pub fn dictionary_path(&self) -> Option<&str> {
        self.dictionary_path.as_deref()
    }

    pub fn user_dictionary_path(&self) -> Option<&str> {
        self.user_dictionary_path.as_deref()
    }

    pub fn subcorpus_name(&self) -> &str {
        &self.subcorpus_name
    }

    pub fn jis_mapping_path(&self) -> Option<&str> {
        self.jis_mapping_path.as_deref()
    }

    pub fn format(&self) -> &FormatSettings {
        &self.format
    }

    pub fn output(&self) -> &OutputSettings {
        &self.output
    }
}

fn dictionary_location(value: &str) -> String {
    if value.contains("://") {
        return value.to_string();
    }
    match resolve_path(value) {
        Ok(path) => path.to_string_lossy().into_owned(),
        Err(e) => {
            tracing::warn!("Using dictionary path '{}' as given: {}", value, e);
            value.to_string()
        }
    }
}

/// Values supplied by the environment or the command line
///
/// `None` leaves the underlying config value in place, so an override may set
/// a value back to its default.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigOverrides {
    pub dictionary: Option<DictionaryChoice>,
    pub dictionary_path: Option<String>,
    pub user_dictionary_path: Option<String>,
    pub subcorpus_name: Option<String>,
    pub jis_mapping_path: Option<String>,
    pub output_format: Option<OutputFormat>,
    pub output_directory: Option<String>,
    pub include_subfolders: Option<bool>,
}

impl ConfigOverrides {
    /// Read the `OPENCHJ_*` environment variables
    pub fn from_env() -> Self {
        let var = |name: &str| std::env::var(name).ok();

        let output_format = var("OPENCHJ_OUTPUT_FORMAT").and_then(|f| match f.parse() {
            Ok(format) => Some(format),
            Err(e) => {
                tracing::warn!("Ignoring OPENCHJ_OUTPUT_FORMAT: {}", e);
                None
            }
        });

        let dictionary = var("OPENCHJ_DICTIONARY").and_then(|d| {
            let choice = DictionaryChoice::parse(&d);
            if choice.is_none() {
                tracing::warn!("Ignoring unknown OPENCHJ_DICTIONARY '{}'", d);
            }
            choice
        });

        Self {
            dictionary,
            dictionary_path: var("OPENCHJ_DICTIONARY_PATH"),
            user_dictionary_path: var("OPENCHJ_USER_DICTIONARY_PATH"),
            subcorpus_name: var("OPENCHJ_SUBCORPUS_NAME"),
            jis_mapping_path: var("OPENCHJ_JIS_MAPPING"),
            output_format,
            output_directory: var("OPENCHJ_OUTPUT_DIR"),
            include_subfolders: None,
        }
    }
}
