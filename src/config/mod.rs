//! Configuration module for openchj
//!
//! This module defines the application config file and the text formatting
//! settings applied before analysis.

pub mod app_config;
mod format_settings;
pub mod path_resolver;

pub use app_config::{AppConfig, ConfigOverrides, OutputSettings};
pub use format_settings::{
    BracketType, FormatSettings, PatternError, RegexRule, RegexSettings, SpecialTagPattern,
    SpecialTagSettings, TagPatternEntry, TagRemovalMode, TagRemovalSettings, WhitespaceSettings,
    DEFAULT_SPECIAL_TAG_POS, MAX_SPECIAL_TAG_PATTERNS,
};
