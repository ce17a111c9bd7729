//! openchj: morphological annotation for the Corpus of Historical Japanese
//!
//! This library annotates Japanese text with morphological analysis and lays
//! the result out in the OpenCHJ positional format, recognizing user-defined
//! editorial tags as atomic tokens.
//!
//! # Features
//!
//! - Japanese morphological analysis with Lindera (IPADIC, optional UniDic)
//! - Pre-analysis formatting: tag removal, whitespace, regex, Aozora Bunko cleanup
//! - Special-tag recognition (`<F:えーと>`) over the analyzer output
//! - Fixed-multiplier corpus positions and sentence boundary flags
//! - TSV, CSV and JSON output
//! - Sequential folder batch processing
//!
//! # Modules
//!
//! - `config`: Application config file and formatting settings
//! - `tokenizer`: Analyzer contract and the Lindera implementation
//! - `annotator`: The annotation pipeline
//! - `output`: Corpus writers
//! - `batch`: File I/O and batch runs

pub mod annotator;
pub mod batch;
pub mod config;
pub mod output;
pub mod tokenizer;

// Re-export commonly used types
pub use annotator::{AnnotateError, AnnotatedToken, Annotator, SentenceBoundary};
pub use config::{AppConfig, FormatSettings};
pub use output::{CorpusWriter, OutputFormat};
pub use tokenizer::{LinderaTokenizer, MorphologicalNode, Tokenizer};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");
