//! Annotation core
//!
//! Turns raw corpus text into OpenCHJ token records:
//!
//! - `formatter`: pre-analysis text formatting (tags, whitespace, regex, Aozora)
//! - `matcher`: special-tag recognition over analyzer nodes
//! - `assembler`: node and tag records with formatted-text windows
//! - `position`: fixed-multiplier corpus positions
//! - `boundary`: sentence-initial flags
//! - `preview`: tag highlighting on raw text
//! - `pipeline`: the `Annotator` tying the steps together

mod aozora;
mod assembler;
mod boundary;
mod formatter;
mod matcher;
mod pipeline;
mod position;
mod preview;
mod record;

pub use aozora::{aozora_cleanup, JisMapping};
pub use assembler::{assemble, assemble_with_layout};
pub use boundary::resolve;
pub use formatter::{format_text, TAG_REMOVAL_KEYS};
pub use matcher::{find_matches, SpecialTagMatch};
pub use pipeline::{AnnotateError, Annotator};
pub use position::{translate, CHJ_POSITION_MULTIPLIER};
pub use preview::{find_tags_in_text, Preview, TagHighlight};
pub use record::{
    format_pos, AnnotatedToken, CharWindow, SentenceBoundary, TokenBuildError, TokenRecord,
    UNKNOWN_POS,
};
