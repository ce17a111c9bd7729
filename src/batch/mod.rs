//! File and folder processing
//!
//! Reading corpus files, naming result files, and running the annotator over a
//! directory with a single tokenizer session.

mod files;
mod runner;

pub use files::{
    collect_input_files, decode_text, expand_datetime_placeholders, output_file_name, read_text_file,
    write_text_file, DecodedText, DEFAULT_SUFFIX,
};
pub use runner::{
    annotate_file, BatchItem, BatchOutcome, BatchReport, BatchRunner, CancelFlag, INPUT_EXTENSION,
};
