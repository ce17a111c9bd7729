//! Sentence boundary marking

use super::record::{SentenceBoundary, TokenRecord};

const PERIOD: &str = "。";
const CLOSE_QUOTE: &str = "」";
const OPEN_QUOTE: &str = "「";

/// Mark sentence-initial tokens
///
/// The first token begins a sentence; so does the token after `。` or `」`.
/// In `。」` the closing quote stays inside the sentence, and a `「` right
/// after it begins the next one.
pub fn resolve(records: &mut [TokenRecord]) {
    for (i, record) in records.iter_mut().enumerate() {
        record.sentence_boundary = if i == 0 {
            SentenceBoundary::Begin
        } else {
            SentenceBoundary::Inside
        };
    }

    for i in 0..records.len().saturating_sub(1) {
        let current = records[i].surface_form.as_str();
        let next = records[i + 1].surface_form.as_str();

        if current == PERIOD && next == CLOSE_QUOTE {
            records[i + 1].sentence_boundary = SentenceBoundary::Inside;
            if records
                .get(i + 2)
                .is_some_and(|r| r.surface_form == OPEN_QUOTE)
            {
                records[i + 2].sentence_boundary = SentenceBoundary::Begin;
            }
        } else if current == PERIOD || current == CLOSE_QUOTE {
            records[i + 1].sentence_boundary = SentenceBoundary::Begin;
        }
    }
}
