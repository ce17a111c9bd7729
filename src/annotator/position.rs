//! OpenCHJ corpus positions
//!
//! Each formatted-text character occupies `CHJ_POSITION_MULTIPLIER` position
//! units and the first token starts at one multiplier.

use super::record::TokenRecord;

/// Position units per formatted character
pub const CHJ_POSITION_MULTIPLIER: usize = 10;

/// Assign contiguous corpus positions from each record's window length
///
/// Records without a window are dropped.
pub fn translate(records: Vec<TokenRecord>) -> Vec<TokenRecord> {
    let mut cursor = CHJ_POSITION_MULTIPLIER;

    records
        .into_iter()
        .filter_map(|mut record| {
            let Some(window) = record.window else {
                tracing::warn!(
                    "Skipping token without a text window: {}",
                    record.surface_form
                );
                return None;
            };
            record.start_position = cursor;
            record.end_position = cursor + window.len() * CHJ_POSITION_MULTIPLIER;
            cursor = record.end_position;
            Some(record)
        })
        .collect()
}
