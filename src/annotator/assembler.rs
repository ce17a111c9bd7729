//! Token assembly
//!
//! Walks analyzer nodes and special-tag matches in lockstep, producing one
//! record per non-blank node or per matched tag. Windows are in characters of
//! the formatted text.

use super::matcher::SpecialTagMatch;
use super::record::TokenRecord;
use crate::tokenizer::{FeatureLayout, MorphologicalNode};

/// Assemble records using the UniDic feature layout
pub fn assemble(nodes: &[MorphologicalNode], matches: &[SpecialTagMatch<'_>]) -> Vec<TokenRecord> {
    assemble_with_layout(nodes, matches, &FeatureLayout::UNIDIC)
}

/// Assemble records reading node features with `layout`
///
/// `matches` must be ordered by start and non-overlapping.
pub fn assemble_with_layout(
    nodes: &[MorphologicalNode],
    matches: &[SpecialTagMatch<'_>],
    layout: &FeatureLayout,
) -> Vec<TokenRecord> {
    let mut records = Vec::with_capacity(nodes.len());
    let mut cursor = 0usize;
    let mut pending = matches.iter().peekable();
    let mut index = 0usize;

    while index < nodes.len() {
        if let Some(tag) = pending.next_if(|m| m.start == index) {
            let record = TokenRecord::special(tag.pattern, cursor);
            cursor += record.window.map_or(0, |w| w.len());
            records.push(record);
            index = tag.end + 1;
            continue;
        }

        let node = &nodes[index];
        if !node.surface.trim().is_empty() {
            let record = TokenRecord::from_node(node, layout, cursor).unwrap_or_else(|e| {
                tracing::error!("Token construction failed for '{}': {}", node.surface, e);
                TokenRecord::fallback(&node.surface, cursor)
            });
            records.push(record);
        }

        cursor += node.consumed_len();
        index += 1;
    }

    records
}
