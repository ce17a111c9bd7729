//! Shared test tokenizers
//!
//! `StubTokenizer` segments text by greedy longest match against a small
//! UniDic-style dictionary. Unknown characters become single-character symbol
//! nodes and whitespace is attached to the preceding node, as MeCab does.

#![allow(dead_code)]

use openchj::tokenizer::{MorphologicalNode, Tokenizer, TokenizerError};

pub const UNKNOWN_FEATURE: &str = "記号,一般,*,*";

const DICTIONARY: &[(&str, &str)] = &[
    ("明日", "名詞,普通名詞,副詞可能,*,*,*,アシタ,明日,明日,アシタ,明日,アシタ,和"),
    ("今日", "名詞,普通名詞,副詞可能,*,*,*,キョウ,今日,今日,キョー,今日,キョー,和"),
    ("晴れ", "名詞,普通名詞,一般,*,*,*,ハレ,晴れ,晴れ,ハレ,晴れ,ハレ,和"),
    ("元気", "名詞,普通名詞,形状詞可能,*,*,*,ゲンキ,元気,元気,ゲンキ,元気,ゲンキ,漢"),
    ("えーと", "感動詞,フィラー,*,*,*,*,エート,えーと,えーと,エート,えーと,エート,和"),
    ("は", "助詞,係助詞,*,*,*,*,ハ,は,は,ワ,は,ワ,和"),
    ("だ", "助動詞,*,*,*,助動詞-ダ,終止形-一般,ダ,だ,だ,ダ,だ,ダ,和"),
    ("。", "補助記号,句点,*,*,*,*,,。,。,,。,,記号"),
    ("」", "補助記号,括弧閉,*,*,*,*,,」,」,,」,,記号"),
    ("「", "補助記号,括弧開,*,*,*,*,,「,「,,「,,記号"),
];

pub struct StubTokenizer;

impl Tokenizer for StubTokenizer {
    fn parse(&self, text: &str) -> Result<Vec<MorphologicalNode>, TokenizerError> {
        let mut nodes: Vec<MorphologicalNode> = Vec::new();
        let mut rest = text;

        while let Some(first) = rest.chars().next() {
            if first.is_whitespace() {
                if let Some(last) = nodes.last_mut() {
                    last.white_space.push(first);
                } else {
                    nodes.push(MorphologicalNode::new(first.to_string(), UNKNOWN_FEATURE));
                }
                rest = &rest[first.len_utf8()..];
                continue;
            }

            let entry = DICTIONARY
                .iter()
                .filter(|(surface, _)| rest.starts_with(surface))
                .max_by_key(|(surface, _)| surface.len());

            let (surface, feature) = match entry {
                Some((surface, feature)) => (surface.to_string(), *feature),
                None => (first.to_string(), UNKNOWN_FEATURE),
            };
            rest = &rest[surface.len()..];
            nodes.push(MorphologicalNode::new(surface, feature));
        }

        Ok(nodes)
    }
}

/// Returns the same nodes for any input
pub struct FixedTokenizer(pub Vec<MorphologicalNode>);

impl FixedTokenizer {
    pub fn from_surfaces(surfaces: &[&str]) -> Self {
        Self(
            surfaces
                .iter()
                .map(|s| MorphologicalNode::new(*s, UNKNOWN_FEATURE))
                .collect(),
        )
    }
}

impl Tokenizer for FixedTokenizer {
    fn parse(&self, _text: &str) -> Result<Vec<MorphologicalNode>, TokenizerError> {
        Ok(self.0.clone())
    }
}

pub struct FailingTokenizer;

impl Tokenizer for FailingTokenizer {
    fn parse(&self, _text: &str) -> Result<Vec<MorphologicalNode>, TokenizerError> {
        Err(TokenizerError::Analysis("tagger crashed".to_string()))
    }
}
