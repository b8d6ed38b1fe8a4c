//! Tile-agnostic trie matching: walks a [`TokenTrie`] consuming the query's
//! token groups and emits every matched leaf value through a collector.

use crate::common::util::tokenizer::fold_token;
use crate::common::FeatureId;
use crate::index::text::trie::{TokenTrie, TrieValue};
use crate::query::{SearchParams, TokenGroup};
use crate::store::tile::TextCodingParams;

/// Last-chance filter applied to matched values before they reach the
/// collector.
pub trait ValueFilter {
    fn accepts(&self, feature: FeatureId) -> bool;
}

/// Filter that accepts every feature; the retrieval engine applies no
/// semantic filtering at this stage.
pub struct AllPassFilter;

impl ValueFilter for AllPassFilter {
    #[inline]
    fn accepts(&self, _feature: FeatureId) -> bool {
        true
    }
}

/// Matches `params` against `trie` and feeds each matched leaf value through
/// `filter` into `collector`.
///
/// A feature matches when every token group is satisfied by at least one of
/// its indexed tokens (exact match, any synonym) and, if a prefix group is
/// present, some indexed token starts with one of the prefix synonyms. Values
/// whose language the params reject never match. An empty query matches
/// nothing.
pub fn match_features_in_trie<F, C>(
    params: &SearchParams,
    coding: &TextCodingParams,
    trie: &TokenTrie,
    filter: &F,
    collector: &mut C,
) where
    F: ValueFilter,
    C: FnMut(&TrieValue),
{
    if params.is_empty() {
        return;
    }

    let mut matched: Vec<TrieValue> = Vec::new();
    let mut seeded = false;

    let narrow = |hits: Vec<TrieValue>, matched: &mut Vec<TrieValue>, seeded: &mut bool| {
        if *seeded {
            *matched = intersect_by_feature(matched, &hits);
        } else {
            *matched = hits;
            *seeded = true;
        }
        !matched.is_empty()
    };

    for group in params.token_groups() {
        let hits = match_token_group(params, coding, trie, group, false);
        if !narrow(hits, &mut matched, &mut seeded) {
            return;
        }
    }
    if !params.prefix_tokens().is_empty() {
        let hits = match_token_group(params, coding, trie, params.prefix_tokens(), true);
        if !narrow(hits, &mut matched, &mut seeded) {
            return;
        }
    }

    for value in &matched {
        if filter.accepts(value.feature) {
            collector(value);
        }
    }
}

/// Values matching one token group, sorted and deduplicated by feature.
fn match_token_group(
    params: &SearchParams,
    coding: &TextCodingParams,
    trie: &TokenTrie,
    group: &TokenGroup,
    prefix: bool,
) -> Vec<TrieValue> {
    let mut hits: Vec<TrieValue> = Vec::new();
    for token in group {
        let folded;
        let token = if coding.case_folded {
            folded = fold_token(token);
            folded.as_str()
        } else {
            token.as_str()
        };
        let Some(cursor) = trie.root().descend_str(token) else {
            continue;
        };
        if prefix {
            cursor.for_each_value_in_subtree(&mut |value| {
                if params.accepts_lang(value.lang) {
                    hits.push(*value);
                }
            });
        } else {
            for value in cursor.values() {
                if params.accepts_lang(value.lang) {
                    hits.push(*value);
                }
            }
        }
    }
    hits.sort_unstable_by_key(|value| value.feature);
    hits.dedup_by_key(|value| value.feature);
    hits
}

/// Two-pointer intersection of value lists sorted by feature; representatives
/// come from the left side.
fn intersect_by_feature(left: &[TrieValue], right: &[TrieValue]) -> Vec<TrieValue> {
    let mut out = Vec::with_capacity(left.len().min(right.len()));
    let (mut i, mut j) = (0, 0);
    while i < left.len() && j < right.len() {
        match left[i].feature.cmp(&right[j].feature) {
            std::cmp::Ordering::Less => i += 1,
            std::cmp::Ordering::Greater => j += 1,
            std::cmp::Ordering::Equal => {
                out.push(left[i]);
                i += 1;
                j += 1;
            }
        }
    }
    out
}
