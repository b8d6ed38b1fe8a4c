use std::collections::BTreeMap;

use crate::common::{FeatureId, LangId};

/// A leaf value of the token trie: the feature the token belongs to and the
/// language its name was indexed under.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct TrieValue {
    pub feature: FeatureId,
    pub lang: LangId,
}

#[derive(Default, Debug)]
struct TrieNode {
    children: BTreeMap<char, TrieNode>,
    values: Vec<TrieValue>,
}

/// Character trie mapping indexed tokens to their leaf values.
///
/// The trie is built once by the tile builder and read-only afterwards.
/// Matching walks it through a [`TrieCursor`], one character edge at a time;
/// a node's values are the leaf values of the token spelled by the path from
/// the root.
#[derive(Default, Debug)]
pub struct TokenTrie {
    root: TrieNode,
    num_values: usize,
}

impl TokenTrie {
    pub fn new() -> TokenTrie {
        TokenTrie::default()
    }

    /// Inserts a `(token, value)` pair. Duplicate pairs are kept; matching
    /// dedups by feature downstream.
    pub fn insert(&mut self, token: &str, value: TrieValue) {
        let mut node = &mut self.root;
        for c in token.chars() {
            node = node.children.entry(c).or_default();
        }
        node.values.push(value);
        self.num_values += 1;
    }

    /// Number of values stored in the trie.
    pub fn len(&self) -> usize {
        self.num_values
    }

    pub fn is_empty(&self) -> bool {
        self.num_values == 0
    }

    /// Cursor positioned at the trie root.
    pub fn root(&self) -> TrieCursor<'_> {
        TrieCursor { node: &self.root }
    }
}

/// Read-only position inside a [`TokenTrie`].
#[derive(Clone, Copy)]
pub struct TrieCursor<'a> {
    node: &'a TrieNode,
}

impl<'a> TrieCursor<'a> {
    /// Follows the edge labelled `c`.
    pub fn descend(self, c: char) -> Option<TrieCursor<'a>> {
        self.node
            .children
            .get(&c)
            .map(|node| TrieCursor { node })
    }

    /// Follows the edges spelling `token`, if the whole path exists.
    pub fn descend_str(self, token: &str) -> Option<TrieCursor<'a>> {
        let mut cursor = self;
        for c in token.chars() {
            cursor = cursor.descend(c)?;
        }
        Some(cursor)
    }

    /// Leaf values of the token ending at this position.
    pub fn values(&self) -> &'a [TrieValue] {
        &self.node.values
    }

    /// Visits the values of this position and of every position below it, in
    /// depth-first edge order. Used for prefix matching.
    pub fn for_each_value_in_subtree<C: FnMut(&TrieValue)>(&self, collector: &mut C) {
        for value in &self.node.values {
            collector(value);
        }
        for child in self.node.children.values() {
            TrieCursor { node: child }.for_each_value_in_subtree(collector);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn value(feature: FeatureId) -> TrieValue {
        TrieValue { feature, lang: 0 }
    }

    fn build() -> TokenTrie {
        let mut trie = TokenTrie::new();
        trie.insert("bar", value(1));
        trie.insert("bar", value(2));
        trie.insert("barn", value(3));
        trie.insert("whiskey", value(1));
        trie
    }

    #[test]
    fn test_insert_and_find() {
        let trie = build();
        assert_eq!(trie.len(), 4);
        let cursor = trie.root().descend_str("bar").unwrap();
        let features: Vec<FeatureId> = cursor.values().iter().map(|v| v.feature).collect();
        assert_eq!(features, vec![1, 2]);
    }

    #[test]
    fn test_missing_token() {
        let trie = build();
        assert!(trie.root().descend_str("baz").is_none());
        assert!(trie.root().descend_str("whiskeys").is_none());
    }

    #[test]
    fn test_interior_node_has_no_values() {
        let trie = build();
        let cursor = trie.root().descend_str("whis").unwrap();
        assert!(cursor.values().is_empty());
    }

    #[test]
    fn test_subtree_values() {
        let trie = build();
        let cursor = trie.root().descend_str("bar").unwrap();
        let mut features = Vec::new();
        cursor.for_each_value_in_subtree(&mut |v| features.push(v.feature));
        assert_eq!(features, vec![1, 2, 3]);
    }

    #[test]
    fn test_empty_trie() {
        let trie = TokenTrie::new();
        assert!(trie.is_empty());
        assert!(trie.root().values().is_empty());
        assert!(trie.root().descend('a').is_none());
    }
}
