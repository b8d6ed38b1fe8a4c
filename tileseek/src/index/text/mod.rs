//! Textual (trie) index over feature name tokens.

pub mod matcher;
pub mod trie;

pub use matcher::{match_features_in_trie, AllPassFilter, ValueFilter};
pub use trie::{TokenTrie, TrieCursor, TrieValue};
