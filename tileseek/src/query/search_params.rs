use smallvec::SmallVec;

use crate::common::constants::DEFAULT_SEARCH_SCALE;
use crate::common::util::tokenizer::{fold_token, DelimiterFilter, StringTokenizer};
use crate::common::LangId;
use crate::errors::{ErrorKind, TileSeekError, TileSeekResult};

/// A group of synonym tokens; a feature satisfies the group when any synonym
/// matches one of its indexed tokens.
pub type TokenGroup = SmallVec<[String; 2]>;

/// Languages the text index can encode, in table order.
const SUPPORTED_LANGS: &[&str] = &["en", "de", "fr", "es", "it", "ru", "ja", "zh"];

/// Returns the compact index of a language code, if supported.
pub fn lang_index(code: &str) -> Option<LangId> {
    SUPPORTED_LANGS
        .iter()
        .position(|&lang| lang == code)
        .map(|idx| idx as LangId)
}

/// Parameters of a textual search over tiles.
///
/// A query is an ordered sequence of token groups (each a set of synonyms),
/// an optional prefix group for the incomplete last word, a set of language
/// indexes and a preferred scale hint. Tokens are matched against the tile's
/// text index exactly as stored, so callers either pass pre-normalized tokens
/// through [`SearchParams::push_group`] or use [`SearchParams::from_query`]
/// which tokenizes and case-folds a raw query string.
#[derive(Clone, Debug)]
pub struct SearchParams {
    tokens: Vec<TokenGroup>,
    prefix_tokens: TokenGroup,
    langs: SmallVec<[LangId; 4]>,
    scale: u32,
}

impl Default for SearchParams {
    fn default() -> Self {
        SearchParams::new()
    }
}

impl SearchParams {
    pub fn new() -> SearchParams {
        SearchParams {
            tokens: Vec::new(),
            prefix_tokens: TokenGroup::new(),
            langs: SmallVec::new(),
            scale: DEFAULT_SEARCH_SCALE,
        }
    }

    /// Builds params from a raw query string: the query is split on the
    /// default delimiter set, each word case-folded into its own
    /// single-synonym group.
    pub fn from_query(query: &str) -> SearchParams {
        let mut params = SearchParams::new();
        for token in StringTokenizer::new(DelimiterFilter, query) {
            let mut group = TokenGroup::new();
            group.push(fold_token(token.term()));
            params.tokens.push(group);
        }
        params
    }

    /// Appends a token group.
    pub fn push_group(&mut self, group: TokenGroup) {
        self.tokens.push(group);
    }

    /// Sets the prefix group matched against incomplete last words.
    pub fn set_prefix_tokens(&mut self, group: TokenGroup) {
        self.prefix_tokens = group;
    }

    /// Restricts matching to the given language.
    ///
    /// With no language added, values of every language are accepted.
    pub fn add_lang(&mut self, code: &str) -> TileSeekResult<()> {
        let idx = lang_index(code).ok_or_else(|| {
            TileSeekError::new(
                &format!("Unsupported language code: {}", code),
                ErrorKind::InvalidOperation,
            )
        })?;
        if !self.langs.contains(&idx) {
            self.langs.push(idx);
        }
        Ok(())
    }

    pub fn token_groups(&self) -> &[TokenGroup] {
        &self.tokens
    }

    pub fn prefix_tokens(&self) -> &TokenGroup {
        &self.prefix_tokens
    }

    pub fn langs(&self) -> &[LangId] {
        &self.langs
    }

    /// Whether a value in language `lang` may match this query.
    pub fn accepts_lang(&self, lang: LangId) -> bool {
        self.langs.is_empty() || self.langs.contains(&lang)
    }

    pub fn scale(&self) -> u32 {
        self.scale
    }

    pub fn set_scale(&mut self, scale: u32) {
        self.scale = scale;
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty() && self.prefix_tokens.is_empty()
    }

    /// Resets the params to an empty query, keeping languages and scale.
    pub fn clear(&mut self) {
        self.tokens.clear();
        self.prefix_tokens.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_query_folds_and_splits() {
        let params = SearchParams::from_query("Whiskey Bar");
        assert_eq!(params.token_groups().len(), 2);
        assert_eq!(params.token_groups()[0].as_slice(), &["whiskey"]);
        assert_eq!(params.token_groups()[1].as_slice(), &["bar"]);
        assert!(params.prefix_tokens().is_empty());
    }

    #[test]
    fn test_from_query_empty() {
        let params = SearchParams::from_query("  ,. ");
        assert!(params.is_empty());
    }

    #[test]
    fn test_lang_index() {
        assert_eq!(lang_index("en"), Some(0));
        assert_eq!(lang_index("ru"), Some(5));
        assert_eq!(lang_index("xx"), None);
    }

    #[test]
    fn test_add_lang_and_accepts() {
        let mut params = SearchParams::from_query("bar");
        assert!(params.accepts_lang(3));
        params.add_lang("en").unwrap();
        params.add_lang("en").unwrap();
        assert_eq!(params.langs().len(), 1);
        assert!(params.accepts_lang(0));
        assert!(!params.accepts_lang(3));
    }

    #[test]
    fn test_add_lang_unknown() {
        let mut params = SearchParams::new();
        let err = params.add_lang("klingon").unwrap_err();
        assert_eq!(err.kind(), &crate::errors::ErrorKind::InvalidOperation);
    }

    #[test]
    fn test_default_scale() {
        assert_eq!(SearchParams::new().scale(), DEFAULT_SEARCH_SCALE);
    }

    #[test]
    fn test_clear_keeps_langs() {
        let mut params = SearchParams::from_query("cafe mtv");
        params.add_lang("en").unwrap();
        params.clear();
        assert!(params.is_empty());
        assert_eq!(params.langs().len(), 1);
    }
}
