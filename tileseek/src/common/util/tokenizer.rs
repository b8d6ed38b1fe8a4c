//! Filter-driven string tokenization used for index building and query
//! normalization.

/// A type for classifying chars during tokenization.
pub trait StringFilter {
    /// Returns true when the character separates tokens and is discarded.
    fn is_delimiter(&self, c: char) -> bool;
}

/// A filter for selecting whitespace characters only.
pub struct WhitespaceFilter;

impl StringFilter for WhitespaceFilter {
    #[inline]
    fn is_delimiter(&self, c: char) -> bool {
        c.is_whitespace()
    }
}

/// The delimiter set used when indexing and normalizing feature names:
/// whitespace plus common punctuation.
pub struct DelimiterFilter;

impl StringFilter for DelimiterFilter {
    #[inline]
    fn is_delimiter(&self, c: char) -> bool {
        c.is_whitespace()
            || matches!(
                c,
                ',' | '.'
                    | ';'
                    | ':'
                    | '!'
                    | '?'
                    | '"'
                    | '\''
                    | '('
                    | ')'
                    | '['
                    | ']'
                    | '{'
                    | '}'
                    | '<'
                    | '>'
                    | '-'
                    | '_'
                    | '/'
                    | '\\'
                    | '|'
                    | '@'
                    | '#'
                    | '$'
                    | '%'
                    | '^'
                    | '&'
                    | '*'
                    | '+'
                    | '='
                    | '~'
            )
    }
}

/// A token extracted from an input string.
pub struct Token<'a> {
    term: &'a str,
    position: usize,
}

impl<'a> Token<'a> {
    #[inline]
    pub fn term(&self) -> &'a str {
        self.term
    }

    #[inline]
    pub fn position(&self) -> usize {
        self.position
    }
}

/// Iterator that extracts tokens based on a provided [`StringFilter`].
pub struct StringTokenizer<'a, F: StringFilter> {
    filter: F,
    input: &'a str,
    byte_offset: usize,
    position: usize,
}

impl<'a, F: StringFilter> StringTokenizer<'a, F> {
    pub fn new(filter: F, input: &'a str) -> Self {
        StringTokenizer {
            filter,
            input,
            byte_offset: 0,
            position: 0,
        }
    }
}

impl<'a, F: StringFilter> Iterator for StringTokenizer<'a, F> {
    type Item = Token<'a>;

    fn next(&mut self) -> Option<Token<'a>> {
        let rest = &self.input[self.byte_offset..];
        let mut start = None;
        for (i, c) in rest.char_indices() {
            if self.filter.is_delimiter(c) {
                if let Some(s) = start {
                    self.byte_offset += i + c.len_utf8();
                    let token = Token {
                        term: &rest[s..i],
                        position: self.position,
                    };
                    self.position += 1;
                    return Some(token);
                }
            } else if start.is_none() {
                start = Some(i);
            }
        }
        self.byte_offset = self.input.len();
        start.map(|s| {
            let token = Token {
                term: &rest[s..],
                position: self.position,
            };
            self.position += 1;
            token
        })
    }
}

/// Case-folds a token the way the text index stores it.
pub fn fold_token(token: &str) -> String {
    token.to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn terms<F: StringFilter>(filter: F, input: &str) -> Vec<String> {
        StringTokenizer::new(filter, input)
            .map(|t| t.term().to_string())
            .collect()
    }

    #[test]
    fn test_whitespace_tokenizer() {
        assert_eq!(terms(WhitespaceFilter, "hello  world"), vec!["hello", "world"]);
    }

    #[test]
    fn test_delimiter_tokenizer() {
        assert_eq!(
            terms(DelimiterFilter, "Cafe \"MTV\", 2nd floor"),
            vec!["Cafe", "MTV", "2nd", "floor"]
        );
    }

    #[test]
    fn test_token_positions() {
        let positions: Vec<usize> = StringTokenizer::new(WhitespaceFilter, "a b c")
            .map(|t| t.position())
            .collect();
        assert_eq!(positions, vec![0, 1, 2]);
    }

    #[test]
    fn test_empty_and_all_delimiters() {
        assert!(terms(DelimiterFilter, "").is_empty());
        assert!(terms(DelimiterFilter, " -- , ").is_empty());
    }

    #[test]
    fn test_unicode_input() {
        assert_eq!(terms(WhitespaceFilter, "кафе münchen"), vec!["кафе", "münchen"]);
    }

    #[test]
    fn test_fold_token() {
        assert_eq!(fold_token("Whiskey"), "whiskey");
        assert_eq!(fold_token("MÜNCHEN"), "münchen");
    }
}
