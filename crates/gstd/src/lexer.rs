//! Shell-like tokenising shared by request parsing and launch descriptions.
//!
//! Tokens are separated by whitespace. Double quotes group text and honour
//! `\"` and `\\` escapes; single quotes group text literally; a backslash
//! outside quotes escapes the next character.

use std::iter::Peekable;
use std::str::CharIndices;

use thiserror::Error;

/// Errors raised while splitting text into tokens.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LexError {
    /// A quoted section was still open at the end of input.
    #[error("unterminated {0} quote")]
    UnterminatedQuote(char),
    /// A backslash was the final character of the input.
    #[error("dangling escape at end of input")]
    DanglingEscape,
}

/// Incremental tokeniser over a borrowed string.
pub(crate) struct Lexer<'a> {
    input: &'a str,
    chars: Peekable<CharIndices<'a>>,
}

impl<'a> Lexer<'a> {
    pub(crate) fn new(input: &'a str) -> Self {
        Self {
            input,
            chars: input.char_indices().peekable(),
        }
    }

    /// Returns the next token, or `None` once the input is exhausted.
    pub(crate) fn next_token(&mut self) -> Result<Option<String>, LexError> {
        self.skip_whitespace();
        if self.chars.peek().is_none() {
            return Ok(None);
        }
        let mut token = String::new();
        while let Some(&(_, next)) = self.chars.peek()
            && !next.is_whitespace()
        {
            self.chars.next();
            match next {
                '"' | '\'' => self.quoted(next, &mut token)?,
                '\\' => match self.chars.next() {
                    Some((_, escaped)) => token.push(escaped),
                    None => return Err(LexError::DanglingEscape),
                },
                other => token.push(other),
            }
        }
        Ok(Some(token))
    }

    /// Untouched text following the tokens consumed so far, minus leading
    /// whitespace.
    pub(crate) fn remainder(&mut self) -> &'a str {
        self.skip_whitespace();
        match self.chars.peek() {
            Some(&(offset, _)) => self.input.get(offset..).unwrap_or_default(),
            None => "",
        }
    }

    fn skip_whitespace(&mut self) {
        while self.chars.next_if(|(_, ch)| ch.is_whitespace()).is_some() {}
    }

    fn quoted(&mut self, quote: char, token: &mut String) -> Result<(), LexError> {
        loop {
            match self.chars.next() {
                None => return Err(LexError::UnterminatedQuote(quote)),
                Some((_, ch)) if ch == quote => return Ok(()),
                Some((_, '\\')) if quote == '"' => match self.chars.next() {
                    Some((_, escaped @ ('"' | '\\'))) => token.push(escaped),
                    Some((_, other)) => {
                        token.push('\\');
                        token.push(other);
                    }
                    None => return Err(LexError::UnterminatedQuote(quote)),
                },
                Some((_, ch)) => token.push(ch),
            }
        }
    }
}

/// Splits `input` into whitespace-separated tokens.
pub(crate) fn tokenize(input: &str) -> Result<Vec<String>, LexError> {
    let mut lexer = Lexer::new(input);
    let mut tokens = Vec::new();
    while let Some(token) = lexer.next_token()? {
        tokens.push(token);
    }
    Ok(tokens)
}

/// Splits `input` on `separator` wherever it appears outside quotes.
///
/// The pieces keep their quotes and escapes so they can be tokenised later.
pub(crate) fn split_unquoted(input: &str, separator: char) -> Result<Vec<&str>, LexError> {
    let mut pieces = Vec::new();
    let mut quote = None::<char>;
    let mut escaped = false;
    let mut start = 0;
    for (offset, ch) in input.char_indices() {
        if escaped {
            escaped = false;
            continue;
        }
        match (quote, ch) {
            (Some('\''), '\'') | (Some('"'), '"') => quote = None,
            (Some('"') | None, '\\') => escaped = true,
            (None, '"' | '\'') => quote = Some(ch),
            (None, found) if found == separator => {
                pieces.push(input.get(start..offset).unwrap_or_default());
                start = offset + found.len_utf8();
            }
            _ => {}
        }
    }
    if let Some(open) = quote {
        return Err(LexError::UnterminatedQuote(open));
    }
    if escaped {
        return Err(LexError::DanglingEscape);
    }
    pieces.push(input.get(start..).unwrap_or_default());
    Ok(pieces)
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case("read p0/state", &["read", "p0/state"])]
    #[case("  create   pipelines p0 ", &["create", "pipelines", "p0"])]
    #[case(r#"p0 "videotestsrc ! fakesink""#, &["p0", "videotestsrc ! fakesink"])]
    #[case("location='a b.mp4'", &["location=a b.mp4"])]
    #[case(r#"say \"hi\""#, &["say", "\"hi\""])]
    #[case(r#""a \"quoted\" \n word""#, &[r#"a "quoted" \n word"#])]
    fn tokenizes(#[case] input: &str, #[case] expected: &[&str]) {
        assert_eq!(tokenize(input), Ok(expected.iter().map(|s| (*s).to_owned()).collect()));
    }

    #[rstest]
    #[case(r#"p0 "videotestsrc"#, LexError::UnterminatedQuote('"'))]
    #[case("p0 'x", LexError::UnterminatedQuote('\''))]
    #[case(r"trailing \", LexError::DanglingEscape)]
    fn reports_malformed_quoting(#[case] input: &str, #[case] expected: LexError) {
        assert_eq!(tokenize(input), Err(expected));
    }

    #[test]
    fn remainder_preserves_raw_text() {
        let mut lexer = Lexer::new(r#"pipelines p0   filesrc location="a b" ! fakesink"#);
        assert_eq!(lexer.next_token(), Ok(Some("pipelines".to_owned())));
        assert_eq!(lexer.next_token(), Ok(Some("p0".to_owned())));
        assert_eq!(lexer.remainder(), r#"filesrc location="a b" ! fakesink"#);
    }

    #[test]
    fn splits_outside_quotes_only() {
        let pieces = split_unquoted(r#"a ! b name="x!y" ! c"#, '!');
        assert_eq!(pieces, Ok(vec!["a ", r#" b name="x!y" "#, " c"]));
    }
}
