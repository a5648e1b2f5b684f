//! Tokenization of reference and attempt text
//!
//! Splits text into words, punctuation marks, and `{...}` directives. Text is
//! kept verbatim: casing and apostrophes survive untouched so the matcher can
//! classify them later.

use std::sync::LazyLock;

use regex::Regex;

use crate::error::{Error, Result};

/// Punctuation marks that always stand alone as tokens
const PUNCTUATION: &[char] = &['.', '?', ':', ',', '!', '"', ';', '(', ')'];

/// Runs of single capitals each followed by a period ("U.S.A.")
static ABBREVIATION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(?:\p{Lu}\.){2,}").expect("abbreviation pattern is valid"));

/// Lexical shape of a token
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenKind {
    /// Ordinary word (including abbreviations and contractions)
    Word,
    /// One of `. ? : , ! " ; ( )`
    Punctuation,
    /// `{phrase}` - may be omitted; the phrase is pre-tokenized
    Optional(Vec<String>),
    /// `{a|b|c}` - required, any spelling accepted; each alternative pre-tokenized
    Alternatives(Vec<Vec<String>>),
    /// `{ }` - neighbours may be written with or without a space
    OptionalSpace,
}

/// A single token with its verbatim text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    text: String,
    kind: TokenKind,
}

impl Token {
    fn word(text: &str) -> Self {
        Self {
            text: text.to_string(),
            kind: TokenKind::Word,
        }
    }

    fn punctuation(mark: char) -> Self {
        Self {
            text: mark.to_string(),
            kind: TokenKind::Punctuation,
        }
    }

    /// Parse a `{...}` directive. `offset` is the byte position of the `{`.
    fn directive(raw: &str, offset: usize) -> Result<Self> {
        let inner = &raw[1..raw.len() - 1];

        let kind = if inner.is_empty() {
            return Err(Error::EmptyDirective { offset });
        } else if inner.trim().is_empty() {
            TokenKind::OptionalSpace
        } else if inner.contains('|') {
            let alternatives = inner
                .split('|')
                .map(|alternative| {
                    let alternative = alternative.trim();
                    if alternative.is_empty() {
                        return Err(Error::EmptyAlternative { offset });
                    }
                    token_texts(alternative)
                })
                .collect::<Result<Vec<_>>>()?;
            TokenKind::Alternatives(alternatives)
        } else {
            TokenKind::Optional(token_texts(inner.trim())?)
        };

        Ok(Self {
            text: raw.to_string(),
            kind,
        })
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn kind(&self) -> &TokenKind {
        &self.kind
    }

    /// Optional phrases and optional spaces: omitting them costs nothing
    pub fn is_pure_optional(&self) -> bool {
        matches!(self.kind, TokenKind::Optional(_) | TokenKind::OptionalSpace)
    }

    pub fn is_optional_space(&self) -> bool {
        self.kind == TokenKind::OptionalSpace
    }

    /// Whether this token contributes to the perfect score
    pub fn is_scored(&self) -> bool {
        !self.is_pure_optional()
    }
}

/// Split reference text into tokens.
///
/// Malformed directives (unbalanced or nested braces, `{}`, blank alternatives)
/// are rejected rather than tokenized as words.
pub fn tokenize(text: &str) -> Result<Vec<Token>> {
    scan(text, true)
}

/// Split a learner's attempt into tokens. Braces are ordinary word characters
/// here, since directives belong to references only; stray braces never fail.
pub fn tokenize_attempt(text: &str) -> Result<Vec<Token>> {
    scan(text, false)
}

fn scan(text: &str, directives: bool) -> Result<Vec<Token>> {
    let mut tokens = Vec::new();
    let mut word = String::new();
    let mut pos = 0;

    while let Some(c) = text[pos..].chars().next() {
        let rest = &text[pos..];

        if word.is_empty() {
            if let Some(len) = abbreviation_len(rest) {
                tokens.push(Token::word(&rest[..len]));
                pos += len;
                continue;
            }
        }

        match c {
            '{' if directives => {
                flush_word(&mut word, &mut tokens);
                let len = directive_len(rest, pos)?;
                tokens.push(Token::directive(&rest[..len], pos)?);
                pos += len;
                continue;
            }
            '}' if directives => return Err(Error::UnopenedDirective { offset: pos }),
            c if c.is_whitespace() => flush_word(&mut word, &mut tokens),
            c if PUNCTUATION.contains(&c) => {
                flush_word(&mut word, &mut tokens);
                tokens.push(Token::punctuation(c));
            }
            c => word.push(c),
        }
        pos += c.len_utf8();
    }
    flush_word(&mut word, &mut tokens);

    Ok(tokens)
}

fn token_texts(text: &str) -> Result<Vec<String>> {
    Ok(tokenize(text)?
        .into_iter()
        .map(|token| token.text)
        .collect())
}

fn flush_word(word: &mut String, tokens: &mut Vec<Token>) {
    if !word.is_empty() {
        tokens.push(Token::word(word));
        word.clear();
    }
}

/// Length of an abbreviation at the start of `rest`, if one ends on a word boundary
fn abbreviation_len(rest: &str) -> Option<usize> {
    let len = ABBREVIATION.find(rest)?.end();
    let at_boundary = rest[len..]
        .chars()
        .next()
        .is_none_or(|next| !next.is_alphanumeric() && next != '\'');
    at_boundary.then_some(len)
}

/// Byte length of the directive starting at `rest` (which begins with `{`)
fn directive_len(rest: &str, offset: usize) -> Result<usize> {
    for (i, c) in rest.char_indices().skip(1) {
        match c {
            '{' => return Err(Error::NestedDirective { offset: offset + i }),
            '}' => return Ok(i + 1),
            _ => {}
        }
    }
    Err(Error::UnclosedDirective { offset })
}
