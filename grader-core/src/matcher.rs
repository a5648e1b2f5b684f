//! Pairwise token matcher
//!
//! Decides whether the reference token at one position and the attempt token at
//! another agree, possibly with a classified mistake, and how many tokens each
//! side consumes. Rules are tried in a fixed order and the first that applies wins.

use crate::contractions::contraction_length;
use crate::token::{Token, TokenKind};
use crate::types::{Entry, ErrorEntry, ErrorKind, MatchEntry, span_text};

/// Sentence punctuation after which a capital letter is expected
const CAPITALIZING_PUNCTUATION: &[char] = &['.', ':'];

/// Result of matching one reference position against one attempt position
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// Tokens agree. `entry` is None only when both sides are exhausted.
    Matched {
        entry: Option<Entry>,
        source_advance: usize,
        attempt_advance: usize,
    },
    /// Reference holds an optional phrase the attempt left out.
    /// Consumes one reference token and no attempt tokens.
    Skipped,
    /// No rule applies
    Failed,
}

impl Outcome {
    fn matched(entry: impl Into<Entry>, source_advance: usize, attempt_advance: usize) -> Self {
        Self::Matched {
            entry: Some(entry.into()),
            source_advance,
            attempt_advance,
        }
    }

    pub fn is_matched(&self) -> bool {
        matches!(self, Self::Matched { .. })
    }
}

/// Match `source[source_index]` against `attempt[attempt_index]`.
///
/// Callers making forward progress treat [`Outcome::Skipped`] as a match that
/// elides the optional token; callers searching for a resynchronization point
/// treat it as a failure.
pub fn match_tokens(
    source: &[Token],
    source_index: usize,
    attempt: &[Token],
    attempt_index: usize,
) -> Outcome {
    let source_token = match (source.get(source_index), attempt.get(attempt_index)) {
        (None, None) => {
            return Outcome::Matched {
                entry: None,
                source_advance: 0,
                attempt_advance: 0,
            };
        }
        (Some(token), Some(_)) => token,
        _ => return Outcome::Failed,
    };

    let pair = Pair {
        source,
        source_index,
        attempt,
        attempt_index,
    };

    match source_token.kind() {
        TokenKind::Alternatives(alternatives) => alternatives
            .iter()
            .map(|alternative| match alternative.as_slice() {
                [word] => pair.match_word(word),
                phrase => pair.match_phrase(phrase, false),
            })
            .find(Outcome::is_matched)
            .unwrap_or(Outcome::Failed),
        TokenKind::Optional(phrase) => match pair.match_phrase(phrase, true) {
            Outcome::Failed => Outcome::Skipped,
            outcome => outcome,
        },
        TokenKind::OptionalSpace => Outcome::Skipped,
        TokenKind::Word | TokenKind::Punctuation => pair.match_word(source_token.text()),
    }
}

/// A live cursor pair; both indices are in bounds
struct Pair<'a> {
    source: &'a [Token],
    source_index: usize,
    attempt: &'a [Token],
    attempt_index: usize,
}

impl Pair<'_> {
    fn source_at(&self, offset: usize) -> Option<&str> {
        self.source.get(self.source_index + offset).map(Token::text)
    }

    fn attempt_at(&self, offset: usize) -> Option<&str> {
        self.attempt.get(self.attempt_index + offset).map(Token::text)
    }

    /// `word` replaces the first reference token's text, which differs when an
    /// alternative spelling was picked
    fn error(&self, kind: ErrorKind, word: &str, source_len: usize, attempt_len: usize) -> Outcome {
        let mut entry = ErrorEntry::spanning(
            kind,
            self.source,
            self.source_index,
            source_len,
            self.attempt,
            self.attempt_index,
            attempt_len,
        );
        entry.expected = Some(match source_len {
            0 | 1 => word.to_string(),
            _ => format!(
                "{word} {}",
                span_text(self.source, self.source_index + 1, source_len - 1)
            ),
        });
        Outcome::matched(entry, source_len, attempt_len)
    }

    fn correct(&self, expected: &str, source_len: usize, attempt_len: usize) -> Outcome {
        Outcome::matched(
            MatchEntry {
                expected: expected.to_string(),
                actual: span_text(self.attempt, self.attempt_index, attempt_len),
                source_index: self.source_index,
                attempt_index: self.attempt_index,
                source_len,
                attempt_len,
                optional: false,
            },
            source_len,
            attempt_len,
        )
    }

    /// Match a directive phrase token-by-token against the attempt
    fn match_phrase(&self, phrase: &[String], optional: bool) -> Outcome {
        let matches = !phrase.is_empty()
            && phrase
                .iter()
                .enumerate()
                .all(|(offset, word)| self.attempt_at(offset) == Some(word.as_str()));
        if !matches {
            return Outcome::Failed;
        }

        let mut outcome = self.correct(&phrase.join(" "), 1, phrase.len());
        if let Outcome::Matched {
            entry: Some(Entry::Match(entry)),
            ..
        } = &mut outcome
        {
            entry.optional = optional;
        }
        outcome
    }

    /// Rules for a single reference word, which may be one spelling of an
    /// alternatives directive rather than the token text itself
    fn match_word(&self, word: &str) -> Outcome {
        let Some(actual) = self.attempt_at(0) else {
            return Outcome::Failed;
        };

        if word == actual {
            return self.correct(word, 1, 1);
        }

        // ball{ }park typed as "ballpark"
        if let (Some(marker), Some(next)) = (
            self.source.get(self.source_index + 1),
            self.source_at(2),
        ) {
            if marker.is_optional_space() && format!("{word}{next}") == actual {
                return self.correct(&format!("{word}{next}"), 3, 1);
            }
        }

        if self.attempt_at(1) == Some(word) && self.source_at(1) == Some(actual) {
            return self.error(ErrorKind::Transposition, word, 2, 2);
        }

        if strip_apostrophes(word) == strip_apostrophes(actual) {
            return self.error(ErrorKind::Apostrophe, word, 1, 1);
        }

        if word.to_lowercase() == actual.to_lowercase() {
            if self.casing_excused(word, actual) {
                return self.correct(word, 1, 1);
            }
            return self.error(ErrorKind::Capitalization, word, 1, 1);
        }

        if let Some(next) = self.attempt_at(1) {
            if word.len() == actual.len() + next.len() && word == format!("{actual}{next}") {
                return self.error(ErrorKind::ExtraSpace, word, 1, 2);
            }
        }

        if let Some(next) = self.source_at(1) {
            if actual.len() == word.len() + next.len() && actual == format!("{word}{next}") {
                return self.error(ErrorKind::NoSpace, word, 2, 1);
            }
        }

        let expanded = contraction_length(word, self.attempt, self.attempt_index);
        if expanded > 0 {
            return self.error(ErrorKind::ExpandedContraction, word, 1, expanded);
        }

        let collapsed = contraction_length(actual, self.source, self.source_index);
        if collapsed > 0 {
            return self.error(ErrorKind::CollapsedContraction, word, collapsed, 1);
        }

        Outcome::Failed
    }

    /// A case difference is not penalized when sentence punctuation differs in
    /// a way that makes the learner's casing a fair reading
    fn casing_excused(&self, word: &str, actual: &str) -> bool {
        if self.source_index == 0 || self.attempt_index == 0 {
            return false;
        }
        let previous_source = ends_sentence(self.source[self.source_index - 1].text());
        let previous_attempt = ends_sentence(self.attempt[self.attempt_index - 1].text());
        let source_capitalized = is_capitalized(word);
        let attempt_capitalized = is_capitalized(actual);

        (source_capitalized && !attempt_capitalized && previous_source && !previous_attempt)
            || (!source_capitalized && attempt_capitalized && !previous_source && previous_attempt)
    }
}

fn strip_apostrophes(word: &str) -> String {
    word.replace('\'', "")
}

fn is_capitalized(word: &str) -> bool {
    word.chars().next().is_some_and(char::is_uppercase)
}

fn ends_sentence(token: &str) -> bool {
    token.ends_with(CAPITALIZING_PUNCTUATION)
}
