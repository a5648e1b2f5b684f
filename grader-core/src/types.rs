//! Core types used throughout the grader

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::token::Token;

/// Classification of a divergence between reference and attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ErrorKind {
    /// Wrong word in place of the reference word
    #[serde(rename = "incorrect")]
    Incorrect,
    /// Reference word missing from the attempt
    #[serde(rename = "dropped")]
    Dropped,
    /// Attempt word with no reference counterpart
    #[serde(rename = "unexpected")]
    Unexpected,
    /// Apostrophe added or removed
    #[serde(rename = "apostrophe")]
    Apostrophe,
    /// Two adjacent words swapped
    #[serde(rename = "transposition")]
    Transposition,
    /// One reference word split in two
    #[serde(rename = "extra space")]
    ExtraSpace,
    /// Two reference words merged into one
    #[serde(rename = "no space")]
    NoSpace,
    /// Case mismatch not excused by sentence punctuation
    #[serde(rename = "capitalization")]
    Capitalization,
    /// Reference contraction typed in full
    #[serde(rename = "expanded contraction")]
    ExpandedContraction,
    /// Reference expansion typed as a contraction
    #[serde(rename = "collapsed contraction")]
    CollapsedContraction,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Incorrect => "incorrect",
            Self::Dropped => "dropped",
            Self::Unexpected => "unexpected",
            Self::Apostrophe => "apostrophe",
            Self::Transposition => "transposition",
            Self::ExtraSpace => "extra space",
            Self::NoSpace => "no space",
            Self::Capitalization => "capitalization",
            Self::ExpandedContraction => "expanded contraction",
            Self::CollapsedContraction => "collapsed contraction",
        }
    }

    /// Soft errors still count toward accuracy: the learner heard the word
    pub fn is_soft(&self) -> bool {
        !matches!(self, Self::Incorrect | Self::Dropped | Self::Unexpected)
    }

    pub fn all() -> &'static [ErrorKind] {
        &[
            ErrorKind::Incorrect,
            ErrorKind::Dropped,
            ErrorKind::Unexpected,
            ErrorKind::Apostrophe,
            ErrorKind::Transposition,
            ErrorKind::ExtraSpace,
            ErrorKind::NoSpace,
            ErrorKind::Capitalization,
            ErrorKind::ExpandedContraction,
            ErrorKind::CollapsedContraction,
        ]
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Reference and attempt tokens that agree
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MatchEntry {
    pub expected: String,
    pub actual: String,
    pub source_index: usize,
    pub attempt_index: usize,
    /// Reference tokens consumed (3 for `ball{ }park` typed as "ballpark")
    pub source_len: usize,
    /// Attempt tokens consumed
    pub attempt_len: usize,
    /// Matched an optional phrase, which is not part of the perfect score
    pub optional: bool,
}

/// A single mistake
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ErrorEntry {
    pub kind: ErrorKind,
    /// None when nothing in the reference corresponds (unexpected words)
    pub expected: Option<String>,
    /// None when nothing in the attempt corresponds (dropped words)
    pub actual: Option<String>,
    pub source_index: Option<usize>,
    pub attempt_index: Option<usize>,
    pub source_len: usize,
    pub attempt_len: usize,
}

impl ErrorEntry {
    /// Mistake covering `source_len` reference tokens and `attempt_len` attempt tokens
    pub fn spanning(
        kind: ErrorKind,
        source: &[Token],
        source_index: usize,
        source_len: usize,
        attempt: &[Token],
        attempt_index: usize,
        attempt_len: usize,
    ) -> Self {
        Self {
            kind,
            expected: Some(span_text(source, source_index, source_len)),
            actual: Some(span_text(attempt, attempt_index, attempt_len)),
            source_index: Some(source_index),
            attempt_index: Some(attempt_index),
            source_len,
            attempt_len,
        }
    }

    pub fn incorrect(
        source: &[Token],
        source_index: usize,
        attempt: &[Token],
        attempt_index: usize,
    ) -> Self {
        Self::spanning(
            ErrorKind::Incorrect,
            source,
            source_index,
            1,
            attempt,
            attempt_index,
            1,
        )
    }

    pub fn dropped(source: &[Token], source_index: usize) -> Self {
        Self {
            kind: ErrorKind::Dropped,
            expected: Some(span_text(source, source_index, 1)),
            actual: None,
            source_index: Some(source_index),
            attempt_index: None,
            source_len: 1,
            attempt_len: 0,
        }
    }

    pub fn unexpected(attempt: &[Token], attempt_index: usize) -> Self {
        Self {
            kind: ErrorKind::Unexpected,
            expected: None,
            actual: Some(span_text(attempt, attempt_index, 1)),
            source_index: None,
            attempt_index: Some(attempt_index),
            source_len: 0,
            attempt_len: 1,
        }
    }
}

/// One step of an alignment
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Entry {
    Match(MatchEntry),
    Error(ErrorEntry),
}

impl Entry {
    pub fn is_error(&self) -> bool {
        matches!(self, Self::Error(_))
    }

    pub fn as_error(&self) -> Option<&ErrorEntry> {
        match self {
            Self::Error(error) => Some(error),
            Self::Match(_) => None,
        }
    }

    pub fn source_len(&self) -> usize {
        match self {
            Self::Match(m) => m.source_len,
            Self::Error(e) => e.source_len,
        }
    }

    pub fn attempt_len(&self) -> usize {
        match self {
            Self::Match(m) => m.attempt_len,
            Self::Error(e) => e.attempt_len,
        }
    }
}

impl From<ErrorEntry> for Entry {
    fn from(error: ErrorEntry) -> Self {
        Self::Error(error)
    }
}

impl From<MatchEntry> for Entry {
    fn from(matched: MatchEntry) -> Self {
        Self::Match(matched)
    }
}

/// Texts of `len` tokens from `start`, space separated
pub(crate) fn span_text(tokens: &[Token], start: usize, len: usize) -> String {
    tokens
        .iter()
        .skip(start)
        .take(len)
        .map(Token::text)
        .collect::<Vec<_>>()
        .join(" ")
}
