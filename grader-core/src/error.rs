//! Error types for the dictation grader

use thiserror::Error;

/// Result type alias using the grader's Error type
pub type Result<T> = std::result::Result<T, Error>;

/// All possible errors while tokenizing or grading
#[derive(Error, Debug)]
pub enum Error {
    #[error("Unclosed directive: '{{' at byte {offset} has no matching '}}'")]
    UnclosedDirective { offset: usize },

    #[error("Unopened directive: '}}' at byte {offset} has no matching '{{'")]
    UnopenedDirective { offset: usize },

    #[error("Nested directive: '{{' at byte {offset} inside another directive")]
    NestedDirective { offset: usize },

    #[error("Empty directive at byte {offset}")]
    EmptyDirective { offset: usize },

    #[error("Empty alternative in directive at byte {offset}")]
    EmptyAlternative { offset: usize },

    #[error("Too many tokens: {count} exceeds the limit of {limit}")]
    TooManyTokens { count: usize, limit: usize },

    /// Lookahead recovery ran out of window without resynchronizing.
    /// Indicates a bug in the aligner, never a problem with the input.
    #[error("Alignment lost synchronization at source {source_index}, attempt {attempt_index}")]
    Unsynchronized {
        source_index: usize,
        attempt_index: usize,
    },

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
