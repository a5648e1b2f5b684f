//! Dictation grader - alignment and classification of transcription attempts
//!
//! Compares a learner's typed transcription against a reference text, aligning
//! them token by token, classifying every divergence (wrong, dropped and added
//! words, transpositions, spacing, apostrophes, casing, contractions), and
//! deriving score, accuracy and a marked-up diff from the alignment.

pub mod config;
pub mod contractions;
pub mod error;
pub mod ffi;
pub mod grader;
pub mod matcher;
pub mod recovery;
pub mod report;
pub mod token;
pub mod types;

pub use error::{Error, Result};
pub use types::*;

// Export FFI functions at crate root for C callers
pub use ffi::*;

/// Re-export the main grading components for convenience
pub use config::{DiffStyle, GraderConfig};
pub use grader::{Reference, align, grade};
pub use matcher::{Outcome, match_tokens};
pub use recovery::{Recovery, recover};
pub use report::{Grade, Stats};
pub use token::{Token, TokenKind, tokenize, tokenize_attempt};
