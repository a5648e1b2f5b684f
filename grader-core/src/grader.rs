//! Alignment driver and grading entry points

use tracing::{debug, trace};

use crate::config::GraderConfig;
use crate::error::Result;
use crate::matcher::{Outcome, match_tokens};
use crate::recovery::recover;
use crate::report::Grade;
use crate::token::{Token, tokenize, tokenize_attempt};
use crate::types::{Entry, ErrorEntry};

/// Walk both token sequences to the end, producing the ordered alignment.
///
/// Every attempt token lands in exactly one entry. Every reference token does
/// too, except optional phrases the attempt left out.
pub fn align(source: &[Token], attempt: &[Token]) -> Result<Vec<Entry>> {
    let mut entries = Vec::with_capacity(source.len().max(attempt.len()));
    let mut source_index = 0;
    let mut attempt_index = 0;

    while source_index < source.len() || attempt_index < attempt.len() {
        if source_index >= source.len() {
            entries.push(ErrorEntry::unexpected(attempt, attempt_index).into());
            attempt_index += 1;
            continue;
        }
        if attempt_index >= attempt.len() {
            if !source[source_index].is_pure_optional() {
                entries.push(ErrorEntry::dropped(source, source_index).into());
            }
            source_index += 1;
            continue;
        }

        match match_tokens(source, source_index, attempt, attempt_index) {
            Outcome::Matched {
                entry,
                source_advance,
                attempt_advance,
            } => {
                trace!(source_index, attempt_index, ?entry, "matched");
                entries.extend(entry);
                source_index += source_advance;
                attempt_index += attempt_advance;
            }
            Outcome::Skipped => {
                trace!(source_index, attempt_index, "skipped optional");
                source_index += 1;
            }
            Outcome::Failed => {
                let recovery = recover(source, source_index, attempt, attempt_index)?;
                entries.extend(recovery.entries);
                source_index += recovery.source_advance;
                attempt_index += recovery.attempt_advance;
            }
        }
    }

    Ok(entries)
}

/// A tokenized reference text, reusable across many attempts
#[derive(Debug, Clone)]
pub struct Reference {
    tokens: Vec<Token>,
    perfect_score: usize,
    config: GraderConfig,
}

impl Reference {
    pub fn new(text: &str) -> Result<Self> {
        Self::with_config(text, GraderConfig::default())
    }

    pub fn with_config(text: &str, config: GraderConfig) -> Result<Self> {
        config.validate()?;
        let tokens = tokenize(text)?;
        config.check_token_count(tokens.len())?;
        let perfect_score = tokens.iter().filter(|token| token.is_scored()).count();

        debug!(
            tokens = tokens.len(),
            perfect_score, "prepared reference text"
        );

        Ok(Self {
            tokens,
            perfect_score,
            config,
        })
    }

    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }

    /// Number of tokens a flawless attempt gets credit for (optional phrases excluded)
    pub fn perfect_score(&self) -> usize {
        self.perfect_score
    }

    pub fn config(&self) -> &GraderConfig {
        &self.config
    }

    /// Grade one attempt against this reference
    pub fn grade(&self, attempt: &str) -> Result<Grade> {
        let attempt_tokens = tokenize_attempt(attempt)?;
        self.config.check_token_count(attempt_tokens.len())?;
        let entries = align(&self.tokens, &attempt_tokens)?;
        Ok(Grade::new(entries, &self.tokens, self.config.diff_style))
    }
}

/// Grade `attempt` against `reference` in one call
pub fn grade(reference: &str, attempt: &str) -> Result<Grade> {
    Reference::new(reference)?.grade(attempt)
}
