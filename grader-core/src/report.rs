//! Scores, statistics and the rendered diff for a graded attempt

use std::collections::BTreeMap;

use serde::{Serialize, Serializer};

use crate::config::DiffStyle;
use crate::error::Result;
use crate::token::Token;
use crate::types::{Entry, ErrorEntry, ErrorKind};

/// Rendered in place of a score or accuracy when the reference has nothing to score
pub const UNDEFINED_SCORE: &str = "-1";

/// Read-only view over an alignment
#[derive(Debug, Clone)]
pub struct Grade {
    entries: Vec<Entry>,
    perfect_score: usize,
    /// Entries that count toward accuracy
    credited: usize,
    diff_style: DiffStyle,
}

/// Aggregate numbers for display
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Stats {
    pub errors: usize,
    pub correct: usize,
    pub perfect_score: usize,
    /// Two decimals, or [`UNDEFINED_SCORE`]
    pub score: String,
    /// Two decimals, or [`UNDEFINED_SCORE`]
    pub accuracy: String,
}

impl Grade {
    pub(crate) fn new(entries: Vec<Entry>, source: &[Token], diff_style: DiffStyle) -> Self {
        let perfect_score = source.iter().filter(|token| token.is_scored()).count();
        let credited = entries.iter().filter(|entry| counts_toward_accuracy(entry)).count();

        Self {
            entries,
            perfect_score,
            credited,
            diff_style,
        }
    }

    /// Every alignment step in reading order
    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    /// Only the mistakes, in reading order
    pub fn errors(&self) -> Vec<&ErrorEntry> {
        self.entries.iter().filter_map(Entry::as_error).collect()
    }

    pub fn error_count(&self) -> usize {
        self.entries.iter().filter(|entry| entry.is_error()).count()
    }

    /// Entries that are not mistakes
    pub fn correct(&self) -> usize {
        self.entries.len() - self.error_count()
    }

    pub fn perfect_score(&self) -> usize {
        self.perfect_score
    }

    /// Percentage of the perfect score left after one point per mistake.
    /// None when the reference has nothing to score. Can go negative when
    /// mistakes outnumber reference tokens.
    pub fn score(&self) -> Option<f64> {
        if self.perfect_score == 0 {
            return None;
        }
        Some((1.0 - self.error_count() as f64 / self.perfect_score as f64) * 100.0)
    }

    /// Matches and soft mistakes (casing, spacing, apostrophes, contractions,
    /// transpositions) as a percentage of the perfect score
    pub fn accuracy(&self) -> Option<f64> {
        if self.perfect_score == 0 {
            return None;
        }
        Some(self.credited as f64 / self.perfect_score as f64 * 100.0)
    }

    pub fn stats(&self) -> Stats {
        Stats {
            errors: self.error_count(),
            correct: self.correct(),
            perfect_score: self.perfect_score,
            score: format_percentage(self.score()),
            accuracy: format_percentage(self.accuracy()),
        }
    }

    pub fn error_counts_by_kind(&self) -> BTreeMap<ErrorKind, usize> {
        let mut counts = BTreeMap::new();
        for error in self.entries.iter().filter_map(Entry::as_error) {
            *counts.entry(error.kind).or_insert(0) += 1;
        }
        counts
    }

    /// Matches as typed; mistakes as struck-through expected text followed by
    /// underlined actual text
    pub fn render_diff(&self) -> String {
        self.render_diff_with(self.diff_style)
    }

    pub fn render_diff_with(&self, style: DiffStyle) -> String {
        self.entries
            .iter()
            .map(|entry| match entry {
                Entry::Match(matched) => matched.actual.clone(),
                Entry::Error(error) => {
                    let expected = error.expected.as_deref().map(|text| style.strike(text));
                    let actual = error.actual.as_deref().map(|text| style.underline(text));
                    expected
                        .into_iter()
                        .chain(actual)
                        .collect::<Vec<_>>()
                        .join(" ")
                }
            })
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// The grade as JSON: stats, entries and the rendered diff
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }
}

#[derive(Serialize)]
struct GradeReport<'a> {
    stats: Stats,
    entries: &'a [Entry],
    diff: String,
}

impl Serialize for Grade {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        GradeReport {
            stats: self.stats(),
            entries: &self.entries,
            diff: self.render_diff(),
        }
        .serialize(serializer)
    }
}

fn format_percentage(value: Option<f64>) -> String {
    value
        .map(|value| format!("{value:.2}"))
        .unwrap_or_else(|| UNDEFINED_SCORE.to_string())
}

/// A present optional phrase is not part of the perfect score, so it earns nothing
fn counts_toward_accuracy(entry: &Entry) -> bool {
    match entry {
        Entry::Match(matched) => !matched.optional,
        Entry::Error(error) => error.kind.is_soft(),
    }
}
