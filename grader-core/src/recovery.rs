//! Bounded lookahead recovery
//!
//! When the matcher fails at the live cursors, search for the nearest position
//! where the two sequences line up again and describe the gap in between as
//! wrong, dropped, or unexpected words.

use tracing::{debug, warn};

use crate::error::{Error, Result};
use crate::matcher::match_tokens;
use crate::token::Token;
use crate::types::{Entry, ErrorEntry};

/// Errors bridging a desynchronized stretch, and how far each cursor moves past it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Recovery {
    pub entries: Vec<Entry>,
    pub source_advance: usize,
    pub attempt_advance: usize,
}

/// Find the smallest gap after which `source` and `attempt` match again.
///
/// For each window size `i`, pairing counts `j` from 0 to `i` are tried, first
/// as a reference-side gap (`i` reference tokens against `j` attempt tokens)
/// and then as an attempt-side gap. Dropped words therefore win over
/// unexpected words at equal cost.
pub fn recover(
    source: &[Token],
    source_index: usize,
    attempt: &[Token],
    attempt_index: usize,
) -> Result<Recovery> {
    let source_remaining = source.len().saturating_sub(source_index);
    let attempt_remaining = attempt.len().saturating_sub(attempt_index);
    let max_window = source_remaining.max(attempt_remaining);

    for i in 1..=max_window {
        for j in 0..=i {
            if i <= source_remaining
                && j <= attempt_remaining
                && resynchronizes(source, source_index + i, attempt, attempt_index + j)
            {
                debug!(window = i, paired = j, "resynchronized after reference-side gap");
                return Ok(bridge_source_gap(
                    source,
                    source_index,
                    attempt,
                    attempt_index,
                    i,
                    j,
                ));
            }

            if j < i
                && i <= attempt_remaining
                && j <= source_remaining
                && resynchronizes(source, source_index + j, attempt, attempt_index + i)
            {
                debug!(window = i, paired = j, "resynchronized after attempt-side gap");
                return Ok(bridge_attempt_gap(
                    source,
                    source_index,
                    attempt,
                    attempt_index,
                    i,
                    j,
                ));
            }
        }
    }

    warn!(
        source_index,
        attempt_index, "lookahead exhausted without resynchronizing"
    );
    Err(Error::Unsynchronized {
        source_index,
        attempt_index,
    })
}

/// An elided optional is not a resynchronization point
fn resynchronizes(source: &[Token], source_index: usize, attempt: &[Token], attempt_index: usize) -> bool {
    match_tokens(source, source_index, attempt, attempt_index).is_matched()
}

/// `paired` wrong words, then the rest of `window` reference tokens dropped
fn bridge_source_gap(
    source: &[Token],
    source_index: usize,
    attempt: &[Token],
    attempt_index: usize,
    window: usize,
    paired: usize,
) -> Recovery {
    let mut entries = paired_entries(source, source_index, attempt, attempt_index, paired);
    entries.extend(
        (source_index + paired..source_index + window)
            // a missing optional costs nothing
            .filter(|&index| !source[index].is_pure_optional())
            .map(|index| ErrorEntry::dropped(source, index).into()),
    );

    Recovery {
        entries,
        source_advance: window,
        attempt_advance: paired,
    }
}

/// `paired` wrong words, then the rest of `window` attempt tokens unexpected
fn bridge_attempt_gap(
    source: &[Token],
    source_index: usize,
    attempt: &[Token],
    attempt_index: usize,
    window: usize,
    paired: usize,
) -> Recovery {
    let mut entries = paired_entries(source, source_index, attempt, attempt_index, paired);
    entries.extend(
        (attempt_index + paired..attempt_index + window)
            .map(|index| ErrorEntry::unexpected(attempt, index).into()),
    );

    Recovery {
        entries,
        source_advance: paired,
        attempt_advance: window,
    }
}

fn paired_entries(
    source: &[Token],
    source_index: usize,
    attempt: &[Token],
    attempt_index: usize,
    paired: usize,
) -> Vec<Entry> {
    (0..paired)
        .map(|offset| {
            ErrorEntry::incorrect(source, source_index + offset, attempt, attempt_index + offset)
                .into()
        })
        .collect()
}
