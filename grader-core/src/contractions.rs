//! Contraction tables and expansion lookup
//!
//! Used by the matcher to recognise "It's" typed as "It is" (and the reverse)
//! as a single contraction mistake instead of a run of wrong words.

use crate::token::Token;

/// Whole-word contractions whose expansion does not share a root with the word
const COMPLEX_CONTRACTIONS: &[(&str, &[&str])] = &[
    ("can't", &["cannot", "can not"]),
    ("won't", &["will not"]),
    ("dunno", &["don't know"]),
    ("'cause", &["because"]),
];

/// Suffix contractions: the root stays, the suffix expands
const CONTRACTIONS: &[(&str, &[&str])] = &[
    ("'s", &["is", "has"]),
    ("n't", &["not"]),
    ("'ve", &["have"]),
    ("'d", &["did", "had", "would"]),
    ("'re", &["are"]),
    ("'ll", &["will", "shall"]),
];

/// Number of tokens in `tokens` starting at `index` that spell out an expansion
/// of `word`, or 0 when `word` is not a contraction expanded there.
pub fn contraction_length(word: &str, tokens: &[Token], index: usize) -> usize {
    if let Some((_, expansions)) = COMPLEX_CONTRACTIONS.iter().find(|(key, _)| *key == word) {
        for expansion in expansions.iter() {
            if phrase_at(expansion, tokens, index) {
                return expansion.split(' ').count();
            }
        }
    }

    for (suffix, expansions) in CONTRACTIONS {
        let Some(root) = word.strip_suffix(suffix) else {
            continue;
        };
        // the root must be typed as-is, otherwise the suffix is a coincidence
        if tokens.get(index).map(Token::text) != Some(root) {
            return 0;
        }
        for expansion in expansions.iter() {
            if phrase_at(expansion, tokens, index + 1) {
                return expansion.split(' ').count() + 1;
            }
        }
    }

    0
}

fn phrase_at(phrase: &str, tokens: &[Token], index: usize) -> bool {
    phrase
        .split(' ')
        .enumerate()
        .all(|(offset, part)| tokens.get(index + offset).map(Token::text) == Some(part))
}
