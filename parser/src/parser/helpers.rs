//! Parsing helpers working on flat token sequences.

use crate::{
    alloc::{format, vec, Vec},
    glyphs::TokenKind,
    Error, Token,
};

/// Marker for tokens that are not brackets.
pub(super) const NO_PARTNER: usize = usize::MAX;

/// Matches brackets in the entire token sequence before any structural parsing happens.
/// Returns, for each token, the index of its bracket partner, or [`NO_PARTNER`].
pub(super) fn match_brackets(tokens: &[Token<'_>]) -> Result<Vec<usize>, Error> {
    let mut partners = vec![NO_PARTNER; tokens.len()];
    let mut stack: Vec<usize> = Vec::new();

    for (idx, token) in tokens.iter().enumerate() {
        let kind = token.extra;
        if kind.is_opening() {
            stack.push(idx);
        } else if kind.is_closing() {
            let Some(open_idx) = stack.pop() else {
                let message = format!("Unmatched {kind}");
                return Err(Error::syntax(message).with_location(token.to_location()));
            };
            let opening = tokens[open_idx].extra;
            if opening.closing() != Some(kind) {
                let message = format!("Mismatched brackets: {opening} is closed by {kind}");
                return Err(Error::syntax(message).with_location(token.to_location()));
            }
            partners[open_idx] = idx;
            partners[idx] = open_idx;
        }
    }

    if let Some(&open_idx) = stack.last() {
        let token = &tokens[open_idx];
        let message = format!("Unclosed {}", token.extra);
        return Err(Error::syntax(message).with_location(token.to_location()));
    }
    Ok(partners)
}

/// Iterates over top-level token indices in `lo..hi`, jumping over bracketed groups.
pub(super) fn top_level_indices<'p>(
    tokens: &'p [Token<'_>],
    partners: &'p [usize],
    lo: usize,
    hi: usize,
) -> impl Iterator<Item = usize> + 'p {
    let mut idx = lo;
    core::iter::from_fn(move || {
        if idx >= hi {
            return None;
        }
        let current = idx;
        idx = if tokens[current].extra.is_opening() {
            partners[current] + 1
        } else {
            current + 1
        };
        Some(current)
    })
}

/// Splits `lo..hi` into non-empty ranges separated by top-level tokens of the specified kind.
/// If `keep_empty` is set, empty ranges are retained.
pub(super) fn split_ranges(
    tokens: &[Token<'_>],
    partners: &[usize],
    (lo, hi): (usize, usize),
    separator: TokenKind,
    keep_empty: bool,
) -> Vec<(usize, usize)> {
    let mut ranges = Vec::new();
    let mut start = lo;
    for idx in top_level_indices(tokens, partners, lo, hi) {
        if tokens[idx].extra == separator {
            if keep_empty || idx > start {
                ranges.push((start, idx));
            }
            start = idx + 1;
        }
    }
    if keep_empty || hi > start {
        ranges.push((start, hi));
    }
    ranges
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{tokenize, ErrorKind};

    #[test]
    fn matching_brackets() {
        let tokens = tokenize("f←{(⍵)[1]}").unwrap();
        let partners = match_brackets(&tokens).unwrap();
        assert_eq!(partners[2], 9);
        assert_eq!(partners[3], 5);
        assert_eq!(partners[6], 8);
        assert_eq!(partners[0], NO_PARTNER);
    }

    #[test]
    fn unbalanced_brackets() {
        let tokens = tokenize("{1 2").unwrap();
        let err = match_brackets(&tokens).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Syntax);
        assert_eq!(err.message(), "Unclosed `{`");

        let tokens = tokenize("1 2}").unwrap();
        let err = match_brackets(&tokens).unwrap_err();
        assert_eq!(err.message(), "Unmatched `}`");
        assert_eq!(err.location().unwrap().get_column(), 4);

        let tokens = tokenize("(1 2]").unwrap();
        let err = match_brackets(&tokens).unwrap_err();
        assert_eq!(err.message(), "Mismatched brackets: `(` is closed by `]`");
    }

    #[test]
    fn splitting_statements() {
        let tokens = tokenize("a←1 ⋄ f←{⍵ ⋄ ⍺} ⋄⋄ f a").unwrap();
        let partners = match_brackets(&tokens).unwrap();
        let ranges = split_ranges(
            &tokens,
            &partners,
            (0, tokens.len()),
            TokenKind::Separator,
            false,
        );
        assert_eq!(ranges, [(0, 3), (4, 11), (13, 15)]);
    }
}
