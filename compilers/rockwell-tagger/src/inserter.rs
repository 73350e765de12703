use rockwell_protocol::{CompositeToken, Tag, Token};
use tracing::debug;

use crate::consolidate::consolidate;
use crate::error::TaggerError;

/// Replaces tagged spans with composite tokens.
///
/// Tags are consolidated first. Each composite takes the tag label as both
/// its role and its type. A tag whose boundaries fall inside an existing
/// composite cannot be aligned and is skipped. The input is left untouched.
pub fn substitute(tokens: &[Token], tags: &[Tag]) -> Result<Vec<Token>, TaggerError> {
    let mut pending = consolidate(tags.to_vec()).into_iter().peekable();
    let mut out = Vec::with_capacity(tokens.len());
    let mut i = 0;

    while i < tokens.len() {
        let first = tokens[i].first_index().get();

        while let Some(stale) = pending.next_if(|tag| tag.start < first) {
            debug!(tag = %stale, "tag does not align with token boundaries");
        }

        if let Some(tag) = pending.next_if(|tag| tag.start == first) {
            let run = tokens[i..]
                .iter()
                .position(|t| t.last_index().get() >= tag.end)
                .filter(|&k| tokens[i + k].last_index().get() == tag.end);

            if let Some(k) = run {
                let parts = tokens[i..=i + k].to_vec();
                out.push(CompositeToken::new(parts, tag.label.as_str(), tag.label.as_str())?.into());
                i += k + 1;
                continue;
            }
            debug!(tag = %tag, "tag does not align with token boundaries");
        }

        out.push(tokens[i].clone());
        i += 1;
    }

    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rockwell_protocol::PlainToken;

    fn sentence(words: &[&str]) -> Vec<Token> {
        words
            .iter()
            .enumerate()
            .map(|(i, w)| PlainToken::new(i, *w).with_reading("NN", *w).into())
            .collect()
    }

    #[test]
    fn test_substitution_keeps_original_indices() {
        let tokens = sentence(&["It", "costs", "$", "15", "."]);
        let out = substitute(&tokens, &[Tag::new(2, 3, "Currency")]).unwrap();

        assert_eq!(out.len(), 4);
        assert_eq!(out[2].word(), "$ 15");
        assert_eq!(out[2].role(), Some("Currency"));
        assert_eq!(out[2].composite_kind(), Some("currency"));
        assert_eq!(out[2].first_index().get(), 2);
        assert_eq!(out[2].last_index().get(), 3);
        assert_eq!(out[3].first_index().get(), 4);
        // Input untouched
        assert_eq!(tokens.len(), 5);
    }

    #[test]
    fn test_second_pass_nests_composites() {
        let tokens = sentence(&["a", "b", "c", "d"]);
        let once = substitute(&tokens, &[Tag::new(1, 2, "inner")]).unwrap();
        let twice = substitute(&once, &[Tag::new(0, 2, "outer")]).unwrap();

        assert_eq!(twice.len(), 2);
        assert_eq!(twice[0].word(), "a b c");
        assert_eq!(twice[0].last_index().get(), 2);
        assert_eq!(twice[1].word(), "d");
    }

    #[test]
    fn test_misaligned_tags_are_skipped() {
        let tokens = sentence(&["a", "b", "c", "d"]);
        let once = substitute(&tokens, &[Tag::new(1, 2, "inner")]).unwrap();
        // Cuts through the composite on both sides
        let out = substitute(&once, &[Tag::new(2, 3, "x"), Tag::new(0, 1, "y")]).unwrap();
        assert_eq!(out, once);
    }
}
