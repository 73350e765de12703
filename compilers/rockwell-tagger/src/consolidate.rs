use std::cmp::Reverse;

use rockwell_protocol::Tag;

use crate::span::Spanned;

/// Order-independent strict-containment reduction.
///
/// A new item strictly containing retained ones evicts them; an item
/// strictly contained in a retained one is dropped. Identical items are kept
/// once. Whatever survives is pairwise free of strict containment.
pub fn reduce_contained<T, I>(items: I) -> Vec<T>
where
    T: Spanned + PartialEq,
    I: IntoIterator<Item = T>,
{
    let mut kept: Vec<T> = Vec::new();
    for item in items {
        if kept
            .iter()
            .any(|k| *k == item || k.strictly_contains(&item))
        {
            continue;
        }
        kept.retain(|k| !item.strictly_contains(k));
        kept.push(item);
    }
    kept
}

/// Reduces tags to a non-overlapping set sorted by start.
///
/// Duplicates go first. Among overlapping tags the longer one wins, then the
/// earlier start, then the one seen first.
pub fn consolidate(tags: Vec<Tag>) -> Vec<Tag> {
    let mut unique: Vec<Tag> = Vec::with_capacity(tags.len());
    for tag in tags {
        if !unique.contains(&tag) {
            unique.push(tag);
        }
    }

    let mut ranked: Vec<(usize, Tag)> = unique.into_iter().enumerate().collect();
    ranked.sort_by_key(|(seen, tag)| (Reverse(tag.len()), tag.start, *seen));

    let mut kept: Vec<Tag> = Vec::with_capacity(ranked.len());
    for (_, tag) in ranked {
        if !kept.iter().any(|k| k.overlaps(&tag)) {
            kept.push(tag);
        }
    }

    kept.sort_by_key(|tag| tag.start);
    kept
}

/// [`consolidate`] applied to each label on its own. Tags of different
/// labels may overlap in the result.
pub fn consolidate_by_label(tags: Vec<Tag>) -> Vec<Tag> {
    let mut labels: Vec<String> = Vec::new();
    for tag in &tags {
        if !labels.contains(&tag.label) {
            labels.push(tag.label.clone());
        }
    }

    let mut merged: Vec<Tag> = labels
        .iter()
        .flat_map(|label| {
            let same: Vec<Tag> = tags.iter().filter(|t| &t.label == label).cloned().collect();
            consolidate(same)
        })
        .collect();

    merged.sort_by(|a, b| (a.start, a.end, &a.label).cmp(&(b.start, b.end, &b.label)));
    merged
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::span::Span;
    use proptest::prelude::*;

    fn tag(start: usize, end: usize) -> Tag {
        Tag::new(start, end, "x")
    }

    #[test]
    fn test_longer_then_earlier_wins() {
        let tags = vec![tag(0, 3), tag(0, 7), tag(5, 6), tag(8, 9)];
        assert_eq!(consolidate(tags), vec![tag(0, 7), tag(8, 9)]);

        // Equal lengths: earlier start
        let tags = vec![tag(2, 4), tag(1, 3)];
        assert_eq!(consolidate(tags), vec![tag(1, 3)]);
    }

    #[test]
    fn test_input_order_breaks_full_ties() {
        let tags = vec![Tag::new(1, 2, "b"), Tag::new(1, 2, "a")];
        assert_eq!(consolidate(tags), vec![Tag::new(1, 2, "b")]);
    }

    #[test]
    fn test_duplicates_are_removed() {
        let tags = vec![tag(4, 4), tag(4, 4), tag(0, 1)];
        assert_eq!(consolidate(tags), vec![tag(0, 1), tag(4, 4)]);
    }

    #[test]
    fn test_by_label_keeps_cross_label_overlaps() {
        let tags = vec![
            Tag::new(0, 3, "np"),
            Tag::new(2, 5, "vp"),
            Tag::new(1, 2, "np"),
        ];
        assert_eq!(
            consolidate_by_label(tags),
            vec![Tag::new(0, 3, "np"), Tag::new(2, 5, "vp")]
        );
    }

    #[test]
    fn test_reduce_contained_keeps_maximal_spans() {
        let spans = vec![
            Span::new(3, 4),
            Span::new(3, 6),
            Span::new(5, 8),
            Span::new(3, 6),
            Span::new(6, 7),
        ];
        assert_eq!(
            reduce_contained(spans),
            vec![Span::new(3, 6), Span::new(5, 8)]
        );
    }

    fn arb_tags() -> impl Strategy<Value = Vec<Tag>> {
        prop::collection::vec(
            (0usize..20, 0usize..5, prop::sample::select(vec!["a", "b"]))
                .prop_map(|(start, len, label)| Tag::new(start, start + len, label)),
            0..12,
        )
    }

    proptest! {
        #[test]
        fn prop_consolidated_tags_never_overlap(tags in arb_tags()) {
            let out = consolidate(tags.clone());
            for (i, a) in out.iter().enumerate() {
                prop_assert!(tags.contains(a));
                for b in &out[i + 1..] {
                    prop_assert!(!a.overlaps(b));
                    prop_assert!(a.start < b.start);
                }
            }
        }

        #[test]
        fn prop_consolidation_is_idempotent(tags in arb_tags()) {
            let once = consolidate(tags.clone());
            prop_assert_eq!(consolidate(once.clone()), once);

            let by_label = consolidate_by_label(tags);
            prop_assert_eq!(consolidate_by_label(by_label.clone()), by_label);
        }

        #[test]
        fn prop_reduction_is_order_independent(tags in arb_tags()) {
            let mut forward = reduce_contained(tags.clone());
            let mut backward = reduce_contained(tags.into_iter().rev());
            forward.sort();
            backward.sort();
            prop_assert_eq!(forward, backward);
        }
    }
}
