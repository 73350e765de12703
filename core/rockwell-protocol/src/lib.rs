//! Fundamental types shared by every Rockwell crate: tokens (plain and
//! composite), readings, tags and entity-family flags.

pub mod ids;
pub mod morphology;

// Re-export core types for convenience
pub use ids::TokenIndex;
pub use morphology::*;

pub mod model;
pub use model::*;

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn word(index: usize, text: &str, pos: &str, lemma: &str) -> Token {
        PlainToken::new(index, text).with_reading(pos, lemma).into()
    }

    #[test]
    fn test_composite_keeps_original_indices() {
        let parts = vec![word(2, "$", "$", "$"), word(3, "15", "CD", "15")];
        let composite: Token = CompositeToken::new(parts, "currency", "Currency")
            .unwrap()
            .into();

        assert_eq!(composite.word(), "$ 15");
        assert_eq!(composite.first_index().get(), 2);
        assert_eq!(composite.last_index().get(), 3);
        assert_eq!(composite.role(), Some("currency"));
        assert_eq!(composite.composite_kind(), Some("currency"));
        // Head-final: readings come from the last constituent
        assert_eq!(composite.readings()[0].pos, "CD");
    }

    #[test]
    fn test_coarse_type_accessor() {
        assert_eq!(word(0, "dogs", "NNS", "dog").coarse_type(), Some("noun"));

        let ambiguous: Token = PlainToken::new(1, "saw")
            .with_reading("VBD", "see")
            .with_reading("NN", "saw")
            .into();
        assert_eq!(ambiguous.coarse_type(), None);

        let composite: Token = CompositeToken::new(vec![word(2, "15", "CD", "15")], "amount", "Quantity")
            .unwrap()
            .into();
        assert_eq!(composite.coarse_type(), Some("quantity"));
    }

    #[test]
    fn test_nested_composite_indices() {
        let inner: Token = CompositeToken::new(
            vec![word(4, "June", "NNP", "june"), word(5, "26", "CD", "26")],
            "day",
            "date",
        )
        .unwrap()
        .into();
        let outer: Token =
            CompositeToken::new(vec![word(3, "on", "IN", "on"), inner], "when", "date")
                .unwrap()
                .into();

        assert_eq!(outer.first_index().get(), 3);
        assert_eq!(outer.last_index().get(), 5);
    }

    #[test]
    fn test_empty_composite_is_rejected() {
        let err = CompositeToken::new(vec![], "x", "y").unwrap_err();
        assert_eq!(err, ProtocolError::EmptyComposite);
    }

    #[test]
    fn test_select_reading() {
        let token = PlainToken::new(0, "saw")
            .with_reading("VBD", "see")
            .with_reading("NN", "saw");
        assert!(token.is_ambiguous());
        assert_eq!(token.active_readings().len(), 2);

        let resolved = token.select("NN").unwrap();
        assert!(!resolved.is_ambiguous());
        assert_eq!(resolved.active_readings(), &[Reading::new("NN", "saw")]);
        // The original is untouched
        assert_eq!(token.selected, None);

        assert!(matches!(
            token.select("JJ"),
            Err(ProtocolError::UnknownReading { .. })
        ));
    }

    #[test]
    fn test_token_display() {
        let plain = word(0, "dog", "NN", "dog");
        assert_eq!(plain.to_string(), "dog/NN");

        let ambiguous: Token = PlainToken::new(1, "saw")
            .with_reading("VBD", "see")
            .with_reading("NN", "saw")
            .into();
        assert_eq!(ambiguous.to_string(), "saw/VBD|NN");
    }

    #[test]
    fn test_tag_relations() {
        let outer = Tag::new(0, 5, "np");
        let inner = Tag::new(2, 5, "np");
        let twin = Tag::new(0, 5, "other");

        assert!(outer.strictly_contains(&inner));
        assert!(!inner.strictly_contains(&outer));
        assert!(!outer.strictly_contains(&twin));
        assert!(outer.same_span(&twin));
        assert!(outer.overlaps(&Tag::new(5, 7, "x")));
        assert!(!outer.overlaps(&Tag::new(6, 7, "x")));
        assert_eq!(inner.len(), 4);
        assert_eq!(outer.to_string(), "np(0, 5)");
    }

    #[test]
    fn test_index_layout() {
        assert_eq!(core::mem::size_of::<TokenIndex>(), 4);
    }

    proptest! {
        #[test]
        fn strict_containment_is_asymmetric(a in 0usize..20, b in 0usize..20, c in 0usize..20, d in 0usize..20) {
            let x = Tag::new(a.min(b), a.max(b), "x");
            let y = Tag::new(c.min(d), c.max(d), "y");
            prop_assert!(!(x.strictly_contains(&y) && y.strictly_contains(&x)));
            if x.strictly_contains(&y) {
                prop_assert!(x.overlaps(&y));
                prop_assert!(x.len() > y.len());
            }
        }
    }
}
