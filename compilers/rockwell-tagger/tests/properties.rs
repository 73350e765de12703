use proptest::prelude::*;
use rockwell_protocol::{PlainToken, Tag, Token};
use rockwell_tagger::{consolidate, Tagger, TaggerOptions};

const RULES: &str = "
@pos+repeat:RB | adverbs
@pos+optional:RB ; @pos:JJ | unit
@rule+chain:unit | adjectives
@rule+prefix+optional:adjectives ; @pos+repeat:NN | np
@pos:VB ; @rule+infix+optional:adverbs ; @pos:DT ; @rule+suffix:np | vp
@rule+prefix:adverbs ; @pos:VB ; @rule+suffix+complete:np | clause
";

const LABELS: &[&str] = &["adverbs", "adjectives", "np", "vp", "clause"];

fn arb_sentence() -> impl Strategy<Value = Vec<Token>> {
    let pos = prop::sample::select(vec!["RB", "JJ", "NN", "VB", "CC", "DT"]);
    prop::collection::vec(pos, 0..10).prop_map(|tags| {
        tags.into_iter()
            .enumerate()
            .map(|(i, pos)| {
                let word = if pos == "CC" { "and" } else { pos };
                PlainToken::new(i, word).with_reading(pos, word).into()
            })
            .collect()
    })
}

fn tagger() -> Tagger {
    Tagger::from_script(RULES, TaggerOptions::default()).unwrap()
}

proptest! {
    #[test]
    fn prop_tags_stay_inside_the_window(
        sentence in arb_sentence(),
        cut in (0usize..10, 0usize..10),
    ) {
        let tagger = tagger();
        let (a, b) = (cut.0.min(sentence.len()), cut.1.min(sentence.len()));
        let (lo, hi) = (a.min(b), a.max(b));

        for label in LABELS {
            for tag in tagger.tag_window(&sentence, lo..hi, label).unwrap() {
                prop_assert!(tag.start <= tag.end);
                prop_assert!(tag.start >= lo);
                prop_assert!(tag.end < hi);
            }
        }
    }

    #[test]
    fn prop_complete_suffix_reaches_the_window_end(sentence in arb_sentence()) {
        let tagger = tagger();
        for tag in tagger.tag(&sentence, "clause").unwrap() {
            prop_assert_eq!(tag.end + 1, sentence.len());
        }
    }

    #[test]
    fn prop_annotation_is_stable(sentence in arb_sentence()) {
        let tagger = tagger();
        for label in LABELS {
            let tags = tagger.annotate(&sentence, label).unwrap();
            prop_assert_eq!(consolidate(tags.clone()), tags.clone());
            prop_assert_eq!(tagger.annotate(&sentence, label).unwrap(), tags);
        }
    }
}

#[test]
fn empty_sentence_has_no_tags() {
    let tagger = tagger();
    let empty: Vec<Token> = Vec::new();
    for label in LABELS {
        assert_eq!(tagger.tag(&empty, label).unwrap(), Vec::<Tag>::new());
    }
}
