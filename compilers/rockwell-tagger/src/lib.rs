//! The sequence matcher: runs compiled Rockwell rules over a token window
//! and emits labeled tags in original token indices.

mod affix;
pub mod consolidate;
pub mod error;
pub mod inserter;
mod matcher;
pub mod span;

use std::ops::Range;

use rockwell_protocol::{Tag, Token};
use rockwell_script::RuleSet;
use serde::{Deserialize, Serialize};
use tracing::debug;

pub use consolidate::{consolidate, consolidate_by_label, reduce_contained};
pub use error::TaggerError;
pub use inserter::substitute;
pub use span::{Span, Spanned};

use crate::matcher::Matcher;

/// Runtime knobs of the matcher.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TaggerOptions {
    /// How deeply affixes and rule references may nest.
    pub max_depth: usize,
}

impl Default for TaggerOptions {
    fn default() -> Self {
        Self { max_depth: 32 }
    }
}

/// A compiled rule set ready to be matched against sentences.
///
/// Immutable after construction; one tagger can serve many threads.
#[derive(Debug, Clone)]
pub struct Tagger {
    rules: RuleSet,
    options: TaggerOptions,
}

impl Tagger {
    pub fn new(rules: RuleSet, options: TaggerOptions) -> Self {
        Self { rules, options }
    }

    pub fn from_script(script: &str, options: TaggerOptions) -> Result<Self, TaggerError> {
        Ok(Self::new(RuleSet::parse(script)?, options))
    }

    pub fn rules(&self) -> &RuleSet {
        &self.rules
    }

    pub fn options(&self) -> TaggerOptions {
        self.options
    }

    /// Runs the rule `label` over the whole sentence.
    pub fn tag(&self, tokens: &[Token], label: &str) -> Result<Vec<Tag>, TaggerError> {
        self.tag_window(tokens, 0..tokens.len(), label)
    }

    /// Runs the rule `label` over `window`, a range of slice positions.
    pub fn tag_window(
        &self,
        tokens: &[Token],
        window: Range<usize>,
        label: &str,
    ) -> Result<Vec<Tag>, TaggerError> {
        let rule = self
            .rules
            .rule(label)
            .ok_or_else(|| TaggerError::UnknownRule(label.to_string()))?;
        if window.start > window.end || window.end > tokens.len() {
            return Err(TaggerError::WindowOutOfBounds {
                start: window.start,
                end: window.end,
                len: tokens.len(),
            });
        }

        let matcher = Matcher::new(&self.rules, tokens, self.options.max_depth);
        let tags: Vec<Tag> = matcher
            .spans(rule.id, Span::new(window.start, window.end), 0)
            .into_iter()
            .map(|span| matcher.tag(span, &rule.label))
            .collect();

        debug!(rule = label, tags = tags.len(), "rule matched");
        Ok(tags)
    }

    /// Runs several rules, concatenating their tags in `labels` order.
    pub fn tag_rules(&self, tokens: &[Token], labels: &[&str]) -> Result<Vec<Tag>, TaggerError> {
        let mut tags = Vec::new();
        for label in labels {
            tags.extend(self.tag(tokens, label)?);
        }
        Ok(tags)
    }

    /// [`Tagger::tag`] followed by [`consolidate`].
    pub fn annotate(&self, tokens: &[Token], label: &str) -> Result<Vec<Tag>, TaggerError> {
        Ok(consolidate(self.tag(tokens, label)?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rockwell_protocol::PlainToken;

    /// "word/POS" pairs.
    fn sentence(text: &str) -> Vec<Token> {
        text.split_whitespace()
            .enumerate()
            .map(|(i, pair)| {
                let (word, pos) = pair.rsplit_once('/').unwrap();
                PlainToken::new(i, word).with_reading(pos, word.to_lowercase()).into()
            })
            .collect()
    }

    fn tagger(script: &str) -> Tagger {
        Tagger::from_script(script, TaggerOptions::default()).unwrap()
    }

    fn spans(tags: &[Tag]) -> Vec<(usize, usize)> {
        tags.iter().map(|t| (t.start, t.end)).collect()
    }

    #[test]
    fn test_every_start_offset_is_tried() {
        let t = tagger("@pos:NN | noun");
        let tokens = sentence("the/DT dog/NN saw/VBD a/DT cat/NN");
        assert_eq!(spans(&t.tag(&tokens, "noun").unwrap()), vec![(1, 1), (4, 4)]);
    }

    #[test]
    fn test_first_matching_group_wins() {
        let t = tagger("@pos:JJ / @pos:NN | word");
        let tokens = sentence("big/JJ dog/NN");
        assert_eq!(spans(&t.tag(&tokens, "word").unwrap()), vec![(0, 0)]);

        let tokens = sentence("the/DT dog/NN");
        assert_eq!(spans(&t.tag(&tokens, "word").unwrap()), vec![(1, 1)]);
    }

    #[test]
    fn test_repeat_backtracks_for_later_elements() {
        // The run must leave the last noun for the final element
        let t = tagger("@pos+repeat:NN ; @pos:NN | compound");
        let tokens = sentence("horse/NN stable/NN door/NN");
        assert_eq!(spans(&t.tag(&tokens, "compound").unwrap()), vec![(0, 2), (1, 2)]);
    }

    #[test]
    fn test_optional_elements_may_be_skipped() {
        let t = tagger("@pos+optional:DT ; @pos:NN | np");
        let tokens = sentence("the/DT dog/NN cat/NN");
        assert_eq!(spans(&t.tag(&tokens, "np").unwrap()), vec![(0, 1), (1, 1), (2, 2)]);
    }

    #[test]
    fn test_matches_consume_at_least_one_token() {
        let t = tagger("@pos+optional:DT | maybe");
        let tokens = sentence("dog/NN");
        assert!(t.tag(&tokens, "maybe").unwrap().is_empty());
    }

    #[test]
    fn test_chain_with_stacked_separators() {
        let t = tagger("@pos+chain:JJ | adjectives");
        let tokens = sentence("red/JJ ,/, green/JJ ,/, and/CC blue/JJ ball/NN");
        let tags = t.annotate(&tokens, "adjectives").unwrap();
        assert_eq!(spans(&tags), vec![(0, 5)]);

        // A trailing separator is not part of the chain
        let tokens = sentence("red/JJ and/CC ball/NN");
        assert_eq!(spans(&t.annotate(&tokens, "adjectives").unwrap()), vec![(0, 0)]);
    }

    #[test]
    fn test_suffix_extends_head() {
        let t = tagger(
            "@pos:IN ; @pos:NN | pp\n\
             @pos:VB ; @rule+suffix:pp | vp",
        );
        let tokens = sentence("go/VB to/TO town/NN");
        assert!(t.tag(&tokens, "vp").unwrap().is_empty());

        let tokens = sentence("sit/VB on/IN benches/NN");
        assert_eq!(spans(&t.tag(&tokens, "vp").unwrap()), vec![(0, 2)]);
    }

    #[test]
    fn test_optional_affix_leaves_head_unextended() {
        let t = tagger(
            "@pos:IN ; @pos:NN | pp\n\
             @pos:VB ; @rule+suffix+optional:pp | vp",
        );
        let tokens = sentence("go/VB home/NN");
        assert_eq!(spans(&t.tag(&tokens, "vp").unwrap()), vec![(0, 0)]);
    }

    #[test]
    fn test_complete_suffix_needs_the_whole_window() {
        let t = tagger(
            "@pos:IN ; @pos:NN | pp\n\
             @pos:VB ; @rule+suffix+complete:pp | vp",
        );
        let tokens = sentence("sit/VB on/IN benches/NN ./.");
        assert!(t.tag(&tokens, "vp").unwrap().is_empty());
        assert_eq!(spans(&t.tag_window(&tokens, 0..3, "vp").unwrap()), vec![(0, 2)]);
    }

    #[test]
    fn test_complete_prefix_needs_the_whole_window() {
        let t = tagger(
            "@pos+repeat:RB | adverbs\n\
             @rule+prefix+complete:adverbs ; @pos:VB | vp",
        );
        let tokens = sentence("very/RB quickly/RB go/VB");
        assert_eq!(spans(&t.tag(&tokens, "vp").unwrap()), vec![(0, 2)]);

        let tokens = sentence("the/DT quickly/RB go/VB");
        assert!(t.tag(&tokens, "vp").unwrap().is_empty());
        assert_eq!(spans(&t.tag_window(&tokens, 1..3, "vp").unwrap()), vec![(1, 2)]);
    }

    #[test]
    fn test_rule_reference_tries_every_group_at_its_position() {
        let t = tagger(
            "@pos:JJ / @pos:NN | x\n\
             @rule:x ; @pos:VBZ | clause",
        );
        let tokens = sentence("dog/NN runs/VBZ");
        assert_eq!(spans(&t.tag(&tokens, "clause").unwrap()), vec![(0, 1)]);

        // An adjective further right must not hide the noun group
        let tokens = sentence("dog/NN runs/VBZ fast/RB big/JJ");
        assert_eq!(spans(&t.tag(&tokens, "clause").unwrap()), vec![(0, 1)]);
    }

    #[test]
    fn test_nested_repeats_over_long_sentences() {
        let t = tagger(
            "@pos:NN | l0\n\
             @rule+repeat:l0 | l1\n\
             @rule+repeat:l1 | l2\n\
             @rule+repeat:l2 | l3\n\
             @rule+repeat:l3 | l4",
        );
        let tokens = sentence(&vec!["w/NN"; 60].join(" "));
        assert_eq!(t.tag(&tokens, "l4").unwrap().len(), 60);
        assert_eq!(spans(&t.annotate(&tokens, "l4").unwrap()), vec![(0, 59)]);
    }

    #[test]
    fn test_infix_spans_the_gap_exactly() {
        let t = tagger(
            "@pos+repeat:RB | adverbs\n\
             @pos:MD ; @rule+infix:adverbs ; @pos:VB | modal",
        );
        let tokens = sentence("will/MD surely/RB not/RB go/VB");
        assert_eq!(spans(&t.tag(&tokens, "modal").unwrap()), vec![(0, 3)]);

        // Required infix with nothing in between
        let tokens = sentence("will/MD go/VB");
        assert!(t.tag(&tokens, "modal").unwrap().is_empty());
    }

    #[test]
    fn test_optional_infix_allows_empty_gap() {
        let t = tagger(
            "@pos+repeat:RB | adverbs\n\
             @pos:MD ; @rule+infix+optional:adverbs ; @pos:VB | modal",
        );
        let tokens = sentence("will/MD go/VB");
        assert_eq!(spans(&t.tag(&tokens, "modal").unwrap()), vec![(0, 1)]);
    }

    #[test]
    fn test_depth_bound_stops_nesting() {
        let script = "@pos:NN | a\n\
                      @rule:a | b\n\
                      @rule:b | c";
        let tokens = sentence("dog/NN");

        let shallow = Tagger::from_script(script, TaggerOptions { max_depth: 1 }).unwrap();
        assert_eq!(spans(&shallow.tag(&tokens, "b").unwrap()), vec![(0, 0)]);
        assert!(shallow.tag(&tokens, "c").unwrap().is_empty());

        assert_eq!(spans(&tagger(script).tag(&tokens, "c").unwrap()), vec![(0, 0)]);
    }

    #[test]
    fn test_left_recursion_terminates() {
        let t = tagger("@rule+optional:list ; @pos:NN | list");
        let tokens = sentence("a/NN b/NN c/NN");
        let tags = t.annotate(&tokens, "list").unwrap();
        assert!(!tags.is_empty());
        assert!(tags.iter().all(|tag| tag.end <= 2));
    }

    #[test]
    fn test_tags_use_original_indices_after_substitution() {
        let t = tagger("@type:amount ; @pos:NN | priced");
        let tokens = sentence("about/RB $/$ 15/CD tickets/NN");
        let merged = substitute(&tokens, &[Tag::new(1, 2, "amount")]).unwrap();
        assert_eq!(spans(&t.tag(&merged, "priced").unwrap()), vec![(1, 3)]);
    }

    #[test]
    fn test_errors() {
        let t = tagger("@pos:NN | noun");
        let tokens = sentence("dog/NN");
        assert!(matches!(
            t.tag(&tokens, "verb"),
            Err(TaggerError::UnknownRule(label)) if label == "verb"
        ));
        assert!(matches!(
            t.tag_window(&tokens, 0..4, "noun"),
            Err(TaggerError::WindowOutOfBounds { len: 1, .. })
        ));
        assert!(matches!(
            Tagger::from_script("@pos:NN", TaggerOptions::default()),
            Err(TaggerError::Script(_))
        ));
    }

    #[test]
    fn test_tagger_is_shareable() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Tagger>();
    }
}
