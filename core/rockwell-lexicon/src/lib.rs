pub mod error;
pub mod lexicon;
pub mod parser;
pub mod resources;

pub use error::ResourceError;
pub use lexicon::Lexicon;
pub use resources::{Resources, WordSet};

use rockwell_protocol::{PlainToken, Reading, Token};

use crate::parser::{parse_with_spans, RawToken};

/// Contracted endings and the full word each one stands for.
const EXPANSIONS: &[(&str, &str)] = &[
    ("n't", "not"),
    ("'re", "are"),
    ("'ll", "will"),
    ("'ve", "have"),
    ("'m", "am"),
    ("'d", "would"),
];

pub struct Lexer<'a> {
    lexicon: &'a Lexicon,
}

impl<'a> Lexer<'a> {
    pub fn new(lexicon: &'a Lexicon) -> Self {
        Self { lexicon }
    }

    /// Primary entry point: Text -> indexed, lemmatized tokens
    pub fn tokenize(&self, input: &str) -> Vec<Token> {
        parse_with_spans(input)
            .into_iter()
            .enumerate()
            .map(|(index, (_span, raw))| self.token(index, raw).into())
            .collect()
    }

    fn token(&self, index: usize, raw: RawToken) -> PlainToken {
        match raw {
            RawToken::Word(word) => self.with_readings(PlainToken::new(index, word), word),
            RawToken::Number(number) => PlainToken::new(index, number).with_reading("CD", number),
            RawToken::Punct(c) => {
                let text = c.to_string();
                PlainToken::new(index, text.as_str()).with_reading(punctuation_pos(c), text.as_str())
            }
            RawToken::Clitic(clitic) => {
                let lower = clitic.to_lowercase();
                match EXPANSIONS.iter().find(|(short, _)| *short == lower) {
                    Some((_, full)) => {
                        self.with_readings(PlainToken::new(index, *full).with_cain(clitic), full)
                    }
                    None => self.with_readings(PlainToken::new(index, clitic), clitic),
                }
            }
        }
    }

    fn with_readings(&self, mut token: PlainToken, word: &str) -> PlainToken {
        match self.lexicon.lookup(word) {
            Some(readings) => token.readings.extend(readings.iter().cloned()),
            None => token.readings.push(guess_reading(word)),
        }
        token
    }
}

/// Fallback for words missing from the lexicon: capitalized words are proper
/// nouns, everything else a common noun.
fn guess_reading(word: &str) -> Reading {
    let lemma = word.to_lowercase();
    if word.chars().next().is_some_and(char::is_uppercase) {
        Reading::new("NNP", lemma)
    } else {
        Reading::new("NN", lemma)
    }
}

fn punctuation_pos(c: char) -> &'static str {
    match c {
        '.' | '!' | '?' => ".",
        ',' => ",",
        ';' | ':' | '-' => ":",
        '$' | '€' | '£' | '¥' | '₹' => "$",
        '#' => "#",
        '%' => "NN",
        '(' | '[' | '{' => "-LRB-",
        ')' | ']' | '}' => "-RRB-",
        '"' | '\'' => "''",
        _ => "SYM",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lexer_tokens(input: &str) -> Vec<Token> {
        let lexicon = Lexicon::builtin().unwrap();
        Lexer::new(&lexicon).tokenize(input)
    }

    #[test]
    fn test_tokenizer_integration() {
        let tokens = lexer_tokens("It costs $15.");

        assert_eq!(tokens.len(), 5);
        assert_eq!(tokens[0].word(), "It");
        assert_eq!(tokens[0].readings()[0].pos, "PRP");

        // "costs" stays ambiguous until a rule commits to it
        assert_eq!(tokens[1].readings().len(), 2);

        assert_eq!(tokens[2].readings()[0].pos, "$");
        assert_eq!(tokens[3].readings()[0].pos, "CD");
        assert_eq!(tokens[4].readings()[0].pos, ".");

        for (i, token) in tokens.iter().enumerate() {
            assert_eq!(token.first_index().get(), i);
        }
    }

    #[test]
    fn test_contraction_keeps_cain() {
        let tokens = lexer_tokens("They don't");
        assert_eq!(tokens.len(), 3);
        assert_eq!(tokens[2].word(), "not");
        assert_eq!(tokens[2].cain(), Some("n't"));
        assert_eq!(tokens[2].readings()[0].pos, "RB");
    }

    #[test]
    fn test_unknown_words_are_guessed() {
        let tokens = lexer_tokens("Alicja visited Warsaw");
        assert_eq!(tokens[0].readings()[0], Reading::new("NNP", "alicja"));
        assert_eq!(tokens[1].readings()[0], Reading::new("NN", "visited"));
        assert_eq!(tokens[2].readings()[0].pos, "NNP");
    }
}
