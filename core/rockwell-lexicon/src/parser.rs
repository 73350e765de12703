use nom::{
    branch::alt,
    bytes::complete::take_while1,
    character::complete::{anychar, char, multispace0, satisfy},
    combinator::{map, recognize},
    multi::many0,
    sequence::pair,
    IResult,
};

/// Byte range of a raw token in the input text (end exclusive).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    pub fn len(&self) -> usize {
        self.end - self.start
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RawToken<'a> {
    Word(&'a str),
    Number(&'a str),
    /// Contracted ending split off a word ("n't", "'s", "'ll").
    Clitic(&'a str),
    Punct(char),
}

/// Endings split off as separate tokens, longest first.
const CLITICS: &[&str] = &["n't", "'s", "'re", "'ll", "'ve", "'m", "'d"];

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '\'' || c == '-' || c == '_'
}

/// Digits with inner group/decimal separators: "15", "1,000", "3.25".
fn number(input: &str) -> IResult<&str, &str> {
    recognize(pair(
        take_while1(|c: char| c.is_ascii_digit()),
        many0(pair(
            satisfy(|c| c == ',' || c == '.'),
            take_while1(|c: char| c.is_ascii_digit()),
        )),
    ))(input)
}

fn raw_token(input: &str) -> IResult<&str, RawToken> {
    alt((
        map(number, RawToken::Number),
        map(take_while1(is_word_char), RawToken::Word),
        map(char('’'), |_| RawToken::Punct('\'')),
        map(anychar, RawToken::Punct),
    ))(input)
}

/// Splits a word into its stem and a trailing clitic, if it carries one.
fn split_clitic(word: &str) -> (&str, Option<&str>) {
    let lower = word.to_lowercase();
    for clitic in CLITICS {
        if lower.len() > clitic.len() && lower.ends_with(clitic) {
            let cut = word.len() - clitic.len();
            if word.is_char_boundary(cut) {
                return (&word[..cut], Some(&word[cut..]));
            }
        }
    }
    (word, None)
}

/// Splits `original_input` into raw words, numbers, clitics and punctuation.
pub fn parse_with_spans(original_input: &str) -> Vec<(Span, RawToken)> {
    let mut input = original_input;
    let mut result = Vec::new();

    loop {
        // 1. Skip whitespace
        let (next_input, _) = match multispace0::<&str, nom::error::Error<&str>>(input) {
            Ok(res) => res,
            Err(_) => break,
        };
        input = next_input;

        if input.is_empty() {
            break;
        }

        // 2. Match one token
        let (next_input, token) = match raw_token(input) {
            Ok(res) => res,
            Err(_) => break,
        };

        let start = original_input.len() - input.len();
        let end = original_input.len() - next_input.len();

        // 3. Words may end in a contraction
        match token {
            RawToken::Word(word) => match split_clitic(word) {
                (stem, Some(clitic)) => {
                    let cut = start + stem.len();
                    if !stem.trim_matches('\'').is_empty() {
                        result.push((Span::new(start, cut), RawToken::Word(stem)));
                    }
                    result.push((Span::new(cut, end), RawToken::Clitic(clitic)));
                }
                (word, None) => result.push((Span::new(start, end), RawToken::Word(word))),
            },
            other => result.push((Span::new(start, end), other)),
        }

        input = next_input;
    }

    result
}
