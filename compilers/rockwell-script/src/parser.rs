use nom::{
    bytes::complete::take_while1,
    character::complete::{char, multispace0},
    combinator::{map, opt, rest},
    error::{Error, ErrorKind},
    multi::separated_list1,
    sequence::{delimited, pair, preceded, separated_pair, tuple},
    Err, IResult,
};

use crate::error::ScriptErrorKind;
use crate::syntax::{ElementSyntax, RuleLine, ValueList};

/// Characters that end a value unless escaped with `\`.
fn is_separator(c: char) -> bool {
    matches!(c, ';' | '/' | '|' | '+' | ',')
}

fn ws<'a, O, F>(inner: F) -> impl FnMut(&'a str) -> IResult<&'a str, O>
where
    F: FnMut(&'a str) -> IResult<&'a str, O>,
{
    delimited(multispace0, inner, multispace0)
}

fn ident(input: &str) -> IResult<&str, &str> {
    take_while1(|c: char| c.is_ascii_alphanumeric() || c == '_' || c == '-')(input)
}

/// One value, with `\x` escapes resolved. Stops at whitespace or a separator.
fn value(input: &str) -> IResult<&str, String> {
    let mut out = String::new();
    let mut end = input.len();
    let mut chars = input.char_indices();

    while let Some((i, c)) = chars.next() {
        if c == '\\' {
            match chars.next() {
                Some((_, escaped)) => out.push(escaped),
                None => return Err(Err::Failure(Error::new(&input[i..], ErrorKind::Escaped))),
            }
        } else if c.is_whitespace() || is_separator(c) {
            end = i;
            break;
        } else {
            out.push(c);
        }
    }

    if out.is_empty() {
        return Err(Err::Error(Error::new(input, ErrorKind::TakeWhile1)));
    }
    Ok((&input[end..], out))
}

fn value_list(input: &str) -> IResult<&str, ValueList> {
    map(
        pair(opt(char('!')), separated_list1(ws(char(',')), value)),
        |(bang, values)| ValueList {
            negated: bang.is_some(),
            values,
        },
    )(input)
}

fn names(input: &str) -> IResult<&str, Vec<String>> {
    preceded(
        char('@'),
        map(separated_list1(char('+'), ident), |names| {
            names.into_iter().map(str::to_string).collect()
        }),
    )(input)
}

fn element(input: &str) -> IResult<&str, ElementSyntax> {
    map(
        separated_pair(names, ws(char(':')), separated_list1(ws(char('+')), value_list)),
        |(names, values)| ElementSyntax { names, values },
    )(input)
}

fn group(input: &str) -> IResult<&str, Vec<ElementSyntax>> {
    separated_list1(ws(char(';')), element)(input)
}

fn groups(input: &str) -> IResult<&str, Vec<Vec<ElementSyntax>>> {
    separated_list1(ws(char('/')), group)(input)
}

/// True when `text` contains a `|` that is not escaped.
fn has_label_separator(text: &str) -> bool {
    let mut escaped = false;
    for c in text.chars() {
        match c {
            _ if escaped => escaped = false,
            '\\' => escaped = true,
            '|' => return true,
            _ => {}
        }
    }
    false
}

fn syntax_error(line: &str, remaining: &str) -> ScriptErrorKind {
    let column = line.len() - remaining.len() + 1;
    let snippet: String = remaining.chars().take(12).collect();
    let message = if snippet.is_empty() {
        "unexpected end of rule".to_string()
    } else {
        format!("unexpected input '{snippet}'")
    };
    ScriptErrorKind::Syntax { column, message }
}

/// Parses one non-comment, non-blank rule line.
pub fn parse_line(line: &str) -> Result<RuleLine, ScriptErrorKind> {
    if !has_label_separator(line) {
        return Err(ScriptErrorKind::MissingLabel);
    }

    let parsed: IResult<&str, (_, Vec<Vec<ElementSyntax>>, _, char, &str)> =
        tuple((multispace0, groups, multispace0, char('|'), rest))(line);

    let (groups, label) = match parsed {
        Ok((_, (_, groups, _, _, label))) => (groups, label.trim()),
        Err(Err::Error(e)) | Err(Err::Failure(e)) => return Err(syntax_error(line, e.input)),
        Err(Err::Incomplete(_)) => return Err(syntax_error(line, "")),
    };

    if label.is_empty() {
        return Err(ScriptErrorKind::MissingLabel);
    }
    if label.contains(|c: char| c.is_whitespace() || c == '|') {
        return Err(syntax_error(line, label));
    }

    Ok(RuleLine {
        groups,
        label: label.to_string(),
    })
}
