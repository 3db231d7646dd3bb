//! Splits a filter expression into top-level tokens. Parenthesized groups are kept whole,
//! so nested combinators survive until the group is parsed on its own.

use crate::error::ParseError;
use tracing::trace;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token<'a> {
    /// A single `field op value` condition, trimmed.
    Condition(&'a str),
    /// A parenthesized group, parentheses included.
    Group(&'a str),
    /// `&` or `|`.
    Combinator(&'a str),
}

impl<'a> Token<'a> {
    pub fn as_str(&self) -> &'a str {
        match self {
            Token::Condition(s) | Token::Group(s) | Token::Combinator(s) => s,
        }
    }
}

/// Strip a leading `WHERE` keyword (any case) and surrounding whitespace.
pub fn normalize(input: &str) -> &str {
    let trimmed = input.trim();
    match trimmed.get(..5) {
        Some(keyword) if keyword.eq_ignore_ascii_case("where") => {
            let rest = &trimmed[5..];
            if rest.is_empty() || rest.starts_with(char::is_whitespace) {
                rest.trim_start()
            } else {
                trimmed
            }
        }
        _ => trimmed,
    }
}

pub fn tokenize(input: &str) -> Result<Vec<Token<'_>>, ParseError> {
    check_balance(input)?;

    let mut tokens = Vec::new();
    let mut depth = 0usize;
    let mut start = 0usize;
    let mut quote: Option<char> = None;
    let mut prev: Option<char> = None;

    for (i, c) in input.char_indices() {
        let before = prev.replace(c);
        if let Some(q) = quote {
            if c == q {
                quote = None;
            }
            continue;
        }
        match c {
            '\'' | '"' if opens_quote(before) => quote = Some(c),
            '(' => {
                if depth == 0 {
                    flush_condition(&input[start..i], &mut tokens);
                    start = i;
                }
                depth += 1;
            }
            ')' => {
                depth -= 1;
                if depth == 0 {
                    tokens.push(Token::Group(&input[start..=i]));
                    start = i + 1;
                }
            }
            '&' | '|' if depth == 0 => {
                flush_condition(&input[start..i], &mut tokens);
                tokens.push(Token::Combinator(&input[i..i + 1]));
                start = i + 1;
            }
            _ => {}
        }
    }
    flush_condition(&input[start..], &mut tokens);

    trace!("tokenized {:?} into {:?}", input, tokens);
    Ok(tokens)
}

fn flush_condition<'a>(text: &'a str, tokens: &mut Vec<Token<'a>>) {
    let text = text.trim();
    if !text.is_empty() {
        tokens.push(Token::Condition(text));
    }
}

/// A quote only opens a literal at the start of a word; `don't` stays a bare value.
fn opens_quote(before: Option<char>) -> bool {
    match before {
        None => true,
        Some(c) => c.is_whitespace() || matches!(c, '=' | '!' | '<' | '>' | '~' | '(' | '&' | '|'),
    }
}

/// Parentheses outside quotes must pair up and never close before they open.
fn check_balance(input: &str) -> Result<(), ParseError> {
    let mut depth = 0i64;
    let mut quote: Option<char> = None;
    let mut prev: Option<char> = None;
    for c in input.chars() {
        let before = prev.replace(c);
        if let Some(q) = quote {
            if c == q {
                quote = None;
            }
            continue;
        }
        match c {
            '\'' | '"' if opens_quote(before) => quote = Some(c),
            '(' => depth += 1,
            ')' => {
                depth -= 1;
                if depth < 0 {
                    return Err(ParseError::MalformedExpression("closing parenthesis without a matching opening one".into()));
                }
            }
            _ => {}
        }
    }
    if let Some(q) = quote {
        return Err(ParseError::MalformedExpression(format!("unterminated {} quote", q)));
    }
    if depth != 0 {
        return Err(ParseError::MalformedExpression("unbalanced parentheses".into()));
    }
    Ok(())
}
