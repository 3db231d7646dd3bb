use crate::ast::{Combinator, Condition, Criteria, Operand, Operator};
use crate::error::{InvalidFilterExpression, ParseError};
use crate::grammar::{self, CriteriaParser};
use crate::tokenizer::{self, Token};
use pest::iterators::Pair;
use pest::Parser;
use tracing::debug;

/// Parse filter text such as `name = 'John' & (age > 25 | role != admin)` into [`Criteria`].
/// Blank input (or a bare `WHERE`) yields empty criteria.
pub fn parse_criteria(input: &str) -> Result<Criteria, InvalidFilterExpression> {
    let criteria = parse_expression(tokenizer::normalize(input)).map_err(|e| InvalidFilterExpression::new(input, e))?;
    debug!("parsed {:?} into {} condition(s)", input, criteria.len());
    Ok(criteria)
}

fn parse_expression(input: &str) -> Result<Criteria, ParseError> {
    let mut criteria = Criteria::new();
    let mut combinator = Combinator::Or;

    for token in tokenizer::tokenize(input)? {
        match token {
            Token::Combinator(symbol) => {
                combinator = Combinator::from_token(symbol).ok_or_else(|| ParseError::InvalidConditionFormat(symbol.to_string()))?;
                continue;
            }
            Token::Group(group) => {
                let inner = parse_expression(&group[1..group.len() - 1])?;
                if !inner.is_empty() {
                    criteria.push_group(combinator, inner);
                }
            }
            Token::Condition(text) => criteria.push_condition(parse_condition(text)?.with_combinator(combinator)),
        }
        combinator = Combinator::Or;
    }

    Ok(criteria)
}

/// Parse one atomic `field op value` token. The returned condition carries the default combinator.
pub fn parse_condition(input: &str) -> Result<Condition, ParseError> {
    let mut pairs = CriteriaParser::parse(grammar::Rule::Condition, input)
        .map_err(|_| ParseError::InvalidConditionFormat(input.to_string()))?
        .next()
        .ok_or_else(|| ParseError::InvalidConditionFormat(input.to_string()))?
        .into_inner();

    let field = expect(pairs.next(), grammar::Rule::Field, input)?.as_str().to_string();
    let symbol = expect(pairs.next(), grammar::Rule::Operator, input)?.as_str();
    let value = pairs.next().ok_or_else(|| ParseError::InvalidConditionFormat(input.to_string()))?;

    let operator = Operator::from_symbol(symbol).ok_or_else(|| ParseError::UnsupportedOperator(symbol.to_string()))?;
    let operand = parse_operand(value, input)?;

    Ok(Condition { field, operator, operand, combinator: Combinator::default() })
}

fn expect<'i>(pair: Option<Pair<'i, grammar::Rule>>, rule: grammar::Rule, input: &str) -> Result<Pair<'i, grammar::Rule>, ParseError> {
    match pair {
        Some(pair) if pair.as_rule() == rule => Ok(pair),
        _ => Err(ParseError::InvalidConditionFormat(input.to_string())),
    }
}

fn parse_operand(pair: Pair<grammar::Rule>, input: &str) -> Result<Operand, ParseError> {
    let s = pair.as_str();
    match pair.as_rule() {
        grammar::Rule::SingleQuotedString | grammar::Rule::DoubleQuotedString => Ok(Operand::Text(s[1..s.len() - 1].to_string())),
        grammar::Rule::Bare if s.eq_ignore_ascii_case("null") => Ok(Operand::Null),
        grammar::Rule::Bare => Ok(Operand::Text(s.to_string())),
        _ => Err(ParseError::InvalidConditionFormat(input.to_string())),
    }
}
