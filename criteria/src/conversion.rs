use crate::ast::Criteria;
use crate::error::InvalidFilterExpression;
use crate::parser;
use std::str::FromStr;

impl<'a> TryFrom<&'a str> for Criteria {
    type Error = InvalidFilterExpression;

    fn try_from(value: &'a str) -> Result<Self, Self::Error> { parser::parse_criteria(value) }
}

impl TryFrom<String> for Criteria {
    type Error = InvalidFilterExpression;

    fn try_from(value: String) -> Result<Self, Self::Error> { parser::parse_criteria(&value) }
}

impl FromStr for Criteria {
    type Err = InvalidFilterExpression;

    fn from_str(s: &str) -> Result<Self, Self::Err> { parser::parse_criteria(s) }
}
