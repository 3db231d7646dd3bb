//! Filter already-materialized records against criteria. This is the path for records that cannot be
//! filtered at the storage layer, such as opaque JSON documents.

use crate::ast::{Clause, Condition, Criteria, Operand, Operator};
use crate::error::EvaluationError;
use crate::value::{compare_with_fallback, parse_number, split_range, Value};
use std::cmp::Ordering;
use std::collections::{BTreeMap, HashMap};
use tracing::error;

/// Field access by name.
pub trait FieldReader {
    /// `None` when the record has no such field. A field that exists without a value is `Some(Value::Null)`.
    fn field(&self, name: &str) -> Option<Value>;
}

impl<T: FieldReader + ?Sized> FieldReader for &T {
    fn field(&self, name: &str) -> Option<Value> { (**self).field(name) }
}

impl FieldReader for HashMap<String, Value> {
    fn field(&self, name: &str) -> Option<Value> { self.get(name).cloned() }
}

impl FieldReader for BTreeMap<String, Value> {
    fn field(&self, name: &str) -> Option<Value> { self.get(name).cloned() }
}

impl FieldReader for serde_json::Map<String, serde_json::Value> {
    /// Dotted names descend into nested objects unless the literal key exists.
    fn field(&self, name: &str) -> Option<Value> {
        if let Some(value) = self.get(name) {
            return Some(json_value(value));
        }
        let mut parts = name.split('.');
        let mut current = self.get(parts.next()?)?;
        for part in parts {
            current = current.as_object()?.get(part)?;
        }
        Some(json_value(current))
    }
}

impl FieldReader for serde_json::Value {
    fn field(&self, name: &str) -> Option<Value> { self.as_object()?.field(name) }
}

fn json_value(value: &serde_json::Value) -> Value {
    match value {
        serde_json::Value::Null => Value::Null,
        serde_json::Value::Bool(b) => Value::Bool(*b),
        serde_json::Value::Number(n) => match n.as_i64() {
            Some(i) => Value::I64(i),
            None => n.as_f64().map(Value::F64).unwrap_or_else(|| Value::String(n.to_string())),
        },
        serde_json::Value::String(s) => Value::String(s.clone()),
        other => Value::String(other.to_string()),
    }
}

/// Evaluate `criteria` against one record, folding left to right. Empty criteria match everything.
/// Every condition is evaluated so a missing field is always reported.
pub fn evaluate<R: FieldReader + ?Sized>(record: &R, criteria: &Criteria) -> Result<bool, EvaluationError> {
    let mut accumulated: Option<bool> = None;
    for clause in criteria {
        let result = match clause {
            Clause::Condition(condition) => evaluate_condition(record, condition)?,
            Clause::Group { criteria, .. } => evaluate(record, criteria)?,
        };
        accumulated = Some(match accumulated {
            None => result,
            Some(left) => clause.combinator().apply(left, result),
        });
    }
    Ok(accumulated.unwrap_or(true))
}

pub fn evaluate_condition<R: FieldReader + ?Sized>(record: &R, condition: &Condition) -> Result<bool, EvaluationError> {
    let value = record.field(&condition.field).ok_or_else(|| {
        error!("record has no field {:?}", condition.field);
        EvaluationError::FieldAccess { field: condition.field.clone() }
    })?;

    let literal = match &condition.operand {
        Operand::Text(literal) => literal.as_str(),
        Operand::Null => {
            return match condition.operator {
                Operator::Equal => Ok(value.is_null()),
                Operator::NotEqual => Ok(!value.is_null()),
                Operator::Between => Err(EvaluationError::InvalidRangeFormat("null".into())),
                _ => Ok(false),
            }
        }
    };

    Ok(match condition.operator {
        Operator::Equal => equals(&value, literal),
        Operator::NotEqual => !equals(&value, literal),
        Operator::Like => contains(&value, literal),
        Operator::NotLike => !contains(&value, literal),
        Operator::LessThan => ordering(&value, literal) == Some(Ordering::Less),
        Operator::LessThanOrEqual => matches!(ordering(&value, literal), Some(Ordering::Less | Ordering::Equal)),
        Operator::GreaterThan => ordering(&value, literal) == Some(Ordering::Greater),
        Operator::GreaterThanOrEqual => matches!(ordering(&value, literal), Some(Ordering::Greater | Ordering::Equal)),
        Operator::Between => {
            let (min, max) = split_range(literal).ok_or_else(|| EvaluationError::InvalidRangeFormat(literal.to_string()))?;
            in_range(&value, min, max)
        }
    })
}

fn equals(value: &Value, literal: &str) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => literal.trim().eq_ignore_ascii_case(if *b { "true" } else { "false" }),
        v if v.is_numeric() => numeric_equals(v, literal.trim()).unwrap_or_else(|| v.to_string() == literal),
        v => v.to_string() == literal,
    }
}

/// Equality in the value's own numeric domain; `None` when the literal is not a number.
fn numeric_equals(value: &Value, literal: &str) -> Option<bool> {
    match value {
        Value::I32(n) => integer_equals(i64::from(*n), literal),
        Value::I64(n) => integer_equals(*n, literal),
        Value::F32(n) => literal.parse::<f32>().ok().filter(|x| !x.is_nan()).map(|x| x == *n),
        Value::F64(n) => literal.parse::<f64>().ok().filter(|x| !x.is_nan()).map(|x| x == *n),
        _ => None,
    }
}

fn integer_equals(n: i64, literal: &str) -> Option<bool> {
    if let Ok(expected) = literal.parse::<i64>() {
        return Some(n == expected);
    }
    let expected = parse_number(literal)?;
    let in_range = expected.fract() == 0.0 && expected >= i64::MIN as f64 && expected < i64::MAX as f64;
    Some(in_range && expected as i64 == n)
}

fn contains(value: &Value, literal: &str) -> bool { value.as_text().is_some_and(|text| text.contains(literal)) }

fn ordering(value: &Value, literal: &str) -> Option<Ordering> { value.as_text().map(|text| compare_with_fallback(&text, literal)) }

fn in_range(value: &Value, min: &str, max: &str) -> bool {
    let Some(text) = value.as_text() else {
        return false;
    };
    match (parse_number(&text), parse_number(min), parse_number(max)) {
        (Some(number), Some(min), Some(max)) => min <= number && number <= max,
        _ => min <= text.as_str() && text.as_str() <= max,
    }
}

#[derive(Debug, PartialEq)]
pub enum FilterResult<R> {
    Pass(R),
    Skip(R),
    Error(R, EvaluationError),
}

pub struct FilterIterator<'c, I> {
    iter: I,
    criteria: &'c Criteria,
}

impl<'c, I, R> FilterIterator<'c, I>
where
    I: Iterator<Item = R>,
    R: FieldReader,
{
    pub fn new(iter: I, criteria: &'c Criteria) -> Self { Self { iter, criteria } }
}

impl<I, R> Iterator for FilterIterator<'_, I>
where
    I: Iterator<Item = R>,
    R: FieldReader,
{
    type Item = FilterResult<R>;

    fn next(&mut self) -> Option<Self::Item> {
        self.iter.next().map(|record| match evaluate(&record, self.criteria) {
            Ok(true) => FilterResult::Pass(record),
            Ok(false) => FilterResult::Skip(record),
            Err(e) => FilterResult::Error(record, e),
        })
    }
}

/// Keep the records that match, stopping at the first evaluation error.
pub fn filter_records<R, I>(records: I, criteria: &Criteria) -> Result<Vec<R>, EvaluationError>
where
    I: IntoIterator<Item = R>,
    R: FieldReader,
{
    if criteria.is_empty() {
        return Ok(records.into_iter().collect());
    }
    let mut matched = Vec::new();
    for result in FilterIterator::new(records.into_iter(), criteria) {
        match result {
            FilterResult::Pass(record) => matched.push(record),
            FilterResult::Skip(_) => {}
            FilterResult::Error(_, e) => return Err(e),
        }
    }
    Ok(matched)
}
