use crate::ast::Operator;
use thiserror::Error;

/// Failures while turning filter text into [`Criteria`](crate::ast::Criteria).
#[derive(Debug, Clone, Error, PartialEq)]
pub enum ParseError {
    #[error("Malformed expression: {0}")]
    MalformedExpression(String),
    #[error("Invalid condition format: {0}")]
    InvalidConditionFormat(String),
    #[error("Unsupported operator: {0}")]
    UnsupportedOperator(String),
}

/// The single error surfaced for unusable filter text. Always a client error.
#[derive(Debug, Clone, Error, PartialEq)]
#[error("Invalid filter expression {input:?}: {source}")]
pub struct InvalidFilterExpression {
    pub input: String,
    #[source]
    pub source: ParseError,
}

impl InvalidFilterExpression {
    pub fn new(input: impl Into<String>, source: ParseError) -> Self { Self { input: input.into(), source } }
}

/// Failures while compiling criteria into a [`QueryPredicate`](crate::selection::predicate::QueryPredicate).
#[derive(Debug, Clone, Error, PartialEq)]
pub enum BuildError {
    #[error("Unknown filter field {field:?} for {record_type}")]
    UnknownFilterField { field: String, record_type: String },
    #[error("Invalid range {0:?}: expected min:max")]
    InvalidRangeFormat(String),
    #[error("Operator {operator} cannot be used with null on field {field:?}")]
    NullOperand { field: String, operator: Operator },
}

/// Failures while evaluating criteria against a materialized record.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum EvaluationError {
    /// The record has no such field. This is a schema mismatch, not bad input.
    #[error("Field {field:?} does not exist on the record")]
    FieldAccess { field: String },
    #[error("Invalid range {0:?}: expected min:max")]
    InvalidRangeFormat(String),
}

impl EvaluationError {
    pub fn is_defect(&self) -> bool { matches!(self, EvaluationError::FieldAccess { .. }) }
}

#[derive(Debug, Clone, Error, PartialEq)]
pub enum Error {
    #[error(transparent)]
    Parse(#[from] InvalidFilterExpression),
    #[error(transparent)]
    Build(#[from] BuildError),
    #[error(transparent)]
    Evaluation(#[from] EvaluationError),
}

impl Error {
    /// True when the caller supplied bad filter text; false for schema mismatches that indicate a bug.
    pub fn is_client_error(&self) -> bool {
        match self {
            Error::Parse(_) | Error::Build(_) => true,
            Error::Evaluation(e) => !e.is_defect(),
        }
    }
}
