//! Compile criteria into a storage-level predicate. Fields are validated against the record's
//! filterable metadata and literals are coerced to the declared field type.

use crate::ast::{Clause, Combinator, Condition, Criteria, Operand, Operator};
use crate::config::Config;
use crate::error::BuildError;
use crate::metadata::{FieldInfo, Filterable, MetadataCache, RecordMetadata};
use crate::value::{split_range, Value};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Comparison {
    Equal,
    NotEqual,
    LessThan,
    LessThanOrEqual,
    GreaterThan,
    GreaterThanOrEqual,
}

/// Composable predicate handed to the storage layer. Never executed here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum QueryPredicate {
    /// Matches everything; produced for empty criteria without a tenant scope.
    True,
    Compare { field: String, comparison: Comparison, value: Value },
    /// Substring match, `%value%`.
    Contains { field: String, value: String, negated: bool },
    /// Inclusive range.
    Between { field: String, min: Value, max: Value },
    IsNull(String),
    IsNotNull(String),
    And(Box<QueryPredicate>, Box<QueryPredicate>),
    Or(Box<QueryPredicate>, Box<QueryPredicate>),
}

impl QueryPredicate {
    pub fn and(self, other: QueryPredicate) -> QueryPredicate {
        match self {
            QueryPredicate::True => other,
            this => QueryPredicate::And(Box::new(this), Box::new(other)),
        }
    }

    pub fn or(self, other: QueryPredicate) -> QueryPredicate {
        match self {
            QueryPredicate::True => QueryPredicate::True,
            this => QueryPredicate::Or(Box::new(this), Box::new(other)),
        }
    }

    fn combine(self, combinator: Combinator, other: QueryPredicate) -> QueryPredicate {
        match combinator {
            Combinator::And => self.and(other),
            Combinator::Or => self.or(other),
        }
    }
}

pub struct PredicateBuilder<'a> {
    cache: &'a MetadataCache,
    config: Config,
}

impl<'a> PredicateBuilder<'a> {
    pub fn new(cache: &'a MetadataCache) -> Self { Self { cache, config: Config::default() } }

    pub fn with_config(mut self, config: Config) -> Self {
        self.config = config;
        self
    }

    /// Fold `criteria` left to right into one predicate for `R`, then AND a tenant equality
    /// when `tenant` is a non-empty scope.
    pub fn build<R: Filterable>(&self, tenant: Option<&str>, criteria: &Criteria) -> Result<QueryPredicate, BuildError> {
        let metadata = self.cache.metadata_for::<R>();
        let mut predicate = fold(&metadata, criteria)?.unwrap_or(QueryPredicate::True);

        if let Some(tenant) = tenant.filter(|t| !t.is_empty()) {
            predicate = predicate.and(QueryPredicate::Compare {
                field: self.config.tenant_field.clone(),
                comparison: Comparison::Equal,
                value: Value::String(tenant.to_string()),
            });
        }

        debug!("built predicate for {}: {:?}", metadata.record_type(), predicate);
        Ok(predicate)
    }
}

fn fold(metadata: &RecordMetadata, criteria: &Criteria) -> Result<Option<QueryPredicate>, BuildError> {
    let mut accumulated: Option<QueryPredicate> = None;
    for clause in criteria {
        let next = match clause {
            Clause::Condition(condition) => condition_predicate(metadata, condition)?,
            Clause::Group { criteria, .. } => match fold(metadata, criteria)? {
                Some(predicate) => predicate,
                None => continue,
            },
        };
        accumulated = Some(match accumulated {
            None => next,
            Some(left) => left.combine(clause.combinator(), next),
        });
    }
    Ok(accumulated)
}

fn condition_predicate(metadata: &RecordMetadata, condition: &Condition) -> Result<QueryPredicate, BuildError> {
    let info = metadata.field(&condition.field).ok_or_else(|| BuildError::UnknownFilterField {
        field: condition.field.clone(),
        record_type: metadata.record_type().to_string(),
    })?;
    let field = condition.field.clone();

    let literal = match &condition.operand {
        Operand::Text(literal) => literal,
        Operand::Null => {
            return match condition.operator {
                Operator::Equal => Ok(QueryPredicate::IsNull(field)),
                Operator::NotEqual => Ok(QueryPredicate::IsNotNull(field)),
                operator => Err(BuildError::NullOperand { field, operator }),
            }
        }
    };

    let comparison = match condition.operator {
        Operator::Equal => Comparison::Equal,
        Operator::NotEqual => Comparison::NotEqual,
        Operator::LessThan => Comparison::LessThan,
        Operator::LessThanOrEqual => Comparison::LessThanOrEqual,
        Operator::GreaterThan => Comparison::GreaterThan,
        Operator::GreaterThanOrEqual => Comparison::GreaterThanOrEqual,
        Operator::Like | Operator::NotLike => {
            if info.type_tag.is_numeric() {
                debug!("substring match on numeric field {}", info.name);
            }
            return Ok(QueryPredicate::Contains { field, value: literal.clone(), negated: condition.operator == Operator::NotLike });
        }
        Operator::Between => {
            let (min, max) = split_range(literal).ok_or_else(|| BuildError::InvalidRangeFormat(literal.clone()))?;
            return Ok(QueryPredicate::Between { field, min: coerce(info, min), max: coerce(info, max) });
        }
    };
    Ok(QueryPredicate::Compare { field, comparison, value: coerce(info, literal) })
}

/// Coerce to the declared type, falling back to the raw text.
fn coerce(info: &FieldInfo, literal: &str) -> Value {
    info.type_tag.coerce(literal).unwrap_or_else(|e| {
        warn!("field {}: {}; comparing as text", info.name, e);
        Value::String(literal.to_string())
    })
}
