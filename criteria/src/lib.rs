//! A compact boolean filter language for query strings, such as
//! `name = 'John' & age > 25 | (status = 'active' & role != 'admin')`.
//!
//! Filter text is parsed into [`Criteria`], which can then either be compiled into a
//! [`QueryPredicate`] for a queryable store, or evaluated directly against materialized records
//! through [`FieldReader`].
//!
//! | Operator | Meaning                     |
//! |----------|-----------------------------|
//! | `=` `!=` | equal / not equal           |
//! | `<` `<=` `>` `>=` | ordered comparison |
//! | `~` `!~` | contains / does not contain |
//! | `<>`     | inclusive range, `min:max`  |
//!
//! Conditions combine with `&` and `|` strictly left to right; use parentheses to group.
//! An unquoted `null` matches absent values.

pub mod ast;
pub mod config;
pub mod conversion;
pub mod error;
pub mod grammar;
pub mod metadata;
pub mod parser;
pub mod selection;
pub mod tokenizer;
pub mod value;

use std::collections::BTreeMap;

pub use ast::{Clause, Combinator, Condition, Criteria, Operand, Operator};
pub use config::Config;
pub use error::{BuildError, Error, EvaluationError, InvalidFilterExpression, ParseError};
pub use metadata::{FieldInfo, Filterable, MetadataCache, RecordMetadata};
pub use selection::filter::{evaluate, filter_records, FieldReader, FilterIterator, FilterResult};
pub use selection::predicate::{Comparison, PredicateBuilder, QueryPredicate};
pub use value::{TypeTag, Value};

#[cfg(feature = "derive")]
pub use criteria_derive::Filterable;

/// Parse filter text. Blank text yields empty criteria.
pub fn parse_filter_expression(text: &str) -> Result<Criteria, InvalidFilterExpression> { parser::parse_criteria(text) }

/// `{field name -> type name}` for every filterable field of `R`.
pub fn describe_filterable_fields<R: Filterable>(cache: &MetadataCache) -> BTreeMap<String, String> { cache.describe::<R>() }

/// Compile criteria into a storage predicate for `R`, scoped to `tenant` when one is given.
pub fn build_query_predicate<R: Filterable>(
    cache: &MetadataCache,
    tenant: Option<&str>,
    criteria: &Criteria,
) -> Result<QueryPredicate, BuildError> {
    PredicateBuilder::new(cache).build::<R>(tenant, criteria)
}

/// Evaluate criteria against one materialized record.
pub fn evaluate_in_memory<R: FieldReader + ?Sized>(record: &R, criteria: &Criteria) -> Result<bool, EvaluationError> {
    selection::filter::evaluate(record, criteria)
}

#[cfg(test)]
#[ctor::ctor]
fn init_tracing() {
    use std::str::FromStr;
    use tracing::Level;

    let level = std::env::var("LOG_LEVEL").ok().and_then(|level| Level::from_str(&level).ok()).unwrap_or(Level::INFO);
    let _ = tracing_subscriber::fmt().with_max_level(level).with_test_writer().try_init();
}
