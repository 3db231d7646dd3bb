use serde::{Deserialize, Serialize};
use std::fmt;

/// How a clause composes with everything accumulated before it at the same nesting level.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Combinator {
    And, // &
    #[default]
    Or, // |
}

impl Combinator {
    pub fn from_token(token: &str) -> Option<Self> {
        match token {
            "&" => Some(Combinator::And),
            "|" => Some(Combinator::Or),
            _ => None,
        }
    }

    pub fn symbol(&self) -> &'static str {
        match self {
            Combinator::And => "&",
            Combinator::Or => "|",
        }
    }

    /// Fold `right` into `left`.
    pub fn apply(&self, left: bool, right: bool) -> bool {
        match self {
            Combinator::And => left && right,
            Combinator::Or => left || right,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Operator {
    Equal,              // =
    NotEqual,           // !=
    LessThan,           // <
    LessThanOrEqual,    // <=
    GreaterThan,        // >
    GreaterThanOrEqual, // >=
    Like,               // ~
    NotLike,            // !~
    Between,            // <>
}

impl Operator {
    /// Every spelling accepted by the textual parser.
    pub const SPELLINGS: [&'static str; 9] = ["=", "!=", "~", "!~", "<", "<=", ">", ">=", "<>"];

    pub fn from_symbol(symbol: &str) -> Option<Self> {
        Some(match symbol {
            "=" => Operator::Equal,
            "!=" => Operator::NotEqual,
            "~" => Operator::Like,
            "!~" => Operator::NotLike,
            "<" => Operator::LessThan,
            "<=" => Operator::LessThanOrEqual,
            ">" => Operator::GreaterThan,
            ">=" => Operator::GreaterThanOrEqual,
            "<>" => Operator::Between,
            _ => return None,
        })
    }

    pub fn symbol(&self) -> &'static str {
        match self {
            Operator::Equal => "=",
            Operator::NotEqual => "!=",
            Operator::LessThan => "<",
            Operator::LessThanOrEqual => "<=",
            Operator::GreaterThan => ">",
            Operator::GreaterThanOrEqual => ">=",
            Operator::Like => "~",
            Operator::NotLike => "!~",
            Operator::Between => "<>",
        }
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(self.symbol()) }
}

/// The right-hand side of a condition, exactly as written (minus one layer of quotes).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Operand {
    Text(String),
    /// Unquoted `null`. A quoted `'null'` is ordinary text.
    Null,
}

impl Operand {
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Operand::Text(s) => Some(s),
            Operand::Null => None,
        }
    }

    pub fn is_null(&self) -> bool { matches!(self, Operand::Null) }
}

impl From<&str> for Operand {
    fn from(value: &str) -> Self { Operand::Text(value.to_string()) }
}

impl From<String> for Operand {
    fn from(value: String) -> Self { Operand::Text(value) }
}

/// Renders as filter syntax. The language has no escapes, so text holding both quote kinds is
/// written bare; that only reads back when it has no whitespace, `&`, `|` or parentheses.
impl fmt::Display for Operand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operand::Text(s) if s.contains('\'') && s.contains('"') => f.write_str(s),
            Operand::Text(s) if s.contains('\'') => write!(f, "\"{}\"", s),
            Operand::Text(s) => write!(f, "'{}'", s),
            Operand::Null => f.write_str("null"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Condition {
    pub field: String,
    pub operator: Operator,
    pub operand: Operand,
    /// Ignored on the first clause of a level; there is nothing before it to combine with.
    pub combinator: Combinator,
}

impl Condition {
    pub fn new(field: impl Into<String>, operator: Operator, operand: impl Into<Operand>) -> Self {
        Self { field: field.into(), operator, operand: operand.into(), combinator: Combinator::default() }
    }

    pub fn with_combinator(mut self, combinator: Combinator) -> Self {
        self.combinator = combinator;
        self
    }
}

impl fmt::Display for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { write!(f, "{} {} {}", self.field, self.operator, self.operand) }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Clause {
    Condition(Condition),
    Group { combinator: Combinator, criteria: Criteria },
}

impl Clause {
    pub fn combinator(&self) -> Combinator {
        match self {
            Clause::Condition(condition) => condition.combinator,
            Clause::Group { combinator, .. } => *combinator,
        }
    }
}

/// A parsed filter expression: clauses folded left to right, with parenthesized groups kept as nested levels.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Criteria {
    pub clauses: Vec<Clause>,
}

impl Criteria {
    pub fn new() -> Self { Self::default() }

    pub fn push(&mut self, clause: Clause) { self.clauses.push(clause); }

    pub fn push_condition(&mut self, condition: Condition) { self.clauses.push(Clause::Condition(condition)); }

    pub fn push_group(&mut self, combinator: Combinator, criteria: Criteria) {
        self.clauses.push(Clause::Group { combinator, criteria });
    }

    /// No clauses at all; callers should skip filtering.
    pub fn is_empty(&self) -> bool { self.clauses.is_empty() }

    /// Number of atomic conditions, including those nested inside groups.
    pub fn len(&self) -> usize {
        self.clauses
            .iter()
            .map(|clause| match clause {
                Clause::Condition(_) => 1,
                Clause::Group { criteria, .. } => criteria.len(),
            })
            .sum()
    }

    /// Flattened view of every condition in textual order. The first condition of each group
    /// carries the combinator that preceded the group.
    pub fn conditions(&self) -> Vec<Condition> {
        let mut out = Vec::with_capacity(self.len());
        self.collect_conditions(&mut out);
        out
    }

    fn collect_conditions(&self, out: &mut Vec<Condition>) {
        for clause in &self.clauses {
            match clause {
                Clause::Condition(condition) => out.push(condition.clone()),
                Clause::Group { combinator, criteria } => {
                    let first = out.len();
                    criteria.collect_conditions(out);
                    if let Some(condition) = out.get_mut(first) {
                        condition.combinator = *combinator;
                    }
                }
            }
        }
    }

    /// Every field name referenced anywhere in the expression, in order of first appearance.
    pub fn fields(&self) -> Vec<String> {
        let mut fields: Vec<String> = Vec::new();
        for condition in self.conditions() {
            if !fields.contains(&condition.field) {
                fields.push(condition.field);
            }
        }
        fields
    }
}

impl fmt::Display for Criteria {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, clause) in self.clauses.iter().enumerate() {
            if i > 0 {
                write!(f, " {} ", clause.combinator().symbol())?;
            }
            match clause {
                Clause::Condition(condition) => write!(f, "{}", condition)?,
                Clause::Group { criteria, .. } => write!(f, "({})", criteria)?,
            }
        }
        Ok(())
    }
}

impl<'a> IntoIterator for &'a Criteria {
    type Item = &'a Clause;
    type IntoIter = std::slice::Iter<'a, Clause>;

    fn into_iter(self) -> Self::IntoIter { self.clauses.iter() }
}
