use super::predicate::{Comparison, QueryPredicate};
use crate::value::Value;

pub enum SqlExpr {
    Sql(String),
    Argument(Value),
}

/// Parameterized SQL under construction. Arguments become `$1`, `$2`, ... on [`Sql::collapse`].
#[derive(Default)]
pub struct Sql(Vec<SqlExpr>);

impl Sql {
    pub fn new() -> Self { Self(Vec::new()) }

    pub fn push(&mut self, expr: SqlExpr) { self.0.push(expr); }

    pub fn arg(&mut self, arg: Value) { self.push(SqlExpr::Argument(arg)); }

    pub fn sql(&mut self, s: impl AsRef<str>) { self.push(SqlExpr::Sql(s.as_ref().to_owned())); }

    pub fn collapse(self) -> (String, Vec<Value>) {
        let mut counter = 1;
        let mut sql = String::new();
        let mut args = Vec::new();

        for expr in self.0 {
            match expr {
                SqlExpr::Argument(arg) => {
                    sql += &format!("${}", counter);
                    args.push(arg);
                    counter += 1;
                }
                SqlExpr::Sql(s) => {
                    sql += &s;
                }
            }
        }

        (sql, args)
    }

    /// `user.name` renders as `"user"."name"`.
    pub fn identifier(&mut self, name: &str) {
        let quoted: Vec<String> = name.split('.').map(|part| format!("\"{}\"", part.replace('"', "\"\""))).collect();
        self.sql(quoted.join("."));
    }

    pub fn predicate(&mut self, predicate: &QueryPredicate) {
        match predicate {
            QueryPredicate::True => self.sql("TRUE"),
            QueryPredicate::Compare { field, comparison, value } => {
                self.identifier(field);
                self.sql(format!(" {} ", comparison_to_sql(comparison)));
                self.arg(value.clone());
            }
            QueryPredicate::Contains { field, value, negated } => {
                self.identifier(field);
                self.sql(if *negated { " NOT LIKE " } else { " LIKE " });
                self.arg(Value::String(format!("%{}%", escape_like(value))));
            }
            QueryPredicate::Between { field, min, max } => {
                self.identifier(field);
                self.sql(" BETWEEN ");
                self.arg(min.clone());
                self.sql(" AND ");
                self.arg(max.clone());
            }
            QueryPredicate::IsNull(field) => {
                self.identifier(field);
                self.sql(" IS NULL");
            }
            QueryPredicate::IsNotNull(field) => {
                self.identifier(field);
                self.sql(" IS NOT NULL");
            }
            QueryPredicate::And(left, right) => {
                self.predicate(left);
                self.sql(" AND ");
                self.predicate(right);
            }
            QueryPredicate::Or(left, right) => {
                self.sql("(");
                self.predicate(left);
                self.sql(" OR ");
                self.predicate(right);
                self.sql(")");
            }
        }
    }
}

impl QueryPredicate {
    /// Render as a parameterized SQL `WHERE` body with positional arguments.
    pub fn to_sql(&self) -> (String, Vec<Value>) {
        let mut sql = Sql::new();
        sql.predicate(self);
        sql.collapse()
    }
}

fn comparison_to_sql(comparison: &Comparison) -> &'static str {
    match comparison {
        Comparison::Equal => "=",
        Comparison::NotEqual => "<>",
        Comparison::LessThan => "<",
        Comparison::LessThanOrEqual => "<=",
        Comparison::GreaterThan => ">",
        Comparison::GreaterThanOrEqual => ">=",
    }
}

// Backslash is the default LIKE escape character.
fn escape_like(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        if matches!(c, '\\' | '%' | '_') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}
