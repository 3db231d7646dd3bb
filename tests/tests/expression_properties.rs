mod common;

use anyhow::Result;
use criteria::{
    evaluate_in_memory, parse_filter_expression, Condition, Criteria, EvaluationError, Operand, Operator, ParseError, Value,
};
use std::collections::HashMap;

fn record(pairs: &[(&str, Value)]) -> HashMap<String, Value> { pairs.iter().map(|(k, v)| (k.to_string(), v.clone())).collect() }

fn abc(a: i32, b: i32, c: i32) -> HashMap<String, Value> { record(&[("a", Value::I32(a)), ("b", Value::I32(b)), ("c", Value::I32(c))]) }

#[test]
fn condition_count_matches_atomic_tokens() -> Result<()> {
    let cases = [
        ("a = 1", 1),
        ("a = 1 & b = 2", 2),
        ("a = 1 | (b = 2 & c = 3)", 3),
        ("((a = 1) | (b = 2 & (c = 3 | d = 4))) & e ~ 'x & y'", 5),
        ("name = 'John' & age > 25 | (status = 'active' & role != 'admin')", 4),
    ];
    for (input, expected) in cases {
        let criteria = parse_filter_expression(input)?;
        assert_eq!(criteria.len(), expected, "{input}");
        assert_eq!(criteria.conditions().len(), expected, "{input}");
        assert_eq!(parse_filter_expression(input)?, criteria, "{input}");
    }
    Ok(())
}

#[test]
fn unbalanced_parentheses_fail() {
    for input in ["(a = 1", "a = 1)", "(a = 1 & (b = 2)"] {
        let err = parse_filter_expression(input).unwrap_err();
        assert!(matches!(err.source, ParseError::MalformedExpression(_)), "{input}");
        assert_eq!(err.input, input);
    }
}

#[test]
fn combinators_are_left_associative() -> Result<()> {
    let flat = parse_filter_expression("a=1 & b=2 | c=3")?;
    let grouped = parse_filter_expression("a=1 & (b=2 | c=3)")?;

    // a false, c true: (a AND b) OR c is true, a AND (b OR c) is false
    let record = abc(0, 2, 3);
    assert!(evaluate_in_memory(&record, &flat)?);
    assert!(!evaluate_in_memory(&record, &grouped)?);

    for (a, b, c) in [(1, 2, 3), (1, 0, 0), (0, 2, 0), (1, 2, 0), (1, 0, 3), (0, 0, 0)] {
        let (a_, b_, c_) = (a == 1, b == 2, c == 3);
        let record = abc(a, b, c);
        assert_eq!(evaluate_in_memory(&record, &flat)?, (a_ && b_) || c_);
        assert_eq!(evaluate_in_memory(&record, &grouped)?, a_ && (b_ || c_));
    }
    Ok(())
}

#[test]
fn quotes_are_stripped() -> Result<()> {
    let criteria = parse_filter_expression("name = 'John Doe' & nick = \"J&D\"")?;
    let conditions = criteria.conditions();
    assert_eq!(conditions[0].operand, Operand::from("John Doe"));
    assert_eq!(conditions[1].operand, Operand::from("J&D"));
    Ok(())
}

#[test]
fn like_matches_substrings() -> Result<()> {
    let criteria = parse_filter_expression("device ~ Device")?;
    let matched: Vec<_> = ["Device1", "Device2", "Other"]
        .into_iter()
        .filter(|device| evaluate_in_memory(&record(&[("device", Value::from(*device))]), &criteria).unwrap())
        .collect();
    assert_eq!(matched, vec!["Device1", "Device2"]);
    Ok(())
}

#[test]
fn between_requires_min_and_max() -> Result<()> {
    let mut criteria = Criteria::new();
    criteria.push_condition(Condition::new("n", Operator::Between, "10"));
    assert_eq!(
        evaluate_in_memory(&record(&[("n", Value::I32(15))]), &criteria),
        Err(EvaluationError::InvalidRangeFormat("10".into()))
    );

    let criteria = parse_filter_expression("n <> 10:20")?;
    assert!(evaluate_in_memory(&record(&[("n", Value::I32(15))]), &criteria)?);
    assert!(!evaluate_in_memory(&record(&[("n", Value::I32(25))]), &criteria)?);
    assert!(evaluate_in_memory(&record(&[("n", Value::from("15"))]), &criteria)?);
    Ok(())
}

#[test]
fn missing_record_field_is_reported() -> Result<()> {
    let criteria = parse_filter_expression("a = 1 | ghost = 2")?;
    let err = evaluate_in_memory(&abc(1, 0, 0), &criteria).unwrap_err();
    assert_eq!(err, EvaluationError::FieldAccess { field: "ghost".into() });
    Ok(())
}
