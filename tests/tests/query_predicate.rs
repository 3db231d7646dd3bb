mod common;

use anyhow::Result;
use common::LoginEvent;
use criteria::{
    build_query_predicate, describe_filterable_fields, parse_filter_expression, BuildError, Comparison, Config, MetadataCache,
    PredicateBuilder, QueryPredicate, Value,
};
use std::collections::BTreeMap;

#[test]
fn describes_filterable_fields() {
    let cache = MetadataCache::new();
    let fields = describe_filterable_fields::<LoginEvent>(&cache);

    let expected: BTreeMap<String, String> = [
        ("attempts", "i32"),
        ("device", "String"),
        ("ip", "String"),
        ("latency_ms", "f64"),
        ("success", "bool"),
        ("userId", "String"),
    ]
    .into_iter()
    .map(|(name, ty)| (name.to_string(), ty.to_string()))
    .collect();
    assert_eq!(fields, expected);
    assert_eq!(cache.len(), 1);
    assert_eq!(cache.metadata_for::<LoginEvent>().record_type(), "LoginEvent");
}

#[test]
fn compiles_to_parameterized_sql() -> Result<()> {
    let cache = MetadataCache::new();
    let criteria = parse_filter_expression("userId = 'user_one_updated' & ip = '192.168.1.100'")?;
    let predicate = build_query_predicate::<LoginEvent>(&cache, Some("acme"), &criteria)?;

    let (sql, args) = predicate.to_sql();
    assert_eq!(sql, r#""userId" = $1 AND "ip" = $2 AND "tenant_id" = $3"#);
    assert_eq!(args, vec![Value::from("user_one_updated"), Value::from("192.168.1.100"), Value::from("acme")]);
    Ok(())
}

#[test]
fn grouping_survives_compilation() -> Result<()> {
    let cache = MetadataCache::new();

    let criteria = parse_filter_expression("success = false & attempts > 2 | device ~ Device")?;
    let (sql, args) = build_query_predicate::<LoginEvent>(&cache, None, &criteria)?.to_sql();
    assert_eq!(sql, r#"("success" = $1 AND "attempts" > $2 OR "device" LIKE $3)"#);
    assert_eq!(args, vec![Value::Bool(false), Value::I32(2), Value::from("%Device%")]);

    let criteria = parse_filter_expression("success = false & (attempts > 2 | device ~ Device)")?;
    let (sql, _) = build_query_predicate::<LoginEvent>(&cache, None, &criteria)?.to_sql();
    assert_eq!(sql, r#""success" = $1 AND ("attempts" > $2 OR "device" LIKE $3)"#);
    Ok(())
}

#[test]
fn ranges_nulls_and_fallbacks() -> Result<()> {
    let cache = MetadataCache::new();
    let criteria = parse_filter_expression("latency_ms <> 0.5:250 & latency_ms != null & attempts = lots")?;
    let predicate = build_query_predicate::<LoginEvent>(&cache, None, &criteria)?;

    let (sql, args) = predicate.to_sql();
    assert_eq!(sql, r#""latency_ms" BETWEEN $1 AND $2 AND "latency_ms" IS NOT NULL AND "attempts" = $3"#);
    assert_eq!(args, vec![Value::F64(0.5), Value::F64(250.0), Value::from("lots")]);
    Ok(())
}

#[test]
fn custom_tenant_field() -> Result<()> {
    let cache = MetadataCache::new();
    let config = Config::from_json(r#"{ "tenant_field": "tenantId" }"#)?;
    let predicate = PredicateBuilder::new(&cache).with_config(config).build::<LoginEvent>(Some("globex"), &parse_filter_expression("")?)?;

    assert_eq!(predicate, QueryPredicate::Compare {
        field: "tenantId".into(),
        comparison: Comparison::Equal,
        value: Value::from("globex")
    });
    Ok(())
}

#[test]
fn unknown_field_is_rejected() -> Result<()> {
    let cache = MetadataCache::new();
    let criteria = parse_filter_expression("tenant_id = other | ip = '10.0.0.7'")?;
    let err = build_query_predicate::<LoginEvent>(&cache, Some("acme"), &criteria).unwrap_err();

    assert_eq!(err, BuildError::UnknownFilterField { field: "tenant_id".into(), record_type: "LoginEvent".into() });
    assert!(criteria::Error::from(err).is_client_error());
    Ok(())
}

#[test]
fn predicates_serialize() -> Result<()> {
    let cache = MetadataCache::new();
    let criteria = parse_filter_expression("device ~ Device | attempts <= 1")?;
    let predicate = build_query_predicate::<LoginEvent>(&cache, None, &criteria)?;

    let json = serde_json::to_string(&predicate)?;
    assert_eq!(serde_json::from_str::<QueryPredicate>(&json)?, predicate);

    let json = serde_json::to_string(&criteria)?;
    assert_eq!(serde_json::from_str::<criteria::Criteria>(&json)?, criteria);
    Ok(())
}
