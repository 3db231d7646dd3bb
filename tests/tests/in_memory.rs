mod common;

use anyhow::Result;
use common::{login_events, LoginEvent};
use criteria::{evaluate_in_memory, filter_records, parse_filter_expression, EvaluationError, FieldReader, Value};

fn matching(input: &str) -> Result<Vec<LoginEvent>> {
    let criteria = parse_filter_expression(input)?;
    Ok(filter_records(login_events(), &criteria)?)
}

fn user_ids(events: &[LoginEvent]) -> Vec<&str> { events.iter().map(|e| e.user_id.as_str()).collect() }

#[test]
fn filter_by_criteria() -> Result<()> {
    let events = matching("userId = 'user_one_updated' & ip = '192.168.1.100'")?;
    assert_eq!(events.len(), 1);
    assert_eq!(events[0], login_events()[1]);
    Ok(())
}

#[test]
fn device_contains() -> Result<()> {
    let events = matching("device ~ Device & userId != user_two")?;
    assert_eq!(events.iter().map(|e| e.device.as_str()).collect::<Vec<_>>(), vec!["Device1", "Device2"]);
    Ok(())
}

#[test]
fn combinators_fold_left_to_right() -> Result<()> {
    // (user_two AND success) OR ip = 10.0.0.7
    let events = matching("userId = user_two & success = true | ip = '10.0.0.7'")?;
    assert_eq!(user_ids(&events), vec!["user_one_updated"]);

    // user_two AND (success OR ip = 10.0.0.7)
    let events = matching("userId = user_two & (success = true | ip = '10.0.0.7')")?;
    assert!(events.is_empty());

    let events = matching("WHERE (attempts >= 3 & success = false) | (userId = user_one & device ~ '1')")?;
    assert_eq!(user_ids(&events), vec!["user_one", "user_two"]);
    Ok(())
}

#[test]
fn numeric_and_optional_fields() -> Result<()> {
    assert_eq!(user_ids(&matching("attempts <> 2:5")?), vec!["user_one_updated"]);
    assert_eq!(user_ids(&matching("latency_ms > 500")?), vec!["user_two"]);
    assert_eq!(matching("latency_ms = null")?.len(), 2);
    assert_eq!(matching("latency_ms != null & latency_ms < 200")?.len(), 1);
    Ok(())
}

#[test]
fn blank_criteria_keep_everything() -> Result<()> {
    assert_eq!(matching("")?, login_events());
    assert_eq!(matching("   ")?, login_events());
    Ok(())
}

#[test]
fn unexposed_field_is_a_field_access_error() -> Result<()> {
    let criteria = parse_filter_expression("tenant_id = acme")?;
    let event = &login_events()[0];
    assert_eq!(event.field("tenant_id"), None);
    assert_eq!(event.field("userId"), Some(Value::from("user_one")));

    let err = evaluate_in_memory(event, &criteria).unwrap_err();
    assert_eq!(err, EvaluationError::FieldAccess { field: "tenant_id".into() });
    assert!(!criteria::Error::from(err).is_client_error());
    Ok(())
}

#[test]
fn opaque_json_documents() -> Result<()> {
    let documents: Vec<serde_json::Value> = login_events().into_iter().map(serde_json::to_value).collect::<Result<_, _>>()?;
    let criteria = parse_filter_expression("user_id = 'user_one_updated' & ip = '192.168.1.100'")?;

    let matched = filter_records(documents.iter(), &criteria)?;
    assert_eq!(matched.len(), 1);
    assert_eq!(matched[0]["device"], "Device2");
    Ok(())
}
