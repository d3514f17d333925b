use chrono::{Datelike, Duration, Utc};
use esbuilder::datatype::{parse_time, parse_time_value, to_iso8601};
use esbuilder::{Attribute, Attributes};
use serde_json::{json, Map, Value};

#[test]
fn accepted_forms() {
    let cases = [
        ("2024-02-29", "2024-02-29T00:00:00+00:00"),
        ("2024-02-29 13:45", "2024-02-29T13:45:00+00:00"),
        ("2024-02-29 13:45:07", "2024-02-29T13:45:07+00:00"),
        ("2024-02-29T13:45:07.250", "2024-02-29T13:45:07+00:00"),
        ("2024-02-29T13:45:07Z", "2024-02-29T13:45:07+00:00"),
        ("2024-02-29T13:45:07-05:00", "2024-02-29T13:45:07-05:00"),
        ("2024-02-29 13:45:07+08:00", "2024-02-29T13:45:07+08:00"),
        ("Thu, 29 Feb 2024 13:45:07 +0100", "2024-02-29T13:45:07+01:00"),
        ("  2024-02-29  ", "2024-02-29T00:00:00+00:00"),
    ];
    for (input, expected) in cases {
        let parsed = parse_time(input).unwrap_or_else(|e| panic!("{input}: {e}"));
        assert_eq!(to_iso8601(&parsed), expected, "{input}");
    }
}

#[test]
fn rejected_forms() {
    for input in ["", "2024-02-30", "29/02/2024", "soon", "2024-13-01 00:00"] {
        assert!(parse_time(input).is_err(), "{input} should not parse");
    }
}

#[test]
fn keywords_are_relative_to_today() {
    let today = parse_time("today").unwrap();
    assert_eq!(today.date_naive(), Utc::now().date_naive());
    assert_eq!(to_iso8601(&today).get(10..), Some("T00:00:00+00:00"));
    let yesterday = parse_time("Yesterday").unwrap();
    let tomorrow = parse_time("TOMORROW").unwrap();
    assert_eq!(tomorrow - yesterday, Duration::days(2));
    assert!(parse_time("now").unwrap().year() >= 2024);
}

#[test]
fn integers_are_epoch_seconds() {
    assert_eq!(to_iso8601(&parse_time_value(&json!(0)).unwrap()), "1970-01-01T00:00:00+00:00");
    assert_eq!(to_iso8601(&parse_time_value(&json!(86_400)).unwrap()), "1970-01-02T00:00:00+00:00");
    assert!(parse_time_value(&json!(1.5)).is_err());
    assert!(parse_time_value(&json!(null)).is_err());
    assert!(parse_time_value(&json!(["2024-01-01"])).is_err());
}

#[test]
fn attributes_parse_only_declared_dates() {
    let mut source = Map::new();
    source.insert("born".into(), json!("1990-06-15"));
    source.insert("nickname".into(), json!("1990-06-15"));
    source.insert("seen".into(), json!(1_700_000_000));
    source.insert("left".into(), Value::Null);
    let attributes = Attributes::from_source(source, &["born", "seen", "left"]).unwrap();
    assert_eq!(attributes.len(), 4);
    assert!(matches!(attributes.get("born"), Some(Attribute::Time(_))));
    assert_eq!(attributes.string("nickname").as_deref(), Some("1990-06-15"));
    assert_eq!(attributes.integer("seen"), Some(1_700_000_000));
    assert_eq!(attributes.get("left"), Some(&Attribute::Value(Value::Null)));
    assert_eq!(
        attributes.get("born").unwrap().to_string(),
        "1990-06-15T00:00:00+00:00"
    );
}
