mod common;

use common::{Comment, FakeClient, Post, User};
use esbuilder::{Builder, Clause, Settings};
use serde_json::json;

fn pins_deleted_at(clauses: &[Clause], sentinel: &str) -> bool {
    let sentinel = json!(sentinel);
    clauses.iter().any(|clause| {
        matches!(
            clause,
            Clause::Term { field, value } if field == "deleted_at" && *value == sentinel
        )
    })
}

#[test]
fn visible_records_only_by_default() {
    let client = FakeClient::empty();
    let settings = Settings::default();
    let request = Builder::<Post>::new(&client, &settings)
        .equals("author", 7)
        .compile();
    assert_eq!(
        request.to_json()["body"]["query"]["bool"]["must"],
        json!([
            { "term": { "author": 7 } },
            { "term": { "deleted_at": "1970-01-01T00:00:00+08:00" } }
        ])
    );
}

#[test]
fn opting_in_removes_the_pin_entirely() {
    let client = FakeClient::empty();
    let settings = Settings::default();
    let request = Builder::<Post>::new(&client, &settings)
        .equals("author", 7)
        .include_soft_deleted()
        .compile();
    assert_eq!(request.must(), &[Clause::Term { field: "author".into(), value: json!(7) }]);
    assert!(request.must_not().is_empty());
}

#[test]
fn opting_in_also_drops_explicit_marker_filters() {
    let client = FakeClient::empty();
    let settings = Settings::default();
    let request = Builder::<Post>::new(&client, &settings)
        .equals("deleted_at", "2024-01-01T00:00:00+00:00")
        .include_soft_deleted()
        .compile();
    assert!(request.must().is_empty());
}

#[test]
fn explicit_marker_filter_is_overridden_in_place() {
    let client = FakeClient::empty();
    let settings = Settings::default();
    let request = Builder::<Post>::new(&client, &settings)
        .equals("deleted_at", "2024-01-01T00:00:00+00:00")
        .equals("author", 7)
        .compile();
    assert_eq!(
        request.to_json()["body"]["query"]["bool"]["must"],
        json!([
            { "term": { "deleted_at": "1970-01-01T00:00:00+08:00" } },
            { "term": { "author": 7 } }
        ])
    );
}

#[test]
fn models_may_bring_their_own_sentinel() {
    let client = FakeClient::empty();
    let settings = Settings::default();
    let request = Builder::<Comment>::new(&client, &settings).compile();
    assert!(pins_deleted_at(request.must(), "0001-01-01T00:00:00+00:00"));
}

#[test]
fn configured_sentinel_applies_otherwise() {
    let client = FakeClient::empty();
    let settings = Settings {
        nullable_date: "1900-01-01T00:00:00+00:00".into(),
        ..Settings::default()
    };
    let request = Builder::<Post>::new(&client, &settings).compile();
    assert!(pins_deleted_at(request.must(), "1900-01-01T00:00:00+00:00"));
}

#[test]
fn models_without_soft_deletes_are_untouched() {
    let client = FakeClient::empty();
    let settings = Settings::default();
    let request = Builder::<User>::new(&client, &settings).compile();
    assert!(request.must().is_empty());
    let opted_in = Builder::<User>::new(&client, &settings)
        .include_soft_deleted()
        .compile();
    assert_eq!(request, opted_in);
}

#[test]
fn soft_deleting_models_parse_the_marker_by_default() {
    use esbuilder::Model;
    assert_eq!(Comment::DATES, &["created_at", "updated_at", "deleted_at"]);
    assert_eq!(User::DATES, &["created_at", "updated_at"]);
    assert_eq!(<Comment as Model>::index(), "comments");
    assert_eq!(<Post as Model>::index(), "blog_posts");
}
