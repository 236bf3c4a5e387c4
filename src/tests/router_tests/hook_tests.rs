use crate::config::AppConfig;
use crate::db::categories::list_categories;
use crate::db::settings::save_settings;
use crate::domain::settings::Settings;
use crate::errors::ServerError;
use crate::router::handle;
use crate::tests::utils::{init_test_db, test_state, RecordingTransport};
use astra::Body;
use http::{Method, Request};
use std::io::Read;

fn order_json(new_status: &str) -> String {
    serde_json::json!({
        "order_id": 55,
        "old_status": "pending",
        "new_status": new_status,
        "order": {
            "id": 55,
            "status": new_status,
            "currency": "USD",
            "total": "25.00",
            "line_items": [{"name": "A"}, {"name": "B"}]
        }
    })
    .to_string()
}

fn post(uri: &str, body: String, token: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header("Content-Type", "application/json");
    if let Some(t) = token {
        builder = builder.header("X-Relay-Token", t);
    }
    builder.body(Body::from(body)).unwrap()
}

fn body_string(resp: astra::Response) -> String {
    let mut body = String::new();
    resp.into_body().reader().read_to_string(&mut body).unwrap();
    body
}

#[test]
fn order_hook_dispatches_and_reports_outcome() {
    let db = init_test_db();
    let settings = Settings::from_form(vec![
        ("order_statuses[]", "completed"),
        ("script_url", "https://script.google.com/macros/s/abc/exec"),
    ]);
    db.with_conn(|conn| save_settings(conn, &settings)).unwrap();
    let transport = RecordingTransport::ok();
    let state = test_state(db, transport.clone(), AppConfig::default());

    let resp = handle(post("/hooks/order-status", order_json("wc-completed"), None), &state)
        .expect("Handler failed");

    assert_eq!(resp.status(), 200);
    let outcome: serde_json::Value = serde_json::from_str(&body_string(resp)).unwrap();
    assert_eq!(outcome["outcome"], "sent");
    assert_eq!(outcome["order_id"], 55);

    let sent = transport.single_body();
    assert_eq!(sent["product_name"], "A, B");
    assert_eq!(sent["order_amount_with_currency"], "$25.00");
}

#[test]
fn unconfigured_url_still_answers_ok() {
    let db = init_test_db();
    let transport = RecordingTransport::ok();
    let state = test_state(db, transport.clone(), AppConfig::default());

    let resp = handle(post("/hooks/order-status", order_json("completed"), None), &state).unwrap();

    assert_eq!(resp.status(), 200);
    assert!(body_string(resp).contains("\"unconfigured\""));
    assert_eq!(transport.call_count(), 0);
}

#[test]
fn malformed_event_is_bad_request() {
    let state = test_state(init_test_db(), RecordingTransport::ok(), AppConfig::default());
    let err = handle(post("/hooks/order-status", "{\"order_id\": ".into(), None), &state).unwrap_err();
    assert!(matches!(err, ServerError::BadRequest(_)));
}

#[test]
fn hook_token_is_enforced_when_configured() {
    let config = AppConfig {
        hook_token: Some("s3cret".into()),
        ..AppConfig::default()
    };
    let transport = RecordingTransport::ok();
    let state = test_state(init_test_db(), transport.clone(), config);

    let err = handle(post("/hooks/order-status", order_json("completed"), None), &state).unwrap_err();
    assert!(matches!(err, ServerError::Unauthorized(_)));

    let err = handle(post("/hooks/order-status", order_json("completed"), Some("nope")), &state)
        .unwrap_err();
    assert!(matches!(err, ServerError::Unauthorized(_)));

    let resp = handle(post("/hooks/order-status", order_json("completed"), Some("s3cret")), &state)
        .unwrap();
    assert_eq!(resp.status(), 200);
}

#[test]
fn catalog_sync_replaces_categories() {
    let db = init_test_db();
    let state = test_state(db.clone(), RecordingTransport::ok(), AppConfig::default());
    let body = r#"{"categories": [{"id": 4, "name": "Posters"}], "products": [{"product_id": 9, "category_ids": [4]}]}"#;

    let req = Request::builder()
        .method(Method::PUT)
        .uri("/hooks/catalog")
        .body(Body::from(body))
        .unwrap();
    let resp = handle(req, &state).unwrap();

    assert_eq!(resp.status(), 200);
    let cats = db.with_conn(|conn| list_categories(conn)).unwrap();
    assert_eq!(cats.len(), 1);
    assert_eq!(cats[0].name, "Posters");
}

#[test]
fn unknown_route_is_not_found() {
    let state = test_state(init_test_db(), RecordingTransport::ok(), AppConfig::default());
    let req = Request::builder()
        .method(Method::GET)
        .uri("/wp-admin")
        .body(Body::empty())
        .unwrap();
    assert!(matches!(handle(req, &state), Err(ServerError::NotFound)));
}

#[test]
fn store_shaped_payload_with_nulls_is_still_sent() {
    let db = init_test_db();
    let settings = Settings::from_form(vec![
        ("order_statuses[]", "completed"),
        ("selected_fields[]", "billing_address"),
        ("script_url", "https://script.google.com/macros/s/abc/exec"),
    ]);
    db.with_conn(|conn| save_settings(conn, &settings)).unwrap();
    let transport = RecordingTransport::ok();
    let state = test_state(db, transport.clone(), AppConfig::default());
    let body = r#"{
        "order_id": 7,
        "new_status": "completed",
        "order": {
            "id": 7,
            "total": "25.00",
            "currency": "USD",
            "date_created": "2024-03-09T14:05:07",
            "billing": {"first_name": "Ada", "address_2": null, "city": "London"},
            "line_items": [{"name": "A", "product_id": null}]
        }
    }"#;

    let resp = handle(post("/hooks/order-status", body.to_string(), None), &state).unwrap();

    assert_eq!(resp.status(), 200);
    let sent = transport.single_body();
    assert_eq!(sent["order_date"], "2024-03-09 14:05:07");
    assert_eq!(sent["billing_address"], "London");
    assert_eq!(sent["billing_name"], "Ada");
}
