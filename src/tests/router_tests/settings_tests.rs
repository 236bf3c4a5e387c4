use crate::config::AppConfig;
use crate::db::settings::load_settings;
use crate::errors::ServerError;
use crate::router::handle;
use crate::tests::utils::{init_test_db, test_state, RecordingTransport};
use astra::Body;
use http::{Method, Request};
use scraper::{Html, Selector};
use std::io::Read;

fn get(uri: &str) -> Request<Body> {
    Request::builder()
        .method(Method::GET)
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

fn post_form(uri: &str, form: &str) -> Request<Body> {
    Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header("Content-Type", "application/x-www-form-urlencoded")
        .body(Body::from(form.to_string()))
        .unwrap()
}

fn read_body(resp: astra::Response) -> String {
    let mut body = String::new();
    resp.into_body().reader().read_to_string(&mut body).unwrap();
    body
}

#[test]
fn root_redirects_to_settings() {
    let state = test_state(init_test_db(), RecordingTransport::ok(), AppConfig::default());
    let resp = handle(get("/"), &state).unwrap();
    assert_eq!(resp.status(), 303);
    assert_eq!(
        resp.headers().get("Location").unwrap().to_str().unwrap(),
        "/settings"
    );
}

#[test]
fn settings_page_renders_defaults() {
    let state = test_state(init_test_db(), RecordingTransport::ok(), AppConfig::default());

    let resp = handle(get("/settings"), &state).expect("Handler failed");
    assert_eq!(resp.status(), 200);
    let body = read_body(resp);
    let doc = Html::parse_document(&body);

    let checked = Selector::parse("input[name='order_statuses[]'][checked]").unwrap();
    let mut statuses: Vec<&str> = doc
        .select(&checked)
        .filter_map(|el| el.value().attr("value"))
        .collect();
    statuses.sort_unstable();
    assert_eq!(statuses, vec!["completed", "processing"]);

    let locked = Selector::parse("input[name='selected_fields[]'][disabled]").unwrap();
    let locked: Vec<&str> = doc
        .select(&locked)
        .filter_map(|el| el.value().attr("value"))
        .collect();
    assert_eq!(
        locked,
        vec![
            "order_id",
            "billing_name",
            "product_name",
            "order_amount_with_currency",
            "order_status",
            "order_date"
        ]
    );

    assert!(body.contains("No product categories found."));
    assert!(body.contains("All categories (no filter)"));
    assert!(body.contains("Selected Fields (11):"));
    assert!(body.contains("No orders sent yet."));
}

#[test]
fn saving_settings_persists_and_redirects() {
    let db = init_test_db();
    let state = test_state(db.clone(), RecordingTransport::ok(), AppConfig::default());
    let form = "order_statuses%5B%5D=on-hold\
        &selected_fields%5B%5D=billing_email\
        &script_url=https%3A%2F%2Fscript.google.com%2Fmacros%2Fs%2Fxyz%2Fexec";

    let resp = handle(post_form("/settings", form), &state).unwrap();
    assert_eq!(resp.status(), 303);

    let saved = db.with_conn(|conn| load_settings(conn)).unwrap();
    assert_eq!(saved.trigger_statuses.len(), 1);
    assert!(saved.trigger_statuses.contains("on-hold"));
    assert_eq!(saved.script_url, "https://script.google.com/macros/s/xyz/exec");
    assert!(saved.category_filter.is_empty());

    let page = read_body(handle(get("/settings"), &state).unwrap());
    assert!(page.contains("On-hold"));
    assert!(page.contains("Selected Fields (7):"));
}

#[test]
fn script_fragment_uses_posted_fields() {
    let state = test_state(init_test_db(), RecordingTransport::ok(), AppConfig::default());

    let resp = handle(
        post_form("/settings/script", "selected_fields%5B%5D=billing_phone"),
        &state,
    )
    .unwrap();
    assert_eq!(resp.status(), 200);
    let body = read_body(resp);

    assert!(body.contains("id=\"generated-script\""));
    assert!(body.contains("Phone"));
    assert!(body.contains("Order ID"));
    assert!(!body.contains("Email Address"));
    assert!(!body.contains("__HEADERS__"));
}

#[test]
fn admin_token_guards_settings() {
    let config = AppConfig {
        admin_token: Some("letmein".into()),
        ..AppConfig::default()
    };
    let state = test_state(init_test_db(), RecordingTransport::ok(), config);

    assert!(matches!(
        handle(get("/settings"), &state),
        Err(ServerError::Unauthorized(_))
    ));

    let with_cookie = Request::builder()
        .method(Method::GET)
        .uri("/settings")
        .header("Cookie", "admin_token=letmein")
        .body(Body::empty())
        .unwrap();
    assert_eq!(handle(with_cookie, &state).unwrap().status(), 200);
}

#[test]
fn stylesheet_is_served() {
    let state = test_state(init_test_db(), RecordingTransport::ok(), AppConfig::default());
    let resp = handle(get("/static/admin.css"), &state).unwrap();
    assert_eq!(resp.status(), 200);
    assert_eq!(
        resp.headers().get("Content-Type").unwrap().to_str().unwrap(),
        "text/css; charset=utf-8"
    );
}

#[test]
fn empty_selection_from_the_page_means_mandatory_fields_only() {
    let db = init_test_db();
    let state = test_state(db, RecordingTransport::ok(), AppConfig::default());

    // Seeded selection holds every field; the page sent none of the optional ones.
    let body = read_body(
        handle(post_form("/settings/script", "fields_submitted=1"), &state).unwrap(),
    );

    assert!(body.contains("Order ID"));
    assert!(!body.contains("Email Address"));
    assert!(!body.contains("Product Categories"));

    // Without the marker the stored selection is used.
    let stored = read_body(handle(post_form("/settings/script", ""), &state).unwrap());
    assert!(stored.contains("Email Address"));
}

#[test]
fn generate_button_includes_the_submission_marker() {
    let state = test_state(init_test_db(), RecordingTransport::ok(), AppConfig::default());
    let body = read_body(handle(get("/settings"), &state).unwrap());
    let doc = Html::parse_document(&body);

    let marker = Selector::parse("input[type='hidden'][name='fields_submitted']").unwrap();
    assert_eq!(doc.select(&marker).count(), 1);
    let button = Selector::parse("#generate-script").unwrap();
    let include = doc
        .select(&button)
        .next()
        .and_then(|el| el.value().attr("hx-include"))
        .unwrap();
    assert!(include.contains("fields_submitted"));
}
