use actix_web::{http::StatusCode, web, web::ServiceConfig};
use ifg_common::Secret;
use invoice_engine::{helpers::calculate_hmac, FulfillmentApi};
use serde_json::json;

use super::{
    helpers::post_raw,
    mocks::{MockArchive, MockJournal, MockNotifier, MockRenderer},
};
use crate::{
    middleware::{HmacMiddlewareFactory, WEBHOOK_SIGNATURE_HEADER},
    routes::WebhookRoute,
};

const WEBHOOK_SECRET: &str = "whsec_test";

fn captured_event() -> String {
    json!({
        "event": "payment.captured",
        "payload": { "payment": { "entity": {
            "id": "pay_1",
            "order_id": "order_1",
            "amount": 1000,
            "email": "asha@example.com",
        }}}
    })
    .to_string()
}

fn signed(body: &str) -> Vec<(&'static str, String)> {
    vec![(WEBHOOK_SIGNATURE_HEADER, calculate_hmac(WEBHOOK_SECRET, body.as_bytes()))]
}

#[actix_web::test]
async fn signed_capture_event_is_fulfilled_and_acknowledged() {
    let _ = env_logger::try_init().ok();
    let body = captured_event();
    let headers = signed(&body);
    let (status, body) = post_raw("/webhook", body, headers, configure).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, "OK");
}

#[actix_web::test]
async fn wrong_signature_is_rejected_before_the_handler() {
    let _ = env_logger::try_init().ok();
    let body = captured_event();
    let headers = vec![(WEBHOOK_SIGNATURE_HEADER, calculate_hmac("some-other-secret", body.as_bytes()))];
    let (status, _) = post_raw("/webhook", body, headers, configure_untouched).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[actix_web::test]
async fn missing_signature_is_rejected_before_the_handler() {
    let _ = env_logger::try_init().ok();
    let (status, _) = post_raw("/webhook", captured_event(), vec![], configure_untouched).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[actix_web::test]
async fn unsigned_event_is_accepted_when_checks_are_disabled() {
    let _ = env_logger::try_init().ok();
    let (status, body) = post_raw("/webhook", captured_event(), vec![], configure_checks_disabled).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, "OK");
}

#[actix_web::test]
async fn non_capture_events_are_acknowledged_without_fulfillment() {
    let _ = env_logger::try_init().ok();
    let body = json!({ "event": "payment.authorized", "payload": {} }).to_string();
    let headers = signed(&body);
    let (status, body) = post_raw("/webhook", body, headers, configure_untouched).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, "OK");
}

#[actix_web::test]
async fn capture_event_without_ids_is_rejected() {
    let _ = env_logger::try_init().ok();
    let body = json!({ "event": "payment.captured", "payload": { "payment": { "entity": {} } } }).to_string();
    let headers = signed(&body);
    let (status, _) = post_raw("/webhook", body, headers, configure_untouched).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

fn configure(cfg: &mut ServiceConfig) {
    let mut journal = MockJournal::new();
    journal.expect_record_verification().returning(|_| Ok(()));
    journal.expect_lookup().returning(|_| None);
    let mut renderer = MockRenderer::new();
    renderer.expect_render().returning(|_| Ok(b"%PDF-1.4 stub".to_vec()));
    add_services(cfg, journal, renderer, true);
}

// The bare mocks panic if touched; these tests assert the fulfillment flow is never invoked.
fn configure_untouched(cfg: &mut ServiceConfig) {
    add_services(cfg, MockJournal::new(), MockRenderer::new(), true);
}

fn configure_checks_disabled(cfg: &mut ServiceConfig) {
    let mut journal = MockJournal::new();
    journal.expect_record_verification().returning(|_| Ok(()));
    journal.expect_lookup().returning(|_| None);
    let mut renderer = MockRenderer::new();
    renderer.expect_render().returning(|_| Ok(b"%PDF-1.4 stub".to_vec()));
    add_services(cfg, journal, renderer, false);
}

fn add_services(cfg: &mut ServiceConfig, journal: MockJournal, renderer: MockRenderer, checks_enabled: bool) {
    let api = FulfillmentApi::new(
        journal,
        renderer,
        None::<MockArchive>,
        None::<MockNotifier>,
        Secret::new("unused".to_string()),
    );
    let scope = web::scope("/webhook")
        .wrap(HmacMiddlewareFactory::new(
            WEBHOOK_SIGNATURE_HEADER,
            Secret::new(WEBHOOK_SECRET.to_string()),
            checks_enabled,
        ))
        .service(WebhookRoute::<MockJournal, MockRenderer, MockArchive, MockNotifier>::new());
    cfg.service(scope).app_data(web::Data::new(api));
}
