use actix_web::{http::StatusCode, web, web::ServiceConfig};
use ifg_common::Secret;
use invoice_engine::{
    helpers::calculate_hmac,
    journal_types::ArchiveReference,
    traits::{RenderError, SinkError},
    FulfillmentApi,
};
use serde_json::json;

use super::{
    helpers::post_json,
    mocks::{MockArchive, MockJournal, MockNotifier, MockRenderer},
};
use crate::routes::VerifyRoute;

const SECRET: &str = "rzp_test_secret";

fn signature_for(order_id: &str, payment_id: &str) -> String {
    calculate_hmac(SECRET, format!("{order_id}|{payment_id}").as_bytes())
}

#[actix_web::test]
async fn valid_claim_fulfills_and_reports_the_fanout() {
    let _ = env_logger::try_init().ok();
    let body = json!({
        "orderId": "order_abc",
        "paymentId": "pay_xyz",
        "signature": signature_for("order_abc", "pay_xyz"),
        "amount": 50_000,
    });
    let (status, body) = post_json("/verify", &body, configure).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        r#"{"ok":true,"orderId":"order_abc","paymentId":"pay_xyz","amount":50000,"archive":{"location":"https://github.com/acme/invoices/blob/main/invoices/order_abc/pay_xyz.pdf","revision":"abc123"},"emailAttempted":false,"emailSent":false}"#
    );
}

#[actix_web::test]
async fn tampered_signature_is_rejected() {
    let _ = env_logger::try_init().ok();
    let body = json!({
        "orderId": "order_abc",
        "paymentId": "pay_xyz",
        "signature": signature_for("order_abc", "pay_other"),
    });
    let (status, body) = post_json("/verify", &body, configure).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body.contains("Invalid signature"), "unexpected body: {body}");
    assert!(body.contains(r#""ok":false"#), "unexpected body: {body}");
}

#[actix_web::test]
async fn missing_fields_are_reported_by_name() {
    let _ = env_logger::try_init().ok();
    let (status, body) = post_json("/verify", &json!({}), configure).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body.contains("Missing required fields: orderId, paymentId, signature"), "unexpected body: {body}");
}

#[actix_web::test]
async fn sink_failures_never_fail_a_verified_payment() {
    let _ = env_logger::try_init().ok();
    let body = json!({
        "orderId": "order_abc",
        "paymentId": "pay_xyz",
        "signature": signature_for("order_abc", "pay_xyz"),
        "customer": { "email": "asha@example.com" },
    });
    let (status, body) = post_json("/verify", &body, configure_failing_sinks).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains(r#""ok":true"#), "unexpected body: {body}");
    assert!(!body.contains("archive"), "unexpected body: {body}");
    assert!(body.contains(r#""emailAttempted":true"#), "unexpected body: {body}");
    assert!(body.contains(r#""emailSent":false"#), "unexpected body: {body}");
}

#[actix_web::test]
async fn render_failure_is_a_server_error() {
    let _ = env_logger::try_init().ok();
    let body = json!({
        "orderId": "order_abc",
        "paymentId": "pay_xyz",
        "signature": signature_for("order_abc", "pay_xyz"),
    });
    let (status, body) = post_json("/verify", &body, configure_render_failure).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(body.contains("Could not render the invoice"), "unexpected body: {body}");
}

fn configure(cfg: &mut ServiceConfig) {
    let mut journal = MockJournal::new();
    journal.expect_record_verification().returning(|_| Ok(()));
    journal.expect_lookup().returning(|_| None);
    let mut renderer = MockRenderer::new();
    renderer.expect_render().returning(|_| Ok(b"%PDF-1.4 stub".to_vec()));
    let mut archive = MockArchive::new();
    archive.expect_store_invoice().returning(|facts, payment_id, _| {
        Ok(ArchiveReference {
            location: format!(
                "https://github.com/acme/invoices/blob/main/invoices/{}/{payment_id}.pdf",
                facts.order_id
            ),
            revision: Some("abc123".to_string()),
        })
    });
    let api = FulfillmentApi::new(journal, renderer, Some(archive), None::<MockNotifier>, Secret::new(SECRET.into()));
    cfg.service(VerifyRoute::<MockJournal, MockRenderer, MockArchive, MockNotifier>::new())
        .app_data(web::Data::new(api));
}

fn configure_failing_sinks(cfg: &mut ServiceConfig) {
    let mut journal = MockJournal::new();
    journal.expect_record_verification().returning(|_| Ok(()));
    journal.expect_lookup().returning(|_| None);
    let mut renderer = MockRenderer::new();
    renderer.expect_render().returning(|_| Ok(b"%PDF-1.4 stub".to_vec()));
    let mut archive = MockArchive::new();
    archive
        .expect_store_invoice()
        .returning(|_, _, _| Err(SinkError::Remote { status: 502, message: "bad gateway".to_string() }));
    let mut notifier = MockNotifier::new();
    notifier.expect_send_invoice().returning(|_, _, _| Err(SinkError::Transport("connection reset".to_string())));
    let api = FulfillmentApi::new(journal, renderer, Some(archive), Some(notifier), Secret::new(SECRET.into()));
    cfg.service(VerifyRoute::<MockJournal, MockRenderer, MockArchive, MockNotifier>::new())
        .app_data(web::Data::new(api));
}

fn configure_render_failure(cfg: &mut ServiceConfig) {
    let mut journal = MockJournal::new();
    journal.expect_record_verification().returning(|_| Ok(()));
    journal.expect_lookup().returning(|_| None);
    let mut renderer = MockRenderer::new();
    renderer.expect_render().returning(|_| Err(RenderError("font table went missing".to_string())));
    let api = FulfillmentApi::new(
        journal,
        renderer,
        None::<MockArchive>,
        None::<MockNotifier>,
        Secret::new(SECRET.into()),
    );
    cfg.service(VerifyRoute::<MockJournal, MockRenderer, MockArchive, MockNotifier>::new())
        .app_data(web::Data::new(api));
}
