mod common;

use actix_web::http::{header, StatusCode};
use actix_web::{test, App};
use excel_print_server::printer::DispatchResult;
use excel_print_server::report::common::XLSX_MIME;
use excel_print_server::report::ValidationMode;
use excel_print_server::routes;
use serde_json::{json, Value};

use common::TestContext;

macro_rules! init_app {
    ($ctx:expr) => {
        test::init_service(App::new().app_data($ctx.state.clone()).configure(routes)).await
    };
}

#[actix_web::test]
async fn test_print_success() {
    let ctx = TestContext::new();
    let app = init_app!(ctx);

    let req = test::TestRequest::post()
        .uri("/print")
        .set_json(json!({
            "printer": "P2",
            "username": "John Doe",
            "filial": "Tashkent",
            "order_id": 1042,
            "items": [
                {"product": "Flour", "count": 2, "type": "kg"},
                {"name": "Bread", "quantity": "3.5"}
            ]
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["success"], true);
    assert_eq!(body["printer"], "HP LaserJet 1020");
    assert_eq!(body["items_count"], 2);
    assert_eq!(body["total_quantity"], 5.5);
    assert_eq!(body["print_status"], "sent");
    assert_eq!(body["order_id"], "1042");
    assert!(body.get("category").is_none());

    let filename = body["filename"].as_str().unwrap();
    assert!(filename.starts_with("order_") && filename.ends_with(".xlsx"));

    let artifacts = ctx.artifacts();
    assert_eq!(artifacts.len(), 1);
    assert_eq!(body["file_path"], artifacts[0].display().to_string());

    let jobs = ctx.dispatcher.jobs();
    assert_eq!(jobs.len(), 1);
    assert_eq!(jobs[0].printer.key, "p2");
    assert_eq!(jobs[0].path, artifacts[0]);
}

#[actix_web::test]
async fn test_print_uses_default_printer() {
    let ctx = TestContext::new();
    let app = init_app!(ctx);

    let req = test::TestRequest::post()
        .uri("/print")
        .set_json(json!({"items": [{"product": "Milk", "count": 1}]}))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;

    assert_eq!(body["printer"], "Canon LBP6030");
}

#[actix_web::test]
async fn test_print_failure_is_advisory() {
    let ctx = TestContext::with(
        ValidationMode::Lenient,
        DispatchResult::Failed("printer offline".into()),
    );
    let app = init_app!(ctx);

    let req = test::TestRequest::post()
        .uri("/print")
        .set_json(json!({"items": [{"product": "Milk", "count": 1}]}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["success"], true);
    assert_eq!(body["print_status"], "print failed");
}

#[actix_web::test]
async fn test_unknown_printer_is_rejected_without_artifact() {
    let ctx = TestContext::new();
    let app = init_app!(ctx);

    let req = test::TestRequest::post()
        .uri("/print")
        .set_json(json!({"printer": "zz", "items": [{"product": "Milk", "count": 1}]}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let body: Value = test::read_body_json(resp).await;
    assert!(body["error"].as_str().unwrap().contains("zz"));
    assert!(ctx.artifacts().is_empty());
    assert!(ctx.dispatcher.jobs().is_empty());
}

#[actix_web::test]
async fn test_empty_or_missing_items_are_rejected() {
    let ctx = TestContext::new();
    let app = init_app!(ctx);

    for body in [json!({"items": []}), json!({"username": "John"})] {
        let req = test::TestRequest::post()
            .uri("/print")
            .set_json(body)
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }
    assert!(ctx.artifacts().is_empty());
}

#[actix_web::test]
async fn test_missing_label_names_index() {
    let ctx = TestContext::new();
    let app = init_app!(ctx);

    let req = test::TestRequest::post()
        .uri("/excel")
        .set_json(json!({"items": [{"product": "Milk", "count": 1}, {"count": 2}]}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let body: Value = test::read_body_json(resp).await;
    assert!(body["error"].as_str().unwrap().contains("items[1]"));
}

#[actix_web::test]
async fn test_strict_mode_rejects_bad_quantity() {
    let ctx = TestContext::with(ValidationMode::Strict, DispatchResult::Submitted);
    let app = init_app!(ctx);

    let req = test::TestRequest::post()
        .uri("/print")
        .set_json(json!({"items": [{"product": "Milk", "count": "abc"}]}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    assert!(ctx.artifacts().is_empty());
}

#[actix_web::test]
async fn test_lenient_mode_zeroes_bad_quantity() {
    let ctx = TestContext::new();
    let app = init_app!(ctx);

    let req = test::TestRequest::post()
        .uri("/print")
        .set_json(json!({"items": [
            {"product": "Milk", "count": "abc"},
            {"product": "Eggs", "count": 10}
        ]}))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;

    assert_eq!(body["items_count"], 2);
    assert_eq!(body["total_quantity"], 10.0);
}

#[actix_web::test]
async fn test_strict_mode_rejects_blank_quantity() {
    let ctx = TestContext::with(ValidationMode::Strict, DispatchResult::Submitted);
    let app = init_app!(ctx);

    let req = test::TestRequest::post()
        .uri("/print")
        .set_json(json!({"items": [{"product": "Milk", "count": "", "quantity": 4}]}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let body: Value = test::read_body_json(resp).await;
    assert!(body["error"].as_str().unwrap().contains("items[0]"));
    assert!(ctx.artifacts().is_empty());
    assert!(ctx.dispatcher.jobs().is_empty());
}

#[actix_web::test]
async fn test_overflowing_total_is_rejected() {
    let ctx = TestContext::new();
    let app = init_app!(ctx);

    let req = test::TestRequest::post()
        .uri("/print")
        .set_json(json!({"items": [
            {"product": "Milk", "count": 1.7e308},
            {"product": "Eggs", "count": 1.7e308}
        ]}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let body: Value = test::read_body_json(resp).await;
    assert!(body["error"].as_str().is_some());
    assert!(ctx.artifacts().is_empty());
    assert!(ctx.dispatcher.jobs().is_empty());
}

#[actix_web::test]
async fn test_oversized_label_is_rejected() {
    let ctx = TestContext::new();
    let app = init_app!(ctx);

    let req = test::TestRequest::post()
        .uri("/excel")
        .set_json(json!({"items": [{"product": "x".repeat(40_000), "count": 1}]}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let body: Value = test::read_body_json(resp).await;
    assert!(body["error"].as_str().unwrap().contains("32767"));
    assert!(ctx.artifacts().is_empty());
}

#[actix_web::test]
async fn test_generation_failure_returns_500_and_notifies() {
    let ctx = TestContext::unwritable();
    let app = init_app!(ctx);

    let req = test::TestRequest::post()
        .uri("/print")
        .set_json(json!({
            "username": "John Doe",
            "filial": "Tashkent",
            "items": [{"product": "Milk", "count": 1}]
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);

    let body: Value = test::read_body_json(resp).await;
    assert!(body["error"].as_str().is_some());
    assert!(body["timestamp"].as_str().is_some());
    assert_eq!(body.as_object().unwrap().len(), 2);

    assert!(ctx.artifacts().is_empty());
    assert!(!ctx.state.config.scratch_dir.exists());
    assert!(ctx.dispatcher.jobs().is_empty());

    let messages = ctx.notifier.wait_for(1).await;
    assert_eq!(messages.len(), 1);
    assert!(messages[0].contains("/print"));
    assert!(messages[0].contains("John Doe"));
}

#[actix_web::test]
async fn test_successful_request_sends_no_notification() {
    let ctx = TestContext::new();
    let app = init_app!(ctx);

    let req = test::TestRequest::get().uri("/test").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert!(ctx.notifier.messages().is_empty());
}

#[actix_web::test]
async fn test_non_json_body_is_rejected() {
    let ctx = TestContext::new();
    let app = init_app!(ctx);

    let req = test::TestRequest::post()
        .uri("/print")
        .insert_header((header::CONTENT_TYPE, "application/json"))
        .set_payload("not json")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let body: Value = test::read_body_json(resp).await;
    assert!(body["error"].is_string());
    assert!(body["timestamp"].is_string());

    let req = test::TestRequest::post()
        .uri("/print")
        .insert_header((header::CONTENT_TYPE, "text/plain"))
        .set_payload(r#"{"items": []}"#)
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[actix_web::test]
async fn test_excel_download() {
    let ctx = TestContext::new();
    let app = init_app!(ctx);

    let req = test::TestRequest::post()
        .uri("/excel")
        .set_json(json!({"printer": "ignored", "items": [{"product": "Milk", "count": 1}]}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let content_type = resp.headers().get(header::CONTENT_TYPE).unwrap();
    assert_eq!(content_type.to_str().unwrap(), XLSX_MIME);
    let disposition = resp
        .headers()
        .get(header::CONTENT_DISPOSITION)
        .unwrap()
        .to_str()
        .unwrap()
        .to_string();
    assert!(disposition.starts_with("attachment"));
    assert!(disposition.contains("order_"));

    let bytes = test::read_body(resp).await;
    assert!(bytes.starts_with(b"PK"));
    assert!(ctx.dispatcher.jobs().is_empty());
}

#[actix_web::test]
async fn test_sample_download() {
    let ctx = TestContext::new();
    let app = init_app!(ctx);

    let req = test::TestRequest::get().uri("/test").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert!(resp.headers().contains_key(header::CONTENT_DISPOSITION));
    assert_eq!(ctx.artifacts().len(), 1);
}

#[actix_web::test]
async fn test_service_info() {
    let ctx = TestContext::new();
    let app = init_app!(ctx);

    let req = test::TestRequest::get().uri("/").to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;

    assert_eq!(body["status"], "running");
    assert_eq!(body["printers"]["p1"], "Canon LBP6030");
    assert!(body["endpoints"]["POST /print"].is_string());
    assert_eq!(body["example"]["body"]["printer"], "p1");
}

#[actix_web::test]
async fn test_agent_echo() {
    let ctx = TestContext::new();
    let app = init_app!(ctx);

    let req = test::TestRequest::post()
        .uri("/agent")
        .set_payload(r#"{"hello": "world"}"#)
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body, json!({"status": "success", "received": {"hello": "world"}}));

    let req = test::TestRequest::post()
        .uri("/agent")
        .set_payload("plain text")
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body, json!({"success": true, "raw_received": "plain text"}));
}

#[actix_web::test]
async fn test_print_echo() {
    let ctx = TestContext::new();
    let app = init_app!(ctx);

    let cases: [(&[u8], &str); 3] = [
        (br#"{"a": 1}"#, "json"),
        (b"hello", "text"),
        (&[0xff, 0x00, 0xfe], "bytes"),
    ];
    for (payload, expected) in cases {
        let req = test::TestRequest::post()
            .uri("/debug/print?copies=2")
            .set_payload(payload.to_vec())
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body, json!({"ok": true, "body_type": expected}));
    }
}
