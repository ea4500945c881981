use actix_web::{http::StatusCode, test, web, App};
use occupancy_postprocess::config::AppConfig;
use occupancy_postprocess::{handlers, ResultEnvelope, RoundingMode};
use serde_json::{json, Value};

fn app_config(rounding: RoundingMode) -> web::Data<AppConfig> {
    let mut config = AppConfig::default();
    config.postprocess.rounding = rounding;
    web::Data::new(config)
}

#[actix_web::test]
async fn test_postprocess_returns_envelope() {
    let app = test::init_service(
        App::new()
            .app_data(app_config(RoundingMode::HalfToEven))
            .configure(handlers::configure),
    )
    .await;

    let req = test::TestRequest::post()
        .uri("/postprocess")
        .set_payload(r#"{"outputs":[{"Double":{"data":[2.4, 3.6, 5.0, 0.5]}}]}"#)
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;

    assert_eq!(
        body,
        json!({
            "original": {"outputs": [{"Double": {"data": [2.4, 3.6, 5.0, 0.5]}}]},
            "prediction": [2, 4, 5, 0]
        })
    );
}

#[actix_web::test]
async fn test_postprocess_uses_configured_rounding() {
    let app = test::init_service(
        App::new()
            .app_data(app_config(RoundingMode::HalfAwayFromZero))
            .configure(handlers::configure),
    )
    .await;

    let req = test::TestRequest::post()
        .uri("/postprocess")
        .set_payload(r#"{"outputs":[{"Double":{"data":[0.5, 1.5]}}]}"#)
        .to_request();
    let body: ResultEnvelope = test::call_and_read_body_json(&app, req).await;

    assert_eq!(body.prediction, vec![1, 2]);
    assert_eq!(body.original, json!({"outputs": [{"Double": {"data": [0.5, 1.5]}}]}));
}

#[actix_web::test]
async fn test_invalid_json_is_bad_request() {
    let app = test::init_service(
        App::new()
            .app_data(app_config(RoundingMode::HalfToEven))
            .configure(handlers::configure),
    )
    .await;

    let req = test::TestRequest::post()
        .uri("/postprocess")
        .set_payload("{not json")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "parse_error");
}

#[actix_web::test]
async fn test_missing_outputs_is_unprocessable() {
    let app = test::init_service(
        App::new()
            .app_data(app_config(RoundingMode::HalfToEven))
            .configure(handlers::configure),
    )
    .await;

    let req = test::TestRequest::post()
        .uri("/postprocess")
        .set_payload(r#"{"inputs":[]}"#)
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "schema_error");
}

#[actix_web::test]
async fn test_non_numeric_element_is_unprocessable() {
    let app = test::init_service(
        App::new()
            .app_data(app_config(RoundingMode::HalfToEven))
            .configure(handlers::configure),
    )
    .await;

    let req = test::TestRequest::post()
        .uri("/postprocess")
        .set_payload(r#"{"outputs":[{"Double":{"data":[1.0, null]}}]}"#)
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "type_conversion_error");
}

#[actix_web::test]
async fn test_non_utf8_body_is_bad_request() {
    let app = test::init_service(
        App::new()
            .app_data(app_config(RoundingMode::HalfToEven))
            .configure(handlers::configure),
    )
    .await;

    let req = test::TestRequest::post()
        .uri("/postprocess")
        .set_payload(vec![0xff_u8, 0xfe])
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "parse_error");
    assert!(body["message"].is_string());
}

#[actix_web::test]
async fn test_literal_beyond_f64_is_unprocessable() {
    let app = test::init_service(
        App::new()
            .app_data(app_config(RoundingMode::HalfToEven))
            .configure(handlers::configure),
    )
    .await;

    let req = test::TestRequest::post()
        .uri("/postprocess")
        .set_payload(r#"{"outputs":[{"Double":{"data":[1e400]}}]}"#)
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "type_conversion_error");
}

#[actix_web::test]
async fn test_payload_limit() {
    let payload = r#"{"outputs":[{"Double":{"data":[0.4]}}]}"#;
    let mut config = AppConfig::default();
    config.server.max_payload_bytes = payload.len();
    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(config))
            .configure(handlers::configure),
    )
    .await;

    let req = test::TestRequest::post()
        .uri("/postprocess")
        .set_payload(payload)
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let req = test::TestRequest::post()
        .uri("/postprocess")
        .set_payload(r#"{"outputs":[{"Double":{"data":[0.4, 0.6]}}]}"#)
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::PAYLOAD_TOO_LARGE);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "payload_too_large");
}

#[actix_web::test]
async fn test_health() {
    let app = test::init_service(App::new().configure(handlers::configure)).await;

    let req = test::TestRequest::get().uri("/health").to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body, json!({"status": "ok"}));
}
