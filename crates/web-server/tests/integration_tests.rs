//! Integration tests for the calculator routes

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
    Router,
};
use configuration::{ChartSettings, FormDefaults};
use core_types::TailMode;
use web_server::{create_router, AppState};
use tower::ServiceExt; // for oneshot

/// Helper to create test application state
fn create_test_state() -> AppState {
    let defaults = FormDefaults {
        observed_proportion: 0.5,
        expected_proportion: 0.4,
        sample_size: 100,
        significance_level: 0.05,
        tail_mode: TailMode::TwoTailed,
    };
    let chart = ChartSettings {
        width: 800,
        height: 400,
        samples: 200,
        x_min: -4.0,
        x_max: 4.0,
    };
    AppState::new(defaults, chart)
}

fn create_test_app() -> Router {
    create_router(create_test_state())
}

async fn body_string(response: axum::response::Response) -> String {
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    String::from_utf8(body.to_vec()).unwrap()
}

fn form_request(body: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/calculate")
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(Body::from(body.to_string()))
        .unwrap()
}

#[tokio::test]
async fn test_health_check_endpoint() {
    let request = Request::builder()
        .uri("/api/health")
        .body(Body::empty())
        .unwrap();

    let response = create_test_app().oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_string(response).await, "OK");
}

#[tokio::test]
async fn test_index_is_prefilled_with_defaults() {
    let request = Request::builder().uri("/").body(Body::empty()).unwrap();

    let response = create_test_app().oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let html = body_string(response).await;
    assert!(html.contains("name=\"observed_proportion\""));
    assert!(html.contains("value=\"0.4\""));
    assert!(html.contains("<option value=\"two-tailed\" selected>"));
}

#[tokio::test]
async fn test_calculate_renders_results_and_chart() {
    let request = form_request(
        "observed_proportion=0.5&expected_proportion=0.4&sample_size=100&significance_level=0.05&tail_mode=two-tailed",
    );

    let response = create_test_app().oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let html = body_string(response).await;
    assert!(html.contains("Statistically SIGNIFICANT"));
    assert!(html.contains("Reject the null hypothesis (H0: p = 0.4)"));
    assert!(html.contains("<svg"));
    assert!(html.contains("z critical = ±1.96"));
}

#[tokio::test]
async fn test_calculate_reports_negative_sample_size() {
    let request = form_request(
        "observed_proportion=0.5&expected_proportion=0.4&sample_size=-5&significance_level=0.05&tail_mode=right-tailed",
    );

    let response = create_test_app().oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let html = body_string(response).await;
    assert!(html.contains("The sample size must be positive (got -5)"));
    assert!(!html.contains("<svg"));
}

#[tokio::test]
async fn test_calculate_reports_degenerate_input() {
    let request = form_request(
        "observed_proportion=0.2&expected_proportion=0&sample_size=50&significance_level=0.05&tail_mode=two-tailed",
    );

    let response = create_test_app().oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    assert!(body_string(response).await.contains("Degenerate input"));
}

#[tokio::test]
async fn test_calculate_reports_malformed_form() {
    let request = form_request("observed_proportion=abc");

    let response = create_test_app().oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    assert!(body_string(response).await.contains("Invalid form input"));
}

#[tokio::test]
async fn test_chart_failure_still_shows_result() {
    let mut state = create_test_state();
    state.chart.samples = 1;
    let app = create_router(state);
    let request = form_request(
        "observed_proportion=0.45&expected_proportion=0.4&sample_size=200&significance_level=0.01&tail_mode=right-tailed",
    );

    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let html = body_string(response).await;
    assert!(html.contains("NOT statistically significant"));
    assert!(html.contains("Failed to render chart"));
}

#[tokio::test]
async fn test_api_ztest_returns_report() {
    let request = Request::builder()
        .method("POST")
        .uri("/api/ztest")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(
            r#"{"observed_proportion":0.45,"expected_proportion":0.4,"sample_size":200,"significance_level":0.01,"tail_mode":"right-tailed"}"#,
        ))
        .unwrap();

    let response = create_test_app().oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_string(response).await;
    let report: serde_json::Value = serde_json::from_str(&body).unwrap();
    let z = report["result"]["z_value"].as_f64().unwrap();
    assert!((z - 1.4434).abs() < 1e-4);
    assert_eq!(report["result"]["is_significant"], false);
    assert_eq!(report["critical_region"]["kind"], "upper");
}

#[tokio::test]
async fn test_api_ztest_rejects_invalid_alpha() {
    let request = Request::builder()
        .method("POST")
        .uri("/api/ztest")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(
            r#"{"observed_proportion":0.5,"expected_proportion":0.4,"sample_size":100,"significance_level":1.0}"#,
        ))
        .unwrap();

    let response = create_test_app().oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body: serde_json::Value = serde_json::from_str(&body_string(response).await).unwrap();
    assert!(body["error"]
        .as_str()
        .unwrap()
        .contains("significance level"));
}

#[tokio::test]
async fn test_chart_endpoint_serves_svg() {
    let request = Request::builder()
        .uri("/api/ztest/chart.svg?observed_proportion=0.3&expected_proportion=0.4&sample_size=100&significance_level=0.05&tail_mode=left-tailed")
        .body(Body::empty())
        .unwrap();

    let response = create_test_app().oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers().get(header::CONTENT_TYPE).unwrap(),
        "image/svg+xml"
    );
    let svg = body_string(response).await;
    assert!(svg.contains("z critical = -1.64"));
}

async fn error_message(response: axum::response::Response) -> String {
    let body: serde_json::Value = serde_json::from_str(&body_string(response).await).unwrap();
    body["error"].as_str().unwrap().to_string()
}

#[tokio::test]
async fn test_api_ztest_rejects_malformed_json_as_json_error() {
    let request = Request::builder()
        .method("POST")
        .uri("/api/ztest")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("not json"))
        .unwrap();

    let response = create_test_app().oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    assert!(error_message(response).await.starts_with("Invalid request"));
}

#[tokio::test]
async fn test_api_ztest_rejects_missing_field_as_json_error() {
    let request = Request::builder()
        .method("POST")
        .uri("/api/ztest")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(r#"{"observed_proportion":0.5}"#))
        .unwrap();

    let response = create_test_app().oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    assert!(error_message(response).await.starts_with("Invalid request"));
}

#[tokio::test]
async fn test_chart_endpoint_rejects_bad_query_as_json_error() {
    let request = Request::builder()
        .uri("/api/ztest/chart.svg?observed_proportion=x")
        .body(Body::empty())
        .unwrap();

    let response = create_test_app().oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(
        response.headers().get(header::CONTENT_TYPE).unwrap(),
        "application/json"
    );
    assert!(error_message(response).await.contains("query string"));
}
