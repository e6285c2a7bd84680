//! Integration test: Server endpoints

mod common;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use serde_json::{json, Value};
use tower::ServiceExt;

use common::test_app;
use stress_predictor::preprocessing::UnknownPolicy;
use stress_predictor::training::{TrainEngine, TrainingConfig};
use stress_predictor::{FeatureSchema, LabelMap, Predictor};

fn example_json() -> Value {
    json!({
        "acadmic_stage": "undergraduate",
        "Peer pressure": 3,
        "Academic pressure from your home": 4,
        "Study Environment": "noisy",
        "strategy_used": "exercise",
        "bad_habbits": "none",
        "academic_competation": 5
    })
}

fn example_form() -> String {
    form_body(&[
        ("acadmic_stage", "undergraduate"),
        ("Peer pressure", "3"),
        ("Academic pressure from your home", "4"),
        ("Study Environment", "noisy"),
        ("strategy_used", "exercise"),
        ("bad_habbits", "none"),
        ("academic_competation", "5"),
    ])
}

fn form_body(fields: &[(&str, &str)]) -> String {
    fields
        .iter()
        .map(|(k, v)| format!("{}={}", k.replace(' ', "+"), v.replace(' ', "+")))
        .collect::<Vec<_>>()
        .join("&")
}

fn json_request(body: impl Into<Body>) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/api/predict")
        .header("content-type", "application/json")
        .body(body.into())
        .unwrap()
}

fn form_request(body: String) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/predict")
        .header("content-type", "application/x-www-form-urlencoded")
        .body(Body::from(body))
        .unwrap()
}

async fn read_body(response: axum::response::Response) -> String {
    let bytes = axum::body::to_bytes(response.into_body(), 1024 * 64).await.unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

async fn read_json(response: axum::response::Response) -> Value {
    serde_json::from_str(&read_body(response).await).unwrap()
}

#[tokio::test]
async fn test_health_endpoint() {
    let app = test_app(false);
    let response = app
        .oneshot(Request::builder().uri("/api/health").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = read_json(response).await;
    assert_eq!(body["status"], "ok");
    assert_eq!(body["classes"], json!([2, 3, 4]));
    assert_eq!(body["features"].as_array().unwrap().len(), 7);
}

#[tokio::test]
async fn test_root_serves_form() {
    let app = test_app(false);
    let response = app
        .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let html = read_body(response).await;
    assert!(html.contains("<form"));
    assert!(html.contains("name=\"academic_competation\""));
}

#[tokio::test]
async fn test_api_predict_example_row() {
    let app = test_app(false);
    let response = app.oneshot(json_request(example_json().to_string())).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = read_json(response).await;
    let prediction = body["prediction"].as_i64().unwrap();
    assert!([2, 3, 4].contains(&prediction));
    assert!(body["label"].as_str().unwrap().starts_with(&format!("{} - ", prediction)));

    let proba: Vec<f64> = body["proba"]
        .as_array()
        .unwrap()
        .iter()
        .map(|p| p.as_f64().unwrap())
        .collect();
    assert_eq!(proba.len(), 3);
    assert!(proba.iter().all(|p| (0.0..=1.0).contains(p)));
    assert!((proba.iter().sum::<f64>() - 1.0).abs() < 1e-9);
}

#[tokio::test]
async fn test_api_predict_is_deterministic() {
    let app = test_app(false);
    let first = read_json(app.clone().oneshot(json_request(example_json().to_string())).await.unwrap()).await;
    let second = read_json(app.oneshot(json_request(example_json().to_string())).await.unwrap()).await;
    assert_eq!(first, second);
}

#[tokio::test]
async fn test_api_empty_body() {
    let app = test_app(false);
    let response = app.oneshot(json_request(Body::empty())).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(read_json(response).await, json!({ "error": "Send JSON payload" }));
}

#[tokio::test]
async fn test_api_non_json_body() {
    let app = test_app(false);
    let response = app.clone().oneshot(json_request("not json at all")).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(read_json(response).await["error"], "Send JSON payload");

    // Valid JSON that is not an object
    let response = app.oneshot(json_request("[1, 2, 3]")).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(read_json(response).await["error"], "Send JSON payload");
}

#[tokio::test]
async fn test_api_missing_key() {
    let app = test_app(false);
    let mut payload = example_json();
    payload.as_object_mut().unwrap().remove("bad_habbits");

    let response = app.oneshot(json_request(payload.to_string())).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(read_json(response).await["error"], "Missing field: bad_habbits");
}

#[tokio::test]
async fn test_api_unknown_category_is_absorbed() {
    let app = test_app(false);
    let mut payload = example_json();
    payload["Study Environment"] = json!("on a boat");
    payload["strategy_used"] = json!("meditation");

    let response = app.oneshot(json_request(payload.to_string())).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = read_json(response).await;
    assert_eq!(body["proba"].as_array().unwrap().len(), 3);
}

#[tokio::test]
async fn test_api_unknown_category_rejected_by_strict_artifact() {
    let dir = tempfile::tempdir().unwrap();
    let data = dir.path().join("cleaned.csv");
    let output = dir.path().join("stress_model.json");
    common::write_survey_csv(&data, 60);
    TrainEngine::new(
        TrainingConfig::new(&data, &output).with_unknown_categories(UnknownPolicy::Error),
    )
    .run()
    .unwrap();

    let predictor = Predictor::load(&output, FeatureSchema::stress_survey(), LabelMap::bilingual()).unwrap();
    let app = common::app_for(predictor, false);

    let mut payload = example_json();
    payload["Study Environment"] = json!("on a boat");
    let response = app.clone().oneshot(json_request(payload.to_string())).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(
        read_json(response).await,
        json!({ "error": "Unknown category 'on a boat' for feature Study Environment" })
    );

    // Known categories still predict
    let response = app.oneshot(json_request(example_json().to_string())).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_api_out_of_range_policy() {
    let mut payload = example_json();
    payload["Peer pressure"] = json!(9);

    let lenient = test_app(false);
    let response = lenient.oneshot(json_request(payload.to_string())).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let strict = test_app(true);
    let response = strict.oneshot(json_request(payload.to_string())).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert!(read_json(response).await["error"]
        .as_str()
        .unwrap()
        .contains("Peer pressure"));
}

#[tokio::test]
async fn test_form_predict_matches_api() {
    let app = test_app(false);

    let api = read_json(app.clone().oneshot(json_request(example_json().to_string())).await.unwrap()).await;

    let response = app.oneshot(form_request(example_form())).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let html = read_body(response).await;

    assert!(html.contains(api["label"].as_str().unwrap()));
    for (class, p) in [2, 3, 4].iter().zip(api["proba"].as_array().unwrap()) {
        let cell = format!("<td>{}</td><td>{:.3}</td>", class, p.as_f64().unwrap());
        assert!(html.contains(&cell), "missing {}", cell);
    }
}

#[tokio::test]
async fn test_form_missing_field() {
    let app = test_app(false);
    let body = form_body(&[
        ("acadmic_stage", "undergraduate"),
        ("Peer pressure", "3"),
        ("Study Environment", "noisy"),
    ]);

    let response = app.oneshot(form_request(body)).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(read_body(response).await, "Missing field: Academic pressure from your home");
}

#[tokio::test]
async fn test_form_without_body() {
    let app = test_app(false);
    let response = app
        .oneshot(Request::builder().method("POST").uri("/predict").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(read_body(response).await, "Missing field: acadmic_stage");
}

#[tokio::test]
async fn test_form_non_integer() {
    let app = test_app(false);
    let body = example_form().replace("Peer+pressure=3", "Peer+pressure=high");

    let response = app.oneshot(form_request(body)).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(read_body(response).await, "Invalid integer for field Peer pressure: high");
}

#[tokio::test]
async fn test_unknown_route() {
    let app = test_app(false);
    let response = app
        .oneshot(Request::builder().uri("/nope").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert!(read_json(response).await["error"].is_string());
}

#[tokio::test]
async fn test_wrong_method() {
    let app = test_app(false);
    let response = app
        .oneshot(Request::builder().uri("/api/predict").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
}
