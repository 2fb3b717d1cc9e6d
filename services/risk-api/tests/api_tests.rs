//! Integration tests for the risk API endpoints.
//!
//! Tests use Axum's `Router` directly via `tower::ServiceExt` without
//! starting a TCP server.

use std::path::PathBuf;

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use chrono::NaiveDate;
use grid_common::Region;
use metrics_exporter_prometheus::PrometheusBuilder;
use risk_api::router::build_router;
use risk_api::state::AppState;
use risk_processor::{DatasetConfig, RiskDataset};
use serde_json::Value;
use test_utils::{csv_document, headers, region, temp_csv};
use tower::ServiceExt;

fn config(csv_path: Option<PathBuf>) -> DatasetConfig {
    let (a, b, c, d) = region::TAK;
    let mut config = DatasetConfig::new(NaiveDate::from_ymd_opt(2024, 1, 15).unwrap());
    config.region = Region::new(a, b, c, d).unwrap();
    config.grid_km = 25.0;
    config.days_back = 2;
    config.days_fwd = 1;
    config.csv_path = csv_path;
    config
}

fn app_with(config: &DatasetConfig, static_dir: PathBuf) -> Router {
    let dataset = RiskDataset::build(config).unwrap();
    let state = AppState::new(dataset, 2, static_dir);
    let handle = PrometheusBuilder::new().build_recorder().handle();
    build_router(state, handle)
}

fn app() -> Router {
    app_with(&config(None), PathBuf::from("/nonexistent/static"))
}

async fn get(router: Router, uri: &str) -> axum::response::Response {
    router
        .oneshot(Request::get(uri).body(Body::empty()).unwrap())
        .await
        .unwrap()
}

async fn body_to_json(body: Body) -> Value {
    let bytes = axum::body::to_bytes(body, usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

// =========================================================================
// Metadata and health
// =========================================================================

#[tokio::test]
async fn test_health() {
    let response = get(app(), "/health").await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_to_json(response.into_body()).await;
    assert_eq!(json["status"], "ok");
}

#[tokio::test]
async fn test_meta_synthetic() {
    let response = get(app(), "/api/meta").await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_to_json(response.into_body()).await;
    assert_eq!(json["grid_km"], 25.0);
    assert_eq!(json["lat_min"], 15.6);
    assert_eq!(json["today"], "2024-01-15");
    assert_eq!(
        json["dates"],
        serde_json::json!(["2024-01-13", "2024-01-14", "2024-01-15", "2024-01-16"])
    );
    assert_eq!(json["data_note"], "synthetic demo data");
    assert!(json["csv_file"].is_null());
    assert!(json["rows"].as_u64().unwrap() > 0);
}

#[tokio::test]
async fn test_meta_with_csv() {
    let doc = csv_document(headers::CELL, &["2024-01-15,r0c0,3.5", "2024-01-16,r0c0,1.5"]);
    let (_dir, path) = temp_csv("risk_daily_cells.csv", &doc);
    let router = app_with(&config(Some(path.clone())), PathBuf::from("/nonexistent"));

    let json = body_to_json(get(router, "/api/meta").await.into_body()).await;
    assert_eq!(json["data_note"], "loaded: risk_daily_cells.csv");
    assert_eq!(json["csv_file"], path.display().to_string());
    assert_eq!(json["dates"], serde_json::json!(["2024-01-15", "2024-01-16"]));
}

// =========================================================================
// Geo layers
// =========================================================================

#[tokio::test]
async fn test_geo_now_default_stride() {
    let dataset = RiskDataset::build(&config(None)).unwrap();
    let even = dataset
        .grid()
        .cells()
        .iter()
        .filter(|c| c.row % 2 == 0 && c.col % 2 == 0)
        .count();

    let response = get(app(), "/api/geo/now").await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_to_json(response.into_body()).await;
    assert_eq!(json["type"], "FeatureCollection");
    let features = json["features"].as_array().unwrap();
    assert_eq!(features.len(), even);

    let first = &features[0];
    assert_eq!(first["type"], "Feature");
    assert_eq!(first["geometry"]["type"], "Polygon");
    assert_eq!(first["geometry"]["coordinates"][0].as_array().unwrap().len(), 5);
    assert_eq!(first["properties"]["time"], "2024-01-15");
    assert_eq!(first["properties"]["cell_id"], "r0c0");
    assert!(first["properties"]["center_lat"].is_number());
    assert!(first["properties"]["value"].is_number());
}

#[tokio::test]
async fn test_geo_past_stride_one() {
    let dataset = RiskDataset::build(&config(None)).unwrap();
    let json = body_to_json(get(app(), "/api/geo/past?stride=1").await.into_body()).await;
    assert_eq!(
        json["features"].as_array().unwrap().len(),
        2 * dataset.grid().len()
    );
}

#[tokio::test]
async fn test_geo_delta_first_day_zero() {
    let json = body_to_json(get(app(), "/api/geo/delta?stride=1&min=100").await.into_body()).await;
    let features = json["features"].as_array().unwrap();
    // min is ignored for deltas
    assert!(!features.is_empty());
    assert!(features
        .iter()
        .filter(|f| f["properties"]["time"] == "2024-01-13")
        .all(|f| f["properties"]["value"] == 0.0));
}

#[tokio::test]
async fn test_geo_threshold() {
    let json = body_to_json(get(app(), "/api/geo/forecast?stride=1&min=0.3").await.into_body()).await;
    for f in json["features"].as_array().unwrap() {
        assert!(f["properties"]["value"].as_f64().unwrap() >= 0.3);
    }
}

#[tokio::test]
async fn test_geo_empty_partition() {
    let doc = csv_document(headers::CELL, &["2023-06-01,r0c0,1"]);
    let (_dir, path) = temp_csv("old.csv", &doc);
    let router = app_with(&config(Some(path)), PathBuf::from("/nonexistent"));

    let response = get(router, "/api/geo/forecast").await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_to_json(response.into_body()).await;
    assert_eq!(json["features"].as_array().unwrap().len(), 0);
}

#[tokio::test]
async fn test_unknown_layer_is_404() {
    let response = get(app(), "/api/geo/tomorrow").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let json = body_to_json(response.into_body()).await;
    assert_eq!(json["status"], 404);
    assert!(json["detail"].as_str().unwrap().contains("tomorrow"));
}

#[tokio::test]
async fn test_bad_parameters_are_400() {
    for uri in [
        "/api/geo/now?stride=0",
        "/api/geo/now?stride=abc",
        "/api/geo/past?min=high",
    ] {
        let response = get(app(), uri).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST, "{}", uri);
        let json = body_to_json(response.into_body()).await;
        assert_eq!(json["type"], "/errors/invalid-parameter-value");
    }
}

#[tokio::test]
async fn test_undecodable_query_is_json_400() {
    let response = get(app(), "/api/geo/now?stride=1&stride=2").await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let content_type = response.headers().get(header::CONTENT_TYPE).unwrap();
    assert!(content_type.to_str().unwrap().starts_with("application/json"));

    let json = body_to_json(response.into_body()).await;
    assert_eq!(json["type"], "/errors/invalid-parameter-value");
    assert_eq!(json["status"], 400);
    assert_eq!(json["instance"], "/api/geo/now");
    assert!(json["detail"].as_str().unwrap().contains("stride"));
}

#[tokio::test]
async fn test_gzip_when_accepted() {
    let response = app()
        .oneshot(
            Request::get("/api/geo/delta?stride=1")
                .header(header::ACCEPT_ENCODING, "gzip")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers().get(header::CONTENT_ENCODING).unwrap(), "gzip");
}

// =========================================================================
// Pages
// =========================================================================

#[tokio::test]
async fn test_index_served_from_static_dir() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("index.html"), "<html>risk</html>").unwrap();
    let router = app_with(&config(None), dir.path().to_path_buf());

    for uri in ["/", "/index.html"] {
        let response = get(router.clone(), uri).await;
        assert_eq!(response.status(), StatusCode::OK);
        let content_type = response
            .headers()
            .get("content-type")
            .unwrap()
            .to_str()
            .unwrap();
        assert!(content_type.contains("text/html"));
    }
}

#[tokio::test]
async fn test_static_asset_served() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("app.js"), "console.log(1);").unwrap();
    let router = app_with(&config(None), dir.path().to_path_buf());

    let response = get(router, "/static/app.js").await;
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_missing_index_is_404() {
    let response = get(app(), "/").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_favicon_no_content() {
    let response = get(app(), "/favicon.ico").await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);
}

#[tokio::test]
async fn test_unknown_route_is_404() {
    let response = get(app(), "/api/nothing").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let json = body_to_json(response.into_body()).await;
    assert_eq!(json["type"], "/errors/not-found");
}

#[tokio::test]
async fn test_metrics_endpoint() {
    let response = get(app(), "/metrics").await;
    assert_eq!(response.status(), StatusCode::OK);
    let content_type = response.headers().get(header::CONTENT_TYPE).unwrap();
    assert!(content_type.to_str().unwrap().starts_with("text/plain"));
}
