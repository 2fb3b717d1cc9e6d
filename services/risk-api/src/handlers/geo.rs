//! Geo layer handler.

use axum::{
    extract::{rejection::QueryRejection, Extension, Path, Query},
    http::StatusCode,
    response::Response,
};
use geo_protocol::{GeoQuery, GeoQueryParams, Layer, QueryError};
use metrics::{counter, histogram};
use tracing::debug;

use super::{error_response, json_response};
use crate::state::AppState;

/// GET /api/geo/:layer - Feature collection for past, now, forecast or delta
pub async fn geo_handler(
    Extension(state): Extension<AppState>,
    Path(layer): Path<String>,
    params: Result<Query<GeoQueryParams>, QueryRejection>,
) -> Response {
    let params = params
        .map(|Query(params)| params)
        .map_err(|rejection| QueryError::MalformedQuery(rejection.body_text()));

    match render_layer(&state, &layer, params) {
        Ok(response) => response,
        Err(e) => {
            debug!(layer = %layer, error = %e, "Rejected geo query");
            let status =
                StatusCode::from_u16(e.status_code()).unwrap_or(StatusCode::BAD_REQUEST);
            error_response(
                status,
                e.to_exception()
                    .with_instance(format!("/api/geo/{}", layer)),
            )
        }
    }
}

fn render_layer(
    state: &AppState,
    layer: &str,
    params: Result<GeoQueryParams, QueryError>,
) -> Result<Response, QueryError> {
    let layer: Layer = layer.parse()?;
    let query = GeoQuery::parse(&params?, state.default_stride)?;

    let fc = state.dataset.features(layer, &query);

    counter!("risk_api_requests_total", "layer" => layer.as_str()).increment(1);
    histogram!("risk_api_features_emitted", "layer" => layer.as_str()).record(fc.len() as f64);
    debug!(
        layer = %layer,
        stride = query.stride,
        min = ?query.min_value,
        features = fc.len(),
        "Rendered geo layer"
    );

    Ok(json_response(&fc))
}
