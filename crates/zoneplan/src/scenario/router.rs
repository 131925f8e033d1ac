use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use serde::{Deserialize, Serialize};
use serde_json::json;

use super::domain::{Parcel, ScenarioRequest};
use super::repository::{ParcelStore, RepositoryError, RuleStore, ScenarioId, ScenarioRepository};
use super::service::{ScenarioService, ScenarioServiceError};

const HISTORY_LIMIT: usize = 50;

/// Router builder exposing the scenario API.
pub fn scenario_router<P, R, S>(service: Arc<ScenarioService<P, R, S>>) -> Router
where
    P: ParcelStore + 'static,
    R: RuleStore + 'static,
    S: ScenarioRepository + 'static,
{
    Router::new()
        .route(
            "/api/v1/scenarios",
            post(check_handler::<P, R, S>).get(history_handler::<P, R, S>),
        )
        .route(
            "/api/v1/scenarios/:scenario_id",
            get(scenario_handler::<P, R, S>),
        )
        .route("/api/v1/parcels", get(parcel_handler::<P, R, S>))
        .route("/api/v1/rules", get(rule_handler::<P, R, S>))
        .with_state(service)
}

/// Parcel payload with the boundary rendered as GeoJSON.
#[derive(Debug, Serialize)]
pub struct ParcelView {
    pub id: String,
    pub name: String,
    pub zone: String,
    pub boundary: geojson::Geometry,
    pub area_sqm: f64,
}

impl From<&Parcel> for ParcelView {
    fn from(parcel: &Parcel) -> Self {
        Self {
            id: parcel.id.0.clone(),
            name: parcel.name.clone(),
            zone: parcel.zone.clone(),
            boundary: geojson::Geometry::new(geojson::Value::from(&parcel.boundary)),
            area_sqm: parcel.area_sqm,
        }
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct RuleQuery {
    zone: Option<String>,
}

fn error_response(error: ScenarioServiceError) -> Response {
    let status = match &error {
        ScenarioServiceError::Input(_) => StatusCode::UNPROCESSABLE_ENTITY,
        ScenarioServiceError::ParcelNotFound
        | ScenarioServiceError::RuleNotFound { .. }
        | ScenarioServiceError::Repository(RepositoryError::NotFound) => StatusCode::NOT_FOUND,
        ScenarioServiceError::Repository(RepositoryError::Conflict) => StatusCode::CONFLICT,
        ScenarioServiceError::Repository(RepositoryError::Unavailable(_)) => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    };
    let payload = json!({ "error": error.to_string() });
    (status, axum::Json(payload)).into_response()
}

pub(crate) async fn check_handler<P, R, S>(
    State(service): State<Arc<ScenarioService<P, R, S>>>,
    axum::Json(request): axum::Json<ScenarioRequest>,
) -> Response
where
    P: ParcelStore + 'static,
    R: RuleStore + 'static,
    S: ScenarioRepository + 'static,
{
    match service.check(request) {
        Ok(record) => (StatusCode::CREATED, axum::Json(record)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn scenario_handler<P, R, S>(
    State(service): State<Arc<ScenarioService<P, R, S>>>,
    Path(scenario_id): Path<String>,
) -> Response
where
    P: ParcelStore + 'static,
    R: RuleStore + 'static,
    S: ScenarioRepository + 'static,
{
    match service.scenario(&ScenarioId(scenario_id)) {
        Ok(record) => (StatusCode::OK, axum::Json(record)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn history_handler<P, R, S>(
    State(service): State<Arc<ScenarioService<P, R, S>>>,
) -> Response
where
    P: ParcelStore + 'static,
    R: RuleStore + 'static,
    S: ScenarioRepository + 'static,
{
    match service.history(HISTORY_LIMIT) {
        Ok(records) => (StatusCode::OK, axum::Json(records)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn parcel_handler<P, R, S>(
    State(service): State<Arc<ScenarioService<P, R, S>>>,
) -> Response
where
    P: ParcelStore + 'static,
    R: RuleStore + 'static,
    S: ScenarioRepository + 'static,
{
    match service.parcel() {
        Ok(parcel) => (StatusCode::OK, axum::Json(ParcelView::from(&parcel))).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn rule_handler<P, R, S>(
    State(service): State<Arc<ScenarioService<P, R, S>>>,
    Query(query): Query<RuleQuery>,
) -> Response
where
    P: ParcelStore + 'static,
    R: RuleStore + 'static,
    S: ScenarioRepository + 'static,
{
    match service.rule(query.zone.as_deref()) {
        Ok(rule) => (StatusCode::OK, axum::Json(rule)).into_response(),
        Err(error) => error_response(error),
    }
}
