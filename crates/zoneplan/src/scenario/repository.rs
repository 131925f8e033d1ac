use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::domain::{Parcel, ParcelId, Verdict, ZoneRule};

/// Identifier of a persisted scenario record.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ScenarioId(pub String);

/// Persisted result of one compliance check. Written once, never mutated.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScenarioRecord {
    pub id: ScenarioId,
    pub parcel_id: ParcelId,
    pub height_m: f64,
    pub footprint_sqm: f64,
    pub min_setback_m: f64,
    /// GeoJSON outline of the placed building; absent when placement failed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub building: Option<geojson::Geometry>,
    pub verdict: Verdict,
    pub created_at: DateTime<Utc>,
}

/// Error enumeration for document-store failures.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("record already exists")]
    Conflict,
    #[error("record not found")]
    NotFound,
    #[error("store unavailable: {0}")]
    Unavailable(String),
}

/// Read access to parcels. The core treats parcels as immutable snapshots.
pub trait ParcelStore: Send + Sync {
    /// The parcel scenarios are evaluated against when none is named.
    fn default_parcel(&self) -> Result<Option<Parcel>, RepositoryError>;
    fn fetch(&self, id: &ParcelId) -> Result<Option<Parcel>, RepositoryError>;
}

/// Read access to the per-zone numeric constraints.
pub trait RuleStore: Send + Sync {
    fn rule_for_zone(&self, zone: &str) -> Result<Option<ZoneRule>, RepositoryError>;
}

/// Write/read access for scenario history.
pub trait ScenarioRepository: Send + Sync {
    fn insert(&self, record: ScenarioRecord) -> Result<ScenarioRecord, RepositoryError>;
    fn fetch(&self, id: &ScenarioId) -> Result<Option<ScenarioRecord>, RepositoryError>;
    /// Most recent records first, at most `limit` of them.
    fn recent(&self, limit: usize) -> Result<Vec<ScenarioRecord>, RepositoryError>;
}
