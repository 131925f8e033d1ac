use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use chrono::Utc;

use super::domain::{InputError, Parcel, ScenarioRequest, ZoneRule};
use super::engine::ScenarioEngine;
use super::repository::{
    ParcelStore, RepositoryError, RuleStore, ScenarioId, ScenarioRecord, ScenarioRepository,
};

/// Service composing the reference-data stores, the scenario engine, and
/// the scenario history repository.
pub struct ScenarioService<P, R, S> {
    parcels: Arc<P>,
    rules: Arc<R>,
    scenarios: Arc<S>,
    engine: ScenarioEngine,
}

static SCENARIO_SEQUENCE: AtomicU64 = AtomicU64::new(1);

fn next_scenario_id() -> ScenarioId {
    let id = SCENARIO_SEQUENCE.fetch_add(1, Ordering::Relaxed);
    ScenarioId(format!("scn-{id:06}"))
}

/// Errors surfaced by the scenario service boundary.
#[derive(Debug, thiserror::Error)]
pub enum ScenarioServiceError {
    #[error("invalid scenario input: {0}")]
    Input(#[from] InputError),
    #[error("no parcel available")]
    ParcelNotFound,
    #[error("no planning rule recorded for zone '{zone}'")]
    RuleNotFound { zone: String },
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

impl<P, R, S> ScenarioService<P, R, S>
where
    P: ParcelStore + 'static,
    R: RuleStore + 'static,
    S: ScenarioRepository + 'static,
{
    pub fn new(parcels: Arc<P>, rules: Arc<R>, scenarios: Arc<S>) -> Self {
        Self {
            parcels,
            rules,
            scenarios,
            engine: ScenarioEngine::new(),
        }
    }

    /// Run one compliance check against the default parcel and persist the
    /// outcome as an immutable scenario record.
    pub fn check(&self, request: ScenarioRequest) -> Result<ScenarioRecord, ScenarioServiceError> {
        let parcel = self
            .parcels
            .default_parcel()?
            .ok_or(ScenarioServiceError::ParcelNotFound)?;
        let rule = self.rule_for_parcel(&parcel)?;

        let outcome = self.engine.run(&parcel, &rule, &request)?;

        let record = ScenarioRecord {
            id: next_scenario_id(),
            parcel_id: parcel.id.clone(),
            height_m: request.height_m,
            footprint_sqm: request.footprint_sqm,
            min_setback_m: request.min_setback_m,
            building: outcome.footprint.as_ref().map(|f| f.to_geojson()),
            verdict: outcome.verdict,
            created_at: Utc::now(),
        };

        Ok(self.scenarios.insert(record)?)
    }

    /// Fetch a previously persisted scenario.
    pub fn scenario(&self, id: &ScenarioId) -> Result<ScenarioRecord, ScenarioServiceError> {
        self.scenarios
            .fetch(id)?
            .ok_or(ScenarioServiceError::Repository(RepositoryError::NotFound))
    }

    /// Most recent scenario records, newest first.
    pub fn history(&self, limit: usize) -> Result<Vec<ScenarioRecord>, ScenarioServiceError> {
        Ok(self.scenarios.recent(limit)?)
    }

    /// The parcel scenarios are evaluated against.
    pub fn parcel(&self) -> Result<Parcel, ScenarioServiceError> {
        self.parcels
            .default_parcel()?
            .ok_or(ScenarioServiceError::ParcelNotFound)
    }

    /// Rule lookup, defaulting to the zone of the default parcel.
    pub fn rule(&self, zone: Option<&str>) -> Result<ZoneRule, ScenarioServiceError> {
        match zone {
            Some(zone) => self
                .rules
                .rule_for_zone(zone)?
                .ok_or_else(|| ScenarioServiceError::RuleNotFound {
                    zone: zone.to_string(),
                }),
            None => {
                let parcel = self.parcel()?;
                self.rule_for_parcel(&parcel)
            }
        }
    }

    fn rule_for_parcel(&self, parcel: &Parcel) -> Result<ZoneRule, ScenarioServiceError> {
        self.rules
            .rule_for_zone(&parcel.zone)?
            .ok_or_else(|| ScenarioServiceError::RuleNotFound {
                zone: parcel.zone.clone(),
            })
    }
}
