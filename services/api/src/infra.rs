use geo::polygon;
use metrics_exporter_prometheus::PrometheusHandle;
use std::collections::HashMap;
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex};
use zoneplan::scenario::{
    Citation, Parcel, ParcelId, ParcelStore, RepositoryError, RuleStore, ScenarioId,
    ScenarioRecord, ScenarioRepository, ZoneRule,
};

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Single-parcel store seeded at startup, standing in for the document
/// store until one is wired up.
#[derive(Clone)]
pub(crate) struct InMemoryParcelStore {
    parcel: Parcel,
}

impl InMemoryParcelStore {
    pub(crate) fn seeded() -> Self {
        Self {
            parcel: demo_parcel(),
        }
    }
}

impl ParcelStore for InMemoryParcelStore {
    fn default_parcel(&self) -> Result<Option<Parcel>, RepositoryError> {
        Ok(Some(self.parcel.clone()))
    }

    fn fetch(&self, id: &ParcelId) -> Result<Option<Parcel>, RepositoryError> {
        Ok(Some(self.parcel.clone()).filter(|parcel| &parcel.id == id))
    }
}

#[derive(Clone)]
pub(crate) struct InMemoryRuleStore {
    rules: Vec<ZoneRule>,
}

impl InMemoryRuleStore {
    pub(crate) fn seeded() -> Self {
        Self {
            rules: seed_rules(),
        }
    }
}

impl RuleStore for InMemoryRuleStore {
    fn rule_for_zone(&self, zone: &str) -> Result<Option<ZoneRule>, RepositoryError> {
        Ok(self.rules.iter().find(|rule| rule.zone == zone).cloned())
    }
}

#[derive(Default, Clone)]
pub(crate) struct InMemoryScenarioRepository {
    records: Arc<Mutex<HashMap<ScenarioId, ScenarioRecord>>>,
    order: Arc<Mutex<Vec<ScenarioId>>>,
}

impl ScenarioRepository for InMemoryScenarioRepository {
    fn insert(&self, record: ScenarioRecord) -> Result<ScenarioRecord, RepositoryError> {
        let mut guard = self.records.lock().expect("repository mutex poisoned");
        if guard.contains_key(&record.id) {
            return Err(RepositoryError::Conflict);
        }
        guard.insert(record.id.clone(), record.clone());
        self.order
            .lock()
            .expect("order mutex poisoned")
            .push(record.id.clone());
        Ok(record)
    }

    fn fetch(&self, id: &ScenarioId) -> Result<Option<ScenarioRecord>, RepositoryError> {
        let guard = self.records.lock().expect("repository mutex poisoned");
        Ok(guard.get(id).cloned())
    }

    fn recent(&self, limit: usize) -> Result<Vec<ScenarioRecord>, RepositoryError> {
        let records = self.records.lock().expect("repository mutex poisoned");
        let order = self.order.lock().expect("order mutex poisoned");
        Ok(order
            .iter()
            .rev()
            .take(limit)
            .filter_map(|id| records.get(id).cloned())
            .collect())
    }
}

/// 40m x 25m rectangular demonstration parcel (1000 m²) in local planar
/// meters, matching the seeded residential rule set.
pub(crate) fn demo_parcel() -> Parcel {
    Parcel {
        id: ParcelId("parcel-001".to_string()),
        name: "Shoreline Road Parcel".to_string(),
        zone: "residential".to_string(),
        boundary: polygon![
            (x: 0.0, y: 0.0),
            (x: 40.0, y: 0.0),
            (x: 40.0, y: 25.0),
            (x: 0.0, y: 25.0),
            (x: 0.0, y: 0.0),
        ],
        area_sqm: 1000.0,
    }
}

pub(crate) fn seed_rules() -> Vec<ZoneRule> {
    vec![
        ZoneRule {
            zone: "residential".to_string(),
            max_height_m: 10.0,
            min_setback_m: 3.0,
            max_site_coverage_pct: 40.0,
            citations: vec![Citation {
                title: "District Plan".to_string(),
                section: "RES-R3 Building height, setback and site coverage".to_string(),
                url: None,
            }],
        },
        ZoneRule {
            zone: "mixed-use".to_string(),
            max_height_m: 16.0,
            min_setback_m: 1.5,
            max_site_coverage_pct: 60.0,
            citations: vec![Citation {
                title: "District Plan".to_string(),
                section: "MU-R2 Bulk and location".to_string(),
                url: None,
            }],
        },
    ]
}
