//! End-to-end coverage of the scenario engine and service facade: placement,
//! evaluation, persistence, and the reference-data error paths.

mod common {
    use std::collections::HashMap;
    use std::sync::{Arc, Mutex};

    use geo::polygon;
    use zoneplan::scenario::{
        Parcel, ParcelId, ParcelStore, RepositoryError, RuleStore, ScenarioId, ScenarioRecord,
        ScenarioRepository, ScenarioService, ZoneRule,
    };

    pub(super) fn square_parcel() -> Parcel {
        let side = 1000f64.sqrt();
        Parcel {
            id: ParcelId("parcel-001".to_string()),
            name: "Shoreline Road Parcel".to_string(),
            zone: "residential".to_string(),
            boundary: polygon![
                (x: 0.0, y: 0.0),
                (x: side, y: 0.0),
                (x: side, y: side),
                (x: 0.0, y: side),
                (x: 0.0, y: 0.0),
            ],
            area_sqm: 1000.0,
        }
    }

    pub(super) fn residential_rule() -> ZoneRule {
        ZoneRule {
            zone: "residential".to_string(),
            max_height_m: 10.0,
            min_setback_m: 3.0,
            max_site_coverage_pct: 40.0,
            citations: Vec::new(),
        }
    }

    #[derive(Default)]
    pub(super) struct Parcels {
        parcel: Option<Parcel>,
    }

    impl Parcels {
        pub(super) fn seeded() -> Self {
            Self {
                parcel: Some(square_parcel()),
            }
        }
    }

    impl ParcelStore for Parcels {
        fn default_parcel(&self) -> Result<Option<Parcel>, RepositoryError> {
            Ok(self.parcel.clone())
        }

        fn fetch(&self, id: &ParcelId) -> Result<Option<Parcel>, RepositoryError> {
            Ok(self.parcel.clone().filter(|parcel| &parcel.id == id))
        }
    }

    #[derive(Default)]
    pub(super) struct Rules {
        rules: Vec<ZoneRule>,
    }

    impl Rules {
        pub(super) fn seeded() -> Self {
            Self {
                rules: vec![residential_rule()],
            }
        }
    }

    impl RuleStore for Rules {
        fn rule_for_zone(&self, zone: &str) -> Result<Option<ZoneRule>, RepositoryError> {
            Ok(self.rules.iter().find(|rule| rule.zone == zone).cloned())
        }
    }

    #[derive(Default)]
    pub(super) struct Scenarios {
        records: Mutex<HashMap<ScenarioId, ScenarioRecord>>,
        order: Mutex<Vec<ScenarioId>>,
    }

    impl ScenarioRepository for Scenarios {
        fn insert(&self, record: ScenarioRecord) -> Result<ScenarioRecord, RepositoryError> {
            let mut records = self.records.lock().expect("scenario mutex poisoned");
            if records.contains_key(&record.id) {
                return Err(RepositoryError::Conflict);
            }
            records.insert(record.id.clone(), record.clone());
            self.order
                .lock()
                .expect("order mutex poisoned")
                .push(record.id.clone());
            Ok(record)
        }

        fn fetch(&self, id: &ScenarioId) -> Result<Option<ScenarioRecord>, RepositoryError> {
            let records = self.records.lock().expect("scenario mutex poisoned");
            Ok(records.get(id).cloned())
        }

        fn recent(&self, limit: usize) -> Result<Vec<ScenarioRecord>, RepositoryError> {
            let records = self.records.lock().expect("scenario mutex poisoned");
            let order = self.order.lock().expect("order mutex poisoned");
            Ok(order
                .iter()
                .rev()
                .take(limit)
                .filter_map(|id| records.get(id).cloned())
                .collect())
        }
    }

    pub(super) type TestService = ScenarioService<Parcels, Rules, Scenarios>;

    pub(super) fn seeded_service() -> (Arc<TestService>, Arc<Scenarios>) {
        let scenarios = Arc::new(Scenarios::default());
        let service = ScenarioService::new(
            Arc::new(Parcels::seeded()),
            Arc::new(Rules::seeded()),
            scenarios.clone(),
        );
        (Arc::new(service), scenarios)
    }
}

mod engine {
    use super::common::{residential_rule, square_parcel};
    use zoneplan::geometry;
    use zoneplan::scenario::{InputError, ScenarioEngine, ScenarioRequest};

    #[test]
    fn compliant_scenario_produces_contained_footprint() {
        let engine = ScenarioEngine::new();
        let outcome = engine
            .run(
                &square_parcel(),
                &residential_rule(),
                &ScenarioRequest {
                    height_m: 8.0,
                    footprint_sqm: 300.0,
                    min_setback_m: 3.0,
                },
            )
            .expect("valid inputs");

        assert!(outcome.verdict.all_ok);
        assert!(outcome.verdict.notes.is_empty());

        let footprint = outcome.footprint.expect("footprint placed");
        let relative = (footprint.area_sqm() - 300.0).abs() / 300.0;
        assert!(relative < 1e-3, "footprint area drifted by {relative}");

        let interior = geometry::offset_inward(&square_parcel().boundary, 3.0).expect("interior");
        assert!(geometry::within(footprint.polygon(), &interior));
    }

    #[test]
    fn invalid_inputs_are_rejected_before_geometry() {
        let engine = ScenarioEngine::new();
        let result = engine.run(
            &square_parcel(),
            &residential_rule(),
            &ScenarioRequest {
                height_m: 8.0,
                footprint_sqm: 0.0,
                min_setback_m: 3.0,
            },
        );
        assert_eq!(result.unwrap_err(), InputError::NonPositiveFootprint(0.0));
    }

    #[test]
    fn collapsing_setback_yields_negative_verdict_not_error() {
        let engine = ScenarioEngine::new();
        let outcome = engine
            .run(
                &square_parcel(),
                &residential_rule(),
                &ScenarioRequest {
                    height_m: 8.0,
                    footprint_sqm: 100.0,
                    min_setback_m: 400.0,
                },
            )
            .expect("placement failure is not an input error");

        assert!(outcome.footprint.is_none());
        assert!(!outcome.verdict.setback_ok);
        assert!(!outcome.verdict.coverage_ok);
        assert!(outcome.verdict.height_ok);
        assert!(!outcome.verdict.all_ok);
    }

    #[test]
    fn repeated_runs_yield_identical_verdicts() {
        let engine = ScenarioEngine::new();
        let request = ScenarioRequest {
            height_m: 12.0,
            footprint_sqm: 500.0,
            min_setback_m: 1.0,
        };
        let first = engine
            .run(&square_parcel(), &residential_rule(), &request)
            .expect("runs");
        let second = engine
            .run(&square_parcel(), &residential_rule(), &request)
            .expect("runs");
        assert_eq!(first.verdict, second.verdict);
    }
}

mod service {
    use super::common::seeded_service;
    use std::sync::Arc;
    use zoneplan::scenario::{ScenarioRequest, ScenarioService, ScenarioServiceError};

    #[test]
    fn check_persists_an_immutable_record() {
        let (service, _scenarios) = seeded_service();
        let record = service
            .check(ScenarioRequest {
                height_m: 8.0,
                footprint_sqm: 300.0,
                min_setback_m: 3.0,
            })
            .expect("check succeeds");

        assert!(record.verdict.all_ok);
        assert!(record.building.is_some());
        assert_eq!(record.parcel_id.0, "parcel-001");

        let fetched = service.scenario(&record.id).expect("record stored");
        assert_eq!(fetched.verdict, record.verdict);
        assert_eq!(fetched.created_at, record.created_at);
    }

    #[test]
    fn history_returns_newest_first() {
        let (service, _scenarios) = seeded_service();
        let first = service
            .check(ScenarioRequest {
                height_m: 8.0,
                footprint_sqm: 300.0,
                min_setback_m: 3.0,
            })
            .expect("first check");
        let second = service
            .check(ScenarioRequest {
                height_m: 12.0,
                footprint_sqm: 500.0,
                min_setback_m: 1.0,
            })
            .expect("second check");

        let history = service.history(10).expect("history");
        assert_eq!(history.len(), 2);
        assert_eq!(history[0].id, second.id);
        assert_eq!(history[1].id, first.id);
    }

    #[test]
    fn missing_rule_is_a_distinct_not_found_condition() {
        let (_, scenarios) = seeded_service();
        let service = ScenarioService::new(
            Arc::new(super::common::Parcels::seeded()),
            Arc::new(super::common::Rules::default()),
            scenarios,
        );

        let result = service.check(ScenarioRequest {
            height_m: 8.0,
            footprint_sqm: 300.0,
            min_setback_m: 3.0,
        });
        match result {
            Err(ScenarioServiceError::RuleNotFound { zone }) => assert_eq!(zone, "residential"),
            other => panic!("expected RuleNotFound, got {other:?}"),
        }
    }

    #[test]
    fn missing_parcel_is_reported_not_defaulted() {
        let (_, scenarios) = seeded_service();
        let service = ScenarioService::new(
            Arc::new(super::common::Parcels::default()),
            Arc::new(super::common::Rules::seeded()),
            scenarios,
        );
        let result = service.parcel();
        assert!(matches!(result, Err(ScenarioServiceError::ParcelNotFound)));
    }

    #[test]
    fn rule_lookup_defaults_to_the_parcel_zone() {
        let (service, _scenarios) = seeded_service();
        let rule = service.rule(None).expect("rule resolves");
        assert_eq!(rule.zone, "residential");

        let missing = service.rule(Some("industrial"));
        assert!(matches!(
            missing,
            Err(ScenarioServiceError::RuleNotFound { .. })
        ));
    }

    #[test]
    fn failed_checks_expose_labels_for_explanations() {
        let (service, _scenarios) = seeded_service();
        let record = service
            .check(ScenarioRequest {
                height_m: 12.0,
                footprint_sqm: 500.0,
                min_setback_m: 1.0,
            })
            .expect("check succeeds");

        let labels: Vec<_> = record
            .verdict
            .failed_checks()
            .iter()
            .map(|check| check.label())
            .collect();
        assert_eq!(labels, vec!["height", "coverage", "setback"]);
    }
}
