//! Scenario geometry and compliance: footprint placement, rule evaluation,
//! and the service/router plumbing around them.

pub mod domain;
pub mod engine;
pub(crate) mod evaluation;
pub mod placement;
pub mod repository;
pub mod router;
pub mod service;

pub use domain::{
    Citation, ComplianceCheck, Footprint, InputError, Parcel, ParcelId, ScenarioRequest, Verdict,
    ZoneRule,
};
pub use engine::{ScenarioEngine, ScenarioOutcome};
pub use placement::PlacementFailure;
pub use repository::{
    ParcelStore, RepositoryError, RuleStore, ScenarioId, ScenarioRecord, ScenarioRepository,
};
pub use router::{scenario_router, ParcelView};
pub use service::{ScenarioService, ScenarioServiceError};
