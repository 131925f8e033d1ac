use super::domain::{Footprint, InputError, Parcel, ScenarioRequest, Verdict, ZoneRule};
use super::evaluation;
use super::placement;
use crate::geometry;

/// Result of one scenario evaluation: the placed footprint (absent when
/// placement failed) and the compliance verdict.
#[derive(Debug, Clone)]
pub struct ScenarioOutcome {
    pub footprint: Option<Footprint>,
    pub verdict: Verdict,
}

/// Orchestrates placement and evaluation for one parcel + rule pair.
///
/// Stateless and side-effect free: every run is a deterministic function of
/// its inputs, so concurrent evaluations need no coordination.
#[derive(Debug, Default, Clone, Copy)]
pub struct ScenarioEngine;

impl ScenarioEngine {
    pub fn new() -> Self {
        Self
    }

    /// Places the requested footprint and evaluates it against `rule`.
    ///
    /// Input validation happens first; no geometry is attempted for invalid
    /// numbers. A placement failure is not an error: it comes back as a
    /// negative verdict with an explanatory note.
    pub fn run(
        &self,
        parcel: &Parcel,
        rule: &ZoneRule,
        request: &ScenarioRequest,
    ) -> Result<ScenarioOutcome, InputError> {
        request.validate()?;

        // Placement honors the setback the user asked for; the evaluator
        // checks containment against the interior the rule mandates.
        let placement =
            placement::place(&parcel.boundary, request.footprint_sqm, request.min_setback_m);
        let rule_interior = geometry::offset_inward(&parcel.boundary, rule.min_setback_m);

        let verdict = evaluation::evaluate(
            &placement,
            rule_interior.as_ref(),
            parcel.area_sqm,
            rule,
            request,
        );

        Ok(ScenarioOutcome {
            footprint: placement.ok(),
            verdict,
        })
    }
}
