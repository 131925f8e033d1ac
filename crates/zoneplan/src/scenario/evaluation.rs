use geo::Polygon;

use super::domain::{Footprint, ScenarioRequest, Verdict, ZoneRule};
use super::placement::PlacementFailure;
use crate::geometry;

/// Applies the three independent rule checks to a placed footprint.
///
/// Every check is always computed (no short-circuiting) so all diagnostic
/// notes are available together, and notes are emitted in the fixed order
/// height, coverage, setback.
///
/// The setback check is authoritative against the rule-mandated interior
/// (`rule_interior` is the boundary shrunk by `rule.min_setback_m`), not the
/// setback the user requested: a footprint placed with a smaller requested
/// setback fails here even though the placer honored the request. The
/// numeric comparison of requested vs required setback is applied as well,
/// so undersized requests fail even when a small footprint happens to sit
/// clear of the mandated zone.
pub fn evaluate(
    placement: &Result<Footprint, PlacementFailure>,
    rule_interior: Option<&Polygon<f64>>,
    parcel_area_sqm: f64,
    rule: &ZoneRule,
    request: &ScenarioRequest,
) -> Verdict {
    let height_ok = request.height_m <= rule.max_height_m;
    let height_note = (!height_ok).then(|| {
        format!(
            "Height {}m > {}m",
            request.height_m, rule.max_height_m
        )
    });

    let (coverage_ok, coverage_note, setback_ok, setback_note) = match placement {
        Ok(footprint) => {
            let coverage_pct = geometry::area(footprint.polygon()) / parcel_area_sqm * 100.0;
            let coverage_ok = coverage_pct <= rule.max_site_coverage_pct;
            let coverage_note = (!coverage_ok).then(|| {
                format!(
                    "Coverage {:.1}% > {}%",
                    coverage_pct, rule.max_site_coverage_pct
                )
            });

            let requested_enough = request.min_setback_m >= rule.min_setback_m;
            let contained = rule_interior
                .map(|interior| geometry::within(footprint.polygon(), interior))
                .unwrap_or(false);
            let setback_ok = requested_enough && contained;
            let setback_note = if setback_ok {
                None
            } else if !requested_enough {
                Some(format!(
                    "Setback {}m < {}m",
                    request.min_setback_m, rule.min_setback_m
                ))
            } else {
                Some(format!(
                    "Footprint encroaches on the {}m setback zone",
                    rule.min_setback_m
                ))
            };

            (coverage_ok, coverage_note, setback_ok, setback_note)
        }
        Err(failure) => {
            // No footprint exists; a positive footprint area is required, so
            // coverage cannot pass, and the setback note carries the reason.
            let coverage_note = Some(format!("Coverage not assessable: {failure}"));
            let setback_note = Some(failure.to_string());
            (false, coverage_note, false, setback_note)
        }
    };

    let all_ok = height_ok && coverage_ok && setback_ok;
    let notes = [height_note, coverage_note, setback_note]
        .into_iter()
        .flatten()
        .collect();

    Verdict {
        height_ok,
        coverage_ok,
        setback_ok,
        all_ok,
        notes,
    }
}
