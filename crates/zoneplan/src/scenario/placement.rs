use geo::{LineString, Point, Polygon};

use super::domain::Footprint;
use crate::geometry;

/// Corner bearings walked top-left, top-right, bottom-right, bottom-left so
/// the resulting ring is closed in a consistent winding.
const CORNER_BEARINGS_DEG: [f64; 4] = [315.0, 45.0, 135.0, 225.0];

/// Reasons the placer cannot produce a footprint.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum PlacementFailure {
    #[error("setback {setback_m}m leaves no buildable area inside the parcel")]
    SetbackExceedsParcel { setback_m: f64 },
    #[error("parcel boundary is degenerate")]
    DegenerateBoundary,
}

/// Centers an axis-aligned square of `footprint_sqm` square meters inside
/// the setback-shrunk interior of `boundary`.
///
/// Centering inside the inward offset is the simplest policy that satisfies
/// the setback by construction whenever the square fits. It does not
/// guarantee containment on irregular parcels whose local width is smaller
/// than the square's diagonal, so the evaluator re-checks containment
/// independently.
pub fn place(
    boundary: &Polygon<f64>,
    footprint_sqm: f64,
    setback_m: f64,
) -> Result<Footprint, PlacementFailure> {
    let inner = geometry::offset_inward(boundary, setback_m)
        .ok_or(PlacementFailure::SetbackExceedsParcel { setback_m })?;
    let center = geometry::centroid(&inner).ok_or(PlacementFailure::DegenerateBoundary)?;

    // Center-to-corner distance of a square with the requested area.
    let side = footprint_sqm.sqrt();
    let corner_distance = side * std::f64::consts::FRAC_1_SQRT_2;

    let mut corners: Vec<Point<f64>> = CORNER_BEARINGS_DEG
        .iter()
        .map(|bearing| geometry::project(center, corner_distance, *bearing))
        .collect();
    corners.push(corners[0]);

    let ring: LineString<f64> = corners.into_iter().map(|p| p.0).collect();
    Ok(Footprint::new(Polygon::new(ring, Vec::new())))
}
