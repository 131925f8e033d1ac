//! Planar geometry primitives underpinning footprint placement and the
//! compliance checks.
//!
//! All coordinates are meters-equivalent planar values: parcel extents are
//! small enough that treating the ground as locally flat is acceptable.
//! Area, centroid, and containment delegate to the `geo` crate; the inward
//! offset is a miter offset of the exterior ring with collapse detection.

use geo::{Area, Centroid, Contains, Coord, LineString, Point, Polygon};

/// Offset results with less planar area than this are treated as collapsed.
const COLLAPSE_AREA_SQM: f64 = 1e-6;

/// Cross products below this magnitude mean consecutive edges are parallel.
const PARALLEL_EPS: f64 = 1e-12;

/// Moves the exterior boundary of `polygon` inward by `distance` meters.
///
/// Interior rings (holes) are carried through unchanged. Returns `None`
/// when the offset collapses the polygon: zero or negative residual area,
/// flipped orientation, or a result escaping the original boundary (which
/// happens when a miter blows up on a concave parcel).
pub fn offset_inward(polygon: &Polygon<f64>, distance: f64) -> Option<Polygon<f64>> {
    if !distance.is_finite() || distance < 0.0 {
        return None;
    }
    if distance == 0.0 {
        return Some(polygon.clone());
    }

    let mut ring: Vec<Coord<f64>> = polygon.exterior().coords().copied().collect();
    if ring.len() >= 2 && ring.first() == ring.last() {
        ring.pop();
    }
    if ring.len() < 3 {
        return None;
    }
    // Work on a counter-clockwise ring so "inward" is always to the left.
    if ring_signed_area(&ring) < 0.0 {
        ring.reverse();
    }

    let n = ring.len();
    let mut shifted = Vec::with_capacity(n + 1);
    for i in 0..n {
        let prev = ring[(i + n - 1) % n];
        let curr = ring[i];
        let next = ring[(i + 1) % n];

        let (pa, da) = offset_edge(prev, curr, distance)?;
        let (pb, db) = offset_edge(curr, next, distance)?;

        let cross = da.x * db.y - da.y * db.x;
        let vertex = if cross.abs() < PARALLEL_EPS {
            // Collinear edges: shift the vertex along the shared normal.
            Coord {
                x: curr.x + (pa.x - prev.x),
                y: curr.y + (pa.y - prev.y),
            }
        } else {
            // Intersection of the two offset edge lines (miter join).
            let t = ((pb.x - pa.x) * db.y - (pb.y - pa.y) * db.x) / cross;
            Coord {
                x: pa.x + t * da.x,
                y: pa.y + t * da.y,
            }
        };
        shifted.push(vertex);
    }

    if ring_signed_area(&shifted) <= COLLAPSE_AREA_SQM {
        return None;
    }

    shifted.push(shifted[0]);
    let inner = Polygon::new(LineString::from(shifted), polygon.interiors().to_vec());

    // A miter that escapes the original boundary means the offset is not a
    // usable interior (sharp concavities); treat it the same as a collapse.
    if !polygon.contains(&inner) {
        return None;
    }

    Some(inner)
}

/// Shifts the edge `a -> b` leftward (toward the interior of a CCW ring) by
/// `distance`, returning the shifted start point and the edge direction.
fn offset_edge(a: Coord<f64>, b: Coord<f64>, distance: f64) -> Option<(Coord<f64>, Coord<f64>)> {
    let dir = Coord {
        x: b.x - a.x,
        y: b.y - a.y,
    };
    let len = (dir.x * dir.x + dir.y * dir.y).sqrt();
    if len < PARALLEL_EPS {
        return None;
    }
    // Left normal of (dx, dy) is (-dy, dx).
    let normal = Coord {
        x: -dir.y / len,
        y: dir.x / len,
    };
    let start = Coord {
        x: a.x + normal.x * distance,
        y: a.y + normal.y * distance,
    };
    Some((start, dir))
}

fn ring_signed_area(ring: &[Coord<f64>]) -> f64 {
    let n = ring.len();
    if n < 3 {
        return 0.0;
    }
    let mut sum = 0.0;
    for i in 0..n {
        let a = ring[i];
        let b = ring[(i + 1) % n];
        sum += a.x * b.y - b.x * a.y;
    }
    sum / 2.0
}

/// Area-weighted centroid; `None` for degenerate polygons.
pub fn centroid(polygon: &Polygon<f64>) -> Option<Point<f64>> {
    polygon.centroid()
}

/// Projects a point `distance_m` meters from `origin` along a compass
/// bearing (0° = north / +y, clockwise positive).
pub fn project(origin: Point<f64>, distance_m: f64, bearing_deg: f64) -> Point<f64> {
    let theta = bearing_deg.to_radians();
    Point::new(
        origin.x() + distance_m * theta.sin(),
        origin.y() + distance_m * theta.cos(),
    )
}

/// Non-negative planar area in square meters.
pub fn area(polygon: &Polygon<f64>) -> f64 {
    polygon.unsigned_area()
}

/// True when every point of `inner` lies inside or on the boundary of
/// `outer`.
pub fn within(inner: &Polygon<f64>, outer: &Polygon<f64>) -> bool {
    outer.contains(inner)
}
