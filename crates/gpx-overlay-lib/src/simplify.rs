//! Trackpoint decimation by minimum distance
//!
//! Recorded tracks oversample heavily relative to what a map overlay can
//! usefully show. A single forward pass drops every point closer than the
//! configured delta to the last point that was kept.

use crate::Point;

/// Decimate an ordered trackpoint sequence with a minimum-distance filter.
///
/// The first point is always kept and becomes the anchor; each subsequent
/// point is kept only if its planar degree-space distance from the anchor
/// strictly exceeds `min_delta`, and then becomes the new anchor. An empty
/// input yields an empty output.
pub fn decimate(points: &[Point], min_delta: f64) -> Vec<Point> {
    let Some(first) = points.first() else {
        return Vec::new();
    };

    let mut kept = Vec::with_capacity(points.len());
    kept.push(first.clone());
    let mut anchor = first;

    for point in &points[1..] {
        if point.planar_distance(anchor) > min_delta {
            kept.push(point.clone());
            anchor = point;
        }
    }

    kept
}
