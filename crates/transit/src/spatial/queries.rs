//! Spatial query utilities for distance calculations.
//!
//! Uses the Haversine formula on a spherical Earth. No spheroid correction is
//! applied; the error stays well under 0.5% at city scale.

use std::cmp::Ordering;

use geo::Point;

use crate::models::StopRecord;

/// Radius of the spherical Earth model, in meters.
pub const EARTH_RADIUS_M: f64 = 6_371_000.0;

/// Calculate Haversine distance between two points in meters
///
/// Points are `x = longitude, y = latitude` in degrees.
pub fn haversine_distance(p1: Point, p2: Point) -> f64 {
    let lat1 = p1.y().to_radians();
    let lat2 = p2.y().to_radians();
    let d_lat = (p2.y() - p1.y()).to_radians();
    let d_lon = (p2.x() - p1.x()).to_radians();

    let a = (d_lat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (d_lon / 2.0).sin().powi(2);

    2.0 * EARTH_RADIUS_M * a.sqrt().atan2((1.0 - a).sqrt())
}

/// The `k` stops closest to `origin`, nearest first, with their distances.
///
/// The sort is stable, so stops at equal distance keep their input order.
/// Stops whose distance is not finite sort after every finite one.
pub fn nearest_k(stops: &[StopRecord], origin: Point, k: usize) -> Vec<(&StopRecord, f64)> {
    let mut distances: Vec<_> = stops
        .iter()
        .map(|stop| (stop, haversine_distance(origin, stop.position())))
        .collect();

    distances.sort_by(|a, b| compare_distance(a.1, b.1));
    distances.truncate(k);
    distances
}

fn compare_distance(a: f64, b: f64) -> Ordering {
    match (a.is_finite(), b.is_finite()) {
        (true, true) => a.total_cmp(&b),
        (true, false) => Ordering::Less,
        (false, true) => Ordering::Greater,
        (false, false) => Ordering::Equal,
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;

    use super::*;
    use crate::models::StopDetails;

    fn stop(code: &str, lat: f64, lng: f64) -> StopRecord {
        StopRecord::new(code, StopDetails::default(), Point::new(lng, lat))
    }

    #[test]
    fn test_haversine_distance() {
        // Distance from NYC to LA is approximately 3,936 km
        let nyc = Point::new(-74.0060, 40.7128);
        let la = Point::new(-118.2437, 34.0522);

        let dist = haversine_distance(nyc, la);
        assert!((dist - 3_936_000.0).abs() < 50_000.0); // Within 50km
    }

    #[test]
    fn test_one_degree_of_latitude() {
        let a = Point::new(-2.587, 51.0);
        let b = Point::new(-2.587, 52.0);

        // 2πR / 360
        assert_abs_diff_eq!(haversine_distance(a, b), 111_194.93, epsilon = 0.1);
        assert_abs_diff_eq!(haversine_distance(a, a), 0.0);
    }

    #[test]
    fn test_nearest_ties_keep_input_order() {
        let origin = Point::new(0.0, 0.0);
        let stops = vec![
            stop("east", 0.0, 0.01),
            stop("far", 1.0, 1.0),
            stop("west", 0.0, -0.01),
            stop("north", 0.01, 0.0),
        ];

        let nearest: Vec<_> = nearest_k(&stops, origin, 3)
            .into_iter()
            .map(|(stop, _)| stop.id().to_string())
            .collect();

        // At the equator all three near stops are exactly equidistant.
        assert_eq!(nearest, vec!["east", "west", "north"]);
    }

    #[test]
    fn test_non_finite_positions_sort_last() {
        let origin = Point::new(-2.587, 51.455);
        let stops = vec![stop("broken", f64::NAN, f64::NAN), stop("ok", 51.46, -2.59)];

        let nearest = nearest_k(&stops, origin, 2);
        assert_eq!(nearest[0].0.id().as_str(), "ok");
        assert_eq!(nearest[1].0.id().as_str(), "broken");
    }

    #[test]
    fn test_k_larger_than_input() {
        let stops = vec![stop("only", 51.45, -2.58)];
        assert_eq!(nearest_k(&stops, Point::new(-2.58, 51.45), 5).len(), 1);
        assert!(nearest_k(&stops, Point::new(-2.58, 51.45), 0).is_empty());
    }
}
