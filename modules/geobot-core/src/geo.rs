//! Distance and scoring.
//!
//! Distances use the spherical haversine model (mean Earth radius), not an
//! ellipsoidal geodesic. Scores computed here are therefore not comparable
//! with histories produced by an ellipsoidal implementation.

use crate::types::Coordinate;

const EARTH_RADIUS_METERS: f64 = 6_371_000.0;

/// Largest guessable distance on the default world map, in meters.
pub const WORLD_MAXDIST_METERS: f64 = 14_916_862.0;

/// Score for a perfect guess.
const FULL_SCORE: f64 = 5000.0;

/// Decay rate of the score curve, in map-scale units.
const SCORE_DECAY: f64 = 10.0;

/// Haversine great-circle distance between two coordinates in meters.
pub fn haversine_distance_meters(a: Coordinate, b: Coordinate) -> f64 {
    let d_lat = (b.latitude - a.latitude).to_radians();
    let d_lng = (b.longitude - a.longitude).to_radians();
    let lat_a = a.latitude.to_radians();
    let lat_b = b.latitude.to_radians();

    let h = (d_lat / 2.0).sin().powi(2)
        + lat_a.cos() * lat_b.cos() * (d_lng / 2.0).sin().powi(2);
    let c = 2.0 * h.sqrt().asin();
    EARTH_RADIUS_METERS * c
}

/// Score for a guess `distance_meters` away from the truth, on a map whose
/// largest distance is `maxdist`: `round(5000 * exp(-10 * d / maxdist))`.
///
/// 5000 at zero distance, strictly decreasing, asymptotes to 0 and never
/// goes negative. `maxdist` must be positive; the engine guards the setter.
pub fn guess_score(distance_meters: f64, maxdist: f64) -> i64 {
    (FULL_SCORE * (-SCORE_DECAY * distance_meters / maxdist).exp()).round() as i64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn distance_is_symmetric_and_zero_at_identity() {
        let minneapolis = Coordinate::new(44.9778, -93.2650);
        let st_paul = Coordinate::new(44.9537, -93.0900);

        assert_eq!(haversine_distance_meters(minneapolis, minneapolis), 0.0);
        assert_eq!(
            haversine_distance_meters(minneapolis, st_paul),
            haversine_distance_meters(st_paul, minneapolis)
        );

        let d = haversine_distance_meters(minneapolis, st_paul);
        assert!(d > 10_000.0 && d < 20_000.0, "Expected ~15km, got {d}m");
    }

    #[test]
    fn quarter_circumference() {
        let d = haversine_distance_meters(Coordinate::new(0.0, 0.0), Coordinate::new(0.0, 90.0));
        assert!((d - 10_007_543.0).abs() < 1.0, "got {d}");
    }

    #[test]
    fn perfect_guess_scores_full() {
        assert_eq!(guess_score(0.0, WORLD_MAXDIST_METERS), 5000);
        assert_eq!(guess_score(0.0, 1.0), 5000);
    }

    #[test]
    fn score_decreases_with_distance_and_stays_nonnegative() {
        let mut last = guess_score(0.0, WORLD_MAXDIST_METERS);
        for d in [1_000.0, 100_000.0, 1_000_000.0, 10_000_000.0, 20_000_000.0] {
            let s = guess_score(d, WORLD_MAXDIST_METERS);
            assert!(s <= last, "score rose at {d}m: {s} > {last}");
            assert!(s >= 0);
            last = s;
        }
    }

    #[test]
    fn quarter_circumference_scores_small_but_positive() {
        let s = guess_score(10_007_543.0, WORLD_MAXDIST_METERS);
        assert!(s > 0 && s < 100, "got {s}");
    }
}
