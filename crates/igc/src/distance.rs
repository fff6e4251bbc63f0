//! Great-circle distances.

/// Mean Earth radius used by the haversine formula.
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// Haversine distance between two points given in decimal degrees, in km.
pub fn haversine_km(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let (phi1, phi2) = (lat1.to_radians(), lat2.to_radians());
    let d_phi = (lat2 - lat1).to_radians();
    let d_lambda = (lon2 - lon1).to_radians();

    let a = (d_phi / 2.0).sin().powi(2)
        + phi1.cos() * phi2.cos() * (d_lambda / 2.0).sin().powi(2);
    2.0 * EARTH_RADIUS_KM * a.sqrt().min(1.0).asin()
}

/// Sum of the distances between consecutive `(lat, lon)` points.
/// Zero for fewer than two points.
pub fn track_length_km(points: &[(f64, f64)]) -> f64 {
    points
        .windows(2)
        .map(|pair| haversine_km(pair[0].0, pair[0].1, pair[1].0, pair[1].1))
        .sum()
}
