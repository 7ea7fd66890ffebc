//! Degree arithmetic shared by the kinematic model and the controllers.

/// Wraps `deg` into `[0, 360)`.
///
/// `rem_euclid` can round a tiny negative input up to exactly `360.0`, so that
/// case is folded back to zero.
#[must_use]
pub fn normalize_degrees(deg: f64) -> f64 {
    let wrapped = deg.rem_euclid(360.0);
    if wrapped >= 360.0 || wrapped.is_nan() {
        0.0
    } else {
        wrapped
    }
}

/// Wraps `deg` into `[-180, 180)`.
#[must_use]
pub fn signed_degrees(deg: f64) -> f64 {
    normalize_degrees(deg + 180.0) - 180.0
}
