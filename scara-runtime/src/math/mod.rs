/// Planar point in the world frame.
///
/// All positions in the kinematic chain are expressed with this type. The
/// point is a plain value; it carries no orientation.
pub type Point = nalgebra::Point2<f64>;

/// Tolerance used when comparing derived positions and angles.
pub const EPSILON: f64 = 1e-9;

/// Project a point from `origin` along a heading.
///
/// The heading is given in degrees and only converted to radians for the
/// trigonometric evaluation.
#[inline]
pub fn polar(origin: &Point, length: f64, angle: f64) -> Point {
    let rad = angle.to_radians();

    Point::new(origin.x + length * rad.cos(), origin.y + length * rad.sin())
}

/// Normalize an angle in degrees into the range (-180, 180].
pub fn normalize_angle(angle: f64) -> f64 {
    let angle_normal = angle.rem_euclid(360.0);

    if angle_normal > 180.0 {
        angle_normal - 360.0
    } else {
        angle_normal
    }
}

/// Heading of the vector from `from` to `to` in degrees.
///
/// Returns `None` only if both points coincide exactly, in which case the
/// heading is undefined. Any nonzero offset, however small, has a heading.
pub fn heading(from: &Point, to: &Point) -> Option<f64> {
    let delta = to - from;

    if delta.x == 0.0 && delta.y == 0.0 {
        None
    } else {
        Some(delta.y.atan2(delta.x).to_degrees())
    }
}
