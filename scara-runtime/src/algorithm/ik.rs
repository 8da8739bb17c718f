use crate::math::{self, Point};
use crate::runtime::{Error, Result};

/// Inverse kinematics of a two link planar arm.
///
/// The solver always returns the elbow configuration with a negative
/// second joint angle.
pub struct InverseKinematics {
    l1: f64,
    l2: f64,
}

impl InverseKinematics {
    pub fn new(l1: f64, l2: f64) -> Self {
        Self { l1, l2 }
    }

    /// Inner and outer radius of the reachable annulus.
    pub fn reach(&self) -> (f64, f64) {
        ((self.l1 - self.l2).abs(), self.l1 + self.l2)
    }

    pub fn is_reachable(&self, target: &Point) -> bool {
        let (min, max) = self.reach();
        let distance = target.coords.norm();

        distance >= min && distance <= max
    }

    /// Solve the joint angles in degrees for a target relative to the base.
    pub fn solve(&self, target: &Point) -> Result<(f64, f64)> {
        solve(target.x, target.y, self.l1, self.l2)
    }
}

/// Solve the joint angles in degrees for a target relative to the base.
///
/// The first angle is the heading of the first link, the second angle is
/// relative to the first link.
pub fn solve(target_x: f64, target_y: f64, l1: f64, l2: f64) -> Result<(f64, f64)> {
    if !(l1.is_finite() && l1 > 0.0 && l2.is_finite() && l2 > 0.0) {
        return Err(Error::DegenerateInput("link lengths must be positive"));
    }
    if !(target_x.is_finite() && target_y.is_finite()) {
        return Err(Error::DegenerateInput("target must be finite"));
    }

    let c2 = (target_x.powi(2) + target_y.powi(2) - l1.powi(2) - l2.powi(2)) / (2.0 * l1 * l2);

    if c2.abs() > 1.0 {
        let distance = target_x.hypot(target_y);
        log::debug!("IK target distance {:.2} out of reach", distance);

        return Err(Error::TargetUnreachable {
            distance,
            min: (l1 - l2).abs(),
            max: l1 + l2,
        });
    }

    let target = Point::new(target_x, target_y);
    let gamma = math::heading(&Point::origin(), &target)
        .ok_or(Error::DegenerateInput("target coincides with the base"))?;

    let theta_2 = -c2.acos();
    let beta = (l2 * theta_2.sin()).atan2(l1 + l2 * theta_2.cos());
    let theta_1 = gamma - beta.to_degrees();

    log::debug!(
        "IK ({:.2}, {:.2}) theta_1: {:5.2}° theta_2: {:5.2}°",
        target_x,
        target_y,
        theta_1,
        theta_2.to_degrees()
    );

    Ok((theta_1, theta_2.to_degrees()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::algorithm::ForwardKinematics;
    use rand::Rng;

    fn assert_round_trip(x: f64, y: f64, l1: f64, l2: f64) {
        let (theta_1, theta_2) = solve(x, y, l1, l2).unwrap();
        let point = ForwardKinematics::new(l1, l2).solve(theta_1, theta_2);

        assert!(
            (point.x - x).abs() < 1e-6 && (point.y - y).abs() < 1e-6,
            "({}, {}) -> ({}, {})",
            x,
            y,
            point.x,
            point.y
        );
    }

    #[test]
    fn test_reachable_target() {
        let ik = InverseKinematics::new(80.0, 40.0);
        let target = Point::new(70.0, -55.0);

        assert_eq!(ik.reach(), (40.0, 120.0));
        assert!(ik.is_reachable(&target));

        let (theta_1, theta_2) = ik.solve(&target).unwrap();
        assert!(theta_2 < 0.0);

        let point = ForwardKinematics::new(80.0, 40.0).solve(theta_1, theta_2);
        assert!((point.x - 70.0).abs() < 1e-6);
        assert!((point.y + 55.0).abs() < 1e-6);
    }

    #[test]
    fn test_axis_targets() {
        assert_round_trip(0.0, 100.0, 80.0, 40.0);
        assert_round_trip(0.0, -100.0, 80.0, 40.0);
        assert_round_trip(-100.0, 0.0, 80.0, 40.0);
        assert_round_trip(-60.0, 30.0, 80.0, 40.0);
    }

    #[test]
    fn test_full_extension() {
        let (theta_1, theta_2) = solve(120.0, 0.0, 80.0, 40.0).unwrap();

        assert!(theta_1.abs() < 1e-9);
        assert!(theta_2.abs() < 1e-9);
    }

    #[test]
    fn test_random_round_trip() {
        let mut rng = rand::thread_rng();

        for _ in 0..1_000 {
            let l1 = rng.gen_range(1.0f64..100.0);
            let l2 = rng.gen_range(1.0f64..100.0);

            let min = (l1 - l2).abs();
            let max = l1 + l2;
            let margin = (max - min) * 0.01;

            let radius = rng.gen_range((min + margin).max(1e-3)..(max - margin));
            let angle: f64 = rng.gen_range(-180.0..180.0);

            let x = radius * angle.to_radians().cos();
            let y = radius * angle.to_radians().sin();

            assert_round_trip(x, y, l1, l2);
        }
    }

    #[test]
    fn test_unreachable() {
        assert_eq!(
            solve(200.0, 0.0, 80.0, 40.0),
            Err(Error::TargetUnreachable {
                distance: 200.0,
                min: 40.0,
                max: 120.0
            })
        );
        assert!(matches!(
            solve(10.0, 10.0, 80.0, 40.0),
            Err(Error::TargetUnreachable { .. })
        ));
        assert!(matches!(
            solve(0.0, 0.0, 80.0, 40.0),
            Err(Error::TargetUnreachable { .. })
        ));
    }

    #[test]
    fn test_near_base_equal_links() {
        assert_round_trip(1e-10, 0.0, 50.0, 50.0);
        assert_round_trip(0.0, -1e-7, 50.0, 50.0);
    }

    #[test]
    fn test_degenerate() {
        assert!(matches!(
            solve(0.0, 0.0, 50.0, 50.0),
            Err(Error::DegenerateInput(_))
        ));
        assert!(matches!(
            solve(-0.0, 0.0, 50.0, 50.0),
            Err(Error::DegenerateInput(_))
        ));
        assert!(matches!(
            solve(10.0, 0.0, 0.0, 50.0),
            Err(Error::DegenerateInput(_))
        ));
        assert!(matches!(
            solve(f64::NAN, 0.0, 50.0, 50.0),
            Err(Error::DegenerateInput(_))
        ));
    }
}
