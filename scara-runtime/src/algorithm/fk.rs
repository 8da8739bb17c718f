use crate::math::{self, Point};

/// Forward kinematics of a two link planar arm.
pub struct ForwardKinematics {
    l1: f64,
    l2: f64,
}

impl ForwardKinematics {
    pub fn new(l1: f64, l2: f64) -> Self {
        Self { l1, l2 }
    }

    /// Elbow position relative to the base.
    pub fn elbow(&self, theta_1: f64) -> Point {
        math::polar(&Point::origin(), self.l1, theta_1)
    }

    /// Tip position relative to the base for joint angles in degrees.
    ///
    /// `theta_2` is relative to the first link.
    pub fn solve(&self, theta_1: f64, theta_2: f64) -> Point {
        math::polar(&self.elbow(theta_1), self.l2, theta_1 + theta_2)
    }
}
