use crate::math::Point;
use crate::runtime::{Error, Result};

use super::Chain;

/// Sequential chain construction.
///
/// Every step is applied to the chain immediately. The first failing step
/// is recorded and all later steps are skipped, so the error surfaces from
/// [`ChainBuilder::build`].
///
/// ```
/// use scara::math::Point;
/// use scara::robot::ChainBuilder;
///
/// let chain = ChainBuilder::new()
///     .base(Point::origin())
///     .link(80.0, 0.0)
///     .joint()
///     .link(40.0, 0.0)
///     .end_effector()
///     .build()
///     .unwrap();
///
/// assert_eq!(chain.links().len(), 2);
/// ```
#[derive(Default)]
pub struct ChainBuilder {
    chain: Chain,
    error: Option<Error>,
}

impl ChainBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build an arm from a list of `(length, local angle)` pairs.
    ///
    /// Links are connected by actuated joints and the last link carries
    /// the end effector.
    pub fn planar_arm(base: Point, links: &[(f64, f64)]) -> Self {
        let mut builder = Self::new().base(base);

        for (index, (length, angle)) in links.iter().enumerate() {
            if index > 0 {
                builder = builder.joint();
            }
            builder = builder.link(*length, *angle);
        }

        builder.end_effector()
    }

    pub fn base(self, point: Point) -> Self {
        self.apply(|chain| chain.attach_base(point).map(|_| ()))
    }

    pub fn link(self, length: f64, local_angle: f64) -> Self {
        self.apply(|chain| chain.append_link(length, local_angle).map(|_| ()))
    }

    pub fn joint(self) -> Self {
        self.apply(|chain| chain.append_joint().map(|_| ()))
    }

    pub fn end_effector(self) -> Self {
        self.apply(|chain| chain.append_end_effector().map(|_| ()))
    }

    pub fn build(self) -> Result<Chain> {
        match self.error {
            Some(error) => Err(error),
            None => Ok(self.chain),
        }
    }

    fn apply<F>(mut self, step: F) -> Self
    where
        F: FnOnce(&mut Chain) -> Result,
    {
        if self.error.is_none() {
            if let Err(error) = step(&mut self.chain) {
                log::debug!("Chain construction failed: {}", error);
                self.error = Some(error);
            }
        }
        self
    }
}
