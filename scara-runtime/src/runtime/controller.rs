use crate::algorithm::{self, StepSequence};
use crate::core::Target;
use crate::robot::Chain;

use super::{Error, Result};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MotionState {
    /// No plan was ever installed.
    Idle,
    /// A plan is installed but not yet ticked.
    Planning,
    /// At least one joint has steps left.
    InMotion,
    /// Every joint has reached the end of its sequence.
    Complete,
}

/// Tick driven motion controller.
///
/// The controller owns the chain and advances every joint by at most one
/// step per [`Controller::tick`]. Installing a new plan replaces the active
/// one outright; the remainder of the previous plan is dropped without any
/// blending.
pub struct Controller {
    chain: Chain,
    step_size: f64,
    sequences: Vec<StepSequence>,
    state: MotionState,
}

impl Controller {
    /// Construct a controller with a uniform step size in degrees per tick.
    pub fn new(chain: Chain, step_size: f64) -> Result<Self> {
        if !(step_size.is_finite() && step_size > 0.0) {
            return Err(Error::InvalidStepSize(step_size));
        }

        Ok(Self {
            chain,
            step_size,
            sequences: Vec::new(),
            state: MotionState::Idle,
        })
    }

    #[inline]
    pub fn chain(&self) -> &Chain {
        &self.chain
    }

    /// Mutable access to the chain, for example to relocate the base.
    ///
    /// The chain must not be restructured while a plan is active.
    #[inline]
    pub fn chain_mut(&mut self) -> &mut Chain {
        &mut self.chain
    }

    pub fn into_chain(self) -> Chain {
        self.chain
    }

    #[inline]
    pub fn state(&self) -> MotionState {
        self.state
    }

    #[inline]
    pub fn step_size(&self) -> f64 {
        self.step_size
    }

    pub fn is_complete(&self) -> bool {
        matches!(self.state, MotionState::Idle | MotionState::Complete)
    }

    /// Number of ticks left in the active plan.
    pub fn remaining(&self) -> usize {
        self.sequences
            .iter()
            .map(StepSequence::len)
            .max()
            .unwrap_or(0)
    }

    /// Install a plan toward the local joint angles in degrees.
    ///
    /// There must be one target angle per link in the chain.
    pub fn plan(&mut self, target: &[f64]) -> Result {
        let current = self.chain.local_angles();
        let sequences = algorithm::plan(&current, target, self.step_size)?;

        let abandoned = self.remaining();
        if abandoned > 0 {
            log::warn!("Retarget abandons {} remaining steps", abandoned);
        }

        self.sequences = sequences;
        self.state = MotionState::Planning;

        log::debug!(
            "Planned motion from {:?} to {:?} in {} ticks",
            current,
            target,
            self.remaining()
        );

        Ok(())
    }

    /// Solve and plan the motion of a two link chain toward a world point.
    ///
    /// The target is expressed relative to the base before solving. On
    /// success the solved joint angles are returned. On failure the active
    /// plan is left untouched.
    pub fn move_to(&mut self, target: &Target) -> Result<(f64, f64)> {
        let (l1, l2) = match self.chain.link_lengths()[..] {
            [l1, l2] => (l1, l2),
            _ => {
                return Err(Error::Structural(
                    "inverse kinematics requires a two link chain",
                ))
            }
        };

        let base = self
            .chain
            .base_point()
            .ok_or(Error::InvalidState("no base attached"))?;
        let local = target.relative_to(&base);

        let (theta_1, theta_2) = algorithm::solve(local.x, local.y, l1, l2)?;

        self.plan(&[theta_1, theta_2])?;

        log::info!(
            "Moving to {} with theta_1: {:5.2}° theta_2: {:5.2}°",
            target,
            theta_1,
            theta_2
        );

        Ok((theta_1, theta_2))
    }

    /// Advance every joint by one step.
    ///
    /// Returns `true` once every sequence is drained. Further calls are a
    /// no-op and keep returning `true`.
    pub fn tick(&mut self) -> bool {
        if self.is_complete() {
            return true;
        }

        for (index, sequence) in self.sequences.iter_mut().enumerate() {
            if let Some(angle) = sequence.next() {
                // Joints are never removed, so every planned index stays valid.
                let result = self.chain.rotate_joint(index, angle);
                debug_assert!(result.is_ok(), "planned joint {} vanished", index);
            }
        }

        log::trace!("Tick {:?}", self.chain);

        if self.sequences.iter().all(StepSequence::is_empty) {
            self.state = MotionState::Complete;
            log::debug!("Motion complete at {}", self.chain);
            true
        } else {
            self.state = MotionState::InMotion;
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::Point;
    use crate::robot::ChainBuilder;

    fn two_link_controller(base: Point) -> Controller {
        let chain = ChainBuilder::planar_arm(base, &[(80.0, 0.0), (40.0, 0.0)])
            .build()
            .unwrap();

        Controller::new(chain, 1.0).unwrap()
    }

    #[test]
    fn test_idle_tick() {
        let mut controller = two_link_controller(Point::origin());

        assert_eq!(controller.state(), MotionState::Idle);
        assert!(controller.tick());
        assert_eq!(controller.state(), MotionState::Idle);
    }

    #[test]
    fn test_tick_completes_on_longest_sequence() {
        let mut controller = two_link_controller(Point::origin());

        controller.plan(&[3.2, -2.7]).unwrap();
        assert_eq!(controller.state(), MotionState::Planning);
        assert_eq!(controller.remaining(), 3);

        assert!(!controller.tick());
        assert_eq!(controller.state(), MotionState::InMotion);
        assert!(!controller.tick());
        assert!(controller.tick());
        assert_eq!(controller.state(), MotionState::Complete);

        assert_eq!(controller.chain().local_angles(), vec![3.0, -2.0]);

        let snapshot = controller.chain().snapshot();
        assert!(controller.tick());
        assert_eq!(controller.chain().snapshot(), snapshot);
    }

    #[test]
    fn test_empty_plan() {
        let mut controller = two_link_controller(Point::origin());

        controller.plan(&[0.5, -0.5]).unwrap();
        assert_eq!(controller.remaining(), 0);
        assert!(controller.tick());
        assert_eq!(controller.state(), MotionState::Complete);
    }

    #[test]
    fn test_plan_mismatch() {
        let mut controller = two_link_controller(Point::origin());

        assert!(matches!(
            controller.plan(&[1.0]),
            Err(Error::PlanMismatch { .. })
        ));
        assert_eq!(controller.state(), MotionState::Idle);
    }

    #[test]
    fn test_retarget_replaces_plan() {
        let mut controller = two_link_controller(Point::origin());

        controller.plan(&[10.0, 10.0]).unwrap();
        assert!(!controller.tick());
        assert!(!controller.tick());

        controller.plan(&[0.0, 0.0]).unwrap();
        assert_eq!(controller.remaining(), 2);
        assert!(!controller.tick());
        assert!(controller.tick());
        assert_eq!(controller.chain().local_angles(), vec![0.0, 0.0]);
    }

    #[test]
    fn test_move_to() {
        let mut controller = two_link_controller(Point::new(30.0, 105.0));
        let target = Target::from_point(100.0, 50.0);

        let (theta_1, theta_2) = controller.move_to(&target).unwrap();
        let ticks = controller.remaining();

        for _ in 1..ticks {
            assert!(!controller.tick());
        }
        assert!(controller.tick());

        let angles = controller.chain().local_angles();
        assert!((angles[0] - theta_1).abs() < 1.0);
        assert!((angles[1] - theta_2).abs() < 1.0);

        let mut chain = controller.into_chain();
        chain.rotate_joint(0, theta_1).unwrap();
        chain.rotate_joint(1, theta_2).unwrap();

        let tip = chain.end_effector_point().unwrap();
        assert!((tip.x - 100.0).abs() < 1e-6);
        assert!((tip.y - 50.0).abs() < 1e-6);
    }

    #[test]
    fn test_move_to_unreachable() {
        let mut controller = two_link_controller(Point::origin());

        controller.plan(&[5.0, 5.0]).unwrap();
        assert!(matches!(
            controller.move_to(&Target::from_point(500.0, 0.0)),
            Err(Error::TargetUnreachable { .. })
        ));
        assert_eq!(controller.remaining(), 5);
        assert_eq!(controller.state(), MotionState::Planning);
    }

    #[test]
    fn test_move_to_requires_two_links() {
        let chain = ChainBuilder::planar_arm(
            Point::origin(),
            &[(80.0, 0.0), (40.0, 0.0), (20.0, 0.0)],
        )
        .build()
        .unwrap();
        let mut controller = Controller::new(chain, 0.5).unwrap();

        assert!(matches!(
            controller.move_to(&Target::from_point(50.0, 50.0)),
            Err(Error::Structural(_))
        ));
    }

    #[test]
    fn test_tick_after_extending_chain() {
        let chain = ChainBuilder::new()
            .base(Point::origin())
            .link(10.0, 0.0)
            .build()
            .unwrap();
        let mut controller = Controller::new(chain, 1.0).unwrap();

        controller.plan(&[3.0]).unwrap();
        assert!(!controller.tick());

        let chain = controller.chain_mut();
        chain.append_joint().unwrap();
        chain.append_link(5.0, 0.0).unwrap();

        assert!(!controller.tick());
        assert!(controller.tick());
        assert_eq!(controller.chain().local_angles(), vec![3.0, 0.0]);
    }

    #[test]
    fn test_invalid_step_size() {
        let chain = ChainBuilder::planar_arm(Point::origin(), &[(1.0, 0.0)])
            .build()
            .unwrap();

        assert!(matches!(
            Controller::new(chain, 0.0),
            Err(Error::InvalidStepSize(_))
        ));
    }
}
