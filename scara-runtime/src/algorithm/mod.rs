pub use self::fk::ForwardKinematics;
pub use self::ik::{solve, InverseKinematics};
pub use self::planner::{plan, plan_per_joint, StepSequence};

mod fk;
mod ik;
mod planner;
