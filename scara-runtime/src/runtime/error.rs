use std::{error, fmt};

#[derive(Debug, Clone, PartialEq)]
pub enum Error {
    /// Operation is not valid in the current chain state.
    InvalidState(&'static str),
    /// Chain construction invoked out of order.
    Structural(&'static str),
    /// Target lies outside the reachable annulus of the arm.
    TargetUnreachable {
        /// Distance from the base to the target.
        distance: f64,
        /// Inner radius of the reachable annulus.
        min: f64,
        /// Outer radius of the reachable annulus.
        max: f64,
    },
    /// Input for which the solution is undefined.
    DegenerateInput(&'static str),
    /// Joint index does not exist in the chain.
    JointOutOfRange(usize),
    /// Planner step size must be positive and finite.
    InvalidStepSize(f64),
    /// Current and target angle sets differ in length.
    PlanMismatch { current: usize, target: usize },
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::InvalidState(reason) => write!(f, "invalid state: {}", reason),
            Error::Structural(reason) => write!(f, "structural error: {}", reason),
            Error::TargetUnreachable { distance, min, max } => write!(
                f,
                "target unreachable: distance {:.3} outside [{:.3}, {:.3}]",
                distance, min, max
            ),
            Error::DegenerateInput(reason) => write!(f, "degenerate input: {}", reason),
            Error::JointOutOfRange(index) => write!(f, "joint {} does not exist", index),
            Error::InvalidStepSize(step) => write!(f, "invalid step size: {}", step),
            Error::PlanMismatch { current, target } => write!(
                f,
                "plan mismatch: {} current angles, {} target angles",
                current, target
            ),
        }
    }
}

impl error::Error for Error {
    fn source(&self) -> Option<&(dyn error::Error + 'static)> {
        None
    }
}
