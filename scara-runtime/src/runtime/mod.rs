pub use self::controller::{Controller, MotionState};
pub use self::error::Error;

pub type Result<T = ()> = std::result::Result<T, error::Error>;

mod controller;
mod error;
