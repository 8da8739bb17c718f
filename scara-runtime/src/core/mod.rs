pub use self::snapshot::{ChainSnapshot, LinkSnapshot};
pub use self::target::Target;

mod snapshot;
mod target;
