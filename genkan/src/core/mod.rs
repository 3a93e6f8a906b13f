mod context;
mod phase;
mod reclaim;
mod visibility;

pub use context::*;
pub use phase::*;
pub use reclaim::*;
pub use visibility::*;
