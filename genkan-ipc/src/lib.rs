pub mod bundle;
pub mod notice;
pub mod request;

pub use bundle::Bundle;
pub use notice::{BatteryLevel, MemoryLevel, SystemNotice};
pub use request::{AppStatus, LaunchReply, LaunchRequest};
