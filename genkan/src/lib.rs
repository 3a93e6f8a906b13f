pub mod core;
pub mod event;
pub mod ops;
pub mod platform;
pub mod rotation;
pub mod runtime;
pub mod session;

pub use crate::core::{
    AppContext, FlushTimer, Phase, VisibilityTracker, WindowError, WindowId, FLUSH_DELAY,
};
pub use crate::event::{LifecycleEvent, SystemEvent};
pub use crate::ops::AppOps;
pub use crate::platform::{LogReporter, ProcessShell, SessionReporter, ToolkitShell};
pub use crate::rotation::{Orientation, RotationRouter};
pub use crate::runtime::{run_app, Runtime, RuntimeHandle, StartError, WindowNotice};
pub use crate::session::{socket_path, SessionClient, SessionServer};

pub use genkan_ipc::{
    AppStatus, BatteryLevel, Bundle, LaunchReply, LaunchRequest, MemoryLevel, SystemNotice,
};
