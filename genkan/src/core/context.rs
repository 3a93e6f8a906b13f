use std::collections::HashMap;

use genkan_ipc::{Bundle, SystemNotice};

use crate::core::{FlushTimer, Phase, VisibilityTracker};
use crate::event::SystemEvent;
use crate::ops::AppOps;
use crate::rotation::RotationRouter;

pub(crate) type SystemHandler = Box<dyn FnMut(&SystemNotice)>;
pub(crate) type OpenHandler = Box<dyn FnMut() -> anyhow::Result<()>>;

/// All mutable lifecycle state, owned by the runtime and passed by
/// reference to every handler. Only the main loop thread touches it.
pub struct AppContext {
    pub name: String,
    pub(crate) phase: Phase,
    pub(crate) tracker: VisibilityTracker,
    pub(crate) flush_timer: FlushTimer,
    pub(crate) rotation: RotationRouter,
    pub(crate) ops: Box<dyn AppOps>,
    /// Launch payload buffered at startup until the first RESET delivers
    /// it; discarded when a visibility-driven RESUME overtakes that RESET.
    pub(crate) pending_reset: Option<Bundle>,
    pub(crate) first_reset_done: bool,
    /// Edge-detection flag for aggregate visibility: true between a
    /// false→true flip and the matching true→false flip.
    pub(crate) active: bool,
    pub(crate) reclaiming: bool,
    pub(crate) system_handlers: HashMap<SystemEvent, SystemHandler>,
    pub(crate) open_handler: Option<OpenHandler>,
}

impl AppContext {
    pub fn new(name: impl Into<String>, ops: Box<dyn AppOps>) -> Self {
        Self {
            name: name.into(),
            phase: Phase::None,
            tracker: VisibilityTracker::new(),
            flush_timer: FlushTimer::new(),
            rotation: RotationRouter::new(),
            ops,
            pending_reset: None,
            first_reset_done: false,
            active: false,
            reclaiming: true,
            system_handlers: HashMap::new(),
            open_handler: None,
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn tracker(&self) -> &VisibilityTracker {
        &self.tracker
    }

    pub fn rotation_mut(&mut self) -> &mut RotationRouter {
        &mut self.rotation
    }

    pub(crate) fn set_phase(&mut self, next: Phase) {
        if self.phase != next {
            tracing::info!("State: {} -> {}", self.phase.name(), next.name());
            self.phase = next;
        }
    }
}
