use genkan_ipc::Bundle;

/// Events consumed by the lifecycle dispatcher.
///
/// Constructed by the window-event bridge (derived PAUSE/RESUME), the
/// session bridge, or the notice router; consumed synchronously and not
/// retained.
#[derive(Debug, Clone, PartialEq)]
pub enum LifecycleEvent {
    Create,
    Reset(Bundle),
    Pause,
    Resume,
    Raise,
    Lower,
    Terminate,
    TerminateBackground,
    MemoryFlush,
    MemoryFlushPost,
}

impl LifecycleEvent {
    pub fn name(&self) -> &'static str {
        match self {
            LifecycleEvent::Create => "CREATE",
            LifecycleEvent::Reset(_) => "RESET",
            LifecycleEvent::Pause => "PAUSE",
            LifecycleEvent::Resume => "RESUME",
            LifecycleEvent::Raise => "RAISE",
            LifecycleEvent::Lower => "LOWER",
            LifecycleEvent::Terminate => "TERMINATE",
            LifecycleEvent::TerminateBackground => "TERMINATE_BACKGROUND",
            LifecycleEvent::MemoryFlush => "MEMORY_FLUSH",
            LifecycleEvent::MemoryFlushPost => "MEMORY_FLUSH_POST",
        }
    }
}

/// Handler registration slots for system notices. The time-format key has
/// no slot of its own; it routes to the region handler.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SystemEvent {
    LowMemory,
    LowBattery,
    LanguageChanged,
    RegionChanged,
}
