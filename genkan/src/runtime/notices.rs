use genkan_ipc::{BatteryLevel, MemoryLevel, SystemNotice};

use crate::core::AppContext;
use crate::event::{LifecycleEvent, SystemEvent};
use crate::platform::{SessionReporter, ToolkitShell};

use super::dispatch::dispatch_event;

/// Route a system key-value change to the registered application handler.
///
/// Memory and battery notices are gated on severity; mild readings are
/// dropped here and never reach the application. A qualifying memory
/// notice additionally triggers the runtime's own reclaim pass after the
/// handler has run.
pub(crate) fn route_notice<S: ToolkitShell, R: SessionReporter>(
    ctx: &mut AppContext,
    shell: &S,
    session: &R,
    notice: &SystemNotice,
) {
    match notice {
        SystemNotice::LowMemory { level } => {
            if *level < MemoryLevel::SoftWarning {
                tracing::debug!("Memory level {:?} below warning, ignoring", level);
                return;
            }
            run_handler(ctx, SystemEvent::LowMemory, notice);
            dispatch_event(ctx, shell, session, LifecycleEvent::MemoryFlushPost);
        }
        SystemNotice::LowBattery { level } => {
            if *level < BatteryLevel::CriticalLow {
                tracing::debug!("Battery level {:?} above critical, ignoring", level);
                return;
            }
            run_handler(ctx, SystemEvent::LowBattery, notice);
        }
        SystemNotice::LanguageChanged { .. } => {
            run_handler(ctx, SystemEvent::LanguageChanged, notice);
        }
        // Time format shares the region handler slot
        SystemNotice::RegionChanged { .. } | SystemNotice::TimeFormatChanged { .. } => {
            run_handler(ctx, SystemEvent::RegionChanged, notice);
        }
    }
}

fn run_handler(ctx: &mut AppContext, event: SystemEvent, notice: &SystemNotice) {
    match ctx.system_handlers.get_mut(&event) {
        Some(handler) => handler(notice),
        None => tracing::debug!("No handler registered for {:?}", event),
    }
}
