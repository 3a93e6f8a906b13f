use crate::core::{AppContext, WindowId};
use crate::event::LifecycleEvent;
use crate::platform::{SessionReporter, ToolkitShell};

use super::dispatch::dispatch_event;

/// Raw per-window notifications from the window system.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WindowNotice {
    Shown(WindowId),
    Hidden(WindowId),
    /// Carries whether the window is now fully obscured.
    VisibilityChanged(WindowId, bool),
}

pub(crate) fn handle_window_notice<S: ToolkitShell, R: SessionReporter>(
    ctx: &mut AppContext,
    shell: &S,
    session: &R,
    notice: WindowNotice,
) {
    match notice {
        WindowNotice::Shown(handle) => on_shown(ctx, handle),
        WindowNotice::Hidden(handle) => on_hidden(ctx, shell, session, handle),
        WindowNotice::VisibilityChanged(handle, obscured) => {
            on_visibility_changed(ctx, shell, session, handle, obscured)
        }
    }
}

/// A shown window starts (or returns to) tracking as unobscured. Duplicate
/// notifications are tolerated here even though `add_window` rejects them:
/// check first, then branch. No lifecycle event is derived from show; the
/// visibility report that follows carries the authoritative state.
fn on_shown(ctx: &mut AppContext, handle: WindowId) {
    if !ctx.tracker.contains(handle) {
        if let Err(e) = ctx.tracker.add_window(handle) {
            tracing::warn!("Failed to track window {}: {}", handle, e);
        }
    } else if let Err(e) = ctx.tracker.update_window(handle, false) {
        tracing::warn!("Failed to update window {}: {}", handle, e);
    }
}

fn on_hidden<S: ToolkitShell, R: SessionReporter>(
    ctx: &mut AppContext,
    shell: &S,
    session: &R,
    handle: WindowId,
) {
    if !ctx.tracker.contains(handle) {
        tracing::debug!("Hide for untracked window {}", handle);
        return;
    }
    if let Err(e) = ctx.tracker.remove_window(handle) {
        tracing::warn!("Failed to untrack window {}: {}", handle, e);
    }
    if !ctx.tracker.is_any_visible() && ctx.active {
        ctx.active = false;
        dispatch_event(ctx, shell, session, LifecycleEvent::Pause);
    }
}

fn on_visibility_changed<S: ToolkitShell, R: SessionReporter>(
    ctx: &mut AppContext,
    shell: &S,
    session: &R,
    handle: WindowId,
    obscured: bool,
) {
    if let Err(e) = ctx.tracker.update_window(handle, obscured) {
        tracing::warn!("Visibility report for unknown window: {}", e);
    }
    let visible = ctx.tracker.is_any_visible();
    if visible && !ctx.active {
        ctx.active = true;
        dispatch_event(ctx, shell, session, LifecycleEvent::Resume);
    } else if !visible && ctx.active {
        ctx.active = false;
        dispatch_event(ctx, shell, session, LifecycleEvent::Pause);
    }
}
