use std::time::Instant;

use genkan_ipc::AppStatus;

use crate::core::{AppContext, Phase};
use crate::event::LifecycleEvent;
use crate::platform::{SessionReporter, ToolkitShell};

/// Central lifecycle dispatcher. Runs one event to completion against the
/// context; all side effects go through the shell and reporter seams.
///
/// The ordering here is load-bearing: flush events pre-empt everything and
/// never touch the timer; every other event cancels a pending flush timer
/// unless it is a PAUSE arriving while already PAUSED (a flapping
/// visibility signal must not keep re-arming the flush).
pub(crate) fn dispatch_event<S: ToolkitShell, R: SessionReporter>(
    ctx: &mut AppContext,
    shell: &S,
    session: &R,
    event: LifecycleEvent,
) {
    tracing::debug!("Event: {} State: {}", event.name(), ctx.phase().name());

    if ctx.phase() == Phase::Dying {
        tracing::warn!("Dropping {} in DYING state", event.name());
        return;
    }

    if event == LifecycleEvent::MemoryFlush {
        shell.flush_caches();
        return;
    }

    if event == LifecycleEvent::MemoryFlushPost {
        if ctx.phase() == Phase::Paused {
            flush_memory(shell);
        } else {
            shell.trim_memory();
        }
        return;
    }

    if !(ctx.phase() == Phase::Paused && event == LifecycleEvent::Pause) {
        ctx.flush_timer.disarm();
    }

    if event == LifecycleEvent::Terminate {
        do_terminate(ctx, shell, session);
        return;
    }

    if event == LifecycleEvent::TerminateBackground {
        if ctx.phase() == Phase::Paused {
            do_terminate(ctx, shell, session);
        } else {
            tracing::debug!(
                "Ignoring TERMINATE_BACKGROUND in {} state",
                ctx.phase().name()
            );
        }
        return;
    }

    match event {
        LifecycleEvent::Create => {
            tracing::info!("Creating application: {}", ctx.name);
            match ctx.ops.create() {
                Ok(()) => ctx.set_phase(Phase::Created),
                Err(e) => tracing::error!("Create callback failed: {:#}", e),
            }
        }
        LifecycleEvent::Reset(bundle) => {
            if !matches!(ctx.phase(), Phase::Created | Phase::Running | Phase::Paused) {
                tracing::warn!("Ignoring RESET in {} state", ctx.phase().name());
                return;
            }
            tracing::info!("Resetting with {} payload entries", bundle.len());
            // Any still-buffered launch payload is superseded by this reset
            ctx.pending_reset = None;
            if let Err(e) = ctx.ops.reset(&bundle) {
                tracing::warn!("Reset callback failed: {:#}", e);
            }
            let first = !ctx.first_reset_done;
            ctx.first_reset_done = true;
            ctx.set_phase(Phase::Running);
            if !first {
                shell.raise_window();
            }
        }
        LifecycleEvent::Pause => {
            if ctx.phase() == Phase::Running {
                tracing::info!("Pausing");
                let ok = match ctx.ops.pause() {
                    Ok(()) => true,
                    Err(e) => {
                        tracing::warn!("Pause callback failed: {:#}", e);
                        false
                    }
                };
                ctx.set_phase(Phase::Paused);
                if ok && ctx.reclaiming {
                    ctx.flush_timer.arm(Instant::now());
                }
            }
            ctx.rotation.pause();
            session.report(AppStatus::Background);
        }
        LifecycleEvent::Resume => {
            if matches!(ctx.phase(), Phase::Paused | Phase::Created) {
                tracing::info!("Resuming");
                if ctx.phase() == Phase::Created {
                    // A window became visible before the buffered launch was
                    // processed; the payload is stale.
                    ctx.pending_reset = None;
                }
                if let Err(e) = ctx.ops.resume() {
                    tracing::warn!("Resume callback failed: {:#}", e);
                }
                ctx.set_phase(Phase::Running);
            }
            ctx.rotation.resume();
            session.report(AppStatus::Foreground);
        }
        LifecycleEvent::Raise => shell.raise_window(),
        LifecycleEvent::Lower => shell.lower_window(),
        LifecycleEvent::Terminate
        | LifecycleEvent::TerminateBackground
        | LifecycleEvent::MemoryFlush
        | LifecycleEvent::MemoryFlushPost => unreachable!("handled above"),
    }
}

fn do_terminate<S: ToolkitShell, R: SessionReporter>(
    ctx: &mut AppContext,
    shell: &S,
    session: &R,
) {
    tracing::info!("Terminating");
    ctx.set_phase(Phase::Dying);
    session.report(AppStatus::Dying);
    shell.request_exit();
}

/// Full working-set flush: toolkit caches first, then the allocator.
/// Used by the flush timer and by MEMORY_FLUSH_POST while paused.
pub(crate) fn flush_memory<S: ToolkitShell>(shell: &S) {
    tracing::info!("Flushing memory");
    shell.flush_caches();
    shell.trim_memory();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ops::AppOps;
    use crate::platform::mock::{MockReporter, MockShell, ShellCall};
    use anyhow::bail;
    use genkan_ipc::Bundle;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
    struct CallCounts {
        create: usize,
        reset: usize,
        pause: usize,
        resume: usize,
        terminate: usize,
    }

    struct RecordingOps {
        counts: Rc<RefCell<CallCounts>>,
        fail_create: bool,
        fail_pause: bool,
    }

    impl AppOps for RecordingOps {
        fn create(&mut self) -> anyhow::Result<()> {
            self.counts.borrow_mut().create += 1;
            if self.fail_create {
                bail!("create refused");
            }
            Ok(())
        }

        fn reset(&mut self, _payload: &Bundle) -> anyhow::Result<()> {
            self.counts.borrow_mut().reset += 1;
            Ok(())
        }

        fn pause(&mut self) -> anyhow::Result<()> {
            self.counts.borrow_mut().pause += 1;
            if self.fail_pause {
                bail!("pause refused");
            }
            Ok(())
        }

        fn resume(&mut self) -> anyhow::Result<()> {
            self.counts.borrow_mut().resume += 1;
            Ok(())
        }

        fn terminate(&mut self) -> anyhow::Result<()> {
            self.counts.borrow_mut().terminate += 1;
            Ok(())
        }
    }

    struct TestBench {
        ctx: AppContext,
        shell: MockShell,
        session: MockReporter,
        counts: Rc<RefCell<CallCounts>>,
    }

    impl TestBench {
        fn dispatch(&mut self, event: LifecycleEvent) {
            dispatch_event(&mut self.ctx, &self.shell, &self.session, event);
        }

        fn counts(&self) -> CallCounts {
            *self.counts.borrow()
        }
    }

    fn setup() -> TestBench {
        setup_with(false, false)
    }

    fn setup_with(fail_create: bool, fail_pause: bool) -> TestBench {
        let counts = Rc::new(RefCell::new(CallCounts::default()));
        let ops = RecordingOps {
            counts: counts.clone(),
            fail_create,
            fail_pause,
        };
        TestBench {
            ctx: AppContext::new("testapp", Box::new(ops)),
            shell: MockShell::new(),
            session: MockReporter::new(),
            counts,
        }
    }

    fn to_running(bench: &mut TestBench) {
        bench.dispatch(LifecycleEvent::Create);
        bench.dispatch(LifecycleEvent::Reset(Bundle::new()));
        assert_eq!(bench.ctx.phase(), Phase::Running);
    }

    #[test]
    fn test_create_advances_to_created() {
        let mut bench = setup();
        bench.dispatch(LifecycleEvent::Create);
        assert_eq!(bench.ctx.phase(), Phase::Created);
        assert_eq!(bench.counts().create, 1);
    }

    #[test]
    fn test_create_failure_leaves_phase_untouched() {
        let mut bench = setup_with(true, false);
        bench.dispatch(LifecycleEvent::Create);
        assert_eq!(bench.ctx.phase(), Phase::None);
        assert_eq!(bench.counts().create, 1);
    }

    #[test]
    fn test_first_reset_runs_without_raise() {
        let mut bench = setup();
        bench.dispatch(LifecycleEvent::Create);
        let mut bundle = Bundle::new();
        bundle.insert("uri", "file:///a");
        bench.dispatch(LifecycleEvent::Reset(bundle));
        assert_eq!(bench.ctx.phase(), Phase::Running);
        assert_eq!(bench.counts().reset, 1);
        assert_eq!(bench.shell.count(ShellCall::Raise), 0);
    }

    #[test]
    fn test_subsequent_reset_raises_window() {
        let mut bench = setup();
        to_running(&mut bench);
        bench.dispatch(LifecycleEvent::Reset(Bundle::new()));
        assert_eq!(bench.ctx.phase(), Phase::Running);
        assert_eq!(bench.counts().reset, 2);
        assert_eq!(bench.shell.count(ShellCall::Raise), 1);
    }

    #[test]
    fn test_reset_before_create_is_ignored() {
        let mut bench = setup();
        bench.dispatch(LifecycleEvent::Reset(Bundle::new()));
        assert_eq!(bench.ctx.phase(), Phase::None);
        assert_eq!(bench.counts().reset, 0);
    }

    #[test]
    fn test_pause_from_running_arms_timer() {
        let mut bench = setup();
        to_running(&mut bench);
        bench.dispatch(LifecycleEvent::Pause);
        assert_eq!(bench.ctx.phase(), Phase::Paused);
        assert_eq!(bench.counts().pause, 1);
        assert!(bench.ctx.flush_timer.is_armed());
        assert_eq!(bench.session.last(), Some(AppStatus::Background));
    }

    #[test]
    fn test_pause_failure_skips_timer_but_advances() {
        let mut bench = setup_with(false, true);
        to_running(&mut bench);
        bench.dispatch(LifecycleEvent::Pause);
        assert_eq!(bench.ctx.phase(), Phase::Paused);
        assert!(!bench.ctx.flush_timer.is_armed());
    }

    #[test]
    fn test_pause_with_reclaiming_disabled_skips_timer() {
        let mut bench = setup();
        bench.ctx.reclaiming = false;
        to_running(&mut bench);
        bench.dispatch(LifecycleEvent::Pause);
        assert_eq!(bench.ctx.phase(), Phase::Paused);
        assert!(!bench.ctx.flush_timer.is_armed());
    }

    #[test]
    fn test_pause_outside_running_still_reports_background() {
        let mut bench = setup();
        bench.dispatch(LifecycleEvent::Create);
        bench.dispatch(LifecycleEvent::Pause);
        assert_eq!(bench.ctx.phase(), Phase::Created);
        assert_eq!(bench.counts().pause, 0);
        assert_eq!(bench.session.statuses(), vec![AppStatus::Background]);
    }

    #[test]
    fn test_resume_disarms_timer_and_reports_foreground() {
        let mut bench = setup();
        to_running(&mut bench);
        bench.dispatch(LifecycleEvent::Pause);
        assert!(bench.ctx.flush_timer.is_armed());
        bench.dispatch(LifecycleEvent::Resume);
        assert_eq!(bench.ctx.phase(), Phase::Running);
        assert_eq!(bench.counts().resume, 1);
        assert!(!bench.ctx.flush_timer.is_armed());
        assert_eq!(bench.session.last(), Some(AppStatus::Foreground));
    }

    #[test]
    fn test_resume_from_created_discards_buffered_payload() {
        let mut bench = setup();
        bench.dispatch(LifecycleEvent::Create);
        bench.ctx.pending_reset = Some(Bundle::from_argv(&[
            "uri".to_string(),
            "file:///stale".to_string(),
        ]));
        bench.dispatch(LifecycleEvent::Resume);
        assert_eq!(bench.ctx.phase(), Phase::Running);
        assert_eq!(bench.counts().resume, 1);
        assert_eq!(bench.ctx.pending_reset, None);
    }

    #[test]
    fn test_resume_while_running_skips_callback() {
        let mut bench = setup();
        to_running(&mut bench);
        bench.dispatch(LifecycleEvent::Resume);
        assert_eq!(bench.ctx.phase(), Phase::Running);
        assert_eq!(bench.counts().resume, 0);
        // The session manager is still told we are foreground
        assert_eq!(bench.session.last(), Some(AppStatus::Foreground));
    }

    #[test]
    fn test_pause_while_paused_keeps_timer_armed() {
        let mut bench = setup();
        to_running(&mut bench);
        bench.dispatch(LifecycleEvent::Pause);
        let deadline = bench.ctx.flush_timer.fires_at();
        assert!(deadline.is_some());
        bench.dispatch(LifecycleEvent::Pause);
        assert_eq!(bench.ctx.flush_timer.fires_at(), deadline);
        // Second pause never re-enters the callback
        assert_eq!(bench.counts().pause, 1);
    }

    #[test]
    fn test_other_events_cancel_pending_timer() {
        let mut bench = setup();
        to_running(&mut bench);
        bench.dispatch(LifecycleEvent::Pause);
        assert!(bench.ctx.flush_timer.is_armed());
        bench.dispatch(LifecycleEvent::Raise);
        assert!(!bench.ctx.flush_timer.is_armed());
        assert_eq!(bench.shell.count(ShellCall::Raise), 1);
    }

    #[test]
    fn test_memory_flush_leaves_timer_alone() {
        let mut bench = setup();
        to_running(&mut bench);
        bench.dispatch(LifecycleEvent::Pause);
        assert!(bench.ctx.flush_timer.is_armed());
        bench.dispatch(LifecycleEvent::MemoryFlush);
        assert!(bench.ctx.flush_timer.is_armed());
        assert_eq!(bench.shell.count(ShellCall::FlushCaches), 1);
        assert_eq!(bench.shell.count(ShellCall::TrimMemory), 0);
        assert_eq!(bench.ctx.phase(), Phase::Paused);
    }

    #[test]
    fn test_memory_flush_post_while_paused_is_a_full_flush() {
        let mut bench = setup();
        to_running(&mut bench);
        bench.dispatch(LifecycleEvent::Pause);
        bench.dispatch(LifecycleEvent::MemoryFlushPost);
        assert_eq!(bench.shell.count(ShellCall::FlushCaches), 1);
        assert_eq!(bench.shell.count(ShellCall::TrimMemory), 1);
        assert!(bench.ctx.flush_timer.is_armed());
        assert_eq!(bench.ctx.phase(), Phase::Paused);
    }

    #[test]
    fn test_memory_flush_post_in_foreground_only_trims() {
        let mut bench = setup();
        to_running(&mut bench);
        bench.dispatch(LifecycleEvent::MemoryFlushPost);
        assert_eq!(bench.shell.count(ShellCall::FlushCaches), 0);
        assert_eq!(bench.shell.count(ShellCall::TrimMemory), 1);
        assert_eq!(bench.ctx.phase(), Phase::Running);
    }

    #[test]
    fn test_terminate_reports_dying_and_requests_exit() {
        let mut bench = setup();
        to_running(&mut bench);
        bench.dispatch(LifecycleEvent::Terminate);
        assert_eq!(bench.ctx.phase(), Phase::Dying);
        assert_eq!(bench.session.last(), Some(AppStatus::Dying));
        assert_eq!(bench.shell.count(ShellCall::RequestExit), 1);
        // terminate() itself runs in the shutdown sequence, not here
        assert_eq!(bench.counts().terminate, 0);
    }

    #[test]
    fn test_terminate_background_kills_paused_app() {
        let mut bench = setup();
        to_running(&mut bench);
        bench.dispatch(LifecycleEvent::Pause);
        bench.dispatch(LifecycleEvent::TerminateBackground);
        assert_eq!(bench.ctx.phase(), Phase::Dying);
        assert_eq!(bench.session.last(), Some(AppStatus::Dying));
        assert_eq!(bench.shell.count(ShellCall::RequestExit), 1);
    }

    #[test]
    fn test_terminate_background_spares_foreground_app() {
        let mut bench = setup();
        to_running(&mut bench);
        bench.dispatch(LifecycleEvent::TerminateBackground);
        assert_eq!(bench.ctx.phase(), Phase::Running);
        assert_eq!(bench.shell.count(ShellCall::RequestExit), 0);
    }

    #[test]
    fn test_dying_state_absorbs_every_event() {
        let mut bench = setup();
        to_running(&mut bench);
        bench.dispatch(LifecycleEvent::Terminate);
        let counts = bench.counts();
        let calls = bench.shell.calls();
        let statuses = bench.session.statuses();

        for event in [
            LifecycleEvent::Create,
            LifecycleEvent::Reset(Bundle::new()),
            LifecycleEvent::Pause,
            LifecycleEvent::Resume,
            LifecycleEvent::Raise,
            LifecycleEvent::Lower,
            LifecycleEvent::Terminate,
            LifecycleEvent::TerminateBackground,
            LifecycleEvent::MemoryFlush,
            LifecycleEvent::MemoryFlushPost,
        ] {
            bench.dispatch(event);
        }

        assert_eq!(bench.ctx.phase(), Phase::Dying);
        assert_eq!(bench.counts(), counts);
        assert_eq!(bench.shell.calls(), calls);
        assert_eq!(bench.session.statuses(), statuses);
    }

    #[test]
    fn test_raise_and_lower_pass_through() {
        let mut bench = setup();
        to_running(&mut bench);
        bench.dispatch(LifecycleEvent::Raise);
        bench.dispatch(LifecycleEvent::Lower);
        assert_eq!(bench.shell.count(ShellCall::Raise), 1);
        assert_eq!(bench.shell.count(ShellCall::Lower), 1);
        assert_eq!(bench.ctx.phase(), Phase::Running);
    }

    #[test]
    fn test_rotation_pauses_and_resumes_with_lifecycle() {
        let mut bench = setup();
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = seen.clone();
        bench
            .ctx
            .rotation_mut()
            .set_callback(move |o| sink.borrow_mut().push(o));
        to_running(&mut bench);

        bench.ctx.rotation_mut().feed(90);
        assert_eq!(seen.borrow().len(), 1);

        bench.dispatch(LifecycleEvent::Pause);
        bench.ctx.rotation_mut().feed(180);
        assert_eq!(seen.borrow().len(), 1);

        bench.dispatch(LifecycleEvent::Resume);
        assert_eq!(seen.borrow().len(), 2);
    }

    #[test]
    fn test_flush_memory_hits_caches_then_allocator() {
        let shell = MockShell::new();
        flush_memory(&shell);
        assert_eq!(
            shell.calls(),
            vec![ShellCall::FlushCaches, ShellCall::TrimMemory]
        );
    }
}
