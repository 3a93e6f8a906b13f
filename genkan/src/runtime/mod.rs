mod channels;
mod dispatch;
mod notices;
mod windows;

pub use channels::RuntimeHandle;
pub use windows::WindowNotice;

use std::sync::mpsc::RecvTimeoutError;
use std::time::Instant;

use anyhow::Result;
use genkan_ipc::{Bundle, LaunchReply, LaunchRequest, SystemNotice};
use thiserror::Error;

use crate::core::{AppContext, Phase};
use crate::event::{LifecycleEvent, SystemEvent};
use crate::ops::AppOps;
use crate::platform::{LogReporter, ProcessShell, SessionReporter, ToolkitShell};
use crate::rotation::Orientation;
use crate::session::SessionServer;

use channels::{create_channels, Envelope, MainChannels};
use dispatch::{dispatch_event, flush_memory};
use notices::route_notice;
use windows::handle_window_notice;

#[derive(Debug, Error)]
pub enum StartError {
    #[error("application name must not be empty")]
    EmptyName,
    #[error("runtime already started")]
    AlreadyRunning,
}

/// The application runtime: owns the lifecycle state and the main event
/// loop, and bridges the session manager, window system, and system
/// notifications into ordered lifecycle events.
///
/// Everything lifecycle-related runs on the thread that calls [`run`];
/// the only other thread is the session bridge, which communicates
/// exclusively through the envelope channel.
///
/// [`run`]: Runtime::run
pub struct Runtime<S: ToolkitShell = ProcessShell, R: SessionReporter = LogReporter> {
    ctx: AppContext,
    shell: S,
    session: R,
    channels: MainChannels,
    handle: RuntimeHandle,
    started: bool,
}

impl Runtime {
    /// Build a runtime with the default process-level platform glue.
    pub fn new(name: &str, ops: Box<dyn AppOps>) -> Result<Self, StartError> {
        Self::with_platform(name, ops, ProcessShell, LogReporter)
    }
}

impl<S: ToolkitShell, R: SessionReporter> Runtime<S, R> {
    pub fn with_platform(
        name: &str,
        ops: Box<dyn AppOps>,
        shell: S,
        session: R,
    ) -> Result<Self, StartError> {
        if name.is_empty() {
            return Err(StartError::EmptyName);
        }
        let channels = create_channels();
        let handle = RuntimeHandle::new(channels.tx.clone());
        Ok(Self {
            ctx: AppContext::new(name, ops),
            shell,
            session,
            channels,
            handle,
            started: false,
        })
    }

    /// Handle for feeding window, notice, and orientation events into the
    /// loop from toolkit glue running on other threads.
    pub fn handle(&self) -> RuntimeHandle {
        self.handle.clone()
    }

    /// Enable or disable automatic memory reclaim while backgrounded.
    /// Enabled by default.
    pub fn set_resource_reclaiming(&mut self, enabled: bool) {
        self.ctx.reclaiming = enabled;
    }

    pub fn set_system_handler(
        &mut self,
        event: SystemEvent,
        handler: impl FnMut(&SystemNotice) + 'static,
    ) {
        self.ctx.system_handlers.insert(event, Box::new(handler));
    }

    pub fn unset_system_handler(&mut self, event: SystemEvent) {
        self.ctx.system_handlers.remove(&event);
    }

    /// Register the handler consulted when the session manager asks a
    /// running application to come forward. The window is raised only if
    /// the handler succeeds.
    pub fn set_open_handler(&mut self, handler: impl FnMut() -> Result<()> + 'static) {
        self.ctx.open_handler = Some(Box::new(handler));
    }

    pub fn set_rotation_callback(&mut self, callback: impl FnMut(Orientation) + 'static) {
        self.ctx.rotation.set_callback(callback);
    }

    pub fn unset_rotation_callback(&mut self) {
        self.ctx.rotation.unset_callback();
    }

    pub fn current_orientation(&self) -> Orientation {
        self.ctx.rotation.get_current_orientation()
    }

    pub fn set_rotation_locked(&mut self, locked: bool) {
        self.ctx.rotation.set_locked(locked);
    }

    /// Run the application to completion.
    ///
    /// Dispatches CREATE, buffers any launch arguments as the initial
    /// session request, starts the session bridge, and then processes
    /// events until a terminate request moves the application to DYING.
    pub fn run(&mut self, args: &[String]) -> Result<()> {
        if self.started {
            return Err(StartError::AlreadyRunning.into());
        }
        self.started = true;

        tracing::info!("Starting application: {}", self.ctx.name);

        self.lifecycle(LifecycleEvent::Create);
        if self.ctx.phase() != Phase::Created {
            if let Err(e) = self.ctx.ops.terminate() {
                tracing::warn!("Terminate callback failed: {:#}", e);
            }
            anyhow::bail!("create callback failed");
        }

        if !args.is_empty() {
            if args.len() % 2 != 0 {
                tracing::warn!("Odd launch argument count, dropping dangling key");
            }
            // The payload stays buffered in the context; only a marker is
            // enqueued, ordered against early window events. A resume that
            // overtakes the marker drops the buffer, and the marker then
            // delivers nothing.
            self.ctx.pending_reset = Some(Bundle::from_argv(args));
            self.handle.initial_launch();
        }

        self.spawn_bridge();
        self.main_loop();
        self.shutdown();

        Ok(())
    }

    fn spawn_bridge(&self) {
        let server = SessionServer::new(&self.ctx.name, self.handle.clone());
        std::thread::spawn(move || {
            let rt = tokio::runtime::Runtime::new().unwrap();
            rt.block_on(async move {
                tracing::info!("Session bridge started");
                if let Err(e) = server.run().await {
                    tracing::error!("Session server error: {}", e);
                }
                tracing::info!("Session bridge exiting");
            });
        });
    }

    fn main_loop(&mut self) {
        tracing::info!("Starting main loop");

        loop {
            if self.ctx.phase() == Phase::Dying {
                break;
            }

            let envelope = if let Some(deadline) = self.ctx.flush_timer.fires_at() {
                let wait = deadline.saturating_duration_since(Instant::now());
                match self.channels.rx.recv_timeout(wait) {
                    Ok(envelope) => Some(envelope),
                    Err(RecvTimeoutError::Timeout) => None,
                    Err(RecvTimeoutError::Disconnected) => break,
                }
            } else {
                match self.channels.rx.recv() {
                    Ok(envelope) => Some(envelope),
                    Err(_) => break,
                }
            };

            match envelope {
                Some(envelope) => self.process(envelope),
                None => {
                    if self.ctx.flush_timer.take_fired(Instant::now()) {
                        flush_memory(&self.shell);
                    }
                }
            }
        }

        tracing::info!("Main loop finished");
    }

    fn process(&mut self, envelope: Envelope) {
        match envelope {
            Envelope::Session((request, reply_tx)) => {
                self.handle_session_request(request);
                // Requests are acknowledged once processed, whatever the
                // lifecycle outcome was
                if reply_tx.try_send(LaunchReply::Ok).is_err() {
                    tracing::debug!("Requester gone before reply");
                }
            }
            Envelope::Window(notice) => {
                handle_window_notice(&mut self.ctx, &self.shell, &self.session, notice);
            }
            Envelope::System(notice) => {
                route_notice(&mut self.ctx, &self.shell, &self.session, &notice);
            }
            Envelope::Orientation(degrees) => self.ctx.rotation.feed(degrees),
            Envelope::InitialLaunch => match self.ctx.pending_reset.take() {
                Some(bundle) => self.lifecycle(LifecycleEvent::Reset(bundle)),
                None => tracing::debug!("Initial launch superseded, nothing to deliver"),
            },
        }
    }

    fn handle_session_request(&mut self, request: LaunchRequest) {
        match request {
            LaunchRequest::Start { bundle } => {
                self.lifecycle(LifecycleEvent::Reset(bundle));
            }
            LaunchRequest::Resume => {
                let raise = match self.ctx.open_handler.as_mut() {
                    Some(handler) => match handler() {
                        Ok(()) => true,
                        Err(e) => {
                            tracing::warn!("Open handler failed: {:#}", e);
                            false
                        }
                    },
                    None => true,
                };
                if raise {
                    self.lifecycle(LifecycleEvent::Raise);
                }
            }
            LaunchRequest::Terminate => self.lifecycle(LifecycleEvent::Terminate),
            LaunchRequest::TerminateBackground => {
                self.lifecycle(LifecycleEvent::TerminateBackground);
            }
            LaunchRequest::Pause => self.lifecycle(LifecycleEvent::Pause),
            other => tracing::debug!("Ignoring session request {:?}", other),
        }
    }

    fn lifecycle(&mut self, event: LifecycleEvent) {
        dispatch_event(&mut self.ctx, &self.shell, &self.session, event);
    }

    fn shutdown(&mut self) {
        self.ctx.rotation.unset_callback();
        self.ctx.flush_timer.disarm();
        if let Err(e) = self.ctx.ops.terminate() {
            tracing::warn!("Terminate callback failed: {:#}", e);
        }
        let socket = crate::session::socket_path(&self.ctx.name);
        if let Err(e) = std::fs::remove_file(&socket) {
            tracing::debug!("Socket cleanup: {}", e);
        }
    }
}

/// Run an application to completion and return a process exit code.
pub fn run_app(name: &str, args: &[String], ops: Box<dyn AppOps>) -> i32 {
    let mut runtime = match Runtime::new(name, ops) {
        Ok(runtime) => runtime,
        Err(e) => {
            tracing::error!("Failed to initialize {}: {}", name, e);
            return 1;
        }
    };
    match runtime.run(args) {
        Ok(()) => 0,
        Err(e) => {
            tracing::error!("Application error: {:#}", e);
            1
        }
    }
}
