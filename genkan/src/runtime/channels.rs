use std::sync::mpsc as std_mpsc;

use tokio::sync::mpsc;

use genkan_ipc::{LaunchReply, LaunchRequest, SystemNotice};

use crate::core::WindowId;

use super::windows::WindowNotice;

pub type SessionRequest = (LaunchRequest, mpsc::Sender<LaunchReply>);

/// Everything the main loop can receive, funneled through one channel so
/// delivery order is total.
#[derive(Debug)]
pub(crate) enum Envelope {
    Session(SessionRequest),
    Window(WindowNotice),
    System(SystemNotice),
    Orientation(i32),
    /// Startup marker for the buffered launch payload. Carries nothing:
    /// the payload stays in the context so an earlier event can
    /// invalidate it before delivery.
    InitialLaunch,
}

pub(crate) struct MainChannels {
    pub tx: std_mpsc::Sender<Envelope>,
    pub rx: std_mpsc::Receiver<Envelope>,
}

pub(crate) fn create_channels() -> MainChannels {
    let (tx, rx) = std_mpsc::channel::<Envelope>();
    MainChannels { tx, rx }
}

/// Handle for feeding events into a running application from toolkit glue
/// or platform callbacks. Uses std::sync::mpsc for thread-safe delivery to
/// the main loop.
#[derive(Clone)]
pub struct RuntimeHandle {
    tx: std_mpsc::Sender<Envelope>,
}

impl RuntimeHandle {
    pub(crate) fn new(tx: std_mpsc::Sender<Envelope>) -> Self {
        Self { tx }
    }

    fn send(&self, envelope: Envelope) {
        if let Err(e) = self.tx.send(envelope) {
            tracing::debug!("Main loop gone, dropping event: {}", e);
        }
    }

    /// Report that a window appeared on screen.
    pub fn window_shown(&self, handle: WindowId) {
        self.send(Envelope::Window(WindowNotice::Shown(handle)));
    }

    /// Report that a window left the screen.
    pub fn window_hidden(&self, handle: WindowId) {
        self.send(Envelope::Window(WindowNotice::Hidden(handle)));
    }

    /// Report an obscured-state change for a tracked window.
    pub fn window_visibility_changed(&self, handle: WindowId, obscured: bool) {
        self.send(Envelope::Window(WindowNotice::VisibilityChanged(
            handle, obscured,
        )));
    }

    /// Forward a system key-value change notification.
    pub fn system_notice(&self, notice: SystemNotice) {
        self.send(Envelope::System(notice));
    }

    /// Forward a raw device orientation reading in degrees.
    pub fn orientation_reading(&self, degrees: i32) {
        self.send(Envelope::Orientation(degrees));
    }

    pub(crate) fn session_request(&self, request: LaunchRequest, reply_tx: mpsc::Sender<LaunchReply>) {
        self.send(Envelope::Session((request, reply_tx)));
    }

    pub(crate) fn initial_launch(&self) {
        self.send(Envelope::InitialLaunch);
    }
}
