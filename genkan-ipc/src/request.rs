use serde::{Deserialize, Serialize};

use crate::Bundle;

/// A lifecycle request from the session manager to a running application.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum LaunchRequest {
    /// Launch or re-launch with a payload; drives a RESET in the app.
    Start { bundle: Bundle },
    /// Bring the app to the foreground.
    Resume,
    /// Shut the app down.
    Terminate,
    /// Shut the app down only if it is in the background.
    TerminateBackground,
    /// Send the app to the background.
    Pause,
    Wake,
    Suspend,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum LaunchReply {
    Ok,
    Error { message: String },
}

/// Status transitions the runtime reports back to the session manager.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AppStatus {
    Foreground,
    Background,
    Dying,
}
