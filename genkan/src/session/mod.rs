mod client;
mod server;

pub use client::SessionClient;
pub use server::SessionServer;

use std::path::PathBuf;

/// Filesystem location of an application's session socket.
pub fn socket_path(app_name: &str) -> PathBuf {
    dirs::runtime_dir()
        .unwrap_or_else(|| PathBuf::from("/tmp"))
        .join(format!("genkan-{}.sock", app_name))
}
