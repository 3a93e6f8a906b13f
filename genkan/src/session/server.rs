use std::path::PathBuf;

use anyhow::Result;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::{UnixListener, UnixStream};
use tokio::sync::mpsc;

use genkan_ipc::{LaunchReply, LaunchRequest};

use crate::runtime::RuntimeHandle;

use super::socket_path;

/// Accepts session-manager connections and relays lifecycle requests to
/// the application's main loop, one JSON request per line. Replies are
/// written back on the same connection once the main loop has processed
/// the request.
pub struct SessionServer {
    socket_path: PathBuf,
    handle: RuntimeHandle,
}

impl SessionServer {
    pub fn new(app_name: &str, handle: RuntimeHandle) -> Self {
        Self {
            socket_path: socket_path(app_name),
            handle,
        }
    }

    pub async fn run(&self) -> Result<()> {
        // Bind fails on a socket file left over from a previous run
        if self.socket_path.exists() {
            std::fs::remove_file(&self.socket_path)?;
        }

        let listener = UnixListener::bind(&self.socket_path)?;
        tracing::info!("Session server listening on {:?}", self.socket_path);

        loop {
            match listener.accept().await {
                Ok((stream, _addr)) => {
                    let handle = self.handle.clone();
                    tokio::spawn(async move {
                        if let Err(e) = Self::handle_connection(stream, handle).await {
                            tracing::error!("Session connection error: {}", e);
                        }
                    });
                }
                Err(e) => {
                    tracing::error!("Session accept failed: {}", e);
                }
            }
        }
    }

    async fn handle_connection(stream: UnixStream, handle: RuntimeHandle) -> Result<()> {
        let (reader, mut writer) = stream.into_split();
        let mut reader = BufReader::new(reader);
        let mut line = String::new();

        loop {
            line.clear();
            let n = reader.read_line(&mut line).await?;
            if n == 0 {
                break; // EOF
            }

            let line = line.trim();
            if line.is_empty() {
                continue;
            }

            let reply = match serde_json::from_str::<LaunchRequest>(line) {
                Ok(request) => {
                    tracing::debug!("Received request: {:?}", request);
                    let (reply_tx, mut reply_rx) = mpsc::channel(1);

                    handle.session_request(request, reply_tx);
                    reply_rx.recv().await.unwrap_or(LaunchReply::Error {
                        message: "Internal error: no reply".to_string(),
                    })
                }
                Err(e) => LaunchReply::Error {
                    message: format!("Invalid request: {}", e),
                },
            };

            let reply_json = serde_json::to_string(&reply)?;
            writer.write_all(reply_json.as_bytes()).await?;
            writer.write_all(b"\n").await?;
            writer.flush().await?;
        }

        Ok(())
    }
}

impl Drop for SessionServer {
    fn drop(&mut self) {
        let _ = std::fs::remove_file(&self.socket_path);
    }
}
