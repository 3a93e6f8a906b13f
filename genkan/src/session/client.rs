use std::io::{BufRead, BufReader, Write};
use std::os::unix::net::UnixStream;

use anyhow::{Context, Result};

use genkan_ipc::{LaunchReply, LaunchRequest};

use super::socket_path;

/// Blocking client for driving a running application, used by launcher
/// tooling.
pub struct SessionClient {
    stream: UnixStream,
}

impl SessionClient {
    pub fn connect(app_name: &str) -> Result<Self> {
        let path = socket_path(app_name);
        let stream = UnixStream::connect(&path)
            .with_context(|| format!("Failed to connect to application at {:?}", path))?;
        Ok(Self { stream })
    }

    pub fn send(&mut self, request: &LaunchRequest) -> Result<LaunchReply> {
        let json = serde_json::to_string(request)?;
        writeln!(self.stream, "{}", json)?;
        self.stream.flush()?;

        let mut reader = BufReader::new(&self.stream);
        let mut line = String::new();
        reader.read_line(&mut line)?;

        let reply: LaunchReply = serde_json::from_str(&line)?;
        Ok(reply)
    }
}
