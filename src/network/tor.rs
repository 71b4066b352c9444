use log::{info, warn};
use thiserror::Error;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::TcpStream;

use super::NetworkClient;

#[derive(Debug, Error)]
pub enum TorError {
    #[error("control port I/O failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("control port rejected '{command}': {reply}")]
    Rejected { command: String, reply: String },
    #[error("control port closed the connection")]
    Closed,
}

/// Tor control-port endpoint
#[derive(Debug, Clone)]
pub struct TorControl {
    /// e.g. `127.0.0.1:9051`
    pub addr: String,
    pub password: Option<String>,
}

impl TorControl {
    pub fn new(addr: impl Into<String>, password: Option<String>) -> Self {
        Self {
            addr: addr.into(),
            password,
        }
    }

    /// Authenticate and ask Tor for a fresh circuit (`SIGNAL NEWNYM`)
    pub async fn signal_newnym(&self) -> Result<(), TorError> {
        let stream = TcpStream::connect(&self.addr).await?;
        let (read_half, mut write_half) = stream.into_split();
        let mut reader = BufReader::new(read_half);

        let auth = match &self.password {
            Some(pw) => format!("AUTHENTICATE \"{}\"", escape_quoted(pw)),
            None => "AUTHENTICATE".to_string(),
        };
        for command in [auth.as_str(), "SIGNAL NEWNYM"] {
            write_half.write_all(format!("{}\r\n", command).as_bytes()).await?;
            let reply = read_reply(&mut reader).await?;
            if !reply.starts_with("250") {
                let shown = if command.starts_with("AUTHENTICATE") {
                    "AUTHENTICATE"
                } else {
                    command
                };
                return Err(TorError::Rejected {
                    command: shown.to_string(),
                    reply,
                });
            }
        }
        write_half.write_all(b"QUIT\r\n").await?;
        Ok(())
    }
}

async fn read_reply<R: AsyncBufReadExt + Unpin>(reader: &mut R) -> Result<String, TorError> {
    let mut line = String::new();
    if reader.read_line(&mut line).await? == 0 {
        return Err(TorError::Closed);
    }
    Ok(line.trim_end().to_string())
}

fn escape_quoted(s: &str) -> String {
    s.replace('\\', "\\\\").replace('"', "\\\"")
}

/// External address seen before and after an identity change
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdentityChange {
    pub before: Option<String>,
    pub after: Option<String>,
}

impl IdentityChange {
    pub fn changed(&self) -> bool {
        matches!((&self.before, &self.after), (Some(b), Some(a)) if a != b)
    }
}

/// Request a new Tor identity, checking the external address either side.
/// Address lookups are best effort; a failed NEWNYM is an error.
pub async fn request_new_identity(
    client: &NetworkClient,
    control: &TorControl,
    ident_url: &str,
) -> Result<IdentityChange, TorError> {
    let lookup = |stage: &'static str| async move {
        match client.external_ip(ident_url).await {
            Ok(ip) => {
                info!("External address {}: {}", stage, ip);
                Some(ip)
            }
            Err(e) => {
                warn!("Could not determine external address {}: {}", stage, e);
                None
            }
        }
    };

    let before = lookup("before refresh").await;
    control.signal_newnym().await?;
    let after = lookup("after refresh").await;

    let change = IdentityChange { before, after };
    if !change.changed() {
        warn!("External address did not visibly change");
    }
    Ok(change)
}
