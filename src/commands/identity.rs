use anyhow::{Context, Result};
use log::info;

use crate::cli::{IdentityArgs, DEFAULT_TOR_CONTROL};
use crate::common::setup_logging;
use crate::network::{request_new_identity, IdentityChange, NetworkClient, TorControl};

pub fn run_new_identity(args: IdentityArgs) -> Result<IdentityChange> {
    setup_logging(&args.log_level)?;

    let client = NetworkClient::new(args.network.proxy_config())
        .context("Failed to build HTTP client")?;
    let control = args.network.tor_control().unwrap_or_else(|| {
        TorControl::new(DEFAULT_TOR_CONTROL, args.network.tor_password.clone())
    });
    info!("Requesting new identity via {}", control.addr);

    let rt = tokio::runtime::Runtime::new()?;
    let change = rt
        .block_on(request_new_identity(&client, &control, &args.network.ident_url))
        .context("Failed to refresh Tor identity")?;

    println!("before: {}", change.before.as_deref().unwrap_or("unknown"));
    println!("after:  {}", change.after.as_deref().unwrap_or("unknown"));
    Ok(change)
}
