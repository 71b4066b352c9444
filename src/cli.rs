use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::db::DEFAULT_DB_PATH;
use crate::network::{ProxyConfig, TorControl, DEFAULT_IDENT_URL, DEFAULT_USER_AGENT};
use crate::source::openalex::DEFAULT_API_BASE;

pub const DEFAULT_TOR_CONTROL: &str = "127.0.0.1:9051";

#[derive(Parser)]
#[command(name = "scholar-citation-tracker")]
#[command(about = "Track research papers, the citations among them, and your tags and notes")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Create an empty citation database
    Init(InitArgs),

    /// Search the provider, confirm a result, and add it to the database
    Add(AddArgs),

    /// List every tracked publication with its tags
    List(DbArgs),

    /// Show which tracked publications cite which
    Network(DbArgs),

    /// Show publications carrying a tag, or the tagged publications they cite
    Tagged(TaggedArgs),

    /// List publications without any tags
    Untagged(DbArgs),

    /// Show tags, notes and read state of a publication
    Show(ShowArgs),

    /// Append tags and a note to a publication
    Annotate(AnnotateArgs),

    /// Mark a publication as read (or unread)
    MarkRead(MarkReadArgs),

    /// Recompute citation links from the stored cited-by snapshots
    Relink(DbArgs),

    /// Ask Tor for a new circuit and report the external address change
    NewIdentity(IdentityArgs),
}

#[derive(Parser, Clone, Debug)]
pub struct DbArgs {
    /// Citation database file
    #[arg(short, long, default_value = DEFAULT_DB_PATH)]
    pub db: PathBuf,

    /// Logging level (DEBUG, INFO, WARN, ERROR)
    #[arg(short, long, default_value = "INFO")]
    pub log_level: String,
}

#[derive(Parser, Clone, Debug)]
pub struct NetworkArgs {
    /// Proxy for provider traffic, e.g. socks5h://127.0.0.1:9050 for Tor
    #[arg(long)]
    pub proxy: Option<String>,

    /// Tor control port address; `add` requests a new identity first when set
    #[arg(long)]
    pub tor_control: Option<String>,

    /// Tor control port password
    #[arg(long)]
    pub tor_password: Option<String>,

    /// Service that echoes the caller's external address
    #[arg(long, default_value = DEFAULT_IDENT_URL)]
    pub ident_url: String,

    /// Timeout in seconds per request
    #[arg(long, default_value = "30")]
    pub timeout: u64,
}

impl NetworkArgs {
    pub fn proxy_config(&self) -> ProxyConfig {
        ProxyConfig {
            proxy_url: self.proxy.clone(),
            timeout_secs: self.timeout,
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }

    pub fn tor_control(&self) -> Option<TorControl> {
        self.tor_control
            .as_ref()
            .map(|addr| TorControl::new(addr.clone(), self.tor_password.clone()))
    }
}

#[derive(Parser, Clone, Debug)]
pub struct InitArgs {
    #[command(flatten)]
    pub db: DbArgs,

    /// Replace an existing database with an empty one
    #[arg(long, default_value = "false")]
    pub force: bool,
}

#[derive(Parser, Clone, Debug)]
pub struct AddArgs {
    /// Search query (lowercased before searching)
    pub query: String,

    /// Tag to attach; repeat for several
    #[arg(short, long = "tag")]
    pub tags: Vec<String>,

    /// Note to attach
    #[arg(short, long)]
    pub note: Option<String>,

    /// Mark the publication as already read
    #[arg(long, default_value = "false")]
    pub read: bool,

    /// Search API base URL
    #[arg(long, default_value = DEFAULT_API_BASE)]
    pub api_base: String,

    /// Contact address sent with API requests
    #[arg(long)]
    pub mailto: Option<String>,

    /// Seconds to wait before each search request
    #[arg(long, default_value = "1")]
    pub pause_secs: u64,

    #[command(flatten)]
    pub db: DbArgs,

    #[command(flatten)]
    pub network: NetworkArgs,
}

#[derive(Parser, Clone, Debug)]
pub struct TaggedArgs {
    /// Tag to filter by (case-sensitive)
    pub tag: String,

    #[command(flatten)]
    pub db: DbArgs,
}

#[derive(Parser, Clone, Debug)]
pub struct ShowArgs {
    /// Publication title (case-insensitive)
    pub title: String,

    #[command(flatten)]
    pub db: DbArgs,
}

#[derive(Parser, Clone, Debug)]
pub struct AnnotateArgs {
    /// Publication title (case-insensitive)
    pub title: String,

    /// Tag to append; repeat for several
    #[arg(short, long = "tag")]
    pub tags: Vec<String>,

    /// Note to append
    #[arg(short, long)]
    pub note: Option<String>,

    #[command(flatten)]
    pub db: DbArgs,
}

#[derive(Parser, Clone, Debug)]
pub struct MarkReadArgs {
    /// Publication title (case-insensitive)
    pub title: String,

    /// Clear the read flag instead of setting it
    #[arg(long, default_value = "false")]
    pub unread: bool,

    #[command(flatten)]
    pub db: DbArgs,
}

#[derive(Parser, Clone, Debug)]
pub struct IdentityArgs {
    /// Logging level (DEBUG, INFO, WARN, ERROR)
    #[arg(short, long, default_value = "INFO")]
    pub log_level: String,

    #[command(flatten)]
    pub network: NetworkArgs,
}
