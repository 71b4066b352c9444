//! Outbound HTTP for the search provider. All provider traffic goes through a
//! [`NetworkClient`], optionally routed over a SOCKS proxy such as Tor.

pub mod tor;

pub use tor::{request_new_identity, IdentityChange, TorControl, TorError};

use log::{debug, info};
use reqwest::{Client, Proxy};
use std::time::Duration;

pub const DEFAULT_IDENT_URL: &str = "https://ident.me";
pub const DEFAULT_USER_AGENT: &str = concat!("scholar-citation-tracker/", env!("CARGO_PKG_VERSION"));

#[derive(Debug, Clone)]
pub struct ProxyConfig {
    /// e.g. `socks5h://127.0.0.1:9050`; `None` connects directly
    pub proxy_url: Option<String>,
    pub timeout_secs: u64,
    pub user_agent: String,
}

impl Default for ProxyConfig {
    fn default() -> Self {
        Self {
            proxy_url: None,
            timeout_secs: 30,
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

/// HTTP client bound to one proxy configuration
#[derive(Debug, Clone)]
pub struct NetworkClient {
    http: Client,
    config: ProxyConfig,
}

impl NetworkClient {
    pub fn new(config: ProxyConfig) -> reqwest::Result<Self> {
        let mut builder = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(config.user_agent.clone());

        if let Some(url) = &config.proxy_url {
            info!("Routing provider traffic through {}", url);
            builder = builder.proxy(Proxy::all(url)?);
        }

        Ok(Self {
            http: builder.build()?,
            config,
        })
    }

    pub fn http(&self) -> &Client {
        &self.http
    }

    pub fn config(&self) -> &ProxyConfig {
        &self.config
    }

    /// The address the outside world sees for this client
    pub async fn external_ip(&self, ident_url: &str) -> reqwest::Result<String> {
        let text = self
            .http
            .get(ident_url)
            .send()
            .await?
            .error_for_status()?
            .text()
            .await?;
        debug!("External address reported by {}: {}", ident_url, text.trim());
        Ok(text.trim().to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_direct_client() {
        let client = NetworkClient::new(ProxyConfig::default()).unwrap();
        assert!(client.config().proxy_url.is_none());
        assert_eq!(client.config().timeout_secs, 30);
    }

    #[test]
    fn test_socks_proxy_client() {
        let config = ProxyConfig {
            proxy_url: Some("socks5h://127.0.0.1:9050".to_string()),
            ..ProxyConfig::default()
        };
        let client = NetworkClient::new(config).unwrap();
        assert_eq!(
            client.config().proxy_url.as_deref(),
            Some("socks5h://127.0.0.1:9050")
        );
    }
}
