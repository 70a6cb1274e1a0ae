use std::env;
use std::net::{IpAddr, SocketAddr, ToSocketAddrs};
use std::path::PathBuf;
use anyhow::{Context, Result};

pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 38680;
pub const DEFAULT_CONFIG_FILE: &str = ".secrets/config.json";

#[derive(Debug, Clone)]
pub struct Config {
    pub service_host: String,
    pub service_port: u16,
    pub config_file: PathBuf,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Build the configuration from an arbitrary variable source.
    ///
    /// `from_env` goes through here with the process environment; tests pass
    /// a map so they never touch global state.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let service_host = lookup("KEYVAULT_HOST")
            .unwrap_or_else(|| DEFAULT_HOST.to_string());

        let service_port = match lookup("KEYVAULT_PORT") {
            Some(raw) => raw
                .trim()
                .parse::<u16>()
                .context("KEYVAULT_PORT must be a valid port number (0-65535)")?,
            None => DEFAULT_PORT,
        };

        let config_file = lookup("KEYVAULT_CONFIG_FILE")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_FILE));

        Ok(Config {
            service_host,
            service_port,
            config_file,
        })
    }

    /// Socket address to listen on
    ///
    /// IP literals (v4, v6, optionally bracketed) are used as-is; anything
    /// else is resolved as a host name and the first address wins.
    pub fn bind_addr(&self) -> Result<SocketAddr> {
        let host = self
            .service_host
            .trim_start_matches('[')
            .trim_end_matches(']');

        if let Ok(ip) = host.parse::<IpAddr>() {
            return Ok(SocketAddr::new(ip, self.service_port));
        }

        (host, self.service_port)
            .to_socket_addrs()
            .with_context(|| format!("KEYVAULT_HOST '{}' could not be resolved", self.service_host))?
            .next()
            .with_context(|| format!("KEYVAULT_HOST '{}' resolved to no addresses", self.service_host))
    }

    pub fn log_startup(&self) {
        tracing::info!("Configuration loaded:");
        tracing::info!("  Configuration file: {}", self.config_file.display());
        tracing::info!("  Service host: {}", self.service_host);
        tracing::info!("  Service port: {}", self.service_port);
    }
}
