use std::env;
use std::net::SocketAddr;

use crate::cli::Cli;

pub const DEFAULT_LISTEN_ADDR: &str = "0.0.0.0:8080";
pub const DEFAULT_MAX_BODY_BYTES: usize = 1024 * 1024;

#[derive(Debug, Clone)]
pub struct Config {
    pub listen_addr: SocketAddr,
    pub max_body_bytes: usize,
}

impl Config {
    pub fn from_env() -> Result<Self, String> {
        Self::from_vars(|key| env::var(key).ok())
    }

    /// Build a config from any variable source. Unset variables fall back
    /// to their defaults; set but malformed ones are errors.
    pub fn from_vars(var: impl Fn(&str) -> Option<String>) -> Result<Self, String> {
        let listen_addr = var("LISTEN_ADDR")
            .unwrap_or_else(|| DEFAULT_LISTEN_ADDR.to_string())
            .parse::<SocketAddr>()
            .map_err(|_| "LISTEN_ADDR must be a socket address like 0.0.0.0:8080")?;

        let max_body_bytes = match var("MAX_BODY_BYTES") {
            Some(raw) => raw
                .parse::<usize>()
                .ok()
                .filter(|bytes| *bytes > 0)
                .ok_or("MAX_BODY_BYTES must be a positive number")?,
            None => DEFAULT_MAX_BODY_BYTES,
        };

        Ok(Self {
            listen_addr,
            max_body_bytes,
        })
    }

    /// Apply command-line flags on top of environment values.
    pub fn with_cli(mut self, cli: &Cli) -> Result<Self, String> {
        if let Some(listen_addr) = cli.listen_addr {
            self.listen_addr = listen_addr;
        }
        if let Some(max_body_bytes) = cli.max_body_bytes {
            if max_body_bytes == 0 {
                return Err("--max-body-bytes must be a positive number".to_string());
            }
            self.max_body_bytes = max_body_bytes;
        }
        Ok(self)
    }
}
