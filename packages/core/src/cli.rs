use std::net::SocketAddr;
use std::path::PathBuf;

use clap::Parser;

/// Alerting configuration service CLI arguments
#[derive(Debug, Parser)]
#[command(
    name = "alerting-config",
    version,
    about = "Validates and serves alerting configuration documents"
)]
pub struct Cli {
    /// Address to bind the HTTP server to
    #[arg(long)]
    pub listen_addr: Option<SocketAddr>,

    /// Maximum accepted request body size in bytes
    #[arg(long)]
    pub max_body_bytes: Option<usize>,
}

/// `clean-swagger` arguments
#[derive(Debug, Parser)]
#[command(
    name = "clean-swagger",
    version,
    about = "Removes self-referencing $ref entries from a swagger spec's definitions"
)]
pub struct SwaggerCli {
    /// Input swagger JSON file
    #[arg(long = "if", value_name = "FILE")]
    pub input: PathBuf,

    /// Output file
    #[arg(long = "of", value_name = "FILE")]
    pub output: PathBuf,
}
