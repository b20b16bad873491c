//! # newsrelay-server
//!
//! The HTTP entry point for the headline relay.

use clap::Parser;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to a YAML config file. Defaults to `config.yml` next to the crate, if present.
    #[arg(long, env = "NEWSRELAY_CONFIG")]
    config: Option<String>,
    /// Port to listen on, overriding the configured one.
    #[arg(long)]
    port: Option<u16>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    newsrelay_server::start(args.config.as_deref(), args.port).await
}
