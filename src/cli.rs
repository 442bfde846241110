use clap::Parser;
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "ytsum",
    about = "HTTP service that summarizes YouTube videos",
    version = env!("GIT_DESCRIBE"),
)]
pub struct Cli {
    /// Address to bind (overrides config file)
    #[arg(long)]
    pub host: Option<String>,

    /// Port to listen on (overrides config file)
    #[arg(short, long)]
    pub port: Option<u16>,

    /// Config file path [default: ~/.config/ytsum/config.toml]
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Append logs to this file instead of stderr
    #[arg(long)]
    pub log_file: Option<PathBuf>,

    /// Log at debug level unless RUST_LOG says otherwise
    #[arg(short, long)]
    pub verbose: bool,
}
