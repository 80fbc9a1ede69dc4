use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Host interface to bind
    #[arg(long)]
    pub host: Option<String>,

    /// Port to listen on
    #[arg(long)]
    pub port: Option<u16>,

    /// Path to the service configuration file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Path to a YAML model/personality catalog (overrides the config file)
    #[arg(long)]
    pub catalog: Option<PathBuf>,

    /// Override the OpenRouter base URL
    #[arg(long)]
    pub base_url: Option<String>,

    /// Probe provider connectivity, print a status line, and exit
    #[arg(long)]
    pub check: bool,
}
