use clap::Parser;

/// agentchat — terminal client for a backend-hosted AI agent.
#[derive(Parser, Debug)]
#[command(name = "agentchat", version, about)]
pub struct Args {
    /// Backend base URL override (else AGENTCHAT_API_URL, else the
    /// built-in default).
    #[arg(long)]
    pub api_url: Option<String>,

    /// Log level override (debug, info, warn, error).
    #[arg(long)]
    pub log_level: Option<String>,
}

pub fn parse() -> Args {
    Args::parse()
}
