use std::net::IpAddr;
use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "blocker",
    about = "Blocker: content-addressed blob storage over HTTP",
    version,
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Emit logs as JSON lines
    #[arg(long, global = true, env = "BLOCKER_JSON_LOGS")]
    pub json_logs: bool,
}

#[derive(Subcommand)]
pub enum Command {
    /// Start the blob server
    Serve(ServeArgs),
    /// Print the key a file would be stored under
    Digest(DigestArgs),
}

#[derive(Args)]
pub struct ServeArgs {
    /// TOML config file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Listen port (overrides PORT)
    #[arg(short, long)]
    pub port: Option<u16>,

    /// Listen address
    #[arg(long)]
    pub host: Option<IpAddr>,

    /// Storage root (overrides DB_DIR)
    #[arg(long)]
    pub data_dir: Option<PathBuf>,
}

#[derive(Args)]
pub struct DigestArgs {
    /// File to hash; reads stdin when omitted
    pub path: Option<PathBuf>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_is_well_formed() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    #[test]
    fn parse_serve_flags() {
        let cli = Cli::try_parse_from([
            "blocker", "serve", "--port", "9090", "--data-dir", "/srv/db",
        ])
        .unwrap();
        match cli.command {
            Command::Serve(args) => {
                assert_eq!(args.port, Some(9090));
                assert_eq!(args.data_dir, Some(PathBuf::from("/srv/db")));
                assert!(args.config.is_none());
            }
            _ => panic!("expected serve"),
        }
    }

    #[test]
    fn parse_digest_stdin() {
        let cli = Cli::try_parse_from(["blocker", "digest"]).unwrap();
        assert!(matches!(cli.command, Command::Digest(DigestArgs { path: None })));
    }
}
