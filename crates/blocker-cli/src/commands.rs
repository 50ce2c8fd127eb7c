use std::io::Read;
use std::net::SocketAddr;

use anyhow::Context;
use colored::Colorize;

use blocker_crypto::ContentHasher;
use blocker_server::{BlockerServer, ServerConfig};
use blocker_types::BlobKey;

use crate::cli::{Cli, Command, DigestArgs, ServeArgs};

pub fn run_command(cli: Cli) -> anyhow::Result<()> {
    match cli.command {
        Command::Serve(args) => cmd_serve(args),
        Command::Digest(args) => cmd_digest(args),
    }
}

/// Layer config sources: defaults < file < environment < flags.
pub fn resolve_config(args: &ServeArgs) -> anyhow::Result<ServerConfig> {
    resolve_config_from(args, |name| std::env::var(name).ok())
}

/// As [`resolve_config`], reading environment variables through `lookup`.
pub fn resolve_config_from<F>(args: &ServeArgs, lookup: F) -> anyhow::Result<ServerConfig>
where
    F: Fn(&str) -> Option<String>,
{
    let config = match &args.config {
        Some(path) => ServerConfig::load_file(path)?,
        None => ServerConfig::default(),
    };
    let mut config = config.apply_env_from(lookup)?;
    if let Some(host) = args.host {
        config.bind_addr = SocketAddr::new(host, config.bind_addr.port());
    }
    if let Some(port) = args.port {
        config.bind_addr.set_port(port);
    }
    if let Some(dir) = &args.data_dir {
        config.data_dir = dir.clone();
    }
    config.validate()?;
    Ok(config)
}

fn cmd_serve(args: ServeArgs) -> anyhow::Result<()> {
    let config = resolve_config(&args)?;
    println!(
        "Starting Blocker on {} (data: {})",
        config.bind_addr.to_string().bold(),
        config.data_dir.display()
    );
    let runtime = tokio::runtime::Runtime::new().context("failed to start tokio runtime")?;
    runtime.block_on(BlockerServer::new(config).serve())?;
    Ok(())
}

fn cmd_digest(args: DigestArgs) -> anyhow::Result<()> {
    let key = match &args.path {
        Some(path) => {
            let file = std::fs::File::open(path)
                .with_context(|| format!("cannot open {}", path.display()))?;
            digest_reader(file)?
        }
        None => digest_reader(std::io::stdin().lock())?,
    };
    println!("{}", key.to_string().cyan());
    Ok(())
}

fn digest_reader(mut reader: impl Read) -> anyhow::Result<BlobKey> {
    let mut hasher = ContentHasher::new();
    let mut buf = [0u8; 64 * 1024];
    loop {
        let n = reader.read(&mut buf).context("read failed")?;
        if n == 0 {
            break;
        }
        hasher.update(&buf[..n]);
    }
    Ok(hasher.finalize())
}
