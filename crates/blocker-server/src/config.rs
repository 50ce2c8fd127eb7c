use std::net::SocketAddr;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use blocker_store::DiskStoreOptions;
use blocker_types::MAX_BLOB_SIZE;

use crate::error::{ServerError, ServerResult};

/// Environment variable overriding the listen port.
pub const ENV_PORT: &str = "PORT";
/// Environment variable overriding the storage root.
pub const ENV_DB_DIR: &str = "DB_DIR";

/// Server settings.
///
/// Sources are layered: built-in defaults, then an optional TOML file, then
/// the `PORT` and `DB_DIR` environment variables. Command-line flags are
/// applied on top by the binary.
///
/// The blob size bound is not configurable here; it is always
/// [`MAX_BLOB_SIZE`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ServerConfig {
    pub bind_addr: SocketAddr,
    pub data_dir: PathBuf,
    pub shard_width: usize,
    pub cache_size_max: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        let cwd = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
        Self {
            bind_addr: SocketAddr::from(([0, 0, 0, 0], 8080)),
            data_dir: cwd.join("db"),
            shard_width: 2,
            cache_size_max: MAX_BLOB_SIZE,
        }
    }
}

impl ServerConfig {
    pub fn from_toml_str(s: &str) -> ServerResult<Self> {
        toml::from_str(s).map_err(|e| ServerError::Config(e.to_string()))
    }

    pub fn load_file(path: impl AsRef<Path>) -> ServerResult<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|e| {
            ServerError::Config(format!("cannot read {}: {e}", path.display()))
        })?;
        Self::from_toml_str(&text)
    }

    /// Apply `PORT` and `DB_DIR` overrides read through `lookup`.
    pub fn apply_env_from<F>(mut self, lookup: F) -> ServerResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(port) = lookup(ENV_PORT).filter(|p| !p.is_empty()) {
            let port: u16 = port
                .parse()
                .map_err(|_| ServerError::Config(format!("{ENV_PORT} is not a port: {port:?}")))?;
            self.bind_addr.set_port(port);
        }
        if let Some(dir) = lookup(ENV_DB_DIR).filter(|d| !d.is_empty()) {
            self.data_dir = PathBuf::from(dir);
        }
        Ok(self)
    }

    pub fn validate(&self) -> ServerResult<()> {
        if self.shard_width == 0 {
            return Err(ServerError::Config("shard_width must be at least 1".into()));
        }
        Ok(())
    }

    pub fn store_options(&self) -> DiskStoreOptions {
        DiskStoreOptions {
            shard_width: self.shard_width,
            cache_size_max: self.cache_size_max,
        }
    }
}
