//! Relay configuration.
//!
//! All settings come from the environment:
//! - `PORT`: listening port (default 3001)
//! - `DATA_DIR`: base data directory (default `./anki-data`)
//! - `ANKI_CONNECT_URL`: automation endpoint (default local AnkiConnect)

use std::path::PathBuf;

use deckrelay_anki_connect::DEFAULT_ENDPOINT;

const DEFAULT_PORT: u16 = 3001;
const DEFAULT_DATA_DIR: &str = "anki-data";

/// Subdirectory of the data directory where archives are staged.
const STAGING_SUBDIR: &str = "Anki2";

/// Relay configuration, resolved once at startup and passed to each
/// component at construction.
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub data_dir: PathBuf,
    pub anki_connect_url: String,
}

impl Config {
    /// Reads configuration from the process environment.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Inner constructor with an injectable variable lookup.
    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let port = lookup("PORT")
            .and_then(|v| v.parse().ok())
            .unwrap_or(DEFAULT_PORT);
        let data_dir = lookup("DATA_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_DATA_DIR));
        let anki_connect_url =
            lookup("ANKI_CONNECT_URL").unwrap_or_else(|| DEFAULT_ENDPOINT.to_owned());

        Self {
            port,
            data_dir,
            anki_connect_url,
        }
    }

    /// Directory where deck archives are staged.
    pub fn staging_dir(&self) -> PathBuf {
        self.data_dir.join(STAGING_SUBDIR)
    }
}
