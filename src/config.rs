//! Server configuration from environment variables.

use std::path::PathBuf;

#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// TCP port to listen on.
    pub port: u16,
    /// Directory holding `prompts.json` and `answers.json`.
    pub data_dir: PathBuf,
    /// Directory served as the static frontend.
    pub public_dir: PathBuf,
}

impl ServerConfig {
    /// Read `PORT`, `DATA_DIR` and `PUBLIC_DIR`, falling back to the
    /// defaults the original deployment used.
    pub fn from_env() -> Self {
        let port = std::env::var("PORT")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(3000);
        let data_dir = std::env::var("DATA_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("data"));
        let public_dir = std::env::var("PUBLIC_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("public"));

        Self {
            port,
            data_dir,
            public_dir,
        }
    }
}
