use std::path::PathBuf;

/// Client configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Base URL of the service, without the `/api` suffix.
    pub api_url: String,
    /// File holding the signed-in session.
    pub session_path: PathBuf,
}

impl ClientConfig {
    /// Load configuration from environment variables.
    ///
    /// | Env Var               | Default                  |
    /// |-----------------------|--------------------------|
    /// | `CERCLE_API_URL`      | `http://localhost:8080`  |
    /// | `CERCLE_SESSION_PATH` | `.cercle-session.json`   |
    pub fn from_env() -> Self {
        let api_url = std::env::var("CERCLE_API_URL")
            .unwrap_or_else(|_| "http://localhost:8080".into())
            .trim_end_matches('/')
            .to_string();
        let session_path = std::env::var("CERCLE_SESSION_PATH")
            .unwrap_or_else(|_| ".cercle-session.json".into())
            .into();

        Self {
            api_url,
            session_path,
        }
    }
}
