/// Server configuration loaded from environment variables.
///
/// All fields have defaults suitable for local development. In
/// production, override via environment variables.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `3000`).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS`.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `60`).
    pub request_timeout_secs: u64,
    /// Timeout for downstream service calls in seconds (default: `30`).
    pub downstream_timeout_secs: u64,
    /// Directory holding bundled legacy `template_*.mustache` files.
    pub template_dir: String,
    /// Object-store bucket rendered documents are written to.
    pub document_bucket: String,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                   | Default                 |
    /// |---------------------------|-------------------------|
    /// | `HOST`                    | `0.0.0.0`               |
    /// | `PORT`                    | `3000`                  |
    /// | `CORS_ORIGINS`            | `http://localhost:5173` |
    /// | `REQUEST_TIMEOUT_SECS`    | `60`                    |
    /// | `DOWNSTREAM_TIMEOUT_SECS` | `30`                    |
    /// | `TEMPLATE_DIR`            | `templates`             |
    /// | `DOCUMENT_BUCKET`         | `sar-documents`         |
    pub fn from_env() -> Self {
        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into());

        let port: u16 = std::env::var("PORT")
            .unwrap_or_else(|_| "3000".into())
            .parse()
            .expect("PORT must be a valid u16");

        let cors_origins: Vec<String> = std::env::var("CORS_ORIGINS")
            .unwrap_or_else(|_| "http://localhost:5173".into())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let request_timeout_secs: u64 = std::env::var("REQUEST_TIMEOUT_SECS")
            .unwrap_or_else(|_| "60".into())
            .parse()
            .expect("REQUEST_TIMEOUT_SECS must be a valid u64");

        let downstream_timeout_secs: u64 = std::env::var("DOWNSTREAM_TIMEOUT_SECS")
            .unwrap_or_else(|_| "30".into())
            .parse()
            .expect("DOWNSTREAM_TIMEOUT_SECS must be a valid u64");

        let template_dir =
            std::env::var("TEMPLATE_DIR").unwrap_or_else(|_| "templates".into());

        let document_bucket =
            std::env::var("DOCUMENT_BUCKET").unwrap_or_else(|_| "sar-documents".into());

        Self {
            host,
            port,
            cors_origins,
            request_timeout_secs,
            downstream_timeout_secs,
            template_dir,
            document_bucket,
        }
    }
}
