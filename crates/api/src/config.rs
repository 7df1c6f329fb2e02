use std::path::PathBuf;

/// Server configuration loaded from environment variables.
///
/// All fields have sensible defaults suitable for local development.
/// In production, override via environment variables.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `3000`).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS` env var.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
    /// Root directory for per-job outputs, also served at `/outputs`.
    pub output_dir: PathBuf,
    /// Directory for uploaded seed images.
    pub upload_dir: PathBuf,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                | Default                    |
    /// |------------------------|----------------------------|
    /// | `HOST`                 | `0.0.0.0`                  |
    /// | `PORT`                 | `3000`                     |
    /// | `CORS_ORIGINS`         | `http://localhost:5173`    |
    /// | `REQUEST_TIMEOUT_SECS` | `30`                       |
    /// | `OUTPUT_DIR`           | `outputs`                  |
    /// | `UPLOAD_DIR`           | `uploads`                  |
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
            .unwrap_or_else(|_| "30".into())
            .parse()
            .expect("REQUEST_TIMEOUT_SECS must be a valid u64");

        let output_dir = PathBuf::from(std::env::var("OUTPUT_DIR").unwrap_or_else(|_| "outputs".into()));
        let upload_dir = PathBuf::from(std::env::var("UPLOAD_DIR").unwrap_or_else(|_| "uploads".into()));

        Self {
            host,
            port,
            cors_origins,
            request_timeout_secs,
            output_dir,
            upload_dir,
        }
    }
}

/// API keys for the external generation providers.
///
/// Loaded once at startup; a missing key aborts startup with a message
/// naming every missing variable rather than failing on the first one.
#[derive(Debug, Clone)]
pub struct ProviderConfig {
    /// Gemini API key (`GEMINI_API_KEY`).
    pub gemini_api_key: String,
    /// ElevenLabs API key (`ELEVENLABS_API_KEY`).
    pub elevenlabs_api_key: String,
    /// fal.ai API key (`FAL_KEY`).
    pub fal_key: String,
}

impl ProviderConfig {
    /// Load all provider keys, panicking with the full list of missing
    /// variables on failure.
    pub fn from_env() -> Self {
        let mut missing = Vec::new();
        let mut get = |name: &'static str| {
            std::env::var(name).unwrap_or_else(|_| {
                missing.push(name);
                String::new()
            })
        };

        let gemini_api_key = get("GEMINI_API_KEY");
        let elevenlabs_api_key = get("ELEVENLABS_API_KEY");
        let fal_key = get("FAL_KEY");

        if !missing.is_empty() {
            panic!("Missing required environment variables: {}", missing.join(", "));
        }

        Self {
            gemini_api_key,
            elevenlabs_api_key,
            fal_key,
        }
    }
}
