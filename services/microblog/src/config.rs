use serde::Deserialize;

use microblog_core::config::Config;

/// Microblog configuration loaded from environment variables.
#[derive(Debug, Deserialize)]
pub struct MicroblogConfig {
    /// Database connection URL. Env var: `DATABASE_URL`.
    pub database_url: String,
    /// HMAC key for remember-token digests. Env var: `REMEMBER_TOKEN_SECRET`.
    pub remember_token_secret: String,
    /// Connection pool size (default 10). Env var: `DATABASE_MAX_CONNECTIONS`.
    #[serde(default = "default_max_connections")]
    pub database_max_connections: u32,
}

fn default_max_connections() -> u32 {
    10
}

impl Config for MicroblogConfig {}
