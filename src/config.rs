//! Configuration management via environment variables
//!
//! Provides helper functions for reading `VLOOKUP_*` environment variables
//! and the typed config structs built from them.

use std::time::Duration;

/// Get an environment variable
///
/// # Returns
/// * `Some(value)` - The environment variable value
/// * `None` - The variable is not set
pub fn get_env(name: &str) -> Option<String> {
    std::env::var(name).ok()
}

/// Get an environment variable with a default value
pub fn get_env_or(name: &str, default: &str) -> String {
    get_env(name).unwrap_or_else(|| default.to_string())
}

/// Get an environment variable, parsing to a specific type
///
/// Returns the default when the variable is unset or fails to parse.
pub fn get_env_parse<T: std::str::FromStr>(name: &str, default: T) -> T {
    get_env(name).and_then(|s| s.parse().ok()).unwrap_or(default)
}

/// デフォルトの登記API検索エンドポイント
pub const DEFAULT_REGISTRY_URL: &str =
    "https://vapi.aesysit.com/api/Data/GetVoterInfoListByNameDOBWard";

/// デフォルトの登記API識別トークン（リクエストボディに載せる共有シークレット）
pub const DEFAULT_REGISTRY_IDENTIFICATION: &str =
    "kFdQLyS4tZM6ZzrbP4qlpg==:cVnDB/htIYd0eMY6OExRyg==";

/// デフォルトのジオロケーションAPIベースURL
pub const DEFAULT_GEO_BASE_URL: &str = "http://ip-api.com";

/// Voter-registry upstream configuration
#[derive(Debug, Clone)]
pub struct RegistryConfig {
    /// Full search endpoint URL
    pub url: String,
    /// Shared-secret token sent in the request body
    pub identification: String,
    /// Per-request timeout
    pub timeout: Duration,
}

impl RegistryConfig {
    /// Load registry configuration from environment variables.
    pub fn from_env() -> Self {
        let url = get_env_or("VLOOKUP_REGISTRY_URL", DEFAULT_REGISTRY_URL);
        let identification = get_env_or(
            "VLOOKUP_REGISTRY_IDENTIFICATION",
            DEFAULT_REGISTRY_IDENTIFICATION,
        );
        let timeout_secs = get_env_parse("VLOOKUP_REGISTRY_TIMEOUT_SECS", 30u64);
        Self {
            url,
            identification,
            timeout: Duration::from_secs(timeout_secs),
        }
    }
}

/// IP geolocation configuration
#[derive(Debug, Clone)]
pub struct GeoConfig {
    /// Base URL of the ip-api style service (`<base>/json/<ip>`)
    pub base_url: String,
    /// Per-request timeout; lookups past this are abandoned
    pub timeout: Duration,
}

impl GeoConfig {
    /// Load geolocation configuration from environment variables.
    pub fn from_env() -> Self {
        let base_url = get_env_or("VLOOKUP_GEO_BASE_URL", DEFAULT_GEO_BASE_URL);
        let timeout_ms = get_env_parse("VLOOKUP_GEO_TIMEOUT_MS", 1000u64);
        Self {
            base_url,
            timeout: Duration::from_millis(timeout_ms),
        }
    }
}

/// Admin session configuration
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// Fixed admin username the login endpoint checks against
    pub admin_username: String,
    /// Session cookie lifetime in seconds
    pub cookie_max_age_secs: usize,
}

impl SessionConfig {
    /// Load session configuration from environment variables.
    pub fn from_env() -> Self {
        let admin_username = get_env_or("VLOOKUP_ADMIN_USERNAME", "admin");
        // 8時間
        let cookie_max_age_secs = get_env_parse("VLOOKUP_SESSION_MAX_AGE_SECS", 8 * 60 * 60usize);
        Self {
            admin_username,
            cookie_max_age_secs,
        }
    }
}
