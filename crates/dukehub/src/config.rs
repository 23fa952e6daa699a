use std::{env, time::Duration};

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// Calendar events feed URL (default: the Duke public calendar feed).
    pub calendar_api_url: String,
    /// Directory/LDAP service base URL.
    pub directory_api_url: String,
    /// Access token for the directory service.
    pub directory_api_key: String,
    /// Scholars widgets API base URL.
    pub scholars_api_url: String,
    /// Reference-data cache TTL in seconds, shared by the directory and
    /// scholars caches (default: 3600).
    pub reference_cache_ttl_seconds: u64,
    /// Debug mode flag (default: false).
    pub debug: bool,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// Environment variables:
    /// - `DUKE_CALENDAR_API_URL` - Events feed URL
    /// - `DUKE_DIRECTORY_API_URL` - Directory service base URL
    /// - `DUKE_DIRECTORY_API_KEY` - Directory access token
    /// - `DUKE_SCHOLARS_API_URL` - Scholars widgets base URL
    /// - `REFERENCE_CACHE_TTL` - Reference cache TTL in seconds (default: 3600)
    /// - `DEBUG` - Debug mode ("true" to enable)
    pub fn from_env() -> Self {
        Self {
            calendar_api_url: env::var("DUKE_CALENDAR_API_URL")
                .unwrap_or_else(|_| "https://calendar.duke.edu/events/index.json".to_string()),
            directory_api_url: env::var("DUKE_DIRECTORY_API_URL")
                .unwrap_or_else(|_| "https://streamer.oit.duke.edu/ldap/people".to_string()),
            directory_api_key: env::var("DUKE_DIRECTORY_API_KEY").unwrap_or_default(),
            scholars_api_url: env::var("DUKE_SCHOLARS_API_URL")
                .unwrap_or_else(|_| "https://scholars.duke.edu/widgets/api/v0.9".to_string()),
            reference_cache_ttl_seconds: env::var("REFERENCE_CACHE_TTL")
                .ok()
                .and_then(|value| value.parse().ok())
                .unwrap_or(3600),
            debug: env::var("DEBUG")
                .map(|value| value.eq_ignore_ascii_case("true"))
                .unwrap_or(false),
        }
    }

    /// Reference-data cache TTL as a Duration.
    pub fn reference_cache_ttl(&self) -> Duration {
        Duration::from_secs(self.reference_cache_ttl_seconds)
    }

    /// Reference-data cache TTL in (fractional) hours.
    pub fn reference_cache_ttl_hours(&self) -> f64 {
        self.reference_cache_ttl_seconds as f64 / 3600.0
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_env()
    }
}
