use once_cell::sync::Lazy;
use std::env;
use std::time::Duration;

/// Catalog document path
/// Read from CATALOG_PATH environment variable
/// Default: categories.json
pub static CATALOG_PATH: Lazy<String> =
    Lazy::new(|| env::var("CATALOG_PATH").unwrap_or_else(|_| "categories.json".to_string()));

/// Log file path
/// Read from LOG_FILE_PATH environment variable
/// Default: catalogbot.log
pub static LOG_FILE_PATH: Lazy<String> =
    Lazy::new(|| env::var("LOG_FILE_PATH").unwrap_or_else(|_| "catalogbot.log".to_string()));

/// Bot token
/// Read from BOT_TOKEN or TELOXIDE_TOKEN environment variable
pub static BOT_TOKEN: Lazy<String> = Lazy::new(|| {
    env::var("BOT_TOKEN")
        .or_else(|_| env::var("TELOXIDE_TOKEN"))
        .unwrap_or_else(|_| String::new())
});

/// Custom Bot API server (local telegram-bot-api instance)
/// Read from BOT_API_URL environment variable
pub static BOT_API_URL: Lazy<Option<String>> = Lazy::new(|| env::var("BOT_API_URL").ok());

/// Session configuration
pub mod session {
    use super::{env, Duration, Lazy};

    /// Default lifetime of a pending action (in seconds)
    pub const DEFAULT_TTL_SECS: u64 = 600;

    /// How often expired sessions are purged (in seconds)
    pub const CLEANUP_INTERVAL_SECS: u64 = 300;

    /// Pending action lifetime
    /// Read from SESSION_TTL_SECS environment variable
    pub static TTL_SECS: Lazy<u64> = Lazy::new(|| parse_ttl(env::var("SESSION_TTL_SECS").ok().as_deref()));

    /// Pending action lifetime duration
    pub fn ttl() -> Duration {
        Duration::from_secs(*TTL_SECS)
    }

    /// Session purge interval duration
    pub fn cleanup_interval() -> Duration {
        Duration::from_secs(CLEANUP_INTERVAL_SECS)
    }

    /// Zero or unparsable values fall back to the default.
    pub(crate) fn parse_ttl(raw: Option<&str>) -> u64 {
        raw.and_then(|s| s.trim().parse::<u64>().ok())
            .filter(|&secs| secs > 0)
            .unwrap_or(DEFAULT_TTL_SECS)
    }
}

/// Retry configuration
pub mod retry {
    use super::Duration;

    /// Maximum number of retries for dispatcher reconnection
    pub const MAX_DISPATCHER_RETRIES: u32 = 5;

    /// Delay between dispatcher retry attempts (in seconds)
    pub const DISPATCHER_RETRY_DELAY_SECS: u64 = 5;

    /// Dispatcher retry delay duration
    pub fn dispatcher_delay() -> Duration {
        Duration::from_secs(DISPATCHER_RETRY_DELAY_SECS)
    }

    /// Base for exponential backoff calculation
    pub const EXPONENTIAL_BACKOFF_BASE: u64 = 2;

    /// Upper bound for a single backoff sleep (in seconds)
    pub const MAX_BACKOFF_SECS: u64 = 60;

    /// Backoff before dispatcher restart `attempt` (1-based)
    pub fn backoff(attempt: u32) -> Duration {
        let secs = EXPONENTIAL_BACKOFF_BASE
            .saturating_pow(attempt)
            .min(MAX_BACKOFF_SECS);
        Duration::from_secs(secs)
    }
}

/// Network configuration
pub mod network {
    use super::Duration;

    /// Request timeout for Bot API calls (in seconds)
    /// Media groups of ten photos are re-sent by file_id, so this stays modest.
    pub const REQUEST_TIMEOUT_SECS: u64 = 60;

    /// Request timeout duration
    pub fn timeout() -> Duration {
        Duration::from_secs(REQUEST_TIMEOUT_SECS)
    }
}

/// Telegram limits that shape outgoing replies
pub mod telegram {
    /// Maximum number of items in one media group
    pub const MEDIA_GROUP_MAX: usize = 10;

    /// Maximum size of inline button callback data (in bytes)
    pub const CALLBACK_DATA_MAX: usize = 64;
}
