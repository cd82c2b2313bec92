//! Application-wide constants
//!
//! Centralized location for endpoint paths, storage keys and defaults
//! that are used across multiple modules.

/// Backend host used when neither the config file nor the environment names one
pub const DEFAULT_API_BASE: &str = "https://assured-hearts-backend.onrender.com";

/// Environment variable that overrides the API base URL
pub const API_BASE_ENV: &str = "CARELINK_API_BASE";

/// Seconds between message list polls
pub const POLL_INTERVAL_SECS: u64 = 15;

/// How long an inline status message stays visible
pub const STATUS_TTL_MS: u64 = 3_000;

/// Capacity of the widget-refreshed broadcast channel
pub const EVENT_CHANNEL_CAPACITY: usize = 32;

// Thread defaults
pub const DEFAULT_OTHER_NAME: &str = "User";

/// Preview text for a message that only carries an image
pub const IMAGE_PREVIEW: &str = "[image]";

/// Fallback error text when the server gives none
pub const GENERIC_SEND_ERROR: &str = "Failed to send message";

/// Keys in the persisted session store (same names the site keeps in localStorage)
pub mod session_keys {
    pub const USER_ID: &str = "user_id";
    pub const USER_TYPE: &str = "user_type";
    pub const USER_NAME: &str = "user_name";
}

/// REST paths, relative to the API base
pub mod paths {
    pub const MESSAGES: &str = "/forms/messages";
    pub const MESSAGES_READ: &str = "/forms/messages/read";
    pub const LOGIN: &str = "/forms/login";

    pub fn messages_for(user_id: u64) -> String {
        format!("{}/{}", MESSAGES, user_id)
    }

    pub fn profile(role: &str, id: u64) -> String {
        format!("/forms/{}/{}", role, id)
    }
}
