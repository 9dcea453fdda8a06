//! Copilot endpoint path conventions.
//!
//! Pure string constants. No HTTP dependency. Paths are relative to the
//! dashboard origin and are joined onto the configured base URL by the
//! backend client.

pub const SEARCH_ENHANCED: &str = "api/copilot/search-enhanced";

pub const ANALYZE_ENHANCED: &str = "api/copilot/analyze-enhanced";

pub const CHAT: &str = "api/copilot/chat";

/// Default origin used when no base URL is configured.
pub const DEFAULT_BASE_URL: &str = "http://localhost:5000/";
