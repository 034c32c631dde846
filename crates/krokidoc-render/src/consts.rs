//! Rendering defaults.

use std::time::Duration;

/// Public Kroki instance used when no service URL is configured.
pub const DEFAULT_SERVICE_URL: &str = "https://kroki.io";

/// Default artifact filename prefix.
pub const DEFAULT_PREFIX: &str = "kroki";

/// Default HTTP timeout for Kroki requests (30 seconds).
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);
