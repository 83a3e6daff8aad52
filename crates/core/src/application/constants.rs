// Store client constants (No magic values)
use std::time::Duration;

/// Wait between attempts when the connection pool is exhausted (250ms).
/// Constant: it never grows between attempts.
pub const DEFAULT_POOL_RETRY_BACKOFF: Duration = Duration::from_millis(250);
