//! Injectable time source.

use std::fmt;
use std::sync::Arc;

use chrono::{DateTime, SecondsFormat, Utc};

/// Shared closure returning the current instant.
///
/// Runs read time only through this, so tests can pin validation and
/// processing instants.
#[derive(Clone)]
pub struct Clock {
    now_fn: Arc<dyn Fn() -> DateTime<Utc> + Send + Sync>,
}

impl Clock {
    pub fn system() -> Self {
        Self::from_fn(Utc::now)
    }

    /// A clock frozen at `instant`.
    pub fn fixed(instant: DateTime<Utc>) -> Self {
        Self::from_fn(move || instant)
    }

    pub fn from_fn(now_fn: impl Fn() -> DateTime<Utc> + Send + Sync + 'static) -> Self {
        Self {
            now_fn: Arc::new(now_fn),
        }
    }

    pub fn now(&self) -> DateTime<Utc> {
        (self.now_fn)()
    }

    /// Current instant as RFC 3339 with millisecond precision.
    pub fn timestamp(&self) -> String {
        self.now().to_rfc3339_opts(SecondsFormat::Millis, true)
    }
}

impl Default for Clock {
    fn default() -> Self {
        Self::system()
    }
}

impl fmt::Debug for Clock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Clock").finish_non_exhaustive()
    }
}
