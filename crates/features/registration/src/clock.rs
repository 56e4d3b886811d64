use chrono::{DateTime, Utc};
use std::fmt::Debug;

/// Source of "now" for window decisions and request timestamps.
pub trait Clock: Debug + Send + Sync + 'static {
    fn now(&self) -> DateTime<Utc>;
}

/// Wall clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Clock frozen at a fixed instant.
#[cfg(test)]
#[derive(Debug, Clone, Copy)]
pub(crate) struct ManualClock(pub(crate) DateTime<Utc>);

#[cfg(test)]
impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}
