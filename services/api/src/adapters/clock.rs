//! services/api/src/adapters/clock.rs
//!
//! Implements the `TimeSource` port with the IANA time zone database.

use async_trait::async_trait;
use blog_core::ports::{PortResult, TimeSource};
use chrono::{DateTime, Utc};
use chrono_tz::Tz;

const TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Reports wall-clock time in a fixed zone.
#[derive(Clone, Debug)]
pub struct ZonedClock {
    zone: Tz,
}

impl ZonedClock {
    pub fn new(zone: Tz) -> Self {
        Self { zone }
    }

    /// Formats an instant in this clock's zone.
    pub fn format(&self, instant: DateTime<Utc>) -> String {
        instant.with_timezone(&self.zone).format(TIME_FORMAT).to_string()
    }
}

#[async_trait]
impl TimeSource for ZonedClock {
    async fn now_formatted(&self) -> PortResult<String> {
        Ok(self.format(Utc::now()))
    }
}
