pub mod clock;
pub mod db;
pub mod greeting;
pub mod memory;
pub mod metrics;

pub use clock::ZonedClock;
pub use db::DbAdapter;
pub use greeting::StaticGreetings;
pub use memory::{InMemoryPostStore, InMemorySessionStore};
pub use metrics::SysinfoMetrics;

use chrono::{DateTime, SubsecRound, Utc};

/// The creation timestamp for the next post: the current time at microsecond
/// precision, but never earlier than the newest stored post.
pub(crate) fn next_timestamp(latest: Option<DateTime<Utc>>) -> DateTime<Utc> {
    let now = Utc::now().trunc_subsecs(6);
    match latest {
        Some(latest) if latest > now => latest,
        _ => now,
    }
}
