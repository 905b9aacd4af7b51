//! Publication date resolution.

use chrono::{DateTime, Utc};

use crate::domain::Partition;

/// Publication timestamp and the partition derived from it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DerivedPublication {
    pub published_at: DateTime<Utc>,
    pub partition: Partition,
}

/// Default a missing `published_at` to `now`, then derive the partition.
///
/// The partition is recomputed from whatever timestamp wins, so it follows
/// edits to `published_at` on every pass.
pub fn resolve_publication(
    published_at: Option<DateTime<Utc>>,
    now: DateTime<Utc>,
) -> DerivedPublication {
    let published_at = published_at.unwrap_or(now);
    DerivedPublication {
        published_at,
        partition: Partition::of(&published_at),
    }
}
