//! Record selection

use netskel_core::time::elapsed_secs;
use netskel_core::ClientRecord;

/// Seconds in one audit day
pub const SECS_PER_DAY: i64 = 86_400;

/// Which records a query returns
#[derive(Debug, Clone, Default)]
pub struct RecordFilter {
    include_disabled: bool,
    /// Lowercased search text; empty matches everything
    search: String,
    /// Only records not seen for this long, relative to `now`
    stale: Option<Staleness>,
}

#[derive(Debug, Clone, Copy)]
struct Staleness {
    min_age: i64,
    now: i64,
}

impl RecordFilter {
    pub fn new(include_disabled: bool) -> Self {
        Self {
            include_disabled,
            ..Self::default()
        }
    }

    /// Case-insensitive substring match against the UUID and every field value
    pub fn search(mut self, text: &str) -> Self {
        self.search = text.to_lowercase();
        self
    }

    /// Keep records whose last heartbeat is at least `days` old at `now`
    ///
    /// Records that never sent a heartbeat count as stale.
    pub fn stale_for(mut self, days: u64, now: i64) -> Self {
        let min_age = i64::try_from(days)
            .unwrap_or(i64::MAX)
            .saturating_mul(SECS_PER_DAY);
        self.stale = Some(Staleness { min_age, now });
        self
    }

    pub fn matches(&self, record: &ClientRecord) -> bool {
        if record.is_disabled() && !self.include_disabled {
            return false;
        }

        if !self.search.is_empty() && !self.search_hit(record) {
            return false;
        }

        match (self.stale, record.last_seen()) {
            (Some(stale), Some(seen)) => elapsed_secs(seen, stale.now) >= stale.min_age,
            _ => true,
        }
    }

    fn search_hit(&self, record: &ClientRecord) -> bool {
        record.uuid.to_lowercase().contains(&self.search)
            || record
                .fields
                .values()
                .any(|v| v.to_lowercase().contains(&self.search))
    }
}
