use chrono::Utc;

use crate::store::models::PollId;

/// Hands out poll ids derived from the wall clock in milliseconds.
///
/// Ids are strictly increasing within a process: when the clock has not
/// advanced past the last id (or went backwards) the previous value plus one
/// is used instead.
#[derive(Debug, Default)]
pub struct PollIdGenerator {
    last: i64,
}

impl PollIdGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn next_id(&mut self) -> PollId {
        self.next_at(Utc::now().timestamp_millis()).to_string()
    }

    fn next_at(&mut self, now_ms: i64) -> i64 {
        let next = now_ms.max(self.last.saturating_add(1));
        self.last = next;
        next
    }
}
