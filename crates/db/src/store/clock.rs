use std::sync::{Mutex, PoisonError};

use chrono::{Duration, SubsecRound, Utc};
use folio_core::types::Timestamp;

/// Server timestamp source.
///
/// Readings are truncated to microseconds (the resolution PostgreSQL keeps)
/// and strictly increase, so two documents created back to back never share
/// a `createdAt`.
#[derive(Debug, Default)]
pub struct ServerClock {
    last: Mutex<Option<Timestamp>>,
}

impl ServerClock {
    pub fn now(&self) -> Timestamp {
        let now = Utc::now().trunc_subsecs(6);
        let mut last = self.last.lock().unwrap_or_else(PoisonError::into_inner);
        let ts = match *last {
            Some(prev) if now <= prev => prev + Duration::microseconds(1),
            _ => now,
        };
        *last = Some(ts);
        ts
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn readings_strictly_increase() {
        let clock = ServerClock::default();
        let mut prev = clock.now();
        for _ in 0..1000 {
            let next = clock.now();
            assert!(next > prev);
            prev = next;
        }
    }
}
