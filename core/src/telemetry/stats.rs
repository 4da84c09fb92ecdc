/// Health counters for one streaming connection. Updated from the single
/// UI event loop, so no interior locking is needed.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct StreamStats {
    accepted: u64,
    dropped: u64,
    transport_errors: u64,
}

impl StreamStats {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_accepted(&mut self) {
        self.accepted += 1;
    }

    pub fn record_dropped(&mut self) {
        self.dropped += 1;
    }

    pub fn record_transport_error(&mut self) {
        self.transport_errors += 1;
    }

    /// (accepted, dropped, transport errors)
    pub fn snapshot(&self) -> (u64, u64, u64) {
        (self.accepted, self.dropped, self.transport_errors)
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counters_accumulate_independently() {
        let mut stats = StreamStats::new();
        stats.record_accepted();
        stats.record_accepted();
        stats.record_dropped();
        stats.record_transport_error();
        assert_eq!(stats.snapshot(), (2, 1, 1));
        stats.reset();
        assert_eq!(stats.snapshot(), (0, 0, 0));
    }
}
