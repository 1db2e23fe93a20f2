//! Loss detection: observes a session's received ranges and, when polled,
//! reports the first gap beyond the highest contiguous offset so the caller
//! can emit a NAK.
//!
//! The handler is deliberately decoupled from the NAK transport: it reports
//! a [`GapDescriptor`] and leaves the caller (the receive-path glue) to
//! build and send the actual NAK frame, so the handler never captures the
//! receiver or the transport as a whole.

use crate::received_ranges::ReceivedRanges;

/// A gap in a session's term buffer: `length` bytes missing starting at
/// `term_offset`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GapDescriptor {
    /// Start of the missing range, relative to the term.
    pub term_offset: u32,
    /// Length in bytes of the missing range.
    pub length: u32,
}

/// Contract for loss detection, polled periodically by the receive-path
/// runtime. Re-reporting the same gap across polls is expected and
/// harmless; the source treats repeated identical NAKs as idempotent.
pub trait LossHandler: Send {
    /// Record the latest observed coverage and term capacity for the
    /// session this handler is bound to.
    fn observe(&mut self, received: ReceivedRanges, term_capacity: u32);

    /// Scan for the first unresolved gap, if any.
    fn poll(&mut self) -> Option<GapDescriptor>;
}

/// The concrete loss handler: scans the most recently observed
/// [`ReceivedRanges`] snapshot for the first gap past the highest
/// contiguous offset.
#[derive(Debug, Default)]
pub struct GapScanningLossHandler {
    received: ReceivedRanges,
    term_capacity: u32,
}

impl GapScanningLossHandler {
    /// A handler with no observations yet.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl LossHandler for GapScanningLossHandler {
    fn observe(&mut self, received: ReceivedRanges, term_capacity: u32) {
        self.received = received;
        self.term_capacity = term_capacity;
    }

    fn poll(&mut self) -> Option<GapDescriptor> {
        self.received
            .first_gap(self.term_capacity)
            .map(|(term_offset, length)| GapDescriptor { term_offset, length })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_gap_when_nothing_observed_yet() {
        let mut handler = GapScanningLossHandler::new();
        handler.observe(ReceivedRanges::new(), 0);
        assert_eq!(handler.poll(), None);
    }

    #[test]
    fn reports_gap_after_partial_write() {
        let mut ranges = ReceivedRanges::new();
        ranges.mark(0, 64);
        let mut handler = GapScanningLossHandler::new();
        handler.observe(ranges, 256);
        assert_eq!(handler.poll(), Some(GapDescriptor { term_offset: 64, length: 192 }));
    }

    #[test]
    fn no_gap_when_fully_contiguous() {
        let mut ranges = ReceivedRanges::new();
        ranges.mark(0, 256);
        let mut handler = GapScanningLossHandler::new();
        handler.observe(ranges, 256);
        assert_eq!(handler.poll(), None);
    }

    #[test]
    fn repeated_poll_reports_same_gap() {
        let mut ranges = ReceivedRanges::new();
        ranges.mark(0, 64);
        ranges.mark(192, 256);
        let mut handler = GapScanningLossHandler::new();
        handler.observe(ranges, 256);
        assert_eq!(handler.poll(), Some(GapDescriptor { term_offset: 64, length: 128 }));
        assert_eq!(handler.poll(), Some(GapDescriptor { term_offset: 64, length: 128 }));
    }
}
