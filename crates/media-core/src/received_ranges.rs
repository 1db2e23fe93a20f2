//! Tracks which byte ranges of a term buffer have been written, so
//! reassembly can report the highest contiguous offset and the loss handler
//! can find the first gap beyond it.

/// A merged, sorted set of non-overlapping half-open `[start, end)` byte
/// ranges that have been observed for one session's current term.
#[derive(Debug, Clone, Default)]
pub struct ReceivedRanges {
    ranges: Vec<(u32, u32)>,
}

impl ReceivedRanges {
    /// An empty range set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record that `[start, end)` has now been observed. Overlapping or
    /// adjacent ranges are merged; marking the same range twice is a no-op.
    pub fn mark(&mut self, start: u32, end: u32) {
        if end <= start {
            return;
        }

        let mut merged_start = start;
        let mut merged_end = end;
        let mut retained = Vec::with_capacity(self.ranges.len() + 1);

        for &(range_start, range_end) in &self.ranges {
            if range_end < merged_start || range_start > merged_end {
                retained.push((range_start, range_end));
            } else {
                merged_start = merged_start.min(range_start);
                merged_end = merged_end.max(range_end);
            }
        }

        retained.push((merged_start, merged_end));
        retained.sort_unstable_by_key(|&(start, _)| start);
        self.ranges = retained;
    }

    /// The highest offset `n` such that `[0, n)` has been fully observed.
    /// Zero if nothing has been observed starting at offset 0.
    #[must_use]
    pub fn highest_contiguous(&self) -> u32 {
        match self.ranges.first() {
            Some(&(start, end)) if start == 0 => end,
            _ => 0,
        }
    }

    /// The first gap strictly after the highest contiguous offset, bounded
    /// above by `capacity`. Returns `(gap_start, gap_length)`.
    #[must_use]
    pub fn first_gap(&self, capacity: u32) -> Option<(u32, u32)> {
        let highest = self.highest_contiguous();
        if highest >= capacity {
            return None;
        }

        let next_range_start = self
            .ranges
            .iter()
            .find(|&&(start, _)| start > highest)
            .map_or(capacity, |&(start, _)| start);

        if next_range_start <= highest {
            None
        } else {
            Some((highest, next_range_start - highest))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_has_no_contiguous_coverage() {
        let ranges = ReceivedRanges::new();
        assert_eq!(ranges.highest_contiguous(), 0);
    }

    #[test]
    fn contiguous_write_from_zero_advances_highest() {
        let mut ranges = ReceivedRanges::new();
        ranges.mark(0, 64);
        assert_eq!(ranges.highest_contiguous(), 64);
        ranges.mark(64, 128);
        assert_eq!(ranges.highest_contiguous(), 128);
    }

    #[test]
    fn write_past_a_gap_does_not_regress_highest_contiguous() {
        let mut ranges = ReceivedRanges::new();
        ranges.mark(0, 64);
        ranges.mark(192, 256);
        assert_eq!(ranges.highest_contiguous(), 64);
    }

    #[test]
    fn filling_gap_advances_highest_contiguous() {
        let mut ranges = ReceivedRanges::new();
        ranges.mark(0, 64);
        ranges.mark(192, 256);
        ranges.mark(64, 192);
        assert_eq!(ranges.highest_contiguous(), 256);
    }

    #[test]
    fn marking_same_range_twice_is_idempotent() {
        let mut ranges = ReceivedRanges::new();
        ranges.mark(0, 64);
        ranges.mark(0, 64);
        assert_eq!(ranges.highest_contiguous(), 64);
    }

    #[test]
    fn first_gap_reports_span_to_next_range() {
        let mut ranges = ReceivedRanges::new();
        ranges.mark(0, 64);
        ranges.mark(192, 256);
        assert_eq!(ranges.first_gap(256), Some((64, 128)));
    }

    #[test]
    fn first_gap_reports_span_to_capacity_when_no_more_data() {
        let mut ranges = ReceivedRanges::new();
        ranges.mark(0, 64);
        assert_eq!(ranges.first_gap(256), Some((64, 192)));
    }

    #[test]
    fn first_gap_none_when_fully_contiguous() {
        let mut ranges = ReceivedRanges::new();
        ranges.mark(0, 256);
        assert_eq!(ranges.first_gap(256), None);
    }
}
