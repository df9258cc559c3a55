// Append-only record of per-unit outcomes, owned by the runner.

use crate::models::Sample;

/// Ordered sequence of samples for one run.
///
/// Appends validate the capture invariants: contiguous 1-based indices
/// and non-decreasing second offsets. A violation is a programming
/// error in the issuing path, not a recoverable runtime condition.
#[derive(Debug, Default)]
pub struct ResultLog {
    samples: Vec<Sample>,
}

impl ResultLog {
    pub fn new() -> Self {
        Self { samples: Vec::new() }
    }

    /// Append the next sample.
    ///
    /// # Panics
    /// If the sample's index is not exactly one past the last appended
    /// index, or its second offset goes backwards.
    pub fn append(&mut self, sample: Sample) {
        let expected = self.samples.len() as u64 + 1;
        assert_eq!(
            sample.index, expected,
            "out-of-order append: got index {}, expected {}",
            sample.index, expected
        );
        if let Some(last) = self.samples.last() {
            assert!(
                sample.second_offset >= last.second_offset,
                "second offset went backwards: {} after {}",
                sample.second_offset,
                last.second_offset
            );
        }
        self.samples.push(sample);
    }

    /// Immutable view of everything appended so far. Taken at the
    /// cancellation boundary, this reflects exactly the completed
    /// appends; samples are never torn because appends happen between
    /// boundary checks.
    pub fn snapshot(&self) -> &[Sample] {
        &self.samples
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }
}
