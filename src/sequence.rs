//! Per-trial request sequencing.

use std::sync::atomic::{AtomicU64, Ordering};

/// Issues a strictly increasing sequence of request numbers.
///
/// Shared by every caller submitting requests within a trial; the atomic
/// increment guarantees no two requests observe the same value even when the
/// surrounding measurement loop runs iterations concurrently.
#[derive(Debug, Default)]
pub struct Sequence {
    value: AtomicU64,
}

impl Sequence {
    /// Returns the next sequence number. The first value after a reset is 1.
    pub fn next(&self) -> u64 {
        self.value.fetch_add(1, Ordering::Relaxed) + 1
    }

    /// Restarts the sequence so the next value issued is 1.
    pub fn reset(&self) {
        self.value.store(0, Ordering::Relaxed);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_at_one_and_increases() {
        let sequence = Sequence::default();

        assert_eq!(sequence.next(), 1);
        assert_eq!(sequence.next(), 2);
        assert_eq!(sequence.next(), 3);
    }

    #[test]
    fn reset_restarts_at_one() {
        let sequence = Sequence::default();
        sequence.next();
        sequence.next();

        sequence.reset();

        assert_eq!(sequence.next(), 1);
    }

    #[test]
    fn concurrent_callers_observe_distinct_values() {
        const THREADS: usize = 8;
        const CALLS: u64 = 1_000;

        let sequence = Sequence::default();
        let mut issued = std::thread::scope(|scope| {
            let handles: Vec<_> = (0..THREADS)
                .map(|_| {
                    scope.spawn(|| (0..CALLS).map(|_| sequence.next()).collect::<Vec<_>>())
                })
                .collect();
            handles
                .into_iter()
                .flat_map(|handle| handle.join().unwrap())
                .collect::<Vec<_>>()
        });

        issued.sort_unstable();
        let expected: Vec<u64> = (1..=THREADS as u64 * CALLS).collect();
        assert_eq!(issued, expected);
    }
}
