//! Granule position bookkeeping for Vorbis streams.
//!
//! Consecutive Vorbis blocks overlap by half, so a packet completes
//! `(previous + current) / 4` samples. The first audio packet only primes the
//! overlap and completes none.

use log::trace;

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct GranuleTracker {
    granule: u64,
    last_blocksize: Option<u32>,
    packets: u64,
}

impl GranuleTracker {
    /// Accounts for one audio packet and returns its granule position.
    pub fn advance(&mut self, blocksize: u32) -> u64 {
        if let Some(last) = self.last_blocksize {
            self.granule += (u64::from(last) + u64::from(blocksize)) / 4;
        }
        self.last_blocksize = Some(blocksize);
        self.packets += 1;

        trace!(
            "Audio packet {}: blocksize {}, granule {}",
            self.packets, blocksize, self.granule
        );

        self.granule
    }

    pub fn granule(&self) -> u64 {
        self.granule
    }

    /// Audio packets accounted for so far.
    pub fn packets(&self) -> u64 {
        self.packets
    }
}

#[test]
fn test_granule_sequence() {
    let mut tracker = GranuleTracker::default();
    assert_eq!(tracker.advance(256), 0);
    assert_eq!(tracker.advance(2048), 576);
    assert_eq!(tracker.advance(2048), 1600);
    assert_eq!(tracker.advance(256), 2176);
    assert_eq!(tracker.packets(), 4);
}
