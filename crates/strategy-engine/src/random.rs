//! Seeded pseudo-random number generator
//!
//! Deterministic xorshift64* keyed by a seed and a stream id. Decisions
//! derive a fresh generator per round with [`SeededRng::for_round`], so the
//! same history always meets the same draw.

/// Seeded random number generator
#[derive(Clone, Debug)]
pub struct SeededRng {
    state: u64,
}

impl SeededRng {
    /// Create a generator for `stream` (an opponent id, a match side) under `seed`.
    pub fn new(seed: u64, stream: u32) -> Self {
        let mut state = splitmix64(seed);
        state ^= (stream as u64).wrapping_mul(0x517cc1b727220a95);
        // xorshift has a fixed point at zero
        if state == 0 {
            state = 0x9e3779b97f4a7c15;
        }

        let mut rng = Self { state };
        for _ in 0..8 {
            rng.next_u64();
        }
        rng
    }

    /// Derive the generator for a given round index.
    pub fn for_round(&self, round: usize) -> Self {
        let mut state = self.state ^ splitmix64(round as u64);
        if state == 0 {
            state = 0x9e3779b97f4a7c15;
        }
        let mut rng = Self { state };
        rng.next_u64();
        rng
    }

    /// Generate next u64
    pub fn next_u64(&mut self) -> u64 {
        self.state ^= self.state >> 12;
        self.state ^= self.state << 25;
        self.state ^= self.state >> 27;
        self.state.wrapping_mul(0x2545f4914f6cdd1d)
    }

    /// Generate next u32
    pub fn next_u32(&mut self) -> u32 {
        (self.next_u64() >> 32) as u32
    }

    /// Generate a value 0-99 (for percentage checks)
    pub fn next_percent(&mut self) -> u8 {
        (self.next_u32() % 100) as u8
    }
}

fn splitmix64(x: u64) -> u64 {
    let mut z = x.wrapping_add(0x9e3779b97f4a7c15);
    z = (z ^ (z >> 30)).wrapping_mul(0xbf58476d1ce4e5b9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94d049bb133111eb);
    z ^ (z >> 31)
}
