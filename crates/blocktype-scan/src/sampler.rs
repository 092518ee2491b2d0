//! Deterministic per-file sampling.
//!
//! The generator reproduces the additive feedback generator behind the C
//! library's `srandom`/`random` pair (31 words of state, separation 3), so a
//! given seed and path yield the same accept/reject sequence as legacy runs.

const DEGREE: usize = 31;
const SEPARATION: usize = 3;
const WARMUP_ROUNDS: usize = DEGREE * 10;

/// Additive feedback pseudo-random generator compatible with `random()`.
#[derive(Debug, Clone)]
pub struct LegacyRandom {
    state: [i32; DEGREE],
    front: usize,
    rear: usize,
}

impl LegacyRandom {
    /// Seed the generator the way `srandom(seed)` does.
    pub fn new(seed: u32) -> Self {
        let mut state = [0i32; DEGREE];
        let seed = if seed == 0 { 1 } else { seed };
        state[0] = seed as i32;

        // Park-Miller minimal standard step, computed with Schrage's method
        // to stay inside 32-bit signed arithmetic.
        let mut word = i64::from(state[0]);
        for slot in state.iter_mut().skip(1) {
            let hi = word / 127_773;
            let lo = word % 127_773;
            word = 16_807 * lo - 2_836 * hi;
            if word < 0 {
                word += 2_147_483_647;
            }
            *slot = word as i32;
        }

        let mut rng = Self {
            state,
            front: SEPARATION,
            rear: 0,
        };
        for _ in 0..WARMUP_ROUNDS {
            rng.next_u31();
        }
        rng
    }

    /// Draw the next value in `0..2^31`.
    pub fn next_u31(&mut self) -> u32 {
        let sum = (self.state[self.front] as u32).wrapping_add(self.state[self.rear] as u32);
        self.state[self.front] = sum as i32;
        self.front = (self.front + 1) % DEGREE;
        self.rear = (self.rear + 1) % DEGREE;
        sum >> 1
    }
}

/// Decides which boundary events of one input are classified.
#[derive(Debug, Clone)]
pub struct Sampler {
    percentage: u32,
    rng: Option<LegacyRandom>,
}

impl Sampler {
    /// Build the sampler for one input.
    ///
    /// With a percentage of 100 or more every boundary is accepted and no
    /// generator is created. Otherwise the generator is seeded with `seed`
    /// and advanced once per unit of byte value for every byte of `path`.
    pub fn for_path(percentage: u32, seed: u32, path: &[u8]) -> Self {
        if percentage >= 100 {
            return Self {
                percentage,
                rng: None,
            };
        }

        let mut rng = LegacyRandom::new(seed);
        for &byte in path {
            for _ in 0..byte {
                rng.next_u31();
            }
        }

        Self {
            percentage,
            rng: Some(rng),
        }
    }

    /// Take one draw and decide whether the current boundary is classified.
    pub fn accept(&mut self) -> bool {
        match self.rng.as_mut() {
            None => true,
            Some(rng) => rng.next_u31() % 100 < self.percentage,
        }
    }
}
