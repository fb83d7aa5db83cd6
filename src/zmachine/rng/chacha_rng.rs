use rand::Rng;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use crate::zmachine::rng::ZRng;

pub struct ChaChaRng {
    rng: ChaCha8Rng,
}

impl ChaChaRng {
    pub fn new() -> ChaChaRng {
        ChaChaRng {
            rng: ChaCha8Rng::from_entropy(),
        }
    }
}

impl Default for ChaChaRng {
    fn default() -> Self {
        ChaChaRng::new()
    }
}

impl ZRng for ChaChaRng {
    fn type_name(&self) -> &str {
        "ChaChaRng"
    }

    fn seed(&mut self, seed: u16) {
        if seed == 0 {
            self.rng = ChaCha8Rng::from_entropy();
        } else {
            self.rng = ChaCha8Rng::seed_from_u64(seed as u64)
        }
    }

    fn random(&mut self, range: u16) -> u16 {
        self.rng.gen_range(1..=u16::max(range, 1))
    }
}
