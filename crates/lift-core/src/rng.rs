//! Seeded RNG for generated traffic.
//!
//! Dispatch and unit execution are deterministic; randomness only enters
//! through generated calls, so a run is reproducible from `SimConfig::seed`.

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use crate::{BuildingConfig, Floor};

pub struct SimRng(SmallRng);

impl SimRng {
    pub fn new(seed: u64) -> Self {
        SimRng(SmallRng::seed_from_u64(seed))
    }

    /// `true` with probability `p`, clamped to [0, 1].
    #[inline]
    pub fn gen_bool(&mut self, p: f64) -> bool {
        self.0.gen_bool(p.clamp(0.0, 1.0))
    }

    /// A valid `(origin, destination, party_size)` for `building`.  The
    /// destination is drawn from the other floors so it never equals the
    /// origin.  Needs `floors >= 2` and `max_capacity >= 1`.
    pub fn trip(&mut self, building: &BuildingConfig) -> (Floor, Floor, u32) {
        let origin = self.0.gen_range(0..building.floors);
        let mut destination = self.0.gen_range(0..building.floors - 1);
        if destination >= origin {
            destination += 1;
        }
        let party = self.0.gen_range(1..=building.max_capacity);
        (origin, destination, party)
    }
}
